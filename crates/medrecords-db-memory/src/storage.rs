use std::sync::Arc;

use dashmap::DashMap;
use indexmap::IndexMap;
use medrecords_storage::{CollectionPath, Document, DocumentPath, Fields, StorageError};
use serde_json::Value;
use time::OffsetDateTime;

/// A document as held by the in-memory store.
#[derive(Debug, Clone)]
pub(crate) struct StoredDocument {
    pub(crate) fields: Fields,
    pub(crate) created_at: OffsetDateTime,
    pub(crate) updated_at: OffsetDateTime,
}

impl StoredDocument {
    fn new(fields: Fields) -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            fields,
            created_at: now,
            updated_at: now,
        }
    }

    pub(crate) fn snapshot(&self, path: DocumentPath) -> Document {
        Document {
            path,
            fields: self.fields.clone(),
            created_at: Some(self.created_at),
            updated_at: Some(self.updated_at),
        }
    }
}

/// Documents of one collection, in insertion order.
pub(crate) type Collection = IndexMap<String, StoredDocument>;

/// In-memory document store.
///
/// Collections are kept in a sharded concurrent map keyed by their full path
/// (`patients/p1/files`); each collection preserves insertion order, which is
/// the store's natural listing order. Deleting a document never touches the
/// collections nested under it.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    pub(crate) collections: Arc<DashMap<String, Collection>>,
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads documents from a JSON object mapping document paths to fields.
    ///
    /// ```json
    /// { "patients/p1": { "id": "p1", "name": "Ada", "dob": "1815-12-10" } }
    /// ```
    ///
    /// Existing documents at the same paths are replaced.
    pub fn seed(&self, documents: &Value) -> Result<usize, StorageError> {
        let entries = documents
            .as_object()
            .ok_or_else(|| StorageError::serialization("seed data must be a JSON object"))?;

        for (path, fields) in entries {
            let path = DocumentPath::parse(path)?;
            let fields = fields.as_object().cloned().ok_or_else(|| {
                StorageError::serialization(format!("fields of '{path}' must be a JSON object"))
            })?;
            self.put(&path, fields);
        }
        Ok(entries.len())
    }

    /// Returns the number of documents across all collections.
    pub fn len(&self) -> usize {
        self.collections.iter().map(|c| c.value().len()).sum()
    }

    /// Returns true if the store holds no documents.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn put(&self, path: &DocumentPath, fields: Fields) {
        let mut collection = self
            .collections
            .entry(path.collection().to_string())
            .or_default();
        match collection.get_mut(path.id()) {
            Some(existing) => {
                existing.fields = fields;
                existing.updated_at = OffsetDateTime::now_utc();
            }
            None => {
                collection.insert(path.id().to_string(), StoredDocument::new(fields));
            }
        }
    }

    pub(crate) fn merge(&self, path: &DocumentPath, fields: Fields) -> Result<(), StorageError> {
        let mut collection = self
            .collections
            .get_mut(&path.collection().to_string())
            .ok_or_else(|| StorageError::not_found(path))?;
        let existing = collection
            .get_mut(path.id())
            .ok_or_else(|| StorageError::not_found(path))?;
        existing.fields.extend(fields);
        existing.updated_at = OffsetDateTime::now_utc();
        Ok(())
    }

    pub(crate) fn remove(&self, path: &DocumentPath) {
        if let Some(mut collection) = self.collections.get_mut(&path.collection().to_string()) {
            collection.shift_remove(path.id());
        }
    }

    pub(crate) fn read(&self, path: &DocumentPath) -> Option<Document> {
        self.collections
            .get(&path.collection().to_string())
            .and_then(|collection| {
                collection
                    .get(path.id())
                    .map(|stored| stored.snapshot(path.clone()))
            })
    }

    pub(crate) fn read_all(&self, path: &CollectionPath) -> Result<Vec<Document>, StorageError> {
        let Some(collection) = self.collections.get(&path.to_string()) else {
            return Ok(Vec::new());
        };
        collection
            .iter()
            .map(|(id, stored)| Ok(stored.snapshot(path.doc(id.clone())?)))
            .collect()
    }
}
