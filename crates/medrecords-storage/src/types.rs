//! Path and document types for the document storage abstraction layer.
//!
//! Documents live in collections, collections may live under documents. A
//! [`CollectionPath`] always has an odd number of segments
//! (`patients`, `patients/p1/files`) and a [`DocumentPath`] an even number
//! (`patients/p1`, `patients/p1/files/f1`).

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use time::OffsetDateTime;

use crate::error::StorageError;

/// The field data of a document.
pub type Fields = Map<String, Value>;

fn check_segment(path: &str, segment: &str) -> Result<(), StorageError> {
    if segment.is_empty() {
        return Err(StorageError::invalid_path(path, "empty path segment"));
    }
    if segment.contains('/') {
        return Err(StorageError::invalid_path(
            path,
            format!("segment '{segment}' contains '/'"),
        ));
    }
    Ok(())
}

/// Path to a collection, e.g. `patients/p1/files`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CollectionPath {
    segments: Vec<String>,
}

impl CollectionPath {
    /// Creates a top-level collection path.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::InvalidPath` if the name is empty or contains `/`.
    pub fn root(name: impl Into<String>) -> Result<Self, StorageError> {
        let name = name.into();
        check_segment(&name, &name)?;
        Ok(Self {
            segments: vec![name],
        })
    }

    /// Parses a slash-separated collection path.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::InvalidPath` for empty segments or an even
    /// number of segments.
    pub fn parse(path: &str) -> Result<Self, StorageError> {
        let segments: Vec<String> = path.split('/').map(str::to_string).collect();
        for segment in &segments {
            check_segment(path, segment)?;
        }
        if segments.len() % 2 == 0 {
            return Err(StorageError::invalid_path(
                path,
                "collection paths have an odd number of segments",
            ));
        }
        Ok(Self { segments })
    }

    /// Returns the path of the document `id` inside this collection.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::InvalidPath` if `id` is not a valid segment.
    pub fn doc(&self, id: impl Into<String>) -> Result<DocumentPath, StorageError> {
        let id = id.into();
        check_segment(&format!("{self}/{id}"), &id)?;
        Ok(DocumentPath {
            collection: self.clone(),
            id,
        })
    }

    /// Returns the last segment (the collection id).
    #[must_use]
    pub fn collection_id(&self) -> &str {
        self.segments.last().map(String::as_str).unwrap_or_default()
    }

    /// Returns the document this collection is nested under, if any.
    #[must_use]
    pub fn parent(&self) -> Option<DocumentPath> {
        if self.segments.len() < 3 {
            return None;
        }
        let n = self.segments.len();
        Some(DocumentPath {
            collection: CollectionPath {
                segments: self.segments[..n - 2].to_vec(),
            },
            id: self.segments[n - 2].clone(),
        })
    }

    /// Returns the path segments.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl fmt::Display for CollectionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("/"))
    }
}

impl TryFrom<String> for CollectionPath {
    type Error = StorageError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CollectionPath> for String {
    fn from(value: CollectionPath) -> Self {
        value.to_string()
    }
}

/// Path to a single document, e.g. `patients/p1/files/f1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentPath {
    collection: CollectionPath,
    id: String,
}

impl DocumentPath {
    /// Parses a slash-separated document path.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::InvalidPath` for empty segments or an odd
    /// number of segments.
    pub fn parse(path: &str) -> Result<Self, StorageError> {
        let (collection, id) = path.rsplit_once('/').ok_or_else(|| {
            StorageError::invalid_path(path, "document paths have an even number of segments")
        })?;
        CollectionPath::parse(collection)
            .map_err(|_| {
                StorageError::invalid_path(path, "document paths have an even number of segments")
            })?
            .doc(id)
    }

    /// The document key (last path segment).
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The collection containing this document.
    #[must_use]
    pub fn collection(&self) -> &CollectionPath {
        &self.collection
    }

    /// Returns the path of the sub-collection `name` under this document.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::InvalidPath` if `name` is not a valid segment.
    pub fn child(&self, name: impl Into<String>) -> Result<CollectionPath, StorageError> {
        let name = name.into();
        check_segment(&format!("{self}/{name}"), &name)?;
        let mut segments = self.collection.segments.clone();
        segments.push(self.id.clone());
        segments.push(name);
        Ok(CollectionPath { segments })
    }
}

impl fmt::Display for DocumentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.collection, self.id)
    }
}

/// A document snapshot as returned by a store.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Full path of the document.
    pub path: DocumentPath,
    /// The document's field data. Store metadata is not included.
    pub fields: Fields,
    /// When the document was created, if the backend reports it.
    pub created_at: Option<OffsetDateTime>,
    /// When the document was last written, if the backend reports it.
    pub updated_at: Option<OffsetDateTime>,
}

impl Document {
    /// Creates a document snapshot without timestamps.
    #[must_use]
    pub fn new(path: DocumentPath, fields: Fields) -> Self {
        Self {
            path,
            fields,
            created_at: None,
            updated_at: None,
        }
    }

    /// The document key.
    #[must_use]
    pub fn id(&self) -> &str {
        self.path.id()
    }

    /// Returns a field value by name.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_path_parse() {
        let path = CollectionPath::parse("patients/p1/files").unwrap();
        assert_eq!(path.segments().len(), 3);
        assert_eq!(path.collection_id(), "files");
        assert_eq!(path.to_string(), "patients/p1/files");
        assert_eq!(path.parent().unwrap().to_string(), "patients/p1");
        assert!(CollectionPath::root("patients").unwrap().parent().is_none());
    }

    #[test]
    fn test_collection_path_rejects_even_segments() {
        assert!(CollectionPath::parse("patients/p1").is_err());
        assert!(CollectionPath::parse("patients//files").is_err());
        assert!(CollectionPath::parse("").is_err());
    }

    #[test]
    fn test_document_path_nesting() {
        let doc = CollectionPath::root("patients").unwrap().doc("p1").unwrap();
        let comments = doc
            .child("files")
            .and_then(|files| files.doc("f1"))
            .and_then(|file| file.child("comments"))
            .unwrap();
        assert_eq!(comments.to_string(), "patients/p1/files/f1/comments");

        let parsed = DocumentPath::parse("patients/p1/files/f1").unwrap();
        assert_eq!(parsed.id(), "f1");
        assert_eq!(parsed.collection().to_string(), "patients/p1/files");
    }

    #[test]
    fn test_invalid_segments() {
        let patients = CollectionPath::root("patients").unwrap();
        assert!(patients.doc("").is_err());
        assert!(patients.doc("a/b").is_err());
        assert!(DocumentPath::parse("patients").is_err());
        assert!(DocumentPath::parse("patients/p1/files").is_err());
    }

    #[test]
    fn test_collection_path_serde() {
        let path: CollectionPath = serde_json::from_str("\"patients/p1/files\"").unwrap();
        assert_eq!(path.collection_id(), "files");
        assert_eq!(serde_json::to_string(&path).unwrap(), "\"patients/p1/files\"");
        assert!(serde_json::from_str::<CollectionPath>("\"patients/p1\"").is_err());
    }
}
