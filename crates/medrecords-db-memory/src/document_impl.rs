//! Implementation of the DocumentStore trait for InMemoryStore.

use async_trait::async_trait;
use medrecords_storage::{
    CollectionPath, Document, DocumentPath, DocumentStore, Fields, StorageError,
};

use crate::storage::InMemoryStore;

/// Generates a store key the way the managed backend does: opaque, unique,
/// URL-safe.
fn generate_key() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn list(&self, collection: &CollectionPath) -> Result<Vec<Document>, StorageError> {
        self.read_all(collection)
    }

    async fn get(&self, document: &DocumentPath) -> Result<Option<Document>, StorageError> {
        Ok(self.read(document))
    }

    async fn add(
        &self,
        collection: &CollectionPath,
        fields: Fields,
    ) -> Result<DocumentPath, StorageError> {
        let path = collection.doc(generate_key())?;
        self.put(&path, fields);
        Ok(path)
    }

    async fn set(&self, document: &DocumentPath, fields: Fields) -> Result<(), StorageError> {
        self.put(document, fields);
        Ok(())
    }

    async fn update(&self, document: &DocumentPath, fields: Fields) -> Result<(), StorageError> {
        self.merge(document, fields)
    }

    async fn delete(&self, document: &DocumentPath) -> Result<(), StorageError> {
        self.remove(document);
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
