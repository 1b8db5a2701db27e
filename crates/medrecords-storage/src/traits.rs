//! Storage traits for the document storage abstraction layer.
//!
//! This module defines the core trait that all storage backends must implement.

use async_trait::async_trait;

use crate::error::StorageError;
use crate::types::{CollectionPath, Document, DocumentPath, Fields};

/// The main storage trait that all document backends must implement.
///
/// A backend is a hierarchical, schema-less document database addressed by
/// path segments. Implementations must be thread-safe (`Send + Sync`).
///
/// # Example
///
/// ```ignore
/// use medrecords_storage::{CollectionPath, DocumentStore, StorageError};
///
/// async fn patient_names(store: &dyn DocumentStore) -> Result<Vec<String>, StorageError> {
///     let patients = store.list(&CollectionPath::root("patients")?).await?;
///     Ok(patients
///         .iter()
///         .filter_map(|doc| doc.get("name").and_then(|v| v.as_str()).map(str::to_string))
///         .collect())
/// }
/// ```
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Lists every document in a collection, in the store's natural order.
    ///
    /// A collection that has never been written to is empty, not an error.
    ///
    /// # Errors
    ///
    /// Returns an error only for infrastructure issues.
    async fn list(&self, collection: &CollectionPath) -> Result<Vec<Document>, StorageError>;

    /// Reads a single document.
    ///
    /// Returns `None` if the document does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error only for infrastructure issues, not for missing documents.
    async fn get(&self, document: &DocumentPath) -> Result<Option<Document>, StorageError>;

    /// Appends a document to a collection under a store-generated key.
    ///
    /// Returns the path of the new document. The key is NOT written into the
    /// document's fields.
    ///
    /// # Errors
    ///
    /// Returns an error for infrastructure issues or unencodable fields.
    async fn add(
        &self,
        collection: &CollectionPath,
        fields: Fields,
    ) -> Result<DocumentPath, StorageError>;

    /// Writes a document at a known path, replacing any existing content.
    ///
    /// # Errors
    ///
    /// Returns an error for infrastructure issues or unencodable fields.
    async fn set(&self, document: &DocumentPath, fields: Fields) -> Result<(), StorageError>;

    /// Merges `fields` into an existing document.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the document does not exist.
    async fn update(&self, document: &DocumentPath, fields: Fields) -> Result<(), StorageError>;

    /// Deletes a document. Deleting a missing document succeeds.
    ///
    /// Sub-collections of the document are left untouched.
    ///
    /// # Errors
    ///
    /// Returns an error only for infrastructure issues.
    async fn delete(&self, document: &DocumentPath) -> Result<(), StorageError>;

    /// Returns the name of this storage backend for logging/debugging.
    fn backend_name(&self) -> &'static str;
}
