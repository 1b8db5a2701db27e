//! # medrecords-storage
//!
//! Storage abstraction layer for the medical-records gateway.
//!
//! This crate defines the trait and types that every document backend
//! implements. It does not contain any implementations - those are provided
//! by separate crates (`medrecords-db-memory`, `medrecords-db-firestore`).
//!
//! ## Overview
//!
//! The main trait is [`DocumentStore`], a path-addressed hierarchical document
//! database:
//! - `list` / `get` to read collections and documents
//! - `add` (store-generated key) and `set` (known key) to create documents
//! - `update` to merge fields into an existing document
//! - `delete` to remove a document (idempotent, never cascading)
//!
//! ## Example
//!
//! ```ignore
//! use medrecords_storage::{CollectionPath, DocumentStore};
//!
//! let files = CollectionPath::root("patients")?.doc("p1")?.child("files")?;
//! let path = store.add(&files, fields).await?;
//! ```

mod error;
mod traits;
mod types;

pub use error::{ErrorCategory, StorageError};
pub use traits::DocumentStore;
pub use types::{CollectionPath, Document, DocumentPath, Fields};

/// Type alias for a storage result.
pub type StorageResult<T> = Result<T, StorageError>;

/// Type alias for a shared storage trait object.
pub type DynStore = std::sync::Arc<dyn DocumentStore>;

/// Prelude module for convenient imports.
///
/// ```ignore
/// use medrecords_storage::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{ErrorCategory, StorageError};
    pub use crate::traits::DocumentStore;
    pub use crate::types::{CollectionPath, Document, DocumentPath, Fields};
    pub use crate::{DynStore, StorageResult};
}
