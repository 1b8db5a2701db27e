//! In-memory document storage backend for the medical-records gateway.
//!
//! This crate provides an in-memory implementation of the `DocumentStore`
//! trait from `medrecords-storage`, using a dashmap of insertion-ordered
//! collections for concurrent access. It backs local development and tests.
//!
//! # Example
//!
//! ```ignore
//! use medrecords_db_memory::InMemoryStore;
//! use medrecords_storage::{CollectionPath, DocumentStore};
//!
//! let store = InMemoryStore::new();
//! store.seed(&serde_json::json!({
//!     "patients/p1": {"id": "p1", "name": "Ada Lovelace"}
//! }))?;
//! let patients = store.list(&CollectionPath::root("patients")?).await?;
//! ```

mod document_impl;
pub mod storage;

// Re-export the DocumentStore trait for convenience
pub use medrecords_storage::{DocumentStore, StorageError};

pub use storage::InMemoryStore;
