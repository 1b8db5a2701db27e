//! Cloud Firestore storage backend for the medical-records gateway.
//!
//! Implements `DocumentStore` over the Firestore REST API (v1). Point
//! [`FirestoreConfig::endpoint`] at the Firestore emulator for local work;
//! production deployments supply an OAuth2 bearer token through
//! [`FirestoreConfig::access_token`].
//!
//! # Example
//!
//! ```ignore
//! use medrecords_db_firestore::{FirestoreConfig, FirestoreStore};
//!
//! let store = FirestoreStore::new(
//!     &FirestoreConfig::new("demo-project").with_endpoint("http://localhost:8080"),
//! )?;
//! ```

pub mod config;
mod store;
pub mod value;

pub use config::FirestoreConfig;
pub use store::FirestoreStore;
