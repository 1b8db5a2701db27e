//! Store construction from configuration.

use std::path::Path;
use std::sync::Arc;

use medrecords_db_firestore::FirestoreStore;
use medrecords_db_memory::InMemoryStore;
use medrecords_storage::{DynStore, StorageError};

use crate::config::{StorageBackend, StorageConfig};

#[derive(Debug, thiserror::Error)]
pub enum StoreInitError {
    #[error("failed to read seed file {path}: {source}")]
    SeedRead {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("seed file {path} is not valid JSON: {source}")]
    SeedParse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("storage.firestore section is missing")]
    MissingFirestoreConfig,
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Creates the configured document store.
pub fn create_store(config: &StorageConfig) -> Result<DynStore, StoreInitError> {
    match config.backend {
        StorageBackend::Memory => {
            let store = InMemoryStore::new();
            if let Some(path) = &config.seed_file {
                let count = seed_from_file(&store, path)?;
                tracing::info!(path = %path.display(), documents = count, "Seeded in-memory store");
            }
            Ok(Arc::new(store))
        }
        StorageBackend::Firestore => {
            let fs = config
                .firestore
                .as_ref()
                .ok_or(StoreInitError::MissingFirestoreConfig)?;
            let store = FirestoreStore::new(fs)?;
            tracing::info!(
                project = %fs.project_id,
                database = %fs.database,
                endpoint = %fs.endpoint,
                "Using Firestore backend"
            );
            Ok(Arc::new(store))
        }
    }
}

fn seed_from_file(store: &InMemoryStore, path: &Path) -> Result<usize, StoreInitError> {
    let display = path.display().to_string();
    let raw = std::fs::read_to_string(path).map_err(|source| StoreInitError::SeedRead {
        path: display.clone(),
        source,
    })?;
    let documents: serde_json::Value =
        serde_json::from_str(&raw).map_err(|source| StoreInitError::SeedParse {
            path: display,
            source,
        })?;
    Ok(store.seed(&documents)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use medrecords_db_firestore::FirestoreConfig;
    use medrecords_storage::{CollectionPath, DocumentStore};

    #[tokio::test]
    async fn test_memory_store_with_seed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seed.json");
        std::fs::write(&path, r#"{"patients/p1": {"id": "p1", "name": "Ada"}}"#).unwrap();

        let store = create_store(&StorageConfig {
            seed_file: Some(path),
            ..StorageConfig::default()
        })
        .unwrap();
        assert_eq!(store.backend_name(), "memory");
        let patients = store
            .list(&CollectionPath::root("patients").unwrap())
            .await
            .unwrap();
        assert_eq!(patients.len(), 1);
    }

    #[test]
    fn test_missing_seed_file() {
        let err = create_store(&StorageConfig {
            seed_file: Some("/nonexistent/seed.json".into()),
            ..StorageConfig::default()
        })
        .err()
        .unwrap();
        assert!(matches!(err, StoreInitError::SeedRead { .. }));
    }

    #[test]
    fn test_malformed_seed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seed.json");
        std::fs::write(&path, "not json").unwrap();
        let err = create_store(&StorageConfig {
            seed_file: Some(path),
            ..StorageConfig::default()
        })
        .err()
        .unwrap();
        assert!(matches!(err, StoreInitError::SeedParse { .. }));
    }

    #[test]
    fn test_firestore_backend() {
        let store = create_store(&StorageConfig {
            backend: StorageBackend::Firestore,
            firestore: Some(FirestoreConfig::new("demo").with_endpoint("http://localhost:8080")),
            ..StorageConfig::default()
        })
        .unwrap();
        assert_eq!(store.backend_name(), "firestore");

        let err = create_store(&StorageConfig {
            backend: StorageBackend::Firestore,
            ..StorageConfig::default()
        })
        .err()
        .unwrap();
        assert!(matches!(err, StoreInitError::MissingFirestoreConfig));
    }
}
