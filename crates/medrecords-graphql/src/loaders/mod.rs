//! DataLoaders for request-scoped batched collection reads.
//!
//! When `graphql.batch_loads` is on, every request gets a
//! [`CollectionLoader`]. Resolvers listing the same collection within one
//! batch window (for example two `patient` aliases selecting `files`) share a
//! single store round-trip, and distinct collections in the window are read
//! concurrently.

mod collection;

pub use collection::CollectionLoader;

use std::sync::Arc;

use async_graphql::dataloader::DataLoader;
use medrecords_storage::DynStore;

/// Collection of all DataLoaders for a GraphQL request.
///
/// Created once per request so caching never leaks across requests.
#[derive(Clone)]
pub struct DataLoaders {
    /// Loader for listing collections by path.
    pub collection_loader: Arc<DataLoader<CollectionLoader>>,
}

impl DataLoaders {
    /// Creates a new set of DataLoaders over `store`.
    #[must_use]
    pub fn new(store: DynStore) -> Self {
        Self {
            collection_loader: Arc::new(DataLoader::new(
                CollectionLoader::new(store),
                tokio::spawn,
            )),
        }
    }

    /// Creates DataLoaders with a custom batch delay.
    #[must_use]
    pub fn with_delay(store: DynStore, delay: std::time::Duration) -> Self {
        Self {
            collection_loader: Arc::new(
                DataLoader::new(CollectionLoader::new(store), tokio::spawn).delay(delay),
            ),
        }
    }
}

impl std::fmt::Debug for DataLoaders {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataLoaders")
            .field("collection_loader", &"DataLoader<CollectionLoader>")
            .finish()
    }
}
