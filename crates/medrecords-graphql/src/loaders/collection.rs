//! Collection DataLoader for batched collection listing.

use std::collections::HashMap;
use std::sync::Arc;

use async_graphql::dataloader::Loader;
use futures_util::future::try_join_all;
use medrecords_storage::{CollectionPath, Document, DynStore, StorageError};
use tracing::{debug, instrument, warn};

/// DataLoader listing collections by path.
///
/// Keys are deduplicated by the DataLoader, so a collection requested by
/// several resolvers in one batch is read once.
pub struct CollectionLoader {
    store: DynStore,
}

impl CollectionLoader {
    /// Creates a new collection loader.
    #[must_use]
    pub fn new(store: DynStore) -> Self {
        Self { store }
    }
}

impl Loader<CollectionPath> for CollectionLoader {
    type Value = Vec<Document>;
    type Error = Arc<StorageError>;

    #[instrument(skip(self, keys), fields(key_count = keys.len()))]
    async fn load(
        &self,
        keys: &[CollectionPath],
    ) -> Result<HashMap<CollectionPath, Self::Value>, Self::Error> {
        debug!(key_count = keys.len(), "Loading collections batch");

        let listings = try_join_all(keys.iter().map(|key| async move {
            let documents = self.store.list(key).await?;
            Ok::<_, StorageError>((key.clone(), documents))
        }))
        .await
        .map_err(|e| {
            warn!(error = %e, "Collection batch load failed");
            Arc::new(e)
        })?;

        Ok(listings.into_iter().collect())
    }
}
