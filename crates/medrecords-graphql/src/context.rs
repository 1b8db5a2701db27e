//! GraphQL execution context.
//!
//! The context is built per request and holds everything resolvers need:
//! the injected store handle, the request id for log correlation, the
//! create strategy and, when batching is enabled, the request's loaders.
//!
//! # Example
//!
//! ```ignore
//! use medrecords_graphql::GraphQLContextBuilder;
//!
//! let context = GraphQLContextBuilder::new()
//!     .with_store(store.clone())
//!     .with_id_strategy(IdStrategy::Client)
//!     .with_request_id("req-123")
//!     .build()?;
//! ```

use std::sync::Arc;

use medrecords_storage::{CollectionPath, Document, DynStore, StorageError};

use crate::config::IdStrategy;
use crate::loaders::DataLoaders;

/// GraphQL execution context.
///
/// `Clone` and `Send + Sync`; shared state sits behind `Arc`.
#[derive(Clone)]
pub struct GraphQLContext {
    /// Document store backing every resolver.
    pub store: DynStore,

    /// Request ID for tracing and correlation.
    pub request_id: String,

    /// Key generation for created documents.
    pub id_strategy: IdStrategy,

    /// Request-scoped loaders, present when batching is enabled.
    pub loaders: Option<DataLoaders>,
}

impl GraphQLContext {
    /// Lists a collection, going through the collection loader when one is
    /// configured.
    ///
    /// # Errors
    ///
    /// Returns the store error unchanged.
    pub async fn list_collection(
        &self,
        collection: &CollectionPath,
    ) -> Result<Vec<Document>, Arc<StorageError>> {
        match &self.loaders {
            Some(loaders) => Ok(loaders
                .collection_loader
                .load_one(collection.clone())
                .await?
                .unwrap_or_default()),
            None => self.store.list(collection).await.map_err(Arc::new),
        }
    }

    /// Creates a new builder for GraphQLContext.
    #[must_use]
    pub fn builder() -> GraphQLContextBuilder {
        GraphQLContextBuilder::default()
    }
}

impl std::fmt::Debug for GraphQLContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphQLContext")
            .field("store", &self.store.backend_name())
            .field("request_id", &self.request_id)
            .field("id_strategy", &self.id_strategy)
            .field("loaders", &self.loaders)
            .finish()
    }
}

/// Builder for constructing GraphQLContext.
#[derive(Default)]
pub struct GraphQLContextBuilder {
    store: Option<DynStore>,
    request_id: Option<String>,
    id_strategy: IdStrategy,
    batch_loads: bool,
}

impl GraphQLContextBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the document store.
    #[must_use]
    pub fn with_store(mut self, store: DynStore) -> Self {
        self.store = Some(store);
        self
    }

    /// Sets the request ID.
    #[must_use]
    pub fn with_request_id(mut self, id: impl Into<String>) -> Self {
        self.request_id = Some(id.into());
        self
    }

    /// Sets the create strategy.
    #[must_use]
    pub fn with_id_strategy(mut self, strategy: IdStrategy) -> Self {
        self.id_strategy = strategy;
        self
    }

    /// Enables request-scoped collection batching.
    #[must_use]
    pub fn with_batch_loads(mut self, enabled: bool) -> Self {
        self.batch_loads = enabled;
        self
    }

    /// Builds the GraphQLContext.
    ///
    /// # Errors
    ///
    /// Returns an error if required fields are missing.
    pub fn build(self) -> Result<GraphQLContext, ContextBuilderError> {
        let store = self
            .store
            .ok_or(ContextBuilderError::MissingField("store"))?;

        let request_id = self
            .request_id
            .ok_or(ContextBuilderError::MissingField("request_id"))?;

        let loaders = self.batch_loads.then(|| DataLoaders::new(store.clone()));

        Ok(GraphQLContext {
            store,
            request_id,
            id_strategy: self.id_strategy,
            loaders,
        })
    }
}

/// Errors that can occur when building a GraphQLContext.
#[derive(Debug, thiserror::Error)]
pub enum ContextBuilderError {
    /// A required field was not provided.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;
    use medrecords_db_memory::InMemoryStore;
    use serde_json::json;

    fn store() -> DynStore {
        let store = InMemoryStore::new();
        store
            .seed(&json!({"patients/p1/files/f1": {"id": "f1"}}))
            .unwrap();
        Arc::new(store)
    }

    #[test]
    fn test_builder_missing_store() {
        let result = GraphQLContextBuilder::new()
            .with_request_id("req-123")
            .build();

        assert!(matches!(
            result,
            Err(ContextBuilderError::MissingField("store"))
        ));
    }

    #[test]
    fn test_builder_missing_request_id() {
        let result = GraphQLContextBuilder::new().with_store(store()).build();
        assert!(matches!(
            result,
            Err(ContextBuilderError::MissingField("request_id"))
        ));
    }

    #[test]
    fn test_loaders_follow_batch_flag() {
        let ctx = GraphQLContext::builder()
            .with_store(store())
            .with_request_id("r")
            .build()
            .unwrap();
        assert!(ctx.loaders.is_none());
        assert_eq!(ctx.id_strategy, IdStrategy::Client);

        let ctx = GraphQLContext::builder()
            .with_store(store())
            .with_request_id("r")
            .with_batch_loads(true)
            .with_id_strategy(IdStrategy::Store)
            .build()
            .unwrap();
        assert!(ctx.loaders.is_some());
        assert_eq!(ctx.id_strategy, IdStrategy::Store);
    }

    #[tokio::test]
    async fn test_list_collection_with_and_without_loader() {
        let files = CollectionPath::parse("patients/p1/files").unwrap();
        for batch in [false, true] {
            let ctx = GraphQLContext::builder()
                .with_store(store())
                .with_request_id("r")
                .with_batch_loads(batch)
                .build()
                .unwrap();
            let docs = ctx.list_collection(&files).await.unwrap();
            assert_eq!(docs.len(), 1);
        }
    }
}
