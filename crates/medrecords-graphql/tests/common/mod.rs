//! Shared fixtures for the GraphQL integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_graphql::Request;
use async_graphql::dynamic::Schema;
use medrecords_db_memory::InMemoryStore;
use medrecords_graphql::{GraphQLConfig, GraphQLContextBuilder, IdStrategy, build_schema};
use medrecords_storage::{
    CollectionPath, Document, DocumentPath, DocumentStore, DynStore, Fields, StorageError,
};
use serde_json::{Value, json};

// =============================================================================
// Stores
// =============================================================================

/// A store where every operation fails with a backend error.
#[derive(Default)]
pub struct FailingStore {
    pub calls: AtomicUsize,
}

impl FailingStore {
    pub const MESSAGE: &'static str = "firestore unavailable";

    fn fail<T>(&self) -> Result<T, StorageError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(StorageError::backend(Self::MESSAGE))
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl DocumentStore for FailingStore {
    async fn list(&self, _: &CollectionPath) -> Result<Vec<Document>, StorageError> {
        self.fail()
    }
    async fn get(&self, _: &DocumentPath) -> Result<Option<Document>, StorageError> {
        self.fail()
    }
    async fn add(&self, _: &CollectionPath, _: Fields) -> Result<DocumentPath, StorageError> {
        self.fail()
    }
    async fn set(&self, _: &DocumentPath, _: Fields) -> Result<(), StorageError> {
        self.fail()
    }
    async fn update(&self, _: &DocumentPath, _: Fields) -> Result<(), StorageError> {
        self.fail()
    }
    async fn delete(&self, _: &DocumentPath) -> Result<(), StorageError> {
        self.fail()
    }
    fn backend_name(&self) -> &'static str {
        "failing"
    }
}

/// Wraps an in-memory store, failing only listings of one collection id.
pub struct ListOutageStore {
    pub inner: InMemoryStore,
    pub collection: &'static str,
}

impl ListOutageStore {
    pub fn new(inner: InMemoryStore, collection: &'static str) -> Self {
        Self { inner, collection }
    }

    pub fn message(&self) -> String {
        format!("Connection error: {} backend timed out", self.collection)
    }
}

#[async_trait::async_trait]
impl DocumentStore for ListOutageStore {
    async fn list(&self, c: &CollectionPath) -> Result<Vec<Document>, StorageError> {
        if c.collection_id() == self.collection {
            return Err(StorageError::connection(format!(
                "{} backend timed out",
                self.collection
            )));
        }
        self.inner.list(c).await
    }
    async fn get(&self, d: &DocumentPath) -> Result<Option<Document>, StorageError> {
        self.inner.get(d).await
    }
    async fn add(&self, c: &CollectionPath, f: Fields) -> Result<DocumentPath, StorageError> {
        self.inner.add(c, f).await
    }
    async fn set(&self, d: &DocumentPath, f: Fields) -> Result<(), StorageError> {
        self.inner.set(d, f).await
    }
    async fn update(&self, d: &DocumentPath, f: Fields) -> Result<(), StorageError> {
        self.inner.update(d, f).await
    }
    async fn delete(&self, d: &DocumentPath) -> Result<(), StorageError> {
        self.inner.delete(d).await
    }
    fn backend_name(&self) -> &'static str {
        "list-outage"
    }
}

/// Two patients; Ada has one file with one comment, Grace has nothing.
pub fn seeded_store() -> Arc<InMemoryStore> {
    let store = InMemoryStore::new();
    store
        .seed(&json!({
            "patients/p1": {"id": "p1", "name": "Ada Lovelace", "dob": "1815-12-10"},
            "patients/p2": {"id": "p2", "name": "Grace Hopper", "dob": "1906-12-09"},
            "patients/p1/files/f1": {
                "id": "f1",
                "filename": "xray.png",
                "gsRef": "gs://records/p1/xray.png",
                "patientID": "p1"
            },
            "patients/p1/files/f1/comments/c1": {
                "id": "c1",
                "text": "No fracture",
                "author": "dr.who",
                "date": "2024-03-01"
            }
        }))
        .unwrap();
    Arc::new(store)
}

// =============================================================================
// Execution
// =============================================================================

pub struct Harness {
    pub schema: Schema,
    pub store: DynStore,
    pub config: GraphQLConfig,
}

impl Harness {
    pub fn new(store: DynStore) -> Self {
        Self::with_config(store, GraphQLConfig::default())
    }

    pub fn with_strategy(store: DynStore, id_strategy: IdStrategy) -> Self {
        Self::with_config(
            store,
            GraphQLConfig {
                id_strategy,
                ..GraphQLConfig::default()
            },
        )
    }

    pub fn with_config(store: DynStore, config: GraphQLConfig) -> Self {
        Self {
            schema: build_schema(&config).unwrap(),
            store,
            config,
        }
    }

    /// Executes `query` and returns the response serialized as JSON.
    pub async fn execute(&self, query: &str) -> Value {
        let context = GraphQLContextBuilder::new()
            .with_store(self.store.clone())
            .with_request_id("test-request")
            .with_id_strategy(self.config.id_strategy)
            .with_batch_loads(self.config.batch_loads)
            .build()
            .unwrap();

        let response = self.schema.execute(Request::new(query).data(context)).await;
        serde_json::to_value(&response).unwrap()
    }

    /// Executes `query` and returns `data`, asserting there were no errors.
    pub async fn data(&self, query: &str) -> Value {
        let response = self.execute(query).await;
        assert!(
            response.get("errors").is_none(),
            "unexpected errors: {}",
            response["errors"]
        );
        response["data"].clone()
    }
}
