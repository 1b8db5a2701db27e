//! HTTP host for the medical-records GraphQL gateway.
//!
//! Loads [`AppConfig`], creates the configured document store and serves the
//! GraphQL endpoint at `/` next to a `/healthz` health check.

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod observability;
pub mod server;
pub mod storage;

pub use config::{AppConfig, LoggingConfig, ServerConfig, StorageBackend, StorageConfig};
pub use observability::{apply_logging_level, init_tracing};
pub use server::{MedRecordsServer, ServerBuilder, build_app};
pub use storage::{StoreInitError, create_store};
