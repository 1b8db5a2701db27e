//! # medrecords-graphql
//!
//! GraphQL layer of the medical-records gateway.
//!
//! Exposes a hierarchical records store (patients, their files, and the
//! comments on each file) through a GraphQL schema built with
//! async-graphql's dynamic API. Every field resolves against the injected
//! [`DocumentStore`](medrecords_storage::DocumentStore); nested fields
//! receive their resolved parent and list the sub-collection it addresses.
//!
//! ## Schema
//!
//! ```graphql
//! type Query {
//!   patients: [Patient!]!
//!   patient(id: ID!): Patient
//!   filesByPatient(id: ID!): [File!]!
//!   getFilesForPatient(id: ID!): [File!]! @deprecated
//! }
//!
//! type Mutation {
//!   addFile(filename: String!, gsRef: String!, patientID: String!): File!
//!   addComment(text: String!, author: String!, date: String!, fileID: String!, patientID: String!): Comment!
//!   deleteComment(commentID: String!, fileID: String!, patientID: String!): Comment
//! }
//!
//! type Patient { id: ID!  name: String  dob: String  files: [File!] }
//! type File { id: ID  filename: String  gsRef: String  comments: [Comment!]  patientID: String }
//! type Comment { id: ID  text: String  author: String  date: String }
//! ```
//!
//! Nullable fields that fail (`patient`, `deleteComment`, `Patient.files`,
//! `File.comments`) resolve to `null` with an error at their path.
//!
//! ## Configuration
//!
//! ```toml
//! [graphql]
//! introspection = true
//! playground = true
//! id_strategy = "client"
//! batch_loads = false
//! ```
//!
//! ## Modules
//!
//! - [`config`] - Configuration options
//! - [`schema`] - Schema registry
//! - [`resolvers`] - Field resolvers
//! - [`loaders`] - Request-scoped DataLoaders
//! - [`context`] - GraphQL execution context
//! - [`handler`] - Axum HTTP handlers
//! - [`error`] - Error types for GraphQL operations

pub mod config;
pub mod context;
pub mod error;
pub mod execution;
pub mod handler;
pub mod loaders;
pub mod model;
pub mod paths;
pub mod resolvers;
pub mod schema;

// Re-export main types
pub use config::{GraphQLConfig, IdStrategy};
pub use context::{GraphQLContext, GraphQLContextBuilder};
pub use error::GraphQLError;
pub use handler::{GraphQLState, graphql_handler, graphql_handler_get, graphql_routes};
pub use schema::{RecordsSchemaBuilder, SchemaBuilderConfig};

/// Result type for GraphQL operations.
pub type Result<T> = std::result::Result<T, GraphQLError>;

/// Builds the schema configured by `config`.
///
/// # Errors
///
/// Returns an error if schema construction fails.
pub fn build_schema(config: &GraphQLConfig) -> Result<async_graphql::dynamic::Schema> {
    RecordsSchemaBuilder::new(SchemaBuilderConfig::from(config)).build()
}
