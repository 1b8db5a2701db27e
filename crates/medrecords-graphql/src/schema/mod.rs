//! GraphQL schema registry.
//!
//! - [`RecordsSchemaBuilder`] - declares `Query`, `Mutation` and the entity
//!   types, binding each field to its resolver
//! - `types` - the `Patient`, `File` and `Comment` object types

mod builder;
mod types;

pub use builder::{RecordsSchemaBuilder, SchemaBuilderConfig};
pub use types::{COMMENT, FILE, PATIENT};
