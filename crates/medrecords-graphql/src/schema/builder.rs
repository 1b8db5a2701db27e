//! Records GraphQL schema builder.
//!
//! Declares the entity types and the operations clients may invoke, and
//! binds every field to its resolver. Uses async-graphql's dynamic schema
//! API.

use async_graphql::dynamic::{Field, InputValue, Object, Schema, SchemaBuilder, TypeRef};
use tracing::debug;

use super::types::{COMMENT, FILE, PATIENT, comment_type, file_type, patient_type};
use crate::config::GraphQLConfig;
use crate::error::GraphQLError;
use crate::execution::TrackExecution;
use crate::resolvers::{CreateResolver, DeleteResolver, ReadResolver};

/// Configuration for the schema builder.
#[derive(Debug, Clone)]
pub struct SchemaBuilderConfig {
    /// Whether to enable introspection queries.
    pub introspection_enabled: bool,
}

impl Default for SchemaBuilderConfig {
    fn default() -> Self {
        Self {
            introspection_enabled: true,
        }
    }
}

impl From<&GraphQLConfig> for SchemaBuilderConfig {
    fn from(config: &GraphQLConfig) -> Self {
        Self {
            introspection_enabled: config.introspection,
        }
    }
}

/// Builds the records GraphQL schema.
///
/// # Example
///
/// ```ignore
/// let schema = RecordsSchemaBuilder::new(SchemaBuilderConfig::default()).build()?;
/// ```
pub struct RecordsSchemaBuilder {
    config: SchemaBuilderConfig,
}

impl RecordsSchemaBuilder {
    /// Creates a new schema builder.
    #[must_use]
    pub fn new(config: SchemaBuilderConfig) -> Self {
        Self { config }
    }

    /// Builds the GraphQL schema.
    ///
    /// # Errors
    ///
    /// Returns an error if schema construction fails.
    pub fn build(&self) -> Result<Schema, GraphQLError> {
        debug!("Starting GraphQL schema build");

        let mut schema_builder = Schema::build("Query", Some("Mutation"), None);
        schema_builder = self.register_entity_types(schema_builder);
        schema_builder = schema_builder.register(self.build_query_type());
        schema_builder = schema_builder.register(self.build_mutation_type());
        schema_builder = schema_builder.extension(TrackExecution);

        if !self.config.introspection_enabled {
            schema_builder = schema_builder.disable_introspection();
        }

        let schema = schema_builder
            .finish()
            .map_err(|e| GraphQLError::SchemaBuildFailed(e.to_string()))?;

        debug!("GraphQL schema build complete");
        Ok(schema)
    }

    fn register_entity_types(&self, builder: SchemaBuilder) -> SchemaBuilder {
        builder
            .register(patient_type())
            .register(file_type())
            .register(comment_type())
    }

    fn build_query_type(&self) -> Object {
        let id_arg = || InputValue::new("id", TypeRef::named_nn(TypeRef::ID));

        Object::new("Query")
            .field(
                Field::new(
                    "patients",
                    TypeRef::named_nn_list_nn(PATIENT),
                    ReadResolver::patients(),
                )
                .description("All patients"),
            )
            .field(
                Field::new("patient", TypeRef::named(PATIENT), ReadResolver::patient())
                    .argument(id_arg())
                    .description("A single patient, or null if none exists"),
            )
            .field(
                Field::new(
                    "filesByPatient",
                    TypeRef::named_nn_list_nn(FILE),
                    ReadResolver::files_by_patient(),
                )
                .argument(id_arg().description("Patient id"))
                .description("Files stored under a patient"),
            )
            .field(
                Field::new(
                    "getFilesForPatient",
                    TypeRef::named_nn_list_nn(FILE),
                    ReadResolver::files_by_patient(),
                )
                .argument(id_arg().description("Patient id"))
                .deprecation(Some("Use filesByPatient")),
            )
    }

    fn build_mutation_type(&self) -> Object {
        let required = |name: &str| InputValue::new(name, TypeRef::named_nn(TypeRef::STRING));

        Object::new("Mutation")
            .field(
                Field::new("addFile", TypeRef::named_nn(FILE), CreateResolver::add_file())
                    .argument(required("filename"))
                    .argument(required("gsRef"))
                    .argument(required("patientID"))
                    .description("Creates a file under a patient"),
            )
            .field(
                Field::new(
                    "addComment",
                    TypeRef::named_nn(COMMENT),
                    CreateResolver::add_comment(),
                )
                .argument(required("text"))
                .argument(required("author"))
                .argument(required("date"))
                .argument(required("fileID"))
                .argument(required("patientID"))
                .description("Creates a comment on a file"),
            )
            .field(
                Field::new(
                    "deleteComment",
                    TypeRef::named(COMMENT),
                    DeleteResolver::delete_comment(),
                )
                .argument(required("commentID"))
                .argument(required("fileID"))
                .argument(required("patientID"))
                .description("Deletes a comment, returning its last-known values"),
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_builds() {
        let schema = RecordsSchemaBuilder::new(SchemaBuilderConfig::default())
            .build()
            .unwrap();
        let sdl = schema.sdl();
        assert!(sdl.contains("type Patient"));
        assert!(sdl.contains("patient(id: ID!): Patient"));
        assert!(sdl.contains("filesByPatient("));
        assert!(sdl.contains("deleteComment("));
        assert!(sdl.contains("@deprecated"));
        assert!(sdl.contains("files: [File!]\n"));
        assert!(sdl.contains("comments: [Comment!]\n"));
    }

    #[test]
    fn test_introspection_can_be_disabled() {
        let schema = RecordsSchemaBuilder::new(SchemaBuilderConfig {
            introspection_enabled: false,
        })
        .build()
        .unwrap();
        let response =
            tokio_test::block_on(schema.execute("{ __schema { queryType { name } } }"));
        assert!(!response.errors.is_empty());
    }
}
