//! GraphQL resolvers for the records hierarchy.
//!
//! - `read`: root queries (`patients`, `patient`, `filesByPatient`)
//! - `nested`: parent-to-child traversal (`Patient.files`, `File.comments`)
//! - `create`: `addFile` and `addComment`
//! - `delete`: `deleteComment`
//!
//! Every resolver that touches the store logs the failure and re-raises it
//! as a plain GraphQL error carrying only the store's message. Nullable
//! fields record that error at their own path and resolve to `null`, so a
//! failing branch leaves its siblings intact.

mod create;
mod delete;
mod nested;
mod read;

pub use create::CreateResolver;
pub use delete::DeleteResolver;
pub use nested::NestedResolver;
pub use read::ReadResolver;

use std::borrow::Borrow;

use async_graphql::dynamic::{FieldValue, ResolverContext};
use async_graphql::{Error as GraphQLError, Value};
use tracing::warn;

use medrecords_storage::StorageError;

use crate::context::GraphQLContext;

/// Helper to extract GraphQL context from resolver context.
pub(crate) fn get_graphql_context<'a>(
    ctx: &'a ResolverContext<'_>,
) -> Result<&'a GraphQLContext, GraphQLError> {
    ctx.data::<GraphQLContext>()
        .map_err(|_| GraphQLError::new("GraphQL context not available"))
}

/// Logs a store failure and converts it into a request error.
pub(crate) fn store_failure(
    gql_ctx: &GraphQLContext,
    operation: &'static str,
    error: impl Borrow<StorageError>,
) -> GraphQLError {
    let error = error.borrow();
    warn!(
        request_id = %gql_ctx.request_id,
        operation,
        category = %error.category(),
        error = %error,
        "Store operation failed"
    );
    GraphQLError::new(error.to_string())
}

/// Settles a nullable field.
///
/// The dynamic executor drops a field whose resolver returns `Err` from its
/// parent object and reports the error without a path. Failures are recorded
/// here instead, at the field's path, and the field resolves to `null`.
pub(crate) fn null_on_error<'a>(
    ctx: &ResolverContext<'_>,
    resolved: Result<Option<FieldValue<'a>>, GraphQLError>,
) -> Option<FieldValue<'a>> {
    resolved.unwrap_or_else(|error| {
        ctx.add_error(ctx.set_error_path(error.into_server_error(ctx.item.pos)));
        None
    })
}

/// Reads a required `ID!` or `String!` argument as text.
///
/// `ID` accepts integer literals, which arrive as numbers.
pub(crate) fn string_argument(
    ctx: &ResolverContext<'_>,
    name: &str,
) -> Result<String, GraphQLError> {
    match ctx.args.try_get(name)?.as_value() {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        _ => Err(GraphQLError::new(format!(
            "Argument '{name}' must be a string"
        ))),
    }
}
