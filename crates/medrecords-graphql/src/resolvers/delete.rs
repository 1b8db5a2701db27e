//! Delete mutation resolver.

use async_graphql::Error as GraphQLError;
use async_graphql::dynamic::{FieldFuture, FieldValue, ResolverContext};
use tracing::debug;

use super::{get_graphql_context, null_on_error, store_failure, string_argument};
use crate::model::Comment;
use crate::paths;

/// Resolver for `deleteComment`.
///
/// ```graphql
/// mutation {
///   deleteComment(commentID: "c1", fileID: "f1", patientID: "p1") { id text }
/// }
/// ```
pub struct DeleteResolver;

impl DeleteResolver {
    /// `deleteComment(commentID, fileID, patientID): Comment`
    ///
    /// Reads the comment first so its last-known values can be returned, then
    /// deletes unconditionally. Deleting a missing comment resolves to `null`.
    pub fn delete_comment()
    -> impl Fn(ResolverContext<'_>) -> FieldFuture<'_> + Send + Sync + Clone {
        |ctx| {
            FieldFuture::new(async move {
                let gql_ctx = get_graphql_context(&ctx)?;
                let comment_id = string_argument(&ctx, "commentID")?;
                let file_id = string_argument(&ctx, "fileID")?;
                let patient_id = string_argument(&ctx, "patientID")?;

                let resolved = async {
                    let path = paths::comment(&patient_id, &file_id, &comment_id)
                        .map_err(|e| store_failure(gql_ctx, "deleteComment", e))?;
                    debug!(request_id = %gql_ctx.request_id, path = %path, "Processing deleteComment mutation");

                    let previous = gql_ctx
                        .store
                        .get(&path)
                        .await
                        .map_err(|e| store_failure(gql_ctx, "deleteComment", e))?;
                    gql_ctx
                        .store
                        .delete(&path)
                        .await
                        .map_err(|e| store_failure(gql_ctx, "deleteComment", e))?;

                    debug!(path = %path, existed = previous.is_some(), "Comment deleted");
                    Ok::<_, GraphQLError>(
                        previous.map(|doc| FieldValue::owned_any(Comment::from_document(&doc))),
                    )
                }
                .await;

                Ok(null_on_error(&ctx, resolved))
            })
        }
    }
}
