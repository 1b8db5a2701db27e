//! Parent-to-child traversal resolvers.
//!
//! Each resolver receives its resolved parent and lists the sub-collection
//! addressed by the parent's keys. A failed listing nulls only that list.

use async_graphql::Error as GraphQLError;
use async_graphql::dynamic::{FieldFuture, FieldValue, ResolverContext};
use tracing::debug;

use super::{get_graphql_context, null_on_error, store_failure};
use crate::model::{Comment, File, Patient};

/// Resolvers for list fields on entity types.
pub struct NestedResolver;

impl NestedResolver {
    /// `Patient.files` lists `patients/{patient.id}/files`.
    pub fn patient_files()
    -> impl Fn(ResolverContext<'_>) -> FieldFuture<'_> + Send + Sync + Clone {
        |ctx| {
            FieldFuture::new(async move {
                let gql_ctx = get_graphql_context(&ctx)?;
                let patient = ctx.parent_value.try_downcast_ref::<Patient>()?;
                debug!(
                    request_id = %gql_ctx.request_id,
                    patient_id = %patient.id,
                    "Resolving Patient.files"
                );

                let resolved = async {
                    let collection = patient
                        .files_path()
                        .map_err(|e| store_failure(gql_ctx, "Patient.files", e))?;
                    let documents = gql_ctx
                        .list_collection(&collection)
                        .await
                        .map_err(|e| store_failure(gql_ctx, "Patient.files", e))?;

                    Ok::<_, GraphQLError>(Some(FieldValue::list(
                        documents
                            .iter()
                            .map(|doc| FieldValue::owned_any(File::from_document(doc))),
                    )))
                }
                .await;

                Ok(null_on_error(&ctx, resolved))
            })
        }
    }

    /// `File.comments` lists `patients/{file.patientID}/files/{file.id}/comments`.
    ///
    /// A file body missing either key resolves to an empty list without a
    /// store call.
    pub fn file_comments()
    -> impl Fn(ResolverContext<'_>) -> FieldFuture<'_> + Send + Sync + Clone {
        |ctx| {
            FieldFuture::new(async move {
                let gql_ctx = get_graphql_context(&ctx)?;
                let file = ctx.parent_value.try_downcast_ref::<File>()?;

                let Some(collection) = file.comments_path() else {
                    debug!(
                        request_id = %gql_ctx.request_id,
                        file_id = ?file.id,
                        patient_id = ?file.patient_id,
                        "File lacks ancestor keys, no comments to list"
                    );
                    return Ok(Some(FieldValue::list(Vec::<FieldValue>::new())));
                };

                let resolved = async {
                    let collection =
                        collection.map_err(|e| store_failure(gql_ctx, "File.comments", e))?;
                    debug!(
                        request_id = %gql_ctx.request_id,
                        collection = %collection,
                        "Resolving File.comments"
                    );

                    let documents = gql_ctx
                        .list_collection(&collection)
                        .await
                        .map_err(|e| store_failure(gql_ctx, "File.comments", e))?;

                    Ok::<_, GraphQLError>(Some(FieldValue::list(
                        documents
                            .iter()
                            .map(|doc| FieldValue::owned_any(Comment::from_document(doc))),
                    )))
                }
                .await;

                Ok(null_on_error(&ctx, resolved))
            })
        }
    }
}
