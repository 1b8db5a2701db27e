//! Create mutation resolvers.
//!
//! ```graphql
//! mutation {
//!   addFile(filename: "scan.png", gsRef: "gs://bucket/scan.png", patientID: "p1") { id }
//!   addComment(text: "ok", author: "dr", date: "2024-01-01", fileID: "f1", patientID: "p1") { id }
//! }
//! ```
//!
//! The written body always carries `id` equal to the document key. Which
//! write sequence produces it depends on [`IdStrategy`].

use async_graphql::dynamic::{FieldFuture, FieldValue, ResolverContext};
use medrecords_storage::{CollectionPath, Fields, StorageError};
use serde_json::Value;
use tracing::{debug, trace};
use uuid::Uuid;

use super::{get_graphql_context, store_failure, string_argument};
use crate::config::IdStrategy;
use crate::context::GraphQLContext;
use crate::model::{Comment, File, fields};
use crate::paths;

/// Resolvers for the create mutations.
pub struct CreateResolver;

impl CreateResolver {
    /// `addFile(filename, gsRef, patientID): File!`
    ///
    /// The target collection and the stored `patientID` come from the same
    /// argument.
    pub fn add_file() -> impl Fn(ResolverContext<'_>) -> FieldFuture<'_> + Send + Sync + Clone {
        |ctx| {
            FieldFuture::new(async move {
                let gql_ctx = get_graphql_context(&ctx)?;
                let filename = string_argument(&ctx, "filename")?;
                let gs_ref = string_argument(&ctx, "gsRef")?;
                let patient_id = string_argument(&ctx, "patientID")?;
                debug!(
                    request_id = %gql_ctx.request_id,
                    patient_id = %patient_id,
                    "Processing addFile mutation"
                );

                let collection =
                    paths::files(&patient_id).map_err(|e| store_failure(gql_ctx, "addFile", e))?;

                let mut body = Fields::new();
                body.insert(fields::FILENAME.into(), Value::String(filename));
                body.insert(fields::GS_REF.into(), Value::String(gs_ref));
                body.insert(fields::PATIENT_ID.into(), Value::String(patient_id));

                let written = create_document(gql_ctx, &collection, body)
                    .await
                    .map_err(|e| store_failure(gql_ctx, "addFile", e))?;

                Ok(Some(FieldValue::owned_any(File::from_fields(&written))))
            })
        }
    }

    /// `addComment(text, author, date, fileID, patientID): Comment!`
    ///
    /// The ancestor ids only select the collection; they are not stored.
    pub fn add_comment() -> impl Fn(ResolverContext<'_>) -> FieldFuture<'_> + Send + Sync + Clone
    {
        |ctx| {
            FieldFuture::new(async move {
                let gql_ctx = get_graphql_context(&ctx)?;
                let text = string_argument(&ctx, "text")?;
                let author = string_argument(&ctx, "author")?;
                let date = string_argument(&ctx, "date")?;
                let file_id = string_argument(&ctx, "fileID")?;
                let patient_id = string_argument(&ctx, "patientID")?;
                debug!(
                    request_id = %gql_ctx.request_id,
                    patient_id = %patient_id,
                    file_id = %file_id,
                    "Processing addComment mutation"
                );

                let collection = paths::comments(&patient_id, &file_id)
                    .map_err(|e| store_failure(gql_ctx, "addComment", e))?;

                let mut body = Fields::new();
                body.insert(fields::TEXT.into(), Value::String(text));
                body.insert(fields::AUTHOR.into(), Value::String(author));
                body.insert(fields::DATE.into(), Value::String(date));

                let written = create_document(gql_ctx, &collection, body)
                    .await
                    .map_err(|e| store_failure(gql_ctx, "addComment", e))?;

                Ok(Some(FieldValue::owned_any(Comment::from_fields(&written))))
            })
        }
    }
}

/// Writes a new document into `collection` and returns the body as stored,
/// `id` included.
pub(crate) async fn create_document(
    gql_ctx: &GraphQLContext,
    collection: &CollectionPath,
    mut body: Fields,
) -> Result<Fields, StorageError> {
    match gql_ctx.id_strategy {
        IdStrategy::Client => {
            let path = collection.doc(Uuid::new_v4().to_string())?;
            body.insert(fields::ID.into(), Value::String(path.id().to_string()));
            gql_ctx.store.set(&path, body.clone()).await?;
            debug!(path = %path, "Created document with client key");
        }
        IdStrategy::Store => {
            let path = gql_ctx.store.add(collection, body.clone()).await?;
            trace!(path = %path, "Store assigned key, writing it back");

            let mut patch = Fields::new();
            patch.insert(fields::ID.into(), Value::String(path.id().to_string()));
            gql_ctx.store.update(&path, patch).await?;

            body.insert(fields::ID.into(), Value::String(path.id().to_string()));
            debug!(path = %path, "Created document with store key");
        }
    }
    Ok(body)
}
