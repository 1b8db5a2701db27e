//! Root query resolvers.
//!
//! ```graphql
//! query {
//!   patients { id name }
//!   patient(id: "p1") { name dob }
//!   filesByPatient(id: "p1") { id filename }
//! }
//! ```

use async_graphql::Error as GraphQLError;
use async_graphql::dynamic::{FieldFuture, FieldValue, ResolverContext};
use tracing::{debug, trace};

use super::{get_graphql_context, null_on_error, store_failure, string_argument};
use crate::model::{File, Patient};
use crate::paths;

/// Resolvers for the root `Query` fields.
pub struct ReadResolver;

impl ReadResolver {
    /// `patients: [Patient!]!` lists every patient in store order.
    pub fn patients() -> impl Fn(ResolverContext<'_>) -> FieldFuture<'_> + Send + Sync + Clone {
        |ctx| {
            FieldFuture::new(async move {
                let gql_ctx = get_graphql_context(&ctx)?;
                debug!(request_id = %gql_ctx.request_id, "Resolving patients");

                let collection =
                    paths::patients().map_err(|e| store_failure(gql_ctx, "patients", e))?;
                let documents = gql_ctx
                    .list_collection(&collection)
                    .await
                    .map_err(|e| store_failure(gql_ctx, "patients", e))?;

                trace!(count = documents.len(), "Listed patients");
                Ok(Some(FieldValue::list(
                    documents
                        .iter()
                        .map(|doc| FieldValue::owned_any(Patient::from_document(doc))),
                )))
            })
        }
    }

    /// `patient(id: ID!): Patient` reads one patient, `null` when absent.
    pub fn patient() -> impl Fn(ResolverContext<'_>) -> FieldFuture<'_> + Send + Sync + Clone {
        |ctx| {
            FieldFuture::new(async move {
                let gql_ctx = get_graphql_context(&ctx)?;
                let id = string_argument(&ctx, "id")?;
                debug!(request_id = %gql_ctx.request_id, patient_id = %id, "Resolving patient");

                let resolved = async {
                    let path =
                        paths::patient(&id).map_err(|e| store_failure(gql_ctx, "patient", e))?;
                    let document = gql_ctx
                        .store
                        .get(&path)
                        .await
                        .map_err(|e| store_failure(gql_ctx, "patient", e))?;

                    if document.is_none() {
                        trace!(patient_id = %id, "Patient not found");
                    }
                    Ok::<_, GraphQLError>(
                        document.map(|doc| FieldValue::owned_any(Patient::from_document(&doc))),
                    )
                }
                .await;

                Ok(null_on_error(&ctx, resolved))
            })
        }
    }

    /// `filesByPatient(id: ID!): [File!]!` lists a patient's files.
    ///
    /// Also serves the deprecated `getFilesForPatient` alias.
    pub fn files_by_patient()
    -> impl Fn(ResolverContext<'_>) -> FieldFuture<'_> + Send + Sync + Clone {
        |ctx| {
            FieldFuture::new(async move {
                let gql_ctx = get_graphql_context(&ctx)?;
                let id = string_argument(&ctx, "id")?;
                debug!(
                    request_id = %gql_ctx.request_id,
                    patient_id = %id,
                    field = %ctx.field().name(),
                    "Resolving files for patient"
                );

                let collection =
                    paths::files(&id).map_err(|e| store_failure(gql_ctx, "filesByPatient", e))?;
                let documents = gql_ctx
                    .list_collection(&collection)
                    .await
                    .map_err(|e| store_failure(gql_ctx, "filesByPatient", e))?;

                Ok(Some(FieldValue::list(
                    documents
                        .iter()
                        .map(|doc| FieldValue::owned_any(File::from_document(doc))),
                )))
            })
        }
    }
}
