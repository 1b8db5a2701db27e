//! Firestore REST client implementing `DocumentStore`.

use async_trait::async_trait;
use medrecords_storage::{
    CollectionPath, Document, DocumentPath, DocumentStore, Fields, StorageError,
};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::{Map, Value, json};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::{debug, trace};
use url::Url;

use crate::config::FirestoreConfig;
use crate::value::{decode_fields, encode_fields};

/// A document resource as returned by the REST API.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RestDocument {
    name: String,
    #[serde(default)]
    fields: Map<String, Value>,
    create_time: Option<String>,
    update_time: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListDocumentsResponse {
    #[serde(default)]
    documents: Vec<RestDocument>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RestErrorBody {
    error: RestError,
}

#[derive(Debug, Deserialize)]
struct RestError {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
}

/// Document store backed by Cloud Firestore (or its emulator) over REST.
#[derive(Debug, Clone)]
pub struct FirestoreStore {
    http_client: reqwest::Client,
    documents_url: Url,
    /// Resource-name prefix of every document (`projects/.../documents/`).
    name_prefix: String,
    access_token: Option<String>,
    page_size: u32,
}

impl FirestoreStore {
    /// Creates a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Internal` if the configuration is invalid or
    /// the HTTP client cannot be created.
    pub fn new(config: &FirestoreConfig) -> Result<Self, StorageError> {
        config.validate().map_err(StorageError::internal)?;

        let http_client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| StorageError::internal(format!("failed to create HTTP client: {e}")))?;

        let mut documents_url = Url::parse(&config.endpoint)
            .map_err(|e| StorageError::internal(format!("invalid endpoint: {e}")))?;
        documents_url
            .path_segments_mut()
            .map_err(|()| StorageError::internal("endpoint cannot be a base URL"))?
            .pop_if_empty()
            .extend([
                "v1",
                "projects",
                config.project_id.as_str(),
                "databases",
                config.database.as_str(),
                "documents",
            ]);

        Ok(Self {
            http_client,
            documents_url,
            name_prefix: format!(
                "projects/{}/databases/{}/documents/",
                config.project_id, config.database
            ),
            access_token: config.access_token.clone(),
            page_size: config.page_size,
        })
    }

    fn url_for(&self, segments: &[String]) -> Url {
        let mut url = self.documents_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.extend(segments);
        }
        url
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self
            .http_client
            .request(method, url)
            .header("Accept", "application/json");
        match &self.access_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, StorageError> {
        builder.send().await.map_err(|e| {
            tracing::warn!(error = %e, "Firestore request failed");
            StorageError::connection(e.to_string())
        })
    }

    async fn parse_document(&self, response: Response) -> Result<Document, StorageError> {
        let raw: RestDocument = response
            .json()
            .await
            .map_err(|e| StorageError::serialization(e.to_string()))?;
        self.to_document(raw)
    }

    fn to_document(&self, raw: RestDocument) -> Result<Document, StorageError> {
        let relative = raw.name.strip_prefix(&self.name_prefix).ok_or_else(|| {
            StorageError::serialization(format!("unexpected document name: {}", raw.name))
        })?;
        Ok(Document {
            path: DocumentPath::parse(relative)?,
            fields: decode_fields(&raw.fields)?,
            created_at: raw.create_time.as_deref().and_then(parse_timestamp),
            updated_at: raw.update_time.as_deref().and_then(parse_timestamp),
        })
    }
}

fn parse_timestamp(value: &str) -> Option<OffsetDateTime> {
    OffsetDateTime::parse(value, &Rfc3339).ok()
}

/// Formats a field name as a Firestore field path, quoting anything that is
/// not a plain identifier.
pub(crate) fn field_path(name: &str) -> String {
    let simple = name
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if simple {
        name.to_string()
    } else {
        format!("`{}`", name.replace('\\', "\\\\").replace('`', "\\`"))
    }
}

/// Converts a non-success response into a storage error.
async fn error_from_response(response: Response, path: &str) -> StorageError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let detail = serde_json::from_str::<RestErrorBody>(&body)
        .map(|b| b.error)
        .ok();

    if status == StatusCode::NOT_FOUND {
        return StorageError::not_found(path);
    }

    match detail {
        Some(err) if !err.message.is_empty() => {
            StorageError::backend(format!("{} ({}): {}", status.as_u16(), err.status, err.message))
        }
        _ => StorageError::backend(format!("{} for {path}", status.as_u16())),
    }
}

#[async_trait]
impl DocumentStore for FirestoreStore {
    async fn list(&self, collection: &CollectionPath) -> Result<Vec<Document>, StorageError> {
        let mut documents = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut url = self.url_for(collection.segments());
            url.query_pairs_mut()
                .append_pair("pageSize", &self.page_size.to_string());
            if let Some(token) = &page_token {
                url.query_pairs_mut().append_pair("pageToken", token);
            }

            trace!(collection = %collection, "Listing Firestore collection page");
            let response = self.send(self.request(Method::GET, url)).await?;
            if !response.status().is_success() {
                return Err(error_from_response(response, &collection.to_string()).await);
            }
            let page: ListDocumentsResponse = response
                .json()
                .await
                .map_err(|e| StorageError::serialization(e.to_string()))?;

            for raw in page.documents {
                documents.push(self.to_document(raw)?);
            }

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        debug!(collection = %collection, count = documents.len(), "Listed collection");
        Ok(documents)
    }

    async fn get(&self, document: &DocumentPath) -> Result<Option<Document>, StorageError> {
        let url = self.url_for(&segments_of(document));
        let response = self.send(self.request(Method::GET, url)).await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(error_from_response(response, &document.to_string()).await);
        }
        self.parse_document(response).await.map(Some)
    }

    async fn add(
        &self,
        collection: &CollectionPath,
        fields: Fields,
    ) -> Result<DocumentPath, StorageError> {
        let url = self.url_for(collection.segments());
        let body = json!({ "fields": encode_fields(&fields) });
        let response = self
            .send(self.request(Method::POST, url).json(&body))
            .await?;
        if !response.status().is_success() {
            return Err(error_from_response(response, &collection.to_string()).await);
        }

        let created = self.parse_document(response).await?;
        debug!(path = %created.path, "Created document with generated key");
        Ok(created.path)
    }

    async fn set(&self, document: &DocumentPath, fields: Fields) -> Result<(), StorageError> {
        let url = self.url_for(&segments_of(document));
        let body = json!({ "fields": encode_fields(&fields) });
        let response = self
            .send(self.request(Method::PATCH, url).json(&body))
            .await?;
        if !response.status().is_success() {
            return Err(error_from_response(response, &document.to_string()).await);
        }
        debug!(path = %document, "Wrote document");
        Ok(())
    }

    async fn update(&self, document: &DocumentPath, fields: Fields) -> Result<(), StorageError> {
        let mut url = self.url_for(&segments_of(document));
        {
            let mut query = url.query_pairs_mut();
            for name in fields.keys() {
                query.append_pair("updateMask.fieldPaths", &field_path(name));
            }
            query.append_pair("currentDocument.exists", "true");
        }

        let body = json!({ "fields": encode_fields(&fields) });
        let response = self
            .send(self.request(Method::PATCH, url).json(&body))
            .await?;
        if !response.status().is_success() {
            return Err(error_from_response(response, &document.to_string()).await);
        }
        debug!(path = %document, fields = fields.len(), "Patched document");
        Ok(())
    }

    async fn delete(&self, document: &DocumentPath) -> Result<(), StorageError> {
        let url = self.url_for(&segments_of(document));
        let response = self.send(self.request(Method::DELETE, url)).await?;
        // Firestore reports success for missing documents; tolerate 404 from
        // proxies and older emulators as well.
        if response.status().is_success() || response.status() == StatusCode::NOT_FOUND {
            debug!(path = %document, "Deleted document");
            return Ok(());
        }
        Err(error_from_response(response, &document.to_string()).await)
    }

    fn backend_name(&self) -> &'static str {
        "firestore"
    }
}

fn segments_of(document: &DocumentPath) -> Vec<String> {
    let mut segments = document.collection().segments().to_vec();
    segments.push(document.id().to_string());
    segments
}
