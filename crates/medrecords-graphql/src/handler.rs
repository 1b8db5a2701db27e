//! Axum HTTP handlers for the GraphQL endpoint.
//!
//! - `POST /` - execute a JSON-encoded request
//! - `GET /?query=...` - execute a request from URL parameters
//! - `GET /` without `query` - GraphiQL, when the playground is enabled
//!
//! Execution errors are reported in the response body with status 200.
//! Transport errors (bad parameters) get a 4xx status.

use async_graphql::dynamic::Schema;
use async_graphql::http::GraphiQLSource;
use async_graphql::{Request, Response, Variables};
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{Html, IntoResponse};
use axum::routing::get;
use axum::{Json, Router};
use medrecords_storage::DynStore;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::GraphQLConfig;
use crate::context::GraphQLContextBuilder;
use crate::error::GraphQLError;
use crate::execution::ExecutionMarker;

/// Header carrying the request id assigned by the server middleware.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// State shared across GraphQL handlers.
#[derive(Clone)]
pub struct GraphQLState {
    /// The executable schema.
    pub schema: Schema,

    /// Store injected into every request context.
    pub store: DynStore,

    /// GraphQL settings (playground, create strategy, batching).
    pub config: GraphQLConfig,
}

impl GraphQLState {
    #[must_use]
    pub fn new(schema: Schema, store: DynStore, config: GraphQLConfig) -> Self {
        Self {
            schema,
            store,
            config,
        }
    }
}

/// Routes serving the GraphQL endpoint at `/`.
pub fn graphql_routes(state: GraphQLState) -> Router {
    Router::new()
        .route("/", get(graphql_handler_get).post(graphql_handler))
        .with_state(state)
}

/// GraphQL request body.
#[derive(Debug, Deserialize)]
pub struct GraphQLRequest {
    /// The GraphQL query string.
    pub query: String,

    /// Optional operation name for multi-operation documents.
    #[serde(rename = "operationName")]
    pub operation_name: Option<String>,

    /// Optional variables for the query.
    pub variables: Option<serde_json::Value>,
}

/// Query parameters for GET requests.
#[derive(Debug, Deserialize)]
pub struct GraphQLQueryParams {
    /// The GraphQL query string.
    pub query: Option<String>,

    /// Optional operation name.
    #[serde(rename = "operationName")]
    pub operation_name: Option<String>,

    /// Optional variables (JSON string).
    pub variables: Option<String>,
}

/// Serialized GraphQL response.
///
/// `data` is present, possibly `null`, once execution started. Requests
/// rejected during parsing or validation carry only `errors`.
#[derive(Debug, Serialize)]
pub struct GraphQLResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<serde_json::Value>,
}

impl GraphQLResponse {
    #[must_use]
    pub fn new(resp: Response, executed: bool) -> Self {
        let data = executed.then(|| {
            serde_json::to_value(&resp.data).unwrap_or(serde_json::Value::Null)
        });

        // message, locations and path; extensions only when a resolver set them
        let errors = resp
            .errors
            .iter()
            .map(|e| {
                serde_json::to_value(e)
                    .unwrap_or_else(|_| serde_json::json!({ "message": e.message }))
            })
            .collect();

        Self { data, errors }
    }
}

/// Handles `POST /`.
pub async fn graphql_handler(
    State(state): State<GraphQLState>,
    headers: HeaderMap,
    Json(request): Json<GraphQLRequest>,
) -> axum::response::Response {
    debug!("Processing GraphQL request");
    execute_graphql(&state, &headers, request).await
}

/// Handles `GET /`.
///
/// Without a `query` parameter this serves GraphiQL when the playground is
/// enabled.
pub async fn graphql_handler_get(
    State(state): State<GraphQLState>,
    headers: HeaderMap,
    Query(params): Query<GraphQLQueryParams>,
) -> axum::response::Response {
    if params.query.is_none() {
        if state.config.playground {
            return Html(GraphiQLSource::build().endpoint("/").finish()).into_response();
        }
        return error_response(GraphQLError::InvalidQuery(
            "missing 'query' parameter".into(),
        ));
    }

    let request = match params_to_request(params) {
        Ok(req) => req,
        Err(e) => {
            return error_response(GraphQLError::InvalidQuery(format!(
                "invalid 'variables' parameter: {e}"
            )));
        }
    };

    debug!("Processing GraphQL GET request");
    execute_graphql(&state, &headers, request).await
}

/// Executes a GraphQL request.
async fn execute_graphql(
    state: &GraphQLState,
    headers: &HeaderMap,
    request: GraphQLRequest,
) -> axum::response::Response {
    let request_id = headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    let context = match GraphQLContextBuilder::new()
        .with_store(state.store.clone())
        .with_request_id(request_id)
        .with_id_strategy(state.config.id_strategy)
        .with_batch_loads(state.config.batch_loads)
        .build()
    {
        Ok(ctx) => ctx,
        Err(e) => return error_response(GraphQLError::Internal(e.to_string())),
    };

    let mut gql_request = Request::new(&request.query);

    if let Some(op_name) = request.operation_name {
        gql_request = gql_request.operation_name(op_name);
    }

    if let Some(vars) = request.variables {
        gql_request = gql_request.variables(Variables::from_json(vars));
    }

    let marker = ExecutionMarker::new();
    gql_request = gql_request.data(context).data(marker.clone());

    debug!(query = %request.query, "Executing GraphQL query");
    let response = state.schema.execute(gql_request).await;

    // GraphQL reports execution errors in the body with 200 OK
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        Json(GraphQLResponse::new(response, marker.started())),
    )
        .into_response()
}

/// Converts GET query params to a GraphQL request.
fn params_to_request(params: GraphQLQueryParams) -> Result<GraphQLRequest, serde_json::Error> {
    let variables = if let Some(vars_str) = params.variables {
        Some(serde_json::from_str(&vars_str)?)
    } else {
        None
    };

    Ok(GraphQLRequest {
        query: params.query.unwrap_or_default(),
        operation_name: params.operation_name,
        variables,
    })
}

/// Returns a transport-level error response.
fn error_response(error: GraphQLError) -> axum::response::Response {
    let status =
        StatusCode::from_u16(error.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    let body = serde_json::json!({
        "errors": [{
            "message": error.to_string(),
            "extensions": {
                "code": error.error_code()
            }
        }]
    });

    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}
