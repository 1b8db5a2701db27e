use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use medrecords_storage::DynStore;
use serde::Serialize;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    backend: &'static str,
}

pub async fn healthz(State(store): State<DynStore>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok",
            backend: store.backend_name(),
        }),
    )
}
