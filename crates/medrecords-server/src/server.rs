use std::net::SocketAddr;
use std::sync::Arc;

use axum::{Router, body::Body, http::Request, middleware, routing::get};
use medrecords_db_memory::InMemoryStore;
use medrecords_graphql::handler::REQUEST_ID_HEADER;
use medrecords_graphql::{GraphQLError, GraphQLState, build_schema, graphql_routes};
use medrecords_storage::DynStore;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};
use tracing::{Span, field::Empty};

use crate::{config::AppConfig, handlers, middleware as app_middleware};

pub struct MedRecordsServer {
    addr: SocketAddr,
    app: Router,
}

/// Assembles the GraphQL endpoint, the health check and the middleware stack.
pub fn build_app(cfg: &AppConfig, store: DynStore) -> Result<Router, GraphQLError> {
    let schema = build_schema(&cfg.graphql)?;
    let graphql = graphql_routes(GraphQLState::new(schema, store.clone(), cfg.graphql.clone()));
    let health = Router::new()
        .route("/healthz", get(handlers::healthz))
        .with_state(store);

    let body_limit = cfg.server.body_limit_bytes;
    let app = graphql
        .merge(health)
        // Middleware stack, innermost first: cors/compression -> trace -> request id -> body limit
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(request_span)
                .on_response(
                    |res: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &tracing::Span| {
                        span.record(
                            "http.status_code",
                            tracing::field::display(res.status().as_u16()),
                        );
                        tracing::info!(
                            http.status = %res.status().as_u16(),
                            elapsed_ms = %latency.as_millis(),
                            "request handled"
                        );
                    },
                ),
        )
        .layer(middleware::from_fn(app_middleware::request_id))
        .layer(axum::extract::DefaultBodyLimit::max(body_limit));
    Ok(app)
}

// Runs inside the request id middleware, so the header is always set
fn request_span(req: &Request<Body>) -> Span {
    let req_id = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    tracing::info_span!(
        "http.request",
        http.method = %req.method(),
        http.target = %req.uri(),
        http.status_code = Empty,
        request_id = %req_id
    )
}

pub struct ServerBuilder {
    addr: SocketAddr,
    config: AppConfig,
    store: Option<DynStore>,
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ServerBuilder {
    pub fn new() -> Self {
        let cfg = AppConfig::default();
        Self {
            addr: cfg.addr(),
            config: cfg,
            store: None,
        }
    }

    pub fn with_addr(mut self, addr: SocketAddr) -> Self {
        self.addr = addr;
        self
    }

    pub fn with_config(mut self, cfg: AppConfig) -> Self {
        self.addr = cfg.addr();
        self.config = cfg;
        self
    }

    pub fn with_store(mut self, store: DynStore) -> Self {
        self.store = Some(store);
        self
    }

    /// Builds the server. Without an explicit store an empty in-memory one is used.
    pub fn build(self) -> Result<MedRecordsServer, GraphQLError> {
        let store = self
            .store
            .unwrap_or_else(|| Arc::new(InMemoryStore::new()));
        tracing::info!(
            backend = store.backend_name(),
            id_strategy = self.config.graphql.id_strategy.as_str(),
            batch_loads = self.config.graphql.batch_loads,
            "Building GraphQL gateway"
        );
        let app = build_app(&self.config, store)?;

        Ok(MedRecordsServer {
            addr: self.addr,
            app,
        })
    }
}

impl MedRecordsServer {
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        tracing::info!("Server ready at http://{}/", listener.local_addr()?);
        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use tower::ServiceExt;
    use tracing::field::{Field, Visit};
    use tracing::span::{Attributes, Id};
    use tracing_subscriber::layer::{Context, SubscriberExt};
    use tracing_subscriber::{Layer, Registry};

    use super::*;

    /// Collects the `request_id` field of every new span.
    #[derive(Clone, Default)]
    struct RequestIds(Arc<Mutex<Vec<String>>>);

    impl Visit for RequestIds {
        fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
            if field.name() == "request_id" {
                self.0.lock().unwrap().push(format!("{value:?}"));
            }
        }
    }

    impl<S: tracing::Subscriber> Layer<S> for RequestIds {
        fn on_new_span(&self, attrs: &Attributes<'_>, _: &Id, _: Context<'_, S>) {
            attrs.record(&mut self.clone());
        }
    }

    async fn traced_healthz(request: Request<Body>) -> (Vec<String>, String) {
        let ids = RequestIds::default();
        let _guard = tracing::subscriber::set_default(Registry::default().with(ids.clone()));

        let app = build_app(&AppConfig::default(), Arc::new(InMemoryStore::new())).unwrap();
        let res = app.oneshot(request).await.unwrap();
        let echoed = res.headers()[REQUEST_ID_HEADER].to_str().unwrap().to_string();

        let recorded = ids.0.lock().unwrap().clone();
        (recorded, echoed)
    }

    #[tokio::test]
    async fn test_span_carries_incoming_request_id() {
        let (recorded, echoed) = traced_healthz(
            Request::get("/healthz")
                .header(REQUEST_ID_HEADER, "trace-42")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(echoed, "trace-42");
        assert_eq!(recorded, vec!["trace-42".to_string()]);
    }

    #[tokio::test]
    async fn test_span_carries_generated_request_id() {
        let (recorded, echoed) =
            traced_healthz(Request::get("/healthz").body(Body::empty()).unwrap()).await;

        assert!(!echoed.is_empty());
        assert_eq!(recorded, vec![echoed]);
    }
}
