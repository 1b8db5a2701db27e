//! Tracks whether a request reached execution.
//!
//! Parse and validation failures never reach the `execute` hook, so the
//! handler can tell them apart from requests whose resolvers ran and failed.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_graphql::Response;
use async_graphql::extensions::{Extension, ExtensionContext, ExtensionFactory, NextExecute};

/// Per-request flag, attached to the request data by the handler.
#[derive(Debug, Clone, Default)]
pub struct ExecutionMarker(Arc<AtomicBool>);

impl ExecutionMarker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` once the operation passed parsing and validation.
    #[must_use]
    pub fn started(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Schema extension that sets the request's [`ExecutionMarker`].
pub struct TrackExecution;

impl ExtensionFactory for TrackExecution {
    fn create(&self) -> Arc<dyn Extension> {
        Arc::new(TrackExecutionExtension)
    }
}

struct TrackExecutionExtension;

#[async_graphql::async_trait::async_trait]
impl Extension for TrackExecutionExtension {
    async fn execute(
        &self,
        ctx: &ExtensionContext<'_>,
        operation_name: Option<&str>,
        next: NextExecute<'_>,
    ) -> Response {
        if let Some(marker) = ctx.data_opt::<ExecutionMarker>() {
            marker.0.store(true, Ordering::Release);
        }
        next.run(ctx, operation_name).await
    }
}
