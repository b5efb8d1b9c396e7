//! Layers wrapped around every route: request tracing, a per-request timeout,
//! and response compression.

use std::time::Duration;

use axum::Router;
use tower_http::{compression::CompressionLayer, timeout::TimeoutLayer, trace::TraceLayer};

/// Per-request timeout applied to all routes.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Wrap `router` in the service's standard layer stack.
///
/// Bodies are never recorded by the trace layer; only method, path, status,
/// and latency reach the logs.
pub fn apply<S>(router: Router<S>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .layer(CompressionLayer::new())
}
