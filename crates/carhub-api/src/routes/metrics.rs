//! Prometheus metrics endpoint

use axum::{
    Router,
    extract::State,
    http::header,
    response::IntoResponse,
    routing::get,
};
use std::sync::Arc;

use crate::state::MetricsHandle;

/// Content type expected by Prometheus scrapers for the text exposition format
const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Create metrics routes with the Prometheus handle
pub fn routes(handle: Arc<MetricsHandle>) -> Router {
    Router::new()
        .route("/metrics", get(render_metrics))
        .with_state(handle)
}

/// GET /metrics - Prometheus text exposition
async fn render_metrics(State(handle): State<Arc<MetricsHandle>>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, PROMETHEUS_CONTENT_TYPE)],
        handle.render(),
    )
}
