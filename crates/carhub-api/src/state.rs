//! Application state

use carhub_auth::AuthService;
use carhub_db::Database;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub auth: Arc<AuthService>,
}

impl AppState {
    pub fn new(db: Database, auth: Arc<AuthService>) -> Self {
        Self { db, auth }
    }
}

/// Handle for rendering Prometheus metrics
#[derive(Clone)]
pub struct MetricsHandle {
    handle: PrometheusHandle,
}

impl MetricsHandle {
    pub fn new(handle: PrometheusHandle) -> Self {
        Self { handle }
    }

    pub fn render(&self) -> String {
        self.handle.render()
    }
}
