//! Health checks and the metrics endpoint.

use std::sync::Arc;

use axum::extract::Extension;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::state::AppState;

/// GET /health - liveness probe
pub async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// GET /ready - readiness probe; succeeds once the persisted indexes have
/// been loaded into the published snapshot
pub async fn ready_handler(Extension(state): Extension<Arc<AppState>>) -> impl IntoResponse {
    let snapshot = state.store.get().await;
    (StatusCode::OK, format!("Ready ({} datasets)", snapshot.len()))
}

/// GET /metrics - Prometheus text exposition
pub async fn metrics_handler(Extension(state): Extension<Arc<AppState>>) -> Response {
    let snapshot = state.store.get().await;
    let body = state.metrics.render(snapshot.len());

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/plain; version=0.0.4")
        .body(body.into())
        .unwrap()
}
