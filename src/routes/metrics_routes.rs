//! Metrics exposition endpoint.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};
use tracing::error;

use crate::metrics::exposition::{render, CONTENT_TYPE};
use crate::state::AppState;

/// Creates the metrics route at `path`.
pub fn routes(path: &str) -> Router<AppState> {
    Router::new().route(path, get(metrics_handler))
}

/// Returns all registered metrics in Prometheus text format.
///
/// This endpoint should be restricted via Ingress to prevent public access.
async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    match render(&state.registry) {
        Ok(text) => (StatusCode::OK, [(header::CONTENT_TYPE, CONTENT_TYPE)], text),
        Err(e) => {
            error!(code = "OnMetricsRenderFailure", err = %e, "failed to render metrics");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [(header::CONTENT_TYPE, "text/plain")],
                e,
            )
        }
    }
}
