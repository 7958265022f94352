//! axum glue for [`RouterMetricsRecorder`].
//!
//! ```ignore
//! use axum::{middleware, routing::get, Router};
//! use appmon::metrics::{track_metrics, RouterMetricsState};
//!
//! let app = Router::new()
//!     .route("/api/users", get(list_users))
//!     .layer(middleware::from_fn_with_state(
//!         RouterMetricsState::new(router_metrics, "/metrics"),
//!         track_metrics,
//!     ));
//! ```

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;

use super::recorder::RouterMetricsRecorder;

/// State handed to [`track_metrics`]: the recorder and the path excluded
/// from measurement (the exposition endpoint).
#[derive(Clone)]
pub struct RouterMetricsState {
    recorder: Arc<dyn RouterMetricsRecorder>,
    metrics_path: Arc<str>,
}

impl RouterMetricsState {
    pub fn new(recorder: Arc<dyn RouterMetricsRecorder>, metrics_path: impl Into<Arc<str>>) -> Self {
        RouterMetricsState {
            recorder,
            metrics_path: metrics_path.into(),
        }
    }

    pub fn metrics_path(&self) -> &str {
        &self.metrics_path
    }
}

/// Middleware function for `axum::middleware::from_fn_with_state`.
pub async fn track_metrics(
    State(state): State<RouterMetricsState>,
    request: Request,
    next: Next,
) -> Response {
    state
        .recorder
        .log_metrics(&state.metrics_path, request, next)
        .await
}
