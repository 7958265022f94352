//! HTTP route definitions and handlers.
//!
//! Every route except the exposition endpoint is measured by the router
//! metrics middleware.

mod health_routes;
mod metrics_routes;
mod order_routes;
mod user_routes;

use axum::{middleware, Router};

use crate::metrics::{track_metrics, RouterMetricsState};
use crate::state::AppState;

/// Creates the application router with all configured routes.
///
/// Combines all route modules into a single router, layers the router
/// metrics middleware over them, and attaches the application state.
pub fn create_router(state: AppState) -> Router {
    let metrics_path = state.config.metrics.exposition_path();
    let metrics_state =
        RouterMetricsState::new(state.monitoring.router.clone(), metrics_path.as_str());

    Router::new()
        .merge(user_routes::routes())
        .merge(order_routes::routes())
        .merge(health_routes::routes())
        .merge(metrics_routes::routes(&metrics_path))
        .layer(middleware::from_fn_with_state(metrics_state, track_metrics))
        .with_state(state)
}
