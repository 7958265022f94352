//! Application startup and server initialization.
//!
//! Builds the metric registry and recorders from configuration, wires the
//! instrumented services and background tasks, and serves the routes.

use std::sync::atomic::AtomicU64;
use std::sync::Arc;
use std::time::Duration;

use prometheus::Registry;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tracing::info;

use crate::config::ConfigV1;
use crate::metrics::Monitoring;
use crate::routes;
use crate::services::{
    spawn_order_consumer, spawn_order_sweeper, OrderPublisher, UserRepository,
};
use crate::state::AppState;

const ORDERS_TOPIC_CAPACITY: usize = 1024;

/// Builds the shared state and spawns the background tasks it relies on.
///
/// # Errors
///
/// Returns an error if a histogram bucket specification in the metrics
/// configuration is invalid.
pub fn build_state(config: Arc<ConfigV1>) -> Result<AppState, prometheus::Error> {
    let registry = Arc::new(Registry::new());
    let monitoring = Monitoring::from_config(&config.metrics, &registry)?;

    let (sender, receiver) = mpsc::channel(ORDERS_TOPIC_CAPACITY);
    let processed = Arc::new(AtomicU64::new(0));
    spawn_order_consumer(
        receiver,
        monitoring.pubsub.clone(),
        monitoring.app.clone(),
        processed.clone(),
    );
    spawn_order_sweeper(
        Duration::from_secs(config.jobs.order_sweeper_interval_secs.max(1)),
        processed,
        monitoring.cron_job.clone(),
    );

    Ok(AppState {
        users: Arc::new(UserRepository::new(monitoring.db.clone())),
        orders: Arc::new(OrderPublisher::new(sender, monitoring.pubsub.clone())),
        config,
        registry,
        monitoring,
    })
}

/// Initializes and runs the application server.
///
/// Binds to the address specified in the configuration and starts serving
/// requests.
///
/// # Errors
///
/// Returns an error if the metrics configuration is invalid, if the server
/// fails to bind to the specified address, or if it encounters a runtime
/// error during execution.
pub async fn run(config: Arc<ConfigV1>) -> Result<(), Box<dyn std::error::Error>> {
    let state = build_state(config.clone())?;

    info!("Starting server on {}", config.bind_address);

    let app = routes::create_router(state);
    let listener = TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
