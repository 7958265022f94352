//! Shared application state.
//!
//! Contains the state that is shared across all request handlers: the
//! configuration, the metric registry with its recorders, and the
//! instrumented services.

use std::sync::Arc;

use prometheus::Registry;

use crate::config::ConfigV1;
use crate::metrics::Monitoring;
use crate::services::{OrderPublisher, UserRepository};

/// Application state shared across all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded at startup.
    pub config: Arc<ConfigV1>,
    /// Registry every metric is registered in, rendered by the exposition route.
    pub registry: Arc<Registry>,
    /// Recorders for every telemetry domain.
    pub monitoring: Monitoring,
    pub users: Arc<UserRepository>,
    pub orders: Arc<OrderPublisher>,
}
