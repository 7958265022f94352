//! Capability traits implemented by the live Prometheus metric sets, their
//! no-op twins and the recording mocks.
//!
//! Call sites hold an `Arc<dyn …Recorder>` chosen at construction time, so
//! switching telemetry off or asserting on it in tests never touches them.

use std::time::Instant;

use async_trait::async_trait;
use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;

use crate::models::{
    AdsAlertingMetricsLabelValues, AdsAlertingMetricsLogInfo, AppError, CronJobMetricsLabelValues,
    DbMetricsLabelValues, DownstreamServiceMetricsLabelValues, EventTxnData, HttpMetrics,
    PubSubMetricsLabelValues,
};

/// Inbound HTTP request metrics, applied as axum middleware.
#[async_trait]
pub trait RouterMetricsRecorder: Send + Sync {
    /// Runs `next` and records the request around it.
    ///
    /// Requests whose path equals `metrics_path` are passed through
    /// untouched so scraping does not measure itself.
    async fn log_metrics(&self, metrics_path: &str, request: Request, next: Next) -> Response;
}

/// Database operation metrics.
pub trait DbMetricsRecorder: Send + Sync {
    /// Call right before the operation. Returns the start marker for `log_metrics_post`.
    fn log_metrics_pre(&self, label_values: &DbMetricsLabelValues) -> Instant;

    /// Call once the operation finished. `app_err` is `None` on success.
    fn log_metrics_post(
        &self,
        app_err: Option<&AppError>,
        label_values: &DbMetricsLabelValues,
        ops_exec_time: Instant,
    );
}

/// Outbound HTTP calls to downstream services.
pub trait DownstreamServiceMetricsRecorder: Send + Sync {
    fn log_metrics_pre(&self, label_values: &DownstreamServiceMetricsLabelValues) -> Instant;

    fn log_metrics_post(
        &self,
        success: bool,
        label_values: &DownstreamServiceMetricsLabelValues,
        http_metrics: &HttpMetrics,
    );
}

/// Cron job executions.
pub trait CronJobMetricsRecorder: Send + Sync {
    fn log_metrics_pre(&self, label_values: &CronJobMetricsLabelValues) -> Instant;

    fn log_metrics_post(
        &self,
        app_err: Option<&AppError>,
        label_values: &CronJobMetricsLabelValues,
        ops_exec_time: Instant,
    );
}

/// Pub/sub publishing and consumption.
pub trait PubSubMetricsRecorder: Send + Sync {
    /// Counts both a publish and a consume attempt.
    fn log_metrics_pre(&self, label_values: &PubSubMetricsLabelValues) -> Instant;

    /// `event_txn_data` is `None` for pure consumption; the publish side is
    /// then left alone.
    fn log_metrics_post(
        &self,
        label_values: &PubSubMetricsLabelValues,
        event_txn_data: Option<&EventTxnData>,
    );
}

/// Application error gauge.
pub trait AppMetricsRecorder: Send + Sync {
    /// Increments the gauge once per error code.
    fn log_metrics(&self, err_codes: &[String]);

    /// Decrements the gauge of one error code, e.g. once the condition cleared.
    fn decrement_app_error_count(&self, err_code: &str);
}

/// Alerts generated by the ads alerting pipeline.
pub trait AdsAlertingMetricsRecorder: Send + Sync {
    fn log_metrics(
        &self,
        label_values: &AdsAlertingMetricsLabelValues,
        log_info: &AdsAlertingMetricsLogInfo,
    );
}
