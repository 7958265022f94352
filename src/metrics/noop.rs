//! Inert recorders. They register nothing and observe nothing, but keep
//! every call site's signature intact; `log_metrics_pre` still returns the
//! current instant.

use std::time::Instant;

use async_trait::async_trait;
use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;

use super::recorder::{
    AdsAlertingMetricsRecorder, AppMetricsRecorder, CronJobMetricsRecorder, DbMetricsRecorder,
    DownstreamServiceMetricsRecorder, PubSubMetricsRecorder, RouterMetricsRecorder,
};
use crate::models::{
    AdsAlertingMetricsLabelValues, AdsAlertingMetricsLogInfo, AppError, CronJobMetricsLabelValues,
    DbMetricsLabelValues, DownstreamServiceMetricsLabelValues, EventTxnData, HttpMetrics,
    PubSubMetricsLabelValues,
};

/// Pass-through middleware.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpRouterMetrics;

#[async_trait]
impl RouterMetricsRecorder for NoOpRouterMetrics {
    async fn log_metrics(&self, _metrics_path: &str, request: Request, next: Next) -> Response {
        next.run(request).await
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpDbMetrics;

impl DbMetricsRecorder for NoOpDbMetrics {
    fn log_metrics_pre(&self, _label_values: &DbMetricsLabelValues) -> Instant {
        Instant::now()
    }

    fn log_metrics_post(&self, _: Option<&AppError>, _: &DbMetricsLabelValues, _: Instant) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpDownstreamServiceMetrics;

impl DownstreamServiceMetricsRecorder for NoOpDownstreamServiceMetrics {
    fn log_metrics_pre(&self, _label_values: &DownstreamServiceMetricsLabelValues) -> Instant {
        Instant::now()
    }

    fn log_metrics_post(&self, _: bool, _: &DownstreamServiceMetricsLabelValues, _: &HttpMetrics) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpCronJobMetrics;

impl CronJobMetricsRecorder for NoOpCronJobMetrics {
    fn log_metrics_pre(&self, _label_values: &CronJobMetricsLabelValues) -> Instant {
        Instant::now()
    }

    fn log_metrics_post(&self, _: Option<&AppError>, _: &CronJobMetricsLabelValues, _: Instant) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpPubSubMetrics;

impl PubSubMetricsRecorder for NoOpPubSubMetrics {
    fn log_metrics_pre(&self, _label_values: &PubSubMetricsLabelValues) -> Instant {
        Instant::now()
    }

    fn log_metrics_post(&self, _: &PubSubMetricsLabelValues, _: Option<&EventTxnData>) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpAppMetrics;

impl AppMetricsRecorder for NoOpAppMetrics {
    fn log_metrics(&self, _err_codes: &[String]) {}

    fn decrement_app_error_count(&self, _err_code: &str) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpAdsAlertingMetrics;

impl AdsAlertingMetricsRecorder for NoOpAdsAlertingMetrics {
    fn log_metrics(&self, _: &AdsAlertingMetricsLabelValues, _: &AdsAlertingMetricsLogInfo) {}
}
