//! Construction-time configuration for each metric domain.
//!
//! Every sub-metric is an `Option<MetricMeta>`: `None` disables it, so no
//! metric is registered and every log call touching it is a no-op.

use serde::{Deserialize, Serialize};

/// Label names and (for histograms) bucket boundaries of one metric.
///
/// Label order is significant: label values are supplied positionally
/// in exactly this order at observation time.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct MetricMeta {
    pub labels: Vec<String>,
    /// Ignored for counters and gauges. Empty means the client's default buckets.
    #[serde(default)]
    pub buckets: Vec<f64>,
}

impl MetricMeta {
    /// Meta for a counter or gauge.
    pub fn new<S: Into<String>>(labels: impl IntoIterator<Item = S>) -> Self {
        MetricMeta {
            labels: labels.into_iter().map(Into::into).collect(),
            buckets: Vec::new(),
        }
    }

    /// Meta for a histogram.
    pub fn with_buckets<S: Into<String>>(
        labels: impl IntoIterator<Item = S>,
        buckets: Vec<f64>,
    ) -> Self {
        MetricMeta {
            buckets,
            ..MetricMeta::new(labels)
        }
    }
}

/// Router (inbound HTTP) metrics.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct RouterMetricsMeta {
    pub namespace: String,
    pub http_requests: Option<MetricMeta>,
    pub http_requests_latency_millis: Option<MetricMeta>,
    pub http_request_size_bytes: Option<MetricMeta>,
    pub http_response_size_bytes: Option<MetricMeta>,
}

/// Database operation metrics.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct DbMetricsMeta {
    pub namespace: String,
    pub operations_total: Option<MetricMeta>,
    pub operations_latency_millis: Option<MetricMeta>,
}

/// Outbound HTTP calls to downstream services.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct DownstreamServiceMetricsMeta {
    pub namespace: String,
    pub http_requests: Option<MetricMeta>,
    pub http_requests_latency_millis: Option<MetricMeta>,
    pub http_request_size_bytes: Option<MetricMeta>,
    pub http_response_size_bytes: Option<MetricMeta>,
}

/// Cron job executions.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct CronJobMetricsMeta {
    pub namespace: String,
    pub job_execution_total: Option<MetricMeta>,
    pub job_execution_latency_millis: Option<MetricMeta>,
}

/// Pub/sub publishing and consumption.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct PubSubMetricsMeta {
    pub namespace: String,
    pub total_messages_consumed: Option<MetricMeta>,
    pub total_messages_published: Option<MetricMeta>,
    pub messages_published_latency_millis: Option<MetricMeta>,
    pub messages_published_size_bytes: Option<MetricMeta>,
}

/// Application error gauge, keyed by error code.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct AppMetricsMeta {
    pub namespace: String,
    pub application_errors_counter: Option<MetricMeta>,
}

/// Alerts generated by the ads alerting pipeline.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct AdsAlertingMetricsMeta {
    pub namespace: String,
    pub alerts: Option<MetricMeta>,
}
