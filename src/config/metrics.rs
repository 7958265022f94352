//! Metric configuration as read from YAML.
//!
//! Every domain section and every sub-metric inside it is optional; leaving
//! one out disables it. A domain may override the shared namespace.
//!
//! ```yaml
//! metrics:
//!   namespace: myapp
//!   path: /metrics
//!   database:
//!     operations_total:
//!       labels: [op_type, source, entity, is_txn, status]
//!     operations_latency_millis:
//!       labels: [op_type, source, entity, is_txn]
//!       buckets: { start: 1, factor: 2, count: 12 }
//! ```

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::metrics::exponential_buckets;
use crate::models::{
    AdsAlertingMetricsMeta, AppMetricsMeta, CronJobMetricsMeta, DbMetricsMeta,
    DownstreamServiceMetricsMeta, MetricMeta, PubSubMetricsMeta, RouterMetricsMeta,
};

/// Histogram buckets, either listed or generated exponentially.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, JsonSchema)]
#[serde(untagged)]
pub enum BucketsConfig {
    List(Vec<f64>),
    Exponential { start: f64, factor: f64, count: usize },
}

impl BucketsConfig {
    pub fn resolve(&self) -> prometheus::Result<Vec<f64>> {
        match self {
            BucketsConfig::List(buckets) => Ok(buckets.clone()),
            BucketsConfig::Exponential {
                start,
                factor,
                count,
            } => exponential_buckets(*start, *factor, *count),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, JsonSchema)]
pub struct MetricMetaConfig {
    pub labels: Vec<String>,
    #[serde(default)]
    pub buckets: Option<BucketsConfig>,
}

impl MetricMetaConfig {
    pub fn to_meta(&self) -> prometheus::Result<MetricMeta> {
        let buckets = match &self.buckets {
            Some(b) => b.resolve()?,
            None => Vec::new(),
        };
        Ok(MetricMeta {
            labels: self.labels.clone(),
            buckets,
        })
    }
}

fn resolve(meta: &Option<MetricMetaConfig>) -> prometheus::Result<Option<MetricMeta>> {
    meta.as_ref().map(MetricMetaConfig::to_meta).transpose()
}

fn namespace(own: &Option<String>, shared: &str) -> String {
    own.clone().unwrap_or_else(|| shared.to_string())
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, JsonSchema)]
pub struct RouterMetricsConfig {
    pub namespace: Option<String>,
    pub http_requests: Option<MetricMetaConfig>,
    pub http_requests_latency_millis: Option<MetricMetaConfig>,
    pub http_request_size_bytes: Option<MetricMetaConfig>,
    pub http_response_size_bytes: Option<MetricMetaConfig>,
}

impl RouterMetricsConfig {
    pub fn to_meta(&self, shared_namespace: &str) -> prometheus::Result<RouterMetricsMeta> {
        Ok(RouterMetricsMeta {
            namespace: namespace(&self.namespace, shared_namespace),
            http_requests: resolve(&self.http_requests)?,
            http_requests_latency_millis: resolve(&self.http_requests_latency_millis)?,
            http_request_size_bytes: resolve(&self.http_request_size_bytes)?,
            http_response_size_bytes: resolve(&self.http_response_size_bytes)?,
        })
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, JsonSchema)]
pub struct DbMetricsConfig {
    pub namespace: Option<String>,
    pub operations_total: Option<MetricMetaConfig>,
    pub operations_latency_millis: Option<MetricMetaConfig>,
}

impl DbMetricsConfig {
    pub fn to_meta(&self, shared_namespace: &str) -> prometheus::Result<DbMetricsMeta> {
        Ok(DbMetricsMeta {
            namespace: namespace(&self.namespace, shared_namespace),
            operations_total: resolve(&self.operations_total)?,
            operations_latency_millis: resolve(&self.operations_latency_millis)?,
        })
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, JsonSchema)]
pub struct DownstreamServiceMetricsConfig {
    pub namespace: Option<String>,
    pub http_requests: Option<MetricMetaConfig>,
    pub http_requests_latency_millis: Option<MetricMetaConfig>,
    pub http_request_size_bytes: Option<MetricMetaConfig>,
    pub http_response_size_bytes: Option<MetricMetaConfig>,
}

impl DownstreamServiceMetricsConfig {
    pub fn to_meta(
        &self,
        shared_namespace: &str,
    ) -> prometheus::Result<DownstreamServiceMetricsMeta> {
        Ok(DownstreamServiceMetricsMeta {
            namespace: namespace(&self.namespace, shared_namespace),
            http_requests: resolve(&self.http_requests)?,
            http_requests_latency_millis: resolve(&self.http_requests_latency_millis)?,
            http_request_size_bytes: resolve(&self.http_request_size_bytes)?,
            http_response_size_bytes: resolve(&self.http_response_size_bytes)?,
        })
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, JsonSchema)]
pub struct CronJobMetricsConfig {
    pub namespace: Option<String>,
    pub job_execution_total: Option<MetricMetaConfig>,
    pub job_execution_latency_millis: Option<MetricMetaConfig>,
}

impl CronJobMetricsConfig {
    pub fn to_meta(&self, shared_namespace: &str) -> prometheus::Result<CronJobMetricsMeta> {
        Ok(CronJobMetricsMeta {
            namespace: namespace(&self.namespace, shared_namespace),
            job_execution_total: resolve(&self.job_execution_total)?,
            job_execution_latency_millis: resolve(&self.job_execution_latency_millis)?,
        })
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, JsonSchema)]
pub struct PubSubMetricsConfig {
    pub namespace: Option<String>,
    pub total_messages_consumed: Option<MetricMetaConfig>,
    pub total_messages_published: Option<MetricMetaConfig>,
    pub messages_published_latency_millis: Option<MetricMetaConfig>,
    pub messages_published_size_bytes: Option<MetricMetaConfig>,
}

impl PubSubMetricsConfig {
    pub fn to_meta(&self, shared_namespace: &str) -> prometheus::Result<PubSubMetricsMeta> {
        Ok(PubSubMetricsMeta {
            namespace: namespace(&self.namespace, shared_namespace),
            total_messages_consumed: resolve(&self.total_messages_consumed)?,
            total_messages_published: resolve(&self.total_messages_published)?,
            messages_published_latency_millis: resolve(&self.messages_published_latency_millis)?,
            messages_published_size_bytes: resolve(&self.messages_published_size_bytes)?,
        })
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, JsonSchema)]
pub struct AppMetricsConfig {
    pub namespace: Option<String>,
    pub application_errors_counter: Option<MetricMetaConfig>,
}

impl AppMetricsConfig {
    pub fn to_meta(&self, shared_namespace: &str) -> prometheus::Result<AppMetricsMeta> {
        Ok(AppMetricsMeta {
            namespace: namespace(&self.namespace, shared_namespace),
            application_errors_counter: resolve(&self.application_errors_counter)?,
        })
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, JsonSchema)]
pub struct AdsAlertingMetricsConfig {
    pub namespace: Option<String>,
    pub alerts: Option<MetricMetaConfig>,
}

impl AdsAlertingMetricsConfig {
    pub fn to_meta(&self, shared_namespace: &str) -> prometheus::Result<AdsAlertingMetricsMeta> {
        Ok(AdsAlertingMetricsMeta {
            namespace: namespace(&self.namespace, shared_namespace),
            alerts: resolve(&self.alerts)?,
        })
    }
}

/// The `metrics` section of the config file.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct MetricsConfig {
    /// When false every domain gets a no-op recorder.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub namespace: String,
    /// Exposition path, also excluded from router metrics.
    #[serde(default = "default_path")]
    pub path: String,
    pub router: Option<RouterMetricsConfig>,
    pub database: Option<DbMetricsConfig>,
    pub downstream_service: Option<DownstreamServiceMetricsConfig>,
    pub cron_job: Option<CronJobMetricsConfig>,
    pub pubsub: Option<PubSubMetricsConfig>,
    pub app: Option<AppMetricsConfig>,
    pub alerting: Option<AdsAlertingMetricsConfig>,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        MetricsConfig {
            enabled: default_enabled(),
            namespace: String::new(),
            path: default_path(),
            router: None,
            database: None,
            downstream_service: None,
            cron_job: None,
            pubsub: None,
            app: None,
            alerting: None,
        }
    }
}

impl MetricsConfig {
    /// `path` with a leading slash, as routed and excluded from router metrics.
    pub fn exposition_path(&self) -> String {
        if self.path.starts_with('/') {
            self.path.clone()
        } else {
            format!("/{}", self.path)
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_path() -> String {
    "/metrics".to_string()
}
