//! One handle per domain, built from configuration.

use std::sync::Arc;

use prometheus::Registry;
use tracing::info;

use super::noop::{
    NoOpAdsAlertingMetrics, NoOpAppMetrics, NoOpCronJobMetrics, NoOpDbMetrics,
    NoOpDownstreamServiceMetrics, NoOpPubSubMetrics, NoOpRouterMetrics,
};
use super::prom::{
    PromAdsAlertingMetrics, PromAppMetrics, PromCronJobMetrics, PromDbMetrics,
    PromDownstreamServiceMetrics, PromPubSubMetrics, PromRouterMetrics,
};
use super::recorder::{
    AdsAlertingMetricsRecorder, AppMetricsRecorder, CronJobMetricsRecorder, DbMetricsRecorder,
    DownstreamServiceMetricsRecorder, PubSubMetricsRecorder, RouterMetricsRecorder,
};
use crate::config::MetricsConfig;

/// The recorders an application hands to its call sites.
#[derive(Clone)]
pub struct Monitoring {
    pub router: Arc<dyn RouterMetricsRecorder>,
    pub db: Arc<dyn DbMetricsRecorder>,
    pub downstream_service: Arc<dyn DownstreamServiceMetricsRecorder>,
    pub cron_job: Arc<dyn CronJobMetricsRecorder>,
    pub pubsub: Arc<dyn PubSubMetricsRecorder>,
    pub app: Arc<dyn AppMetricsRecorder>,
    pub alerting: Arc<dyn AdsAlertingMetricsRecorder>,
}

impl Monitoring {
    /// Every domain disabled.
    pub fn noop() -> Self {
        Monitoring {
            router: Arc::new(NoOpRouterMetrics),
            db: Arc::new(NoOpDbMetrics),
            downstream_service: Arc::new(NoOpDownstreamServiceMetrics),
            cron_job: Arc::new(NoOpCronJobMetrics),
            pubsub: Arc::new(NoOpPubSubMetrics),
            app: Arc::new(NoOpAppMetrics),
            alerting: Arc::new(NoOpAdsAlertingMetrics),
        }
    }

    /// Registers every configured domain in `registry`. Domains without a
    /// config section get a no-op recorder.
    ///
    /// Fails only on an invalid bucket specification.
    pub fn from_config(config: &MetricsConfig, registry: &Registry) -> prometheus::Result<Self> {
        if !config.enabled {
            info!("Metrics are disabled. Using no-op recorders.");
            return Ok(Monitoring::noop());
        }

        let ns = config.namespace.as_str();
        let mut monitoring = Monitoring::noop();

        if let Some(cfg) = &config.router {
            monitoring.router = Arc::new(PromRouterMetrics::new(&cfg.to_meta(ns)?, registry));
        }
        if let Some(cfg) = &config.database {
            monitoring.db = Arc::new(PromDbMetrics::new(&cfg.to_meta(ns)?, registry));
        }
        if let Some(cfg) = &config.downstream_service {
            monitoring.downstream_service =
                Arc::new(PromDownstreamServiceMetrics::new(&cfg.to_meta(ns)?, registry));
        }
        if let Some(cfg) = &config.cron_job {
            monitoring.cron_job = Arc::new(PromCronJobMetrics::new(&cfg.to_meta(ns)?, registry));
        }
        if let Some(cfg) = &config.pubsub {
            monitoring.pubsub = Arc::new(PromPubSubMetrics::new(&cfg.to_meta(ns)?, registry));
        }
        if let Some(cfg) = &config.app {
            monitoring.app = Arc::new(PromAppMetrics::new(&cfg.to_meta(ns)?, registry));
        }
        if let Some(cfg) = &config.alerting {
            monitoring.alerting =
                Arc::new(PromAdsAlertingMetrics::new(&cfg.to_meta(ns)?, registry));
        }

        info!(namespace = ns, "Registered application metrics.");
        Ok(monitoring)
    }
}
