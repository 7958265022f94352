//! Application error gauge, keyed by error code.

use prometheus::{GaugeVec, Registry};
use tracing::debug;

use crate::metrics::recorder::AppMetricsRecorder;
use crate::metrics::registry::{gauge_dec, gauge_inc, gauge_vec};
use crate::models::AppMetricsMeta;

/// Gauge labels: `(error_code)`.
pub struct PromAppMetrics {
    application_errors_counter: Option<GaugeVec>,
}

impl PromAppMetrics {
    pub fn new(meta: &AppMetricsMeta, registry: &Registry) -> Self {
        let application_errors_counter = meta.application_errors_counter.as_ref().and_then(|m| {
            gauge_vec(
                registry,
                &meta.namespace,
                "application_errors_total",
                "Tracks the counts of app errors at application level",
                &m.labels,
            )
        });
        PromAppMetrics {
            application_errors_counter,
        }
    }

    pub fn application_errors_counter_metric(&self) -> Option<&GaugeVec> {
        self.application_errors_counter.as_ref()
    }
}

impl AppMetricsRecorder for PromAppMetrics {
    fn log_metrics(&self, err_codes: &[String]) {
        if let Some(gauge) = &self.application_errors_counter {
            for code in err_codes {
                gauge_inc(gauge, &[code.as_str()]);
            }
        }
    }

    fn decrement_app_error_count(&self, err_code: &str) {
        match &self.application_errors_counter {
            Some(gauge) => gauge_dec(gauge, &[err_code]),
            None => debug!(err_code, "application error gauge not configured, skipping decrement"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MetricMeta;

    fn configured(registry: &Registry) -> PromAppMetrics {
        PromAppMetrics::new(
            &AppMetricsMeta {
                namespace: "test".to_string(),
                application_errors_counter: Some(MetricMeta::new(["error_code"])),
            },
            registry,
        )
    }

    #[test]
    fn test_log_metrics_increments_each_code() {
        let registry = Registry::new();
        let metrics = configured(&registry);

        metrics.log_metrics(&[
            "ERR_DB_CONNECTION".to_string(),
            "ERR_VALIDATION".to_string(),
            "ERR_DB_CONNECTION".to_string(),
        ]);

        let gauge = metrics.application_errors_counter_metric().unwrap();
        assert_eq!(gauge.with_label_values(&["ERR_DB_CONNECTION"]).get(), 2.0);
        assert_eq!(gauge.with_label_values(&["ERR_VALIDATION"]).get(), 1.0);
    }

    #[test]
    fn test_decrement() {
        let registry = Registry::new();
        let metrics = configured(&registry);

        metrics.log_metrics(&["ERR_DB_CONNECTION".to_string()]);
        metrics.decrement_app_error_count("ERR_DB_CONNECTION");

        let gauge = metrics.application_errors_counter_metric().unwrap();
        assert_eq!(gauge.with_label_values(&["ERR_DB_CONNECTION"]).get(), 0.0);
    }

    #[test]
    fn test_decrement_without_gauge_is_noop() {
        let registry = Registry::new();
        let metrics = PromAppMetrics::new(
            &AppMetricsMeta {
                namespace: "test".to_string(),
                application_errors_counter: None,
            },
            &registry,
        );

        metrics.log_metrics(&["ERR_X".to_string()]);
        metrics.decrement_app_error_count("ERR_X");

        assert!(metrics.application_errors_counter_metric().is_none());
    }
}
