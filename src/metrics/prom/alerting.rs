//! Counter of alerts generated by the ads alerting pipeline.

use prometheus::{CounterVec, Registry};

use crate::metrics::recorder::AdsAlertingMetricsRecorder;
use crate::metrics::registry::{counter_vec, inc_by};
use crate::models::{AdsAlertingMetricsLabelValues, AdsAlertingMetricsLogInfo, AdsAlertingMetricsMeta};

/// Counter labels: `(account_id, metric_name, alert_level, alert_type,
/// frequency, severity, entity_type)`.
pub struct PromAdsAlertingMetrics {
    alerts: Option<CounterVec>,
}

impl PromAdsAlertingMetrics {
    pub fn new(meta: &AdsAlertingMetricsMeta, registry: &Registry) -> Self {
        let alerts = meta.alerts.as_ref().and_then(|m| {
            counter_vec(
                registry,
                &meta.namespace,
                "ads_alerts",
                "Tracks the number of alerts generated by ads alerting",
                &m.labels,
            )
        });
        PromAdsAlertingMetrics { alerts }
    }

    pub fn alerts_metric(&self) -> Option<&CounterVec> {
        self.alerts.as_ref()
    }
}

impl AdsAlertingMetricsRecorder for PromAdsAlertingMetrics {
    fn log_metrics(
        &self,
        lv: &AdsAlertingMetricsLabelValues,
        log_info: &AdsAlertingMetricsLogInfo,
    ) {
        if let Some(counter) = &self.alerts {
            inc_by(
                counter,
                &[
                    &lv.account_id,
                    &lv.metric_name,
                    &lv.alert_level,
                    &lv.alert_type,
                    &lv.frequency,
                    &lv.severity,
                    &lv.entity_type,
                ],
                log_info.number_of_alerts_generated,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MetricMeta;

    #[test]
    fn test_alerts_are_added_by_count() {
        let registry = Registry::new();
        let metrics = PromAdsAlertingMetrics::new(
            &AdsAlertingMetricsMeta {
                namespace: "test".to_string(),
                alerts: Some(MetricMeta::new([
                    "account_id",
                    "metric_name",
                    "alert_level",
                    "alert_type",
                    "frequency",
                    "severity",
                    "entity_type",
                ])),
            },
            &registry,
        );
        let lv = AdsAlertingMetricsLabelValues {
            account_id: "acc-42".to_string(),
            metric_name: "spend".to_string(),
            alert_level: "campaign".to_string(),
            alert_type: "threshold".to_string(),
            frequency: "hourly".to_string(),
            severity: "critical".to_string(),
            entity_type: "campaign".to_string(),
        };

        metrics.log_metrics(&lv, &AdsAlertingMetricsLogInfo { number_of_alerts_generated: 3.0 });
        metrics.log_metrics(&lv, &AdsAlertingMetricsLogInfo { number_of_alerts_generated: 2.0 });

        let value = metrics
            .alerts_metric()
            .unwrap()
            .with_label_values(&[
                "acc-42", "spend", "campaign", "threshold", "hourly", "critical", "campaign",
            ])
            .get();
        assert_eq!(value, 5.0);
    }
}
