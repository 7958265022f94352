//! Cron job execution metrics.

use std::time::Instant;

use prometheus::{CounterVec, HistogramVec, Registry};

use crate::constants::{status_label, TOTAL};
use crate::metrics::recorder::CronJobMetricsRecorder;
use crate::metrics::registry::{counter_vec, histogram_vec, inc, millis, observe};
use crate::models::{AppError, CronJobMetricsLabelValues, CronJobMetricsMeta};

/// Counter labels: `(job_name, status)`. Latency labels: `(job_name)`.
pub struct PromCronJobMetrics {
    job_execution_total: Option<CounterVec>,
    job_execution_latency_millis: Option<HistogramVec>,
}

impl PromCronJobMetrics {
    pub fn new(meta: &CronJobMetricsMeta, registry: &Registry) -> Self {
        let job_execution_total = meta.job_execution_total.as_ref().and_then(|m| {
            counter_vec(
                registry,
                &meta.namespace,
                "cron_job_execution_count",
                "Number of times cron jobs executed for total/success/failure",
                &m.labels,
            )
        });
        let job_execution_latency_millis =
            meta.job_execution_latency_millis.as_ref().and_then(|m| {
                histogram_vec(
                    registry,
                    &meta.namespace,
                    "cron_job_execution_latency_millis",
                    "Tracks the latencies for cron jobs run",
                    &m.labels,
                    &m.buckets,
                )
            });

        PromCronJobMetrics {
            job_execution_total,
            job_execution_latency_millis,
        }
    }

    pub fn job_execution_total_metric(&self) -> Option<&CounterVec> {
        self.job_execution_total.as_ref()
    }

    pub fn job_execution_latency_millis_metric(&self) -> Option<&HistogramVec> {
        self.job_execution_latency_millis.as_ref()
    }
}

impl CronJobMetricsRecorder for PromCronJobMetrics {
    fn log_metrics_pre(&self, lv: &CronJobMetricsLabelValues) -> Instant {
        if let Some(counter) = &self.job_execution_total {
            inc(counter, &[&lv.job_name, TOTAL]);
        }
        Instant::now()
    }

    fn log_metrics_post(
        &self,
        app_err: Option<&AppError>,
        lv: &CronJobMetricsLabelValues,
        ops_exec_time: Instant,
    ) {
        if let Some(counter) = &self.job_execution_total {
            inc(counter, &[&lv.job_name, status_label(app_err.is_none())]);
        }
        if let Some(histogram) = &self.job_execution_latency_millis {
            observe(histogram, &[&lv.job_name], millis(ops_exec_time.elapsed()));
        }
    }
}
