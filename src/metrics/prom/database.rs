//! Database operation metrics.

use std::time::Instant;

use prometheus::{CounterVec, HistogramVec, Registry};

use crate::constants::{status_label, TOTAL};
use crate::metrics::recorder::DbMetricsRecorder;
use crate::metrics::registry::{counter_vec, histogram_vec, inc, millis, observe};
use crate::models::{AppError, DbMetricsLabelValues, DbMetricsMeta};

/// Registered database metrics.
///
/// Counter labels: `(op_type, source, entity, is_txn, status)`.
/// Latency labels: `(op_type, source, entity, is_txn)`.
pub struct PromDbMetrics {
    operations_total: Option<CounterVec>,
    operations_latency_millis: Option<HistogramVec>,
}

impl PromDbMetrics {
    pub fn new(meta: &DbMetricsMeta, registry: &Registry) -> Self {
        let operations_total = meta.operations_total.as_ref().and_then(|m| {
            counter_vec(
                registry,
                &meta.namespace,
                "db_operations",
                "Number of times DB operations executed for total/success/failure",
                &m.labels,
            )
        });
        let operations_latency_millis = meta.operations_latency_millis.as_ref().and_then(|m| {
            histogram_vec(
                registry,
                &meta.namespace,
                "db_operations_latency_millis",
                "Tracks the latencies of DB operations",
                &m.labels,
                &m.buckets,
            )
        });

        PromDbMetrics {
            operations_total,
            operations_latency_millis,
        }
    }

    pub fn operations_total_metric(&self) -> Option<&CounterVec> {
        self.operations_total.as_ref()
    }

    pub fn operations_latency_millis_metric(&self) -> Option<&HistogramVec> {
        self.operations_latency_millis.as_ref()
    }
}

impl DbMetricsRecorder for PromDbMetrics {
    fn log_metrics_pre(&self, lv: &DbMetricsLabelValues) -> Instant {
        if let Some(counter) = &self.operations_total {
            inc(counter, &[&lv.op_type, &lv.source, &lv.entity, &lv.is_txn, TOTAL]);
        }
        Instant::now()
    }

    fn log_metrics_post(
        &self,
        app_err: Option<&AppError>,
        lv: &DbMetricsLabelValues,
        ops_exec_time: Instant,
    ) {
        if let Some(counter) = &self.operations_total {
            let status = status_label(app_err.is_none());
            inc(counter, &[&lv.op_type, &lv.source, &lv.entity, &lv.is_txn, status]);
        }
        if let Some(histogram) = &self.operations_latency_millis {
            observe(
                histogram,
                &[&lv.op_type, &lv.source, &lv.entity, &lv.is_txn],
                millis(ops_exec_time.elapsed()),
            );
        }
    }
}
