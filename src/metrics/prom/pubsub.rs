//! Pub/sub publishing and consumption metrics.
//!
//! One set of label values serves both sides: `log_metrics_pre` counts a
//! publish attempt and a consume attempt, and `log_metrics_post` closes
//! each side by its own rule. The publish side only closes when transaction
//! data is supplied; the consume side always closes, failing when an error
//! code is present.

use std::time::Instant;

use prometheus::{CounterVec, HistogramVec, Registry};

use crate::constants::{status_label, TOTAL};
use crate::metrics::recorder::PubSubMetricsRecorder;
use crate::metrics::registry::{counter_vec, histogram_vec, inc, millis, observe};
use crate::models::{EventTxnData, PubSubMetricsLabelValues, PubSubMetricsMeta};

/// Consumed labels: `(source, entity, op_type, status, error_code)`.
/// Published labels: `(entity, op_type, status)`.
/// Publish histogram labels: `(entity, op_type)`.
pub struct PromPubSubMetrics {
    total_messages_consumed: Option<CounterVec>,
    total_messages_published: Option<CounterVec>,
    messages_published_latency_millis: Option<HistogramVec>,
    messages_published_size_bytes: Option<HistogramVec>,
}

impl PromPubSubMetrics {
    pub fn new(meta: &PubSubMetricsMeta, registry: &Registry) -> Self {
        let ns = &meta.namespace;
        let total_messages_consumed = meta.total_messages_consumed.as_ref().and_then(|m| {
            counter_vec(
                registry,
                ns,
                "pubsub_messages_consumed",
                "Number of messages consumed for total/success/failure scenario",
                &m.labels,
            )
        });
        let total_messages_published = meta.total_messages_published.as_ref().and_then(|m| {
            counter_vec(
                registry,
                ns,
                "pubsub_messages_published",
                "Tracks the number of published messages at pubSub service level",
                &m.labels,
            )
        });
        let messages_published_latency_millis =
            meta.messages_published_latency_millis.as_ref().and_then(|m| {
                histogram_vec(
                    registry,
                    ns,
                    "pubsub_messages_published_latency_millis",
                    "Tracks the latencies to publish message at pubSub service level",
                    &m.labels,
                    &m.buckets,
                )
            });
        let messages_published_size_bytes =
            meta.messages_published_size_bytes.as_ref().and_then(|m| {
                histogram_vec(
                    registry,
                    ns,
                    "pubsub_messages_published_size_bytes",
                    "Tracks the message size pubSub service level",
                    &m.labels,
                    &m.buckets,
                )
            });

        PromPubSubMetrics {
            total_messages_consumed,
            total_messages_published,
            messages_published_latency_millis,
            messages_published_size_bytes,
        }
    }

    pub fn total_messages_consumed_metric(&self) -> Option<&CounterVec> {
        self.total_messages_consumed.as_ref()
    }

    pub fn total_messages_published_metric(&self) -> Option<&CounterVec> {
        self.total_messages_published.as_ref()
    }

    pub fn messages_published_latency_millis_metric(&self) -> Option<&HistogramVec> {
        self.messages_published_latency_millis.as_ref()
    }

    pub fn messages_published_size_bytes_metric(&self) -> Option<&HistogramVec> {
        self.messages_published_size_bytes.as_ref()
    }

    fn log_publish_post(&self, lv: &PubSubMetricsLabelValues, txn: &EventTxnData) {
        if let Some(counter) = &self.total_messages_published {
            inc(
                counter,
                &[&lv.entity, &lv.entity_op_type, status_label(txn.is_published)],
            );
        }
        if let Some(histogram) = &self.messages_published_latency_millis {
            observe(
                histogram,
                &[&lv.entity, &lv.entity_op_type],
                millis(txn.time_taken_to_publish),
            );
        }
        if let Some(histogram) = &self.messages_published_size_bytes {
            observe(
                histogram,
                &[&lv.entity, &lv.entity_op_type],
                txn.message_size_in_bytes as f64,
            );
        }
    }
}

impl PubSubMetricsRecorder for PromPubSubMetrics {
    fn log_metrics_pre(&self, lv: &PubSubMetricsLabelValues) -> Instant {
        if let Some(counter) = &self.total_messages_published {
            inc(counter, &[&lv.entity, &lv.entity_op_type, TOTAL]);
        }
        if let Some(counter) = &self.total_messages_consumed {
            inc(
                counter,
                &[&lv.source, &lv.entity, &lv.entity_op_type, TOTAL, ""],
            );
        }
        Instant::now()
    }

    fn log_metrics_post(&self, lv: &PubSubMetricsLabelValues, event_txn_data: Option<&EventTxnData>) {
        if let Some(txn) = event_txn_data {
            self.log_publish_post(lv, txn);
        }
        if let Some(counter) = &self.total_messages_consumed {
            let status = status_label(lv.error_code.is_empty());
            inc(
                counter,
                &[&lv.source, &lv.entity, &lv.entity_op_type, status, &lv.error_code],
            );
        }
    }
}
