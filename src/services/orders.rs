//! Order events published on an in-process topic.
//!
//! Both ends report pub/sub metrics for every message. The consumer also
//! raises the application error gauge on messages it cannot read.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::metrics::{AppMetricsRecorder, PubSubMetricsRecorder};
use crate::models::{AppError, EventTxnData, PubSubMetricsLabelValues};

pub const ORDERS_TOPIC: &str = "orders";

pub const ERR_ORDER_ENCODE: &str = "ERR_ORDER_ENCODE";
pub const ERR_ORDER_PUBLISH: &str = "ERR_ORDER_PUBLISH";
pub const ERR_ORDER_DECODE: &str = "ERR_ORDER_DECODE";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub id: u64,
    pub user_id: u64,
    pub amount_cents: u64,
}

fn order_labels(entity_op_type: &str, error_code: &str) -> PubSubMetricsLabelValues {
    PubSubMetricsLabelValues {
        source: ORDERS_TOPIC.to_string(),
        entity: "order".to_string(),
        entity_op_type: entity_op_type.to_string(),
        error_code: error_code.to_string(),
    }
}

pub struct OrderPublisher {
    sender: mpsc::Sender<Vec<u8>>,
    next_id: AtomicU64,
    metrics: Arc<dyn PubSubMetricsRecorder>,
}

impl OrderPublisher {
    pub fn new(sender: mpsc::Sender<Vec<u8>>, metrics: Arc<dyn PubSubMetricsRecorder>) -> Self {
        OrderPublisher {
            sender,
            next_id: AtomicU64::new(1),
            metrics,
        }
    }

    fn labels(error_code: &str) -> PubSubMetricsLabelValues {
        order_labels("created", error_code)
    }

    pub async fn publish(&self, user_id: u64, amount_cents: u64) -> Result<Order, AppError> {
        let order = Order {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            user_id,
            amount_cents,
        };

        let start = self.metrics.log_metrics_pre(&Self::labels(""));

        let (result, size) = match serde_json::to_vec(&order) {
            Ok(payload) => {
                let size = payload.len() as u64;
                let sent = self
                    .sender
                    .send(payload)
                    .await
                    .map_err(|_| AppError::new(ERR_ORDER_PUBLISH, "orders topic is closed"));
                (sent, size)
            }
            Err(e) => (Err(AppError::new(ERR_ORDER_ENCODE, e.to_string())), 0),
        };

        let txn = EventTxnData {
            is_published: result.is_ok(),
            time_taken_to_publish: start.elapsed(),
            message_size_in_bytes: size,
        };
        let error_code = result.as_ref().err().map(|e| e.code.as_str()).unwrap_or("");
        self.metrics
            .log_metrics_post(&Self::labels(error_code), Some(&txn));

        result.map(|_| order)
    }
}

/// Consumes the orders topic until every sender is dropped. `processed`
/// counts the orders decoded successfully.
///
/// Each message is reported as a consumption of `order`/`consumed`, failed
/// with `ERR_ORDER_DECODE` when the payload cannot be read.
pub fn spawn_order_consumer(
    mut receiver: mpsc::Receiver<Vec<u8>>,
    pubsub_metrics: Arc<dyn PubSubMetricsRecorder>,
    app_metrics: Arc<dyn AppMetricsRecorder>,
    processed: Arc<AtomicU64>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(payload) = receiver.recv().await {
            pubsub_metrics.log_metrics_pre(&order_labels("consumed", ""));
            let error_code = match serde_json::from_slice::<Order>(&payload) {
                Ok(order) => {
                    debug!(order_id = order.id, user_id = order.user_id, "Consumed order");
                    processed.fetch_add(1, Ordering::Relaxed);
                    ""
                }
                Err(e) => {
                    warn!(code = ERR_ORDER_DECODE, err = %e, "Dropping undecodable order event");
                    app_metrics.log_metrics(&[ERR_ORDER_DECODE.to_string()]);
                    ERR_ORDER_DECODE
                }
            };
            pubsub_metrics.log_metrics_post(&order_labels("consumed", error_code), None);
        }
        debug!("Orders topic closed, consumer stopped");
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::mock::{MockAppMetrics, MockPubSubMetrics};
    use crate::metrics::prom::PromPubSubMetrics;
    use crate::models::{MetricMeta, PubSubMetricsMeta};
    use prometheus::Registry;

    #[tokio::test]
    async fn test_publish_reports_published_event() {
        let (tx, mut rx) = mpsc::channel(4);
        let metrics = Arc::new(MockPubSubMetrics::new());
        let publisher = OrderPublisher::new(tx, metrics.clone());

        let order = publisher.publish(7, 1250).await.unwrap();
        let payload = rx.recv().await.unwrap();
        assert_eq!(serde_json::from_slice::<Order>(&payload).unwrap(), order);

        let calls = metrics.calls();
        assert!(calls.log_metrics_pre_called);
        let txn = calls.log_metrics_post_event_txn_data.unwrap();
        assert!(txn.is_published);
        assert_eq!(txn.message_size_in_bytes, payload.len() as u64);
        assert_eq!(calls.log_metrics_post_label_values.unwrap().error_code, "");
    }

    #[tokio::test]
    async fn test_publish_to_closed_topic_fails() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let metrics = Arc::new(MockPubSubMetrics::new());
        let publisher = OrderPublisher::new(tx, metrics.clone());

        let err = publisher.publish(7, 1250).await.unwrap_err();
        assert_eq!(err.code, ERR_ORDER_PUBLISH);

        let calls = metrics.calls();
        assert!(!calls.log_metrics_post_event_txn_data.unwrap().is_published);
        assert_eq!(
            calls.log_metrics_post_label_values.unwrap().error_code,
            ERR_ORDER_PUBLISH
        );
    }

    #[tokio::test]
    async fn test_consumer_counts_orders_and_flags_garbage() {
        let (tx, rx) = mpsc::channel(4);
        let pubsub_metrics = Arc::new(MockPubSubMetrics::new());
        let app_metrics = Arc::new(MockAppMetrics::new());
        let processed = Arc::new(AtomicU64::new(0));
        let handle = spawn_order_consumer(
            rx,
            pubsub_metrics.clone(),
            app_metrics.clone(),
            processed.clone(),
        );

        let order = Order {
            id: 1,
            user_id: 2,
            amount_cents: 3,
        };
        tx.send(serde_json::to_vec(&order).unwrap()).await.unwrap();
        tx.send(b"not json".to_vec()).await.unwrap();
        drop(tx);
        handle.await.unwrap();

        assert_eq!(processed.load(Ordering::Relaxed), 1);
        let last = pubsub_metrics.calls().log_metrics_post_label_values.unwrap();
        assert_eq!(last.entity_op_type, "consumed");
        assert_eq!(last.error_code, ERR_ORDER_DECODE);
        assert_eq!(
            app_metrics.calls().log_metrics_err_codes,
            vec![ERR_ORDER_DECODE.to_string()]
        );
    }

    #[tokio::test]
    async fn test_consumer_reports_decode_failure_as_failed_consumption() {
        let registry = Registry::new();
        let pubsub_metrics = Arc::new(PromPubSubMetrics::new(
            &PubSubMetricsMeta {
                namespace: "test".to_string(),
                total_messages_consumed: Some(MetricMeta::new([
                    "source",
                    "entity",
                    "op_type",
                    "status",
                    "error_code",
                ])),
                ..Default::default()
            },
            &registry,
        ));
        let (tx, rx) = mpsc::channel(4);
        let handle = spawn_order_consumer(
            rx,
            pubsub_metrics.clone(),
            Arc::new(MockAppMetrics::new()),
            Arc::new(AtomicU64::new(0)),
        );

        let order = Order {
            id: 1,
            user_id: 2,
            amount_cents: 3,
        };
        tx.send(serde_json::to_vec(&order).unwrap()).await.unwrap();
        tx.send(b"not json".to_vec()).await.unwrap();
        drop(tx);
        handle.await.unwrap();

        let consumed = pubsub_metrics.total_messages_consumed_metric().unwrap();
        let count = |status: &str, code: &str| {
            consumed
                .with_label_values(&[ORDERS_TOPIC, "order", "consumed", status, code])
                .get()
        };
        assert_eq!(count("total", ""), 2.0);
        assert_eq!(count("success", ""), 1.0);
        assert_eq!(count("failure", ERR_ORDER_DECODE), 1.0);
    }
}
