//! Recording mocks for assertion-based tests.
//!
//! Each mock remembers whether each method was called and the arguments of
//! the latest call. Nothing is registered or observed. Call `calls()` to
//! get a snapshot of what was recorded.

use std::sync::{Mutex, PoisonError};
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

fn record<T>(calls: &Mutex<T>, f: impl FnOnce(&mut T)) {
    let mut guard = calls.lock().unwrap_or_else(PoisonError::into_inner);
    f(&mut guard);
}

fn snapshot<T: Clone>(calls: &Mutex<T>) -> T {
    calls.lock().unwrap_or_else(PoisonError::into_inner).clone()
}

// -- Router

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MockRouterMetricsCalls {
    pub log_metrics_called: bool,
    pub log_metrics_path: String,
}

/// Pass-through middleware that records the metrics path it was given.
#[derive(Debug, Default)]
pub struct MockRouterMetrics {
    calls: Mutex<MockRouterMetricsCalls>,
}

impl MockRouterMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> MockRouterMetricsCalls {
        snapshot(&self.calls)
    }
}

#[async_trait]
impl RouterMetricsRecorder for MockRouterMetrics {
    async fn log_metrics(&self, metrics_path: &str, request: Request, next: Next) -> Response {
        record(&self.calls, |c| {
            c.log_metrics_called = true;
            c.log_metrics_path = metrics_path.to_string();
        });
        next.run(request).await
    }
}

// -- Database

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MockDbMetricsCalls {
    pub log_metrics_pre_called: bool,
    pub log_metrics_pre_label_values: Option<DbMetricsLabelValues>,
    pub log_metrics_post_called: bool,
    pub log_metrics_post_app_err: Option<AppError>,
    pub log_metrics_post_label_values: Option<DbMetricsLabelValues>,
}

#[derive(Debug, Default)]
pub struct MockDbMetrics {
    calls: Mutex<MockDbMetricsCalls>,
}

impl MockDbMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> MockDbMetricsCalls {
        snapshot(&self.calls)
    }
}

impl DbMetricsRecorder for MockDbMetrics {
    fn log_metrics_pre(&self, label_values: &DbMetricsLabelValues) -> Instant {
        record(&self.calls, |c| {
            c.log_metrics_pre_called = true;
            c.log_metrics_pre_label_values = Some(label_values.clone());
        });
        Instant::now()
    }

    fn log_metrics_post(
        &self,
        app_err: Option<&AppError>,
        label_values: &DbMetricsLabelValues,
        _ops_exec_time: Instant,
    ) {
        record(&self.calls, |c| {
            c.log_metrics_post_called = true;
            c.log_metrics_post_app_err = app_err.cloned();
            c.log_metrics_post_label_values = Some(label_values.clone());
        });
    }
}

// -- Downstream service

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MockDownstreamServiceMetricsCalls {
    pub log_metrics_pre_called: bool,
    pub log_metrics_pre_label_values: Option<DownstreamServiceMetricsLabelValues>,
    pub log_metrics_post_called: bool,
    pub log_metrics_post_success: bool,
    pub log_metrics_post_label_values: Option<DownstreamServiceMetricsLabelValues>,
    pub log_metrics_post_http_metrics: Option<HttpMetrics>,
}

#[derive(Debug, Default)]
pub struct MockDownstreamServiceMetrics {
    calls: Mutex<MockDownstreamServiceMetricsCalls>,
}

impl MockDownstreamServiceMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> MockDownstreamServiceMetricsCalls {
        snapshot(&self.calls)
    }
}

impl DownstreamServiceMetricsRecorder for MockDownstreamServiceMetrics {
    fn log_metrics_pre(&self, label_values: &DownstreamServiceMetricsLabelValues) -> Instant {
        record(&self.calls, |c| {
            c.log_metrics_pre_called = true;
            c.log_metrics_pre_label_values = Some(label_values.clone());
        });
        Instant::now()
    }

    fn log_metrics_post(
        &self,
        success: bool,
        label_values: &DownstreamServiceMetricsLabelValues,
        http_metrics: &HttpMetrics,
    ) {
        record(&self.calls, |c| {
            c.log_metrics_post_called = true;
            c.log_metrics_post_success = success;
            c.log_metrics_post_label_values = Some(label_values.clone());
            c.log_metrics_post_http_metrics = Some(http_metrics.clone());
        });
    }
}

// -- Cron job

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MockCronJobMetricsCalls {
    pub log_metrics_pre_called: bool,
    pub log_metrics_pre_label_values: Option<CronJobMetricsLabelValues>,
    pub log_metrics_post_called: bool,
    pub log_metrics_post_app_err: Option<AppError>,
    pub log_metrics_post_label_values: Option<CronJobMetricsLabelValues>,
}

#[derive(Debug, Default)]
pub struct MockCronJobMetrics {
    calls: Mutex<MockCronJobMetricsCalls>,
}

impl MockCronJobMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> MockCronJobMetricsCalls {
        snapshot(&self.calls)
    }
}

impl CronJobMetricsRecorder for MockCronJobMetrics {
    fn log_metrics_pre(&self, label_values: &CronJobMetricsLabelValues) -> Instant {
        record(&self.calls, |c| {
            c.log_metrics_pre_called = true;
            c.log_metrics_pre_label_values = Some(label_values.clone());
        });
        Instant::now()
    }

    fn log_metrics_post(
        &self,
        app_err: Option<&AppError>,
        label_values: &CronJobMetricsLabelValues,
        _ops_exec_time: Instant,
    ) {
        record(&self.calls, |c| {
            c.log_metrics_post_called = true;
            c.log_metrics_post_app_err = app_err.cloned();
            c.log_metrics_post_label_values = Some(label_values.clone());
        });
    }
}

// -- Pub/sub

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MockPubSubMetricsCalls {
    pub log_metrics_pre_called: bool,
    pub log_metrics_pre_label_values: Option<PubSubMetricsLabelValues>,
    pub log_metrics_post_called: bool,
    pub log_metrics_post_label_values: Option<PubSubMetricsLabelValues>,
    pub log_metrics_post_event_txn_data: Option<EventTxnData>,
}

#[derive(Debug, Default)]
pub struct MockPubSubMetrics {
    calls: Mutex<MockPubSubMetricsCalls>,
}

impl MockPubSubMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> MockPubSubMetricsCalls {
        snapshot(&self.calls)
    }
}

impl PubSubMetricsRecorder for MockPubSubMetrics {
    fn log_metrics_pre(&self, label_values: &PubSubMetricsLabelValues) -> Instant {
        record(&self.calls, |c| {
            c.log_metrics_pre_called = true;
            c.log_metrics_pre_label_values = Some(label_values.clone());
        });
        Instant::now()
    }

    fn log_metrics_post(
        &self,
        label_values: &PubSubMetricsLabelValues,
        event_txn_data: Option<&EventTxnData>,
    ) {
        record(&self.calls, |c| {
            c.log_metrics_post_called = true;
            c.log_metrics_post_label_values = Some(label_values.clone());
            c.log_metrics_post_event_txn_data = event_txn_data.cloned();
        });
    }
}

// -- Application errors

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MockAppMetricsCalls {
    pub log_metrics_called: bool,
    pub log_metrics_err_codes: Vec<String>,
    pub decrement_app_error_count_called: bool,
    pub decrement_app_error_count_err_code: String,
}

#[derive(Debug, Default)]
pub struct MockAppMetrics {
    calls: Mutex<MockAppMetricsCalls>,
}

impl MockAppMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> MockAppMetricsCalls {
        snapshot(&self.calls)
    }
}

impl AppMetricsRecorder for MockAppMetrics {
    fn log_metrics(&self, err_codes: &[String]) {
        record(&self.calls, |c| {
            c.log_metrics_called = true;
            c.log_metrics_err_codes = err_codes.to_vec();
        });
    }

    fn decrement_app_error_count(&self, err_code: &str) {
        record(&self.calls, |c| {
            c.decrement_app_error_count_called = true;
            c.decrement_app_error_count_err_code = err_code.to_string();
        });
    }
}

// -- Ads alerting

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MockAdsAlertingMetricsCalls {
    pub log_metrics_called: bool,
    pub log_metrics_label_values: Option<AdsAlertingMetricsLabelValues>,
    pub log_metrics_log_info: Option<AdsAlertingMetricsLogInfo>,
}

#[derive(Debug, Default)]
pub struct MockAdsAlertingMetrics {
    calls: Mutex<MockAdsAlertingMetricsCalls>,
}

impl MockAdsAlertingMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> MockAdsAlertingMetricsCalls {
        snapshot(&self.calls)
    }
}

impl AdsAlertingMetricsRecorder for MockAdsAlertingMetrics {
    fn log_metrics(
        &self,
        label_values: &AdsAlertingMetricsLabelValues,
        log_info: &AdsAlertingMetricsLogInfo,
    ) {
        record(&self.calls, |c| {
            c.log_metrics_called = true;
            c.log_metrics_label_values = Some(label_values.clone());
            c.log_metrics_log_info = Some(log_info.clone());
        });
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_mock_db_records_arguments() {
        let mock = MockDbMetrics::new();
        assert_eq!(mock.calls(), MockDbMetricsCalls::default());

        let lv = DbMetricsLabelValues {
            op_type: "insert".to_string(),
            source: "OrderRepository".to_string(),
            entity: "orders".to_string(),
            is_txn: "true".to_string(),
        };
        let err = AppError::new("ERR_DUPLICATE", "duplicate key");

        let start = mock.log_metrics_pre(&lv);
        mock.log_metrics_post(Some(&err), &lv, start);

        let calls = mock.calls();
        assert!(calls.log_metrics_pre_called);
        assert_eq!(calls.log_metrics_pre_label_values.as_ref(), Some(&lv));
        assert!(calls.log_metrics_post_called);
        assert_eq!(calls.log_metrics_post_app_err, Some(err));
        assert_eq!(calls.log_metrics_post_label_values, Some(lv));
    }

    #[test]
    fn test_mock_downstream_records_arguments() {
        let mock = MockDownstreamServiceMetrics::new();
        let lv = DownstreamServiceMetricsLabelValues {
            name: "notification-service".to_string(),
            http_method: "POST".to_string(),
            api_identifier: "/api/v1/notifications".to_string(),
        };
        let http_metrics = HttpMetrics {
            method: "POST".to_string(),
            url: "/api/v1/notifications".to_string(),
            code: 202,
            request_body_size_bytes: 1024,
            response_body_size_bytes: 256,
            response_time: Duration::from_millis(80),
        };

        mock.log_metrics_pre(&lv);
        mock.log_metrics_post(true, &lv, &http_metrics);

        let calls = mock.calls();
        assert!(calls.log_metrics_pre_called);
        assert!(calls.log_metrics_post_called);
        assert!(calls.log_metrics_post_success);
        assert_eq!(calls.log_metrics_post_label_values, Some(lv));
        assert_eq!(calls.log_metrics_post_http_metrics, Some(http_metrics));
    }

    #[test]
    fn test_mock_cron_job_records_success() {
        let mock = MockCronJobMetrics::new();
        let lv = CronJobMetricsLabelValues {
            job_name: "daily_cleanup".to_string(),
        };

        let start = mock.log_metrics_pre(&lv);
        mock.log_metrics_post(None, &lv, start);

        let calls = mock.calls();
        assert!(calls.log_metrics_pre_called);
        assert!(calls.log_metrics_post_called);
        assert_eq!(calls.log_metrics_post_app_err, None);
        assert_eq!(calls.log_metrics_post_label_values, Some(lv));
    }

    #[test]
    fn test_mock_pubsub_records_txn_data() {
        let mock = MockPubSubMetrics::new();
        let lv = PubSubMetricsLabelValues {
            source: "orders-subscription".to_string(),
            entity: "order".to_string(),
            entity_op_type: "create".to_string(),
            error_code: String::new(),
        };
        let txn = EventTxnData {
            is_published: true,
            time_taken_to_publish: Duration::from_millis(12),
            message_size_in_bytes: 2048,
        };

        mock.log_metrics_pre(&lv);
        mock.log_metrics_post(&lv, Some(&txn));

        let calls = mock.calls();
        assert_eq!(calls.log_metrics_pre_label_values, Some(lv.clone()));
        assert_eq!(calls.log_metrics_post_label_values, Some(lv));
        assert_eq!(calls.log_metrics_post_event_txn_data, Some(txn));
    }

    #[test]
    fn test_mock_app_records_codes() {
        let mock = MockAppMetrics::new();
        let codes = vec!["ERR_DB_CONNECTION".to_string(), "ERR_VALIDATION".to_string()];

        mock.log_metrics(&codes);
        mock.decrement_app_error_count("ERR_DB_CONNECTION");

        let calls = mock.calls();
        assert!(calls.log_metrics_called);
        assert_eq!(calls.log_metrics_err_codes, codes);
        assert!(calls.decrement_app_error_count_called);
        assert_eq!(calls.decrement_app_error_count_err_code, "ERR_DB_CONNECTION");
    }

    #[test]
    fn test_mock_alerting_records_arguments() {
        let mock = MockAdsAlertingMetrics::new();
        let lv = AdsAlertingMetricsLabelValues {
            account_id: "acc-1".to_string(),
            severity: "warning".to_string(),
            ..Default::default()
        };
        let info = AdsAlertingMetricsLogInfo {
            number_of_alerts_generated: 4.0,
        };

        mock.log_metrics(&lv, &info);

        let calls = mock.calls();
        assert!(calls.log_metrics_called);
        assert_eq!(calls.log_metrics_label_values, Some(lv));
        assert_eq!(calls.log_metrics_log_info, Some(info));
    }
}
