//! Outcome data supplied to `log_metrics_post`.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Request/response figures of a completed downstream HTTP call.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpMetrics {
    pub method: String,
    pub url: String,
    pub code: u16,
    pub request_body_size_bytes: u64,
    pub response_body_size_bytes: u64,
    pub response_time: Duration,
}

/// Result of a publish attempt. Absent for pure consumption events.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct EventTxnData {
    pub is_published: bool,
    pub time_taken_to_publish: Duration,
    pub message_size_in_bytes: u64,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct AdsAlertingMetricsLogInfo {
    pub number_of_alerts_generated: f64,
}
