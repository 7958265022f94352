//! Per-call label values.
//!
//! These are borrowed for the duration of a log call and never retained
//! by the live metric sets.

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct DbMetricsLabelValues {
    /// e.g. "select", "insert", "update", "delete"
    pub op_type: String,
    /// Caller of the operation, typically a repository name.
    pub source: String,
    /// Table or entity being operated on.
    pub entity: String,
    /// "true" or "false"
    pub is_txn: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct DownstreamServiceMetricsLabelValues {
    /// Name of the downstream service.
    pub name: String,
    pub http_method: String,
    /// Identifier of the API endpoint being called.
    pub api_identifier: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct CronJobMetricsLabelValues {
    pub job_name: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct PubSubMetricsLabelValues {
    /// Subscription or topic the message came from.
    pub source: String,
    pub entity: String,
    pub entity_op_type: String,
    /// Empty on success. A non-empty code marks the consumption as failed.
    pub error_code: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct AdsAlertingMetricsLabelValues {
    pub account_id: String,
    pub metric_name: String,
    pub alert_level: String,
    pub alert_type: String,
    pub frequency: String,
    pub severity: String,
    pub entity_type: String,
}
