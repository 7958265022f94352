use std::fmt;

use serde::{Deserialize, Serialize};

/// Application-level error handed to the `log_metrics_post` methods.
///
/// Only its presence matters to the metric sets: `None` is a success,
/// `Some(_)` a failure. The code and message are carried for callers that
/// also want to feed [`AppMetricsRecorder`](crate::metrics::AppMetricsRecorder).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AppError {
    pub code: String,
    pub message: String,
}

impl AppError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        AppError {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_code_and_message() {
        let err = AppError::new("ERR_DB_QUERY", "connection reset");
        assert_eq!(err.to_string(), "ERR_DB_QUERY: connection reset");
    }
}
