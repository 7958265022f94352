//! Label values and thresholds shared by every metric domain.

/// Status label value recorded by `log_metrics_pre`.
pub const TOTAL: &str = "total";

/// Status label value for a successful operation.
pub const SUCCESS: &str = "success";

/// Status label value for a failed operation.
pub const FAILURE: &str = "failure";

/// Lowest HTTP status code counted as a success (inclusive).
pub const HTTP_STATUS_2XX_MIN_VALUE: u16 = 200;

/// Highest HTTP status code counted as a success (inclusive).
pub const HTTP_STATUS_2XX_MAX_VALUE: u16 = 299;

/// Maps an operation outcome to the status label.
pub fn status_label(success: bool) -> &'static str {
    if success {
        SUCCESS
    } else {
        FAILURE
    }
}
