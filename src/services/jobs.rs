//! Periodic background jobs, each run reported as a cron job execution.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::metrics::CronJobMetricsRecorder;
use crate::models::{AppError, CronJobMetricsLabelValues};

pub const ORDER_SWEEPER_JOB: &str = "order_sweeper";

/// Runs one execution of `job_name` and records its outcome.
pub async fn run_job<F, Fut>(
    job_name: &str,
    metrics: &dyn CronJobMetricsRecorder,
    job: F,
) -> Result<(), AppError>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<(), AppError>>,
{
    let lv = CronJobMetricsLabelValues {
        job_name: job_name.to_string(),
    };
    let start = metrics.log_metrics_pre(&lv);
    let result = job().await;
    metrics.log_metrics_post(result.as_ref().err(), &lv, start);
    result
}

/// Every `period`, reports and resets the number of orders consumed since
/// the previous run.
pub fn spawn_order_sweeper(
    period: Duration,
    processed: Arc<AtomicU64>,
    metrics: Arc<dyn CronJobMetricsRecorder>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        // the first tick completes immediately
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let result = run_job(ORDER_SWEEPER_JOB, metrics.as_ref(), || async {
                let swept = processed.swap(0, Ordering::Relaxed);
                info!(job = ORDER_SWEEPER_JOB, swept, "Swept consumed orders");
                Ok(())
            })
            .await;
            if let Err(e) = result {
                warn!(job = ORDER_SWEEPER_JOB, err = %e, "Cron job failed");
            }
        }
    })
}
