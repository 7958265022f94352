//! Live metric sets backed by the Prometheus client.

mod alerting;
mod app;
mod cron_job;
mod database;
mod downstream;
mod pubsub;
mod router;

pub use alerting::PromAdsAlertingMetrics;
pub use app::PromAppMetrics;
pub use cron_job::PromCronJobMetrics;
pub use database::PromDbMetrics;
pub use downstream::PromDownstreamServiceMetrics;
pub use pubsub::PromPubSubMetrics;
pub use router::{approximate_request_size, is_success_status, PromRouterMetrics};
