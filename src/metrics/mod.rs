//! Metric recorders for the application's telemetry domains.
//!
//! Each domain has a capability trait (see [`recorder`]) and three
//! implementations: the Prometheus-backed `Prom*` set, an inert `NoOp*`
//! twin and a recording `Mock*` for tests.

mod body;
pub mod exposition;
pub mod middleware;
pub mod mock;
pub mod monitoring;
pub mod noop;
pub mod prom;
pub mod recorder;
pub mod registry;

pub use exposition::render;
pub use middleware::{track_metrics, RouterMetricsState};
pub use monitoring::Monitoring;
pub use recorder::{
    AdsAlertingMetricsRecorder, AppMetricsRecorder, CronJobMetricsRecorder, DbMetricsRecorder,
    DownstreamServiceMetricsRecorder, PubSubMetricsRecorder, RouterMetricsRecorder,
};
pub use registry::{counter_vec, exponential_buckets, gauge_vec, histogram_vec};
