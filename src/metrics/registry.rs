//! Registration and observation helpers wrapping the Prometheus client.
//!
//! Registration never fails the caller: a metric that cannot be registered
//! (typically because the same name is already in the registry) is logged
//! and returned anyway. Observations never panic: a label-count mismatch or
//! an invalid counter increment is logged through the throttle and the
//! observation is dropped.

use std::time::Duration;

use prometheus::core::Collector;
use prometheus::{CounterVec, GaugeVec, HistogramOpts, HistogramVec, Opts, Registry};
use tracing::{error, warn};

use crate::utils::log_throttle::should_emit;

/// Minimum spacing of repeated warnings about the same metric.
const LOG_INTERVAL: Duration = Duration::from_secs(60);

fn label_refs(labels: &[String]) -> Vec<&str> {
    labels.iter().map(String::as_str).collect()
}

fn register<C: Collector + Clone + 'static>(registry: &Registry, metric: &C, code: &str) {
    if let Err(e) = registry.register(Box::new(metric.clone())) {
        error!(code, err = %e, "failed to register metric");
    }
}

/// Creates and registers a counter vector.
///
/// Returns `None` only when the client rejects the definition itself
/// (invalid metric or label name); that sub-metric is then disabled.
pub fn counter_vec(
    registry: &Registry,
    namespace: &str,
    name: &str,
    help: &str,
    labels: &[String],
) -> Option<CounterVec> {
    let opts = Opts::new(name, help).namespace(namespace);
    match CounterVec::new(opts, &label_refs(labels)) {
        Ok(counter) => {
            register(registry, &counter, "OnCounterVecMetricRegisterFailure");
            Some(counter)
        }
        Err(e) => {
            error!(code = "OnCounterVecMetricCreateFailure", namespace, name, err = %e, "failed to create counter vec metric");
            None
        }
    }
}

/// Creates and registers a histogram vector. Empty `buckets` selects the
/// client's default buckets.
pub fn histogram_vec(
    registry: &Registry,
    namespace: &str,
    name: &str,
    help: &str,
    labels: &[String],
    buckets: &[f64],
) -> Option<HistogramVec> {
    let mut opts = HistogramOpts::new(name, help).namespace(namespace);
    if !buckets.is_empty() {
        opts = opts.buckets(buckets.to_vec());
    }
    match HistogramVec::new(opts, &label_refs(labels)) {
        Ok(histogram) => {
            register(registry, &histogram, "OnHistogramMetricRegisterFailure");
            Some(histogram)
        }
        Err(e) => {
            error!(code = "OnHistogramMetricCreateFailure", namespace, name, err = %e, "failed to create histogram vec metric");
            None
        }
    }
}

/// Creates and registers a gauge vector.
pub fn gauge_vec(
    registry: &Registry,
    namespace: &str,
    name: &str,
    help: &str,
    labels: &[String],
) -> Option<GaugeVec> {
    let opts = Opts::new(name, help).namespace(namespace);
    match GaugeVec::new(opts, &label_refs(labels)) {
        Ok(gauge) => {
            register(registry, &gauge, "OnGaugeVecMetricRegisterFailure");
            Some(gauge)
        }
        Err(e) => {
            error!(code = "OnGaugeVecMetricCreateFailure", namespace, name, err = %e, "failed to create gauge vec metric");
            None
        }
    }
}

/// Exponentially spaced buckets: `start * factor^i` for `i` in `0..count`.
///
/// Fails when `start <= 0`, `factor <= 1` or `count < 1`.
pub fn exponential_buckets(start: f64, factor: f64, count: usize) -> prometheus::Result<Vec<f64>> {
    prometheus::exponential_buckets(start, factor, count)
}

fn metric_name<C: Collector>(metric: &C) -> String {
    metric
        .desc()
        .first()
        .map(|d| d.fq_name.clone())
        .unwrap_or_default()
}

fn report_label_mismatch<C: Collector>(metric: &C, err: prometheus::Error) {
    let name = metric_name(metric);
    if let Some(suppressed) = should_emit(&format!("label_mismatch.{name}"), LOG_INTERVAL) {
        warn!(metric = %name, err = %err, suppressed, "dropping observation with mismatched label values");
    }
}

fn report_invalid_increment(counter: &CounterVec, v: f64) {
    let name = metric_name(counter);
    if let Some(suppressed) = should_emit(&format!("invalid_increment.{name}"), LOG_INTERVAL) {
        warn!(metric = %name, value = v, suppressed, "ignoring counter increment that is negative or not finite");
    }
}

pub(crate) fn inc(counter: &CounterVec, values: &[&str]) {
    match counter.get_metric_with_label_values(values) {
        Ok(c) => c.inc(),
        Err(e) => report_label_mismatch(counter, e),
    }
}

pub(crate) fn inc_by(counter: &CounterVec, values: &[&str], v: f64) {
    if !v.is_finite() || v < 0.0 {
        report_invalid_increment(counter, v);
        return;
    }
    match counter.get_metric_with_label_values(values) {
        Ok(c) => c.inc_by(v),
        Err(e) => report_label_mismatch(counter, e),
    }
}

pub(crate) fn gauge_inc(gauge: &GaugeVec, values: &[&str]) {
    match gauge.get_metric_with_label_values(values) {
        Ok(g) => g.inc(),
        Err(e) => report_label_mismatch(gauge, e),
    }
}

pub(crate) fn gauge_dec(gauge: &GaugeVec, values: &[&str]) {
    match gauge.get_metric_with_label_values(values) {
        Ok(g) => g.dec(),
        Err(e) => report_label_mismatch(gauge, e),
    }
}

pub(crate) fn observe(histogram: &HistogramVec, values: &[&str], v: f64) {
    match histogram.get_metric_with_label_values(values) {
        Ok(h) => h.observe(v),
        Err(e) => report_label_mismatch(histogram, e),
    }
}

/// Whole milliseconds, truncated.
pub(crate) fn millis(d: Duration) -> f64 {
    d.as_millis() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_exponential_buckets() {
        assert_eq!(
            exponential_buckets(10.0, 2.0, 5).unwrap(),
            vec![10.0, 20.0, 40.0, 80.0, 160.0]
        );
        assert_eq!(exponential_buckets(1.0, 2.0, 1).unwrap(), vec![1.0]);
    }

    #[test]
    fn test_exponential_buckets_rejects_invalid_arguments() {
        assert!(exponential_buckets(0.0, 2.0, 3).is_err());
        assert!(exponential_buckets(1.0, 1.0, 3).is_err());
        assert!(exponential_buckets(1.0, 2.0, 0).is_err());
    }

    #[test]
    fn test_duplicate_registration_still_returns_handle() {
        let registry = Registry::new();
        let first = counter_vec(&registry, "app", "dup", "help", &labels(&["a"])).unwrap();
        let second = counter_vec(&registry, "app", "dup", "help", &labels(&["a"])).unwrap();

        first.with_label_values(&["x"]).inc();
        second.with_label_values(&["x"]).inc();

        // Only the first one is exported, but both stay usable.
        assert_eq!(first.with_label_values(&["x"]).get(), 1.0);
        assert_eq!(second.with_label_values(&["x"]).get(), 1.0);
        assert_eq!(registry.gather().len(), 1);
    }

    #[test]
    fn test_invalid_metric_name_disables_metric() {
        let registry = Registry::new();
        assert!(counter_vec(&registry, "app", "bad-name", "help", &labels(&["a"])).is_none());
        assert!(registry.gather().is_empty());
    }

    #[test]
    fn test_histogram_without_buckets_uses_defaults() {
        let registry = Registry::new();
        let histogram =
            histogram_vec(&registry, "app", "latency", "help", &labels(&["op"]), &[]).unwrap();
        histogram.with_label_values(&["read"]).observe(0.2);

        let families = registry.gather();
        let buckets = families[0].get_metric()[0].get_histogram().get_bucket();
        assert_eq!(buckets.len(), prometheus::DEFAULT_BUCKETS.len());
    }

    #[test]
    fn test_histogram_uses_given_buckets() {
        let registry = Registry::new();
        let histogram = histogram_vec(
            &registry,
            "app",
            "size",
            "help",
            &labels(&["op"]),
            &[10.0, 100.0],
        )
        .unwrap();
        histogram.with_label_values(&["read"]).observe(50.0);

        let families = registry.gather();
        let buckets = families[0].get_metric()[0].get_histogram().get_bucket();
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].get_cumulative_count(), 0);
        assert_eq!(buckets[1].get_cumulative_count(), 1);
    }

    #[test]
    fn test_label_mismatch_is_dropped_without_panic() {
        let registry = Registry::new();
        let counter = counter_vec(&registry, "app", "ops", "help", &labels(&["a", "b"])).unwrap();
        let gauge = gauge_vec(&registry, "app", "errs", "help", &labels(&["code"])).unwrap();
        let histogram =
            histogram_vec(&registry, "app", "lat", "help", &labels(&["a"]), &[1.0]).unwrap();

        inc(&counter, &["only-one"]);
        gauge_dec(&gauge, &["x", "y"]);
        observe(&histogram, &[], 3.0);
        inc(&counter, &["x", "y"]);

        assert_eq!(counter.with_label_values(&["x", "y"]).get(), 1.0);
    }

    #[test]
    fn test_inc_by_ignores_negative_amounts() {
        let registry = Registry::new();
        let counter = counter_vec(&registry, "app", "alerts", "help", &labels(&["a"])).unwrap();
        inc_by(&counter, &["x"], 2.5);
        inc_by(&counter, &["x"], -1.0);
        inc_by(&counter, &["x"], f64::NAN);
        assert_eq!(counter.with_label_values(&["x"]).get(), 2.5);
    }

    #[test]
    fn test_invalid_increments_are_throttled_per_metric() {
        let registry = Registry::new();
        let counter =
            counter_vec(&registry, "app", "throttled_alerts", "help", &labels(&["a"])).unwrap();

        for _ in 0..100 {
            inc_by(&counter, &["x"], -1.0);
        }

        // the first warning opened the window, every later one was suppressed
        assert_eq!(
            should_emit("invalid_increment.app_throttled_alerts", LOG_INTERVAL),
            None
        );
        assert_eq!(counter.with_label_values(&["x"]).get(), 0.0);
    }

    #[test]
    fn test_millis_truncates() {
        assert_eq!(millis(Duration::from_micros(1_999)), 1.0);
        assert_eq!(millis(Duration::ZERO), 0.0);
    }
}
