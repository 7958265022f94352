//! Metrics for outbound HTTP calls to downstream services.

use std::time::Instant;

use prometheus::{CounterVec, HistogramVec, Registry};

use crate::constants::{status_label, TOTAL};
use crate::metrics::recorder::DownstreamServiceMetricsRecorder;
use crate::metrics::registry::{counter_vec, histogram_vec, inc, millis, observe};
use crate::models::{DownstreamServiceMetricsLabelValues, DownstreamServiceMetricsMeta, HttpMetrics};

/// Counter labels: `(service, method, code, api, status)`.
/// Histogram labels: `(service, method, code, api)`.
///
/// The code label is empty on the `total` series since no response exists yet.
pub struct PromDownstreamServiceMetrics {
    http_requests: Option<CounterVec>,
    http_requests_latency_millis: Option<HistogramVec>,
    http_request_size_bytes: Option<HistogramVec>,
    http_response_size_bytes: Option<HistogramVec>,
}

impl PromDownstreamServiceMetrics {
    pub fn new(meta: &DownstreamServiceMetricsMeta, registry: &Registry) -> Self {
        let ns = &meta.namespace;
        let http_requests = meta.http_requests.as_ref().and_then(|m| {
            counter_vec(
                registry,
                ns,
                "downstream_service_http_requests",
                "Tracks the number of HTTP requests at downstream service level",
                &m.labels,
            )
        });
        let http_requests_latency_millis =
            meta.http_requests_latency_millis.as_ref().and_then(|m| {
                histogram_vec(
                    registry,
                    ns,
                    "downstream_service_http_request_latency_millis",
                    "Tracks the latencies for HTTP requests at downstream service level",
                    &m.labels,
                    &m.buckets,
                )
            });
        let http_request_size_bytes = meta.http_request_size_bytes.as_ref().and_then(|m| {
            histogram_vec(
                registry,
                ns,
                "downstream_service_http_request_size_bytes",
                "Tracks the size of HTTP requests at downstream service level",
                &m.labels,
                &m.buckets,
            )
        });
        let http_response_size_bytes = meta.http_response_size_bytes.as_ref().and_then(|m| {
            histogram_vec(
                registry,
                ns,
                "downstream_service_http_response_size_bytes",
                "Tracks the size of HTTP responses at downstream service level",
                &m.labels,
                &m.buckets,
            )
        });

        PromDownstreamServiceMetrics {
            http_requests,
            http_requests_latency_millis,
            http_request_size_bytes,
            http_response_size_bytes,
        }
    }

    pub fn http_requests_metric(&self) -> Option<&CounterVec> {
        self.http_requests.as_ref()
    }

    pub fn http_requests_latency_millis_metric(&self) -> Option<&HistogramVec> {
        self.http_requests_latency_millis.as_ref()
    }

    pub fn http_request_size_bytes_metric(&self) -> Option<&HistogramVec> {
        self.http_request_size_bytes.as_ref()
    }

    pub fn http_response_size_bytes_metric(&self) -> Option<&HistogramVec> {
        self.http_response_size_bytes.as_ref()
    }
}

impl DownstreamServiceMetricsRecorder for PromDownstreamServiceMetrics {
    fn log_metrics_pre(&self, lv: &DownstreamServiceMetricsLabelValues) -> Instant {
        if let Some(counter) = &self.http_requests {
            inc(
                counter,
                &[&lv.name, &lv.http_method, "", &lv.api_identifier, TOTAL],
            );
        }
        Instant::now()
    }

    fn log_metrics_post(
        &self,
        success: bool,
        lv: &DownstreamServiceMetricsLabelValues,
        http_metrics: &HttpMetrics,
    ) {
        let code = http_metrics.code.to_string();
        let values = [
            lv.name.as_str(),
            http_metrics.method.as_str(),
            code.as_str(),
            lv.api_identifier.as_str(),
        ];

        if let Some(counter) = &self.http_requests {
            let [name, method, code, api] = values;
            inc(counter, &[name, method, code, api, status_label(success)]);
        }
        if let Some(histogram) = &self.http_requests_latency_millis {
            observe(histogram, &values, millis(http_metrics.response_time));
        }
        if let Some(histogram) = &self.http_request_size_bytes {
            observe(histogram, &values, http_metrics.request_body_size_bytes as f64);
        }
        if let Some(histogram) = &self.http_response_size_bytes {
            observe(histogram, &values, http_metrics.response_body_size_bytes as f64);
        }
    }
}
