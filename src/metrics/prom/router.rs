//! Inbound HTTP request metrics, recorded from axum middleware.

use std::time::Instant;

use async_trait::async_trait;
use axum::body::{Body, HttpBody};
use axum::extract::{MatchedPath, Request};
use axum::middleware::Next;
use axum::response::Response;
use http::{header, Version};
use prometheus::{CounterVec, HistogramVec, Registry};

use crate::constants::{status_label, HTTP_STATUS_2XX_MAX_VALUE, HTTP_STATUS_2XX_MIN_VALUE, TOTAL};
use crate::metrics::body::CountingBody;
use crate::metrics::recorder::RouterMetricsRecorder;
use crate::metrics::registry::{counter_vec, histogram_vec, inc, millis, observe};
use crate::models::RouterMetricsMeta;

/// Counter labels: `(method, code, path, status)`.
/// Histogram labels: `(method, code, path)`.
///
/// `path` is the matched route template, so `/users/42` and `/users/7` share
/// the `/users/:id` series. It is empty when no route matched.
pub struct PromRouterMetrics {
    http_requests: Option<CounterVec>,
    http_requests_latency_millis: Option<HistogramVec>,
    http_request_size_bytes: Option<HistogramVec>,
    http_response_size_bytes: Option<HistogramVec>,
}

impl PromRouterMetrics {
    pub fn new(meta: &RouterMetricsMeta, registry: &Registry) -> Self {
        let ns = &meta.namespace;
        let http_requests = meta.http_requests.as_ref().and_then(|m| {
            counter_vec(
                registry,
                ns,
                "http_requests",
                "Tracks the number of HTTP requests at application level",
                &m.labels,
            )
        });
        let http_requests_latency_millis =
            meta.http_requests_latency_millis.as_ref().and_then(|m| {
                histogram_vec(
                    registry,
                    ns,
                    "http_request_latency_millis",
                    "Tracks the latencies for HTTP requests at application level",
                    &m.labels,
                    &m.buckets,
                )
            });
        let http_request_size_bytes = meta.http_request_size_bytes.as_ref().and_then(|m| {
            histogram_vec(
                registry,
                ns,
                "http_request_size_bytes",
                "Tracks the size of HTTP requests at application level",
                &m.labels,
                &m.buckets,
            )
        });
        let http_response_size_bytes = meta.http_response_size_bytes.as_ref().and_then(|m| {
            histogram_vec(
                registry,
                ns,
                "http_response_size_bytes",
                "Tracks the size of HTTP responses at application level",
                &m.labels,
                &m.buckets,
            )
        });

        PromRouterMetrics {
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

#[async_trait]
impl RouterMetricsRecorder for PromRouterMetrics {
    async fn log_metrics(&self, metrics_path: &str, request: Request, next: Next) -> Response {
        if request.uri().path() == metrics_path {
            return next.run(request).await;
        }

        let start = Instant::now();
        let method = request.method().as_str().to_owned();
        let req_size = approximate_request_size(&request) as f64;
        let path = request
            .extensions()
            .get::<MatchedPath>()
            .map(|p| p.as_str().to_owned())
            .unwrap_or_default();

        if let Some(counter) = &self.http_requests {
            inc(counter, &[&method, "", &path, TOTAL]);
        }

        let response = next.run(request).await;

        let status = response.status().as_u16();
        let code = status.to_string();
        let elapsed = millis(start.elapsed());
        let values = [method.as_str(), code.as_str(), path.as_str()];

        if let Some(counter) = &self.http_requests {
            let success = is_success_status(status);
            inc(counter, &[&method, &code, &path, status_label(success)]);
        }
        if let Some(histogram) = &self.http_requests_latency_millis {
            observe(histogram, &values, elapsed);
        }
        if let Some(histogram) = &self.http_request_size_bytes {
            observe(histogram, &values, req_size);
        }
        match &self.http_response_size_bytes {
            Some(histogram) => observe_response_size(histogram, &values, response),
            None => response,
        }
    }
}

/// Observes the body length right away when it is known exactly. Streamed
/// bodies are wrapped and observed once fully sent.
fn observe_response_size(
    histogram: &HistogramVec,
    values: &[&str],
    response: Response,
) -> Response {
    if let Some(size) = response.body().size_hint().exact() {
        observe(histogram, values, size as f64);
        return response;
    }

    let histogram = histogram.clone();
    let values: Vec<String> = values.iter().map(|v| v.to_string()).collect();
    let (parts, body) = response.into_parts();
    let body = CountingBody::new(body, move |size| {
        let values: Vec<&str> = values.iter().map(String::as_str).collect();
        observe(&histogram, &values, size as f64);
    });
    Response::from_parts(parts, Body::new(body))
}

/// 2XX responses are successes, everything else is a failure.
pub fn is_success_status(code: u16) -> bool {
    (HTTP_STATUS_2XX_MIN_VALUE..=HTTP_STATUS_2XX_MAX_VALUE).contains(&code)
}

fn protocol(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "HTTP/0.9",
        Version::HTTP_10 => "HTTP/1.0",
        Version::HTTP_11 => "HTTP/1.1",
        Version::HTTP_2 => "HTTP/2.0",
        Version::HTTP_3 => "HTTP/3.0",
        _ => "",
    }
}

/// Rough request size: path, method, protocol, header names and values,
/// host and the declared content length (zero when unknown). This is not
/// the byte count of the request on the wire.
pub fn approximate_request_size<B>(request: &http::Request<B>) -> u64 {
    let headers = request.headers();
    let mut size = request.uri().path().len()
        + request.method().as_str().len()
        + protocol(request.version()).len();

    for name in headers.keys() {
        // counted once below as the host
        if name == header::HOST {
            continue;
        }
        size += name.as_str().len();
        size += headers.get_all(name).iter().map(|v| v.len()).sum::<usize>();
    }

    let host = request
        .uri()
        .authority()
        .map(|a| a.as_str())
        .or_else(|| headers.get(header::HOST).and_then(|v| v.to_str().ok()))
        .unwrap_or("");
    size += host.len();

    let content_length = headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(0);

    size as u64 + content_length
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_status_range() {
        for code in [200, 201, 204, 250, 299] {
            assert!(is_success_status(code), "{code} should be a success");
        }
        for code in [0, 100, 199, 300, 302, 399, 400, 404, 500, 599, 999] {
            assert!(!is_success_status(code), "{code} should be a failure");
        }
    }

    #[test]
    fn test_approximate_request_size() {
        let request = http::Request::builder()
            .method("POST")
            .uri("/api/users")
            .header("host", "example.com")
            .header("content-type", "json")
            .header("content-length", "10")
            .body(())
            .unwrap();

        // path 10 + method 4 + protocol 8
        // + "content-type" 12 + "json" 4 + "content-length" 14 + "10" 2
        // + host 11 + body 10
        assert_eq!(approximate_request_size(&request), 75);
    }

    #[test]
    fn test_unknown_content_length_counts_as_zero() {
        let request = http::Request::builder()
            .method("GET")
            .uri("/health")
            .body(())
            .unwrap();

        // path 7 + method 3 + protocol 8
        assert_eq!(approximate_request_size(&request), 18);
    }

    #[test]
    fn test_repeated_header_values_are_all_counted() {
        let request = http::Request::builder()
            .method("GET")
            .uri("/")
            .header("x-tag", "a")
            .header("x-tag", "bb")
            .body(())
            .unwrap();

        // path 1 + method 3 + protocol 8 + "x-tag" 5 + "a" 1 + "bb" 2
        assert_eq!(approximate_request_size(&request), 20);
    }
}
