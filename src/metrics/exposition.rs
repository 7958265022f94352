//! Prometheus text exposition of a registry.

use prometheus::{Encoder, Registry, TextEncoder};

/// Content type of the text exposition format.
pub const CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Renders all metrics of `registry` in Prometheus text format.
pub fn render(registry: &Registry) -> Result<String, String> {
    let encoder = TextEncoder::new();
    let metric_families = registry.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| format!("failed to encode metrics: {}", e))?;
    String::from_utf8(buffer).map_err(|e| format!("metrics encoding produced invalid UTF-8: {}", e))
}
