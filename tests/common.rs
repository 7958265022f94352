#![allow(dead_code)]

use std::sync::Arc;

use appmon::config::{load_config_str, ConfigV1};
use appmon::routes::create_router;
use appmon::startup::build_state;
use appmon::state::AppState;
use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, Response};
use axum::Router;

pub const TEST_CONFIG: &str = r#"
version: "1.0.0"
bind_address: "127.0.0.1:0"
logging:
  level: "debug"
  format: "json"
metrics:
  namespace: "testapp"
  path: "/metrics"
  router:
    http_requests:
      labels: [method, code, path, status]
    http_requests_latency_millis:
      labels: [method, code, path]
      buckets: { start: 1, factor: 2, count: 8 }
    http_request_size_bytes:
      labels: [method, code, path]
      buckets: [64, 256, 1024]
    http_response_size_bytes:
      labels: [method, code, path]
      buckets: [64, 256, 1024]
  database:
    operations_total:
      labels: [op_type, source, entity, is_txn, status]
    operations_latency_millis:
      labels: [op_type, source, entity, is_txn]
  pubsub:
    total_messages_published:
      labels: [entity, op_type, status]
    messages_published_size_bytes:
      labels: [entity, op_type]
      buckets: [16, 64, 256]
  app:
    application_errors_counter:
      labels: [error_code]
"#;

pub fn test_config(yaml: &str) -> ConfigV1 {
    load_config_str(yaml).expect("test config should parse")
}

pub fn build_app(config: ConfigV1) -> (Router, AppState) {
    let state = build_state(Arc::new(config)).expect("metrics config should be valid");
    (create_router(state.clone()), state)
}

pub fn request(method: Method, path: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(path)
        .body(Body::empty())
        .expect("failed to build request")
}

pub fn json_request(method: Method, path: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(path)
        .header("content-type", "application/json")
        .header("content-length", body.len().to_string())
        .body(Body::from(body.to_string()))
        .expect("failed to build request")
}

pub async fn body_string(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read body");
    String::from_utf8(bytes.to_vec()).expect("body should be UTF-8")
}
