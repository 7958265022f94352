use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::models::AppError;

/// A general purpose HTTP error type that can be converted into an `IntoResponse`.
#[derive(Debug)]
pub struct HTTPError {
    status: StatusCode,
    code: String,
    message: String,
}

impl HTTPError {
    /// Creates a new HTTP error with the given status, error code and message.
    pub fn new(status: StatusCode, code: impl Into<String>, message: impl Into<String>) -> Self {
        HTTPError {
            status,
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn from_app_error(status: StatusCode, err: &AppError) -> Self {
        HTTPError::new(status, err.code.clone(), err.message.clone())
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

/// Converts our `HTTPError` into a JSON response.
impl IntoResponse for HTTPError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.message, "code": self.code }));
        (self.status, body).into_response()
    }
}
