//! Typed API error for HTTP handlers outside the invocation envelope.
//!
//! `/invoke` always answers with the `{statusCode, body}` envelope; the
//! auxiliary routes report errors as `{"error": "message"}` instead.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use pgvec_provision_core::ProvisionError;

#[derive(Debug)]
pub enum ApiError {
    /// 400 Bad Request: the event could not be turned into a request.
    BadRequest(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
        };
        let body = serde_json::json!({"error": message});
        (status, Json(body)).into_response()
    }
}

impl From<ProvisionError> for ApiError {
    fn from(err: ProvisionError) -> Self {
        Self::BadRequest(err.to_string())
    }
}
