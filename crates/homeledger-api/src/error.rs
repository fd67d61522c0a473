//! Error types for homeledger-api
//!
//! Validation messages pass through verbatim; store failures are logged and
//! surfaced as a generic message without internal detail.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use homeledger_core::CoreError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Bad request: {message}")]
    BadRequest { message: String },

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Not found: {resource}")]
    NotFound { resource: String },

    #[error("Internal server error")]
    Internal,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest {
            message: message.into(),
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ValidationError { message } => ApiError::BadRequest { message },
            CoreError::Unauthorized => ApiError::Unauthorized,
            CoreError::StoreError { message } => {
                log::error!("store error: {}", message);
                ApiError::Internal
            }
            other => ApiError::NotFound {
                resource: other.to_string(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::BadRequest { message } => (
                StatusCode::BAD_REQUEST,
                json!({ "error": message, "code": "VALIDATION_ERROR" }),
            ),
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                json!({ "error": "Unauthorized", "code": "UNAUTHORIZED" }),
            ),
            ApiError::NotFound { resource } => (
                StatusCode::NOT_FOUND,
                json!({ "error": resource, "code": "NOT_FOUND" }),
            ),
            ApiError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "failed to fetch", "code": "STORE_ERROR" }),
            ),
        };
        (status, Json(body)).into_response()
    }
}
