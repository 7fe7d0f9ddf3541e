use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::{debug, error};

use postbox_types::api::{FailureResponse, ValidationErrorResponse};
use postbox_types::validation::FieldErrors;

pub const SAVE_FAILED: &str = "Failed to save message";
pub const NOT_FOUND: &str = "endpoint not found";
pub const INTERNAL: &str = "internal server error";
pub const MALFORMED_BODY: &str = "Malformed request body";
pub const BODY_TOO_LARGE: &str = "Request body too large";

/// Every failure a handler can produce. Server-side causes are logged here
/// and never reach the caller.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("validation failed for {} field(s)", .0.len())]
    Validation(FieldErrors),

    #[error("malformed request body: {0}")]
    MalformedBody(String),

    #[error("request body too large")]
    PayloadTooLarge,

    #[error("store error: {0:#}")]
    Store(anyhow::Error),

    #[error("endpoint not found")]
    NotFound,

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge
        } else {
            ApiError::MalformedBody(rejection.body_text())
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(errors) => {
                debug!("Rejected submission: {:?}", errors.fields().collect::<Vec<_>>());
                let body = ValidationErrorResponse {
                    success: false,
                    errors: errors.to_entries(),
                };
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            ApiError::MalformedBody(detail) => {
                debug!("Malformed request body: {}", detail);
                failure(StatusCode::BAD_REQUEST, MALFORMED_BODY)
            }
            ApiError::PayloadTooLarge => failure(StatusCode::PAYLOAD_TOO_LARGE, BODY_TOO_LARGE),
            ApiError::Store(e) => {
                error!("Database error: {:#}", e);
                failure(StatusCode::INTERNAL_SERVER_ERROR, SAVE_FAILED)
            }
            ApiError::NotFound => failure(StatusCode::NOT_FOUND, NOT_FOUND),
            ApiError::Internal(msg) => {
                error!("Internal error: {}", msg);
                failure(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL)
            }
        }
    }
}

fn failure(status: StatusCode, message: &str) -> Response {
    (status, Json(FailureResponse::new(message))).into_response()
}
