// Error handling for the HTTP layer
// Provides the shared error body and the error type of the hotel and admin handlers

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::Utc;
use serde::Serialize;
use tracing::{debug, error};

use crate::auth::AuthError;
use crate::bookings::{BookingError, StoreError};
use crate::currency::CurrencyError;

/// Error type of handlers outside the booking lifecycle
///
/// Module errors keep their own status mapping and are passed through.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Maps to HTTP 400 Bad Request with field details
    #[error("Request validation failed")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("{0}")]
    BadRequest(String),

    #[error("{resource} with id {id} not found")]
    NotFound { resource: &'static str, id: String },

    /// Maps to HTTP 500; details are logged, never returned
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    #[error(transparent)]
    Booking(#[from] BookingError),

    #[error(transparent)]
    Currency(#[from] CurrencyError),

    #[error(transparent)]
    Auth(#[from] AuthError),
}

/// Consistent error response structure
///
/// Carries both a machine-readable `error_code` and a human-readable
/// `message`.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Machine-readable error code (e.g., "VALIDATION_ERROR", "NOT_FOUND")
    pub error_code: String,

    pub message: String,

    /// Field-level details, omitted from JSON when None
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,

    /// ISO 8601 timestamp of when the error occurred
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(error_code: &str, message: impl Into<String>) -> Self {
        Self {
            error_code: error_code.to_string(),
            message: message.into(),
            details: None,
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Booking(err) => return err.into_response(),
            ApiError::Currency(err) => return err.into_response(),
            ApiError::Auth(err) => return err.into_response(),
            ApiError::ValidationError(errors) => {
                debug!("Validation error: {:?}", errors);
                let mut body = ErrorResponse::new("VALIDATION_ERROR", "Request validation failed");
                body.details = Some(serde_json::to_value(&errors).unwrap_or(serde_json::json!({})));
                (StatusCode::BAD_REQUEST, body)
            }
            ApiError::BadRequest(message) => {
                debug!("Bad request: {}", message);
                (StatusCode::BAD_REQUEST, ErrorResponse::new("BAD_REQUEST", message))
            }
            err @ ApiError::NotFound { .. } => {
                debug!("{}", err);
                (StatusCode::NOT_FOUND, ErrorResponse::new("NOT_FOUND", err.to_string()))
            }
            ApiError::Storage(err) => {
                error!("Storage error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("DATABASE_ERROR", "A database error occurred"),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::ValidationError(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Booking(err) => err.status_code(),
            ApiError::Currency(err) => err.status_code(),
            ApiError::Auth(err) => err.status_code(),
        }
    }
}
