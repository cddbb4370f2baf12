// Authentication and authorization error types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use tracing::{error, warn};

use crate::auth::models::Role;
use crate::error::ErrorResponse;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Missing authentication token")]
    MissingToken,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token has expired")]
    ExpiredToken,

    #[error("Token generation error: {0}")]
    TokenGenerationError(String),

    /// Caller is authenticated but lacks the role the route needs
    #[error("Insufficient permissions: required role '{required}', but user has role '{actual}'")]
    InsufficientPermissions { required: Role, actual: Role },

    #[error("Invalid role: {0}")]
    InvalidRole(String),
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingToken | AuthError::InvalidToken | AuthError::ExpiredToken => {
                StatusCode::UNAUTHORIZED
            }
            AuthError::InsufficientPermissions { .. } => StatusCode::FORBIDDEN,
            AuthError::InvalidRole(_) => StatusCode::BAD_REQUEST,
            AuthError::TokenGenerationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingToken => "MISSING_TOKEN",
            AuthError::InvalidToken => "INVALID_TOKEN",
            AuthError::ExpiredToken => "EXPIRED_TOKEN",
            AuthError::TokenGenerationError(_) => "INTERNAL_ERROR",
            AuthError::InsufficientPermissions { .. } => "FORBIDDEN",
            AuthError::InvalidRole(_) => "INVALID_ROLE",
        }
    }

    /// Message safe to send to clients
    pub fn error_message(&self) -> String {
        match self {
            AuthError::TokenGenerationError(_) => "Internal server error".to_string(),
            AuthError::InsufficientPermissions { required, .. } => {
                format!("Insufficient permissions: required role '{}'", required)
            }
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match &self {
            AuthError::TokenGenerationError(msg) => error!("Token generation error: {}", msg),
            AuthError::InsufficientPermissions { required, actual } => warn!(
                "Authorization failed: required role '{}', user has role '{}'",
                required, actual
            ),
            other => warn!("Authentication failed: {}", other),
        }

        let body = ErrorResponse {
            error_code: self.error_code().to_string(),
            message: self.error_message(),
            details: None,
            timestamp: Utc::now().to_rfc3339(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}
