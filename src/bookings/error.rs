use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use tracing::{debug, error, warn};

use crate::bookings::store::StoreError;
use crate::error::ErrorResponse;

/// Error types for booking operations
///
/// Every variant is a distinct outcome reported to the caller. Validation
/// variants are produced before anything is written.
#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("Check-out must be after check-in")]
    InvalidDateRange,

    #[error("Check-in date is in the past")]
    PastCheckIn,

    #[error("Stay of {nights} nights exceeds the maximum of {max_nights}")]
    StayTooLong { nights: i64, max_nights: i64 },

    #[error("{guests} guests is outside the room capacity of {capacity}")]
    GuestCountInvalid { guests: i32, capacity: i32 },

    #[error("Room is not available for the selected dates")]
    RoomUnavailable,

    #[error("{resource} {id} not found")]
    NotFound { resource: &'static str, id: String },

    #[error("Booking belongs to another user")]
    Unauthorized,

    #[error("Booking has already been paid")]
    AlreadyPaid,

    #[error("Payment window has expired")]
    Expired,

    #[error("Booking is already finalized")]
    AlreadyFinal,

    #[error("Pricing failed: {0}")]
    PricingFailure(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl BookingError {
    pub fn room_not_found(id: i32) -> Self {
        BookingError::NotFound { resource: "Room", id: id.to_string() }
    }

    pub fn hotel_not_found(id: i32) -> Self {
        BookingError::NotFound { resource: "Hotel", id: id.to_string() }
    }

    pub fn booking_not_found(booking_ref: uuid::Uuid) -> Self {
        BookingError::NotFound { resource: "Booking", id: booking_ref.to_string() }
    }

    /// Machine-readable code sent to clients
    pub fn error_code(&self) -> &'static str {
        match self {
            BookingError::InvalidDateRange => "INVALID_DATE_RANGE",
            BookingError::PastCheckIn => "PAST_CHECK_IN",
            BookingError::StayTooLong { .. } => "STAY_TOO_LONG",
            BookingError::GuestCountInvalid { .. } => "GUEST_COUNT_INVALID",
            BookingError::RoomUnavailable => "ROOM_UNAVAILABLE",
            BookingError::NotFound { .. } => "NOT_FOUND",
            BookingError::Unauthorized => "UNAUTHORIZED",
            BookingError::AlreadyPaid => "ALREADY_PAID",
            BookingError::Expired => "EXPIRED",
            BookingError::AlreadyFinal => "ALREADY_FINAL",
            BookingError::PricingFailure(_) => "PRICING_FAILURE",
            BookingError::Validation(_) => "VALIDATION_ERROR",
            BookingError::Storage(_) => "DATABASE_ERROR",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            BookingError::InvalidDateRange
            | BookingError::PastCheckIn
            | BookingError::StayTooLong { .. }
            | BookingError::GuestCountInvalid { .. }
            | BookingError::Validation(_) => StatusCode::BAD_REQUEST,
            BookingError::RoomUnavailable => StatusCode::CONFLICT,
            BookingError::NotFound { .. } => StatusCode::NOT_FOUND,
            BookingError::Unauthorized => StatusCode::FORBIDDEN,
            BookingError::AlreadyPaid | BookingError::AlreadyFinal => StatusCode::CONFLICT,
            BookingError::Expired => StatusCode::GONE,
            BookingError::PricingFailure(_) => StatusCode::UNPROCESSABLE_ENTITY,
            BookingError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn client_message(&self) -> String {
        match self {
            BookingError::RoomUnavailable => {
                "Sorry, this room is already booked for the selected dates".to_string()
            }
            BookingError::Expired => {
                "Your booking has expired. Please make a new booking".to_string()
            }
            BookingError::Unauthorized => {
                "You are not allowed to access this booking".to_string()
            }
            BookingError::Storage(_) => "A database error occurred".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for BookingError {
    fn into_response(self) -> Response {
        match &self {
            BookingError::Storage(err) => error!("Booking storage error: {:?}", err),
            BookingError::PricingFailure(msg) => error!("Pricing failure: {}", msg),
            BookingError::Unauthorized => warn!("Booking accessed by non-owner"),
            BookingError::RoomUnavailable | BookingError::Expired | BookingError::AlreadyFinal => {
                warn!("Booking conflict: {}", self)
            }
            other => debug!("Booking request rejected: {}", other),
        }

        let body = ErrorResponse {
            error_code: self.error_code().to_string(),
            message: self.client_message(),
            details: None,
            timestamp: Utc::now().to_rfc3339(),
        };

        (self.status_code(), Json(body)).into_response()
    }
}
