// HTTP handlers for the booking lifecycle

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use uuid::Uuid;

use crate::auth::AuthenticatedUser;
use crate::bookings::{
    AvailabilityRequest, AvailabilityResponse, Booking, BookingError, BookingResponse,
    BookingViewQuery, CancellationOutcome, CancellationQuoteResponse, ConfirmPaymentRequest,
    CreateBookingRequest, DisplayPrice, UserBookings,
};
use crate::error::ApiError;
use crate::AppState;

/// Handler for POST /api/bookings
#[utoipa::path(
    post,
    path = "/api/bookings",
    request_body = CreateBookingRequest,
    responses(
        (status = 201, description = "Booking created and awaiting payment", body = Booking),
        (status = 400, description = "Invalid dates, stay length or guest count"),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Room not found"),
        (status = 409, description = "Room is not available for these dates")
    ),
    security(("bearer_auth" = [])),
    tag = "bookings"
)]
pub async fn create_booking(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<Booking>), BookingError> {
    tracing::debug!(
        "User {} requesting room {} from {} to {}",
        user.user_id,
        payload.room_id,
        payload.check_in,
        payload.check_out
    );

    let booking = state
        .bookings
        .request_booking(
            user.user_id,
            payload.room_id,
            payload.check_in,
            payload.check_out,
            payload.guests,
            Utc::now(),
        )
        .await?;
    Ok((StatusCode::CREATED, Json(booking)))
}

/// Handler for GET /api/bookings
#[utoipa::path(
    get,
    path = "/api/bookings",
    responses(
        (status = 200, description = "The caller's bookings split into upcoming and past", body = UserBookings),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = [])),
    tag = "bookings"
)]
pub async fn list_bookings(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<UserBookings>, BookingError> {
    let bookings = state.bookings.list_user_bookings(user.user_id, Utc::now()).await?;
    Ok(Json(bookings))
}

/// Handler for GET /api/bookings/:booking_ref
///
/// With `currency`, the total is also shown converted from the base currency.
#[utoipa::path(
    get,
    path = "/api/bookings/{booking_ref}",
    params(
        ("booking_ref" = Uuid, Path, description = "Booking reference"),
        BookingViewQuery
    ),
    responses(
        (status = 200, description = "Booking found", body = BookingResponse),
        (status = 403, description = "Booking belongs to another user"),
        (status = 404, description = "Booking or currency not found"),
        (status = 503, description = "Exchange rates are stale")
    ),
    security(("bearer_auth" = [])),
    tag = "bookings"
)]
pub async fn get_booking(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(booking_ref): Path<Uuid>,
    Query(query): Query<BookingViewQuery>,
) -> Result<Json<BookingResponse>, ApiError> {
    let now = Utc::now();
    let booking = state.bookings.get_booking(booking_ref, user.user_id, now).await?;

    let display_price = match query.currency.as_deref() {
        None => None,
        Some(code) => {
            let (currency, amount) = state.rates.to_display(booking.total_price, code, now).await?;
            Some(DisplayPrice { currency, amount })
        }
    };
    Ok(Json(BookingResponse {
        booking,
        display_price,
    }))
}

/// Handler for POST /api/bookings/:booking_ref/payment
#[utoipa::path(
    post,
    path = "/api/bookings/{booking_ref}/payment",
    params(("booking_ref" = Uuid, Path, description = "Booking reference")),
    request_body = ConfirmPaymentRequest,
    responses(
        (status = 200, description = "Payment recorded and booking confirmed", body = Booking),
        (status = 403, description = "Booking belongs to another user"),
        (status = 404, description = "Booking not found"),
        (status = 409, description = "Already paid or already cancelled"),
        (status = 410, description = "Payment window has closed")
    ),
    security(("bearer_auth" = [])),
    tag = "bookings"
)]
pub async fn confirm_payment(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(booking_ref): Path<Uuid>,
    Json(payload): Json<ConfirmPaymentRequest>,
) -> Result<Json<Booking>, BookingError> {
    let booking = state
        .bookings
        .confirm_payment(booking_ref, user.user_id, payload.payment_method, Utc::now())
        .await?;
    Ok(Json(booking))
}

/// Handler for GET /api/bookings/:booking_ref/cancellation
#[utoipa::path(
    get,
    path = "/api/bookings/{booking_ref}/cancellation",
    params(("booking_ref" = Uuid, Path, description = "Booking reference")),
    responses(
        (status = 200, description = "What cancelling now would cost", body = CancellationQuoteResponse),
        (status = 403, description = "Booking belongs to another user"),
        (status = 404, description = "Booking not found"),
        (status = 409, description = "Booking is already cancelled")
    ),
    security(("bearer_auth" = [])),
    tag = "bookings"
)]
pub async fn cancellation_quote(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(booking_ref): Path<Uuid>,
) -> Result<Json<CancellationQuoteResponse>, BookingError> {
    let quote = state
        .bookings
        .quote_cancellation(booking_ref, user.user_id, Utc::now())
        .await?;
    Ok(Json(CancellationQuoteResponse { booking_ref, quote }))
}

/// Handler for POST /api/bookings/:booking_ref/cancel
#[utoipa::path(
    post,
    path = "/api/bookings/{booking_ref}/cancel",
    params(("booking_ref" = Uuid, Path, description = "Booking reference")),
    responses(
        (status = 200, description = "Booking cancelled", body = CancellationOutcome),
        (status = 403, description = "Booking belongs to another user"),
        (status = 404, description = "Booking not found"),
        (status = 409, description = "Booking is already cancelled")
    ),
    security(("bearer_auth" = [])),
    tag = "bookings"
)]
pub async fn cancel_booking(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(booking_ref): Path<Uuid>,
) -> Result<Json<CancellationOutcome>, BookingError> {
    let outcome = state
        .bookings
        .cancel_booking(booking_ref, user.user_id, Utc::now())
        .await?;
    Ok(Json(outcome))
}

/// Handler for POST /api/availability
#[utoipa::path(
    post,
    path = "/api/availability",
    request_body = AvailabilityRequest,
    responses(
        (status = 200, description = "Whether a room of the type is free", body = AvailabilityResponse),
        (status = 400, description = "Invalid date range"),
        (status = 404, description = "Hotel not found")
    ),
    tag = "bookings"
)]
pub async fn check_availability(
    State(state): State<AppState>,
    Json(payload): Json<AvailabilityRequest>,
) -> Result<Json<AvailabilityResponse>, BookingError> {
    let available = state
        .bookings
        .check_availability(
            payload.hotel_id,
            payload.room_type,
            payload.check_in,
            payload.check_out,
            Utc::now(),
        )
        .await?;
    Ok(Json(AvailabilityResponse { available }))
}
