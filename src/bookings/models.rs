use chrono::{DateTime, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::bookings::cancellation::CancellationQuote;
use crate::bookings::pricing::StayPrice;
use crate::models::{Room, RoomType};

/// Booking status enum representing the lifecycle of a reservation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    /// Convert status to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    /// Statuses that hold a room for their dates
    pub const ACTIVE: [BookingStatus; 2] = [BookingStatus::Pending, BookingStatus::Confirmed];
}

impl Default for BookingStatus {
    fn default() -> Self {
        BookingStatus::Pending
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Payment state of a booking
///
/// `Refunded` only ever appears on a cancelled booking that had been paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Cancelled,
    Refunded,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Cancelled => "cancelled",
            PaymentStatus::Refunded => "refunded",
        }
    }
}

impl Default for PaymentStatus {
    fn default() -> Self {
        PaymentStatus::Pending
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How a booking was paid for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Card,
    Paypal,
    Googlepay,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Card => "card",
            PaymentMethod::Paypal => "paypal",
            PaymentMethod::Googlepay => "googlepay",
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Why a booking ended up cancelled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CancelReason {
    UserRequest,
    PaymentTimeout,
}

/// Domain model representing a booking in the database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Booking {
    #[serde(skip_serializing, default)]
    pub id: i64,
    /// Opaque token handed to clients
    pub booking_ref: Uuid,
    pub user_id: i32,
    pub hotel_id: i32,
    pub room_id: i32,
    #[schema(value_type = String, example = "2024-06-01")]
    pub check_in: NaiveDate,
    #[schema(value_type = String, example = "2024-06-05")]
    pub check_out: NaiveDate,
    pub guests: i32,
    #[schema(value_type = String, example = "390.00")]
    pub total_price: Decimal,
    /// Fraction in `[0, 0.3]` applied at creation
    #[schema(value_type = String, example = "0.10")]
    pub advance_booking_discount: Decimal,
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
    pub payment_method: Option<PaymentMethod>,
    pub cancel_reason: Option<CancelReason>,
    #[schema(value_type = Option<String>)]
    pub cancellation_charge: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    /// Set when payment is confirmed
    pub booking_date: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
}

impl Booking {
    /// Number of nights covered by `[check_in, check_out)`
    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days()
    }

    pub fn is_active(&self) -> bool {
        BookingStatus::ACTIVE.contains(&self.status)
    }

    /// A pending booking whose payment window has elapsed
    pub fn is_expired(&self, now: DateTime<Utc>, payment_window: Duration) -> bool {
        self.status == BookingStatus::Pending && now - self.created_at > payment_window
    }

    /// Whether this booking holds its room at `now`
    ///
    /// Expired pending bookings never block, swept or not.
    pub fn blocks_availability(&self, now: DateTime<Utc>, payment_window: Duration) -> bool {
        match self.status {
            BookingStatus::Confirmed => true,
            BookingStatus::Pending => !self.is_expired(now, payment_window),
            BookingStatus::Cancelled => false,
        }
    }

    /// The booking as every reader must see it at `now`
    ///
    /// An expired but unswept pending booking is reported as cancelled by
    /// payment timeout, stamped at the moment its window closed.
    pub fn effective(mut self, now: DateTime<Utc>, payment_window: Duration) -> Booking {
        if self.is_expired(now, payment_window) {
            self.status = BookingStatus::Cancelled;
            self.payment_status = PaymentStatus::Cancelled;
            self.cancel_reason = Some(CancelReason::PaymentTimeout);
            self.cancelled_at = Some(self.created_at + payment_window);
        }
        self
    }

    pub fn overlaps(&self, check_in: NaiveDate, check_out: NaiveDate) -> bool {
        crate::bookings::availability::overlaps(self.check_in, self.check_out, check_in, check_out)
    }
}

/// Values for a booking about to be inserted
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub booking_ref: Uuid,
    pub user_id: i32,
    pub hotel_id: i32,
    pub room_id: i32,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guests: i32,
    pub total_price: Decimal,
    pub advance_booking_discount: Decimal,
    pub created_at: DateTime<Utc>,
}

impl NewBooking {
    /// Materialize the row the store will hold, starting in pending/pending
    pub fn into_booking(self, id: i64) -> Booking {
        Booking {
            id,
            booking_ref: self.booking_ref,
            user_id: self.user_id,
            hotel_id: self.hotel_id,
            room_id: self.room_id,
            check_in: self.check_in,
            check_out: self.check_out,
            guests: self.guests,
            total_price: self.total_price,
            advance_booking_discount: self.advance_booking_discount,
            status: BookingStatus::Pending,
            payment_status: PaymentStatus::Pending,
            payment_method: None,
            cancel_reason: None,
            cancellation_charge: None,
            created_at: self.created_at,
            booking_date: None,
            cancelled_at: None,
        }
    }
}

/// Target state for a compare-and-set status update
#[derive(Debug, Clone, PartialEq)]
pub struct StatusChange {
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
    pub payment_method: Option<PaymentMethod>,
    pub booking_date: Option<DateTime<Utc>>,
    pub cancel_reason: Option<CancelReason>,
    pub cancellation_charge: Option<Decimal>,
    pub cancelled_at: Option<DateTime<Utc>>,
}

impl StatusChange {
    pub fn confirm(method: PaymentMethod, now: DateTime<Utc>) -> Self {
        Self {
            status: BookingStatus::Confirmed,
            payment_status: PaymentStatus::Paid,
            payment_method: Some(method),
            booking_date: Some(now),
            cancel_reason: None,
            cancellation_charge: None,
            cancelled_at: None,
        }
    }

    /// Cancellation requested by the owner
    pub fn cancel(payment_status: PaymentStatus, charge: Decimal, now: DateTime<Utc>) -> Self {
        Self {
            status: BookingStatus::Cancelled,
            payment_status,
            payment_method: None,
            booking_date: None,
            cancel_reason: Some(CancelReason::UserRequest),
            cancellation_charge: Some(charge),
            cancelled_at: Some(now),
        }
    }

    /// Physical cancellation of a pending booking whose window closed at `at`
    pub fn expire(at: DateTime<Utc>) -> Self {
        Self {
            status: BookingStatus::Cancelled,
            payment_status: PaymentStatus::Cancelled,
            payment_method: None,
            booking_date: None,
            cancel_reason: Some(CancelReason::PaymentTimeout),
            cancellation_charge: None,
            cancelled_at: Some(at),
        }
    }

    /// Apply this change to an in-memory booking
    ///
    /// `None` fields leave the existing value in place.
    pub fn apply(&self, booking: &mut Booking) {
        booking.status = self.status;
        booking.payment_status = self.payment_status;
        if self.payment_method.is_some() {
            booking.payment_method = self.payment_method;
        }
        if self.booking_date.is_some() {
            booking.booking_date = self.booking_date;
        }
        if self.cancel_reason.is_some() {
            booking.cancel_reason = self.cancel_reason;
        }
        if self.cancellation_charge.is_some() {
            booking.cancellation_charge = self.cancellation_charge;
        }
        if self.cancelled_at.is_some() {
            booking.cancelled_at = self.cancelled_at;
        }
    }
}

/// Request DTO for creating a booking
///
/// The guest count is checked against the room's capacity by the booking
/// service, which reports `GUEST_COUNT_INVALID`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateBookingRequest {
    pub room_id: i32,
    #[schema(value_type = String, example = "2024-06-01")]
    pub check_in: NaiveDate,
    #[schema(value_type = String, example = "2024-06-05")]
    pub check_out: NaiveDate,
    #[schema(example = 2)]
    pub guests: i32,
}

/// Request DTO for confirming payment
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ConfirmPaymentRequest {
    pub payment_method: PaymentMethod,
}

/// Request DTO for the hotel-level availability check
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AvailabilityRequest {
    pub hotel_id: i32,
    pub room_type: RoomType,
    #[schema(value_type = String, example = "2024-06-01")]
    pub check_in: NaiveDate,
    #[schema(value_type = String, example = "2024-06-05")]
    pub check_out: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AvailabilityResponse {
    pub available: bool,
}

/// Query parameters for listing free rooms of a hotel
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AvailableRoomsQuery {
    #[param(value_type = String, example = "2024-06-01")]
    pub check_in: NaiveDate,
    #[param(value_type = String, example = "2024-06-05")]
    pub check_out: NaiveDate,
    pub guests: Option<i32>,
}

/// Query parameters for viewing a booking
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BookingViewQuery {
    /// ISO 4217 code to show the price in
    pub currency: Option<String>,
}

/// A free room with its price for the requested stay
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RoomQuote {
    pub room: Room,
    pub price: StayPrice,
    #[schema(value_type = String)]
    pub discount: Decimal,
    #[schema(value_type = String)]
    pub final_price: Decimal,
}

/// A user's bookings split around today
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserBookings {
    pub upcoming: Vec<Booking>,
    pub past: Vec<Booking>,
}

/// Result of a successful cancellation
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CancellationOutcome {
    pub booking: Booking,
    #[schema(value_type = String)]
    pub charge: Decimal,
    #[schema(value_type = String)]
    pub refund: Decimal,
}

/// Price shown in a currency other than the base one
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DisplayPrice {
    pub currency: String,
    #[schema(value_type = String)]
    pub amount: Decimal,
}

/// Response DTO for a single booking
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookingResponse {
    #[serde(flatten)]
    pub booking: Booking,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_price: Option<DisplayPrice>,
}

/// Response DTO for a cancellation preview
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CancellationQuoteResponse {
    pub booking_ref: Uuid,
    pub quote: CancellationQuote,
}
