use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::bookings::{Booking, BookingStatus, NewBooking, PaymentStatus, StatusChange};
use crate::models::{Hotel, Room, RoomUpdate};

/// Failures surfaced by a booking store
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Serialization failure or deadlock; the operation may succeed if retried
    #[error("Transient storage conflict: {0}")]
    Transient(String),

    /// Write rejected because it would overlap an active booking
    #[error("Booking overlaps an active booking")]
    Conflict,

    #[error("Database error: {0}")]
    Database(String),
}

impl StoreError {
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::Transient(_))
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let Some(db_err) = err.as_database_error() {
            match db_err.code().as_deref() {
                // serialization_failure, deadlock_detected
                Some("40001") | Some("40P01") => {
                    return StoreError::Transient(db_err.message().to_string())
                }
                // exclusion_violation
                Some("23P01") => return StoreError::Conflict,
                _ => {}
            }
        }
        StoreError::Database(err.to_string())
    }
}

/// Result of an atomic check-then-insert
#[derive(Debug, Clone, PartialEq)]
pub enum InsertOutcome {
    Inserted(Booking),
    /// A blocking booking overlaps the requested dates
    Conflict,
}

/// Persistence collaborator for hotels, rooms and bookings
///
/// Implementations must make `insert_if_available` atomic with respect to
/// concurrent inserts for the same room, and `update_booking_status` a
/// compare-and-set on the current status pair.
#[async_trait]
pub trait BookingStore: Send + Sync {
    async fn list_hotels(&self, city: Option<&str>) -> Result<Vec<Hotel>, StoreError>;

    async fn get_hotel(&self, id: i32) -> Result<Option<Hotel>, StoreError>;

    async fn get_room(&self, id: i32) -> Result<Option<Room>, StoreError>;

    async fn list_rooms(&self, hotel_id: i32) -> Result<Vec<Room>, StoreError>;

    /// Apply an admin rate/service change; `None` if the room does not exist
    async fn update_room(&self, id: i32, update: &RoomUpdate) -> Result<Option<Room>, StoreError>;

    async fn find_booking(&self, booking_ref: Uuid) -> Result<Option<Booking>, StoreError>;

    async fn list_bookings_for_room(
        &self,
        room_id: i32,
        statuses: &[BookingStatus],
    ) -> Result<Vec<Booking>, StoreError>;

    async fn list_bookings_for_hotel(
        &self,
        hotel_id: i32,
        statuses: &[BookingStatus],
    ) -> Result<Vec<Booking>, StoreError>;

    /// All bookings of a user, newest first
    async fn list_bookings_for_user(&self, user_id: i32) -> Result<Vec<Booking>, StoreError>;

    /// Insert `booking` unless a blocking booking for the same room overlaps
    ///
    /// Pending bookings created more than `payment_window` before
    /// `booking.created_at` do not block and are marked cancelled in the
    /// same unit of work.
    async fn insert_if_available(
        &self,
        booking: NewBooking,
        payment_window: Duration,
    ) -> Result<InsertOutcome, StoreError>;

    /// Apply `change` only if the booking is still in `expected`
    ///
    /// Returns `None` when another writer moved the booking first.
    async fn update_booking_status(
        &self,
        id: i64,
        expected: (BookingStatus, PaymentStatus),
        change: &StatusChange,
    ) -> Result<Option<Booking>, StoreError>;

    /// Mark every pending booking whose window closed before `now` as cancelled
    async fn expire_pending(
        &self,
        now: DateTime<Utc>,
        payment_window: Duration,
    ) -> Result<u64, StoreError>;
}
