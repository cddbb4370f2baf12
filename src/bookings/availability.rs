use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::bookings::store::BookingStore;
use crate::bookings::{Booking, BookingError, BookingStatus};
use crate::models::RoomType;

/// Half-open overlap test for `[a, b)` and `[c, d)`
///
/// Touching ranges, where one stay's check-out is the next one's check-in,
/// do not overlap.
pub fn overlaps(a: NaiveDate, b: NaiveDate, c: NaiveDate, d: NaiveDate) -> bool {
    a < d && c < b
}

/// Whether any booking in `bookings` holds its room over `[check_in, check_out)` at `now`
pub fn has_blocking_overlap<'a>(
    bookings: impl IntoIterator<Item = &'a Booking>,
    check_in: NaiveDate,
    check_out: NaiveDate,
    excluding: Option<i64>,
    now: DateTime<Utc>,
    payment_window: Duration,
) -> bool {
    bookings.into_iter().any(|booking| {
        Some(booking.id) != excluding
            && booking.blocks_availability(now, payment_window)
            && booking.overlaps(check_in, check_out)
    })
}

/// Date-based availability over the booking store
///
/// Reads only; the authoritative check for a new booking happens inside
/// `BookingStore::insert_if_available`.
#[derive(Clone)]
pub struct AvailabilityChecker {
    store: Arc<dyn BookingStore>,
    payment_window: Duration,
}

impl AvailabilityChecker {
    pub fn new(store: Arc<dyn BookingStore>, payment_window: Duration) -> Self {
        Self { store, payment_window }
    }

    /// Whether no blocking booking for the room overlaps the range
    ///
    /// # Arguments
    /// * `room_id` - Room to check
    /// * `check_in`, `check_out` - Candidate half-open range
    /// * `excluding` - Booking row to ignore, e.g. the one being modified
    /// * `now` - Instant used for lazy expiry of pending bookings
    pub async fn is_available(
        &self,
        room_id: i32,
        check_in: NaiveDate,
        check_out: NaiveDate,
        excluding: Option<i64>,
        now: DateTime<Utc>,
    ) -> Result<bool, BookingError> {
        if check_out <= check_in {
            return Err(BookingError::InvalidDateRange);
        }

        let bookings = self
            .store
            .list_bookings_for_room(room_id, &BookingStatus::ACTIVE)
            .await?;

        let available = !has_blocking_overlap(
            &bookings,
            check_in,
            check_out,
            excluding,
            now,
            self.payment_window,
        );
        tracing::debug!(
            "Room {} {} for {}..{}",
            room_id,
            if available { "available" } else { "taken" },
            check_in,
            check_out
        );
        Ok(available)
    }

    /// Hotel-level check for a room category
    ///
    /// Counts blocking bookings that overlap the range across the hotel's
    /// in-service rooms of `room_type`, and reports availability iff that
    /// count is below the number of such rooms.
    pub async fn check_hotel_availability(
        &self,
        hotel_id: i32,
        room_type: RoomType,
        check_in: NaiveDate,
        check_out: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<bool, BookingError> {
        if check_out <= check_in {
            return Err(BookingError::InvalidDateRange);
        }
        if self.store.get_hotel(hotel_id).await?.is_none() {
            return Err(BookingError::hotel_not_found(hotel_id));
        }

        let room_ids: HashSet<i32> = self
            .store
            .list_rooms(hotel_id)
            .await?
            .into_iter()
            .filter(|room| room.room_type == room_type && room.available)
            .map(|room| room.id)
            .collect();
        if room_ids.is_empty() {
            return Ok(false);
        }

        let overlapping = self
            .store
            .list_bookings_for_hotel(hotel_id, &BookingStatus::ACTIVE)
            .await?
            .iter()
            .filter(|booking| {
                room_ids.contains(&booking.room_id)
                    && booking.blocks_availability(now, self.payment_window)
                    && booking.overlaps(check_in, check_out)
            })
            .count();

        Ok(overlapping < room_ids.len())
    }
}
