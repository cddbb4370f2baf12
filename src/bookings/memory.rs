use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::bookings::store::{BookingStore, InsertOutcome, StoreError};
use crate::bookings::{Booking, BookingStatus, NewBooking, PaymentStatus, StatusChange};
use crate::models::{Hotel, Room, RoomType, RoomUpdate};

#[derive(Default)]
struct State {
    hotels: BTreeMap<i32, Hotel>,
    rooms: BTreeMap<i32, Room>,
    bookings: Vec<Booking>,
    next_hotel_id: i32,
    next_room_id: i32,
    next_booking_id: i64,
    /// Number of upcoming inserts that fail as transient conflicts
    pending_transient_failures: u32,
}

/// In-process booking store
///
/// All state sits behind one lock, so an insert's availability check and
/// write can never interleave with another insert. Suitable for tests and
/// single-process deployments only.
#[derive(Default)]
pub struct InMemoryBookingStore {
    state: Mutex<State>,
}

impl InMemoryBookingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_hotel(&self, name: &str, city: &str) -> Hotel {
        let mut state = self.state.lock().await;
        state.next_hotel_id += 1;
        let hotel = Hotel {
            id: state.next_hotel_id,
            name: name.to_string(),
            city: city.to_string(),
            address: format!("1 High Street, {}", city),
            description: String::new(),
            rating: 4.0,
        };
        state.hotels.insert(hotel.id, hotel.clone());
        hotel
    }

    pub async fn add_room(
        &self,
        hotel_id: i32,
        room_type: RoomType,
        base_price: Decimal,
        peak_price: Option<Decimal>,
    ) -> Room {
        let mut state = self.state.lock().await;
        state.next_room_id += 1;
        let room = Room {
            id: state.next_room_id,
            hotel_id,
            room_type,
            description: None,
            base_price,
            peak_price,
            capacity: room_type.default_capacity(),
            available: true,
            created_at: Utc::now(),
        };
        state.rooms.insert(room.id, room.clone());
        room
    }

    /// Make the next `count` inserts fail with `StoreError::Transient`
    pub async fn inject_transient_failures(&self, count: u32) {
        self.state.lock().await.pending_transient_failures = count;
    }

    /// Every booking exactly as stored, without expiry applied
    pub async fn raw_bookings(&self) -> Vec<Booking> {
        self.state.lock().await.bookings.clone()
    }
}

fn expire_in_place(bookings: &mut [Booking], room_id: Option<i32>, now: DateTime<Utc>, window: Duration) -> u64 {
    let mut expired = 0;
    for booking in bookings.iter_mut() {
        if room_id.map_or(true, |id| booking.room_id == id) && booking.is_expired(now, window) {
            StatusChange::expire(booking.created_at + window).apply(booking);
            expired += 1;
        }
    }
    expired
}

#[async_trait]
impl BookingStore for InMemoryBookingStore {
    async fn list_hotels(&self, city: Option<&str>) -> Result<Vec<Hotel>, StoreError> {
        let state = self.state.lock().await;
        Ok(state
            .hotels
            .values()
            .filter(|hotel| city.map_or(true, |c| hotel.city.eq_ignore_ascii_case(c)))
            .cloned()
            .collect())
    }

    async fn get_hotel(&self, id: i32) -> Result<Option<Hotel>, StoreError> {
        Ok(self.state.lock().await.hotels.get(&id).cloned())
    }

    async fn get_room(&self, id: i32) -> Result<Option<Room>, StoreError> {
        Ok(self.state.lock().await.rooms.get(&id).cloned())
    }

    async fn list_rooms(&self, hotel_id: i32) -> Result<Vec<Room>, StoreError> {
        let state = self.state.lock().await;
        Ok(state
            .rooms
            .values()
            .filter(|room| room.hotel_id == hotel_id)
            .cloned()
            .collect())
    }

    async fn update_room(&self, id: i32, update: &RoomUpdate) -> Result<Option<Room>, StoreError> {
        let mut state = self.state.lock().await;
        Ok(state.rooms.get_mut(&id).map(|room| {
            update.apply(room);
            room.clone()
        }))
    }

    async fn find_booking(&self, booking_ref: Uuid) -> Result<Option<Booking>, StoreError> {
        let state = self.state.lock().await;
        Ok(state
            .bookings
            .iter()
            .find(|booking| booking.booking_ref == booking_ref)
            .cloned())
    }

    async fn list_bookings_for_room(
        &self,
        room_id: i32,
        statuses: &[BookingStatus],
    ) -> Result<Vec<Booking>, StoreError> {
        let state = self.state.lock().await;
        Ok(state
            .bookings
            .iter()
            .filter(|b| b.room_id == room_id && statuses.contains(&b.status))
            .cloned()
            .collect())
    }

    async fn list_bookings_for_hotel(
        &self,
        hotel_id: i32,
        statuses: &[BookingStatus],
    ) -> Result<Vec<Booking>, StoreError> {
        let state = self.state.lock().await;
        Ok(state
            .bookings
            .iter()
            .filter(|b| b.hotel_id == hotel_id && statuses.contains(&b.status))
            .cloned()
            .collect())
    }

    async fn list_bookings_for_user(&self, user_id: i32) -> Result<Vec<Booking>, StoreError> {
        let state = self.state.lock().await;
        let mut bookings: Vec<Booking> = state
            .bookings
            .iter()
            .filter(|b| b.user_id == user_id)
            .cloned()
            .collect();
        bookings.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(bookings)
    }

    async fn insert_if_available(
        &self,
        booking: NewBooking,
        payment_window: Duration,
    ) -> Result<InsertOutcome, StoreError> {
        let mut state = self.state.lock().await;

        if state.pending_transient_failures > 0 {
            state.pending_transient_failures -= 1;
            return Err(StoreError::Transient("injected serialization failure".to_string()));
        }

        let now = booking.created_at;
        expire_in_place(&mut state.bookings, Some(booking.room_id), now, payment_window);

        let blocked = state.bookings.iter().any(|existing| {
            existing.room_id == booking.room_id
                && existing.blocks_availability(now, payment_window)
                && existing.overlaps(booking.check_in, booking.check_out)
        });
        if blocked {
            return Ok(InsertOutcome::Conflict);
        }

        state.next_booking_id += 1;
        let inserted = booking.into_booking(state.next_booking_id);
        state.bookings.push(inserted.clone());
        Ok(InsertOutcome::Inserted(inserted))
    }

    async fn update_booking_status(
        &self,
        id: i64,
        expected: (BookingStatus, PaymentStatus),
        change: &StatusChange,
    ) -> Result<Option<Booking>, StoreError> {
        let mut state = self.state.lock().await;
        let Some(booking) = state.bookings.iter_mut().find(|b| b.id == id) else {
            return Ok(None);
        };
        if (booking.status, booking.payment_status) != expected {
            return Ok(None);
        }
        change.apply(booking);
        Ok(Some(booking.clone()))
    }

    async fn expire_pending(
        &self,
        now: DateTime<Utc>,
        payment_window: Duration,
    ) -> Result<u64, StoreError> {
        let mut state = self.state.lock().await;
        Ok(expire_in_place(&mut state.bookings, None, now, payment_window))
    }
}
