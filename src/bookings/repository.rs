use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::bookings::store::{BookingStore, InsertOutcome, StoreError};
use crate::bookings::{Booking, BookingStatus, NewBooking, PaymentStatus, StatusChange};
use crate::models::{Hotel, Room, RoomUpdate};

const HOTEL_COLUMNS: &str = "id, name, city, address, description, rating";

const ROOM_COLUMNS: &str =
    "id, hotel_id, room_type, description, base_price, peak_price, capacity, available, created_at";

const BOOKING_COLUMNS: &str = "id, booking_ref, user_id, hotel_id, room_id, check_in, check_out, \
     guests, total_price, advance_booking_discount, status, payment_status, payment_method, \
     cancel_reason, cancellation_charge, created_at, booking_date, cancelled_at";

/// PostgreSQL booking store
///
/// Inserts run in a SERIALIZABLE transaction and the `bookings_no_overlap`
/// exclusion constraint backs the overlap check for every process sharing
/// the database.
#[derive(Clone)]
pub struct PgBookingStore {
    pool: PgPool,
}

impl PgBookingStore {
    /// Create a new PgBookingStore
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn status_names(statuses: &[BookingStatus]) -> Vec<String> {
        statuses.iter().map(|s| s.as_str().to_string()).collect()
    }

    async fn try_insert(
        &self,
        booking: &NewBooking,
        payment_window: Duration,
    ) -> Result<InsertOutcome, StoreError> {
        let cutoff = booking.created_at - payment_window;
        let mut tx: Transaction<'_, Postgres> = self.pool.begin().await?;

        sqlx::query("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE")
            .execute(&mut *tx)
            .await?;

        // Expired holds stop blocking here and are recorded as such
        let swept = sqlx::query(
            r#"
            UPDATE bookings
            SET status = 'cancelled',
                payment_status = 'cancelled',
                cancel_reason = 'payment_timeout',
                cancelled_at = created_at + make_interval(secs => $3)
            WHERE room_id = $1 AND status = 'pending' AND created_at < $2
            "#,
        )
        .bind(booking.room_id)
        .bind(cutoff)
        .bind(payment_window.num_seconds() as f64)
        .execute(&mut *tx)
        .await?
        .rows_affected();
        if swept > 0 {
            tracing::debug!("Expired {} pending bookings on room {}", swept, booking.room_id);
        }

        let blocked: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM bookings
                WHERE room_id = $1
                  AND check_in < $3
                  AND check_out > $2
                  AND (status = 'confirmed' OR (status = 'pending' AND created_at >= $4))
            )
            "#,
        )
        .bind(booking.room_id)
        .bind(booking.check_in)
        .bind(booking.check_out)
        .bind(cutoff)
        .fetch_one(&mut *tx)
        .await?;

        if blocked {
            tx.rollback().await?;
            return Ok(InsertOutcome::Conflict);
        }

        let inserted = sqlx::query_as::<_, Booking>(&format!(
            r#"
            INSERT INTO bookings (
                booking_ref, user_id, hotel_id, room_id, check_in, check_out, guests,
                total_price, advance_booking_discount, status, payment_status, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, 'pending', 'pending', $10)
            RETURNING {BOOKING_COLUMNS}
            "#
        ))
        .bind(booking.booking_ref)
        .bind(booking.user_id)
        .bind(booking.hotel_id)
        .bind(booking.room_id)
        .bind(booking.check_in)
        .bind(booking.check_out)
        .bind(booking.guests)
        .bind(booking.total_price)
        .bind(booking.advance_booking_discount)
        .bind(booking.created_at)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(InsertOutcome::Inserted(inserted))
    }
}

#[async_trait]
impl BookingStore for PgBookingStore {
    async fn list_hotels(&self, city: Option<&str>) -> Result<Vec<Hotel>, StoreError> {
        let hotels = sqlx::query_as::<_, Hotel>(&format!(
            "SELECT {HOTEL_COLUMNS} FROM hotels \
             WHERE ($1::text IS NULL OR lower(city) = lower($1)) ORDER BY name"
        ))
        .bind(city)
        .fetch_all(&self.pool)
        .await?;

        Ok(hotels)
    }

    async fn get_hotel(&self, id: i32) -> Result<Option<Hotel>, StoreError> {
        let hotel = sqlx::query_as::<_, Hotel>(&format!(
            "SELECT {HOTEL_COLUMNS} FROM hotels WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(hotel)
    }

    async fn get_room(&self, id: i32) -> Result<Option<Room>, StoreError> {
        let room = sqlx::query_as::<_, Room>(&format!("SELECT {ROOM_COLUMNS} FROM rooms WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(room)
    }

    async fn list_rooms(&self, hotel_id: i32) -> Result<Vec<Room>, StoreError> {
        let rooms = sqlx::query_as::<_, Room>(&format!(
            "SELECT {ROOM_COLUMNS} FROM rooms WHERE hotel_id = $1 ORDER BY id"
        ))
        .bind(hotel_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rooms)
    }

    async fn update_room(&self, id: i32, update: &RoomUpdate) -> Result<Option<Room>, StoreError> {
        let room = sqlx::query_as::<_, Room>(&format!(
            r#"
            UPDATE rooms
            SET base_price = COALESCE($2, base_price),
                peak_price = CASE WHEN $3 THEN $4 ELSE peak_price END,
                available = COALESCE($5, available)
            WHERE id = $1
            RETURNING {ROOM_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(update.base_price)
        .bind(update.peak_price.is_some())
        .bind(update.peak_price.flatten())
        .bind(update.available)
        .fetch_optional(&self.pool)
        .await?;

        Ok(room)
    }

    async fn find_booking(&self, booking_ref: Uuid) -> Result<Option<Booking>, StoreError> {
        let booking = sqlx::query_as::<_, Booking>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE booking_ref = $1"
        ))
        .bind(booking_ref)
        .fetch_optional(&self.pool)
        .await?;

        Ok(booking)
    }

    async fn list_bookings_for_room(
        &self,
        room_id: i32,
        statuses: &[BookingStatus],
    ) -> Result<Vec<Booking>, StoreError> {
        let bookings = sqlx::query_as::<_, Booking>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings \
             WHERE room_id = $1 AND status = ANY($2) ORDER BY check_in"
        ))
        .bind(room_id)
        .bind(Self::status_names(statuses))
        .fetch_all(&self.pool)
        .await?;

        Ok(bookings)
    }

    async fn list_bookings_for_hotel(
        &self,
        hotel_id: i32,
        statuses: &[BookingStatus],
    ) -> Result<Vec<Booking>, StoreError> {
        let bookings = sqlx::query_as::<_, Booking>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings \
             WHERE hotel_id = $1 AND status = ANY($2) ORDER BY check_in"
        ))
        .bind(hotel_id)
        .bind(Self::status_names(statuses))
        .fetch_all(&self.pool)
        .await?;

        Ok(bookings)
    }

    async fn list_bookings_for_user(&self, user_id: i32) -> Result<Vec<Booking>, StoreError> {
        let bookings = sqlx::query_as::<_, Booking>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE user_id = $1 ORDER BY created_at DESC, id DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(bookings)
    }

    async fn insert_if_available(
        &self,
        booking: NewBooking,
        payment_window: Duration,
    ) -> Result<InsertOutcome, StoreError> {
        match self.try_insert(&booking, payment_window).await {
            Err(StoreError::Conflict) => {
                tracing::warn!(
                    "Exclusion constraint rejected booking on room {} for {}..{}",
                    booking.room_id,
                    booking.check_in,
                    booking.check_out
                );
                Ok(InsertOutcome::Conflict)
            }
            other => other,
        }
    }

    async fn update_booking_status(
        &self,
        id: i64,
        expected: (BookingStatus, PaymentStatus),
        change: &StatusChange,
    ) -> Result<Option<Booking>, StoreError> {
        let booking = sqlx::query_as::<_, Booking>(&format!(
            r#"
            UPDATE bookings
            SET status = $4,
                payment_status = $5,
                payment_method = COALESCE($6, payment_method),
                booking_date = COALESCE($7, booking_date),
                cancel_reason = COALESCE($8, cancel_reason),
                cancellation_charge = COALESCE($9, cancellation_charge),
                cancelled_at = COALESCE($10, cancelled_at)
            WHERE id = $1 AND status = $2 AND payment_status = $3
            RETURNING {BOOKING_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(expected.0)
        .bind(expected.1)
        .bind(change.status)
        .bind(change.payment_status)
        .bind(change.payment_method)
        .bind(change.booking_date)
        .bind(change.cancel_reason)
        .bind(change.cancellation_charge)
        .bind(change.cancelled_at)
        .fetch_optional(&self.pool)
        .await?;

        Ok(booking)
    }

    async fn expire_pending(
        &self,
        now: DateTime<Utc>,
        payment_window: Duration,
    ) -> Result<u64, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE bookings
            SET status = 'cancelled',
                payment_status = 'cancelled',
                cancel_reason = 'payment_timeout',
                cancelled_at = created_at + make_interval(secs => $2)
            WHERE status = 'pending' AND created_at < $1
            "#,
        )
        .bind(now - payment_window)
        .bind(payment_window.num_seconds() as f64)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
