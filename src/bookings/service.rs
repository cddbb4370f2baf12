use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::bookings::availability::{has_blocking_overlap, AvailabilityChecker};
use crate::bookings::cancellation::{self, CancellationQuote};
use crate::bookings::discount::advance_discount;
use crate::bookings::pricing::PricingEngine;
use crate::bookings::store::{BookingStore, InsertOutcome, StoreError};
use crate::bookings::{
    Booking, BookingError, BookingPolicy, BookingStatus, CancellationOutcome, NewBooking,
    PaymentMethod, PaymentStatus, RoomQuote, StatusChange, StatusMachine, UserBookings,
};
use crate::models::RoomType;
use crate::reliability::retry_with_backoff;

/// Service for the booking lifecycle
///
/// `now` and the acting user id are always passed in by the caller.
#[derive(Clone)]
pub struct BookingService {
    store: Arc<dyn BookingStore>,
    availability: AvailabilityChecker,
    policy: BookingPolicy,
}

impl BookingService {
    pub fn new(store: Arc<dyn BookingStore>, policy: BookingPolicy) -> Self {
        let availability = AvailabilityChecker::new(store.clone(), policy.payment_window);
        Self {
            store,
            availability,
            policy,
        }
    }

    pub fn policy(&self) -> &BookingPolicy {
        &self.policy
    }

    /// Request a booking for a room
    ///
    /// # Arguments
    /// * `user_id` - Authenticated user making the booking
    /// * `room_id` - Room to book
    /// * `check_in`, `check_out` - Half-open stay range
    /// * `guests` - Number of guests
    /// * `now` - Request instant
    ///
    /// # Returns
    /// The new booking in pending/pending, or the first failed check
    ///
    /// # Validation
    /// Checks run in order and nothing is written unless all pass:
    /// date range, past check-in, stay length, room exists, guest count,
    /// room in service, availability, pricing. The final availability check
    /// and insert are atomic inside the store.
    pub async fn request_booking(
        &self,
        user_id: i32,
        room_id: i32,
        check_in: NaiveDate,
        check_out: NaiveDate,
        guests: i32,
        now: DateTime<Utc>,
    ) -> Result<Booking, BookingError> {
        self.validate_stay(check_in, check_out, now)?;

        let room = self
            .store
            .get_room(room_id)
            .await?
            .ok_or_else(|| BookingError::room_not_found(room_id))?;

        if guests < 1 || guests > room.capacity {
            return Err(BookingError::GuestCountInvalid {
                guests,
                capacity: room.capacity,
            });
        }
        if !room.available {
            tracing::debug!("Room {} is out of service", room.id);
            return Err(BookingError::RoomUnavailable);
        }
        if !self
            .availability
            .is_available(room.id, check_in, check_out, None, now)
            .await?
        {
            return Err(BookingError::RoomUnavailable);
        }

        let stay = PricingEngine::price_stay(&room, check_in, check_out)?;
        let discount = advance_discount(check_in, now);
        let total_price = PricingEngine::apply_discount(stay.total, discount);

        let new_booking = NewBooking {
            booking_ref: Uuid::new_v4(),
            user_id,
            hotel_id: room.hotel_id,
            room_id: room.id,
            check_in,
            check_out,
            guests,
            total_price,
            advance_booking_discount: discount,
            created_at: now,
        };

        let window = self.policy.payment_window;
        let outcome = retry_with_backoff(&self.policy.retry, StoreError::is_transient, || {
            self.store.insert_if_available(new_booking.clone(), window)
        })
        .await;

        match outcome {
            Ok(InsertOutcome::Inserted(booking)) => {
                tracing::info!(
                    "Booking {} created for user {} on room {} ({}..{}) at {}",
                    booking.booking_ref,
                    user_id,
                    room.id,
                    check_in,
                    check_out,
                    booking.total_price
                );
                Ok(booking)
            }
            Ok(InsertOutcome::Conflict) | Err(StoreError::Conflict) => {
                tracing::warn!("Room {} taken concurrently for {}..{}", room.id, check_in, check_out);
                Err(BookingError::RoomUnavailable)
            }
            Err(StoreError::Transient(msg)) => {
                tracing::warn!("Giving up on room {} after repeated conflicts: {}", room.id, msg);
                Err(BookingError::RoomUnavailable)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Confirm payment for a pending booking
    ///
    /// # Returns
    /// The booking in confirmed/paid. An expired booking is cancelled as a
    /// side effect and `Expired` is returned.
    pub async fn confirm_payment(
        &self,
        booking_ref: Uuid,
        user_id: i32,
        payment_method: PaymentMethod,
        now: DateTime<Utc>,
    ) -> Result<Booking, BookingError> {
        let booking = self.owned_booking(booking_ref, user_id).await?;

        if booking.payment_status == PaymentStatus::Paid {
            return Err(BookingError::AlreadyPaid);
        }
        if booking.status == BookingStatus::Cancelled {
            return Err(match booking.cancel_reason {
                Some(crate::bookings::CancelReason::PaymentTimeout) => BookingError::Expired,
                _ => BookingError::AlreadyFinal,
            });
        }
        if booking.is_expired(now, self.policy.payment_window) {
            self.expire(&booking).await?;
            tracing::warn!("Payment for booking {} arrived after the window closed", booking_ref);
            return Err(BookingError::Expired);
        }

        StatusMachine::transition(booking.status, BookingStatus::Confirmed)?;

        let confirmed = self
            .store
            .update_booking_status(
                booking.id,
                (booking.status, booking.payment_status),
                &StatusChange::confirm(payment_method, now),
            )
            .await?
            .ok_or(BookingError::AlreadyFinal)?;

        tracing::info!("Booking {} confirmed via {}", booking_ref, payment_method);
        Ok(confirmed)
    }

    /// Cancel a booking on the owner's request
    ///
    /// # Returns
    /// The cancelled booking with the charge retained and the refund owed.
    /// Unpaid bookings end with payment `cancelled`; paid ones with
    /// `refunded`, or stay `paid` when the whole total is forfeited.
    pub async fn cancel_booking(
        &self,
        booking_ref: Uuid,
        user_id: i32,
        now: DateTime<Utc>,
    ) -> Result<CancellationOutcome, BookingError> {
        let booking = self.owned_booking(booking_ref, user_id).await?;

        if booking.is_expired(now, self.policy.payment_window) {
            self.expire(&booking).await?;
            return Err(BookingError::AlreadyFinal);
        }
        StatusMachine::transition(booking.status, BookingStatus::Cancelled)?;

        let (quote, payment_status) = Self::cancellation_terms(&booking, now);
        let cancelled = self
            .store
            .update_booking_status(
                booking.id,
                (booking.status, booking.payment_status),
                &StatusChange::cancel(payment_status, quote.charge, now),
            )
            .await?
            .ok_or(BookingError::AlreadyFinal)?;

        tracing::info!(
            "Booking {} cancelled with charge {} and refund {}",
            booking_ref,
            quote.charge,
            quote.refund
        );
        Ok(CancellationOutcome {
            booking: cancelled,
            charge: quote.charge,
            refund: quote.refund,
        })
    }

    /// Preview what cancelling would cost without changing anything
    pub async fn quote_cancellation(
        &self,
        booking_ref: Uuid,
        user_id: i32,
        now: DateTime<Utc>,
    ) -> Result<CancellationQuote, BookingError> {
        let booking = self
            .owned_booking(booking_ref, user_id)
            .await?
            .effective(now, self.policy.payment_window);
        StatusMachine::transition(booking.status, BookingStatus::Cancelled)?;
        Ok(Self::cancellation_terms(&booking, now).0)
    }

    /// A booking as its owner sees it at `now`
    pub async fn get_booking(
        &self,
        booking_ref: Uuid,
        user_id: i32,
        now: DateTime<Utc>,
    ) -> Result<Booking, BookingError> {
        Ok(self
            .owned_booking(booking_ref, user_id)
            .await?
            .effective(now, self.policy.payment_window))
    }

    /// A user's bookings, split into upcoming and past by check-in date
    pub async fn list_user_bookings(
        &self,
        user_id: i32,
        now: DateTime<Utc>,
    ) -> Result<UserBookings, BookingError> {
        let today = now.date_naive();
        let (upcoming, past) = self
            .store
            .list_bookings_for_user(user_id)
            .await?
            .into_iter()
            .map(|b| b.effective(now, self.policy.payment_window))
            .partition(|b| b.check_in >= today);
        Ok(UserBookings { upcoming, past })
    }

    /// Hotel-level availability for a room category
    pub async fn check_availability(
        &self,
        hotel_id: i32,
        room_type: RoomType,
        check_in: NaiveDate,
        check_out: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<bool, BookingError> {
        self.availability
            .check_hotel_availability(hotel_id, room_type, check_in, check_out, now)
            .await
    }

    /// Free in-service rooms of a hotel for a stay, each with its quoted price
    pub async fn available_rooms(
        &self,
        hotel_id: i32,
        check_in: NaiveDate,
        check_out: NaiveDate,
        guests: Option<i32>,
        now: DateTime<Utc>,
    ) -> Result<Vec<RoomQuote>, BookingError> {
        self.validate_stay(check_in, check_out, now)?;
        let guests = guests.unwrap_or(1);
        if guests < 1 {
            return Err(BookingError::Validation("At least one guest is required".to_string()));
        }
        if self.store.get_hotel(hotel_id).await?.is_none() {
            return Err(BookingError::hotel_not_found(hotel_id));
        }

        let rooms = self.store.list_rooms(hotel_id).await?;
        let bookings = self
            .store
            .list_bookings_for_hotel(hotel_id, &BookingStatus::ACTIVE)
            .await?;
        let discount = advance_discount(check_in, now);

        let mut quotes = Vec::new();
        for room in rooms.into_iter().filter(|r| r.available && r.capacity >= guests) {
            let taken = has_blocking_overlap(
                bookings.iter().filter(|b| b.room_id == room.id),
                check_in,
                check_out,
                None,
                now,
                self.policy.payment_window,
            );
            if taken {
                continue;
            }
            let price = PricingEngine::price_stay(&room, check_in, check_out)?;
            let final_price = PricingEngine::apply_discount(price.total, discount);
            quotes.push(RoomQuote {
                room,
                price,
                discount,
                final_price,
            });
        }
        Ok(quotes)
    }

    /// Physically cancel every pending booking whose payment window has closed
    pub async fn sweep_expired(&self, now: DateTime<Utc>) -> Result<u64, BookingError> {
        let expired = self
            .store
            .expire_pending(now, self.policy.payment_window)
            .await?;
        if expired > 0 {
            tracing::info!("Expired {} unpaid bookings", expired);
        }
        Ok(expired)
    }

    fn validate_stay(
        &self,
        check_in: NaiveDate,
        check_out: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<(), BookingError> {
        if check_out <= check_in {
            return Err(BookingError::InvalidDateRange);
        }
        if check_in < now.date_naive() {
            return Err(BookingError::PastCheckIn);
        }
        let nights = (check_out - check_in).num_days();
        if nights > self.policy.max_stay_nights {
            return Err(BookingError::StayTooLong {
                nights,
                max_nights: self.policy.max_stay_nights,
            });
        }
        Ok(())
    }

    async fn owned_booking(&self, booking_ref: Uuid, user_id: i32) -> Result<Booking, BookingError> {
        let booking = self
            .store
            .find_booking(booking_ref)
            .await?
            .ok_or_else(|| BookingError::booking_not_found(booking_ref))?;
        if booking.user_id != user_id {
            tracing::warn!("User {} tried to access booking {}", user_id, booking_ref);
            return Err(BookingError::Unauthorized);
        }
        Ok(booking)
    }

    /// Persist the lazy expiry of a pending booking
    async fn expire(&self, booking: &Booking) -> Result<(), BookingError> {
        let closed_at = booking.created_at + self.policy.payment_window;
        self.store
            .update_booking_status(
                booking.id,
                (BookingStatus::Pending, PaymentStatus::Pending),
                &StatusChange::expire(closed_at),
            )
            .await?;
        Ok(())
    }

    /// Charge, refund and resulting payment status for cancelling at `now`
    fn cancellation_terms(booking: &Booking, now: DateTime<Utc>) -> (CancellationQuote, PaymentStatus) {
        let mut quote = cancellation::quote(booking, now);
        let payment_status = if booking.payment_status == PaymentStatus::Paid {
            if quote.refund > Decimal::ZERO {
                PaymentStatus::Refunded
            } else {
                PaymentStatus::Paid
            }
        } else {
            // Nothing was taken, so nothing is owed back
            quote.refund = Decimal::ZERO;
            PaymentStatus::Cancelled
        };
        (quote, payment_status)
    }
}
