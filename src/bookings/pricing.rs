use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use utoipa::ToSchema;

use crate::bookings::calendar;
use crate::bookings::BookingError;
use crate::models::Room;

/// Charge for a single night of a stay
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct NightlyRate {
    #[schema(value_type = String, example = "2024-06-01")]
    pub date: NaiveDate,
    #[schema(value_type = String, example = "156.00")]
    pub rate: Decimal,
    pub peak: bool,
    pub weekend: bool,
}

/// Priced stay with its per-night breakdown
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct StayPrice {
    pub nights: Vec<NightlyRate>,
    /// Sum of nightly rates, rounded to 2 decimal places
    #[schema(value_type = String, example = "416.00")]
    pub total: Decimal,
}

/// Service for computing stay prices
pub struct PricingEngine;

impl PricingEngine {
    /// Multiplier applied to the base rate in peak months when no peak rate is set
    pub fn peak_fallback_multiplier() -> Decimal {
        Decimal::new(13, 1)
    }

    /// Multiplier applied to Saturday and Sunday nights
    pub fn weekend_multiplier() -> Decimal {
        Decimal::new(12, 1)
    }

    /// Price a stay night by night
    ///
    /// # Arguments
    /// * `room` - Room whose rates apply
    /// * `check_in` - First night of the stay
    /// * `check_out` - Departure date (not charged)
    ///
    /// # Returns
    /// The rounded total and breakdown, `InvalidDateRange` for an empty or
    /// inverted range, or `PricingFailure` when the room's rates are unusable
    pub fn price_stay(
        room: &Room,
        check_in: NaiveDate,
        check_out: NaiveDate,
    ) -> Result<StayPrice, BookingError> {
        if check_out <= check_in {
            return Err(BookingError::InvalidDateRange);
        }
        Self::validate_rates(room)?;

        let nights: Vec<NightlyRate> = calendar::nights(check_in, check_out)
            .map(|date| Self::nightly_rate(room, date))
            .collect();
        let total: Decimal = nights.iter().map(|night| night.rate).sum();

        tracing::debug!(
            "Priced room {} for {} nights from {}: {}",
            room.id,
            nights.len(),
            check_in,
            total
        );

        Ok(StayPrice {
            nights,
            total: round_money(total),
        })
    }

    /// Unrounded rate for one night
    pub fn nightly_rate(room: &Room, date: NaiveDate) -> NightlyRate {
        let peak = calendar::is_peak_season(date);
        let weekend = calendar::is_weekend(date);

        let mut rate = if peak {
            room.peak_price
                .unwrap_or(room.base_price * Self::peak_fallback_multiplier())
        } else {
            room.base_price
        };
        if weekend {
            rate *= Self::weekend_multiplier();
        }

        NightlyRate { date, rate, peak, weekend }
    }

    /// Apply an advance-booking discount fraction to a stay total
    pub fn apply_discount(stay_total: Decimal, discount: Decimal) -> Decimal {
        round_money(stay_total * (Decimal::ONE - discount))
    }

    fn validate_rates(room: &Room) -> Result<(), BookingError> {
        if room.base_price <= Decimal::ZERO {
            return Err(BookingError::PricingFailure(format!(
                "room {} has non-positive base price {}",
                room.id, room.base_price
            )));
        }
        if let Some(peak) = room.peak_price {
            if peak <= Decimal::ZERO {
                return Err(BookingError::PricingFailure(format!(
                    "room {} has non-positive peak price {}",
                    room.id, peak
                )));
            }
        }
        Ok(())
    }
}

/// Round a money amount to pennies, halves away from zero
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
