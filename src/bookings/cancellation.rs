use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::bookings::calendar::days_between;
use crate::bookings::pricing::round_money;
use crate::bookings::Booking;

/// Lead time strictly above which cancelling is free
pub const FREE_CANCELLATION_LEAD_DAYS: i64 = 7;
/// Lead time strictly above which only half the price is kept
pub const PARTIAL_CANCELLATION_LEAD_DAYS: i64 = 3;

/// Which part of the cancellation policy applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CancellationTier {
    Free,
    HalfCharge,
    FullCharge,
}

impl CancellationTier {
    pub fn for_lead(lead_days: i64) -> Self {
        if lead_days > FREE_CANCELLATION_LEAD_DAYS {
            CancellationTier::Free
        } else if lead_days > PARTIAL_CANCELLATION_LEAD_DAYS {
            CancellationTier::HalfCharge
        } else {
            CancellationTier::FullCharge
        }
    }

    /// Fraction of the booking total that is retained
    pub fn charge_fraction(&self) -> Decimal {
        match self {
            CancellationTier::Free => Decimal::ZERO,
            CancellationTier::HalfCharge => Decimal::new(5, 1),
            CancellationTier::FullCharge => Decimal::ONE,
        }
    }
}

/// What cancelling a booking would cost at a given moment
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CancellationQuote {
    #[schema(value_type = String)]
    pub charge: Decimal,
    /// Part of the total not retained
    #[schema(value_type = String)]
    pub refund: Decimal,
    pub lead_days: i64,
    pub tier: CancellationTier,
}

/// Charge for cancelling `booking` at `now`
pub fn cancellation_charge(booking: &Booking, now: DateTime<Utc>) -> Decimal {
    quote(booking, now).charge
}

/// Full cancellation breakdown for `booking` at `now`
pub fn quote(booking: &Booking, now: DateTime<Utc>) -> CancellationQuote {
    let lead_days = days_between(now.date_naive(), booking.check_in);
    let tier = CancellationTier::for_lead(lead_days);
    let charge = round_money(booking.total_price * tier.charge_fraction());

    CancellationQuote {
        charge,
        refund: booking.total_price - charge,
        lead_days,
        tier,
    }
}
