use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

use crate::bookings::calendar::days_between;

/// Lead time strictly above which the top discount applies
pub const EARLY_BIRD_LEAD_DAYS: i64 = 60;
/// Lead time strictly above which the standard discount applies
pub const ADVANCE_LEAD_DAYS: i64 = 30;

/// Discount fraction for booking `check_in` at `now`
///
/// Tiers are first-match by lead time: more than 60 days gives 15%, more
/// than 30 days gives 10%, anything else gives nothing. A lead of exactly
/// 60 days therefore earns 10%.
pub fn advance_discount(check_in: NaiveDate, now: DateTime<Utc>) -> Decimal {
    discount_for_lead(days_between(now.date_naive(), check_in))
}

/// Discount fraction for a lead time in days
pub fn discount_for_lead(lead_days: i64) -> Decimal {
    if lead_days > EARLY_BIRD_LEAD_DAYS {
        Decimal::new(15, 2)
    } else if lead_days > ADVANCE_LEAD_DAYS {
        Decimal::new(10, 2)
    } else {
        Decimal::ZERO
    }
}
