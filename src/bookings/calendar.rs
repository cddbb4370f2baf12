use chrono::{Datelike, NaiveDate, Weekday};

/// Months (1-based) in which peak-season rates apply.
pub const PEAK_MONTHS: [u32; 7] = [4, 5, 6, 7, 8, 11, 12];

/// Whether the date falls on a Saturday or Sunday
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Whether the date's month is a peak-season month
pub fn is_peak_season(date: NaiveDate) -> bool {
    PEAK_MONTHS.contains(&date.month())
}

/// Signed number of calendar days from `from` to `to`
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

/// Iterate the nights of a stay: every date in `[check_in, check_out)`.
///
/// Yields nothing when `check_out <= check_in`.
pub fn nights(check_in: NaiveDate, check_out: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    check_in
        .iter_days()
        .take_while(move |date| *date < check_out)
}
