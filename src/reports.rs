// Admin reporting computed from booking history

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::bookings::availability::has_blocking_overlap;
use crate::bookings::pricing::round_money;
use crate::bookings::{Booking, BookingStatus};
use crate::models::{Hotel, Room, RoomType};

/// Length of a report period when no bounds are given
pub const DEFAULT_PERIOD_DAYS: i64 = 30;

pub const DEFAULT_TOP_HOTELS: usize = 5;

/// Newest bookings shown on the dashboard
pub const RECENT_BOOKINGS: usize = 5;

/// Query parameters for a performance report
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ReportQuery {
    /// First day of the period; defaults to 30 days before today
    #[param(value_type = Option<String>, example = "2024-06-01")]
    pub from: Option<NaiveDate>,
    /// Day after the period ends; defaults to today
    #[param(value_type = Option<String>, example = "2024-07-01")]
    pub to: Option<NaiveDate>,
}

impl ReportQuery {
    /// The requested `[from, to)` period, defaulting to the last 30 days up to `today`
    pub fn period(&self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        resolve_period(self.from, self.to, today)
    }
}

fn resolve_period(from: Option<NaiveDate>, to: Option<NaiveDate>, today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let to = to.unwrap_or(today);
    let from = from.unwrap_or(to - Duration::days(DEFAULT_PERIOD_DAYS));
    (from, to)
}

/// Query parameters for the revenue ranking of hotels
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TopHotelsQuery {
    #[param(value_type = Option<String>, example = "2024-06-01")]
    pub from: Option<NaiveDate>,
    #[param(value_type = Option<String>, example = "2024-07-01")]
    pub to: Option<NaiveDate>,
    /// Number of hotels to return, 5 when omitted
    #[param(example = 5)]
    pub limit: Option<usize>,
}

impl TopHotelsQuery {
    pub fn period(&self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        resolve_period(self.from, self.to, today)
    }
}

/// Query parameters for a hotel's room availability summary
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AvailabilitySummaryQuery {
    #[param(value_type = String, example = "2024-06-01")]
    pub check_in: NaiveDate,
    #[param(value_type = String, example = "2024-06-05")]
    pub check_out: NaiveDate,
}

/// Query parameters for a calendar-month report
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MonthlyReportQuery {
    #[param(example = 2024)]
    pub year: i32,
    #[param(example = 6)]
    pub month: u32,
}

/// Performance of one hotel over `[from, to)`
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct HotelPerformance {
    pub hotel_id: i32,
    #[schema(value_type = String, example = "2024-06-01")]
    pub from: NaiveDate,
    #[schema(value_type = String, example = "2024-07-01")]
    pub to: NaiveDate,
    /// Confirmed bookings whose payment landed in the period
    pub total_bookings: usize,
    #[schema(value_type = String)]
    pub total_revenue: Decimal,
    #[schema(value_type = String)]
    pub average_booking_value: Decimal,
    /// Booked room-nights over available room-nights, in percent
    #[schema(value_type = String)]
    pub occupancy_rate: Decimal,
    /// Cancelled share of bookings made in the period, in percent
    #[schema(value_type = String)]
    pub cancellation_rate: Decimal,
}

/// Build a performance report
///
/// # Arguments
/// * `hotel_id` - Hotel being reported on
/// * `bookings` - Every booking of the hotel, in any status
/// * `room_count` - Number of rooms the hotel has
/// * `from`, `to` - Half-open reporting period
/// * `now`, `payment_window` - Used to treat expired pending bookings as cancelled
pub fn hotel_performance(
    hotel_id: i32,
    bookings: &[Booking],
    room_count: usize,
    from: NaiveDate,
    to: NaiveDate,
    now: DateTime<Utc>,
    payment_window: Duration,
) -> HotelPerformance {
    let in_period = |date: NaiveDate| date >= from && date < to;
    let bookings: Vec<Booking> = bookings
        .iter()
        .cloned()
        .map(|b| b.effective(now, payment_window))
        .collect();

    let paid: Vec<&Booking> = bookings
        .iter()
        .filter(|b| b.status == BookingStatus::Confirmed)
        .filter(|b| b.booking_date.map_or(false, |at| in_period(at.date_naive())))
        .collect();
    let total_revenue: Decimal = paid.iter().map(|b| b.total_price).sum();
    let average_booking_value = if paid.is_empty() {
        Decimal::ZERO
    } else {
        round_money(total_revenue / Decimal::from(paid.len()))
    };

    let booked_nights: i64 = bookings
        .iter()
        .filter(|b| b.status == BookingStatus::Confirmed)
        .map(|b| {
            let start = b.check_in.max(from);
            let end = b.check_out.min(to);
            (end - start).num_days().max(0)
        })
        .sum();
    let period_days = (to - from).num_days().max(0);
    let occupancy_rate = percentage(booked_nights, room_count as i64 * period_days);

    let made: Vec<&Booking> = bookings
        .iter()
        .filter(|b| in_period(b.created_at.date_naive()))
        .collect();
    let cancelled = made
        .iter()
        .filter(|b| b.status == BookingStatus::Cancelled)
        .count();
    let cancellation_rate = percentage(cancelled as i64, made.len() as i64);

    HotelPerformance {
        hotel_id,
        from,
        to,
        total_bookings: paid.len(),
        total_revenue: round_money(total_revenue),
        average_booking_value,
        occupancy_rate,
        cancellation_rate,
    }
}

/// Room count and free rooms of one category over a stay
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct RoomTypeAvailability {
    pub room_type: RoomType,
    pub total: usize,
    pub available: usize,
}

/// Revenue a hotel took over a period
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct HotelRevenue {
    pub hotel_id: i32,
    pub hotel_name: String,
    #[schema(value_type = String)]
    pub revenue: Decimal,
    pub bookings: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct RoomTypeCount {
    pub room_type: RoomType,
    pub bookings: usize,
}

/// Figures for one calendar month across all hotels
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct MonthlyReport {
    #[schema(example = "June 2024")]
    pub period: String,
    #[schema(value_type = String, example = "2024-06-01")]
    pub from: NaiveDate,
    #[schema(value_type = String, example = "2024-07-01")]
    pub to: NaiveDate,
    /// Bookings made during the month, in any status
    pub total_bookings: usize,
    #[schema(value_type = String)]
    pub total_revenue: Decimal,
    pub cancelled_bookings: usize,
    pub top_performing_hotels: Vec<HotelRevenue>,
    pub room_type_distribution: Vec<RoomTypeCount>,
}

/// Headline numbers for the admin dashboard
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DashboardStats {
    pub total_hotels: usize,
    /// Distinct users who have made a booking
    pub total_guests: usize,
    pub total_bookings: usize,
    /// Confirmed stays that have not checked out yet
    pub active_bookings: usize,
    /// Confirmed revenue paid during the current calendar month
    #[schema(value_type = String)]
    pub monthly_revenue: Decimal,
    pub recent_bookings: Vec<Booking>,
}

/// Confirmed and paid within `[from, to)`
fn paid_between(booking: &Booking, from: NaiveDate, to: NaiveDate) -> bool {
    booking.status == BookingStatus::Confirmed
        && booking.booking_date.map_or(false, |at| {
            let day = at.date_naive();
            day >= from && day < to
        })
}

fn made_between(booking: &Booking, from: NaiveDate, to: NaiveDate) -> bool {
    let day = booking.created_at.date_naive();
    day >= from && day < to
}

/// First day of the month and first day of the next one
pub fn month_bounds(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let from = NaiveDate::from_ymd_opt(year, month, 1)?;
    let to = from.checked_add_months(Months::new(1))?;
    Some((from, to))
}

/// Free rooms per category over `[check_in, check_out)`
///
/// Every category is listed, including ones the hotel has no rooms of.
/// Out-of-service rooms count towards `total` but are never free.
pub fn room_availability_summary(
    rooms: &[Room],
    bookings: &[Booking],
    check_in: NaiveDate,
    check_out: NaiveDate,
    now: DateTime<Utc>,
    payment_window: Duration,
) -> Vec<RoomTypeAvailability> {
    RoomType::ALL
        .iter()
        .map(|&room_type| {
            let of_type: Vec<&Room> = rooms.iter().filter(|r| r.room_type == room_type).collect();
            let available = of_type
                .iter()
                .filter(|room| {
                    room.available
                        && !has_blocking_overlap(
                            bookings.iter().filter(|b| b.room_id == room.id),
                            check_in,
                            check_out,
                            None,
                            now,
                            payment_window,
                        )
                })
                .count();
            RoomTypeAvailability {
                room_type,
                total: of_type.len(),
                available,
            }
        })
        .collect()
}

/// Hotels ranked by revenue paid in `[from, to)`, highest first
///
/// Hotels without a sale in the period are left out. Ties are broken by name.
pub fn top_performing_hotels(
    hotels: &[Hotel],
    bookings: &[Booking],
    from: NaiveDate,
    to: NaiveDate,
    limit: usize,
) -> Vec<HotelRevenue> {
    let mut ranking: Vec<HotelRevenue> = hotels
        .iter()
        .filter_map(|hotel| {
            let paid: Vec<&Booking> = bookings
                .iter()
                .filter(|b| b.hotel_id == hotel.id && paid_between(b, from, to))
                .collect();
            if paid.is_empty() {
                return None;
            }
            Some(HotelRevenue {
                hotel_id: hotel.id,
                hotel_name: hotel.name.clone(),
                revenue: round_money(paid.iter().map(|b| b.total_price).sum::<Decimal>()),
                bookings: paid.len(),
            })
        })
        .collect();

    ranking.sort_by(|a, b| {
        b.revenue
            .cmp(&a.revenue)
            .then_with(|| a.hotel_name.cmp(&b.hotel_name))
    });
    ranking.truncate(limit);
    ranking
}

/// Bookings paid in `[from, to)` per room category
pub fn room_type_distribution(
    rooms: &[Room],
    bookings: &[Booking],
    from: NaiveDate,
    to: NaiveDate,
) -> Vec<RoomTypeCount> {
    let room_types: HashMap<i32, RoomType> = rooms.iter().map(|r| (r.id, r.room_type)).collect();
    RoomType::ALL
        .iter()
        .map(|&room_type| RoomTypeCount {
            room_type,
            bookings: bookings
                .iter()
                .filter(|b| paid_between(b, from, to))
                .filter(|b| room_types.get(&b.room_id) == Some(&room_type))
                .count(),
        })
        .collect()
}

/// Build the report for the month starting at `from`
///
/// `bookings` must already be normalized with `Booking::effective`.
pub fn monthly_report(
    from: NaiveDate,
    to: NaiveDate,
    hotels: &[Hotel],
    rooms: &[Room],
    bookings: &[Booking],
) -> MonthlyReport {
    let made: Vec<&Booking> = bookings.iter().filter(|b| made_between(b, from, to)).collect();
    let total_revenue: Decimal = bookings
        .iter()
        .filter(|b| paid_between(b, from, to))
        .map(|b| b.total_price)
        .sum();

    MonthlyReport {
        period: from.format("%B %Y").to_string(),
        from,
        to,
        total_bookings: made.len(),
        total_revenue: round_money(total_revenue),
        cancelled_bookings: made
            .iter()
            .filter(|b| b.status == BookingStatus::Cancelled)
            .count(),
        top_performing_hotels: top_performing_hotels(hotels, bookings, from, to, DEFAULT_TOP_HOTELS),
        room_type_distribution: room_type_distribution(rooms, bookings, from, to),
    }
}

/// Dashboard figures at `now`
///
/// `bookings` must already be normalized with `Booking::effective`.
pub fn dashboard_stats(hotel_count: usize, bookings: &[Booking], now: DateTime<Utc>) -> DashboardStats {
    let today = now.date_naive();
    let (month_start, month_end) =
        month_bounds(today.year(), today.month()).unwrap_or((today, today + Duration::days(1)));

    let mut recent: Vec<Booking> = bookings.to_vec();
    recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    recent.truncate(RECENT_BOOKINGS);

    let monthly_revenue: Decimal = bookings
        .iter()
        .filter(|b| paid_between(b, month_start, month_end))
        .map(|b| b.total_price)
        .sum();

    DashboardStats {
        total_hotels: hotel_count,
        total_guests: bookings.iter().map(|b| b.user_id).collect::<HashSet<_>>().len(),
        total_bookings: bookings.len(),
        active_bookings: bookings
            .iter()
            .filter(|b| b.status == BookingStatus::Confirmed && b.check_out >= today)
            .count(),
        monthly_revenue: round_money(monthly_revenue),
        recent_bookings: recent,
    }
}

fn percentage(part: i64, whole: i64) -> Decimal {
    if whole <= 0 {
        return Decimal::ZERO;
    }
    round_money(Decimal::from(part) * Decimal::ONE_HUNDRED / Decimal::from(whole))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bookings::{NewBooking, PaymentMethod, PaymentStatus, StatusChange};
    use chrono::TimeZone;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn june(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, day).unwrap()
    }

    fn booking(id: i64, check_in: NaiveDate, nights: i64, total: Decimal, created_at: DateTime<Utc>) -> Booking {
        NewBooking {
            booking_ref: Uuid::new_v4(),
            user_id: 1,
            hotel_id: 1,
            room_id: id as i32,
            check_in,
            check_out: check_in + Duration::days(nights),
            guests: 1,
            total_price: total,
            advance_booking_discount: Decimal::ZERO,
            created_at,
        }
        .into_booking(id)
    }

    fn confirmed(mut b: Booking) -> Booking {
        let at = b.created_at + Duration::minutes(5);
        StatusChange::confirm(PaymentMethod::Card, at).apply(&mut b);
        b
    }

    fn cancelled(mut b: Booking) -> Booking {
        StatusChange::cancel(PaymentStatus::Cancelled, Decimal::ZERO, b.created_at).apply(&mut b);
        b
    }

    #[test]
    fn test_revenue_and_occupancy() {
        let created = Utc.with_ymd_and_hms(2024, 6, 2, 9, 0, 0).unwrap();
        let bookings = vec![
            confirmed(booking(1, june(3), 4, dec!(400.00), created)),
            confirmed(booking(2, june(8), 2, dec!(250.00), created)),
            cancelled(booking(3, june(3), 3, dec!(300.00), created)),
        ];
        let now = Utc.with_ymd_and_hms(2024, 6, 20, 0, 0, 0).unwrap();

        let report = hotel_performance(1, &bookings, 2, june(1), june(11), now, Duration::minutes(30));

        assert_eq!(report.total_bookings, 2);
        assert_eq!(report.total_revenue, dec!(650.00));
        assert_eq!(report.average_booking_value, dec!(325.00));
        // 6 booked nights of 2 rooms x 10 days
        assert_eq!(report.occupancy_rate, dec!(30.00));
        assert_eq!(report.cancellation_rate, dec!(33.33));
    }

    #[test]
    fn test_occupancy_clips_to_period() {
        let created = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        let bookings = vec![confirmed(booking(1, NaiveDate::from_ymd_opt(2024, 5, 29).unwrap(), 5, dec!(500), created))];
        let now = Utc.with_ymd_and_hms(2024, 6, 20, 0, 0, 0).unwrap();

        let report = hotel_performance(1, &bookings, 1, june(1), june(11), now, Duration::minutes(30));

        // Only the nights of June 1 and 2 fall inside the period
        assert_eq!(report.occupancy_rate, dec!(20.00));
        // Paid in May, so not counted as a June sale
        assert_eq!(report.total_bookings, 0);
    }

    #[test]
    fn test_expired_pending_counts_as_cancelled() {
        let created = Utc.with_ymd_and_hms(2024, 6, 2, 9, 0, 0).unwrap();
        let bookings = vec![booking(1, june(5), 1, dec!(100), created)];
        let now = created + Duration::hours(1);

        let report = hotel_performance(1, &bookings, 1, june(1), june(11), now, Duration::minutes(30));
        assert_eq!(report.cancellation_rate, dec!(100.00));
    }

    #[test]
    fn test_empty_hotel() {
        let now = Utc::now();
        let report = hotel_performance(1, &[], 0, june(1), june(11), now, Duration::minutes(30));
        assert_eq!(report.total_revenue, Decimal::ZERO);
        assert_eq!(report.occupancy_rate, Decimal::ZERO);
        assert_eq!(report.cancellation_rate, Decimal::ZERO);
    }

    fn room(id: i32, hotel_id: i32, room_type: RoomType, available: bool) -> Room {
        Room {
            id,
            hotel_id,
            room_type,
            description: None,
            base_price: dec!(100.00),
            peak_price: None,
            capacity: room_type.default_capacity(),
            available,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    fn hotel(id: i32, name: &str) -> Hotel {
        Hotel {
            id,
            name: name.to_string(),
            city: "Brighton".to_string(),
            address: String::new(),
            description: String::new(),
            rating: 4.0,
        }
    }

    fn at_hotel(mut b: Booking, hotel_id: i32) -> Booking {
        b.hotel_id = hotel_id;
        b
    }

    #[test]
    fn test_month_bounds() {
        assert_eq!(month_bounds(2024, 6), Some((june(1), NaiveDate::from_ymd_opt(2024, 7, 1).unwrap())));
        assert_eq!(
            month_bounds(2024, 12),
            Some((
                NaiveDate::from_ymd_opt(2024, 12, 1).unwrap(),
                NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
            ))
        );
        assert_eq!(month_bounds(2024, 13), None);
        assert_eq!(month_bounds(2024, 0), None);
    }

    #[test]
    fn test_room_availability_summary() {
        let rooms = vec![
            room(1, 1, RoomType::Standard, true),
            room(2, 1, RoomType::Double, true),
            room(3, 1, RoomType::Double, true),
            room(4, 1, RoomType::Family, false),
        ];
        let now = Utc.with_ymd_and_hms(2024, 6, 2, 12, 0, 0).unwrap();
        let bookings = vec![
            confirmed(booking(2, june(3), 4, dec!(400.00), now - Duration::days(1))),
            // Unpaid past its window, so it no longer holds room 1
            booking(1, june(4), 1, dec!(100.00), now - Duration::hours(2)),
        ];

        let summary = room_availability_summary(&rooms, &bookings, june(4), june(6), now, Duration::minutes(30));

        assert_eq!(
            summary,
            vec![
                RoomTypeAvailability { room_type: RoomType::Standard, total: 1, available: 1 },
                RoomTypeAvailability { room_type: RoomType::Double, total: 2, available: 1 },
                RoomTypeAvailability { room_type: RoomType::Family, total: 1, available: 0 },
            ]
        );
    }

    #[test]
    fn test_availability_summary_ignores_touching_stays() {
        let rooms = vec![room(2, 1, RoomType::Double, true)];
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let bookings = vec![confirmed(booking(2, june(3), 4, dec!(400.00), now))];

        let summary = room_availability_summary(&rooms, &bookings, june(7), june(9), now, Duration::minutes(30));
        assert_eq!(summary[1].available, 1);
    }

    #[test]
    fn test_top_performing_hotels_ranks_by_revenue() {
        let created = Utc.with_ymd_and_hms(2024, 6, 2, 9, 0, 0).unwrap();
        let hotels = vec![hotel(1, "Harbour View"), hotel(2, "Castle Inn"), hotel(3, "Abbey Lodge")];
        let bookings = vec![
            at_hotel(confirmed(booking(1, june(5), 2, dec!(200.00), created)), 1),
            at_hotel(confirmed(booking(2, june(8), 1, dec!(100.00), created)), 1),
            at_hotel(confirmed(booking(3, june(5), 3, dec!(300.00), created)), 2),
            at_hotel(cancelled(booking(4, june(5), 5, dec!(900.00), created)), 3),
        ];

        let ranking = top_performing_hotels(&hotels, &bookings, june(1), june(11), 5);
        assert_eq!(ranking.len(), 2);
        // Equal revenue, so the name decides
        assert_eq!(ranking[0].hotel_name, "Castle Inn");
        assert_eq!(ranking[0].bookings, 1);
        assert_eq!(ranking[1].hotel_name, "Harbour View");
        assert_eq!(ranking[1].revenue, dec!(300.00));
        assert_eq!(ranking[1].bookings, 2);

        let top = top_performing_hotels(&hotels, &bookings, june(1), june(11), 1);
        assert_eq!(top.len(), 1);

        let later = top_performing_hotels(&hotels, &bookings, june(11), june(20), 5);
        assert!(later.is_empty());
    }

    #[test]
    fn test_room_type_distribution_counts_paid_bookings() {
        let created = Utc.with_ymd_and_hms(2024, 6, 2, 9, 0, 0).unwrap();
        let rooms = vec![
            room(1, 1, RoomType::Standard, true),
            room(2, 1, RoomType::Double, true),
            room(3, 1, RoomType::Double, true),
        ];
        let bookings = vec![
            confirmed(booking(2, june(5), 2, dec!(200.00), created)),
            confirmed(booking(3, june(5), 2, dec!(200.00), created)),
            cancelled(booking(1, june(5), 2, dec!(100.00), created)),
        ];

        let distribution = room_type_distribution(&rooms, &bookings, june(1), june(30));
        assert_eq!(
            distribution,
            vec![
                RoomTypeCount { room_type: RoomType::Standard, bookings: 0 },
                RoomTypeCount { room_type: RoomType::Double, bookings: 2 },
                RoomTypeCount { room_type: RoomType::Family, bookings: 0 },
            ]
        );
    }

    #[test]
    fn test_monthly_report() {
        let in_june = Utc.with_ymd_and_hms(2024, 6, 2, 9, 0, 0).unwrap();
        let in_may = Utc.with_ymd_and_hms(2024, 5, 20, 9, 0, 0).unwrap();
        let hotels = vec![hotel(1, "Harbour View")];
        let rooms = vec![room(1, 1, RoomType::Standard, true), room(2, 1, RoomType::Family, true)];
        let bookings = vec![
            confirmed(booking(1, june(5), 2, dec!(180.00), in_june)),
            confirmed(booking(2, june(9), 2, dec!(320.00), in_june)),
            cancelled(booking(1, june(20), 1, dec!(90.00), in_june)),
            confirmed(booking(2, june(1), 1, dec!(150.00), in_may)),
        ];
        let (from, to) = month_bounds(2024, 6).unwrap();

        let report = monthly_report(from, to, &hotels, &rooms, &bookings);

        assert_eq!(report.period, "June 2024");
        assert_eq!(report.total_bookings, 3);
        assert_eq!(report.cancelled_bookings, 1);
        assert_eq!(report.total_revenue, dec!(500.00));
        assert_eq!(report.top_performing_hotels.len(), 1);
        assert_eq!(report.top_performing_hotels[0].bookings, 2);
        assert_eq!(report.room_type_distribution[0].bookings, 1);
        assert_eq!(report.room_type_distribution[2].bookings, 1);
    }

    #[test]
    fn test_dashboard_stats() {
        let now = Utc.with_ymd_and_hms(2024, 6, 20, 12, 0, 0).unwrap();
        let mut staying = confirmed(booking(1, june(18), 7, dec!(700.00), now - Duration::days(5)));
        staying.user_id = 2;
        let bookings = vec![
            staying,
            confirmed(booking(2, june(5), 2, dec!(200.00), now - Duration::days(25))),
            cancelled(booking(3, june(28), 2, dec!(250.00), now - Duration::days(1))),
        ];

        let stats = dashboard_stats(3, &bookings, now);

        assert_eq!(stats.total_hotels, 3);
        assert_eq!(stats.total_guests, 2);
        assert_eq!(stats.total_bookings, 3);
        assert_eq!(stats.active_bookings, 1);
        // The May sale falls outside the current month
        assert_eq!(stats.monthly_revenue, dec!(700.00));
        assert_eq!(stats.recent_bookings.len(), 3);
        assert_eq!(stats.recent_bookings[0].room_id, 3);
        assert_eq!(stats.recent_bookings[2].room_id, 2);
    }
}
