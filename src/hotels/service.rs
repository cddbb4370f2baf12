use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::bookings::{Booking, BookingStatus, BookingStore};
use crate::error::ApiError;
use crate::models::{Hotel, HotelWithRooms, Room, RoomUpdate};
use crate::reports::{
    self, DashboardStats, HotelPerformance, HotelRevenue, MonthlyReport, RoomTypeAvailability,
    RoomTypeCount,
};

/// Largest ranking the top-hotels report will return
const MAX_TOP_HOTELS: usize = 50;

const ALL_STATUSES: [BookingStatus; 3] = [
    BookingStatus::Pending,
    BookingStatus::Confirmed,
    BookingStatus::Cancelled,
];

/// Every hotel with its rooms and bookings, as seen at one instant
struct CatalogSnapshot {
    hotels: Vec<Hotel>,
    rooms: Vec<Room>,
    bookings: Vec<Booking>,
}

/// Read side of the catalog plus admin rate management and reporting
#[derive(Clone)]
pub struct HotelService {
    store: Arc<dyn BookingStore>,
    payment_window: Duration,
}

impl HotelService {
    pub fn new(store: Arc<dyn BookingStore>, payment_window: Duration) -> Self {
        Self {
            store,
            payment_window,
        }
    }

    pub async fn list_hotels(&self, city: Option<&str>) -> Result<Vec<Hotel>, ApiError> {
        let city = city.map(str::trim).filter(|c| !c.is_empty());
        let hotels = self.store.list_hotels(city).await?;
        tracing::debug!("Listed {} hotels for city filter {:?}", hotels.len(), city);
        Ok(hotels)
    }

    pub async fn get_hotel_with_rooms(&self, hotel_id: i32) -> Result<HotelWithRooms, ApiError> {
        let hotel = self.require_hotel(hotel_id).await?;
        let rooms = self.store.list_rooms(hotel_id).await?;
        Ok(HotelWithRooms { hotel, rooms })
    }

    /// Change a room's rates or service flag
    ///
    /// Existing bookings keep the price they were quoted.
    pub async fn update_room_rates(&self, room_id: i32, update: RoomUpdate) -> Result<Room, ApiError> {
        if update.is_empty() {
            return Err(ApiError::BadRequest("No room fields to update".to_string()));
        }

        let room = self
            .store
            .update_room(room_id, &update)
            .await?
            .ok_or_else(|| ApiError::NotFound {
                resource: "Room",
                id: room_id.to_string(),
            })?;

        tracing::info!(
            "Room {} updated: base {}, peak {:?}, in service {}",
            room.id,
            room.base_price,
            room.peak_price,
            room.available
        );
        Ok(room)
    }

    /// Performance of a hotel over `[from, to)`
    pub async fn hotel_performance(
        &self,
        hotel_id: i32,
        from: NaiveDate,
        to: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<HotelPerformance, ApiError> {
        check_period(from, to)?;
        self.require_hotel(hotel_id).await?;

        let room_count = self.store.list_rooms(hotel_id).await?.len();
        let bookings = self
            .store
            .list_bookings_for_hotel(hotel_id, &ALL_STATUSES)
            .await?;

        Ok(reports::hotel_performance(
            hotel_id,
            &bookings,
            room_count,
            from,
            to,
            now,
            self.payment_window,
        ))
    }

    /// Total and free rooms of each category over a stay
    pub async fn room_availability_summary(
        &self,
        hotel_id: i32,
        check_in: NaiveDate,
        check_out: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<Vec<RoomTypeAvailability>, ApiError> {
        if check_out <= check_in {
            return Err(ApiError::BadRequest(
                "Check-out must be after check-in".to_string(),
            ));
        }
        self.require_hotel(hotel_id).await?;

        let rooms = self.store.list_rooms(hotel_id).await?;
        let bookings = self
            .store
            .list_bookings_for_hotel(hotel_id, &BookingStatus::ACTIVE)
            .await?;

        Ok(reports::room_availability_summary(
            &rooms,
            &bookings,
            check_in,
            check_out,
            now,
            self.payment_window,
        ))
    }

    pub async fn dashboard(&self, now: DateTime<Utc>) -> Result<DashboardStats, ApiError> {
        let snapshot = self.snapshot(now).await?;
        Ok(reports::dashboard_stats(
            snapshot.hotels.len(),
            &snapshot.bookings,
            now,
        ))
    }

    /// Hotels ranked by revenue paid in `[from, to)`
    pub async fn top_performing_hotels(
        &self,
        from: NaiveDate,
        to: NaiveDate,
        limit: usize,
        now: DateTime<Utc>,
    ) -> Result<Vec<HotelRevenue>, ApiError> {
        check_period(from, to)?;
        if limit == 0 || limit > MAX_TOP_HOTELS {
            return Err(ApiError::BadRequest(format!(
                "Limit must be between 1 and {}",
                MAX_TOP_HOTELS
            )));
        }
        let snapshot = self.snapshot(now).await?;
        Ok(reports::top_performing_hotels(
            &snapshot.hotels,
            &snapshot.bookings,
            from,
            to,
            limit,
        ))
    }

    pub async fn room_type_distribution(
        &self,
        from: NaiveDate,
        to: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<Vec<RoomTypeCount>, ApiError> {
        check_period(from, to)?;
        let snapshot = self.snapshot(now).await?;
        Ok(reports::room_type_distribution(
            &snapshot.rooms,
            &snapshot.bookings,
            from,
            to,
        ))
    }

    /// Figures for one calendar month across all hotels
    pub async fn monthly_report(
        &self,
        year: i32,
        month: u32,
        now: DateTime<Utc>,
    ) -> Result<MonthlyReport, ApiError> {
        let (from, to) = reports::month_bounds(year, month)
            .ok_or_else(|| ApiError::BadRequest(format!("Invalid month {}-{}", year, month)))?;
        let snapshot = self.snapshot(now).await?;
        tracing::debug!(
            "Monthly report for {} over {} hotels",
            from.format("%Y-%m"),
            snapshot.hotels.len()
        );
        Ok(reports::monthly_report(
            from,
            to,
            &snapshot.hotels,
            &snapshot.rooms,
            &snapshot.bookings,
        ))
    }

    async fn require_hotel(&self, hotel_id: i32) -> Result<Hotel, ApiError> {
        self.store
            .get_hotel(hotel_id)
            .await?
            .ok_or_else(|| ApiError::NotFound {
                resource: "Hotel",
                id: hotel_id.to_string(),
            })
    }

    /// Load every hotel, room and booking, with expired pending bookings shown as cancelled
    async fn snapshot(&self, now: DateTime<Utc>) -> Result<CatalogSnapshot, ApiError> {
        let hotels = self.store.list_hotels(None).await?;
        let mut rooms = Vec::new();
        let mut bookings = Vec::new();
        for hotel in &hotels {
            rooms.extend(self.store.list_rooms(hotel.id).await?);
            bookings.extend(
                self.store
                    .list_bookings_for_hotel(hotel.id, &ALL_STATUSES)
                    .await?
                    .into_iter()
                    .map(|b| b.effective(now, self.payment_window)),
            );
        }
        Ok(CatalogSnapshot {
            hotels,
            rooms,
            bookings,
        })
    }
}

fn check_period(from: NaiveDate, to: NaiveDate) -> Result<(), ApiError> {
    if to <= from {
        return Err(ApiError::BadRequest(
            "Report period must end after it starts".to_string(),
        ));
    }
    Ok(())
}
