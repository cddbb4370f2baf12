// HTTP handlers for the hotel catalog and admin endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use utoipa::IntoParams;
use validator::Validate;

use crate::bookings::{AvailableRoomsQuery, RoomQuote};
use crate::currency::{RateTable, RefreshRatesRequest};
use crate::error::ApiError;
use crate::models::{Hotel, HotelWithRooms, Room, UpdateRoomRequest};
use crate::reports::{
    AvailabilitySummaryQuery, DashboardStats, HotelPerformance, HotelRevenue, MonthlyReport,
    MonthlyReportQuery, ReportQuery, RoomTypeAvailability, RoomTypeCount, TopHotelsQuery,
    DEFAULT_TOP_HOTELS,
};
use crate::AppState;

/// Query parameters for listing hotels
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct HotelListQuery {
    /// Case-insensitive city filter
    pub city: Option<String>,
}

/// Handler for GET /api/hotels
#[utoipa::path(
    get,
    path = "/api/hotels",
    params(HotelListQuery),
    responses(
        (status = 200, description = "Hotels, optionally filtered by city", body = Vec<Hotel>)
    ),
    tag = "hotels"
)]
pub async fn list_hotels(
    State(state): State<AppState>,
    Query(query): Query<HotelListQuery>,
) -> Result<Json<Vec<Hotel>>, ApiError> {
    let hotels = state.hotels.list_hotels(query.city.as_deref()).await?;
    Ok(Json(hotels))
}

/// Handler for GET /api/hotels/:id
#[utoipa::path(
    get,
    path = "/api/hotels/{id}",
    params(("id" = i32, Path, description = "Hotel ID")),
    responses(
        (status = 200, description = "Hotel with its rooms", body = HotelWithRooms),
        (status = 404, description = "Hotel not found")
    ),
    tag = "hotels"
)]
pub async fn get_hotel(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<HotelWithRooms>, ApiError> {
    let hotel = state.hotels.get_hotel_with_rooms(id).await?;
    Ok(Json(hotel))
}

/// Handler for GET /api/hotels/:id/rooms/available
#[utoipa::path(
    get,
    path = "/api/hotels/{id}/rooms/available",
    params(
        ("id" = i32, Path, description = "Hotel ID"),
        AvailableRoomsQuery
    ),
    responses(
        (status = 200, description = "Free rooms with their quoted price", body = Vec<RoomQuote>),
        (status = 400, description = "Invalid stay"),
        (status = 404, description = "Hotel not found")
    ),
    tag = "hotels"
)]
pub async fn available_rooms(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(query): Query<AvailableRoomsQuery>,
) -> Result<Json<Vec<RoomQuote>>, ApiError> {
    let quotes = state
        .bookings
        .available_rooms(id, query.check_in, query.check_out, query.guests, Utc::now())
        .await?;
    tracing::debug!("Hotel {} has {} free rooms", id, quotes.len());
    Ok(Json(quotes))
}

/// Handler for PATCH /api/admin/rooms/:id
#[utoipa::path(
    patch,
    path = "/api/admin/rooms/{id}",
    params(("id" = i32, Path, description = "Room ID")),
    request_body = UpdateRoomRequest,
    responses(
        (status = 200, description = "Room updated", body = Room),
        (status = 400, description = "Invalid or empty update"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Room not found")
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn update_room(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateRoomRequest>,
) -> Result<Json<Room>, ApiError> {
    payload.validate()?;
    let room = state.hotels.update_room_rates(id, payload.into()).await?;
    Ok(Json(room))
}

/// Handler for GET /api/admin/hotels/:id/performance
#[utoipa::path(
    get,
    path = "/api/admin/hotels/{id}/performance",
    params(
        ("id" = i32, Path, description = "Hotel ID"),
        ReportQuery
    ),
    responses(
        (status = 200, description = "Revenue, occupancy and cancellation figures", body = HotelPerformance),
        (status = 400, description = "Invalid period"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Hotel not found")
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn hotel_performance(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<HotelPerformance>, ApiError> {
    let now = Utc::now();
    let (from, to) = query.period(now.date_naive());
    let report = state.hotels.hotel_performance(id, from, to, now).await?;
    Ok(Json(report))
}

/// Handler for GET /api/admin/hotels/:id/availability
#[utoipa::path(
    get,
    path = "/api/admin/hotels/{id}/availability",
    params(
        ("id" = i32, Path, description = "Hotel ID"),
        AvailabilitySummaryQuery
    ),
    responses(
        (status = 200, description = "Total and free rooms per room type", body = Vec<RoomTypeAvailability>),
        (status = 400, description = "Invalid stay"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Hotel not found")
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn availability_summary(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(query): Query<AvailabilitySummaryQuery>,
) -> Result<Json<Vec<RoomTypeAvailability>>, ApiError> {
    let summary = state
        .hotels
        .room_availability_summary(id, query.check_in, query.check_out, Utc::now())
        .await?;
    Ok(Json(summary))
}

/// Handler for GET /api/admin/dashboard
#[utoipa::path(
    get,
    path = "/api/admin/dashboard",
    responses(
        (status = 200, description = "Headline booking and revenue figures", body = DashboardStats),
        (status = 403, description = "Admin role required")
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn dashboard(State(state): State<AppState>) -> Result<Json<DashboardStats>, ApiError> {
    let stats = state.hotels.dashboard(Utc::now()).await?;
    Ok(Json(stats))
}

/// Handler for GET /api/admin/reports/top-hotels
#[utoipa::path(
    get,
    path = "/api/admin/reports/top-hotels",
    params(TopHotelsQuery),
    responses(
        (status = 200, description = "Hotels ranked by revenue", body = Vec<HotelRevenue>),
        (status = 400, description = "Invalid period or limit"),
        (status = 403, description = "Admin role required")
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn top_hotels(
    State(state): State<AppState>,
    Query(query): Query<TopHotelsQuery>,
) -> Result<Json<Vec<HotelRevenue>>, ApiError> {
    let now = Utc::now();
    let (from, to) = query.period(now.date_naive());
    let limit = query.limit.unwrap_or(DEFAULT_TOP_HOTELS);
    let ranking = state.hotels.top_performing_hotels(from, to, limit, now).await?;
    Ok(Json(ranking))
}

/// Handler for GET /api/admin/reports/room-types
#[utoipa::path(
    get,
    path = "/api/admin/reports/room-types",
    params(ReportQuery),
    responses(
        (status = 200, description = "Paid bookings per room type", body = Vec<RoomTypeCount>),
        (status = 400, description = "Invalid period"),
        (status = 403, description = "Admin role required")
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn room_type_distribution(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<Vec<RoomTypeCount>>, ApiError> {
    let now = Utc::now();
    let (from, to) = query.period(now.date_naive());
    let distribution = state.hotels.room_type_distribution(from, to, now).await?;
    Ok(Json(distribution))
}

/// Handler for GET /api/admin/reports/monthly
#[utoipa::path(
    get,
    path = "/api/admin/reports/monthly",
    params(MonthlyReportQuery),
    responses(
        (status = 200, description = "Bookings, revenue and rankings for one month", body = MonthlyReport),
        (status = 400, description = "Invalid month"),
        (status = 403, description = "Admin role required")
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn monthly_report(
    State(state): State<AppState>,
    Query(query): Query<MonthlyReportQuery>,
) -> Result<Json<MonthlyReport>, ApiError> {
    let report = state
        .hotels
        .monthly_report(query.year, query.month, Utc::now())
        .await?;
    Ok(Json(report))
}

/// Handler for PUT /api/admin/currencies
#[utoipa::path(
    put,
    path = "/api/admin/currencies",
    request_body = RefreshRatesRequest,
    responses(
        (status = 200, description = "Rate table replaced", body = RateTable),
        (status = 400, description = "Invalid code or rate"),
        (status = 403, description = "Admin role required")
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn refresh_rates(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRatesRequest>,
) -> Result<Json<RateTable>, ApiError> {
    let table = RateTable::new(payload.rates)?;
    state.rates.refresh(table.clone(), Utc::now()).await;
    Ok(Json(table))
}
