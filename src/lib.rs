pub mod auth;
pub mod bookings;
pub mod config;
pub mod currency;
pub mod db;
pub mod error;
pub mod hotels;
pub mod models;
pub mod reliability;
pub mod reports;

use std::sync::Arc;

use axum::{
    extract::FromRef,
    middleware,
    routing::{get, patch, post, put},
    Json, Router,
};
use serde::Serialize;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi, ToSchema,
};
use utoipa_swagger_ui::SwaggerUi;

use auth::{require_admin, TokenService};
use bookings::{handlers as booking_handlers, BookingService};
use currency::RateProvider;
use hotels::{handlers as hotel_handlers, HotelService};

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        hotel_handlers::list_hotels,
        hotel_handlers::get_hotel,
        hotel_handlers::available_rooms,
        hotel_handlers::update_room,
        hotel_handlers::hotel_performance,
        hotel_handlers::availability_summary,
        hotel_handlers::dashboard,
        hotel_handlers::top_hotels,
        hotel_handlers::room_type_distribution,
        hotel_handlers::monthly_report,
        hotel_handlers::refresh_rates,
        booking_handlers::check_availability,
        booking_handlers::create_booking,
        booking_handlers::list_bookings,
        booking_handlers::get_booking,
        booking_handlers::confirm_payment,
        booking_handlers::cancellation_quote,
        booking_handlers::cancel_booking,
    ),
    components(schemas(
        HealthResponse,
        models::RoomType,
        models::Hotel,
        models::Room,
        models::HotelWithRooms,
        models::UpdateRoomRequest,
        bookings::Booking,
        bookings::BookingStatus,
        bookings::PaymentStatus,
        bookings::PaymentMethod,
        bookings::CancelReason,
        bookings::CreateBookingRequest,
        bookings::ConfirmPaymentRequest,
        bookings::AvailabilityRequest,
        bookings::AvailabilityResponse,
        bookings::RoomQuote,
        bookings::StayPrice,
        bookings::UserBookings,
        bookings::CancellationOutcome,
        bookings::CancellationQuote,
        bookings::CancellationTier,
        bookings::CancellationQuoteResponse,
        bookings::DisplayPrice,
        bookings::BookingResponse,
        currency::RateTable,
        currency::RefreshRatesRequest,
        reports::HotelPerformance,
        reports::RoomTypeAvailability,
        reports::HotelRevenue,
        reports::RoomTypeCount,
        reports::MonthlyReport,
        reports::DashboardStats,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "hotels", description = "Hotel catalog and room search"),
        (name = "bookings", description = "Booking, payment and cancellation"),
        (name = "admin", description = "Rates, exchange rates and reports")
    ),
    info(
        title = "Hotel Booking API",
        version = "1.0.0",
        description = "Room availability, seasonal pricing and the booking lifecycle"
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub bookings: BookingService,
    pub hotels: HotelService,
    pub tokens: Arc<TokenService>,
    pub rates: Arc<RateProvider>,
}

impl FromRef<AppState> for Arc<TokenService> {
    fn from_ref(state: &AppState) -> Self {
        state.tokens.clone()
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

/// Handler for GET /health
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// Creates the application router
///
/// Admin routes sit behind the admin-role middleware; booking routes
/// authenticate through the `AuthenticatedUser` extractor.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let admin = Router::new()
        .route("/api/admin/rooms/:id", patch(hotel_handlers::update_room))
        .route(
            "/api/admin/hotels/:id/performance",
            get(hotel_handlers::hotel_performance),
        )
        .route(
            "/api/admin/hotels/:id/availability",
            get(hotel_handlers::availability_summary),
        )
        .route("/api/admin/dashboard", get(hotel_handlers::dashboard))
        .route("/api/admin/reports/top-hotels", get(hotel_handlers::top_hotels))
        .route(
            "/api/admin/reports/room-types",
            get(hotel_handlers::room_type_distribution),
        )
        .route("/api/admin/reports/monthly", get(hotel_handlers::monthly_report))
        .route("/api/admin/currencies", put(hotel_handlers::refresh_rates))
        .route_layer(middleware::from_fn_with_state(
            state.tokens.clone(),
            require_admin,
        ));

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(health))
        .route("/api/hotels", get(hotel_handlers::list_hotels))
        .route("/api/hotels/:id", get(hotel_handlers::get_hotel))
        .route(
            "/api/hotels/:id/rooms/available",
            get(hotel_handlers::available_rooms),
        )
        .route("/api/availability", post(booking_handlers::check_availability))
        .route(
            "/api/bookings",
            post(booking_handlers::create_booking).get(booking_handlers::list_bookings),
        )
        .route("/api/bookings/:booking_ref", get(booking_handlers::get_booking))
        .route(
            "/api/bookings/:booking_ref/payment",
            post(booking_handlers::confirm_payment),
        )
        .route(
            "/api/bookings/:booking_ref/cancellation",
            get(booking_handlers::cancellation_quote),
        )
        .route(
            "/api/bookings/:booking_ref/cancel",
            post(booking_handlers::cancel_booking),
        )
        .merge(admin)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests;
