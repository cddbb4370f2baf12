// Handler tests for the hotel booking API
// Runs the full router over the in-memory store

use super::*;
use crate::auth::Role;
use crate::bookings::{BookingPolicy, InMemoryBookingStore};
use crate::currency::RateTable;
use crate::models::RoomType;
use axum::http::{header, HeaderValue, StatusCode};
use axum_test::TestServer;
use chrono::{Datelike, Duration, NaiveDate, Utc};
use rust_decimal_macros::dec;
use serde_json::{json, Value};

const SECRET: &str = "test_secret_key_for_testing_purposes";
const GUEST: i32 = 7;
const OTHER_GUEST: i32 = 8;
const ADMIN: i32 = 1;

// ============================================================================
// Test Helpers
// ============================================================================

struct TestApp {
    server: TestServer,
    tokens: Arc<TokenService>,
    hotel_id: i32,
    room_id: i32,
}

/// Router over an in-memory store with one hotel holding one double room
async fn create_test_app() -> TestApp {
    let store = Arc::new(InMemoryBookingStore::new());
    let hotel = store.add_hotel("Harbour View", "Brighton").await;
    store.add_hotel("Castle Inn", "Edinburgh").await;
    let room = store
        .add_room(hotel.id, RoomType::Double, dec!(100.00), Some(dec!(130.00)))
        .await;

    let policy = BookingPolicy::default();
    let tokens = Arc::new(TokenService::new(SECRET.to_string()));
    let state = AppState {
        bookings: BookingService::new(store.clone(), policy.clone()),
        hotels: HotelService::new(store, policy.payment_window),
        tokens: tokens.clone(),
        rates: Arc::new(RateProvider::new(
            RateTable::fallback(),
            Utc::now(),
            Duration::hours(1),
        )),
    };

    TestApp {
        server: TestServer::new(build_router(state)).unwrap(),
        tokens,
        hotel_id: hotel.id,
        room_id: room.id,
    }
}

impl TestApp {
    fn bearer(&self, user_id: i32, role: Role) -> HeaderValue {
        let token = self
            .tokens
            .generate_access_token(user_id, "someone@example.com", role)
            .unwrap();
        HeaderValue::from_str(&format!("Bearer {}", token)).unwrap()
    }

    async fn book(&self, user_id: i32, check_in: NaiveDate, nights: i64) -> axum_test::TestResponse {
        self.server
            .post("/api/bookings")
            .add_header(header::AUTHORIZATION, self.bearer(user_id, Role::User))
            .json(&json!({
                "room_id": self.room_id,
                "check_in": check_in,
                "check_out": check_in + Duration::days(nights),
                "guests": 2
            }))
            .await
    }

    async fn book_ref(&self, user_id: i32, check_in: NaiveDate, nights: i64) -> String {
        let response = self.book(user_id, check_in, nights).await;
        assert_eq!(response.status_code(), StatusCode::CREATED);
        let body: Value = response.json();
        body["booking_ref"].as_str().unwrap().to_string()
    }

    /// Book and pay for a stay, returning the booking reference
    async fn paid_booking(&self, user_id: i32, check_in: NaiveDate, nights: i64) -> String {
        let booking_ref = self.book_ref(user_id, check_in, nights).await;
        let response = self
            .server
            .post(&format!("/api/bookings/{}/payment", booking_ref))
            .add_header(header::AUTHORIZATION, self.bearer(user_id, Role::User))
            .json(&json!({ "payment_method": "card" }))
            .await;
        assert_eq!(response.status_code(), StatusCode::OK);
        booking_ref
    }
}

fn days_from_today(days: i64) -> NaiveDate {
    Utc::now().date_naive() + Duration::days(days)
}

// ============================================================================
// Catalog
// ============================================================================

#[tokio::test]
async fn test_health() {
    let app = create_test_app().await;
    let response = app.server.get("/health").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_list_hotels_by_city() {
    let app = create_test_app().await;

    let all: Vec<Value> = app.server.get("/api/hotels").await.json();
    assert_eq!(all.len(), 2);

    let response = app
        .server
        .get("/api/hotels")
        .add_query_param("city", "brighton")
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let hotels: Vec<Value> = response.json();
    assert_eq!(hotels.len(), 1);
    assert_eq!(hotels[0]["name"], "Harbour View");
}

#[tokio::test]
async fn test_get_hotel_with_rooms() {
    let app = create_test_app().await;

    let response = app.server.get(&format!("/api/hotels/{}", app.hotel_id)).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["name"], "Harbour View");
    assert_eq!(body["rooms"].as_array().unwrap().len(), 1);

    let response = app.server.get("/api/hotels/999").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_available_rooms_drops_booked_room() {
    let app = create_test_app().await;
    let check_in = days_from_today(20);
    let url = format!("/api/hotels/{}/rooms/available", app.hotel_id);
    let check_out = check_in + Duration::days(2);

    let quotes: Vec<Value> = app
        .server
        .get(&url)
        .add_query_param("check_in", check_in.to_string())
        .add_query_param("check_out", check_out.to_string())
        .add_query_param("guests", 2)
        .await
        .json();
    assert_eq!(quotes.len(), 1);
    assert_eq!(quotes[0]["room"]["id"], app.room_id);

    app.book_ref(GUEST, check_in, 2).await;
    let quotes: Vec<Value> = app
        .server
        .get(&url)
        .add_query_param("check_in", check_in.to_string())
        .add_query_param("check_out", check_out.to_string())
        .add_query_param("guests", 2)
        .await
        .json();
    assert!(quotes.is_empty());
}

#[tokio::test]
async fn test_available_rooms_filters_by_capacity() {
    let app = create_test_app().await;
    let check_in = days_from_today(20);
    let url = format!("/api/hotels/{}/rooms/available", app.hotel_id);
    let check_out = check_in + Duration::days(2);

    let quotes: Vec<Value> = app
        .server
        .get(&url)
        .add_query_param("check_in", check_in.to_string())
        .add_query_param("check_out", check_out.to_string())
        .add_query_param("guests", 3)
        .await
        .json();
    assert!(quotes.is_empty());
}

// ============================================================================
// Availability
// ============================================================================

#[tokio::test]
async fn test_check_availability() {
    let app = create_test_app().await;
    let check_in = days_from_today(20);
    let payload = json!({
        "hotel_id": app.hotel_id,
        "room_type": "double",
        "check_in": check_in,
        "check_out": check_in + Duration::days(3)
    });

    let response = app.server.post("/api/availability").json(&payload).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>()["available"], true);

    app.book_ref(GUEST, check_in + Duration::days(1), 1).await;
    let response = app.server.post("/api/availability").json(&payload).await;
    assert_eq!(response.json::<Value>()["available"], false);
}

#[tokio::test]
async fn test_check_availability_errors() {
    let app = create_test_app().await;
    let check_in = days_from_today(20);

    let response = app
        .server
        .post("/api/availability")
        .json(&json!({
            "hotel_id": 999,
            "room_type": "double",
            "check_in": check_in,
            "check_out": check_in + Duration::days(1)
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    let response = app
        .server
        .post("/api/availability")
        .json(&json!({
            "hotel_id": app.hotel_id,
            "room_type": "double",
            "check_in": check_in,
            "check_out": check_in
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error_code"], "INVALID_DATE_RANGE");
}

// ============================================================================
// Booking lifecycle
// ============================================================================

#[tokio::test]
async fn test_create_booking_requires_token() {
    let app = create_test_app().await;
    let check_in = days_from_today(20);

    let response = app
        .server
        .post("/api/bookings")
        .json(&json!({
            "room_id": app.room_id,
            "check_in": check_in,
            "check_out": check_in + Duration::days(1),
            "guests": 1
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_booking_success() {
    let app = create_test_app().await;
    let response = app.book(GUEST, days_from_today(20), 3).await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["status"], "pending");
    assert_eq!(body["payment_status"], "pending");
    assert_eq!(body["user_id"], GUEST);
    assert!(body.get("id").is_none());
}

#[tokio::test]
async fn test_overlapping_booking_is_rejected() {
    let app = create_test_app().await;
    let check_in = days_from_today(20);
    app.book_ref(GUEST, check_in, 3).await;

    let response = app.book(OTHER_GUEST, check_in + Duration::days(1), 3).await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);
    assert_eq!(response.json::<Value>()["error_code"], "ROOM_UNAVAILABLE");

    // Back-to-back stays share a boundary day without overlapping
    let response = app.book(OTHER_GUEST, check_in + Duration::days(3), 2).await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_create_booking_validation() {
    let app = create_test_app().await;

    let response = app.book(GUEST, days_from_today(-2), 1).await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error_code"], "PAST_CHECK_IN");

    let response = app.book(GUEST, days_from_today(10), 31).await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error_code"], "STAY_TOO_LONG");

    let check_in = days_from_today(10);
    let response = app
        .server
        .post("/api/bookings")
        .add_header(header::AUTHORIZATION, app.bearer(GUEST, Role::User))
        .json(&json!({
            "room_id": app.room_id,
            "check_in": check_in,
            "check_out": check_in + Duration::days(1),
            "guests": 0
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error_code"], "GUEST_COUNT_INVALID");
}

#[tokio::test]
async fn test_confirm_payment_then_reject_second_payment() {
    let app = create_test_app().await;
    let booking_ref = app.book_ref(GUEST, days_from_today(20), 2).await;
    let url = format!("/api/bookings/{}/payment", booking_ref);

    let response = app
        .server
        .post(&url)
        .add_header(header::AUTHORIZATION, app.bearer(GUEST, Role::User))
        .json(&json!({ "payment_method": "card" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["status"], "confirmed");
    assert_eq!(body["payment_status"], "paid");
    assert_eq!(body["payment_method"], "card");

    let response = app
        .server
        .post(&url)
        .add_header(header::AUTHORIZATION, app.bearer(GUEST, Role::User))
        .json(&json!({ "payment_method": "paypal" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);
    assert_eq!(response.json::<Value>()["error_code"], "ALREADY_PAID");
}

#[tokio::test]
async fn test_booking_is_private_to_its_owner() {
    let app = create_test_app().await;
    let booking_ref = app.book_ref(GUEST, days_from_today(20), 2).await;

    let response = app
        .server
        .get(&format!("/api/bookings/{}", booking_ref))
        .add_header(header::AUTHORIZATION, app.bearer(OTHER_GUEST, Role::User))
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
    assert_eq!(response.json::<Value>()["error_code"], "UNAUTHORIZED");

    let response = app
        .server
        .post(&format!("/api/bookings/{}/cancel", booking_ref))
        .add_header(header::AUTHORIZATION, app.bearer(OTHER_GUEST, Role::User))
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_unknown_booking_ref() {
    let app = create_test_app().await;
    let response = app
        .server
        .get(&format!("/api/bookings/{}", uuid::Uuid::new_v4()))
        .add_header(header::AUTHORIZATION, app.bearer(GUEST, Role::User))
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_booking_with_display_currency() {
    let app = create_test_app().await;
    let booking_ref = app.book_ref(GUEST, days_from_today(20), 2).await;
    let auth = app.bearer(GUEST, Role::User);

    let response = app
        .server
        .get(&format!("/api/bookings/{}", booking_ref))
        .add_query_param("currency", "eur")
        .add_header(header::AUTHORIZATION, auth.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["display_price"]["currency"], "EUR");

    let plain: Value = app
        .server
        .get(&format!("/api/bookings/{}", booking_ref))
        .add_header(header::AUTHORIZATION, auth.clone())
        .await
        .json();
    assert!(plain.get("display_price").is_none());

    let response = app
        .server
        .get(&format!("/api/bookings/{}", booking_ref))
        .add_query_param("currency", "JPY")
        .add_header(header::AUTHORIZATION, auth.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    let response = app
        .server
        .get(&format!("/api/bookings/{}", booking_ref))
        .add_query_param("currency", "euros")
        .add_header(header::AUTHORIZATION, auth)
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_cancellation_quote_and_cancel() {
    let app = create_test_app().await;
    let booking_ref = app.book_ref(GUEST, days_from_today(20), 2).await;
    let auth = app.bearer(GUEST, Role::User);

    let response = app
        .server
        .get(&format!("/api/bookings/{}/cancellation", booking_ref))
        .add_header(header::AUTHORIZATION, auth.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["booking_ref"], booking_ref.as_str());
    assert_eq!(body["quote"]["tier"], "free");

    let url = format!("/api/bookings/{}/cancel", booking_ref);
    let response = app
        .server
        .post(&url)
        .add_header(header::AUTHORIZATION, auth.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["booking"]["status"], "cancelled");
    assert_eq!(body["booking"]["payment_status"], "cancelled");
    assert_eq!(body["booking"]["cancel_reason"], "user_request");

    let response = app
        .server
        .post(&url)
        .add_header(header::AUTHORIZATION, auth.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);
    assert_eq!(response.json::<Value>()["error_code"], "ALREADY_FINAL");

    // A cancelled booking can no longer be paid for
    let response = app
        .server
        .post(&format!("/api/bookings/{}/payment", booking_ref))
        .add_header(header::AUTHORIZATION, auth)
        .json(&json!({ "payment_method": "card" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_cancelled_booking_frees_the_room() {
    let app = create_test_app().await;
    let check_in = days_from_today(20);
    let booking_ref = app.book_ref(GUEST, check_in, 2).await;

    app.server
        .post(&format!("/api/bookings/{}/cancel", booking_ref))
        .add_header(header::AUTHORIZATION, app.bearer(GUEST, Role::User))
        .await;

    let response = app.book(OTHER_GUEST, check_in, 2).await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_list_bookings_splits_upcoming() {
    let app = create_test_app().await;
    app.book_ref(GUEST, days_from_today(20), 2).await;
    app.book_ref(OTHER_GUEST, days_from_today(40), 2).await;

    let response = app
        .server
        .get("/api/bookings")
        .add_header(header::AUTHORIZATION, app.bearer(GUEST, Role::User))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["upcoming"].as_array().unwrap().len(), 1);
    assert!(body["past"].as_array().unwrap().is_empty());
}

// ============================================================================
// Admin
// ============================================================================

#[tokio::test]
async fn test_admin_routes_require_admin_role() {
    let app = create_test_app().await;
    let url = format!("/api/admin/rooms/{}", app.room_id);

    let response = app.server.patch(&url).json(&json!({ "available": false })).await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);

    let response = app
        .server
        .patch(&url)
        .add_header(header::AUTHORIZATION, app.bearer(GUEST, Role::User))
        .json(&json!({ "available": false }))
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_updates_room_rates() {
    let app = create_test_app().await;
    let url = format!("/api/admin/rooms/{}", app.room_id);
    let auth = app.bearer(ADMIN, Role::Admin);

    let response = app
        .server
        .patch(&url)
        .add_header(header::AUTHORIZATION, auth.clone())
        .json(&json!({ "base_price": "120.00", "clear_peak_price": true }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["base_price"], "120.00");
    assert!(body["peak_price"].is_null());

    let response = app
        .server
        .patch(&url)
        .add_header(header::AUTHORIZATION, auth.clone())
        .json(&json!({}))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let response = app
        .server
        .patch(&url)
        .add_header(header::AUTHORIZATION, auth.clone())
        .json(&json!({ "base_price": "-5" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let response = app
        .server
        .patch("/api/admin/rooms/999")
        .add_header(header::AUTHORIZATION, auth)
        .json(&json!({ "available": false }))
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_out_of_service_room_cannot_be_booked() {
    let app = create_test_app().await;
    app.server
        .patch(&format!("/api/admin/rooms/{}", app.room_id))
        .add_header(header::AUTHORIZATION, app.bearer(ADMIN, Role::Admin))
        .json(&json!({ "available": false }))
        .await;

    let response = app.book(GUEST, days_from_today(20), 2).await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_hotel_performance_report() {
    let app = create_test_app().await;
    let booking_ref = app.book_ref(GUEST, days_from_today(3), 2).await;
    app.server
        .post(&format!("/api/bookings/{}/payment", booking_ref))
        .add_header(header::AUTHORIZATION, app.bearer(GUEST, Role::User))
        .json(&json!({ "payment_method": "googlepay" }))
        .await;

    let url = format!("/api/admin/hotels/{}/performance", app.hotel_id);
    let response = app
        .server
        .get(&url)
        .add_query_param("from", days_from_today(-1).to_string())
        .add_query_param("to", days_from_today(10).to_string())
        .add_header(header::AUTHORIZATION, app.bearer(ADMIN, Role::Admin))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["total_bookings"], 1);
    let cancellation_rate: rust_decimal::Decimal =
        body["cancellation_rate"].as_str().unwrap().parse().unwrap();
    assert!(cancellation_rate.is_zero());
}

#[tokio::test]
async fn test_admin_dashboard() {
    let app = create_test_app().await;
    app.paid_booking(GUEST, days_from_today(5), 2).await;
    app.book_ref(OTHER_GUEST, days_from_today(20), 1).await;

    let response = app
        .server
        .get("/api/admin/dashboard")
        .add_header(header::AUTHORIZATION, app.bearer(ADMIN, Role::Admin))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["total_hotels"], 2);
    assert_eq!(body["total_guests"], 2);
    assert_eq!(body["total_bookings"], 2);
    assert_eq!(body["active_bookings"], 1);
    assert_eq!(body["recent_bookings"].as_array().unwrap().len(), 2);

    let response = app
        .server
        .get("/api/admin/dashboard")
        .add_header(header::AUTHORIZATION, app.bearer(GUEST, Role::User))
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_room_availability_summary_endpoint() {
    let app = create_test_app().await;
    let check_in = days_from_today(20);
    app.book_ref(GUEST, check_in, 2).await;
    let url = format!("/api/admin/hotels/{}/availability", app.hotel_id);

    let response = app
        .server
        .get(&url)
        .add_query_param("check_in", check_in.to_string())
        .add_query_param("check_out", (check_in + Duration::days(1)).to_string())
        .add_header(header::AUTHORIZATION, app.bearer(ADMIN, Role::Admin))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let summary: Vec<Value> = response.json();
    assert_eq!(summary.len(), 3);
    let double = summary.iter().find(|s| s["room_type"] == "double").unwrap();
    assert_eq!(double["total"], 1);
    assert_eq!(double["available"], 0);

    let response = app
        .server
        .get(&url)
        .add_query_param("check_in", check_in.to_string())
        .add_query_param("check_out", check_in.to_string())
        .add_header(header::AUTHORIZATION, app.bearer(ADMIN, Role::Admin))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_monthly_and_ranking_reports() {
    let app = create_test_app().await;
    app.paid_booking(GUEST, days_from_today(5), 2).await;
    let today = Utc::now().date_naive();
    let admin = app.bearer(ADMIN, Role::Admin);

    let response = app
        .server
        .get("/api/admin/reports/monthly")
        .add_query_param("year", today.year())
        .add_query_param("month", today.month())
        .add_header(header::AUTHORIZATION, admin.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let report: Value = response.json();
    assert_eq!(report["total_bookings"], 1);
    assert_eq!(report["cancelled_bookings"], 0);
    assert_eq!(report["top_performing_hotels"][0]["hotel_name"], "Harbour View");

    let response = app
        .server
        .get("/api/admin/reports/monthly")
        .add_query_param("year", today.year())
        .add_query_param("month", 13)
        .add_header(header::AUTHORIZATION, admin.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let ranking: Vec<Value> = app
        .server
        .get("/api/admin/reports/top-hotels")
        .add_query_param("from", days_from_today(-1).to_string())
        .add_query_param("to", days_from_today(1).to_string())
        .add_query_param("limit", 1)
        .add_header(header::AUTHORIZATION, admin.clone())
        .await
        .json();
    assert_eq!(ranking.len(), 1);
    assert_eq!(ranking[0]["bookings"], 1);

    let response = app
        .server
        .get("/api/admin/reports/top-hotels")
        .add_query_param("limit", 0)
        .add_header(header::AUTHORIZATION, admin.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let distribution: Vec<Value> = app
        .server
        .get("/api/admin/reports/room-types")
        .add_query_param("from", days_from_today(-1).to_string())
        .add_query_param("to", days_from_today(1).to_string())
        .add_header(header::AUTHORIZATION, admin)
        .await
        .json();
    let double = distribution.iter().find(|c| c["room_type"] == "double").unwrap();
    assert_eq!(double["bookings"], 1);
}

#[tokio::test]
async fn test_refresh_rates_changes_display_price() {
    let app = create_test_app().await;
    let response = app
        .server
        .put("/api/admin/currencies")
        .add_header(header::AUTHORIZATION, app.bearer(ADMIN, Role::Admin))
        .json(&json!({ "rates": { "EUR": "2" } }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let booking_ref = app.book_ref(GUEST, days_from_today(20), 2).await;
    let body: Value = app
        .server
        .get(&format!("/api/bookings/{}", booking_ref))
        .add_query_param("currency", "EUR")
        .add_header(header::AUTHORIZATION, app.bearer(GUEST, Role::User))
        .await
        .json();

    let total: rust_decimal::Decimal = body["total_price"].as_str().unwrap().parse().unwrap();
    let shown: rust_decimal::Decimal = body["display_price"]["amount"].as_str().unwrap().parse().unwrap();
    assert_eq!(shown, total * dec!(2));

    let response = app
        .server
        .put("/api/admin/currencies")
        .add_header(header::AUTHORIZATION, app.bearer(ADMIN, Role::Admin))
        .json(&json!({ "rates": { "EUR": "0" } }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let response = app
        .server
        .put("/api/admin/currencies")
        .add_header(header::AUTHORIZATION, app.bearer(ADMIN, Role::Admin))
        .json(&json!({ "rates": { "JPY": "79228162514264337593543950335" } }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error_code"], "INVALID_CURRENCY");

    // The rejected tables never replaced the working one
    let response = app
        .server
        .get(&format!("/api/bookings/{}", booking_ref))
        .add_query_param("currency", "EUR")
        .add_header(header::AUTHORIZATION, app.bearer(GUEST, Role::User))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
}
