use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing_subscriber::EnvFilter;

use hotel_booking::{
    auth::TokenService,
    bookings::{BookingPolicy, BookingService, PgBookingStore},
    build_router,
    config::AppConfig,
    currency::{RateProvider, RateTable},
    db,
    hotels::HotelService,
    AppState,
};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        tracing::error!("Hotel booking API failed: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_level(true)
        .init();

    tracing::info!("Hotel booking API - Starting...");
    let config = AppConfig::from_env()?;

    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&config.database_url).await?;
    db::run_migrations(&pool).await?;

    let store = Arc::new(PgBookingStore::new(pool));
    let policy = BookingPolicy::from_config(&config);
    let bookings = BookingService::new(store.clone(), policy.clone());
    let hotels = HotelService::new(store, policy.payment_window);
    let rates = Arc::new(RateProvider::new(
        RateTable::fallback(),
        Utc::now(),
        Duration::seconds(config.rate_ttl_seconds),
    ));

    if config.expiry_sweep_seconds > 0 {
        spawn_expiry_sweeper(bookings.clone(), config.expiry_sweep_seconds);
    }

    let state = AppState {
        bookings,
        hotels,
        tokens: Arc::new(TokenService::new(config.jwt_secret.clone())),
        rates,
    };
    let app = build_router(state);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Hotel booking API is running on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", addr);

    axum::serve(listener, app).await?;
    Ok(())
}

/// Periodically cancel unpaid bookings whose payment window closed
fn spawn_expiry_sweeper(bookings: BookingService, every_seconds: u64) {
    tracing::info!("Expiry sweeper running every {}s", every_seconds);
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(std::time::Duration::from_secs(every_seconds));
        loop {
            ticker.tick().await;
            if let Err(e) = bookings.sweep_expired(Utc::now()).await {
                tracing::warn!("Expiry sweep failed: {}", e);
            }
        }
    });
}
