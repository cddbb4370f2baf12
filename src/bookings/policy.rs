use chrono::Duration;

use crate::config::AppConfig;
use crate::reliability::RetryPolicy;

/// Tunable rules of the booking lifecycle
#[derive(Debug, Clone)]
pub struct BookingPolicy {
    /// How long a pending booking holds its room awaiting payment
    pub payment_window: Duration,
    pub max_stay_nights: i64,
    /// Retries for the atomic availability check and insert
    pub retry: RetryPolicy,
}

impl Default for BookingPolicy {
    fn default() -> Self {
        Self {
            payment_window: Duration::minutes(30),
            max_stay_nights: 30,
            retry: RetryPolicy::default(),
        }
    }
}

impl BookingPolicy {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            payment_window: Duration::minutes(config.payment_window_minutes),
            max_stay_nights: config.max_stay_nights,
            retry: RetryPolicy::with_max_attempts(config.booking_retry_attempts),
        }
    }
}
