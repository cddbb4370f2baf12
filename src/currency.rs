// Currency display conversion over an injected, explicitly refreshed rate table

use std::collections::HashMap;
use std::sync::OnceLock;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Duration, Utc};
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use utoipa::ToSchema;

use crate::bookings::pricing::round_money;
use crate::error::ErrorResponse;

/// Currency all prices are computed and stored in
pub const BASE_CURRENCY: &str = "GBP";

/// Accepted bounds for a rate, in units per unit of the base currency
const MIN_RATE: Decimal = Decimal::from_parts(1, 0, 0, false, 6);
const MAX_RATE: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CurrencyError {
    #[error("Invalid currency code: {0}")]
    InvalidCode(String),

    #[error("Unknown currency: {0}")]
    UnknownCurrency(String),

    #[error("Exchange rate for {0} must be between 0.000001 and 1000000")]
    InvalidRate(String),

    #[error("Converting {amount} from {from} to {to} is out of range")]
    ConversionOverflow {
        amount: Decimal,
        from: String,
        to: String,
    },

    #[error("Exchange rates are {age_secs}s old and must be refreshed")]
    StaleRates { age_secs: i64 },
}

impl CurrencyError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            CurrencyError::InvalidCode(_) | CurrencyError::InvalidRate(_) => StatusCode::BAD_REQUEST,
            CurrencyError::UnknownCurrency(_) => StatusCode::NOT_FOUND,
            CurrencyError::ConversionOverflow { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            CurrencyError::StaleRates { .. } => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            CurrencyError::InvalidCode(_) | CurrencyError::InvalidRate(_) => "INVALID_CURRENCY",
            CurrencyError::UnknownCurrency(_) => "UNKNOWN_CURRENCY",
            CurrencyError::ConversionOverflow { .. } => "CONVERSION_OVERFLOW",
            CurrencyError::StaleRates { .. } => "STALE_RATES",
        }
    }
}

impl IntoResponse for CurrencyError {
    fn into_response(self) -> Response {
        match &self {
            CurrencyError::ConversionOverflow { .. } => tracing::error!("{}", self),
            CurrencyError::StaleRates { .. } => {
                tracing::warn!("Serving conversion refused: {}", self)
            }
            _ => {}
        }
        let body = ErrorResponse {
            error_code: self.error_code().to_string(),
            message: self.to_string(),
            details: None,
            timestamp: Utc::now().to_rfc3339(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}

fn currency_code_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Z]{3}$").unwrap_or_else(|_| unreachable!()))
}

/// Normalize and validate an ISO 4217 code
pub fn parse_currency_code(code: &str) -> Result<String, CurrencyError> {
    let normalized = code.trim().to_ascii_uppercase();
    if currency_code_regex().is_match(&normalized) {
        Ok(normalized)
    } else {
        Err(CurrencyError::InvalidCode(code.to_string()))
    }
}

/// Exchange rates relative to the base currency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RateTable {
    /// Units of each currency per unit of the base currency
    #[schema(value_type = HashMap<String, String>)]
    rates: HashMap<String, Decimal>,
}

impl RateTable {
    /// Build a table, validating every code and rate
    ///
    /// The base currency is always present at 1. Rates outside
    /// `[MIN_RATE, MAX_RATE]` are rejected.
    pub fn new(rates: HashMap<String, Decimal>) -> Result<Self, CurrencyError> {
        let mut validated = HashMap::with_capacity(rates.len() + 1);
        for (code, rate) in rates {
            let code = parse_currency_code(&code)?;
            if rate < MIN_RATE || rate > MAX_RATE {
                return Err(CurrencyError::InvalidRate(code));
            }
            validated.insert(code, rate);
        }
        validated.insert(BASE_CURRENCY.to_string(), Decimal::ONE);
        Ok(Self { rates: validated })
    }

    /// Rates used when nothing better has been loaded
    pub fn fallback() -> Self {
        let rates = HashMap::from([
            (BASE_CURRENCY.to_string(), Decimal::ONE),
            ("EUR".to_string(), Decimal::new(116, 2)),
            ("USD".to_string(), Decimal::new(127, 2)),
        ]);
        Self { rates }
    }

    pub fn rate(&self, code: &str) -> Result<Decimal, CurrencyError> {
        let code = parse_currency_code(code)?;
        self.rates
            .get(&code)
            .copied()
            .ok_or(CurrencyError::UnknownCurrency(code))
    }

    pub fn codes(&self) -> Vec<String> {
        let mut codes: Vec<String> = self.rates.keys().cloned().collect();
        codes.sort();
        codes
    }

    /// Convert `amount` between two currencies in the table, rounded to 2 dp
    pub fn convert(&self, amount: Decimal, from: &str, to: &str) -> Result<Decimal, CurrencyError> {
        let from_rate = self.rate(from)?;
        let to_rate = self.rate(to)?;
        amount
            .checked_div(from_rate)
            .and_then(|base| base.checked_mul(to_rate))
            .map(round_money)
            .ok_or_else(|| CurrencyError::ConversionOverflow {
                amount,
                from: from.to_string(),
                to: to.to_string(),
            })
    }
}

/// Holds the current rate table and when it was loaded
///
/// Reads fail with `StaleRates` once the table is older than `ttl`, until
/// `refresh` installs a new one.
pub struct RateProvider {
    current: RwLock<(RateTable, DateTime<Utc>)>,
    ttl: Duration,
}

impl RateProvider {
    pub fn new(table: RateTable, loaded_at: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            current: RwLock::new((table, loaded_at)),
            ttl,
        }
    }

    /// Current table, if still fresh at `now`
    pub async fn rates(&self, now: DateTime<Utc>) -> Result<RateTable, CurrencyError> {
        let guard = self.current.read().await;
        let age = now - guard.1;
        if age > self.ttl {
            return Err(CurrencyError::StaleRates {
                age_secs: age.num_seconds(),
            });
        }
        Ok(guard.0.clone())
    }

    pub async fn refresh(&self, table: RateTable, now: DateTime<Utc>) {
        let mut guard = self.current.write().await;
        tracing::info!("Exchange rates refreshed for {:?}", table.codes());
        *guard = (table, now);
    }

    /// Convert a base-currency amount for display
    pub async fn to_display(
        &self,
        amount: Decimal,
        currency: &str,
        now: DateTime<Utc>,
    ) -> Result<(String, Decimal), CurrencyError> {
        let code = parse_currency_code(currency)?;
        let converted = self.rates(now).await?.convert(amount, BASE_CURRENCY, &code)?;
        Ok((code, converted))
    }
}

/// Admin request for replacing the rate table
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RefreshRatesRequest {
    #[schema(value_type = HashMap<String, String>)]
    pub rates: HashMap<String, Decimal>,
}
