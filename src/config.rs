// Application configuration read once from the environment

use std::env;
use std::str::FromStr;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set in environment")]
    Missing(&'static str),

    #[error("{name} has invalid value '{value}'")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub payment_window_minutes: i64,
    pub max_stay_nights: i64,
    pub booking_retry_attempts: u32,
    /// Background expiry interval; 0 disables the sweeper
    pub expiry_sweep_seconds: u64,
    pub rate_ttl_seconds: i64,
}

impl AppConfig {
    /// Load `.env` if present, then read the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build a config from any variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = Self {
            database_url: required(&lookup, "DATABASE_URL")?,
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parsed(&lookup, "PORT", 8080)?,
            jwt_secret: required(&lookup, "JWT_SECRET")?,
            payment_window_minutes: parsed(&lookup, "PAYMENT_WINDOW_MINUTES", 30)?,
            max_stay_nights: parsed(&lookup, "MAX_STAY_NIGHTS", 30)?,
            booking_retry_attempts: parsed(&lookup, "BOOKING_RETRY_ATTEMPTS", 3)?,
            expiry_sweep_seconds: parsed(&lookup, "EXPIRY_SWEEP_SECONDS", 0)?,
            rate_ttl_seconds: parsed(&lookup, "RATE_TTL_SECONDS", 3600)?,
        };

        if config.payment_window_minutes <= 0 {
            return Err(ConfigError::Invalid {
                name: "PAYMENT_WINDOW_MINUTES",
                value: config.payment_window_minutes.to_string(),
            });
        }
        if config.max_stay_nights <= 0 {
            return Err(ConfigError::Invalid {
                name: "MAX_STAY_NIGHTS",
                value: config.max_stay_nights.to_string(),
            });
        }
        Ok(config)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn required<F>(lookup: &F, name: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .filter(|value| !value.trim().is_empty())
        .ok_or(ConfigError::Missing(name))
}

fn parsed<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
    }
}
