use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

/// Room category offered by a hotel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RoomType {
    Standard,
    Double,
    Family,
}

impl RoomType {
    pub const ALL: [RoomType; 3] = [RoomType::Standard, RoomType::Double, RoomType::Family];

    pub fn as_str(&self) -> &'static str {
        match self {
            RoomType::Standard => "standard",
            RoomType::Double => "double",
            RoomType::Family => "family",
        }
    }

    /// Guest capacity a room of this category is normally configured with
    pub fn default_capacity(&self) -> i32 {
        match self {
            RoomType::Standard => 1,
            RoomType::Double => 2,
            RoomType::Family => 4,
        }
    }
}

impl std::fmt::Display for RoomType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for RoomType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "standard" => Ok(RoomType::Standard),
            "double" => Ok(RoomType::Double),
            "family" => Ok(RoomType::Family),
            _ => Err(format!("Invalid room type: {}", s)),
        }
    }
}

/// Represents a hotel in the database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Hotel {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "The Grand Oxford")]
    pub name: String,
    #[schema(example = "London")]
    pub city: String,
    #[schema(example = "123 Oxford Street, London")]
    pub address: String,
    pub description: String,
    #[schema(example = 4.5, minimum = 0.0, maximum = 5.0)]
    pub rating: f64,
}

/// Represents a bookable room belonging to a hotel
///
/// `available` is an administrative in-service switch. Date-based
/// occupancy is derived from bookings only.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Room {
    #[schema(example = 10)]
    pub id: i32,
    #[schema(example = 1)]
    pub hotel_id: i32,
    pub room_type: RoomType,
    pub description: Option<String>,
    /// Nightly rate outside peak season
    #[schema(value_type = String, example = "100.00")]
    pub base_price: Decimal,
    /// Nightly rate in peak season; falls back to 1.3 x base when absent
    #[schema(value_type = Option<String>, example = "130.00")]
    pub peak_price: Option<Decimal>,
    #[schema(example = 2)]
    pub capacity: i32,
    pub available: bool,
    pub created_at: DateTime<Utc>,
}

/// Hotel with its room inventory
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct HotelWithRooms {
    #[serde(flatten)]
    pub hotel: Hotel,
    pub rooms: Vec<Room>,
}

/// Admin request for changing a room's rates or taking it out of service
///
/// Omitted fields keep their current values.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateRoomRequest {
    #[validate(custom = "validate_positive_rate")]
    #[schema(value_type = Option<String>, example = "120.00")]
    pub base_price: Option<Decimal>,
    #[validate(custom = "validate_positive_rate")]
    #[schema(value_type = Option<String>, example = "150.00")]
    pub peak_price: Option<Decimal>,
    /// Remove the peak rate so the 1.3 x base fallback applies
    #[serde(default)]
    pub clear_peak_price: bool,
    pub available: Option<bool>,
}

/// Room change as applied by the store
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoomUpdate {
    pub base_price: Option<Decimal>,
    /// `Some(None)` clears the peak rate
    pub peak_price: Option<Option<Decimal>>,
    pub available: Option<bool>,
}

impl RoomUpdate {
    pub fn is_empty(&self) -> bool {
        self.base_price.is_none() && self.peak_price.is_none() && self.available.is_none()
    }

    /// Apply to an in-memory room
    pub fn apply(&self, room: &mut Room) {
        if let Some(base) = self.base_price {
            room.base_price = base;
        }
        if let Some(peak) = self.peak_price {
            room.peak_price = peak;
        }
        if let Some(available) = self.available {
            room.available = available;
        }
    }
}

impl From<UpdateRoomRequest> for RoomUpdate {
    fn from(request: UpdateRoomRequest) -> Self {
        let peak_price = if request.clear_peak_price {
            Some(None)
        } else {
            request.peak_price.map(Some)
        };
        Self {
            base_price: request.base_price,
            peak_price,
            available: request.available,
        }
    }
}

fn validate_positive_rate(rate: &Decimal) -> Result<(), ValidationError> {
    if *rate <= Decimal::ZERO {
        Err(ValidationError::new("rate_must_be_positive"))
    } else {
        Ok(())
    }
}
