// Booking lifecycle: pricing, availability, payment and cancellation

pub mod availability;
pub mod calendar;
pub mod cancellation;
pub mod discount;
pub mod error;
pub mod handlers;
pub mod memory;
pub mod models;
pub mod policy;
pub mod pricing;
pub mod repository;
pub mod service;
pub mod status_machine;
pub mod store;

pub use availability::AvailabilityChecker;
pub use cancellation::{CancellationQuote, CancellationTier};
pub use error::BookingError;
pub use memory::InMemoryBookingStore;
pub use models::*;
pub use policy::BookingPolicy;
pub use pricing::{PricingEngine, StayPrice};
pub use repository::PgBookingStore;
pub use service::BookingService;
pub use status_machine::StatusMachine;
pub use store::{BookingStore, InsertOutcome, StoreError};
