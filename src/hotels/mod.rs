// Hotel catalog and admin operations

pub mod handlers;
pub mod service;

pub use service::HotelService;
