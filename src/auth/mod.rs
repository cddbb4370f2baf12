// Bearer token authentication for guest and admin routes

pub mod error;
pub mod middleware;
pub mod models;
pub mod token;

pub use error::AuthError;
pub use middleware::{require_admin, AuthenticatedUser, RequireRole};
pub use models::Role;
pub use token::{Claims, TokenService};
