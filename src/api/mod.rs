//! API endpoint modules.

pub mod health;
pub mod protected;

pub use health::configure_health_routes;
pub use protected::configure_protected_routes;
