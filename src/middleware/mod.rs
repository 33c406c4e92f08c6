//! Actix-web middleware.

mod api_key_filter;
mod request_logger;

pub use api_key_filter::{ApiKeyFilter, ApiKeyFilterMiddleware};
pub use request_logger::{RequestLogger, RequestLoggerMiddleware};
