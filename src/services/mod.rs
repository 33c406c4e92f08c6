//! Operator services.

pub mod api_key;
