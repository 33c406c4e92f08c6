//! API key gate for actix-web services.
//!
//! Provides plain and AES-encrypted API key gates, the middleware that runs
//! them once per request, and the configuration that selects between them.

pub mod api;
pub mod auth;
pub mod config;
pub mod crypto;
pub mod error;
pub mod events;
pub mod middleware;
pub mod services;
