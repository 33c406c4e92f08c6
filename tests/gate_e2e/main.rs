//! Gate E2E test suite.
//!
//! Runs both gates inside a real actix-web app and checks what a client sees:
//! pass-through, 401 with an empty body, or a 500 fault, and what lands in the logs.
//!
//! Run with: cargo test --test gate_e2e

mod test_helpers;

mod test_encrypted_gate;
mod test_host_app;
