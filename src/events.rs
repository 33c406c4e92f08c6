//! Diagnostic events emitted when a gate denies a request.
//!
//! Gates never log on their own. The middleware hands each denial to a
//! `DenialSink`, so hosts and tests choose where diagnostics go.

use tracing::warn;

use crate::auth::DenyReason;

/// Request context attached to a denial. Never carries the credential value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DenialEvent {
    pub gate: &'static str,
    pub reason: DenyReason,
    /// Cipher error kind for malformed credentials, `None` otherwise
    pub cause: Option<&'static str>,
    pub method: String,
    pub path: String,
    pub remote_addr: String,
    pub user_agent: String,
    pub credential_present: bool,
}

/// Receiver for denial diagnostics.
pub trait DenialSink: Send + Sync {
    fn record(&self, event: &DenialEvent);
}

/// Default sink: warning-level `tracing` event under the `auth` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DenialSink for TracingSink {
    fn record(&self, event: &DenialEvent) {
        warn!(
            target: "auth",
            gate = event.gate,
            reason = %event.reason,
            cause = event.cause,
            method = %event.method,
            path = %event.path,
            remote_addr = %event.remote_addr,
            user_agent = %event.user_agent,
            credential_present = event.credential_present,
            "Request denied"
        );
    }
}
