//! API key gates.
//!
//! Two strategies share one contract: given the credential header (or its
//! absence), decide whether the request may reach the protected handler.
//!
//! # Security features
//! - Header bytes are wrapped in a secret as soon as they are read, never decoded lossily
//! - Keys and digests are compared with `subtle::ConstantTimeEq`
//! - Gates hold read-only configuration and are shared across workers via `Arc`

mod client;
mod encrypted;
mod header;
mod plain;

use std::sync::Arc;

use subtle::ConstantTimeEq;

use crate::config::GateSettings;
use crate::error::GateResult;

pub use client::{ClientCredential, ClientCredentialError};
pub use encrypted::{EncryptedKeyGate, MalformedPolicy};
pub use header::{Credential, extract_credential};
pub use plain::PlainKeyGate;

/// Why a request was turned away with 401.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// No credential header on the request
    MissingHeader,
    /// Plain key did not match
    KeyMismatch,
    /// Decrypted key hashed to a different digest
    DigestMismatch,
    /// Encrypted key could not be decrypted (only under `MalformedPolicy::Deny`)
    MalformedCredential {
        /// `CipherError::kind` of the failure
        cause: &'static str,
    },
}

impl DenyReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingHeader => "missing_header",
            Self::KeyMismatch => "key_mismatch",
            Self::DigestMismatch => "digest_mismatch",
            Self::MalformedCredential { .. } => "malformed_credential",
        }
    }

    /// Extra diagnostic detail, if the reason carries any.
    pub fn cause(&self) -> Option<&'static str> {
        match self {
            Self::MalformedCredential { cause } => Some(*cause),
            _ => None,
        }
    }
}

impl std::fmt::Display for DenyReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a successful gate check. Faults are returned as `GateError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(DenyReason),
}

impl Decision {
    pub fn is_allow(&self) -> bool {
        matches!(self, Self::Allow)
    }
}

/// A per-request authentication check.
pub trait ApiKeyGate: Send + Sync {
    /// Short name used in diagnostics.
    fn name(&self) -> &'static str;

    /// Check the credential header value, `None` when the header is absent.
    fn check(&self, credential: Option<&Credential>) -> GateResult<Decision>;
}

/// Build the gate selected by configuration.
pub fn build_gate(settings: &GateSettings) -> Arc<dyn ApiKeyGate> {
    match settings {
        GateSettings::Plain(plain) => Arc::new(PlainKeyGate::new(plain.api_key.clone())),
        GateSettings::Encrypted(encrypted) => Arc::new(EncryptedKeyGate::new(encrypted)),
    }
}

/// Constant-time equality over the full byte strings.
///
/// `ConstantTimeEq` returns false for unequal lengths without an early exit.
fn secrets_match(expected: &[u8], provided: &[u8]) -> bool {
    expected.ct_eq(provided).into()
}
