//! Gate comparing the header against a configured secret.

use secrecy::{ExposeSecret, SecretString};

use super::{ApiKeyGate, Credential, Decision, DenyReason, secrets_match};
use crate::error::GateResult;

/// Allows a request only when the header equals the configured key byte for byte.
#[derive(Clone)]
pub struct PlainKeyGate {
    api_key: SecretString,
}

impl PlainKeyGate {
    pub fn new(api_key: SecretString) -> Self {
        Self { api_key }
    }
}

impl ApiKeyGate for PlainKeyGate {
    fn name(&self) -> &'static str {
        "plain"
    }

    fn check(&self, credential: Option<&Credential>) -> GateResult<Decision> {
        let decision = match credential {
            None => Decision::Deny(DenyReason::MissingHeader),
            Some(provided)
                if secrets_match(
                    self.api_key.expose_secret().as_bytes(),
                    provided.expose_secret(),
                ) =>
            {
                Decision::Allow
            }
            Some(_) => Decision::Deny(DenyReason::KeyMismatch),
        };

        Ok(decision)
    }
}

impl std::fmt::Debug for PlainKeyGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PlainKeyGate([REDACTED])")
    }
}
