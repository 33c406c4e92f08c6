//! Gate for AES-encrypted keys checked against a SHA-512 digest.
//!
//! Per request: extract, decrypt, hash, compare. The decrypted key and its
//! digest live only for the duration of `check` and are never logged.

use secrecy::ExposeSecret;

use super::{ApiKeyGate, Credential, Decision, DenyReason, secrets_match};
use crate::config::EncryptedKeySettings;
use crate::crypto::{AesCipher, CredentialCipher, DigestEncoding, sha512_digest};
use crate::error::{CipherError, GateError, GateResult};

/// What to do with a credential that cannot be decrypted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MalformedPolicy {
    /// Surface a server-side fault (500), distinct from a 401
    #[default]
    Fault,
    /// Deny with `DenyReason::MalformedCredential`, carrying the cipher error kind
    Deny,
}

impl MalformedPolicy {
    /// Parse policy from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "fault" => Some(Self::Fault),
            "deny" => Some(Self::Deny),
            _ => None,
        }
    }
}

impl std::fmt::Display for MalformedPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fault => write!(f, "fault"),
            Self::Deny => write!(f, "deny"),
        }
    }
}

/// Allows a request when the decrypted header hashes to the configured digest.
pub struct EncryptedKeyGate {
    cipher: Box<dyn CredentialCipher>,
    api_key_digest: String,
    digest_encoding: DigestEncoding,
    malformed_policy: MalformedPolicy,
}

impl EncryptedKeyGate {
    /// Build the gate with the AES cipher keyed from configuration.
    pub fn new(settings: &EncryptedKeySettings) -> Self {
        Self::with_cipher(
            Box::new(AesCipher::new(&settings.aes_secret)),
            settings.api_key_digest.clone(),
            settings.digest_encoding,
            settings.malformed_policy,
        )
    }

    /// Build the gate around any cipher.
    pub fn with_cipher(
        cipher: Box<dyn CredentialCipher>,
        api_key_digest: String,
        digest_encoding: DigestEncoding,
        malformed_policy: MalformedPolicy,
    ) -> Self {
        Self {
            cipher,
            api_key_digest,
            digest_encoding,
            malformed_policy,
        }
    }
}

impl ApiKeyGate for EncryptedKeyGate {
    fn name(&self) -> &'static str {
        "encrypted"
    }

    fn check(&self, credential: Option<&Credential>) -> GateResult<Decision> {
        let Some(token) = credential else {
            return Ok(Decision::Deny(DenyReason::MissingHeader));
        };

        let decrypted = std::str::from_utf8(token.expose_secret())
            .map_err(CipherError::from)
            .and_then(|token| self.cipher.decrypt(token));

        let api_key = match decrypted {
            Ok(api_key) => api_key,
            Err(err) => {
                return match self.malformed_policy {
                    MalformedPolicy::Fault => Err(GateError::MalformedCredential(err)),
                    MalformedPolicy::Deny => Ok(Decision::Deny(DenyReason::MalformedCredential {
                        cause: err.kind(),
                    })),
                };
            }
        };

        let digest = sha512_digest(api_key.expose_secret(), self.digest_encoding);
        if secrets_match(self.api_key_digest.as_bytes(), digest.as_bytes()) {
            Ok(Decision::Allow)
        } else {
            Ok(Decision::Deny(DenyReason::DigestMismatch))
        }
    }
}

impl std::fmt::Debug for EncryptedKeyGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncryptedKeyGate")
            .field("digest_encoding", &self.digest_encoding)
            .field("malformed_policy", &self.malformed_policy)
            .finish_non_exhaustive()
    }
}
