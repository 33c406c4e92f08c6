//! SHA-512 digests of decrypted credentials.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use sha2::{Digest, Sha512};

/// SHA-512 output length in bytes.
const SHA512_LENGTH: usize = 64;

/// Textual form of a configured digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DigestEncoding {
    /// Lowercase hex, 128 chars
    #[default]
    Hex,
    /// Standard padded base64, 88 chars
    Base64,
}

impl DigestEncoding {
    /// Parse encoding from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "hex" => Some(Self::Hex),
            "base64" | "b64" => Some(Self::Base64),
            _ => None,
        }
    }

    /// Encode raw digest bytes.
    pub fn encode(&self, bytes: &[u8]) -> String {
        match self {
            Self::Hex => hex::encode(bytes),
            Self::Base64 => STANDARD.encode(bytes),
        }
    }

    /// Check that a configured digest is something this encoding can produce.
    ///
    /// Comparison is exact, so uppercase hex would never match and is rejected.
    pub fn is_well_formed(&self, digest: &str) -> bool {
        match self {
            Self::Hex => {
                digest.len() == SHA512_LENGTH * 2
                    && digest
                        .bytes()
                        .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
            }
            Self::Base64 => STANDARD
                .decode(digest)
                .is_ok_and(|bytes| bytes.len() == SHA512_LENGTH && STANDARD.encode(&bytes) == digest),
        }
    }
}

impl std::fmt::Display for DigestEncoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Hex => write!(f, "hex"),
            Self::Base64 => write!(f, "base64"),
        }
    }
}

/// Hash a credential with SHA-512.
pub fn sha512_digest(credential: &str, encoding: DigestEncoding) -> String {
    let mut hasher = Sha512::new();
    hasher.update(credential.as_bytes());
    encoding.encode(&hasher.finalize())
}
