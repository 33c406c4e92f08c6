//! Error types for the API key gate.
//!
//! Uses thiserror for ergonomic error handling with automatic Display implementations.

use actix_web::{HttpResponse, ResponseError};
use std::fmt;

/// Failures while turning an encrypted header value back into a credential.
#[derive(Debug, thiserror::Error)]
pub enum CipherError {
    /// Header value is not valid base64
    #[error("credential is not valid base64")]
    Encoding(#[from] base64::DecodeError),

    /// Ciphertext length, key or padding did not check out
    #[error("credential could not be decrypted")]
    Decrypt,

    /// Decrypted bytes are not UTF-8
    #[error("decrypted credential is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// Header bytes are not UTF-8, so they cannot be a base64 token
    #[error("credential header is not valid UTF-8")]
    Header(#[from] std::str::Utf8Error),
}

impl CipherError {
    /// Stable label for diagnostics. Never includes credential bytes.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Encoding(_) => "invalid_base64",
            Self::Decrypt => "decrypt_failed",
            Self::Utf8(_) => "plaintext_not_utf8",
            Self::Header(_) => "header_not_utf8",
        }
    }
}

/// Per-request gate faults.
///
/// A wrong credential is not an error: it is a `Decision::Deny`. This type only
/// carries conditions the host pipeline must treat as a server-side fault.
#[derive(Debug, thiserror::Error)]
pub enum GateError {
    /// Encrypted credential could not be decrypted
    #[error("Malformed credential: {0}")]
    MalformedCredential(#[source] CipherError),
}

impl ResponseError for GateError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        match self {
            GateError::MalformedCredential(_) => actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let (error_code, response_message) = match self {
            // Logged once by `RequestLogger`; the body stays generic
            GateError::MalformedCredential(_) => (
                "MALFORMED_CREDENTIAL",
                "The credential header could not be processed".to_string(),
            ),
        };

        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: error_code.to_string(),
            message: response_message,
        })
    }
}

/// Error response body.
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

/// Convenience type alias for Results with GateError.
pub type GateResult<T> = Result<T, GateError>;
