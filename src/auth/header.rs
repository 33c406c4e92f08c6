//! Credential header extraction shared by both gates.

use actix_web::http::header::HeaderMap;
use secrecy::SecretSlice;

use crate::config::API_KEY_HEADER;

/// Raw credential header bytes, redacted in `Debug` and zeroized on drop.
pub type Credential = SecretSlice<u8>;

/// Read the credential header, wrapping its bytes in a secret immediately.
///
/// Lookup is case-insensitive on the name; the value is returned untouched,
/// byte for byte, including bytes that are not UTF-8. When the header repeats,
/// the first value wins.
pub fn extract_credential(headers: &HeaderMap) -> Option<Credential> {
    headers
        .get(API_KEY_HEADER)
        .map(|v| Credential::from(v.as_bytes().to_vec()))
}
