//! Cryptographic capabilities consumed by the encrypted key gate.

mod cipher;
mod digest;

pub use cipher::{AesCipher, CredentialCipher};
pub use digest::{DigestEncoding, sha512_digest};
