//! API key issuance: fresh keys, their digests, and client tokens.

use rand::Rng;
use secrecy::{ExposeSecret, SecretString};

use crate::crypto::{AesCipher, CredentialCipher, DigestEncoding, sha512_digest};
use crate::error::CipherError;

/// API key prefix.
const KEY_PREFIX: &str = "kg_";
/// Length of random part of the key.
const KEY_RANDOM_LENGTH: usize = 32;

/// Everything an operator needs to deploy one key.
pub struct IssuedKey {
    /// The key itself (plain gate secret, or what the client encrypts)
    pub api_key: SecretString,
    /// SHA-512 digest for `KEYGATE_API_KEY_DIGEST`
    pub digest: String,
    /// Header value for an encrypted gate, when an AES secret was given
    pub encrypted_token: Option<String>,
}

/// Generate a new random API key.
pub fn generate_key() -> SecretString {
    let random_part: String = rand::thread_rng()
        .sample_iter(&rand::distributions::Alphanumeric)
        .take(KEY_RANDOM_LENGTH)
        .map(char::from)
        .collect();

    SecretString::from(format!("{}{}", KEY_PREFIX, random_part))
}

/// Derive the digest and, given an AES secret, the encrypted header token.
pub fn issue_key(
    api_key: SecretString,
    aes_secret: Option<&SecretString>,
    encoding: DigestEncoding,
) -> Result<IssuedKey, CipherError> {
    let digest = sha512_digest(api_key.expose_secret(), encoding);

    let encrypted_token = aes_secret
        .map(|secret| AesCipher::new(secret).encrypt(api_key.expose_secret()))
        .transpose()?;

    Ok(IssuedKey {
        api_key,
        digest,
        encrypted_token,
    })
}
