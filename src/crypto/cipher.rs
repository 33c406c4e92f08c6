//! Symmetric decryption of credential header values.
//!
//! # Wire format
//! - Standard base64 (padded) of AES-128-ECB ciphertext with PKCS#7 padding
//! - AES key is the first 16 bytes of SHA-1 over the UTF-8 secret
//!
//! This matches tokens produced by the stock JVM `AES` cipher clients.

use aes::Aes128;
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyInit, block_padding::Pkcs7};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use secrecy::{ExposeSecret, SecretBox, SecretString};
use sha1::{Digest, Sha1};

use crate::error::CipherError;

type Aes128EcbDec = ecb::Decryptor<Aes128>;
type Aes128EcbEnc = ecb::Encryptor<Aes128>;

/// AES-128 key length in bytes.
const AES_KEY_LENGTH: usize = 16;

/// Capability to turn a header token into a plaintext credential and back.
pub trait CredentialCipher: Send + Sync {
    /// Decrypt a header token. Any failure is a malformed credential.
    fn decrypt(&self, token: &str) -> Result<SecretString, CipherError>;

    /// Encrypt a plaintext credential into a header token.
    fn encrypt(&self, plaintext: &str) -> Result<String, CipherError>;
}

/// AES cipher keyed from a shared secret string.
pub struct AesCipher {
    key: SecretBox<[u8; AES_KEY_LENGTH]>,
}

impl AesCipher {
    /// Derive the AES key from the configured secret.
    pub fn new(secret: &SecretString) -> Self {
        let digest = Sha1::digest(secret.expose_secret().as_bytes());
        let mut key = [0u8; AES_KEY_LENGTH];
        key.copy_from_slice(&digest[..AES_KEY_LENGTH]);

        Self {
            key: SecretBox::new(Box::new(key)),
        }
    }
}

impl CredentialCipher for AesCipher {
    fn decrypt(&self, token: &str) -> Result<SecretString, CipherError> {
        let ciphertext = STANDARD.decode(token)?;

        // Rejects lengths that are not a multiple of the block size, including empty input
        let plaintext = Aes128EcbDec::new_from_slice(self.key.expose_secret())
            .map_err(|_| CipherError::Decrypt)?
            .decrypt_padded_vec_mut::<Pkcs7>(&ciphertext)
            .map_err(|_| CipherError::Decrypt)?;

        Ok(SecretString::from(String::from_utf8(plaintext)?))
    }

    fn encrypt(&self, plaintext: &str) -> Result<String, CipherError> {
        let ciphertext = Aes128EcbEnc::new_from_slice(self.key.expose_secret())
            .map_err(|_| CipherError::Decrypt)?
            .encrypt_padded_vec_mut::<Pkcs7>(plaintext.as_bytes());

        Ok(STANDARD.encode(ciphertext))
    }
}

impl std::fmt::Debug for AesCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AesCipher([REDACTED])")
    }
}
