//! Outgoing side of the gates: the header a client attaches to its requests.

use actix_web::http::header::{AUTHORIZATION, HeaderName, HeaderValue, InvalidHeaderValue};
use secrecy::{ExposeSecret, SecretString};

use crate::crypto::CredentialCipher;
use crate::error::CipherError;

/// Credential header a client sends to a gated service.
pub struct ClientCredential {
    value: SecretString,
}

#[derive(Debug, thiserror::Error)]
pub enum ClientCredentialError {
    #[error(transparent)]
    Cipher(#[from] CipherError),

    #[error("API key cannot be sent as a header value: {0}")]
    InvalidHeader(#[from] InvalidHeaderValue),
}

impl ClientCredential {
    /// Credential for a `PlainKeyGate`: the key itself.
    pub fn plain(api_key: &SecretString) -> Self {
        Self {
            value: api_key.clone(),
        }
    }

    /// Credential for an `EncryptedKeyGate`: the key encrypted with the shared cipher.
    pub fn encrypted(
        cipher: &dyn CredentialCipher,
        api_key: &SecretString,
    ) -> Result<Self, CipherError> {
        let token = cipher.encrypt(api_key.expose_secret())?;
        Ok(Self {
            value: SecretString::from(token),
        })
    }

    /// Header pair ready to insert into a request.
    pub fn header(&self) -> Result<(HeaderName, HeaderValue), ClientCredentialError> {
        let mut value = HeaderValue::from_str(self.value.expose_secret())?;
        value.set_sensitive(true);
        Ok((AUTHORIZATION, value))
    }

    /// Raw header value. Exposes the secret.
    pub fn expose_value(&self) -> &str {
        self.value.expose_secret()
    }
}

impl std::fmt::Debug for ClientCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ClientCredential([REDACTED])")
    }
}
