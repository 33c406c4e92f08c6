//! Application configuration loaded from environment variables.
//!
//! Configuration errors (missing or empty secrets, malformed digests) are
//! caught here at startup and never surface per request.

use std::env;

use secrecy::{ExposeSecret, SecretString};

use crate::auth::MalformedPolicy;
use crate::crypto::{DigestEncoding, sha512_digest};

/// HTTP header carrying the API key (plain or encrypted).
pub const API_KEY_HEADER: &str = "Authorization";

/// Development default values - NEVER use in production.
pub mod defaults {
    pub const DEV_HOST: &str = "127.0.0.1";
    pub const DEV_PORT: u16 = 8080;
    pub const DEV_API_KEY: &str = "dev-api-key-do-not-use-in-production";
    pub const DEV_AES_SECRET: &str = "dev-aes-secret-do-not-use-in-production";
}

/// Runtime environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    /// Parse environment from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Some(Self::Development),
            "production" | "prod" => Some(Self::Production),
            _ => None,
        }
    }

    /// Check if this is a development environment.
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    /// Check if this is a production environment.
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
        }
    }
}

/// Which gate strategy protects the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateMode {
    Plain,
    Encrypted,
}

impl GateMode {
    /// Parse gate mode from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "plain" => Some(Self::Plain),
            "encrypted" => Some(Self::Encrypted),
            _ => None,
        }
    }
}

impl std::fmt::Display for GateMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Plain => write!(f, "plain"),
            Self::Encrypted => write!(f, "encrypted"),
        }
    }
}

/// Settings for `PlainKeyGate`.
#[derive(Debug, Clone)]
pub struct PlainKeySettings {
    /// Expected header value
    pub api_key: SecretString,
}

/// Settings for `EncryptedKeyGate`.
#[derive(Debug, Clone)]
pub struct EncryptedKeySettings {
    /// Shared AES secret the client encrypts with
    pub aes_secret: SecretString,
    /// Expected SHA-512 digest of the decrypted key
    pub api_key_digest: String,
    /// Textual form of `api_key_digest`
    pub digest_encoding: DigestEncoding,
    /// Handling of credentials that cannot be decrypted
    pub malformed_policy: MalformedPolicy,
}

/// Gate strategy and its settings.
#[derive(Debug, Clone)]
pub enum GateSettings {
    Plain(PlainKeySettings),
    Encrypted(EncryptedKeySettings),
}

impl GateSettings {
    pub fn mode(&self) -> GateMode {
        match self {
            Self::Plain(_) => GateMode::Plain,
            Self::Encrypted(_) => GateMode::Encrypted,
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Runtime environment
    pub environment: Environment,
    /// Server host address
    pub host: String,
    /// Server port
    pub port: u16,
    /// Gate protecting the service
    pub gate: GateSettings,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// In development mode (RUST_ENV=development):
    /// - All variables have sensible defaults
    /// - Only RUST_ENV is required
    ///
    /// In production mode (RUST_ENV=production):
    /// - Secrets for the selected gate are required
    /// - Server will NOT start if using development defaults
    ///
    /// Environment variables:
    /// - `RUST_ENV`: Environment (development/production) - REQUIRED
    /// - `KEYGATE_HOST`: Server host (default: 127.0.0.1)
    /// - `KEYGATE_PORT`: Server port (default: 8080)
    /// - `KEYGATE_MODE`: Gate strategy, `plain` or `encrypted` (default: plain)
    /// - `KEYGATE_API_KEY`: Plain API key (plain mode)
    /// - `KEYGATE_AES_SECRET`: AES secret (encrypted mode)
    /// - `KEYGATE_API_KEY_DIGEST`: Expected SHA-512 digest (encrypted mode)
    /// - `KEYGATE_DIGEST_ENCODING`: `hex` or `base64` (default: hex)
    /// - `KEYGATE_MALFORMED_POLICY`: `fault` or `deny` (default: fault)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Parse environment - required
        let env_str = lookup("RUST_ENV").ok_or(ConfigError::MissingEnvVar("RUST_ENV"))?;

        let environment = Environment::parse(&env_str).ok_or(ConfigError::InvalidValue(
            "RUST_ENV must be 'development' or 'production'",
        ))?;

        // Development falls back to defaults, production requires the variable
        let required = |name: &'static str, dev_default: &str| -> Result<String, ConfigError> {
            match lookup(name) {
                Some(value) => Ok(value),
                None if environment.is_development() => Ok(dev_default.to_string()),
                None => Err(ConfigError::MissingEnvVar(name)),
            }
        };

        let host = lookup("KEYGATE_HOST").unwrap_or_else(|| defaults::DEV_HOST.to_string());

        let port = match lookup("KEYGATE_PORT") {
            Some(port) => port
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidValue("KEYGATE_PORT must be a valid port number"))?,
            None => defaults::DEV_PORT,
        };

        let mode = match lookup("KEYGATE_MODE") {
            Some(mode) => GateMode::parse(&mode).ok_or(ConfigError::InvalidValue(
                "KEYGATE_MODE must be 'plain' or 'encrypted'",
            ))?,
            None => GateMode::Plain,
        };

        let gate = match mode {
            GateMode::Plain => GateSettings::Plain(PlainKeySettings {
                api_key: SecretString::from(required("KEYGATE_API_KEY", defaults::DEV_API_KEY)?),
            }),
            GateMode::Encrypted => {
                let digest_encoding = match lookup("KEYGATE_DIGEST_ENCODING") {
                    Some(encoding) => DigestEncoding::parse(&encoding).ok_or(
                        ConfigError::InvalidValue("KEYGATE_DIGEST_ENCODING must be 'hex' or 'base64'"),
                    )?,
                    None => DigestEncoding::default(),
                };

                let malformed_policy = match lookup("KEYGATE_MALFORMED_POLICY") {
                    Some(policy) => MalformedPolicy::parse(&policy).ok_or(
                        ConfigError::InvalidValue("KEYGATE_MALFORMED_POLICY must be 'fault' or 'deny'"),
                    )?,
                    None => MalformedPolicy::default(),
                };

                let aes_secret = required("KEYGATE_AES_SECRET", defaults::DEV_AES_SECRET)?;
                let api_key_digest = required(
                    "KEYGATE_API_KEY_DIGEST",
                    &sha512_digest(defaults::DEV_API_KEY, digest_encoding),
                )?;

                GateSettings::Encrypted(EncryptedKeySettings {
                    aes_secret: SecretString::from(aes_secret),
                    api_key_digest,
                    digest_encoding,
                    malformed_policy,
                })
            }
        };

        let config = Config {
            environment,
            host,
            port,
            gate,
        };

        config.validate()?;

        // Validate production configuration
        if environment.is_production() {
            config.validate_production()?;
        }

        Ok(config)
    }

    /// Validate gate settings regardless of environment.
    fn validate(&self) -> Result<(), ConfigError> {
        match &self.gate {
            GateSettings::Plain(plain) => {
                if plain.api_key.expose_secret().is_empty() {
                    return Err(ConfigError::InvalidValue("KEYGATE_API_KEY must not be empty"));
                }
            }
            GateSettings::Encrypted(encrypted) => {
                if encrypted.aes_secret.expose_secret().is_empty() {
                    return Err(ConfigError::InvalidValue("KEYGATE_AES_SECRET must not be empty"));
                }
                if !encrypted
                    .digest_encoding
                    .is_well_formed(&encrypted.api_key_digest)
                {
                    return Err(ConfigError::InvalidDigest(encrypted.digest_encoding));
                }
            }
        }

        Ok(())
    }

    /// Validate that production configuration does not use development defaults.
    fn validate_production(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        match &self.gate {
            GateSettings::Plain(plain) => {
                if plain.api_key.expose_secret() == defaults::DEV_API_KEY {
                    errors.push(
                        "KEYGATE_API_KEY is using development default. Set a secure API key."
                            .to_string(),
                    );
                }
            }
            GateSettings::Encrypted(encrypted) => {
                if encrypted.aes_secret.expose_secret() == defaults::DEV_AES_SECRET {
                    errors.push(
                        "KEYGATE_AES_SECRET is using development default. Set a secure AES secret."
                            .to_string(),
                    );
                }
                if encrypted.api_key_digest
                    == sha512_digest(defaults::DEV_API_KEY, encrypted.digest_encoding)
                {
                    errors.push(
                        "KEYGATE_API_KEY_DIGEST is the digest of the development API key."
                            .to_string(),
                    );
                }
            }
        }

        if !errors.is_empty() {
            return Err(ConfigError::ProductionValidation(errors));
        }

        Ok(())
    }

    /// Get the server bind address.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Check if running in development mode.
    pub fn is_development(&self) -> bool {
        self.environment.is_development()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(&'static str),

    #[error("KEYGATE_API_KEY_DIGEST is not a SHA-512 digest in {0} encoding")]
    InvalidDigest(DigestEncoding),

    #[error("Production configuration validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    ProductionValidation(Vec<String>),
}
