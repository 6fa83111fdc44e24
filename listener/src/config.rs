//! Configuration module for environment variable parsing.
//!
//! All configuration is read once at startup and is immutable afterwards.

use std::env;
use std::fmt;

use thiserror::Error;
use tracing::warn;

/// Default listening port.
pub const DEFAULT_PORT: u16 = 8080;

/// Default cap on the size of a webhook body (2 MiB).
pub const DEFAULT_MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// `WEBHOOK_SECRET` is unset or blank.
    #[error("WEBHOOK_SECRET must be set to a non-empty value")]
    MissingSecret,
}

/// Shared HMAC key for webhook signatures.
///
/// The `Debug` output is redacted so the key never ends up in logs.
#[derive(Clone, PartialEq, Eq)]
pub struct WebhookSecret(Vec<u8>);

impl WebhookSecret {
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self(secret.into())
    }

    /// Raw key bytes.
    pub fn expose(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for WebhookSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("WebhookSecret(<redacted>)")
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the web server to listen on
    pub port: u16,

    /// Secret used to verify `X-Hub-Signature-256`
    pub webhook_secret: WebhookSecret,

    /// Largest accepted webhook body in bytes
    pub max_body_bytes: usize,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let webhook_secret = match lookup("WEBHOOK_SECRET") {
            Some(secret) if !secret.trim().is_empty() => WebhookSecret::new(secret),
            _ => return Err(ConfigError::MissingSecret),
        };

        Ok(Config {
            port: parse_or_default(&lookup, "PORT", DEFAULT_PORT),
            webhook_secret,
            max_body_bytes: parse_or_default(&lookup, "MAX_BODY_BYTES", DEFAULT_MAX_BODY_BYTES),
        })
    }
}

/// Parse an optional variable, falling back to `default` when unset or invalid.
fn parse_or_default<F, T>(lookup: &F, name: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    let raw = match lookup(name) {
        Some(v) => v,
        None => return default,
    };

    match raw.trim().parse() {
        Ok(value) => value,
        Err(_) => {
            warn!(env_var = name, value = %raw, "Invalid value, using default");
            default
        }
    }
}
