//! Configuration for the token service and the reaper

use std::fmt;

use chrono::Duration;
use ps_shared::config::{JwtConfig, ReaperConfig};

/// Shared HMAC signing secret
#[derive(Clone, PartialEq, Eq)]
pub struct TokenSecret(String);

impl TokenSecret {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Debug for TokenSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TokenSecret(<redacted>)")
    }
}

/// Configuration for the token service
#[derive(Debug, Clone)]
pub struct TokenServiceConfig {
    /// Issuer claim written into every access token
    pub issuer: String,
    /// Access token signing secret
    pub secret: TokenSecret,
    /// Access token lifetime
    pub access_token_lifetime: Duration,
}

impl TokenServiceConfig {
    pub fn new(issuer: impl Into<String>, secret: TokenSecret, access_token_lifetime: Duration) -> Self {
        Self {
            issuer: issuer.into(),
            secret,
            access_token_lifetime,
        }
    }
}

impl From<&JwtConfig> for TokenServiceConfig {
    fn from(config: &JwtConfig) -> Self {
        Self {
            issuer: config.issuer.clone(),
            secret: TokenSecret::new(config.secret.clone()),
            access_token_lifetime: Duration::seconds(config.access_token_expiry),
        }
    }
}

/// Configuration for the refresh-token reaper
#[derive(Debug, Clone)]
pub struct TokenReaperConfig {
    /// Whether the background loop runs at all
    pub enabled: bool,
    /// Time between sweeps
    pub interval: std::time::Duration,
    /// How long a token must have been expired before it is deleted
    pub deletion_grace: Duration,
}

impl Default for TokenReaperConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval: std::time::Duration::from_secs(86400),
            deletion_grace: Duration::days(30),
        }
    }
}

impl TokenReaperConfig {
    pub fn from_config(reaper: &ReaperConfig, jwt: &JwtConfig) -> Self {
        Self {
            enabled: reaper.enabled,
            interval: std::time::Duration::from_secs(reaper.interval_seconds),
            deletion_grace: Duration::seconds(jwt.refresh_token_deletion_grace),
        }
    }
}
