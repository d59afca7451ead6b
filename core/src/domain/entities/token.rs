//! Token entities for JWT-based authentication with refresh-token rotation.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::{Role, UserId};
use crate::domain::value_objects::SecurityContext;
use crate::errors::TokenError;

/// Payload signed into every access token
///
/// Timestamps are whole seconds; the token service builds them from the
/// rounded clock and the signer encodes them as epoch seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub issuer: String,

    /// Decimal user id
    pub subject: String,

    pub audience: String,

    /// Lowercase role name
    pub role: String,

    pub issued_at: DateTime<Utc>,

    pub expires_at: DateTime<Utc>,
}

impl Claims {
    /// Builds the claims for a freshly issued access token
    ///
    /// # Arguments
    ///
    /// * `issuer` - Configured issuer
    /// * `context` - Identity the token is issued to
    /// * `issued_at` - Rounded issuance instant
    /// * `lifetime` - Access token lifetime
    ///
    /// Fails with `TokenGenerationFailed` when the expiry is not representable.
    pub fn for_context(
        issuer: impl Into<String>,
        context: &SecurityContext,
        issued_at: DateTime<Utc>,
        lifetime: Duration,
    ) -> Result<Self, TokenError> {
        let expires_at = issued_at
            .checked_add_signed(lifetime)
            .ok_or(TokenError::TokenGenerationFailed)?;
        let subject = context.user_id.to_string();
        Ok(Self {
            issuer: issuer.into(),
            audience: subject.clone(),
            subject,
            role: context.role.as_str().to_string(),
            issued_at,
            expires_at,
        })
    }
}

/// Signed, self-contained access token
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

impl From<String> for AccessToken {
    fn from(token: String) -> Self {
        Self(token)
    }
}

/// Opaque refresh token: a key into refresh-token storage
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RefreshToken(String);

impl RefreshToken {
    /// Generates a new unguessable token id
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Debug for RefreshToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RefreshToken(<redacted>)")
    }
}

impl From<String> for RefreshToken {
    fn from(token: String) -> Self {
        Self(token)
    }
}

/// Lifecycle status of a stored refresh token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RefreshTokenStatus {
    Active,
    Revoked(DateTime<Utc>),
}

/// Persisted refresh token row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshTokenRecord {
    pub token: RefreshToken,

    pub user_id: UserId,

    /// Role at issuance time
    pub role: Role,

    pub issued_at: DateTime<Utc>,

    pub expires_at: DateTime<Utc>,

    pub revoked_at: Option<DateTime<Utc>>,
}

impl RefreshTokenRecord {
    /// Creates an active record issued at `now`
    pub fn issue(
        user_id: UserId,
        role: Role,
        now: DateTime<Utc>,
        lifetime: Duration,
    ) -> Result<Self, TokenError> {
        let expires_at = now
            .checked_add_signed(lifetime)
            .ok_or(TokenError::TokenGenerationFailed)?;

        Ok(Self {
            token: RefreshToken::generate(),
            user_id,
            role,
            issued_at: now,
            expires_at,
            revoked_at: None,
        })
    }

    pub fn status(&self) -> RefreshTokenStatus {
        match self.revoked_at {
            None => RefreshTokenStatus::Active,
            Some(at) => RefreshTokenStatus::Revoked(at),
        }
    }

    pub fn is_active(&self) -> bool {
        self.revoked_at.is_none()
    }

    /// A token expiring exactly at `now` is still valid
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }

    pub fn security_context(&self) -> SecurityContext {
        SecurityContext::new(self.user_id, self.role)
    }
}

/// Token pair handed back on login and refresh
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub refresh_token: RefreshToken,

    pub access_token: AccessToken,

    pub access_expires_at: DateTime<Utc>,

    pub refresh_expires_at: DateTime<Utc>,
}
