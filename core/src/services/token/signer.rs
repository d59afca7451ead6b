//! Access token signing and claim extraction

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::config::TokenSecret;
use crate::domain::entities::token::{AccessToken, Claims};
use crate::errors::TokenError;

/// Turns [`Claims`] into a tamper-evident token and back
///
/// `extract` only proves the token was signed with `secret` and is well
/// formed. Expiry, subject and role are checked afterwards by claims
/// validation.
#[async_trait]
pub trait TokenSigner: Send + Sync {
    async fn generate(&self, claims: &Claims, secret: &TokenSecret) -> Result<AccessToken, TokenError>;

    async fn extract(&self, token: &AccessToken, secret: &TokenSecret) -> Result<Claims, TokenError>;
}

/// Wire form of the claims: registered JWT names plus the `role` claim
///
/// No field has a serde default, so a token missing any claim fails to decode.
#[derive(Debug, Serialize, Deserialize)]
struct JwtClaims {
    iss: String,
    sub: String,
    aud: String,
    iat: i64,
    exp: i64,
    role: String,
}

/// HS512 JWT signer
#[derive(Debug, Clone)]
pub struct JwtTokenSigner {
    validation: Validation,
}

impl JwtTokenSigner {
    pub const ALGORITHM: Algorithm = Algorithm::HS512;

    pub fn new() -> Self {
        let mut validation = Validation::new(Self::ALGORITHM);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.required_spec_claims = HashSet::new();

        Self { validation }
    }

    fn encode_claims(claims: &Claims, secret: &TokenSecret) -> Result<String, TokenError> {
        let payload = JwtClaims {
            iss: claims.issuer.clone(),
            sub: claims.subject.clone(),
            aud: claims.audience.clone(),
            iat: claims.issued_at.timestamp(),
            exp: claims.expires_at.timestamp(),
            role: claims.role.clone(),
        };

        encode(
            &Header::new(Self::ALGORITHM),
            &payload,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to sign access token");
            TokenError::TokenGenerationFailed
        })
    }

    fn decode_claims(&self, token: &str, secret: &TokenSecret) -> Result<Claims, TokenError> {
        let data = decode::<JwtClaims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &self.validation,
        )
        .map_err(|e| {
            tracing::debug!(error = %e, "Access token rejected during extraction");
            TokenError::ClaimsExtractionError
        })?;

        let payload = data.claims;
        Ok(Claims {
            issuer: payload.iss,
            subject: payload.sub,
            audience: payload.aud,
            role: payload.role,
            issued_at: from_epoch_seconds(payload.iat)?,
            expires_at: from_epoch_seconds(payload.exp)?,
        })
    }
}

impl Default for JwtTokenSigner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TokenSigner for JwtTokenSigner {
    async fn generate(&self, claims: &Claims, secret: &TokenSecret) -> Result<AccessToken, TokenError> {
        Self::encode_claims(claims, secret).map(AccessToken::new)
    }

    async fn extract(&self, token: &AccessToken, secret: &TokenSecret) -> Result<Claims, TokenError> {
        self.decode_claims(token.as_str(), secret)
    }
}

fn from_epoch_seconds(seconds: i64) -> Result<DateTime<Utc>, TokenError> {
    Utc.timestamp_opt(seconds, 0)
        .single()
        .ok_or(TokenError::ClaimsExtractionError)
}
