//! Main token service implementation

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::config::TokenServiceConfig;
use super::signer::TokenSigner;
use super::validation::validate_claims;
use crate::domain::entities::token::{AccessToken, Claims, RefreshToken, TokenPair};
use crate::domain::value_objects::SecurityContext;
use crate::errors::{DomainError, DomainResult, TokenError};
use crate::repositories::RefreshTokenRepository;
use crate::services::cache::VerificationCache;
use crate::services::clock::Clock;

/// Issues, verifies, rotates and revokes tokens
///
/// A session lives as long as its refresh token is Active; revocation is
/// terminal. Access tokens carry no server-side state and stay valid until
/// their embedded expiry.
pub struct TokenService<R, S, C>
where
    R: RefreshTokenRepository,
    S: TokenSigner,
    C: VerificationCache,
{
    repository: Arc<R>,
    signer: S,
    cache: Arc<C>,
    clock: Arc<dyn Clock>,
    config: TokenServiceConfig,
}

impl<R, S, C> TokenService<R, S, C>
where
    R: RefreshTokenRepository,
    S: TokenSigner,
    C: VerificationCache,
{
    /// Creates a new token service instance
    ///
    /// # Arguments
    ///
    /// * `repository` - Refresh token storage
    /// * `signer` - Access token signer
    /// * `cache` - Verification cache, possibly a no-op one
    /// * `clock` - Rounded time source shared with the repository
    /// * `config` - Issuer, secret and access token lifetime
    pub fn new(
        repository: Arc<R>,
        signer: S,
        cache: Arc<C>,
        clock: Arc<dyn Clock>,
        config: TokenServiceConfig,
    ) -> Self {
        Self {
            repository,
            signer,
            cache,
            clock,
            config,
        }
    }

    pub fn repository(&self) -> &Arc<R> {
        &self.repository
    }

    pub fn cache(&self) -> &Arc<C> {
        &self.cache
    }

    pub fn config(&self) -> &TokenServiceConfig {
        &self.config
    }

    /// Issues a new refresh/access token pair for an authenticated identity
    ///
    /// The refresh token insert and the cache prime run concurrently. Only
    /// the insert can fail the call; a failed prime is logged and ignored.
    ///
    /// # Returns
    ///
    /// * `Ok(TokenPair)` - The issued pair
    /// * `Err(DomainError)` - Signing or refresh token storage failed
    pub async fn generate(&self, context: SecurityContext) -> DomainResult<TokenPair> {
        let issued_at = self.clock.now();
        let claims = Claims::for_context(
            self.config.issuer.as_str(),
            &context,
            issued_at,
            self.config.access_token_lifetime,
        )?;

        let access_token = self
            .signer
            .generate(&claims, &self.config.secret)
            .await
            .map_err(|_| TokenError::TokenGenerationFailed)?;

        let (inserted, primed) = tokio::join!(
            self.repository.insert(context.user_id, context.role),
            self.cache.put(&access_token, context, claims.expires_at),
        );

        if let Err(e) = primed {
            warn!(user_id = %context.user_id, error = %e, "Failed to prime verification cache");
        }
        let record = inserted?;

        info!(user_id = %context.user_id, role = %context.role, "Issued token pair");

        Ok(TokenPair {
            refresh_token: record.token,
            access_token,
            access_expires_at: claims.expires_at,
            refresh_expires_at: record.expires_at,
        })
    }

    /// Verifies an access token and returns the identity it carries
    ///
    /// A cache hit returns without any cryptographic work. On a miss the
    /// token is extracted, every claim rule is applied, and a successful
    /// result is written back to the cache.
    ///
    /// # Returns
    ///
    /// * `Ok(SecurityContext)` - The authenticated identity
    /// * `Err(DomainError::Token)` - The token could not be extracted
    /// * `Err(DomainError::InvalidClaims)` - One or more claim rules failed
    pub async fn verify(&self, token: &AccessToken) -> DomainResult<SecurityContext> {
        match self.cache.get(token).await {
            Ok(Some(context)) => {
                debug!(user_id = %context.user_id, "Verification cache hit");
                return Ok(context);
            }
            Ok(None) => debug!("Verification cache miss"),
            Err(e) => warn!(error = %e, "Verification cache lookup failed, verifying token"),
        }

        let claims = self
            .signer
            .extract(token, &self.config.secret)
            .await
            .map_err(|_| TokenError::ClaimsExtractionError)?;

        let context = validate_claims(&claims, self.clock.now()).into_result()?;

        if let Err(e) = self.cache.put(token, context, claims.expires_at).await {
            warn!(user_id = %context.user_id, error = %e, "Failed to cache verified token");
        }

        Ok(context)
    }

    /// Rotates a refresh token into a new pair
    ///
    /// The presented token is revoked first, then its expiry is checked.
    /// A token that had already lapsed stays revoked and yields no pair.
    ///
    /// # Returns
    ///
    /// * `Ok(TokenPair)` - A fresh pair for the same identity
    /// * `Err(DomainError::RefreshToken)` - Unknown or already revoked token
    /// * `Err(DomainError::Token(TokenExpired))` - The token had expired
    pub async fn refresh(&self, refresh_token: &RefreshToken) -> DomainResult<TokenPair> {
        let record = self.repository.revoke(refresh_token).await?;

        let revoked_at = record.revoked_at.unwrap_or_else(|| self.clock.now());
        if record.is_expired_at(revoked_at) {
            info!(user_id = %record.user_id, "Rejected refresh of an expired token");
            return Err(DomainError::Token(TokenError::TokenExpired));
        }

        self.generate(record.security_context()).await
    }

    /// Revokes a refresh token without issuing a replacement
    ///
    /// # Returns
    ///
    /// * `Ok(RefreshToken)` - The revoked token
    /// * `Err(DomainError::RefreshToken)` - Unknown or already revoked token
    pub async fn revoke(&self, refresh_token: &RefreshToken) -> DomainResult<RefreshToken> {
        let record = self.repository.revoke(refresh_token).await?;
        info!(user_id = %record.user_id, "Revoked refresh token");
        Ok(record.token)
    }
}
