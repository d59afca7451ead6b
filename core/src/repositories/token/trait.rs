//! Refresh token repository trait defining the storage contract the token service relies on.

use async_trait::async_trait;
use chrono::Duration;

use crate::domain::entities::token::{RefreshToken, RefreshTokenRecord};
use crate::domain::entities::user::{Role, UserId};
use crate::errors::DomainResult;

/// Durable lifecycle of opaque refresh tokens
///
/// A refresh token is Active until revoked, and revocation is permanent.
/// Implementations must make `revoke` atomic: of two concurrent revocations of
/// the same token exactly one succeeds, the other fails with
/// `RefreshTokenAlreadyRevoked`.
///
/// All timestamps come from the implementation's rounded clock.
#[async_trait]
pub trait RefreshTokenRepository: Send + Sync {
    /// Create an Active token for a user
    ///
    /// # Returns
    /// * `Ok(RefreshTokenRecord)` - issued now, expiring after the configured lifetime
    /// * `Err(DomainError::Storage)` - The row could not be written
    ///
    /// # Example
    /// ```no_run
    /// # use ps_core::domain::entities::{Role, UserId};
    /// # use ps_core::repositories::RefreshTokenRepository;
    /// # async fn example(repo: &impl RefreshTokenRepository) -> Result<(), Box<dyn std::error::Error>> {
    /// let record = repo.insert(UserId(42), Role::User).await?;
    /// println!("Refresh token expires at {}", record.expires_at);
    /// # Ok(())
    /// # }
    /// ```
    async fn insert(&self, user_id: UserId, role: Role) -> DomainResult<RefreshTokenRecord>;

    /// Look up a token without changing it
    async fn find(&self, token: &RefreshToken) -> DomainResult<Option<RefreshTokenRecord>>;

    /// Mark an Active token revoked at now
    ///
    /// # Returns
    /// * `Ok(RefreshTokenRecord)` - The updated record, with `revoked_at` set
    /// * `Err(RefreshTokenError::InvalidRefreshToken)` - Unknown token
    /// * `Err(RefreshTokenError::RefreshTokenAlreadyRevoked)` - Revoked before
    async fn revoke(&self, token: &RefreshToken) -> DomainResult<RefreshTokenRecord>;

    /// Extend a lapsed but still Active token by one lifetime from now
    ///
    /// # Returns
    /// * `Ok(RefreshToken)` - The same token id
    /// * `Err(RefreshTokenError::RefreshTokenStillValid)` - Not expired yet
    /// * `Err(RefreshTokenError::RefreshTokenAlreadyRevoked)` - Revoked
    /// * `Err(RefreshTokenError::InvalidRefreshToken)` - Unknown token
    async fn prolong(&self, token: &RefreshToken) -> DomainResult<RefreshToken>;

    /// Revoke every Active token whose `expires_at <= now`
    ///
    /// # Returns
    /// Number of tokens revoked by this call
    async fn revoke_expired(&self) -> DomainResult<u64>;

    /// Delete tokens whose `expires_at <= now - duration`, revoked or not
    ///
    /// # Returns
    /// Number of tokens deleted
    async fn delete_expired_for(&self, duration: Duration) -> DomainResult<u64>;
}
