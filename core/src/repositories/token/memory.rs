//! In-process implementation of RefreshTokenRepository
//!
//! Suitable for tests and single-node deployments; every operation takes the
//! map's write lock, which makes revoke and prolong atomic.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;
use tokio::sync::RwLock;

use super::r#trait::RefreshTokenRepository;
use crate::domain::entities::token::{RefreshToken, RefreshTokenRecord};
use crate::domain::entities::user::{Role, UserId};
use crate::errors::{DomainError, DomainResult, RefreshTokenError, TokenError};
use crate::services::clock::Clock;

pub struct InMemoryRefreshTokenRepository {
    tokens: RwLock<HashMap<RefreshToken, RefreshTokenRecord>>,
    clock: Arc<dyn Clock>,
    lifetime: Duration,
}

impl InMemoryRefreshTokenRepository {
    /// Create an empty repository issuing tokens valid for `lifetime`
    pub fn new(clock: Arc<dyn Clock>, lifetime: Duration) -> Self {
        Self {
            tokens: RwLock::new(HashMap::new()),
            clock,
            lifetime,
        }
    }

    pub async fn len(&self) -> usize {
        self.tokens.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.tokens.read().await.is_empty()
    }
}

#[async_trait]
impl RefreshTokenRepository for InMemoryRefreshTokenRepository {
    async fn insert(&self, user_id: UserId, role: Role) -> DomainResult<RefreshTokenRecord> {
        let record = RefreshTokenRecord::issue(user_id, role, self.clock.now(), self.lifetime)?;

        let mut tokens = self.tokens.write().await;
        if tokens.contains_key(&record.token) {
            return Err(DomainError::storage("Refresh token already exists"));
        }
        tokens.insert(record.token.clone(), record.clone());

        Ok(record)
    }

    async fn find(&self, token: &RefreshToken) -> DomainResult<Option<RefreshTokenRecord>> {
        Ok(self.tokens.read().await.get(token).cloned())
    }

    async fn revoke(&self, token: &RefreshToken) -> DomainResult<RefreshTokenRecord> {
        let mut tokens = self.tokens.write().await;
        let record = tokens
            .get_mut(token)
            .ok_or(RefreshTokenError::InvalidRefreshToken)?;

        if !record.is_active() {
            return Err(RefreshTokenError::RefreshTokenAlreadyRevoked.into());
        }
        record.revoked_at = Some(self.clock.now());

        Ok(record.clone())
    }

    async fn prolong(&self, token: &RefreshToken) -> DomainResult<RefreshToken> {
        let now = self.clock.now();
        let mut tokens = self.tokens.write().await;
        let record = tokens
            .get_mut(token)
            .ok_or(RefreshTokenError::InvalidRefreshToken)?;

        if !record.is_active() {
            return Err(RefreshTokenError::RefreshTokenAlreadyRevoked.into());
        }
        if !record.is_expired_at(now) {
            return Err(RefreshTokenError::RefreshTokenStillValid.into());
        }
        record.expires_at = now
            .checked_add_signed(self.lifetime)
            .ok_or(TokenError::TokenGenerationFailed)?;

        Ok(record.token.clone())
    }

    async fn revoke_expired(&self) -> DomainResult<u64> {
        let now = self.clock.now();
        let mut tokens = self.tokens.write().await;

        let mut revoked = 0;
        for record in tokens.values_mut() {
            if record.is_active() && record.expires_at <= now {
                record.revoked_at = Some(now);
                revoked += 1;
            }
        }

        Ok(revoked)
    }

    async fn delete_expired_for(&self, duration: Duration) -> DomainResult<u64> {
        // A grace reaching before the representable range deletes nothing
        let Some(cutoff) = self.clock.now().checked_sub_signed(duration) else {
            return Ok(0);
        };
        let mut tokens = self.tokens.write().await;

        let before = tokens.len();
        tokens.retain(|_, record| record.expires_at > cutoff);

        Ok((before - tokens.len()) as u64)
    }
}
