//! Test doubles shared by the token service tests

mod signer_tests;

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::domain::entities::token::{AccessToken, Claims, RefreshToken, RefreshTokenRecord};
use crate::domain::entities::user::{Role, UserId};
use crate::domain::value_objects::SecurityContext;
use crate::errors::{DomainError, DomainResult, TokenError};
use crate::repositories::{InMemoryRefreshTokenRepository, RefreshTokenRepository};
use crate::services::cache::VerificationCache;
use crate::services::clock::ManualClock;
use crate::services::token::{JwtTokenSigner, TokenSecret, TokenService, TokenServiceConfig, TokenSigner};

pub(super) const SECRET: &str = "test-secret-with-enough-entropy-for-hs512";

pub(super) fn epoch() -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000, 0).unwrap()
}

pub(super) fn test_config() -> TokenServiceConfig {
    TokenServiceConfig::new("picshare-test", TokenSecret::new(SECRET), Duration::minutes(15))
}

pub(super) fn alice() -> SecurityContext {
    SecurityContext::new(UserId(42), Role::User)
}

/// Verification cache backed by a plain map
#[derive(Default)]
pub(super) struct MapCache {
    entries: Mutex<HashMap<String, SecurityContext>>,
}

impl MapCache {
    pub(super) fn contains(&self, token: &AccessToken) -> bool {
        self.entries.lock().unwrap().contains_key(token.as_str())
    }
}

#[async_trait]
impl VerificationCache for MapCache {
    async fn put(
        &self,
        token: &AccessToken,
        context: SecurityContext,
        _expires_at: DateTime<Utc>,
    ) -> DomainResult<Option<SecurityContext>> {
        Ok(self
            .entries
            .lock()
            .unwrap()
            .insert(token.as_str().to_string(), context))
    }

    async fn get(&self, token: &AccessToken) -> DomainResult<Option<SecurityContext>> {
        Ok(self.entries.lock().unwrap().get(token.as_str()).copied())
    }

    async fn revoke(&self, token: &AccessToken) -> DomainResult<Option<SecurityContext>> {
        Ok(self.entries.lock().unwrap().remove(token.as_str()))
    }
}

/// Cache whose every operation fails
pub(super) struct BrokenCache;

#[async_trait]
impl VerificationCache for BrokenCache {
    async fn put(
        &self,
        _: &AccessToken,
        _: SecurityContext,
        _: DateTime<Utc>,
    ) -> DomainResult<Option<SecurityContext>> {
        Err(DomainError::cache("unavailable"))
    }

    async fn get(&self, _: &AccessToken) -> DomainResult<Option<SecurityContext>> {
        Err(DomainError::cache("unavailable"))
    }

    async fn revoke(&self, _: &AccessToken) -> DomainResult<Option<SecurityContext>> {
        Err(DomainError::cache("unavailable"))
    }
}

/// Wraps the real signer and counts extractions
#[derive(Default)]
pub(super) struct CountingSigner {
    inner: JwtTokenSigner,
    extractions: AtomicUsize,
}

impl CountingSigner {
    pub(super) fn extractions(&self) -> usize {
        self.extractions.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TokenSigner for CountingSigner {
    async fn generate(&self, claims: &Claims, secret: &TokenSecret) -> Result<AccessToken, TokenError> {
        self.inner.generate(claims, secret).await
    }

    async fn extract(&self, token: &AccessToken, secret: &TokenSecret) -> Result<Claims, TokenError> {
        self.extractions.fetch_add(1, Ordering::SeqCst);
        self.inner.extract(token, secret).await
    }
}

#[async_trait]
impl TokenSigner for Arc<CountingSigner> {
    async fn generate(&self, claims: &Claims, secret: &TokenSecret) -> Result<AccessToken, TokenError> {
        self.as_ref().generate(claims, secret).await
    }

    async fn extract(&self, token: &AccessToken, secret: &TokenSecret) -> Result<Claims, TokenError> {
        self.as_ref().extract(token, secret).await
    }
}

/// Signer that cannot sign and reports an unrelated error kind
pub(super) struct FailingSigner;

#[async_trait]
impl TokenSigner for FailingSigner {
    async fn generate(&self, _: &Claims, _: &TokenSecret) -> Result<AccessToken, TokenError> {
        Err(TokenError::MalformedSubject {
            subject: "internal detail".to_string(),
        })
    }

    async fn extract(&self, _: &AccessToken, _: &TokenSecret) -> Result<Claims, TokenError> {
        Err(TokenError::TokenExpired)
    }
}

/// Repository whose writes fail and whose sweeps can be made to fail
#[derive(Default)]
pub(super) struct FailingRepository {
    pub(super) fail_revoke_expired: bool,
    pub(super) fail_delete_expired: bool,
    pub(super) revoke_expired_calls: AtomicUsize,
    pub(super) delete_expired_calls: AtomicUsize,
}

#[async_trait]
impl RefreshTokenRepository for FailingRepository {
    async fn insert(&self, _: UserId, _: Role) -> DomainResult<RefreshTokenRecord> {
        Err(DomainError::storage("connection refused"))
    }

    async fn find(&self, _: &RefreshToken) -> DomainResult<Option<RefreshTokenRecord>> {
        Ok(None)
    }

    async fn revoke(&self, _: &RefreshToken) -> DomainResult<RefreshTokenRecord> {
        Err(DomainError::storage("connection refused"))
    }

    async fn prolong(&self, _: &RefreshToken) -> DomainResult<RefreshToken> {
        Err(DomainError::storage("connection refused"))
    }

    async fn revoke_expired(&self) -> DomainResult<u64> {
        self.revoke_expired_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_revoke_expired {
            Err(DomainError::storage("lock wait timeout"))
        } else {
            Ok(4)
        }
    }

    async fn delete_expired_for(&self, _: Duration) -> DomainResult<u64> {
        self.delete_expired_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_delete_expired {
            Err(DomainError::storage("lock wait timeout"))
        } else {
            Ok(2)
        }
    }
}

pub(super) type MapCacheService = TokenService<InMemoryRefreshTokenRepository, JwtTokenSigner, MapCache>;

/// Service over an in-memory repository with a 30 day refresh lifetime
pub(super) fn service_with_cache() -> (Arc<ManualClock>, MapCacheService) {
    let clock = Arc::new(ManualClock::new(epoch()));
    let repository = Arc::new(InMemoryRefreshTokenRepository::new(
        clock.clone(),
        Duration::days(30),
    ));
    let service = TokenService::new(
        repository,
        JwtTokenSigner::new(),
        Arc::new(MapCache::default()),
        clock.clone(),
        test_config(),
    );
    (clock, service)
}
