//! Byte-bounded LRU verification cache built on `moka`

use std::mem::size_of;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use moka::future::Cache;
use moka::Expiry;
use tracing::{debug, info};

use ps_core::{
    AccessToken, Clock, DomainResult, NoopVerificationCache, SecurityContext, SystemClock,
    VerificationCache,
};
use ps_shared::VerificationCacheConfig;

use crate::InfrastructureError;

/// A verified identity and the expiry of the token it was verified from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CachedContext {
    context: SecurityContext,
    expires_at: DateTime<Utc>,
}

/// Approximate in-memory cost of one entry in bytes
///
/// Counts the token text and the cached value. Saturates at `u32::MAX`.
pub fn entry_weight(token: &str) -> u32 {
    u32::try_from(token.len() + size_of::<CachedContext>()).unwrap_or(u32::MAX)
}

/// Per-entry lifetime: the configured time-to-live, cut short by token expiry
struct TokenExpiry {
    time_to_live: Duration,
    clock: Arc<dyn Clock>,
}

impl TokenExpiry {
    fn remaining(&self, entry: &CachedContext) -> Duration {
        // The token is accepted through the whole second named by expires_at
        let valid_until = entry
            .expires_at
            .checked_add_signed(chrono::Duration::seconds(1))
            .unwrap_or(entry.expires_at);

        (valid_until - self.clock.now())
            .to_std()
            .map_or(Duration::ZERO, |left| left.min(self.time_to_live))
    }
}

impl Expiry<String, CachedContext> for TokenExpiry {
    fn expire_after_create(
        &self,
        _token: &String,
        entry: &CachedContext,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(self.remaining(entry))
    }

    fn expire_after_update(
        &self,
        _token: &String,
        entry: &CachedContext,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(self.remaining(entry))
    }
}

/// Verification cache with least-recently-used eviction
///
/// An entry lives for the configured time-to-live or until its token
/// expires, whichever comes first. Cloning is cheap and clones share the
/// same entries.
#[derive(Clone)]
pub struct LruVerificationCache {
    entries: Cache<String, CachedContext>,
    clock: Arc<dyn Clock>,
    max_weight_bytes: u64,
}

impl LruVerificationCache {
    /// Create a cache on the system clock
    pub fn new(max_weight_bytes: u64, time_to_live: Duration) -> Self {
        Self::with_clock(max_weight_bytes, time_to_live, Arc::new(SystemClock))
    }

    /// Create a cache holding at most `max_weight_bytes` of entries
    ///
    /// # Arguments
    /// * `max_weight_bytes` - Budget in bytes as computed by [`entry_weight`]
    /// * `time_to_live` - Longest lifetime of an entry from insertion
    /// * `clock` - Time source token expiry is judged against; share it with
    ///   the token service
    pub fn with_clock(max_weight_bytes: u64, time_to_live: Duration, clock: Arc<dyn Clock>) -> Self {
        let entries = Cache::builder()
            .weigher(|token: &String, _entry: &CachedContext| entry_weight(token))
            .max_capacity(max_weight_bytes)
            .expire_after(TokenExpiry {
                time_to_live,
                clock: clock.clone(),
            })
            .build();

        Self {
            entries,
            clock,
            max_weight_bytes,
        }
    }

    /// Create a cache from configuration
    ///
    /// `access_token_lifetime` caps the entry lifetime and must be positive.
    pub fn from_config(
        config: &VerificationCacheConfig,
        access_token_lifetime: chrono::Duration,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, InfrastructureError> {
        let time_to_live = access_token_lifetime
            .to_std()
            .ok()
            .filter(|ttl| !ttl.is_zero())
            .ok_or_else(|| {
                InfrastructureError::Config(format!(
                    "Access token lifetime must be positive, got {}s",
                    access_token_lifetime.num_seconds()
                ))
            })?;

        info!(
            max_weight_bytes = config.max_weight_bytes,
            ttl_secs = time_to_live.as_secs(),
            "Creating verification cache"
        );

        Ok(Self::with_clock(config.max_weight_bytes, time_to_live, clock))
    }

    pub fn max_weight_bytes(&self) -> u64 {
        self.max_weight_bytes
    }

    /// Approximate number of live entries
    pub fn entry_count(&self) -> u64 {
        self.entries.entry_count()
    }

    /// Approximate total weight of live entries
    pub fn weighted_size(&self) -> u64 {
        self.entries.weighted_size()
    }

    /// Apply pending evictions and expirations now
    pub async fn run_pending_tasks(&self) {
        self.entries.run_pending_tasks().await;
    }

    fn is_live(&self, entry: &CachedContext) -> bool {
        entry.expires_at >= self.clock.now()
    }
}

#[async_trait]
impl VerificationCache for LruVerificationCache {
    async fn put(
        &self,
        token: &AccessToken,
        context: SecurityContext,
        expires_at: DateTime<Utc>,
    ) -> DomainResult<Option<SecurityContext>> {
        let entry = CachedContext {
            context,
            expires_at,
        };

        let mut replaced = None;
        self.entries
            .entry(token.as_str().to_string())
            .and_upsert_with(|existing| {
                replaced = existing.map(|existing| existing.into_value());
                std::future::ready(entry)
            })
            .await;

        let previous = replaced.filter(|old| self.is_live(old)).map(|old| old.context);
        debug!(user_id = %context.user_id, replaced = previous.is_some(), "Cached verified token");
        Ok(previous)
    }

    async fn get(&self, token: &AccessToken) -> DomainResult<Option<SecurityContext>> {
        match self.entries.get(token.as_str()).await {
            Some(entry) if self.is_live(&entry) => Ok(Some(entry.context)),
            Some(_) => {
                self.entries.invalidate(token.as_str()).await;
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn revoke(&self, token: &AccessToken) -> DomainResult<Option<SecurityContext>> {
        let removed = self.entries.remove(token.as_str()).await;
        Ok(removed.filter(|old| self.is_live(old)).map(|old| old.context))
    }
}

/// The verification cache selected by configuration
#[derive(Clone)]
pub enum ConfiguredVerificationCache {
    Lru(LruVerificationCache),
    Disabled(NoopVerificationCache),
}

impl ConfiguredVerificationCache {
    /// Build the LRU cache, or a no-op one when caching is disabled
    pub fn from_config(
        config: &VerificationCacheConfig,
        access_token_lifetime: chrono::Duration,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, InfrastructureError> {
        if !config.enabled {
            info!("Verification cache disabled");
            return Ok(Self::Disabled(NoopVerificationCache::new()));
        }

        LruVerificationCache::from_config(config, access_token_lifetime, clock).map(Self::Lru)
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, Self::Lru(_))
    }
}

#[async_trait]
impl VerificationCache for ConfiguredVerificationCache {
    async fn put(
        &self,
        token: &AccessToken,
        context: SecurityContext,
        expires_at: DateTime<Utc>,
    ) -> DomainResult<Option<SecurityContext>> {
        match self {
            Self::Lru(cache) => cache.put(token, context, expires_at).await,
            Self::Disabled(cache) => cache.put(token, context, expires_at).await,
        }
    }

    async fn get(&self, token: &AccessToken) -> DomainResult<Option<SecurityContext>> {
        match self {
            Self::Lru(cache) => cache.get(token).await,
            Self::Disabled(cache) => cache.get(token).await,
        }
    }

    async fn revoke(&self, token: &AccessToken) -> DomainResult<Option<SecurityContext>> {
        match self {
            Self::Lru(cache) => cache.revoke(token).await,
            Self::Disabled(cache) => cache.revoke(token).await,
        }
    }
}
