//! Access-token verification cache abstraction
//!
//! Maps a literal access-token string to the [`SecurityContext`] it was last
//! verified as. Entries are advisory: a miss only costs a signature check, so
//! implementations may drop entries at any time. An entry must never be
//! served after the expiry of the token it was stored for.

mod noop;

pub use noop::NoopVerificationCache;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::entities::token::AccessToken;
use crate::domain::value_objects::SecurityContext;
use crate::errors::DomainResult;

#[async_trait]
pub trait VerificationCache: Send + Sync {
    /// Store a verified context until `expires_at`, returning the value it replaced
    async fn put(
        &self,
        token: &AccessToken,
        context: SecurityContext,
        expires_at: DateTime<Utc>,
    ) -> DomainResult<Option<SecurityContext>>;

    /// Look up a previously verified context
    async fn get(&self, token: &AccessToken) -> DomainResult<Option<SecurityContext>>;

    /// Drop an entry, returning the value it held
    async fn revoke(&self, token: &AccessToken) -> DomainResult<Option<SecurityContext>>;
}
