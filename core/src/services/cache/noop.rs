//! Cache that never remembers anything; every verification takes the full path.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::VerificationCache;
use crate::domain::entities::token::AccessToken;
use crate::domain::value_objects::SecurityContext;
use crate::errors::DomainResult;

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopVerificationCache;

impl NoopVerificationCache {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl VerificationCache for NoopVerificationCache {
    async fn put(
        &self,
        _token: &AccessToken,
        _context: SecurityContext,
        _expires_at: DateTime<Utc>,
    ) -> DomainResult<Option<SecurityContext>> {
        Ok(None)
    }

    async fn get(&self, _token: &AccessToken) -> DomainResult<Option<SecurityContext>> {
        Ok(None)
    }

    async fn revoke(&self, _token: &AccessToken) -> DomainResult<Option<SecurityContext>> {
        Ok(None)
    }
}
