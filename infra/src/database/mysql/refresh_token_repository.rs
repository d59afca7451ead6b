//! MySQL implementation of the RefreshTokenRepository trait.
//!
//! Token values are never stored: the primary key is the SHA-256 of the
//! token. Revoke and prolong lock the row with `SELECT ... FOR UPDATE` so
//! concurrent callers serialize on it.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use sha2::{Digest, Sha256};
use sqlx::mysql::MySqlRow;
use sqlx::{MySql, MySqlPool, Row, Transaction};
use tracing::{debug, error};

use ps_core::{
    Clock, DomainError, DomainResult, RefreshToken, RefreshTokenError, RefreshTokenRecord,
    RefreshTokenRepository, Role, TokenError, UserId,
};

use crate::InfrastructureError;

const SELECT_COLUMNS: &str = "SELECT user_id, role, issued_at, expires_at, revoked_at FROM refresh_tokens";

/// MySQL implementation of RefreshTokenRepository
pub struct MySqlRefreshTokenRepository {
    /// Database connection pool
    pool: MySqlPool,
    clock: Arc<dyn Clock>,
    /// Lifetime given to inserted and prolonged tokens
    lifetime: Duration,
}

impl MySqlRefreshTokenRepository {
    /// Create a new MySQL refresh token repository
    ///
    /// # Arguments
    /// * `pool` - MySQL connection pool from SQLx
    /// * `clock` - Rounded time source shared with the token service
    /// * `lifetime` - Refresh token lifetime
    pub fn new(pool: MySqlPool, clock: Arc<dyn Clock>, lifetime: Duration) -> Self {
        Self {
            pool,
            clock,
            lifetime,
        }
    }

    /// Hash a token value using SHA-256
    ///
    /// # Returns
    /// Hexadecimal string representation of the SHA-256 hash
    pub fn hash_token(token: &RefreshToken) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_str().as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Convert a database row back into a record for `token`
    fn row_to_record(
        row: &MySqlRow,
        token: &RefreshToken,
    ) -> Result<RefreshTokenRecord, InfrastructureError> {
        let corrupt = |column: &str, e: sqlx::Error| {
            InfrastructureError::CorruptRecord(format!("Failed to get {}: {}", column, e))
        };

        let role: String = row.try_get("role").map_err(|e| corrupt("role", e))?;
        let role = role
            .parse::<Role>()
            .map_err(|e| InfrastructureError::CorruptRecord(e.to_string()))?;

        Ok(RefreshTokenRecord {
            token: token.clone(),
            user_id: UserId(row.try_get("user_id").map_err(|e| corrupt("user_id", e))?),
            role,
            issued_at: row
                .try_get::<DateTime<Utc>, _>("issued_at")
                .map_err(|e| corrupt("issued_at", e))?,
            expires_at: row
                .try_get::<DateTime<Utc>, _>("expires_at")
                .map_err(|e| corrupt("expires_at", e))?,
            revoked_at: row
                .try_get::<Option<DateTime<Utc>>, _>("revoked_at")
                .map_err(|e| corrupt("revoked_at", e))?,
        })
    }

    /// Load and lock the row for `token` inside `tx`
    async fn lock_record(
        tx: &mut Transaction<'_, MySql>,
        token: &RefreshToken,
    ) -> DomainResult<RefreshTokenRecord> {
        let query = format!("{} WHERE id = ? FOR UPDATE", SELECT_COLUMNS);

        let row = sqlx::query(&query)
            .bind(Self::hash_token(token))
            .fetch_optional(&mut **tx)
            .await
            .map_err(storage_error)?
            .ok_or(RefreshTokenError::InvalidRefreshToken)?;

        Ok(Self::row_to_record(&row, token)?)
    }
}

fn storage_error(e: sqlx::Error) -> DomainError {
    error!(error = %e, "Refresh token query failed");
    InfrastructureError::Database(e).into()
}

#[async_trait]
impl RefreshTokenRepository for MySqlRefreshTokenRepository {
    async fn insert(&self, user_id: UserId, role: Role) -> DomainResult<RefreshTokenRecord> {
        let record = RefreshTokenRecord::issue(user_id, role, self.clock.now(), self.lifetime)?;

        let query = r#"
            INSERT INTO refresh_tokens (
                id, user_id, role, issued_at, expires_at, revoked_at
            ) VALUES (?, ?, ?, ?, ?, NULL)
        "#;

        sqlx::query(query)
            .bind(Self::hash_token(&record.token))
            .bind(record.user_id.0)
            .bind(record.role.as_str())
            .bind(record.issued_at)
            .bind(record.expires_at)
            .execute(&self.pool)
            .await
            .map_err(storage_error)?;

        debug!(user_id = %user_id, "Stored refresh token");
        Ok(record)
    }

    async fn find(&self, token: &RefreshToken) -> DomainResult<Option<RefreshTokenRecord>> {
        let query = format!("{} WHERE id = ? LIMIT 1", SELECT_COLUMNS);

        let row = sqlx::query(&query)
            .bind(Self::hash_token(token))
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_error)?;

        match row {
            Some(row) => Ok(Some(Self::row_to_record(&row, token)?)),
            None => Ok(None),
        }
    }

    async fn revoke(&self, token: &RefreshToken) -> DomainResult<RefreshTokenRecord> {
        let mut tx = self.pool.begin().await.map_err(storage_error)?;

        let mut record = Self::lock_record(&mut tx, token).await?;
        if !record.is_active() {
            return Err(RefreshTokenError::RefreshTokenAlreadyRevoked.into());
        }

        let now = self.clock.now();
        sqlx::query("UPDATE refresh_tokens SET revoked_at = ? WHERE id = ?")
            .bind(now)
            .bind(Self::hash_token(token))
            .execute(&mut *tx)
            .await
            .map_err(storage_error)?;
        tx.commit().await.map_err(storage_error)?;

        record.revoked_at = Some(now);
        Ok(record)
    }

    async fn prolong(&self, token: &RefreshToken) -> DomainResult<RefreshToken> {
        let mut tx = self.pool.begin().await.map_err(storage_error)?;

        let record = Self::lock_record(&mut tx, token).await?;
        if !record.is_active() {
            return Err(RefreshTokenError::RefreshTokenAlreadyRevoked.into());
        }

        let now = self.clock.now();
        if !record.is_expired_at(now) {
            return Err(RefreshTokenError::RefreshTokenStillValid.into());
        }

        let expires_at = now
            .checked_add_signed(self.lifetime)
            .ok_or(TokenError::TokenGenerationFailed)?;

        sqlx::query("UPDATE refresh_tokens SET expires_at = ? WHERE id = ?")
            .bind(expires_at)
            .bind(Self::hash_token(token))
            .execute(&mut *tx)
            .await
            .map_err(storage_error)?;
        tx.commit().await.map_err(storage_error)?;

        Ok(record.token)
    }

    async fn revoke_expired(&self) -> DomainResult<u64> {
        let now = self.clock.now();

        let result = sqlx::query(
            "UPDATE refresh_tokens SET revoked_at = ? WHERE revoked_at IS NULL AND expires_at <= ?",
        )
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(storage_error)?;

        Ok(result.rows_affected())
    }

    async fn delete_expired_for(&self, duration: Duration) -> DomainResult<u64> {
        let Some(cutoff) = self.clock.now().checked_sub_signed(duration) else {
            return Ok(0);
        };

        let result = sqlx::query("DELETE FROM refresh_tokens WHERE expires_at <= ?")
            .bind(cutoff)
            .execute(&self.pool)
            .await
            .map_err(storage_error)?;

        Ok(result.rows_affected())
    }
}
