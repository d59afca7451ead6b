//! Background reaping of refresh tokens
//!
//! Each cycle runs two independent sweeps against the repository:
//! revoke every Active token past its expiry, then delete tokens that have
//! been expired for longer than the configured grace period. Both are
//! idempotent bulk statements, so overlapping cycles are harmless.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};

use super::config::TokenReaperConfig;
use crate::repositories::RefreshTokenRepository;

/// Periodic refresh-token sweeps
pub struct TokenReaper<R: RefreshTokenRepository + 'static> {
    repository: Arc<R>,
    config: TokenReaperConfig,
}

impl<R: RefreshTokenRepository> TokenReaper<R> {
    pub fn new(repository: Arc<R>, config: TokenReaperConfig) -> Self {
        Self { repository, config }
    }

    /// Run a single reaping cycle
    ///
    /// A failing sweep is recorded in the result and does not stop the other.
    pub async fn run_once(&self) -> ReapResult {
        let mut result = ReapResult::default();

        match self.repository.revoke_expired().await {
            Ok(count) => {
                result.revoked = count;
                info!(count, "Revoked expired refresh tokens");
            }
            Err(e) => {
                error!(error = %e, "Failed to revoke expired refresh tokens");
                result.errors.push(format!("Revoke expired error: {}", e));
            }
        }

        match self
            .repository
            .delete_expired_for(self.config.deletion_grace)
            .await
        {
            Ok(count) => {
                result.deleted = count;
                info!(count, "Deleted long-expired refresh tokens");
            }
            Err(e) => {
                error!(error = %e, "Failed to delete long-expired refresh tokens");
                result.errors.push(format!("Delete expired error: {}", e));
            }
        }

        result
    }

    /// Start the sweeps as a background task
    ///
    /// The first cycle runs immediately. Returns `None` when disabled.
    pub fn spawn(self: Arc<Self>) -> Option<JoinHandle<()>> {
        if !self.config.enabled {
            warn!("Refresh token reaper is disabled");
            return None;
        }

        Some(tokio::spawn(async move {
            info!(
                interval_secs = self.config.interval.as_secs(),
                "Refresh token reaper started"
            );

            let mut ticker = tokio::time::interval(self.config.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;

                let result = self.run_once().await;
                if !result.is_success() {
                    warn!(errors = ?result.errors, "Reaper cycle completed with errors");
                }
            }
        }))
    }
}

/// Outcome of one reaping cycle
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReapResult {
    /// Active tokens newly marked revoked because they expired
    pub revoked: u64,
    /// Tokens permanently deleted
    pub deleted: u64,
    /// Sweeps that failed
    pub errors: Vec<String>,
}

impl ReapResult {
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}
