//! Standalone refresh token reaper
//!
//! Connects to MySQL, applies migrations and runs the revoke/delete sweeps
//! on the configured interval until interrupted.

use std::sync::Arc;

use anyhow::{bail, Context};
use tracing::{info, warn};

use ps_core::{SystemClock, TokenReaper, TokenReaperConfig};
use ps_infra::database::{DatabasePool, MySqlRefreshTokenRepository};
use ps_infra::logging::init_tracing;
use ps_shared::{AppConfig, Environment};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::from_filename(Environment::from_env().env_file()).ok();
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env().context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    init_tracing(&config.logging)?;
    info!(environment = %config.environment, "Starting refresh token reaper");

    if config.jwt.is_using_default_secret() {
        warn!("JWT secret is the development default");
    }

    let reaper_config = TokenReaperConfig::from_config(&config.reaper, &config.jwt);
    if !reaper_config.enabled {
        bail!("Reaper is disabled by configuration, nothing to do");
    }

    let pool = DatabasePool::new(config.database.clone()).await?;
    pool.run_migrations().await?;

    let repository = Arc::new(MySqlRefreshTokenRepository::new(
        pool.get_pool().clone(),
        Arc::new(SystemClock),
        chrono::Duration::seconds(config.jwt.refresh_token_expiry),
    ));
    let reaper = Arc::new(TokenReaper::new(repository, reaper_config));

    let Some(handle) = reaper.spawn() else {
        bail!("Reaper task was not started");
    };

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for shutdown signal")?;

    info!("Shutdown signal received, stopping reaper");
    handle.abort();
    pool.close().await;

    Ok(())
}
