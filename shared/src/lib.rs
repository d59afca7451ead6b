//! Shared configuration types for the PicShare server
//!
//! This crate provides configuration used across all server modules:
//! - JWT issuance and refresh token lifetimes
//! - Access-token verification cache sizing
//! - Database connection settings
//! - Background reaper scheduling
//! - Environment detection and logging configuration

pub mod config;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, ConfigError, DatabaseConfig, Environment, JwtConfig, LogFormat, LoggingConfig,
    ReaperConfig, VerificationCacheConfig,
};
