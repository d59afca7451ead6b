//! # Infrastructure Layer
//!
//! Concrete adapters behind the PicShare authentication core:
//!
//! - **Database**: MySQL refresh token storage using SQLx
//! - **Cache**: In-process, byte-bounded access-token verification cache
//! - **Logging**: `tracing` subscriber setup driven by [`LoggingConfig`]
//!
//! ## Features
//!
//! - `mysql`: Enable MySQL database support (default)
//!
//! [`LoggingConfig`]: ps_shared::LoggingConfig

use ps_core::DomainError;

/// Database module - MySQL implementations using SQLx
#[cfg(feature = "mysql")]
pub mod database;

/// Cache module - in-process verification cache
pub mod cache;

/// Logging module - tracing subscriber initialisation
pub mod logging;

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection or query error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Stored data that cannot be mapped back into the domain
    #[error("Corrupt record: {0}")]
    CorruptRecord(String),

    /// General infrastructure error
    #[error("Infrastructure error: {0}")]
    General(String),
}

impl From<InfrastructureError> for DomainError {
    fn from(error: InfrastructureError) -> Self {
        match error {
            InfrastructureError::Config(message) | InfrastructureError::General(message) => {
                DomainError::Internal { message }
            }
            other => DomainError::storage(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_errors_map_to_storage() {
        let error: DomainError = InfrastructureError::Database(sqlx::Error::PoolTimedOut).into();
        assert_eq!(error.error_code(), "STORAGE_ERROR");

        let error: DomainError = InfrastructureError::CorruptRecord("role".to_string()).into();
        assert_eq!(error.error_code(), "STORAGE_ERROR");
    }

    #[test]
    fn test_config_errors_map_to_internal() {
        let error: DomainError = InfrastructureError::Config("bad url".to_string()).into();
        assert_eq!(
            error,
            DomainError::Internal {
                message: "bad url".to_string()
            }
        );
    }
}
