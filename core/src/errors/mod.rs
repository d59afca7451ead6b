//! Domain-specific error types and error handling.

mod types;

pub use types::{ClaimViolations, RefreshTokenError, TokenError};

use thiserror::Error;

/// Outward status category an error maps to at the service boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The presented credential does not authenticate the caller
    Unauthorized,
    /// The presented refresh token is unknown or stale
    BadRequest,
    /// Storage or other infrastructure failure
    Internal,
}

/// Errors crossing the token service boundary
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    RefreshToken(#[from] RefreshTokenError),

    #[error(transparent)]
    InvalidClaims(#[from] ClaimViolations),

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Cache error: {message}")]
    Cache { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn storage(message: impl Into<String>) -> Self {
        DomainError::Storage {
            message: message.into(),
        }
    }

    pub fn cache(message: impl Into<String>) -> Self {
        DomainError::Cache {
            message: message.into(),
        }
    }

    /// Stable code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            DomainError::Token(e) => e.error_code(),
            DomainError::RefreshToken(e) => e.error_code(),
            DomainError::InvalidClaims(_) => "INVALID_CLAIMS",
            DomainError::Storage { .. } => "STORAGE_ERROR",
            DomainError::Cache { .. } => "CACHE_ERROR",
            DomainError::Internal { .. } => "INTERNAL_ERROR",
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            DomainError::Token(_) | DomainError::InvalidClaims(_) => ErrorCategory::Unauthorized,
            DomainError::RefreshToken(_) => ErrorCategory::BadRequest,
            DomainError::Storage { .. } | DomainError::Cache { .. } | DomainError::Internal { .. } => {
                ErrorCategory::Internal
            }
        }
    }

    /// Token-level causes carried by this error, in order
    ///
    /// Empty for store and infrastructure errors.
    pub fn causes(&self) -> Vec<TokenError> {
        match self {
            DomainError::Token(e) => vec![e.clone()],
            DomainError::InvalidClaims(violations) => violations.errors().to_vec(),
            _ => Vec::new(),
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
