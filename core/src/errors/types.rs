//! Error kinds for token issuance, verification and refresh-token storage
//!
//! Messages stay generic on purpose: lower-level signing or decoding failures
//! never leak through these variants.

use std::fmt;

use thiserror::Error;

/// Access-token errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token generation failed")]
    TokenGenerationFailed,

    #[error("Failed to extract token claims")]
    ClaimsExtractionError,

    #[error("Malformed subject claim: {subject}")]
    MalformedSubject { subject: String },

    #[error("Unsupported role claim: {role}")]
    UnsupportedRoleClaim { role: String },

    #[error("Token expired")]
    TokenExpired,
}

impl TokenError {
    pub fn error_code(&self) -> &'static str {
        match self {
            TokenError::TokenGenerationFailed => "TOKEN_GENERATION_FAILED",
            TokenError::ClaimsExtractionError => "CLAIMS_EXTRACTION_ERROR",
            TokenError::MalformedSubject { .. } => "MALFORMED_SUBJECT",
            TokenError::UnsupportedRoleClaim { .. } => "UNSUPPORTED_ROLE_CLAIM",
            TokenError::TokenExpired => "TOKEN_EXPIRED",
        }
    }
}

/// Refresh-token store errors
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshTokenError {
    #[error("Invalid refresh token")]
    InvalidRefreshToken,

    #[error("Refresh token already revoked")]
    RefreshTokenAlreadyRevoked,

    #[error("Refresh token is still valid")]
    RefreshTokenStillValid,
}

impl RefreshTokenError {
    pub fn error_code(&self) -> &'static str {
        match self {
            RefreshTokenError::InvalidRefreshToken => "INVALID_REFRESH_TOKEN",
            RefreshTokenError::RefreshTokenAlreadyRevoked => "REFRESH_TOKEN_ALREADY_REVOKED",
            RefreshTokenError::RefreshTokenStillValid => "REFRESH_TOKEN_STILL_VALID",
        }
    }
}

/// Every rule a decoded token broke, in the order the rules ran
///
/// Never empty: construction goes through [`ClaimViolations::new`], which
/// refuses an empty list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimViolations(Vec<TokenError>);

impl ClaimViolations {
    pub fn new(errors: Vec<TokenError>) -> Option<Self> {
        if errors.is_empty() {
            None
        } else {
            Some(Self(errors))
        }
    }

    pub fn single(error: TokenError) -> Self {
        Self(vec![error])
    }

    pub fn errors(&self) -> &[TokenError] {
        &self.0
    }

    pub fn contains(&self, error: &TokenError) -> bool {
        self.0.contains(error)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn merge(mut self, other: ClaimViolations) -> Self {
        self.0.extend(other.0);
        self
    }
}

impl IntoIterator for ClaimViolations {
    type Item = TokenError;
    type IntoIter = std::vec::IntoIter<TokenError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl std::error::Error for ClaimViolations {}

impl fmt::Display for ClaimViolations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid claims: ")?;
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}", error)?;
        }
        Ok(())
    }
}
