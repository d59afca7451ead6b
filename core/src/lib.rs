//! # PicShare Core
//!
//! Authentication core for the PicShare backend: access/refresh token
//! issuance, verification with an advisory in-process cache, refresh-token
//! rotation and revocation, and background reaping of stale refresh tokens.
//! Storage, caching and time are injected through traits.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::entities::{
    AccessToken, Claims, RefreshToken, RefreshTokenRecord, RefreshTokenStatus, Role, TokenPair,
    UserId,
};
pub use domain::value_objects::{SecurityContext, Validated};
pub use errors::{
    ClaimViolations, DomainError, DomainResult, ErrorCategory, RefreshTokenError, TokenError,
};
pub use repositories::{InMemoryRefreshTokenRepository, RefreshTokenRepository};
pub use services::{
    Clock, JwtTokenSigner, ManualClock, NoopVerificationCache, ReapResult, SystemClock,
    TokenReaper, TokenReaperConfig, TokenSecret, TokenService, TokenServiceConfig, TokenSigner,
    VerificationCache,
};
