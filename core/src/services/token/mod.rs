//! Token service module for JWT management
//!
//! This module handles all token-related operations including:
//! - HMAC-SHA512 access token signing and claim extraction
//! - Accumulating validation of decoded claims
//! - Refresh token issuance, rotation and revocation
//! - Background reaping of expired and long-revoked refresh tokens

mod config;
mod reaper;
mod service;
mod signer;
mod validation;

#[cfg(test)]
mod tests;

pub use config::{TokenReaperConfig, TokenSecret, TokenServiceConfig};
pub use reaper::{ReapResult, TokenReaper};
pub use service::TokenService;
pub use signer::{JwtTokenSigner, TokenSigner};
pub use validation::validate_claims;
