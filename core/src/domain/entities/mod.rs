//! Domain entities representing identities and credentials.

pub mod token;
pub mod user;

// Re-export commonly used types
pub use token::{
    AccessToken, Claims, RefreshToken, RefreshTokenRecord, RefreshTokenStatus, TokenPair,
};
pub use user::{ParseRoleError, Role, UserId};
