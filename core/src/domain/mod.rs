//! Domain layer containing authentication entities and value objects.

pub mod entities;
pub mod value_objects;

// Re-export commonly used domain types
pub use entities::{
    AccessToken, Claims, RefreshToken, RefreshTokenRecord, RefreshTokenStatus, Role, TokenPair,
    UserId,
};
pub use value_objects::{SecurityContext, Validated};
