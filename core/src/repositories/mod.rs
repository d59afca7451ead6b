pub mod token;

pub use token::{InMemoryRefreshTokenRepository, RefreshTokenRepository};
