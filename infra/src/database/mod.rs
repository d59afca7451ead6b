//! Database module - MySQL implementations using SQLx
//!
//! Provides connection pool management and the MySQL refresh token
//! repository. The expected schema lives in `migrations/`.

pub mod connection;
pub mod mysql;

#[cfg(test)]
mod tests;

pub use connection::{DatabasePool, PoolStatistics};
pub use mysql::MySqlRefreshTokenRepository;
