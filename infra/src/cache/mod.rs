//! In-process access-token verification caching
//!
//! The LRU cache bounds memory by an approximate byte budget. Each entry
//! expires after one access-token lifetime or at the expiry of the token it
//! vouches for, whichever is sooner, and a hit past that expiry is a miss.

pub mod verification_cache;

#[cfg(test)]
mod tests;

pub use verification_cache::{ConfiguredVerificationCache, LruVerificationCache};
