//! Business services containing the token lifecycle logic.

pub mod cache;
pub mod clock;
pub mod token;

// Re-export commonly used types
pub use cache::{NoopVerificationCache, VerificationCache};
pub use clock::{Clock, ManualClock, SystemClock};
pub use token::{
    JwtTokenSigner, ReapResult, TokenReaper, TokenReaperConfig, TokenSecret, TokenService,
    TokenServiceConfig, TokenSigner,
};
