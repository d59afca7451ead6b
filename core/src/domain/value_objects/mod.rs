//! Value objects shared by the authentication services.

pub mod security_context;
pub mod validated;

pub use security_context::SecurityContext;
pub use validated::Validated;
