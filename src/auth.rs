//! Credential primitives: redacted secrets, access tokens, token caches, and token providers.

pub mod cache;
pub mod provider;
pub mod secret;
pub mod token;

pub use cache::*;
pub use provider::*;
pub use secret::*;
pub use token::*;
