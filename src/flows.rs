//! Grant flows shared by provider implementations.

pub mod auth_code_pkce;

pub use auth_code_pkce::*;
