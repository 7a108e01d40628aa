//! LLDAP authentication module.
//!
//! Provides the login flow against the simple-login endpoint and the
//! session that carries the resulting bearer token.

pub mod session;

pub use session::Session;
