//! GraphQL transport for the LLDAP admin API.

pub mod client;
pub mod envelope;

pub use client::GraphQlClient;
