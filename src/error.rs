//! Error types for the lldap-sync application.
//!
//! Uses `thiserror` for library-style errors with automatic `Display` and `Error` implementations.

use thiserror::Error;

/// Top-level application error type.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0:#}")]
    Config(anyhow::Error),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("Failed to start async runtime: {0}")]
    Runtime(std::io::Error),

    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    #[error("Query error: {0}")]
    Query(#[from] QueryError),
}

/// Login-related errors.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Login request failed: {0}")]
    Network(String),

    #[error("Login failed with HTTP {status}")]
    Status { status: u16 },

    #[error("Failed to decode login response: {0}")]
    Decode(String),

    #[error("Login cancelled")]
    Cancelled,
}

/// GraphQL query errors, one per terminal failure state of a call.
#[derive(Error, Debug)]
pub enum QueryError {
    #[error("Failed to encode GraphQL request: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("GraphQL request failed: {0}")]
    Network(String),

    #[error("GraphQL request failed with HTTP {status}")]
    Status { status: u16 },

    #[error("Failed to decode GraphQL response: {0}")]
    EnvelopeDecode(String),

    #[error("GraphQL error: {message}")]
    GraphQl { message: String },

    #[error("Failed to decode GraphQL data into result: {0}")]
    ResultDecode(String),

    #[error("Request cancelled")]
    Cancelled,
}

impl AuthError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

impl QueryError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

impl AppError {
    /// Returns a user-friendly message for display on the terminal.
    pub fn user_message(&self) -> &str {
        match self {
            Self::Config(_) => "Configuration error. Please check settings.",
            Self::Client(_) => "Could not initialise the HTTP client.",
            Self::Runtime(_) => "Could not start the async runtime.",
            Self::Auth(AuthError::Status { status: 401 }) => {
                "Login rejected. Check the username and password."
            }
            Self::Auth(AuthError::Network(_)) | Self::Query(QueryError::Network(_)) => {
                "Network error. Check the server URL and your connection."
            }
            Self::Auth(AuthError::Cancelled) | Self::Query(QueryError::Cancelled) => "Cancelled.",
            Self::Auth(_) => "Sign-in failed.",
            Self::Query(QueryError::Status { status: 401 }) => {
                "Session rejected by the server. Sign in again."
            }
            Self::Query(QueryError::GraphQl { .. }) => "The server reported a GraphQL error.",
            Self::Query(_) => "Unexpected response from the server.",
        }
    }

    /// True when the failure came from an interrupt rather than the server.
    pub fn is_cancelled(&self) -> bool {
        match self {
            Self::Auth(e) => e.is_cancelled(),
            Self::Query(e) => e.is_cancelled(),
            _ => false,
        }
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Runtime(_) => 1,
            Self::Config(_) | Self::Client(_) => 2,
            Self::Auth(AuthError::Cancelled) | Self::Query(QueryError::Cancelled) => 130,
            Self::Auth(_) => 3,
            Self::Query(_) => 4,
        }
    }
}
