//! Error types for POP3 operations.

use std::io;

/// Result type alias for POP3 operations.
pub type Result<T> = std::result::Result<T, Error>;

/// POP3 error types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// TLS error.
    #[error("TLS error: {0}")]
    Tls(#[from] rustls::Error),

    /// Server returned `-ERR`.
    #[error("POP3 error: {0}")]
    Pop3Error(String),

    /// Response did not match the expected grammar.
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Authentication was rejected.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Feature not supported by the server (e.g. STLS, APOP, a SASL mechanism).
    #[error("Server does not support {0}")]
    NotSupported(String),

    /// Operation not valid in the client's current state.
    #[error("Invalid state for operation: {0}")]
    InvalidState(String),
}

impl Error {
    /// Wraps a server `-ERR` line (with the leading `-ERR ` stripped).
    #[must_use]
    pub fn pop3_error(message: impl Into<String>) -> Self {
        Self::Pop3Error(message.into())
    }
}
