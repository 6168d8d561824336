//! Error types shared by the transport layer.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur in the transport layer (sockets, TLS, SASL).
#[derive(Debug, Error)]
pub enum Error {
    /// Underlying I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TLS handshake failed.
    #[error("TLS handshake failed: {0}")]
    TlsHandshake(#[from] rustls::Error),

    /// The server name given for certificate validation was not a valid DNS name.
    #[error("invalid DNS name for TLS: {0}")]
    InvalidDnsName(#[from] rustls::pki_types::InvalidDnsNameError),

    /// TLS was requested but is not available on this connection (e.g. STARTTLS
    /// not advertised, or the stream is already secured).
    #[error("TLS unavailable: {0}")]
    TlsUnavailable(String),

    /// The operation did not complete before the configured timeout elapsed.
    #[error("operation timed out after {0:?}")]
    TimedOut(Duration),

    /// The requested SASL mechanism is not implemented by this client.
    #[error("SASL mechanism unavailable: {0}")]
    MechanismUnavailable(String),

    /// A SASL exchange failed (malformed challenge, server abort, ...).
    #[error("SASL authentication failed: {0}")]
    AuthFailed(String),

    /// The connection was used after being disconnected or declared broken.
    #[error("not connected")]
    NotConnected,
}

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
