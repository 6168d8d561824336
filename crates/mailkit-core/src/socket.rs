//! The `Socket` contract: a byte-oriented, possibly-secure duplex stream.
//!
//! Every protocol client (IMAP, POP3, SMTP) is written against this trait
//! rather than against `TcpStream` directly, so that a SASL integrity/privacy
//! layer ([`crate::sasl::SaslSocket`]) or a TLS upgrade
//! ([`crate::transport::MailStream`]) can be slipped underneath without the
//! command/response logic above noticing.

use std::time::Duration;

use crate::Result;

/// A bidirectional byte stream with explicit waiting and a secure-transport flag.
///
/// This mirrors the source library's socket abstraction (see spec §4.5): the
/// protocol layer never touches the network directly, so TLS and SASL can be
/// layered in transparently.
#[allow(async_fn_in_trait)]
pub trait Socket {
    /// Sends all of `data` on the stream.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying write fails.
    async fn send(&mut self, data: &[u8]) -> Result<()>;

    /// Reads up to `buf.len()` bytes into `buf`, returning the number read.
    ///
    /// A return value of `0` means the peer closed the connection.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying read fails.
    async fn receive(&mut self, buf: &mut [u8]) -> Result<usize>;

    /// Waits up to `timeout` for the stream to become readable.
    ///
    /// # Errors
    ///
    /// Returns an error if waiting fails for a reason other than timing out.
    async fn wait_for_read(&mut self, timeout: Duration) -> Result<bool>;

    /// Returns whether the stream is currently running over a TLS session.
    fn is_secure(&self) -> bool;
}
