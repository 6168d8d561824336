//! Plain/TLS transport stream shared by the three protocol clients.
//!
//! Each protocol crate used to carry its own copy of this enum
//! (`ImapStream`, `SmtpStream`); it is lifted here so STARTTLS upgrade and
//! implicit-TLS connect are implemented exactly once.

use std::io;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

use rustls::pki_types::ServerName;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, ReadBuf};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_rustls::TlsConnector;
use tokio_rustls::client::TlsStream;

use crate::socket::Socket;
use crate::tls::TlsConfig;
use crate::{Error, Result};

/// A stream that is either plaintext TCP or TLS-wrapped TCP.
pub enum MailStream {
    /// Plaintext TCP stream.
    Plain(TcpStream),
    /// TLS-encrypted stream (boxed to keep the enum small).
    Tls(Box<TlsStream<TcpStream>>),
}

impl MailStream {
    /// Connects a plaintext TCP stream, for servers that start unencrypted
    /// and are upgraded later with STARTTLS.
    ///
    /// # Errors
    ///
    /// Returns an error if the TCP connection cannot be established.
    pub async fn connect_plain(host: &str, port: u16) -> Result<Self> {
        let tcp = TcpStream::connect((host, port)).await?;
        Ok(Self::Plain(tcp))
    }

    /// Connects directly over TLS (implicit TLS, e.g. IMAPS/POP3S/SMTPS).
    ///
    /// # Errors
    ///
    /// Returns an error if the TCP connection or the TLS handshake fails.
    pub async fn connect_tls(host: &str, port: u16, tls: &TlsConfig) -> Result<Self> {
        let tcp = TcpStream::connect((host, port)).await?;
        let stream = upgrade(tcp, host, tls).await?;
        Ok(Self::Tls(Box::new(stream)))
    }

    /// Upgrades an already-connected plaintext stream to TLS (STARTTLS).
    ///
    /// # Errors
    ///
    /// Returns [`Error::TlsUnavailable`] if the stream is already TLS, or a
    /// handshake error if negotiation fails.
    pub async fn upgrade_to_tls(self, host: &str, tls: &TlsConfig) -> Result<Self> {
        match self {
            Self::Plain(tcp) => {
                let stream = upgrade(tcp, host, tls).await?;
                Ok(Self::Tls(Box::new(stream)))
            }
            Self::Tls(_) => Err(Error::TlsUnavailable(
                "stream is already secured with TLS".to_string(),
            )),
        }
    }

    /// Returns true if this stream is TLS-encrypted.
    #[must_use]
    pub const fn is_tls(&self) -> bool {
        matches!(self, Self::Tls(_))
    }
}

async fn upgrade(tcp: TcpStream, host: &str, tls: &TlsConfig) -> Result<TlsStream<TcpStream>> {
    let connector = TlsConnector::from(Arc::new(tls.client_config()));
    let server_name = ServerName::try_from(host.to_string())?;
    let stream = connector.connect(server_name, tcp).await?;
    Ok(stream)
}

impl AsyncRead for MailStream {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        match self.get_mut() {
            Self::Plain(stream) => Pin::new(stream).poll_read(cx, buf),
            Self::Tls(stream) => Pin::new(stream).poll_read(cx, buf),
        }
    }
}

impl AsyncWrite for MailStream {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        match self.get_mut() {
            Self::Plain(stream) => Pin::new(stream).poll_write(cx, buf),
            Self::Tls(stream) => Pin::new(stream).poll_write(cx, buf),
        }
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match self.get_mut() {
            Self::Plain(stream) => Pin::new(stream).poll_flush(cx),
            Self::Tls(stream) => Pin::new(stream).poll_flush(cx),
        }
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match self.get_mut() {
            Self::Plain(stream) => Pin::new(stream).poll_shutdown(cx),
            Self::Tls(stream) => Pin::new(stream).poll_shutdown(cx),
        }
    }
}

impl Socket for MailStream {
    async fn send(&mut self, data: &[u8]) -> Result<()> {
        self.write_all(data).await?;
        self.flush().await?;
        Ok(())
    }

    async fn receive(&mut self, buf: &mut [u8]) -> Result<usize> {
        let n = self.read(buf).await?;
        Ok(n)
    }

    async fn wait_for_read(&mut self, wait: Duration) -> Result<bool> {
        let tcp = match self {
            Self::Plain(stream) => stream,
            Self::Tls(stream) => stream.get_ref().0,
        };
        match timeout(wait, tcp.readable()).await {
            Ok(Ok(())) => Ok(true),
            Ok(Err(err)) => Err(Error::Io(err)),
            Err(_) => Ok(false),
        }
    }

    fn is_secure(&self) -> bool {
        self.is_tls()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn connect_plain_fails_fast_on_unroutable_host() {
        // Port 0 is never listening; this exercises the error path without
        // depending on network access.
        let result = MailStream::connect_plain("127.0.0.1", 0).await;
        assert!(result.is_err());
    }
}
