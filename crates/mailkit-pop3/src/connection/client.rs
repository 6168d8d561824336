//! Type-state POP3 client.
//!
//! Models RFC 1939's `AUTHORIZATION` / `TRANSACTION` states plus the client
//! library's own greeting handling. The server's internal `UPDATE` state
//! (entered on QUIT, where deletions are committed) has no client-visible
//! commands, so [`quit`](Client::quit) just returns `Result<()>` rather than
//! a further type-state marker.

use md5::{Digest, Md5};

use mailkit_core::sasl::{SaslMechanism, decode_challenge, encode_response};

use super::Pop3Stream;
use crate::command::Command;
use crate::error::{Error, Result};
use crate::parser::{assemble_multiline, parse_scan_listing, parse_status_line, parse_unique_id};
use crate::types::{Greeting, MailboxStatus, ScanListing, UniqueId};
use std::marker::PhantomData;

/// Type-state marker for the `AUTHORIZATION` state.
#[derive(Debug)]
pub struct Authorization;

/// Type-state marker for the `TRANSACTION` state.
#[derive(Debug)]
pub struct Transaction;

/// POP3 client with type-state pattern.
#[derive(Debug)]
pub struct Client<State> {
    stream: Pop3Stream,
    greeting: Greeting,
    _state: PhantomData<State>,
}

impl<S> Client<S> {
    /// The server's greeting banner, including the APOP timestamp if present.
    #[must_use]
    pub const fn greeting(&self) -> &Greeting {
        &self.greeting
    }

    async fn send_status(&mut self, cmd: &Command) -> Result<String> {
        tracing::trace!(?cmd, "sending command");
        self.stream.write_all(&cmd.serialize()).await?;
        let line = self.stream.read_line().await?;
        let reply = parse_status_line(&line)?;
        if !reply.ok {
            tracing::debug!(reason = reply.message, "server returned -ERR");
        }
        reply.into_result()
    }

    async fn send_multiline(&mut self, cmd: &Command) -> Result<Vec<u8>> {
        tracing::trace!(?cmd, "sending command");
        self.stream.write_all(&cmd.serialize()).await?;
        let line = self.stream.read_line().await?;
        parse_status_line(&line)?.into_result()?;

        let mut lines = Vec::new();
        loop {
            let line = self.stream.read_line().await?;
            if line == "." {
                break;
            }
            lines.push(line);
        }
        tracing::trace!(lines = lines.len(), "multi-line response complete");
        Ok(assemble_multiline(&lines))
    }

    /// Lists the server's advertised capabilities (RFC 2449).
    ///
    /// # Errors
    ///
    /// Returns an error if the server doesn't support CAPA or the exchange fails.
    pub async fn capabilities(&mut self) -> Result<Vec<String>> {
        let body = self.send_multiline(&Command::Capa).await?;
        Ok(String::from_utf8_lossy(&body)
            .lines()
            .map(str::to_string)
            .collect())
    }

    /// Sends NOOP to keep the connection alive.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails.
    pub async fn noop(&mut self) -> Result<()> {
        self.send_status(&Command::Noop).await.map(drop)
    }

    /// Sends QUIT. The server commits any deletions made this session and
    /// closes the connection.
    ///
    /// # Errors
    ///
    /// Returns an error if the server rejects QUIT.
    pub async fn quit(mut self) -> Result<()> {
        self.send_status(&Command::Quit).await.map(drop)
    }
}

impl Client<Authorization> {
    /// Connects and reads the server greeting.
    ///
    /// # Errors
    ///
    /// Returns an error if the greeting can't be read or is negative.
    pub async fn from_stream(mut stream: Pop3Stream) -> Result<Self> {
        let line = stream.read_line().await?;
        let reply = parse_status_line(&line)?;
        if !reply.ok {
            return Err(Error::pop3_error(reply.message));
        }

        let greeting = Greeting::parse(&reply.message);
        tracing::info!(has_apop = greeting.timestamp_banner.is_some(), "connected");

        Ok(Self {
            stream,
            greeting,
            _state: PhantomData,
        })
    }

    /// Upgrades the connection to TLS via STLS (RFC 2595).
    ///
    /// # Errors
    ///
    /// Returns an error if the server doesn't support STLS or the handshake fails.
    pub async fn stls(mut self, hostname: &str) -> Result<Self> {
        self.send_status(&Command::Stls).await?;
        self.stream = self.stream.upgrade_to_tls(hostname).await?;
        Ok(self)
    }

    /// Authenticates with USER/PASS (cleartext).
    ///
    /// # Errors
    ///
    /// Returns an error if either command is rejected.
    pub async fn login(mut self, username: &str, password: &str) -> Result<Client<Transaction>> {
        self.send_status(&Command::User(username.to_string()))
            .await?;
        self.send_status(&Command::Pass(password.to_string()))
            .await?;

        tracing::info!(username, "authenticated via USER/PASS");

        Ok(Client {
            stream: self.stream,
            greeting: self.greeting,
            _state: PhantomData,
        })
    }

    /// Authenticates with APOP: an MD5 digest of the greeting's timestamp
    /// banner concatenated with the shared secret, so the password is never
    /// sent over the wire.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotSupported`] if the server's greeting carried no
    /// timestamp banner, or an error if the server rejects the digest.
    pub async fn apop(mut self, username: &str, shared_secret: &str) -> Result<Client<Transaction>> {
        let banner = self
            .greeting
            .timestamp_banner
            .clone()
            .ok_or_else(|| Error::NotSupported("APOP".to_string()))?;

        let mut hasher = Md5::new();
        hasher.update(banner.as_bytes());
        hasher.update(shared_secret.as_bytes());
        let digest = hex_lower(&hasher.finalize());

        self.send_status(&Command::Apop {
            name: username.to_string(),
            digest,
        })
        .await?;

        tracing::info!(username, "authenticated via APOP");

        Ok(Client {
            stream: self.stream,
            greeting: self.greeting,
            _state: PhantomData,
        })
    }

    /// Authenticates using a SASL mechanism (RFC 1734 AUTH).
    ///
    /// Drives the continuation exchange: every `+ <base64>` line is a
    /// challenge fed through `mechanism`, whose response is sent back as a
    /// bare base64 line, until a final status line ends the exchange.
    ///
    /// # Errors
    ///
    /// Returns an error if the mechanism rejects a challenge or the server
    /// refuses authentication.
    pub async fn authenticate<M: SaslMechanism>(
        mut self,
        mut mechanism: M,
    ) -> Result<Client<Transaction>> {
        let mechanism_name = mechanism.name();
        let cmd = Command::Auth {
            mechanism: mechanism_name.to_string(),
        };
        self.stream.write_all(&cmd.serialize()).await?;

        loop {
            let line = self.stream.read_line().await?;
            if let Some(text) = line.strip_prefix('+').map(str::trim) {
                let challenge = if text.is_empty() {
                    None
                } else {
                    Some(
                        decode_challenge(text).map_err(|err| Error::Auth(err.to_string()))?,
                    )
                };
                let response = mechanism
                    .step(challenge.as_deref())
                    .map_err(|err| Error::Auth(err.to_string()))?;
                let mut line = encode_response(&response).into_bytes();
                line.extend_from_slice(b"\r\n");
                self.stream.write_all(&line).await?;
                continue;
            }

            parse_status_line(&line)?.into_result()?;
            break;
        }

        tracing::info!(mechanism = mechanism_name, "authenticated via SASL");

        Ok(Client {
            stream: self.stream,
            greeting: self.greeting,
            _state: PhantomData,
        })
    }
}

impl Client<Transaction> {
    /// STAT: message count and total size of the mailbox.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails or the reply is malformed.
    pub async fn stat(&mut self) -> Result<MailboxStatus> {
        let message = self.send_status(&Command::Stat).await?;
        let mut parts = message.split_whitespace();
        let count = parts
            .next()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| Error::Protocol(format!("malformed STAT reply: {message}")))?;
        let size = parts
            .next()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| Error::Protocol(format!("malformed STAT reply: {message}")))?;
        Ok(MailboxStatus { count, size })
    }

    /// LIST: scan listing for every undeleted message.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails or a listing line is malformed.
    pub async fn list_all(&mut self) -> Result<Vec<ScanListing>> {
        let body = self.send_multiline(&Command::List(None)).await?;
        parse_lines(&body, parse_scan_listing)
    }

    /// LIST: scan listing for a single message.
    ///
    /// # Errors
    ///
    /// Returns an error if the message doesn't exist or was deleted.
    pub async fn list_one(&mut self, number: u32) -> Result<ScanListing> {
        let message = self.send_status(&Command::List(Some(number))).await?;
        parse_scan_listing(&message)
    }

    /// UIDL: unique ids for every undeleted message.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails or a UIDL line is malformed.
    pub async fn uidl_all(&mut self) -> Result<Vec<UniqueId>> {
        let body = self.send_multiline(&Command::Uidl(None)).await?;
        parse_lines(&body, parse_unique_id)
    }

    /// UIDL: unique id for a single message.
    ///
    /// # Errors
    ///
    /// Returns an error if the message doesn't exist or was deleted.
    pub async fn uidl_one(&mut self, number: u32) -> Result<UniqueId> {
        let message = self.send_status(&Command::Uidl(Some(number))).await?;
        parse_unique_id(&message)
    }

    /// RETR: downloads a message in full (headers and body).
    ///
    /// # Errors
    ///
    /// Returns an error if the message doesn't exist or was deleted.
    pub async fn retrieve(&mut self, number: u32) -> Result<Vec<u8>> {
        self.send_multiline(&Command::Retr(number)).await
    }

    /// TOP: downloads a message's headers plus the first `lines` body lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the message doesn't exist, was deleted, or the
    /// server doesn't implement TOP.
    pub async fn top(&mut self, number: u32, lines: u32) -> Result<Vec<u8>> {
        self.send_multiline(&Command::Top(number, lines)).await
    }

    /// DELE: marks a message deleted. Deletions take effect on QUIT.
    ///
    /// # Errors
    ///
    /// Returns an error if the message doesn't exist or is already deleted.
    pub async fn delete(&mut self, number: u32) -> Result<()> {
        self.send_status(&Command::Dele(number)).await.map(drop)
    }

    /// RSET: unmarks every message deleted this session.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails.
    pub async fn reset(&mut self) -> Result<()> {
        self.send_status(&Command::Rset).await.map(drop)
    }
}

fn parse_lines<T>(body: &[u8], parse: impl Fn(&str) -> Result<T>) -> Result<Vec<T>> {
    String::from_utf8_lossy(body)
        .lines()
        .map(parse)
        .collect()
}

fn hex_lower(bytes: &[u8]) -> String {
    use std::fmt::Write;
    bytes.iter().fold(String::with_capacity(bytes.len() * 2), |mut acc, b| {
        let _ = write!(acc, "{b:02x}");
        acc
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn hex_lower_formats_digest_bytes() {
        assert_eq!(hex_lower(&[0x00, 0x1a, 0xff]), "001aff");
    }
}
