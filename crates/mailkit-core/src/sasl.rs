//! SASL mechanisms (spec §4.10).
//!
//! A [`SaslMechanism`] is a small state machine: the protocol client feeds it
//! each server challenge and sends back whatever [`SaslMechanism::step`]
//! returns, until [`SaslMechanism::is_complete`]. On success, a mechanism
//! that negotiated an integrity/privacy layer can wrap the connection's
//! [`Socket`] in a [`SaslSocket`] that funnels every read/write through
//! `encode`/`decode`; mechanisms that don't negotiate a security layer
//! (all three implemented here) make `SaslSocket` a pass-through.

use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac};
use md5::Md5;

use crate::socket::Socket;
use crate::{Error, Result};

type HmacMd5 = Hmac<Md5>;

/// A SASL authentication mechanism.
pub trait SaslMechanism {
    /// The IANA-registered mechanism name (e.g. `"CRAM-MD5"`).
    fn name(&self) -> &'static str;

    /// Produces the client response for a given server challenge.
    ///
    /// `challenge` is `None` for mechanisms that send an initial response
    /// before any challenge is received (SASL-IR).
    ///
    /// # Errors
    ///
    /// Returns [`Error::AuthFailed`] if the challenge is malformed.
    fn step(&mut self, challenge: Option<&[u8]>) -> Result<Vec<u8>>;

    /// Returns `true` once the mechanism has sent its final response.
    fn is_complete(&self) -> bool;

    /// Encodes outgoing application data through the negotiated security
    /// layer. The default is a pass-through (no layer negotiated).
    fn encode(&self, data: &[u8]) -> Vec<u8> {
        data.to_vec()
    }

    /// Decodes incoming data through the negotiated security layer.
    fn decode(&self, data: &[u8]) -> Vec<u8> {
        data.to_vec()
    }
}

/// CRAM-MD5 (RFC 2195): HMAC-MD5 challenge/response, no security layer.
#[derive(Debug, Clone)]
pub struct CramMd5 {
    username: String,
    password: String,
    complete: bool,
}

impl CramMd5 {
    /// Creates a new CRAM-MD5 mechanism for the given credentials.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            complete: false,
        }
    }
}

impl SaslMechanism for CramMd5 {
    fn name(&self) -> &'static str {
        "CRAM-MD5"
    }

    fn step(&mut self, challenge: Option<&[u8]>) -> Result<Vec<u8>> {
        let challenge =
            challenge.ok_or_else(|| Error::AuthFailed("CRAM-MD5 requires a challenge".into()))?;

        let mut mac = HmacMd5::new_from_slice(self.password.as_bytes())
            .map_err(|err| Error::AuthFailed(err.to_string()))?;
        mac.update(challenge);
        let digest = mac.finalize().into_bytes();
        let hex_digest = digest.iter().fold(String::new(), |mut acc, byte| {
            use std::fmt::Write as _;
            let _ = write!(acc, "{byte:02x}");
            acc
        });

        self.complete = true;
        Ok(format!("{} {hex_digest}", self.username).into_bytes())
    }

    fn is_complete(&self) -> bool {
        self.complete
    }
}

/// PLAIN (RFC 4616): the password sent in the clear, base64-wrapped.
#[derive(Debug, Clone)]
pub struct Plain {
    authzid: String,
    username: String,
    password: String,
    complete: bool,
}

impl Plain {
    /// Creates a new PLAIN mechanism. `authzid` is usually empty.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            authzid: String::new(),
            username: username.into(),
            password: password.into(),
            complete: false,
        }
    }
}

impl SaslMechanism for Plain {
    fn name(&self) -> &'static str {
        "PLAIN"
    }

    fn step(&mut self, _challenge: Option<&[u8]>) -> Result<Vec<u8>> {
        self.complete = true;
        let mut response = Vec::new();
        response.extend_from_slice(self.authzid.as_bytes());
        response.push(0);
        response.extend_from_slice(self.username.as_bytes());
        response.push(0);
        response.extend_from_slice(self.password.as_bytes());
        Ok(response)
    }

    fn is_complete(&self) -> bool {
        self.complete
    }
}

/// LOGIN (obsolete but widely deployed): username then password, each
/// base64-wrapped, sent over two separate challenges.
#[derive(Debug, Clone)]
pub struct Login {
    username: String,
    password: String,
    step: u8,
}

impl Login {
    /// Creates a new LOGIN mechanism.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            step: 0,
        }
    }
}

impl SaslMechanism for Login {
    fn name(&self) -> &'static str {
        "LOGIN"
    }

    fn step(&mut self, _challenge: Option<&[u8]>) -> Result<Vec<u8>> {
        let response = match self.step {
            0 => self.username.clone().into_bytes(),
            1 => self.password.clone().into_bytes(),
            _ => return Err(Error::AuthFailed("LOGIN exchange already complete".into())),
        };
        self.step += 1;
        Ok(response)
    }

    fn is_complete(&self) -> bool {
        self.step >= 2
    }
}

/// Base64-encodes a mechanism's response, as every protocol's AUTH command expects.
#[must_use]
pub fn encode_response(data: &[u8]) -> String {
    STANDARD.encode(data)
}

/// Base64-decodes a server challenge received in an AUTH/AUTHENTICATE exchange.
///
/// # Errors
///
/// Returns [`Error::AuthFailed`] if `text` is not valid base64.
pub fn decode_challenge(text: &str) -> Result<Vec<u8>> {
    STANDARD
        .decode(text.trim())
        .map_err(|err| Error::AuthFailed(format!("invalid base64 challenge: {err}")))
}

/// Wraps a [`Socket`] so that every read/write is pushed through a
/// negotiated SASL integrity/privacy layer.
///
/// When the mechanism negotiated no security layer (true for all three
/// mechanisms above), `encode`/`decode` are identity functions and this is a
/// transparent pass-through, per spec §4.10.
pub struct SaslSocket<S, M> {
    inner: S,
    mechanism: M,
}

impl<S: Socket, M: SaslMechanism> SaslSocket<S, M> {
    /// Wraps `inner` with the security layer negotiated by `mechanism`.
    ///
    /// `mechanism` must already be complete (`is_complete() == true`).
    #[must_use]
    pub fn new(inner: S, mechanism: M) -> Self {
        Self { inner, mechanism }
    }

    /// Consumes this wrapper, returning the underlying socket.
    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: Socket, M: SaslMechanism> Socket for SaslSocket<S, M> {
    async fn send(&mut self, data: &[u8]) -> Result<()> {
        let encoded = self.mechanism.encode(data);
        self.inner.send(&encoded).await
    }

    async fn receive(&mut self, buf: &mut [u8]) -> Result<usize> {
        let n = self.inner.receive(buf).await?;
        let decoded = self.mechanism.decode(&buf[..n]);
        let len = decoded.len().min(buf.len());
        buf[..len].copy_from_slice(&decoded[..len]);
        Ok(len)
    }

    async fn wait_for_read(&mut self, timeout: Duration) -> Result<bool> {
        self.inner.wait_for_read(timeout).await
    }

    fn is_secure(&self) -> bool {
        self.inner.is_secure()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn cram_md5_matches_rfc2195_example() {
        // RFC 2195 §3 worked example.
        let mut mechanism = CramMd5::new("tim", "tanstaaftanstaaf");
        let challenge = b"<1896.697170952@postoffice.reston.mci.net>";
        let response = mechanism.step(Some(challenge)).unwrap();
        assert_eq!(
            response,
            b"tim b913a602c7eda7a495b4e6e7334d3890".to_vec()
        );
        assert!(mechanism.is_complete());
    }

    #[test]
    fn cram_md5_requires_a_challenge() {
        let mut mechanism = CramMd5::new("tim", "secret");
        assert!(mechanism.step(None).is_err());
    }

    #[test]
    fn plain_response_is_nul_separated() {
        let mut mechanism = Plain::new("user", "pass");
        let response = mechanism.step(None).unwrap();
        assert_eq!(response, b"\0user\0pass".to_vec());
        assert!(mechanism.is_complete());
    }

    #[test]
    fn login_sends_username_then_password() {
        let mut mechanism = Login::new("user", "pass");
        assert_eq!(mechanism.step(None).unwrap(), b"user".to_vec());
        assert!(!mechanism.is_complete());
        assert_eq!(mechanism.step(None).unwrap(), b"pass".to_vec());
        assert!(mechanism.is_complete());
        assert!(mechanism.step(None).is_err());
    }

    #[test]
    fn response_round_trips_through_base64() {
        let encoded = encode_response(b"hello");
        let decoded = decode_challenge(&encoded).unwrap();
        assert_eq!(decoded, b"hello");
    }
}
