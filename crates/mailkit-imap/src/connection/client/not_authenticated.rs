//! Implementation for the not-authenticated state.

use std::marker::PhantomData;

use tokio::io::{AsyncRead, AsyncWrite};

use mailkit_core::sasl::{SaslMechanism, decode_challenge, encode_response};

use super::Client;
use super::states::{Authenticated, NotAuthenticated};
use crate::command::{Command, TagGenerator};
use crate::connection::framed::FramedStream;
use crate::handler::NoopHandler;
use crate::mirror::MailboxMirror;
use crate::parser::{Response, ResponseParser, UntaggedResponse};
use crate::types::ResponseCode;
use crate::{Error, Result};

impl<S> Client<S, NotAuthenticated>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Creates a new client from a connected stream.
    ///
    /// Reads the server greeting and initial capabilities.
    pub async fn from_stream(stream: S) -> Result<Self> {
        let mut framed = FramedStream::new(stream);

        // Read server greeting
        let greeting = framed.read_response().await?;
        let response = ResponseParser::parse(&greeting)?;

        // Extract capabilities from greeting if present
        let mut capabilities = Vec::new();
        if let Response::Untagged(untagged) = response {
            match untagged {
                UntaggedResponse::Ok {
                    code: Some(ResponseCode::Capability(caps)),
                    ..
                }
                | UntaggedResponse::PreAuth {
                    code: Some(ResponseCode::Capability(caps)),
                    ..
                } => {
                    capabilities = caps;
                }
                UntaggedResponse::Bye { text, .. } => {
                    return Err(Error::Bye(text));
                }
                _ => {}
            }
        }

        Ok(Self {
            stream: framed,
            tag_gen: TagGenerator::default(),
            capabilities,
            mirror: MailboxMirror::new(),
            handler: Box::new(NoopHandler),
            _state: PhantomData,
        })
    }

    /// Authenticates with the server using LOGIN.
    ///
    /// Consumes self and returns an authenticated client on success.
    pub async fn login(
        mut self,
        username: &str,
        password: &str,
    ) -> Result<Client<S, Authenticated>> {
        let tag = self.tag_gen.next();
        let cmd = Command::Login {
            username: username.to_string(),
            password: password.to_string(),
        }
        .serialize(&tag);

        self.stream.write_command(&cmd).await?;

        let responses = self.read_until_tagged(&tag).await?;

        // Update capabilities if included in response
        for response_bytes in &responses {
            if let Ok(Response::Untagged(UntaggedResponse::Capability(caps))) =
                ResponseParser::parse(response_bytes)
            {
                self.capabilities = caps;
            }
        }

        Self::check_tagged_ok(&responses, &tag)?;

        Ok(Client {
            stream: self.stream,
            tag_gen: self.tag_gen,
            capabilities: self.capabilities,
            mirror: self.mirror,
            handler: self.handler,
            _state: PhantomData,
        })
    }

    /// Authenticates using a SASL mechanism (`CRAM-MD5`, `PLAIN`, or `LOGIN`).
    ///
    /// Drives the `AUTHENTICATE` continuation exchange: sends the command,
    /// then for every server challenge (a `+ <base64>` continuation line)
    /// feeds it through `mechanism` and sends back the response, until a
    /// tagged response ends the exchange.
    ///
    /// # Errors
    ///
    /// Returns an error if the mechanism rejects a challenge or the server
    /// responds `NO`/`BAD`.
    pub async fn authenticate<M: SaslMechanism>(
        mut self,
        mut mechanism: M,
    ) -> Result<Client<S, Authenticated>> {
        let tag = self.tag_gen.next();
        let cmd = Command::Authenticate {
            mechanism: mechanism.name().to_string(),
            initial_response: None,
        }
        .serialize(&tag);
        self.stream.write_command(&cmd).await?;

        let mut responses = Vec::new();
        loop {
            let line = self.stream.read_response().await?;
            let is_tagged = line
                .get(..tag.len())
                .is_some_and(|prefix| prefix == tag.as_bytes())
                && line.get(tag.len()).is_some_and(|&b| b == b' ');

            if is_tagged {
                responses.push(line);
                break;
            }

            if line.first() == Some(&b'+') {
                let text = String::from_utf8_lossy(&line[1..]).trim().to_string();
                let challenge = if text.is_empty() {
                    None
                } else {
                    Some(
                        decode_challenge(&text)
                            .map_err(|err| Error::Auth(err.to_string()))?,
                    )
                };
                let response = mechanism
                    .step(challenge.as_deref())
                    .map_err(|err| Error::Auth(err.to_string()))?;
                let mut line = encode_response(&response).into_bytes();
                line.extend_from_slice(b"\r\n");
                self.stream.write_raw(&line).await?;
                continue;
            }

            responses.push(line);
        }

        // Update capabilities if included in response
        for response_bytes in &responses {
            if let Ok(Response::Untagged(UntaggedResponse::Capability(caps))) =
                ResponseParser::parse(response_bytes)
            {
                self.capabilities = caps;
            }
        }

        Self::check_tagged_ok(&responses, &tag)?;

        Ok(Client {
            stream: self.stream,
            tag_gen: self.tag_gen,
            capabilities: self.capabilities,
            mirror: self.mirror,
            handler: self.handler,
            _state: PhantomData,
        })
    }

    /// Gracefully disconnects from the server.
    pub async fn logout(mut self) -> Result<()> {
        let tag = self.tag_gen.next();
        let cmd = Command::Logout.serialize(&tag);
        self.stream.write_command(&cmd).await?;

        // Read until we get the tagged response or BYE
        let _ = self.read_until_tagged(&tag).await;

        Ok(())
    }
}
