//! # mailkit-core
//!
//! Transport primitives shared by the `mailkit` protocol clients
//! (`mailkit-imap`, `mailkit-pop3`, `mailkit-smtp`): the plain/TLS stream,
//! the connection-timeout policy, and SASL authentication mechanisms.
//!
//! None of the protocol state machines live here — this crate only exists
//! so IMAP, POP3 and SMTP don't each reinvent "a socket that might be TLS"
//! and "an AUTH mechanism that might be CRAM-MD5".

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod error;
pub mod sasl;
pub mod socket;
pub mod timeout;
pub mod tls;
pub mod transport;

pub use error::{Error, Result};
pub use sasl::{CramMd5, Login, Plain, SaslMechanism, SaslSocket};
pub use socket::Socket;
pub use timeout::{FixedTimeout, TimeoutHandler};
pub use tls::{CipherLevel, TlsConfig};
pub use transport::MailStream;
