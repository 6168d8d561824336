//! # mailkit-pop3
//!
//! A POP3 client library implementing RFC 1939, with RFC 2449 CAPA, RFC 2595
//! STLS, and RFC 1734 AUTH layered on top.
//!
//! ## Quick Start
//!
//! ```ignore
//! use mailkit_pop3::Client;
//! use mailkit_pop3::connection::connect_tls;
//!
//! #[tokio::main]
//! async fn main() -> mailkit_pop3::Result<()> {
//!     let stream = connect_tls("pop.example.com", 995).await?;
//!     let client = Client::from_stream(stream).await?;
//!     let mut client = client.login("user@example.com", "password").await?;
//!
//!     let status = client.stat().await?;
//!     println!("{} messages, {} octets", status.count, status.size);
//!
//!     for listing in client.list_all().await? {
//!         let message = client.retrieve(listing.number).await?;
//!         println!("message {}: {} bytes", listing.number, message.len());
//!     }
//!
//!     client.quit().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Connection States
//!
//! ```text
//! ┌────────────────┐
//! │  Authorization  │ ─── login()/apop()/authenticate() ───→ Transaction
//! └────────────────┘
//! ```
//!
//! QUIT is available from any state and has no client-visible `Update`
//! marker: the server commits deletions and closes the connection, and
//! there is nothing left for the client to do afterward.
//!
//! ## Modules
//!
//! - [`command`]: POP3 command builder
//! - [`connection`]: Connection management and type-state client
//! - [`parser`]: Status-line and multi-line response parsing
//! - [`types`]: Mailbox status, scan listings, and the greeting banner

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod command;
pub mod connection;
mod error;
pub mod parser;
pub mod types;

pub use connection::{Authorization, Client, Pop3Stream, Transaction};
pub use error::{Error, Result};
pub use types::{Greeting, MailboxStatus, ScanListing, UniqueId};

/// POP3 protocol version supported.
pub const POP3_VERSION: &str = "POP3 (RFC 1939)";
