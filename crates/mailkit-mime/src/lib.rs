//! # mailkit-mime
//!
//! MIME message parsing and generation: header fields parsed into their
//! richest structured type, a body-part tree rather than a flat part list,
//! and the RFC 2045/2047/2231 codecs underneath.
//!
//! ## Quick Start
//!
//! ### Parsing MIME Messages
//!
//! ```
//! use mailkit_mime::Message;
//!
//! let raw_message = "From: sender@example.com\r\n\
//!                    To: recipient@example.com\r\n\
//!                    Subject: Test\r\n\
//!                    Content-Type: text/plain\r\n\
//!                    \r\n\
//!                    Hello, World!";
//!
//! let message = Message::parse(raw_message);
//! println!("Subject: {}", message.subject().unwrap_or_default());
//! println!("Body: {}", message.text_part().unwrap_or_default());
//! ```
//!
//! ### Building MIME Messages
//!
//! ```
//! use mailkit_mime::MessageBuilder;
//!
//! let message = MessageBuilder::new()
//!     .from("sender@example.com")
//!     .to("recipient@example.com")
//!     .subject("Test Message")
//!     .text_body("Hello, World!")
//!     .build();
//!
//! println!("{}", message.to_wire());
//! ```
//!
//! ### Multipart Messages
//!
//! ```
//! use mailkit_mime::MessageBuilder;
//!
//! let message = MessageBuilder::new()
//!     .from("sender@example.com")
//!     .to("recipient@example.com")
//!     .subject("Test")
//!     .text_body("Plain text version")
//!     .html_body("<html><body><h1>HTML version</h1></body></html>")
//!     .build(); // multipart/alternative
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod codec;
pub mod encoded_word;

mod address;
mod body;
mod content_disposition;
mod content_type;
mod context;
mod date;
mod header;
mod header_field;
mod media_type;
mod message;
mod message_id;
mod word;

pub mod encoding;

pub use address::{Address, AddressList, EmailAddress, Mailbox, MailboxGroup};
pub use body::{Body, BodyPart, ContentHandler};
pub use content_disposition::{ContentDisposition, DispositionType};
pub use content_type::ContentType;
pub use context::{GenerationContext, ParsingContext};
pub use date::HeaderDate;
pub use header::Header;
pub use header_field::{FieldValue, HeaderField};
pub use media_type::{MediaType, Parameters};
pub use message::{Attachment, Message, MessageBuilder};
pub use message_id::{MessageId, MessageIdSequence};
pub use word::{Text, Word};

pub use encoding::{Encoding, Usage};
