//! Content-transfer-encoding codecs (base64, quoted-printable, uuencode).
//!
//! Every codec in this module is deliberately infallible on decode: a
//! malformed transfer encoding is the normal failure mode of email found in
//! the wild, and a mail library that refuses to show a message because one
//! stray byte didn't round-trip is worse than one that shows its best
//! effort. Decoders here skip bytes they can't interpret rather than
//! returning `Result`. Only the wire protocols and the outer message parser
//! return `Result` for structural failures.

pub mod base64;
pub mod quoted_printable;
pub mod uuencode;

pub use self::base64::Base64Codec;
pub use quoted_printable::{QpFlavor, QuotedPrintableCodec};
pub use uuencode::UuencodeCodec;
