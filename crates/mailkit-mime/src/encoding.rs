//! `Content-Transfer-Encoding` (RFC 2045 §6): the wire encoding applied to
//! a body's octets, plus the usage hint (text vs. binary data) that drives
//! which codec a part should pick when none is set explicitly.

use std::fmt;

use crate::codec::{Base64Codec, QpFlavor, QuotedPrintableCodec, UuencodeCodec};

/// Whether a body carries text (should get CRLF canonicalization under
/// quoted-printable) or arbitrary binary data (should not).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Usage {
    /// Textual content; quoted-printable treats line endings specially.
    Text,
    /// Arbitrary binary content.
    Binary,
}

/// A `Content-Transfer-Encoding` token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    /// `7bit`: no encoding, lines are plain 7-bit ASCII.
    #[default]
    SevenBit,
    /// `8bit`: no encoding, but 8-bit bytes permitted.
    EightBit,
    /// `binary`: no encoding, no line-length limit.
    Binary,
    /// `quoted-printable`.
    QuotedPrintable,
    /// `base64`.
    Base64,
    /// `x-uuencode` (legacy, still seen in the wild).
    UuEncode,
}

impl Encoding {
    /// Parses a `Content-Transfer-Encoding` token, defaulting to
    /// [`Encoding::SevenBit`] for anything unrecognized (per RFC 2045 §6.1,
    /// the default when the header is absent).
    #[must_use]
    pub fn parse(token: &str) -> Self {
        match token.trim().to_ascii_lowercase().as_str() {
            "8bit" => Self::EightBit,
            "binary" => Self::Binary,
            "quoted-printable" => Self::QuotedPrintable,
            "base64" => Self::Base64,
            "x-uuencode" | "uuencode" => Self::UuEncode,
            _ => Self::SevenBit,
        }
    }

    /// Picks a transfer encoding for data of the given [`Usage`], the way a
    /// message builder chooses one when the caller hasn't: quoted-printable
    /// for text (keeps most of it readable), base64 for binary.
    #[must_use]
    pub fn recommended_for(usage: Usage) -> Self {
        match usage {
            Usage::Text => Self::QuotedPrintable,
            Usage::Binary => Self::Base64,
        }
    }

    /// Encodes `data` for the wire.
    #[must_use]
    pub fn encode(self, data: &[u8]) -> Vec<u8> {
        match self {
            Self::SevenBit | Self::EightBit | Self::Binary => data.to_vec(),
            Self::QuotedPrintable => {
                QuotedPrintableCodec::new(QpFlavor::Text).encode(data)
            }
            Self::Base64 => Base64Codec::encode(data).into_bytes(),
            Self::UuEncode => UuencodeCodec::encode(data, "attachment.bin", "644").into_bytes(),
        }
    }

    /// Decodes `data` from the wire. Never fails: codecs are lenient by
    /// design (see `crate::codec`).
    #[must_use]
    pub fn decode(self, data: &[u8]) -> Vec<u8> {
        match self {
            Self::SevenBit | Self::EightBit | Self::Binary => data.to_vec(),
            Self::QuotedPrintable => QuotedPrintableCodec::new(QpFlavor::Text).decode(data),
            Self::Base64 => Base64Codec::decode(data),
            Self::UuEncode => UuencodeCodec::decode(&String::from_utf8_lossy(data)),
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::SevenBit => "7bit",
            Self::EightBit => "8bit",
            Self::Binary => "binary",
            Self::QuotedPrintable => "quoted-printable",
            Self::Base64 => "base64",
            Self::UuEncode => "x-uuencode",
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn unrecognized_token_defaults_to_seven_bit() {
        assert_eq!(Encoding::parse("garbage"), Encoding::SevenBit);
    }

    #[test]
    fn recommended_matches_usage() {
        assert_eq!(Encoding::recommended_for(Usage::Text), Encoding::QuotedPrintable);
        assert_eq!(Encoding::recommended_for(Usage::Binary), Encoding::Base64);
    }

    #[test]
    fn base64_round_trips_through_encoding() {
        let data = b"binary\x00\x01\x02data";
        let encoded = Encoding::Base64.encode(data);
        assert_eq!(Encoding::Base64.decode(&encoded), data);
    }

    #[test]
    fn display_matches_wire_tokens() {
        assert_eq!(Encoding::QuotedPrintable.to_string(), "quoted-printable");
        assert_eq!(Encoding::Base64.to_string(), "base64");
    }
}
