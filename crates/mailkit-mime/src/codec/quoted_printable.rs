//! Quoted-Printable (RFC 2045 §6.7), including the RFC 2047 encoded-word flavor.

use std::fmt::Write as _;

/// Soft line-break ceiling for generated quoted-printable, per RFC 2045 §6.7.
const MAX_LINE_LENGTH: usize = 74;

/// Which context this codec is encoding for.
///
/// `Text` treats `CR`/`LF` as line-ending markers to be reproduced verbatim
/// and escapes a leading dot (to avoid colliding with the SMTP/POP3
/// dot-stuffing transparency rule) and trailing whitespace on a line.
/// `EncodedWord` additionally substitutes `_` for a literal space, as RFC
/// 2047 §4.2 requires inside an encoded-word's encoded-text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QpFlavor {
    /// Plain RFC 2045 body encoding.
    #[default]
    Text,
    /// RFC 2045 body encoding, but treating the input as opaque binary: no
    /// special handling of CR/LF is performed, every byte is escaped on its
    /// own merits.
    Binary,
    /// RFC 2047 `encoded-text` inside a `=?charset?Q?...?=` word.
    EncodedWord,
}

/// Quoted-printable content-transfer-encoding.
#[derive(Debug, Clone, Copy)]
pub struct QuotedPrintableCodec {
    flavor: QpFlavor,
}

impl Default for QuotedPrintableCodec {
    fn default() -> Self {
        Self::new(QpFlavor::Text)
    }
}

impl QuotedPrintableCodec {
    /// Creates a codec for the given flavor.
    #[must_use]
    pub const fn new(flavor: QpFlavor) -> Self {
        Self { flavor }
    }

    /// Encodes `data`.
    #[must_use]
    pub fn encode(&self, data: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(data.len() + data.len() / 4);
        let mut col = 0usize;
        let mut i = 0usize;

        while i < data.len() {
            let byte = data[i];

            if self.flavor != QpFlavor::Binary && byte == b'\r' && data.get(i + 1) == Some(&b'\n')
            {
                out.extend_from_slice(b"\r\n");
                col = 0;
                i += 2;
                continue;
            }
            if self.flavor != QpFlavor::Binary && byte == b'\n' {
                out.extend_from_slice(b"\r\n");
                col = 0;
                i += 1;
                continue;
            }

            // A leading dot on a line would be mistaken for the SMTP/POP3
            // end-of-data marker if left unescaped. Encoded-words have no
            // line structure of their own, so this doesn't apply to them.
            let is_leading_dot =
                self.flavor != QpFlavor::EncodedWord && col == 0 && byte == b'.';

            let at_line_end =
                data.get(i + 1).is_none() || data[i + 1] == b'\r' || data[i + 1] == b'\n';
            let is_trailing_space_or_tab =
                (byte == b' ' || byte == b'\t') && at_line_end && self.flavor != QpFlavor::Binary;

            if self.flavor == QpFlavor::EncodedWord && byte == b' ' {
                out.push(b'_');
                col += 1;
                i += 1;
                continue;
            }

            let needs_escape = is_leading_dot
                || is_trailing_space_or_tab
                || byte == b'='
                || (self.flavor == QpFlavor::EncodedWord && (byte == b'?' || byte == b'_'))
                || !(0x20..=0x7e).contains(&byte);

            if col >= MAX_LINE_LENGTH - 1 && self.flavor != QpFlavor::EncodedWord {
                out.extend_from_slice(b"=\r\n");
                col = 0;
            }

            if needs_escape {
                out.push(b'=');
                let _ = write!(HexSink(&mut out), "{byte:02X}");
                col += 3;
            } else {
                out.push(byte);
                col += 1;
            }
            i += 1;
        }

        out
    }

    /// Decodes `data`. Malformed escapes (non-hex digits, truncated `=` at
    /// end of input) are passed through literally rather than rejected.
    #[must_use]
    pub fn decode(&self, data: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(data.len());
        let mut i = 0usize;

        while i < data.len() {
            let byte = data[i];

            if byte == b'=' {
                if data.get(i + 1) == Some(&b'\r') && data.get(i + 2) == Some(&b'\n') {
                    i += 3; // soft line break
                    continue;
                }
                if data.get(i + 1) == Some(&b'\n') {
                    i += 2; // lenient: bare LF soft break
                    continue;
                }
                if let (Some(&hi), Some(&lo)) = (data.get(i + 1), data.get(i + 2)) {
                    if let (Some(hi), Some(lo)) = (hex_digit(hi), hex_digit(lo)) {
                        out.push(hi * 16 + lo);
                        i += 3;
                        continue;
                    }
                }
                // Not a valid escape: emit the `=` literally.
                out.push(byte);
                i += 1;
                continue;
            }

            if self.flavor == QpFlavor::EncodedWord && byte == b'_' {
                out.push(b' ');
            } else {
                out.push(byte);
            }
            i += 1;
        }

        out
    }
}

fn hex_digit(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'A'..=b'F' => Some(b - b'A' + 10),
        b'a'..=b'f' => Some(b - b'a' + 10),
        _ => None,
    }
}

struct HexSink<'a>(&'a mut Vec<u8>);

impl std::fmt::Write for HexSink<'_> {
    fn write_str(&mut self, s: &str) -> std::fmt::Result {
        self.0.extend_from_slice(s.as_bytes());
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn passes_plain_ascii_through() {
        let codec = QuotedPrintableCodec::new(QpFlavor::Text);
        assert_eq!(codec.encode(b"Hello, World!"), b"Hello, World!");
    }

    #[test]
    fn escapes_non_ascii_bytes() {
        let codec = QuotedPrintableCodec::new(QpFlavor::Text);
        let encoded = codec.encode("Héllo".as_bytes());
        assert!(encoded.windows(3).any(|w| w == b"=C3"));
    }

    #[test]
    fn escapes_leading_dot() {
        let codec = QuotedPrintableCodec::new(QpFlavor::Text);
        let encoded = codec.encode(b".leading dot");
        assert!(encoded.starts_with(b"=2E"));
    }

    #[test]
    fn escapes_trailing_whitespace() {
        let codec = QuotedPrintableCodec::new(QpFlavor::Text);
        let encoded = codec.encode(b"trailing space \r\n");
        assert!(encoded.starts_with(b"trailing space=20\r\n"));
    }

    #[test]
    fn round_trips_through_soft_break() {
        let codec = QuotedPrintableCodec::new(QpFlavor::Text);
        let data = vec![b'a'; 200];
        let encoded = codec.encode(&data);
        assert!(encoded.windows(3).any(|w| w == b"=\r\n"));
        assert_eq!(codec.decode(&encoded), data);
    }

    #[test]
    fn encoded_word_flavor_uses_underscore_for_space() {
        let codec = QuotedPrintableCodec::new(QpFlavor::EncodedWord);
        let encoded = codec.encode(b"hello world");
        assert_eq!(encoded, b"hello_world");
        assert_eq!(codec.decode(&encoded), b"hello world");
    }

    #[test]
    fn encoded_word_flavor_does_not_escape_leading_dot() {
        let codec = QuotedPrintableCodec::new(QpFlavor::EncodedWord);
        let encoded = codec.encode(b".leading");
        assert!(encoded.starts_with(b".leading"));
    }

    #[test]
    fn decode_passes_through_malformed_escape() {
        let codec = QuotedPrintableCodec::new(QpFlavor::Text);
        assert_eq!(codec.decode(b"100%=GG done"), b"100%=GG done");
    }
}
