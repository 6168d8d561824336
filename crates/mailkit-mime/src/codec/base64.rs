//! Base64 (RFC 2045 §6.8): 76-character line ceiling, `=` padding, lenient decode.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Hard line-length ceiling for generated base64, per RFC 2045 §6.8.
pub const MAX_LINE_LENGTH: usize = 76;

/// Base64 content-transfer-encoding.
#[derive(Debug, Clone, Copy, Default)]
pub struct Base64Codec;

impl Base64Codec {
    /// Encodes `data`, folding the output into CRLF-terminated lines of at
    /// most [`MAX_LINE_LENGTH`] characters.
    #[must_use]
    pub fn encode(data: &[u8]) -> String {
        let raw = STANDARD.encode(data);
        let mut out = String::with_capacity(raw.len() + raw.len() / MAX_LINE_LENGTH * 2);
        for chunk in raw.as_bytes().chunks(MAX_LINE_LENGTH) {
            if !out.is_empty() {
                out.push_str("\r\n");
            }
            // SAFETY-free: base64 output is pure ASCII.
            out.push_str(std::str::from_utf8(chunk).unwrap_or_default());
        }
        out
    }

    /// Decodes `data`, discarding whitespace/newlines and any byte outside
    /// the base64 alphabet. Never fails: truncated or corrupt input simply
    /// decodes to whatever whole quanta could be recovered, including a
    /// partial final group of 2 or 3 symbols.
    #[must_use]
    pub fn decode(data: &[u8]) -> Vec<u8> {
        let filtered: Vec<u8> = data
            .iter()
            .copied()
            .filter(|b| is_base64_alphabet(*b))
            .collect();

        // Re-derive padding from the significant (non-`=`) length rather
        // than trusting whatever `=` run was already there, so a
        // truncated, unpadded final group still decodes instead of
        // getting rejected outright by the canonical-padding engine.
        let padding = filtered.iter().rev().take_while(|&&b| b == b'=').count();
        let body_len = filtered.len() - padding;
        let remainder = body_len % 4;

        let mut body = filtered;
        body.truncate(body_len);
        match remainder {
            // A single leftover base64 symbol can't decode to anything;
            // drop it rather than fail the whole message.
            1 => {
                body.pop();
            }
            2 | 3 => body.resize(body_len + (4 - remainder), b'='),
            _ => {}
        }

        STANDARD.decode(&body).unwrap_or_default()
    }
}

fn is_base64_alphabet(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'+' || b == b'/' || b == b'='
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_short_text() {
        let encoded = Base64Codec::encode(b"Hello, World!");
        assert_eq!(Base64Codec::decode(encoded.as_bytes()), b"Hello, World!");
    }

    #[test]
    fn wraps_at_seventy_six_columns() {
        let data = vec![b'A'; 200];
        let encoded = Base64Codec::encode(&data);
        for line in encoded.split("\r\n") {
            assert!(line.len() <= MAX_LINE_LENGTH);
        }
    }

    #[test]
    fn decode_ignores_embedded_whitespace() {
        let encoded = "SGVs\r\nbG8s\r\n IFdv\tcmxk IQ==";
        assert_eq!(Base64Codec::decode(encoded.as_bytes()), b"Hello, World!");
    }

    #[test]
    fn decode_never_panics_on_garbage() {
        let garbage = b"not\0base64!!!\xff\xfe";
        let _ = Base64Codec::decode(garbage);
    }

    #[test]
    fn decode_drops_dangling_symbol() {
        // 5 base64 symbols, no padding: one leftover symbol after the first
        // full quantum of 4.
        assert_eq!(Base64Codec::decode(b"QUJDR"), b"ABC");
    }

    #[test]
    fn decode_recovers_leading_bytes_from_unpadded_truncated_group() {
        // "SGVsbG8" is "Hello" with the trailing "=" stripped: 7 symbols,
        // a partial final group of 3. The leading full quantum must still
        // decode instead of the whole thing becoming empty.
        assert_eq!(Base64Codec::decode(b"SGVsbG8"), b"Hello");
    }

    #[test]
    fn decode_recovers_leading_bytes_from_two_symbol_final_group() {
        // "QUJD" is "ABC"; appending one more symbol without padding
        // leaves a final group of 2, which still decodes to one more byte.
        assert_eq!(Base64Codec::decode(b"QUJDQQ"), b"ABCA");
    }
}
