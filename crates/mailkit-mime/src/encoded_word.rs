//! RFC 2047 encoded-words: `=?charset?encoding?encoded-text?=`.
//!
//! [`encode`] folds an arbitrary header value into one or more encoded
//! words, choosing Q or B per chunk with a simple heuristic, and wrapping
//! at a conservative line length. [`decode`] reassembles a (possibly
//! multi-word) header value back to text, dropping the CRLF+SP folding
//! whitespace RFC 2047 §2 inserts between adjacent encoded words.

use crate::codec::{Base64Codec, QpFlavor, QuotedPrintableCodec};

/// Folding width encoded-words are wrapped to; RFC 2047 §2 caps a single
/// encoded-word at 75 characters including delimiters, and recommends
/// leaving room for the header field name on the first line.
const MAX_ENCODED_WORD_LEN: usize = 75;

/// Which encoding an encoded-word chunk should use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordEncoding {
    /// Quoted-printable (`Q`), for mostly-ASCII text.
    QuotedPrintable,
    /// Base64 (`B`), for text with little ASCII structure.
    Base64,
}

impl WordEncoding {
    const fn tag(self) -> char {
        match self {
            Self::QuotedPrintable => 'Q',
            Self::Base64 => 'B',
        }
    }
}

/// Picks Q or B for `text`: Q when at least 60% of the bytes are printable
/// ASCII (the common case of a handful of accented letters in otherwise
/// plain text), B otherwise (dense non-Latin scripts compress much better
/// as base64 than as a wall of `=XX` escapes).
#[must_use]
pub fn recommended_encoding(text: &str) -> WordEncoding {
    let total = text.len();
    if total == 0 {
        return WordEncoding::QuotedPrintable;
    }
    let ascii = text.bytes().filter(u8::is_ascii).count();
    #[allow(clippy::cast_precision_loss)]
    if (ascii as f64 / total as f64) >= 0.6 {
        WordEncoding::QuotedPrintable
    } else {
        WordEncoding::Base64
    }
}

/// Encodes `text` as one or more RFC 2047 encoded-words in `charset`,
/// joined by the CRLF+SP continuation RFC 2047 §2 requires between them.
///
/// Returns `text` unchanged if it contains only printable ASCII and no
/// bytes that would be misread as encoded-word delimiters.
#[must_use]
pub fn encode(text: &str, charset: &str) -> String {
    if text.bytes().all(|b| (0x20..=0x7e).contains(&b) && b != b'?' && b != b'=') {
        return text.to_string();
    }

    let encoding = recommended_encoding(text);
    let prefix_len = format!("=?{charset}?{}?", encoding.tag()).len() + 2; // + "?="
    let budget = MAX_ENCODED_WORD_LEN.saturating_sub(prefix_len).max(1);

    let chunks = match encoding {
        // Every encoded-text byte expands 3x in the worst case (`=XX`).
        WordEncoding::QuotedPrintable => chunk_str(text, budget / 3),
        // Every 3 source bytes expand to 4 base64 characters.
        WordEncoding::Base64 => chunk_str(text, budget / 4 * 3),
    };

    chunks
        .iter()
        .map(|chunk| encode_word(chunk, charset, encoding))
        .collect::<Vec<_>>()
        .join("\r\n ")
}

fn encode_word(chunk: &str, charset: &str, encoding: WordEncoding) -> String {
    let body = match encoding {
        WordEncoding::QuotedPrintable => {
            let codec = QuotedPrintableCodec::new(QpFlavor::EncodedWord);
            String::from_utf8_lossy(&codec.encode(chunk.as_bytes())).into_owned()
        }
        WordEncoding::Base64 => Base64Codec::encode(chunk.as_bytes()).replace("\r\n", ""),
    };
    format!("=?{charset}?{}?{body}?=", encoding.tag())
}

/// Splits `text` into chunks of at most `max_bytes` bytes without breaking
/// a UTF-8 codepoint.
fn chunk_str(text: &str, max_bytes: usize) -> Vec<&str> {
    if max_bytes == 0 {
        return vec![text];
    }
    let mut chunks = Vec::new();
    let mut rest = text;
    while !rest.is_empty() {
        let mut boundary = rest.len().min(max_bytes);
        while boundary > 0 && !rest.is_char_boundary(boundary) {
            boundary -= 1;
        }
        if boundary == 0 {
            boundary = rest.chars().next().map_or(rest.len(), char::len_utf8);
        }
        let (chunk, remainder) = rest.split_at(boundary);
        chunks.push(chunk);
        rest = remainder;
    }
    chunks
}

/// Decodes a header value that may contain zero or more RFC 2047
/// encoded-words interspersed with plain text.
#[must_use]
pub fn decode(text: &str) -> String {
    let mut out = String::new();
    let mut rest = text;
    let mut last_was_encoded_word = false;

    while let Some(start) = rest.find("=?") {
        let (plain, tail) = rest.split_at(start);
        if let Some((decoded, consumed)) = decode_one_word(tail) {
            if !(last_was_encoded_word && plain.chars().all(char::is_whitespace)) {
                out.push_str(plain);
            }
            out.push_str(&decoded);
            rest = &tail[consumed..];
            last_was_encoded_word = true;
        } else {
            out.push_str(plain);
            out.push_str("=?");
            rest = &tail[2..];
            last_was_encoded_word = false;
        }
    }
    out.push_str(rest);
    out
}

fn decode_one_word(text: &str) -> Option<(String, usize)> {
    debug_assert!(text.starts_with("=?"));
    let end = text.find("?=")? + 2;
    let word = &text[..end];
    let inner = &word[2..word.len() - 2];
    let mut parts = inner.splitn(3, '?');
    let charset = parts.next()?;
    let tag = parts.next()?;
    let encoded_text = parts.next()?;

    let decoded_bytes = match tag.to_ascii_uppercase().as_str() {
        "Q" => QuotedPrintableCodec::new(QpFlavor::EncodedWord).decode(encoded_text.as_bytes()),
        "B" => Base64Codec::decode(encoded_text.as_bytes()),
        _ => return None,
    };

    let decoded = decode_with_charset(&decoded_bytes, charset);
    Some((decoded, end))
}

/// Interprets `bytes` under `charset`. Charset conversion beyond UTF-8 and
/// US-ASCII is a transcoding concern outside this module's boundary;
/// anything not recognized falls back to lossy UTF-8.
fn decode_with_charset(bytes: &[u8], charset: &str) -> String {
    match charset.to_ascii_lowercase().as_str() {
        "us-ascii" | "ascii" | "utf-8" | "utf8" => String::from_utf8_lossy(bytes).into_owned(),
        _ => String::from_utf8_lossy(bytes).into_owned(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn ascii_text_is_not_encoded() {
        assert_eq!(encode("Hello", "utf-8"), "Hello");
    }

    #[test]
    fn mostly_ascii_text_uses_quoted_printable() {
        let encoded = encode("Hello Jose", "utf-8");
        assert_eq!(encoded, "Hello Jose");

        let encoded = encode("Caf\u{e9} con leche y az\u{fa}car", "utf-8");
        assert!(encoded.starts_with("=?utf-8?Q?"));
    }

    #[test]
    fn dense_non_ascii_uses_base64() {
        let encoded = encode("\u{65e5}\u{672c}\u{8a9e}", "utf-8");
        assert!(encoded.starts_with("=?utf-8?B?"));
    }

    #[test]
    fn round_trips_through_decode() {
        let original = "Caf\u{e9} au lait";
        let encoded = encode(original, "utf-8");
        assert_eq!(decode(&encoded), original);
    }

    #[test]
    fn decodes_mixed_plain_and_encoded_text() {
        let text = "Hello =?utf-8?Q?Jos=C3=A9?= !";
        assert_eq!(decode(text), "Hello Jos\u{e9} !");
    }

    #[test]
    fn long_text_splits_into_continued_words() {
        let long = "x".repeat(500).chars().map(|_| '\u{e9}').collect::<String>();
        let encoded = encode(&long, "utf-8");
        assert!(encoded.contains("\r\n "));
        assert_eq!(decode(&encoded), long);
    }

    #[test]
    fn passes_through_text_without_encoded_words() {
        assert_eq!(decode("plain ascii text"), "plain ascii text");
    }
}
