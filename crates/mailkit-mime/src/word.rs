//! [`Word`] and [`Text`]: a charset-tagged byte string and a run of such
//! strings concatenated logically (the result of parsing a header value
//! that may have mixed encoded-words in different charsets, per RFC 2047).

use std::fmt;

use crate::encoded_word;

/// A charset-tagged byte string: the unit of text a header field value is
/// built from once RFC 2047 encoded-words have been decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Word {
    charset: String,
    bytes: Vec<u8>,
}

impl Word {
    /// Creates a word from raw bytes under `charset`.
    #[must_use]
    pub fn new(bytes: impl Into<Vec<u8>>, charset: impl Into<String>) -> Self {
        Self {
            bytes: bytes.into(),
            charset: charset.into(),
        }
    }

    /// Creates a UTF-8 word, the common case of a value parsed or built in
    /// Rust `&str`s.
    #[must_use]
    pub fn from_str(text: &str) -> Self {
        Self::new(text.as_bytes().to_vec(), "utf-8")
    }

    /// The charset this word's bytes are encoded in.
    #[must_use]
    pub fn charset(&self) -> &str {
        &self.charset
    }

    /// The raw, charset-encoded bytes.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Decodes this word's bytes to a Rust string.
    ///
    /// Charsets other than UTF-8/US-ASCII are decoded lossily: full
    /// charset-conversion tables are outside this crate's scope, which
    /// only promises to round-trip the common Internet charsets.
    #[must_use]
    pub fn to_text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }

    /// Renders this word as one or more RFC 2047 encoded-words suitable for
    /// a header field value, or as plain text if it needs no encoding.
    #[must_use]
    pub fn to_header_value(&self) -> String {
        encoded_word::encode(&self.to_text(), &self.charset)
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl From<&str> for Word {
    fn from(text: &str) -> Self {
        Self::from_str(text)
    }
}

impl From<String> for Word {
    fn from(text: String) -> Self {
        Self::from_str(&text)
    }
}

/// An ordered run of [`Word`]s, each independently charset-tagged.
///
/// Most header values parse to a single word; `Text` exists for values
/// like a display name built from several encoded-words in different
/// charsets (RFC 2047 explicitly allows this).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Text {
    words: Vec<Word>,
}

impl Text {
    /// Creates an empty text.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a single-word text from a plain Rust string.
    #[must_use]
    pub fn from_str(text: &str) -> Self {
        Self {
            words: vec![Word::from_str(text)],
        }
    }

    /// Appends a word.
    pub fn push(&mut self, word: Word) {
        self.words.push(word);
    }

    /// The words making up this text, in order.
    #[must_use]
    pub fn words(&self) -> &[Word] {
        &self.words
    }

    /// Concatenates every word's decoded text.
    #[must_use]
    pub fn to_text(&self) -> String {
        self.words.iter().map(Word::to_text).collect()
    }

    /// Parses a raw header field value, decoding any RFC 2047 encoded-words
    /// found in it. Plain runs of text become UTF-8 words; the original
    /// charset of each decoded encoded-word is not individually preserved
    /// since [`encoded_word::decode`] already folds everything to text.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let decoded = encoded_word::decode(raw);
        Self::from_str(&decoded)
    }

    /// Renders this text back into a header field value, encoding each word
    /// that needs it.
    #[must_use]
    pub fn to_header_value(&self) -> String {
        self.words
            .iter()
            .map(Word::to_header_value)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl From<&str> for Text {
    fn from(text: &str) -> Self {
        Self::from_str(text)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn word_round_trips_ascii() {
        let word = Word::from_str("Hello");
        assert_eq!(word.to_text(), "Hello");
        assert_eq!(word.to_header_value(), "Hello");
    }

    #[test]
    fn word_encodes_non_ascii_for_header_value() {
        let word = Word::from_str("Caf\u{e9}");
        assert!(word.to_header_value().starts_with("=?utf-8?"));
    }

    #[test]
    fn text_parse_decodes_encoded_words() {
        let text = Text::parse("=?utf-8?Q?Jos=C3=A9?=");
        assert_eq!(text.to_text(), "Jos\u{e9}");
    }

    #[test]
    fn text_push_builds_multi_word_value() {
        let mut text = Text::new();
        text.push(Word::from_str("Hello "));
        text.push(Word::from_str("World"));
        assert_eq!(text.to_text(), "Hello World");
    }
}
