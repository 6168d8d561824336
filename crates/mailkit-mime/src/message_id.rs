//! `Message-ID`, `In-Reply-To`, `References` header field values (RFC 5322 §3.6.4).

use std::fmt;

/// A single `msg-id` token: `<left@right>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MessageId {
    left: String,
    right: String,
}

impl MessageId {
    /// Builds a message ID from its left/right parts (without angle brackets).
    #[must_use]
    pub fn new(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self {
            left: left.into(),
            right: right.into(),
        }
    }

    /// Parses a single `<left@right>` token, tolerating a missing `@` (some
    /// generators emit a bare opaque token) and missing angle brackets.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let inner = raw.trim().trim_start_matches('<').trim_end_matches('>');
        inner.split_once('@').map_or_else(
            || Self::new(inner, ""),
            |(left, right)| Self::new(left, right),
        )
    }

    /// The part before `@`.
    #[must_use]
    pub fn left(&self) -> &str {
        &self.left
    }

    /// The part after `@`.
    #[must_use]
    pub fn right(&self) -> &str {
        &self.right
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.right.is_empty() {
            write!(f, "<{}>", self.left)
        } else {
            write!(f, "<{}@{}>", self.left, self.right)
        }
    }
}

/// A whitespace-separated sequence of `msg-id` tokens, as found in
/// `References` (and, rarely, multi-valued `In-Reply-To`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageIdSequence {
    ids: Vec<MessageId>,
}

impl MessageIdSequence {
    /// Creates an empty sequence.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a whitespace-separated list of `<left@right>` tokens.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let ids = raw
            .split_whitespace()
            .filter(|token| !token.is_empty())
            .map(MessageId::parse)
            .collect();
        Self { ids }
    }

    /// The message IDs, in order.
    #[must_use]
    pub fn ids(&self) -> &[MessageId] {
        &self.ids
    }

    /// Appends a message ID.
    pub fn push(&mut self, id: MessageId) {
        self.ids.push(id);
    }
}

impl fmt::Display for MessageIdSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, id) in self.ids.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{id}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_angle_bracketed_id() {
        let id = MessageId::parse("<abc123@mail.example.com>");
        assert_eq!(id.left(), "abc123");
        assert_eq!(id.right(), "mail.example.com");
    }

    #[test]
    fn display_re_adds_angle_brackets() {
        let id = MessageId::new("abc123", "mail.example.com");
        assert_eq!(id.to_string(), "<abc123@mail.example.com>");
    }

    #[test]
    fn sequence_parses_whitespace_separated_ids() {
        let seq = MessageIdSequence::parse("<a@b> <c@d>\r\n <e@f>");
        assert_eq!(seq.ids().len(), 3);
    }
}
