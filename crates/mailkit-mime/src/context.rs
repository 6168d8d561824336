//! Parsing and generation context: the handful of policy knobs that affect
//! how a message is read or written without being part of the message
//! itself (default charset, maximum line length, whether to recover from
//! a missing boundary).

/// Policy for [`crate::message::Message::parse`].
#[derive(Debug, Clone)]
pub struct ParsingContext {
    /// Charset assumed for a part whose `Content-Type` carries none.
    pub default_charset: String,
    /// If a `multipart/*` body is missing its `boundary` parameter, treat
    /// the whole body as a single leaf part instead of failing to parse.
    pub tolerate_missing_boundary: bool,
}

impl Default for ParsingContext {
    fn default() -> Self {
        Self {
            default_charset: "us-ascii".to_string(),
            tolerate_missing_boundary: true,
        }
    }
}

impl ParsingContext {
    /// The default parsing policy.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Policy for rendering a [`crate::message::Message`] back to wire bytes.
#[derive(Debug, Clone)]
pub struct GenerationContext {
    /// Maximum line length generated body text is wrapped to.
    pub max_line_length: usize,
    /// Charset used to encode header fields and text bodies that don't
    /// specify their own.
    pub charset: String,
}

impl Default for GenerationContext {
    fn default() -> Self {
        Self {
            max_line_length: 78,
            charset: "utf-8".to_string(),
        }
    }
}

impl GenerationContext {
    /// The default generation policy.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parsing_context_defaults_to_lenient() {
        let ctx = ParsingContext::default();
        assert!(ctx.tolerate_missing_boundary);
        assert_eq!(ctx.default_charset, "us-ascii");
    }

    #[test]
    fn generation_context_defaults_to_utf8() {
        let ctx = GenerationContext::default();
        assert_eq!(ctx.charset, "utf-8");
        assert_eq!(ctx.max_line_length, 78);
    }
}
