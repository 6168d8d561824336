//! `Content-Type` header field value: a [`MediaType`] plus its [`Parameters`].

use std::fmt;

use crate::media_type::{MediaType, Parameters};

/// A full `Content-Type` value: type/subtype plus parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentType {
    media_type: MediaType,
    params: Parameters,
}

impl ContentType {
    /// Creates a content type with no parameters.
    #[must_use]
    pub fn new(main_type: impl Into<String>, sub_type: impl Into<String>) -> Self {
        Self {
            media_type: MediaType::new(main_type, sub_type),
            params: Parameters::new(),
        }
    }

    /// `text/plain; charset=utf-8`.
    #[must_use]
    pub fn text_plain() -> Self {
        Self::new("text", "plain").with_parameter("charset", "utf-8")
    }

    /// `text/html; charset=utf-8`.
    #[must_use]
    pub fn text_html() -> Self {
        Self::new("text", "html").with_parameter("charset", "utf-8")
    }

    /// `multipart/mixed; boundary=...`.
    #[must_use]
    pub fn multipart_mixed(boundary: impl Into<String>) -> Self {
        Self::new("multipart", "mixed").with_parameter("boundary", boundary)
    }

    /// `multipart/alternative; boundary=...`.
    #[must_use]
    pub fn multipart_alternative(boundary: impl Into<String>) -> Self {
        Self::new("multipart", "alternative").with_parameter("boundary", boundary)
    }

    /// `multipart/related; boundary=...`.
    #[must_use]
    pub fn multipart_related(boundary: impl Into<String>) -> Self {
        Self::new("multipart", "related").with_parameter("boundary", boundary)
    }

    /// Adds (or replaces) a parameter, builder-style.
    #[must_use]
    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.set(key, value);
        self
    }

    /// The underlying type/subtype.
    #[must_use]
    pub const fn media_type(&self) -> &MediaType {
        &self.media_type
    }

    /// The parameter map.
    #[must_use]
    pub const fn params(&self) -> &Parameters {
        &self.params
    }

    /// The top-level type (e.g. `"text"`).
    #[must_use]
    pub fn main_type(&self) -> &str {
        self.media_type.r#type()
    }

    /// The subtype (e.g. `"plain"`).
    #[must_use]
    pub fn sub_type(&self) -> &str {
        self.media_type.subtype()
    }

    /// The `charset` parameter, if present.
    #[must_use]
    pub fn charset(&self) -> Option<&str> {
        self.params.get("charset")
    }

    /// The `boundary` parameter, if present (only meaningful on `multipart/*`).
    #[must_use]
    pub fn boundary(&self) -> Option<&str> {
        self.params.get("boundary")
    }

    /// Returns true for any `multipart/*` type.
    #[must_use]
    pub fn is_multipart(&self) -> bool {
        self.media_type.is_multipart()
    }

    /// Returns true for any `text/*` type.
    #[must_use]
    pub fn is_text(&self) -> bool {
        self.media_type.r#type() == "text"
    }

    /// Parses a `type/subtype; param=value; ...` string.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let media_type = MediaType::parse(raw);
        let params = raw.find(';').map_or_else(Parameters::new, |i| Parameters::parse(&raw[i + 1..]));
        Self { media_type, params }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.media_type)?;
        for (key, value) in self.params.iter() {
            if value
                .contains(|c: char| c.is_whitespace() || "()<>@,;:\\\"/[]?=".contains(c))
            {
                write!(f, "; {key}=\"{value}\"")?;
            } else {
                write!(f, "; {key}={value}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_plain_carries_utf8_charset() {
        let ct = ContentType::text_plain();
        assert_eq!(ct.charset(), Some("utf-8"));
    }

    #[test]
    fn multipart_mixed_carries_boundary() {
        let ct = ContentType::multipart_mixed("boundary123");
        assert!(ct.is_multipart());
        assert_eq!(ct.boundary(), Some("boundary123"));
    }

    #[test]
    fn parse_recovers_type_and_charset() {
        let ct = ContentType::parse("text/plain; charset=utf-8");
        assert_eq!(ct.main_type(), "text");
        assert_eq!(ct.charset(), Some("utf-8"));
    }

    #[test]
    fn parse_handles_quoted_boundary() {
        let ct = ContentType::parse(r#"multipart/mixed; boundary="----=_Part_123""#);
        assert_eq!(ct.boundary(), Some("----=_Part_123"));
    }

    #[test]
    fn display_quotes_values_with_special_characters() {
        let ct = ContentType::multipart_mixed("has spaces");
        assert!(ct.to_string().contains(r#"boundary="has spaces""#));
    }
}
