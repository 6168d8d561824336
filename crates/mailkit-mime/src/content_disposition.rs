//! `Content-Disposition` (RFC 2183): inline vs. attachment, plus filename
//! and size/date parameters.

use std::fmt;

use crate::media_type::Parameters;

/// The disposition type: whether a part should be displayed inline or
/// offered as a downloadable attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispositionType {
    /// Render in the body of the message.
    Inline,
    /// Offer as a named attachment.
    Attachment,
    /// An extension token not recognized by this crate.
    Extension,
}

impl fmt::Display for DispositionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Inline => "inline",
            Self::Attachment => "attachment",
            Self::Extension => "extension",
        })
    }
}

/// A parsed `Content-Disposition` header field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentDisposition {
    kind: DispositionType,
    params: Parameters,
}

impl ContentDisposition {
    /// Creates a disposition with no parameters.
    #[must_use]
    pub fn new(kind: DispositionType) -> Self {
        Self {
            kind,
            params: Parameters::new(),
        }
    }

    /// The disposition type.
    #[must_use]
    pub fn kind(&self) -> DispositionType {
        self.kind
    }

    /// The parameter map (`filename`, `size`, `creation-date`, ...).
    #[must_use]
    pub fn params(&self) -> &Parameters {
        &self.params
    }

    /// Mutable access to the parameter map, for building a disposition.
    pub fn params_mut(&mut self) -> &mut Parameters {
        &mut self.params
    }

    /// The `filename` parameter, if present.
    #[must_use]
    pub fn filename(&self) -> Option<&str> {
        self.params.get("filename")
    }

    /// Parses a `Content-Disposition` header field value.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let kind_token = raw.split(';').next().unwrap_or(raw).trim();
        let kind = match kind_token.to_ascii_lowercase().as_str() {
            "inline" => DispositionType::Inline,
            "attachment" => DispositionType::Attachment,
            _ => DispositionType::Extension,
        };

        let rest = raw.find(';').map_or("", |i| &raw[i + 1..]);
        Self {
            kind,
            params: Parameters::parse(rest),
        }
    }
}

impl fmt::Display for ContentDisposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        for (name, value) in self.params.iter() {
            write!(f, "; {name}=\"{value}\"")?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parses_attachment_with_filename() {
        let disposition = ContentDisposition::parse(r#"attachment; filename="report.pdf""#);
        assert_eq!(disposition.kind(), DispositionType::Attachment);
        assert_eq!(disposition.filename(), Some("report.pdf"));
    }

    #[test]
    fn parses_bare_inline() {
        let disposition = ContentDisposition::parse("inline");
        assert_eq!(disposition.kind(), DispositionType::Inline);
        assert_eq!(disposition.filename(), None);
    }

    #[test]
    fn unrecognized_token_is_extension() {
        let disposition = ContentDisposition::parse("form-data");
        assert_eq!(disposition.kind(), DispositionType::Extension);
    }
}
