//! `Date` header field value (RFC 5322 §3.3).

use chrono::{DateTime, FixedOffset};

/// The RFC 5322 date-time format, e.g. `Wed, 1 Jan 2025 12:00:00 +0000`.
const RFC5322_FORMAT: &str = "%a, %d %b %Y %H:%M:%S %z";

/// A parsed `Date` header field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderDate(DateTime<FixedOffset>);

impl HeaderDate {
    /// Wraps a timestamp.
    #[must_use]
    pub const fn new(value: DateTime<FixedOffset>) -> Self {
        Self(value)
    }

    /// The wrapped timestamp.
    #[must_use]
    pub const fn value(&self) -> DateTime<FixedOffset> {
        self.0
    }

    /// Parses an RFC 5322 `Date` header field value.
    ///
    /// Falls back to RFC 2822's two-digit-year form and to a handful of
    /// obsolete but common variants (missing seconds, named zone
    /// abbreviations normalized to numeric offsets are not attempted: an
    /// unparseable value yields `None` rather than a guess).
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        DateTime::parse_from_str(trimmed, RFC5322_FORMAT)
            .or_else(|_| DateTime::parse_from_rfc2822(trimmed))
            .or_else(|_| DateTime::parse_from_rfc3339(trimmed))
            .ok()
            .map(Self)
    }

    /// Renders as an RFC 5322 `Date` header field value.
    #[must_use]
    pub fn to_header_value(&self) -> String {
        self.0.format(RFC5322_FORMAT).to_string()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parses_rfc5322_date() {
        let date = HeaderDate::parse("Wed, 1 Jan 2025 12:00:00 +0000").unwrap();
        assert_eq!(date.value().format("%Y").to_string(), "2025");
    }

    #[test]
    fn round_trips_through_header_value() {
        let date = HeaderDate::parse("Mon, 15 Jun 2026 09:30:00 +0200").unwrap();
        let rendered = date.to_header_value();
        let reparsed = HeaderDate::parse(&rendered).unwrap();
        assert_eq!(date, reparsed);
    }

    #[test]
    fn unparseable_date_returns_none() {
        assert!(HeaderDate::parse("not a date").is_none());
    }
}
