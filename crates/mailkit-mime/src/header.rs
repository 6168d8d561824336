//! [`Header`]: the ordered sequence of [`HeaderField`]s at the top of a
//! message or body part.

use std::fmt;

use crate::header_field::{FieldValue, HeaderField};

/// An ordered collection of header fields.
///
/// Order is preserved because RFC 5322 attaches meaning to repeated fields
/// (e.g. `Received` trace headers) and because round-tripping a message
/// byte-for-byte requires it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Header {
    fields: Vec<HeaderField>,
}

impl Header {
    /// Creates an empty header.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a field, keeping any existing fields of the same name.
    pub fn append(&mut self, field: HeaderField) {
        self.fields.push(field);
    }

    /// Appends a field built from a name and raw value, dispatched to the
    /// richest [`FieldValue`] that name implies.
    pub fn add(&mut self, name: impl AsRef<str>, raw_value: impl AsRef<str>) {
        self.append(HeaderField::parse(name.as_ref(), raw_value.as_ref()));
    }

    /// Replaces every existing field with this name, then appends `field`.
    pub fn set(&mut self, field: HeaderField) {
        self.remove(field.name());
        self.append(field);
    }

    /// Removes every field with the given name (case-insensitive).
    pub fn remove(&mut self, name: &str) {
        self.fields.retain(|f| !f.name().eq_ignore_ascii_case(name));
    }

    /// Returns the first field with the given name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&HeaderField> {
        self.fields.iter().find(|f| f.name().eq_ignore_ascii_case(name))
    }

    /// Returns every field with the given name, in document order.
    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a HeaderField> {
        self.fields.iter().filter(move |f| f.name().eq_ignore_ascii_case(name))
    }

    /// Returns the first field's value, if present.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<&FieldValue> {
        self.get(name).map(HeaderField::value)
    }

    /// Iterates every field in document order.
    pub fn iter(&self) -> impl Iterator<Item = &HeaderField> {
        self.fields.iter()
    }

    /// Returns true if no fields are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Parses a raw header block (everything before the blank line
    /// separating headers from body), unfolding continuation lines that
    /// start with a space or tab per RFC 5322 §2.2.3.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let mut header = Self::new();
        let mut current: Option<(String, String)> = None;

        for line in raw.split("\r\n").flat_map(|l| l.split('\n')) {
            if line.is_empty() {
                break;
            }
            if (line.starts_with(' ') || line.starts_with('\t')) && current.is_some() {
                if let Some((_, value)) = current.as_mut() {
                    value.push(' ');
                    value.push_str(line.trim());
                }
                continue;
            }
            if let Some((name, value)) = current.take() {
                header.add(name, value);
            }
            if let Some((name, value)) = line.split_once(':') {
                current = Some((name.trim().to_string(), value.trim().to_string()));
            }
        }
        if let Some((name, value)) = current {
            header.add(name, value);
        }

        header
    }

    /// Renders the full header block, CRLF-terminated, including the
    /// trailing blank line that separates it from the body.
    #[must_use]
    pub fn to_wire(&self) -> String {
        let mut out = String::new();
        for field in &self.fields {
            out.push_str(&field.to_line());
            out.push_str("\r\n");
        }
        out.push_str("\r\n");
        out
    }
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_wire())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parse_unfolds_continuation_lines() {
        let raw = "Content-Type: text/plain;\r\n charset=utf-8\r\n\r\n";
        let header = Header::parse(raw);
        let FieldValue::MediaType(ct) = header.value("Content-Type").unwrap() else {
            panic!("expected MediaType");
        };
        assert_eq!(ct.charset(), Some("utf-8"));
    }

    #[test]
    fn get_all_preserves_order() {
        let mut header = Header::new();
        header.add("Received", "from a");
        header.add("Received", "from b");
        let all: Vec<_> = header.get_all("Received").collect();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].value().to_string(), "from a");
        assert_eq!(all[1].value().to_string(), "from b");
    }

    #[test]
    fn set_replaces_existing_fields() {
        let mut header = Header::new();
        header.add("Subject", "old");
        header.set(HeaderField::parse("Subject", "new"));
        assert_eq!(header.get_all("Subject").count(), 1);
        assert_eq!(header.get("Subject").unwrap().value().to_string(), "new");
    }

    #[test]
    fn to_wire_ends_with_blank_line() {
        let mut header = Header::new();
        header.add("Subject", "hi");
        assert!(header.to_wire().ends_with("\r\n\r\n"));
    }

    #[test]
    fn parse_roundtrips_multiple_fields() {
        let raw = "From: a@example.com\r\nTo: b@example.com\r\nSubject: hi\r\n\r\nbody";
        let header = Header::parse(raw);
        assert_eq!(header.iter().count(), 3);
    }
}
