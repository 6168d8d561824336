//! [`FieldValue`]: a header field's value, parsed into the richest type its
//! field name implies rather than kept as an opaque string. [`HeaderField`]
//! pairs a field name with its parsed value.

use std::fmt;

use crate::address::AddressList;
use crate::content_disposition::ContentDisposition;
use crate::content_type::ContentType;
use crate::date::HeaderDate;
use crate::encoding::Encoding;
use crate::media_type::Parameters;
use crate::message_id::{MessageId, MessageIdSequence};
use crate::word::Text;

/// The parsed value of a header field.
///
/// Variants map 1:1 to the structured field types email actually uses;
/// [`FieldValue::Text`] and [`FieldValue::Parameterized`] are the fallback
/// for everything else (an unstructured phrase, or a bare token with
/// `; key=value` parameters respectively).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// A single mailbox, e.g. `Sender`.
    Mailbox(Box<crate::address::Mailbox>),
    /// An address list, e.g. `To`/`Cc`/`Bcc`/`From`/`Reply-To`.
    AddressList(AddressList),
    /// `Content-Type`.
    MediaType(ContentType),
    /// `Content-Transfer-Encoding`.
    Encoding(Encoding),
    /// `Content-Disposition`.
    ContentDisposition(ContentDisposition),
    /// A bare token with RFC 2231/generic `; key=value` parameters, e.g.
    /// `Content-Language`-like extension fields this crate doesn't have a
    /// dedicated type for.
    Parameterized {
        /// The leading token before any `;`.
        value: String,
        /// The parsed parameter map.
        params: Parameters,
    },
    /// An unstructured, RFC 2047-decodable phrase, e.g. `Subject`, `Comments`.
    Text(Text),
    /// `Date`/`Resent-Date`.
    Date(Option<HeaderDate>),
    /// `Message-ID`/`In-Reply-To` (single form)/`Content-ID`.
    MessageId(MessageId),
    /// `References`/`In-Reply-To` (multi-id form).
    MessageIdSequence(MessageIdSequence),
    /// `Return-Path`, a bracketed source route or `<>`.
    Path(String),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mailbox(mailbox) => write!(f, "{mailbox}"),
            Self::AddressList(list) => {
                let rendered: Vec<String> = list.addresses().iter().map(ToString::to_string).collect();
                write!(f, "{}", rendered.join(", "))
            }
            Self::MediaType(ct) => write!(f, "{ct}"),
            Self::Encoding(encoding) => write!(f, "{encoding}"),
            Self::ContentDisposition(disposition) => write!(f, "{disposition}"),
            Self::Parameterized { value, params } => {
                write!(f, "{value}")?;
                for (key, v) in params.iter() {
                    write!(f, "; {key}={v}")?;
                }
                Ok(())
            }
            Self::Text(text) => write!(f, "{}", text.to_header_value()),
            Self::Date(Some(date)) => write!(f, "{}", date.to_header_value()),
            Self::Date(None) => Ok(()),
            Self::MessageId(id) => write!(f, "{id}"),
            Self::MessageIdSequence(seq) => write!(f, "{seq}"),
            Self::Path(path) => write!(f, "{path}"),
        }
    }
}

/// A single header line: a field name paired with its parsed value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderField {
    name: String,
    value: FieldValue,
}

impl HeaderField {
    /// Builds a field directly from an already-parsed value.
    #[must_use]
    pub fn new(name: impl Into<String>, value: FieldValue) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    /// The field name, as originally cased.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The parsed value.
    #[must_use]
    pub const fn value(&self) -> &FieldValue {
        &self.value
    }

    /// Parses `name: raw-value` into the richest [`FieldValue`] the field
    /// name implies. Unknown field names fall back to [`FieldValue::Text`].
    #[must_use]
    pub fn parse(name: &str, raw: &str) -> Self {
        let value = dispatch(name, raw.trim());
        Self {
            name: name.to_string(),
            value,
        }
    }

    /// Renders this field as a `Name: value` line (without trailing CRLF).
    #[must_use]
    pub fn to_line(&self) -> String {
        format!("{}: {}", self.name, self.value)
    }
}

fn dispatch(name: &str, raw: &str) -> FieldValue {
    match name.to_ascii_lowercase().as_str() {
        "to" | "cc" | "bcc" | "from" | "reply-to" | "resent-to" | "resent-cc" | "resent-bcc" => {
            FieldValue::AddressList(AddressList::parse(raw))
        }
        "sender" | "resent-sender" => {
            let list = AddressList::parse(raw);
            list.mailboxes().first().map_or_else(
                || FieldValue::Text(Text::parse(raw)),
                |mailbox| FieldValue::Mailbox(Box::new((*mailbox).clone())),
            )
        }
        "content-type" => FieldValue::MediaType(ContentType::parse(raw)),
        "content-transfer-encoding" => FieldValue::Encoding(Encoding::parse(raw)),
        "content-disposition" => FieldValue::ContentDisposition(ContentDisposition::parse(raw)),
        "date" | "resent-date" => FieldValue::Date(HeaderDate::parse(raw)),
        "message-id" | "content-id" | "in-reply-to" if !raw.contains(' ') => {
            FieldValue::MessageId(MessageId::parse(raw))
        }
        "references" | "in-reply-to" => FieldValue::MessageIdSequence(MessageIdSequence::parse(raw)),
        "return-path" => FieldValue::Path(raw.to_string()),
        _ if raw.contains(';') => {
            let (value, rest) = raw.split_once(';').unwrap_or((raw, ""));
            FieldValue::Parameterized {
                value: value.trim().to_string(),
                params: Parameters::parse(rest),
            }
        }
        _ => FieldValue::Text(Text::parse(raw)),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parses_address_list_fields() {
        let field = HeaderField::parse("To", "alice@example.com, bob@example.com");
        assert!(matches!(field.value(), FieldValue::AddressList(_)));
    }

    #[test]
    fn parses_content_type_field() {
        let field = HeaderField::parse("Content-Type", "text/plain; charset=utf-8");
        let FieldValue::MediaType(ct) = field.value() else {
            panic!("expected MediaType");
        };
        assert_eq!(ct.charset(), Some("utf-8"));
    }

    #[test]
    fn parses_message_id_field() {
        let field = HeaderField::parse("Message-ID", "<abc@example.com>");
        assert!(matches!(field.value(), FieldValue::MessageId(_)));
    }

    #[test]
    fn parses_references_as_sequence() {
        let field = HeaderField::parse("References", "<a@b> <c@d>");
        assert!(matches!(field.value(), FieldValue::MessageIdSequence(_)));
    }

    #[test]
    fn unknown_field_falls_back_to_text() {
        let field = HeaderField::parse("X-Mailer", "MailKit 1.0");
        assert!(matches!(field.value(), FieldValue::Text(_)));
    }

    #[test]
    fn subject_decodes_encoded_words() {
        let field = HeaderField::parse("Subject", "=?utf-8?Q?Jos=C3=A9?=");
        let FieldValue::Text(text) = field.value() else {
            panic!("expected Text");
        };
        assert_eq!(text.to_text(), "Jos\u{e9}");
    }

    #[test]
    fn to_line_renders_name_and_value() {
        let field = HeaderField::parse("Content-Transfer-Encoding", "base64");
        assert_eq!(field.to_line(), "Content-Transfer-Encoding: base64");
    }
}
