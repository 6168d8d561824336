//! Address field values: `EmailAddress`, `Mailbox`, and the `Address` enum
//! (a `Mailbox` or a `Group` of mailboxes), per RFC 5322 §3.4.

use std::fmt;

use crate::word::Text;

/// A bare `local-part@domain` email address, with no display name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress {
    local_part: String,
    domain: String,
}

impl EmailAddress {
    /// Splits `address` on the last `@`.
    ///
    /// Addresses without an `@` are accepted with an empty domain rather
    /// than rejected, matching header field values' general
    /// parse-never-fails contract.
    #[must_use]
    pub fn parse(address: &str) -> Self {
        address.rsplit_once('@').map_or_else(
            || Self {
                local_part: address.to_string(),
                domain: String::new(),
            },
            |(local, domain)| Self {
                local_part: local.to_string(),
                domain: domain.to_string(),
            },
        )
    }

    /// Builds an address from separate local-part and domain.
    #[must_use]
    pub fn new(local_part: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            local_part: local_part.into(),
            domain: domain.into(),
        }
    }

    /// The part before `@`.
    #[must_use]
    pub fn local_part(&self) -> &str {
        &self.local_part
    }

    /// The part after `@`.
    #[must_use]
    pub fn domain(&self) -> &str {
        &self.domain
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.domain.is_empty() {
            write!(f, "{}", self.local_part)
        } else {
            write!(f, "{}@{}", self.local_part, self.domain)
        }
    }
}

/// A single recipient: an email address with an optional display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mailbox {
    name: Option<Text>,
    email: EmailAddress,
}

impl Mailbox {
    /// Creates a mailbox with no display name.
    #[must_use]
    pub fn new(email: EmailAddress) -> Self {
        Self { name: None, email }
    }

    /// Creates a mailbox with a display name.
    #[must_use]
    pub fn with_name(name: impl Into<Text>, email: EmailAddress) -> Self {
        Self {
            name: Some(name.into()),
            email,
        }
    }

    /// The display name, if any.
    #[must_use]
    pub fn name(&self) -> Option<&Text> {
        self.name.as_ref()
    }

    /// The email address.
    #[must_use]
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }
}

impl fmt::Display for Mailbox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) if !name.to_text().is_empty() => {
                write!(f, "{} <{}>", name, self.email)
            }
            _ => write!(f, "{}", self.email),
        }
    }
}

/// A named group of mailboxes, e.g. `Undisclosed-recipients:;`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailboxGroup {
    name: Text,
    mailboxes: Vec<Mailbox>,
}

impl MailboxGroup {
    /// Creates a named, initially empty group.
    #[must_use]
    pub fn new(name: impl Into<Text>) -> Self {
        Self {
            name: name.into(),
            mailboxes: Vec::new(),
        }
    }

    /// The group name.
    #[must_use]
    pub fn name(&self) -> &Text {
        &self.name
    }

    /// The mailboxes currently in the group.
    #[must_use]
    pub fn mailboxes(&self) -> &[Mailbox] {
        &self.mailboxes
    }

    /// Appends a mailbox to the group.
    pub fn push(&mut self, mailbox: Mailbox) {
        self.mailboxes.push(mailbox);
    }
}

impl fmt::Display for MailboxGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", self.name)?;
        for (i, mailbox) in self.mailboxes.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{mailbox}")?;
        }
        write!(f, ";")
    }
}

/// A single entry in an address-list header field: either a plain mailbox
/// or a named group of mailboxes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Address {
    /// A single recipient.
    Mailbox(Mailbox),
    /// A named group of recipients.
    Group(MailboxGroup),
}

impl Address {
    /// Flattens this address to its constituent mailboxes: one for
    /// [`Address::Mailbox`], zero or more for [`Address::Group`].
    #[must_use]
    pub fn mailboxes(&self) -> Vec<&Mailbox> {
        match self {
            Self::Mailbox(mailbox) => vec![mailbox],
            Self::Group(group) => group.mailboxes().iter().collect(),
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mailbox(mailbox) => write!(f, "{mailbox}"),
            Self::Group(group) => write!(f, "{group}"),
        }
    }
}

/// A parsed `To`/`Cc`/`Bcc`/`From` style address-list value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressList {
    addresses: Vec<Address>,
}

impl AddressList {
    /// Creates an empty address list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an address.
    pub fn push(&mut self, address: Address) {
        self.addresses.push(address);
    }

    /// The addresses in this list, in order.
    #[must_use]
    pub fn addresses(&self) -> &[Address] {
        &self.addresses
    }

    /// Flattens every address (expanding groups) into a single mailbox list.
    #[must_use]
    pub fn mailboxes(&self) -> Vec<&Mailbox> {
        self.addresses.iter().flat_map(Address::mailboxes).collect()
    }

    /// Parses a comma-separated address-list header value.
    ///
    /// This is a pragmatic RFC 5322 §3.4 parser: it honors quoted display
    /// names and `name <addr>`/`group: a, b;` forms but does not implement
    /// full CFWS/obsolete-syntax tolerance. RFC 2047 encoded-words inside
    /// display names are decoded.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let mut list = Self::new();
        for entry in split_top_level(raw, ',') {
            let entry = entry.trim();
            if entry.is_empty() {
                continue;
            }
            if let Some((group_name, rest)) = entry.split_once(':') {
                let mut group = MailboxGroup::new(Text::parse(group_name.trim()));
                for member in split_top_level(rest.trim_end_matches(';'), ',') {
                    let member = member.trim();
                    if !member.is_empty() {
                        group.push(parse_mailbox(member));
                    }
                }
                list.push(Address::Group(group));
            } else {
                list.push(Address::Mailbox(parse_mailbox(entry)));
            }
        }
        list
    }
}

/// Splits `text` on `sep`, respecting `"..."` quoting and `<...>` nesting so
/// a comma in a display name or route doesn't split an address in two.
fn split_top_level(text: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut in_quotes = false;
    let mut start = 0usize;

    for (i, c) in text.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            '<' if !in_quotes => depth += 1,
            '>' if !in_quotes => depth -= 1,
            c if c == sep && !in_quotes && depth <= 0 => {
                parts.push(&text[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);
    parts
}

fn parse_mailbox(entry: &str) -> Mailbox {
    if let Some(lt) = entry.rfind('<') {
        if let Some(gt) = entry[lt..].find('>') {
            let name = entry[..lt].trim().trim_matches('"');
            let addr = &entry[lt + 1..lt + gt];
            return if name.is_empty() {
                Mailbox::new(EmailAddress::parse(addr))
            } else {
                Mailbox::with_name(Text::parse(name), EmailAddress::parse(addr))
            };
        }
    }
    Mailbox::new(EmailAddress::parse(entry.trim()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn email_address_splits_on_last_at() {
        let addr = EmailAddress::parse("user@example.com");
        assert_eq!(addr.local_part(), "user");
        assert_eq!(addr.domain(), "example.com");
    }

    #[test]
    fn mailbox_display_includes_name() {
        let mailbox = Mailbox::with_name("Alice", EmailAddress::parse("alice@example.com"));
        assert_eq!(mailbox.to_string(), "Alice <alice@example.com>");
    }

    #[test]
    fn mailbox_display_without_name_is_bare() {
        let mailbox = Mailbox::new(EmailAddress::parse("bob@example.com"));
        assert_eq!(mailbox.to_string(), "bob@example.com");
    }

    #[test]
    fn address_list_parses_plain_addresses() {
        let list = AddressList::parse("alice@example.com, bob@example.com");
        assert_eq!(list.mailboxes().len(), 2);
    }

    #[test]
    fn address_list_parses_display_names_with_commas() {
        let list = AddressList::parse(r#""Doe, Jane" <jane@example.com>, bob@example.com"#);
        assert_eq!(list.addresses().len(), 2);
        assert_eq!(
            list.mailboxes()[0].name().map(Text::to_text),
            Some("Doe, Jane".to_string())
        );
    }

    #[test]
    fn address_list_parses_a_group() {
        let list = AddressList::parse("Undisclosed-recipients: ;");
        assert_eq!(list.addresses().len(), 1);
        assert!(list.mailboxes().is_empty());
    }

    #[test]
    fn address_list_decodes_encoded_word_names() {
        let list = AddressList::parse("=?utf-8?Q?Jos=C3=A9?= <jose@example.com>");
        assert_eq!(
            list.mailboxes()[0].name().map(Text::to_text),
            Some("Jos\u{e9}".to_string())
        );
    }
}
