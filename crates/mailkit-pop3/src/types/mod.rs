//! Core POP3 types: mailbox status, scan listings, and the greeting banner.

/// Mailbox summary returned by STAT: message count and total octets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MailboxStatus {
    /// Number of messages in the mailbox.
    pub count: u32,
    /// Total size of the mailbox in octets.
    pub size: u64,
}

/// One line of a LIST response: a message number and its size in octets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanListing {
    /// 1-based message number.
    pub number: u32,
    /// Message size in octets.
    pub size: u64,
}

/// One line of a UIDL response: a message number and its unique id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniqueId {
    /// 1-based message number.
    pub number: u32,
    /// Server-assigned unique identifier, stable across sessions.
    pub uid: String,
}

/// The server greeting, with the APOP timestamp banner extracted if present.
///
/// RFC 1939 §7: a server that supports APOP includes a unique "banner" in
/// angle brackets as part of its greeting, e.g.
/// `+OK POP3 server ready <1896.697170952@dbc.mtview.ca.us>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Greeting {
    /// Full greeting text (after `+OK `).
    pub text: String,
    /// The `<...>` banner, if the server advertises APOP support.
    pub timestamp_banner: Option<String>,
}

impl Greeting {
    /// Parses a greeting line, extracting an APOP timestamp banner if present.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let banner = text.find('<').and_then(|start| {
            text[start..]
                .find('>')
                .map(|end| text[start..=start + end].to_string())
        });

        Self {
            text: text.to_string(),
            timestamp_banner: banner,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn greeting_extracts_timestamp_banner() {
        let greeting = Greeting::parse("POP3 server ready <1896.697170952@dbc.mtview.ca.us>");
        assert_eq!(
            greeting.timestamp_banner.as_deref(),
            Some("<1896.697170952@dbc.mtview.ca.us>")
        );
    }

    #[test]
    fn greeting_without_banner() {
        let greeting = Greeting::parse("POP3 server ready");
        assert_eq!(greeting.timestamp_banner, None);
    }
}
