//! POP3 command builder (RFC 1939, RFC 2449 CAPA, RFC 1734 AUTH).

/// A POP3 command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// CAPA - list server capabilities.
    Capa,
    /// STLS - upgrade to TLS (RFC 2595).
    Stls,
    /// USER - identify the mailbox to access.
    User(String),
    /// PASS - authenticate with a cleartext password.
    Pass(String),
    /// APOP - authenticate with an MD5 digest, without sending the password.
    Apop {
        /// Mailbox name.
        name: String,
        /// Lowercase hex MD5 digest of the greeting banner plus the shared secret.
        digest: String,
    },
    /// AUTH - begin a SASL authentication exchange.
    Auth {
        /// IANA mechanism name.
        mechanism: String,
    },
    /// STAT - mailbox message count and size.
    Stat,
    /// LIST - scan listing for one message, or all messages.
    List(Option<u32>),
    /// UIDL - unique id for one message, or all messages.
    Uidl(Option<u32>),
    /// RETR - download a message in full.
    Retr(u32),
    /// TOP - download headers plus the first N body lines.
    Top(u32, u32),
    /// DELE - mark a message deleted.
    Dele(u32),
    /// RSET - unmark all messages deleted this session.
    Rset,
    /// NOOP - keep the connection alive.
    Noop,
    /// QUIT - commit deletions and close the connection.
    Quit,
}

impl Command {
    /// Serializes the command to its CRLF-terminated wire form.
    #[must_use]
    pub fn serialize(&self) -> Vec<u8> {
        let line = match self {
            Self::Capa => "CAPA".to_string(),
            Self::Stls => "STLS".to_string(),
            Self::User(name) => format!("USER {name}"),
            Self::Pass(password) => format!("PASS {password}"),
            Self::Apop { name, digest } => format!("APOP {name} {digest}"),
            Self::Auth { mechanism } => format!("AUTH {mechanism}"),
            Self::Stat => "STAT".to_string(),
            Self::List(Some(n)) => format!("LIST {n}"),
            Self::List(None) => "LIST".to_string(),
            Self::Uidl(Some(n)) => format!("UIDL {n}"),
            Self::Uidl(None) => "UIDL".to_string(),
            Self::Retr(n) => format!("RETR {n}"),
            Self::Top(n, lines) => format!("TOP {n} {lines}"),
            Self::Dele(n) => format!("DELE {n}"),
            Self::Rset => "RSET".to_string(),
            Self::Noop => "NOOP".to_string(),
            Self::Quit => "QUIT".to_string(),
        };

        let mut buf = line.into_bytes();
        buf.extend_from_slice(b"\r\n");
        buf
    }

    /// Returns true if a successful response to this command is a
    /// dot-terminated multi-line body rather than a single status line.
    #[must_use]
    pub const fn expects_multiline(&self) -> bool {
        matches!(
            self,
            Self::Capa
                | Self::List(None)
                | Self::Uidl(None)
                | Self::Retr(_)
                | Self::Top(_, _)
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn serializes_user_pass() {
        assert_eq!(Command::User("alice".into()).serialize(), b"USER alice\r\n");
        assert_eq!(Command::Pass("hunter2".into()).serialize(), b"PASS hunter2\r\n");
    }

    #[test]
    fn serializes_apop() {
        let cmd = Command::Apop {
            name: "mrose".to_string(),
            digest: "c4c9334bac560ecc979e58001b3e22fb".to_string(),
        };
        assert_eq!(
            cmd.serialize(),
            b"APOP mrose c4c9334bac560ecc979e58001b3e22fb\r\n"
        );
    }

    #[test]
    fn serializes_retr_and_top() {
        assert_eq!(Command::Retr(5).serialize(), b"RETR 5\r\n");
        assert_eq!(Command::Top(5, 10).serialize(), b"TOP 5 10\r\n");
    }

    #[test]
    fn serializes_list_with_and_without_argument() {
        assert_eq!(Command::List(None).serialize(), b"LIST\r\n");
        assert_eq!(Command::List(Some(2)).serialize(), b"LIST 2\r\n");
    }

    #[test]
    fn multiline_commands_are_flagged() {
        assert!(Command::Capa.expects_multiline());
        assert!(Command::Retr(1).expects_multiline());
        assert!(Command::List(None).expects_multiline());
        assert!(!Command::List(Some(1)).expects_multiline());
        assert!(!Command::Stat.expects_multiline());
    }
}
