//! POP3 response parsing: single-line status replies and dot-terminated
//! multi-line bodies (RFC 1939 §3, §9).

use crate::error::{Error, Result};
use crate::types::{ScanListing, UniqueId};

/// A parsed single-line status reply (`+OK ...` or `-ERR ...`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReply {
    /// Whether the server reported success.
    pub ok: bool,
    /// The text following `+OK `/`-ERR `.
    pub message: String,
}

impl StatusReply {
    /// Returns `Ok(message)` for `+OK`, or `Err` wrapping the server's text for `-ERR`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Pop3Error`] if the reply was negative.
    pub fn into_result(self) -> Result<String> {
        if self.ok {
            Ok(self.message)
        } else {
            Err(Error::pop3_error(self.message))
        }
    }
}

/// Parses a single status line into a [`StatusReply`].
///
/// # Errors
///
/// Returns [`Error::Protocol`] if the line doesn't start with `+OK` or `-ERR`.
pub fn parse_status_line(line: &str) -> Result<StatusReply> {
    if let Some(rest) = line.strip_prefix("+OK") {
        Ok(StatusReply {
            ok: true,
            message: rest.trim_start().to_string(),
        })
    } else if let Some(rest) = line.strip_prefix("-ERR") {
        Ok(StatusReply {
            ok: false,
            message: rest.trim_start().to_string(),
        })
    } else {
        Err(Error::Protocol(format!("unexpected reply: {line}")))
    }
}

/// Removes byte-stuffing from one line of a multi-line response body.
///
/// A line consisting of a single `.` terminates the response and is never
/// passed to this function; a line that merely *starts* with `.` (because
/// the original content did) has that leading dot doubled by the server and
/// must be undone here.
#[must_use]
pub fn dot_unstuff(line: &str) -> &str {
    line.strip_prefix('.').unwrap_or(line)
}

/// Applies byte-stuffing to one line before it is sent as part of a
/// multi-line body, doubling a leading `.` so it isn't mistaken for the
/// terminator.
#[must_use]
pub fn dot_stuff(line: &str) -> String {
    if line.starts_with('.') {
        format!(".{line}")
    } else {
        line.to_string()
    }
}

/// Reassembles the lines of a dot-terminated multi-line response into a
/// single byte buffer (CRLF-joined, byte-stuffing undone, terminator
/// excluded).
#[must_use]
pub fn assemble_multiline(lines: &[String]) -> Vec<u8> {
    let mut buf = Vec::new();
    for line in lines {
        buf.extend_from_slice(dot_unstuff(line).as_bytes());
        buf.extend_from_slice(b"\r\n");
    }
    buf
}

/// Parses one LIST scan-listing line (`<msg-number> <size>`).
///
/// # Errors
///
/// Returns [`Error::Protocol`] if the line isn't two whitespace-separated integers.
pub fn parse_scan_listing(line: &str) -> Result<ScanListing> {
    let mut parts = line.split_whitespace();
    let number = parts
        .next()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| Error::Protocol(format!("malformed scan listing: {line}")))?;
    let size = parts
        .next()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| Error::Protocol(format!("malformed scan listing: {line}")))?;
    Ok(ScanListing { number, size })
}

/// Parses one UIDL line (`<msg-number> <unique-id>`).
///
/// # Errors
///
/// Returns [`Error::Protocol`] if the line doesn't have two whitespace-separated fields.
pub fn parse_unique_id(line: &str) -> Result<UniqueId> {
    let mut parts = line.splitn(2, char::is_whitespace);
    let number = parts
        .next()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| Error::Protocol(format!("malformed UIDL line: {line}")))?;
    let uid = parts
        .next()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| Error::Protocol(format!("malformed UIDL line: {line}")))?
        .to_string();
    Ok(UniqueId { number, uid })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parses_ok_status() {
        let reply = parse_status_line("+OK 2 messages (320 octets)").unwrap();
        assert!(reply.ok);
        assert_eq!(reply.message, "2 messages (320 octets)");
    }

    #[test]
    fn parses_err_status() {
        let reply = parse_status_line("-ERR no such message").unwrap();
        assert!(!reply.ok);
        assert_eq!(reply.message, "no such message");
    }

    #[test]
    fn rejects_unrecognized_line() {
        assert!(parse_status_line("HELLO").is_err());
    }

    #[test]
    fn dot_unstuff_strips_single_leading_dot() {
        assert_eq!(dot_unstuff("..leading dot in body"), ".leading dot in body");
        assert_eq!(dot_unstuff("no dot here"), "no dot here");
    }

    #[test]
    fn dot_stuff_doubles_leading_dot() {
        assert_eq!(dot_stuff(".leading dot"), "..leading dot");
        assert_eq!(dot_stuff("plain line"), "plain line");
    }

    #[test]
    fn stuff_unstuff_round_trip() {
        for line in [".Dear Sir", "Subject: hi", "..already doubled"] {
            assert_eq!(dot_unstuff(&dot_stuff(line)), line);
        }
    }

    #[test]
    fn assembles_multiline_body_with_crlf() {
        let lines = vec!["Subject: hi".to_string(), "..escaped".to_string()];
        let body = assemble_multiline(&lines);
        assert_eq!(body, b"Subject: hi\r\n.escaped\r\n");
    }

    #[test]
    fn parses_scan_listing() {
        let item = parse_scan_listing("2 200").unwrap();
        assert_eq!(item.number, 2);
        assert_eq!(item.size, 200);
    }

    #[test]
    fn parses_unique_id() {
        let item = parse_unique_id("3 whqtswO00WBw418f9t5JxYwZ").unwrap();
        assert_eq!(item.number, 3);
        assert_eq!(item.uid, "whqtswO00WBw418f9t5JxYwZ");
    }
}
