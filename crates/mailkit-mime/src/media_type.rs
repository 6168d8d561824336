//! `MediaType` (the `Content-Type` value's type/subtype pair) and its
//! parameter map, including RFC 2231 extended-parameter continuation and
//! charset/language tagging.

use std::collections::BTreeMap;
use std::fmt;

/// A MIME type/subtype pair, e.g. `text/plain` or `multipart/mixed`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct MediaType {
    r#type: String,
    subtype: String,
}

impl MediaType {
    /// Creates a media type from separate type and subtype.
    #[must_use]
    pub fn new(r#type: impl Into<String>, subtype: impl Into<String>) -> Self {
        Self {
            r#type: r#type.into().to_ascii_lowercase(),
            subtype: subtype.into().to_ascii_lowercase(),
        }
    }

    /// Parses a `type/subtype` string, ignoring any trailing `;
    /// parameters`.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let main = raw.split(';').next().unwrap_or(raw).trim();
        main.split_once('/').map_or_else(
            || Self::new(main, ""),
            |(t, s)| Self::new(t, s),
        )
    }

    /// The top-level type (e.g. `"text"`).
    #[must_use]
    pub fn r#type(&self) -> &str {
        &self.r#type
    }

    /// The subtype (e.g. `"plain"`).
    #[must_use]
    pub fn subtype(&self) -> &str {
        &self.subtype
    }

    /// Returns true if this is any `multipart/*` type.
    #[must_use]
    pub fn is_multipart(&self) -> bool {
        self.r#type == "multipart"
    }

    /// Returns true if this is `message/rfc822` or `message/global`.
    #[must_use]
    pub fn is_message(&self) -> bool {
        self.r#type == "message"
    }

    /// `text/plain`, the default when a part carries no `Content-Type`.
    #[must_use]
    pub fn text_plain() -> Self {
        Self::new("text", "plain")
    }

    /// `application/octet-stream`, the fallback for unrecognized types.
    #[must_use]
    pub fn octet_stream() -> Self {
        Self::new("application", "octet-stream")
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.r#type, self.subtype)
    }
}

/// A `Content-Type`/`Content-Disposition` parameter map, handling RFC 2231
/// extended parameters (`name*0*=`, `name*=charset'lang'value`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parameters {
    values: BTreeMap<String, String>,
}

impl Parameters {
    /// Creates an empty parameter map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a plain parameter value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into().to_ascii_lowercase(), value.into());
    }

    /// Gets a parameter's value by name (case-insensitive).
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    /// Iterates parameters in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Parses the `; name=value; ...` tail of a structured header field,
    /// reassembling RFC 2231 continuations (`name*0=`, `name*1=`, ...) and
    /// decoding the `charset'language'pct-encoded` extended form.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let mut continuations: BTreeMap<String, BTreeMap<u32, String>> = BTreeMap::new();
        let mut params = Self::new();

        for segment in split_parameters(raw) {
            let Some((key, value)) = segment.split_once('=') else {
                continue;
            };
            let key = key.trim();
            let value = unquote(value.trim());

            if let Some(star) = key.find('*') {
                let base = &key[..star];
                let suffix = &key[star + 1..];
                if let Ok(index) = suffix.trim_end_matches('*').parse::<u32>() {
                    let is_extended = suffix.ends_with('*');
                    let piece = if is_extended && index == 0 {
                        decode_rfc2231_initial(&value)
                    } else if is_extended {
                        percent_decode(&value)
                    } else {
                        value
                    };
                    continuations
                        .entry(base.to_ascii_lowercase())
                        .or_default()
                        .insert(index, piece);
                } else {
                    // `name*=charset'lang'value` with no continuation index.
                    params.set(base, decode_rfc2231_initial(&value));
                }
            } else {
                params.set(key, value);
            }
        }

        for (name, pieces) in continuations {
            let joined: String = pieces.into_values().collect();
            params.set(name, joined);
        }

        params
    }
}

fn decode_rfc2231_initial(value: &str) -> String {
    let mut parts = value.splitn(3, '\'');
    let _charset = parts.next();
    let _language = parts.next();
    parts.next().map_or_else(|| percent_decode(value), percent_decode)
}

fn percent_decode(value: &str) -> String {
    let mut out = Vec::with_capacity(value.len());
    let bytes = value.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            if let (Some(&hi), Some(&lo)) = (bytes.get(i + 1), bytes.get(i + 2)) {
                if let (Some(h), Some(l)) = (hex_digit(hi), hex_digit(lo)) {
                    out.push(h * 16 + l);
                    i += 3;
                    continue;
                }
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex_digit(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'A'..=b'F' => Some(b - b'A' + 10),
        b'a'..=b'f' => Some(b - b'a' + 10),
        _ => None,
    }
}

fn unquote(value: &str) -> String {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
        .to_string()
}

/// Splits a `; a=b; c=d` tail on top-level `;`, respecting `"..."` quoting.
fn split_parameters(raw: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut in_quotes = false;
    let mut start = 0usize;

    for (i, c) in raw.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            ';' if !in_quotes => {
                parts.push(raw[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(raw[start..].trim());
    parts.into_iter().filter(|s| !s.is_empty()).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parses_type_and_subtype() {
        let mt = MediaType::parse("text/html; charset=utf-8");
        assert_eq!(mt.r#type(), "text");
        assert_eq!(mt.subtype(), "html");
    }

    #[test]
    fn parameters_parse_simple_pairs() {
        let params = Parameters::parse(r#"charset=utf-8; boundary="abc123""#);
        assert_eq!(params.get("charset"), Some("utf-8"));
        assert_eq!(params.get("boundary"), Some("abc123"));
    }

    #[test]
    fn parameters_reassemble_rfc2231_continuations() {
        let raw = r#"filename*0="hello "; filename*1="world.txt""#;
        let params = Parameters::parse(raw);
        assert_eq!(params.get("filename"), Some("hello world.txt"));
    }

    #[test]
    fn parameters_decode_rfc2231_extended_value() {
        let raw = "filename*=UTF-8''%e2%82%ac%20rates.txt";
        let params = Parameters::parse(raw);
        assert_eq!(params.get("filename"), Some("\u{20ac} rates.txt"));
    }

    #[test]
    fn is_multipart_checks_top_level_type() {
        assert!(MediaType::parse("multipart/mixed").is_multipart());
        assert!(!MediaType::parse("text/plain").is_multipart());
    }
}
