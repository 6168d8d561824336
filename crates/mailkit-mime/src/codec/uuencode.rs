//! Unix-to-Unix encoding: `begin`/`end` framing, legacy but still seen on
//! messages generated by old Unix mailers.

use std::fmt::Write as _;

const LINE_DATA_BYTES: usize = 45;

/// Uuencode content-transfer-encoding.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuencodeCodec;

impl UuencodeCodec {
    /// Encodes `data` as a full `begin`/`end` framed uuencode block.
    ///
    /// `mode` is the octal permission mode written on the `begin` line
    /// (traditionally `644`), `filename` the name carried alongside it.
    #[must_use]
    pub fn encode(data: &[u8], filename: &str, mode: &str) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "begin {mode} {filename}\r");

        for chunk in data.chunks(LINE_DATA_BYTES) {
            out.push(length_char(chunk.len()) as char);
            for group in chunk.chunks(3) {
                encode_group(group, &mut out);
            }
            out.push_str("\r\n");
        }

        out.push_str(&(length_char(0) as char).to_string());
        out.push_str("\r\n");
        out.push_str("end\r\n");
        out
    }

    /// Decodes a `begin`/`end` framed uuencode block, returning the
    /// recovered bytes. Lines outside the `begin`/`end` markers, or with a
    /// malformed length byte, are skipped rather than rejected.
    #[must_use]
    pub fn decode(text: &str) -> Vec<u8> {
        let mut out = Vec::new();
        let mut in_body = false;

        for line in text.lines() {
            let line = line.trim_end_matches('\r');
            if !in_body {
                if line.starts_with("begin ") {
                    in_body = true;
                }
                continue;
            }
            if line == "end" {
                break;
            }
            let Some(first) = line.as_bytes().first() else {
                continue;
            };
            let len = decode_length_char(*first);
            if len == 0 {
                continue;
            }
            decode_line(&line[1..], len, &mut out);
        }

        out
    }
}

const fn length_char(n: usize) -> u8 {
    (n as u8 & 0x3F) + 0x20
}

const fn decode_length_char(b: u8) -> usize {
    ((b.wrapping_sub(0x20)) & 0x3F) as usize
}

fn encode_group(group: &[u8], out: &mut String) {
    let b0 = group.first().copied().unwrap_or(0);
    let b1 = group.get(1).copied().unwrap_or(0);
    let b2 = group.get(2).copied().unwrap_or(0);

    let c0 = b0 >> 2;
    let c1 = ((b0 & 0x03) << 4) | (b1 >> 4);
    let c2 = ((b1 & 0x0F) << 2) | (b2 >> 6);
    let c3 = b2 & 0x3F;

    for c in [c0, c1, c2, c3] {
        out.push(uu_char(c));
    }
}

const fn uu_char(c: u8) -> char {
    let v = (c & 0x3F) + 0x20;
    // uuencode maps the 6-bit zero value to ` ` only in some dialects; the
    // historical convention (and every example in the wild) uses `` ` ``.
    if v == 0x20 { '`' } else { v as char }
}

fn decode_line(encoded: &str, declared_len: usize, out: &mut Vec<u8>) {
    let bytes: Vec<u8> = encoded
        .bytes()
        .map(|b| if b == b'`' { 0x20 } else { b })
        .map(|b| b.wrapping_sub(0x20) & 0x3F)
        .collect();

    let mut decoded = Vec::with_capacity(bytes.len() / 4 * 3 + 3);
    for group in bytes.chunks(4) {
        if group.len() < 2 {
            break;
        }
        let g0 = group[0];
        let g1 = group[1];
        let g2 = group.get(2).copied().unwrap_or(0);
        let g3 = group.get(3).copied().unwrap_or(0);

        decoded.push((g0 << 2) | (g1 >> 4));
        if group.len() > 2 {
            decoded.push((g1 << 4) | (g2 >> 2));
        }
        if group.len() > 3 {
            decoded.push((g2 << 6) | g3);
        }
    }

    decoded.truncate(declared_len);
    out.extend_from_slice(&decoded);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn length_char_matches_spec_formula() {
        assert_eq!(length_char(0), b' ');
        assert_eq!(length_char(45), b'M');
    }

    #[test]
    fn round_trips_short_payload() {
        let data = b"Hello, uuencode world! This is a test.";
        let encoded = UuencodeCodec::encode(data, "test.txt", "644");
        assert!(encoded.starts_with("begin 644 test.txt"));
        assert!(encoded.trim_end().ends_with("end"));
        let decoded = UuencodeCodec::decode(&encoded);
        assert_eq!(decoded, data);
    }

    #[test]
    fn round_trips_multi_line_payload() {
        let data: Vec<u8> = (0u8..=200).collect();
        let encoded = UuencodeCodec::encode(&data, "bin.dat", "644");
        let decoded = UuencodeCodec::decode(&encoded);
        assert_eq!(decoded, data);
    }

    #[test]
    fn decode_ignores_text_outside_frame() {
        let text = "some preamble\nbegin 644 f\r\n`\r\nend\r\ntrailer\n";
        assert_eq!(UuencodeCodec::decode(text), Vec::<u8>::new());
    }
}
