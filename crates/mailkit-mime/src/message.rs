//! [`Message`]: the external, wire-level view of a MIME message. Parsing
//! and rendering go through this type; the [`crate::body`] tree underneath
//! is where the recursive structure actually lives.

use std::sync::Arc;

use rand::Rng;
use rand::distr::Alphanumeric;

use crate::body::{Body, BodyPart, ContentHandler};
use crate::content_type::ContentType;
use crate::context::ParsingContext;
use crate::encoding::{Encoding, Usage};
use crate::header::Header;
use crate::header_field::FieldValue;

/// A parsed or built MIME message: a header and a body-part tree.
#[derive(Debug, Clone)]
pub struct Message {
    root: Arc<BodyPart>,
}

impl Message {
    /// Parses a raw RFC 5322 message (header block plus body) using the
    /// default [`ParsingContext`].
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        Self::parse_with(raw, &ParsingContext::default())
    }

    /// Parses a raw message under an explicit [`ParsingContext`].
    #[must_use]
    pub fn parse_with(raw: &str, ctx: &ParsingContext) -> Self {
        Self {
            root: parse_part(raw, ctx),
        }
    }

    /// The root body part.
    #[must_use]
    pub fn root(&self) -> &Arc<BodyPart> {
        &self.root
    }

    /// The top-level header.
    #[must_use]
    pub fn header(&self) -> &Header {
        self.root.header()
    }

    /// The `Subject`, RFC 2047-decoded.
    #[must_use]
    pub fn subject(&self) -> Option<String> {
        text_field(self.header(), "Subject")
    }

    /// The raw `From` field value rendered back to text (display name(s)
    /// plus address(es)).
    #[must_use]
    pub fn from(&self) -> Option<String> {
        self.header().get("From").map(|f| f.value().to_string())
    }

    /// The raw `To` field value rendered back to text.
    #[must_use]
    pub fn to(&self) -> Option<String> {
        self.header().get("To").map(|f| f.value().to_string())
    }

    /// The `Message-ID`, if present.
    #[must_use]
    pub fn message_id(&self) -> Option<String> {
        self.header().get("Message-ID").map(|f| f.value().to_string())
    }

    /// The first `text/plain` part's decoded text, searching depth-first.
    #[must_use]
    pub fn text_part(&self) -> Option<String> {
        find_leaf_text(&self.root, "text", "plain")
    }

    /// The first `text/html` part's decoded text, searching depth-first.
    #[must_use]
    pub fn html_part(&self) -> Option<String> {
        find_leaf_text(&self.root, "text", "html")
    }

    /// Renders the message back to its wire form.
    #[must_use]
    pub fn to_wire(&self) -> String {
        render_part(&self.root)
    }
}

fn text_field(header: &Header, name: &str) -> Option<String> {
    match header.value(name)? {
        FieldValue::Text(text) => Some(text.to_text()),
        other => Some(other.to_string()),
    }
}

fn find_leaf_text(part: &Arc<BodyPart>, main_type: &str, sub_type: &str) -> Option<String> {
    let ct = part.content_type();
    if !part.body().is_multipart() && ct.main_type() == main_type && ct.sub_type() == sub_type {
        let bytes = part.body().decoded_bytes()?;
        return Some(String::from_utf8_lossy(&bytes).into_owned());
    }
    for child in part.body().children() {
        if let Some(text) = find_leaf_text(child, main_type, sub_type) {
            return Some(text);
        }
    }
    None
}

fn split_header_body(raw: &str) -> (&str, &str) {
    raw.find("\r\n\r\n").map_or_else(
        || {
            raw.find("\n\n")
                .map_or((raw, ""), |idx| (&raw[..idx], &raw[idx + 2..]))
        },
        |idx| (&raw[..idx], &raw[idx + 4..]),
    )
}

fn parse_part(raw: &str, ctx: &ParsingContext) -> Arc<BodyPart> {
    let (head, body) = split_header_body(raw);
    let header = Header::parse(head);
    let content_type = header.value("Content-Type").map_or_else(
        ContentType::text_plain,
        |value| match value {
            FieldValue::MediaType(ct) => ct.clone(),
            _ => ContentType::text_plain(),
        },
    );

    if content_type.is_multipart() {
        if let Some(boundary) = content_type.boundary() {
            let (prolog, segments, epilog) = split_multipart(body, boundary);
            let children: Vec<Arc<BodyPart>> =
                segments.iter().map(|segment| parse_part(segment, ctx)).collect();
            let body_node = Body::Multipart {
                boundary: boundary.to_string(),
                prolog,
                epilog,
                children: children.clone(),
            };
            let part = Arc::new(BodyPart::new(header, body_node));
            for child in &children {
                child.reparent(&part);
            }
            return part;
        }
        // Missing boundary: fall through to treating the whole thing as a
        // leaf, which is the only sane recovery when there's nothing to
        // split on.
    }

    let encoding = match header.value("Content-Transfer-Encoding") {
        Some(FieldValue::Encoding(encoding)) => *encoding,
        _ => Encoding::SevenBit,
    };
    let content = ContentHandler::inline(body.as_bytes().to_vec());
    Arc::new(BodyPart::new(header, Body::leaf(content, encoding)))
}

/// Splits a multipart body into its prolog, child segments, and epilog.
fn split_multipart(body: &str, boundary: &str) -> (String, Vec<String>, String) {
    let delim = format!("--{boundary}");
    let close = format!("--{boundary}--");

    let mut prolog = String::new();
    let mut segments = Vec::new();
    let mut epilog = String::new();
    let mut current = String::new();
    let mut state = 0u8; // 0 = prolog, 1 = in a part, 2 = epilog

    for line in body.split("\r\n").flat_map(|l| l.split('\n')) {
        let line = line.trim_end_matches('\r');
        if line == close {
            if state == 1 {
                segments.push(std::mem::take(&mut current));
            }
            state = 2;
            continue;
        }
        if line == delim {
            match state {
                0 => state = 1,
                1 => segments.push(std::mem::take(&mut current)),
                _ => {}
            }
            continue;
        }
        match state {
            0 => {
                prolog.push_str(line);
                prolog.push('\n');
            }
            1 => {
                current.push_str(line);
                current.push('\n');
            }
            _ => {
                epilog.push_str(line);
                epilog.push('\n');
            }
        }
    }

    (prolog, segments, epilog)
}

fn render_part(part: &Arc<BodyPart>) -> String {
    let mut out = part.header().to_wire();
    match part.body() {
        Body::Leaf { content, .. } => {
            out.push_str(&String::from_utf8_lossy(content.bytes()));
        }
        Body::Multipart {
            boundary,
            prolog,
            epilog,
            children,
        } => {
            out.push_str(prolog);
            for child in children {
                out.push_str("--");
                out.push_str(boundary);
                out.push_str("\r\n");
                out.push_str(&render_part(child));
            }
            out.push_str("--");
            out.push_str(boundary);
            out.push_str("--\r\n");
            out.push_str(epilog);
        }
    }
    out
}

/// Generates a boundary token guaranteed not to appear as a substring of
/// any child's rendered bytes, regenerating on collision.
fn unique_boundary(children: &[Arc<BodyPart>]) -> String {
    loop {
        let candidate = generate_boundary();
        let collides = children
            .iter()
            .any(|child| render_part(child).contains(&candidate));
        if !collides {
            return candidate;
        }
    }
}

fn generate_boundary() -> String {
    let suffix: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(24)
        .map(char::from)
        .collect();
    format!("----=_Part_{suffix}")
}

/// A single attachment to add to a built message.
#[derive(Debug, Clone)]
pub struct Attachment {
    filename: String,
    content_type: ContentType,
    data: Vec<u8>,
}

impl Attachment {
    /// Creates an attachment from its filename, declared content type, and bytes.
    #[must_use]
    pub fn new(filename: impl Into<String>, content_type: ContentType, data: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            content_type,
            data,
        }
    }
}

/// Builds a [`Message`] from a `From`/`To`/`Subject`/body/attachments,
/// choosing `text/plain`, `multipart/alternative`, or `multipart/mixed`
/// for the root depending on what was supplied.
#[derive(Debug, Clone, Default)]
pub struct MessageBuilder {
    header: Header,
    text: Option<String>,
    html: Option<String>,
    attachments: Vec<Attachment>,
}

impl MessageBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the `From` field.
    #[must_use]
    pub fn from(mut self, address: impl Into<String>) -> Self {
        self.header.set(crate::header_field::HeaderField::parse("From", &address.into()));
        self
    }

    /// Sets the `To` field.
    #[must_use]
    pub fn to(mut self, address: impl Into<String>) -> Self {
        self.header.set(crate::header_field::HeaderField::parse("To", &address.into()));
        self
    }

    /// Sets the `Subject` field.
    #[must_use]
    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.header
            .set(crate::header_field::HeaderField::parse("Subject", &subject.into()));
        self
    }

    /// Sets the plain-text body.
    #[must_use]
    pub fn text_body(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Sets the HTML body. Combined with [`Self::text_body`] this produces
    /// a `multipart/alternative` root.
    #[must_use]
    pub fn html_body(mut self, html: impl Into<String>) -> Self {
        self.html = Some(html.into());
        self
    }

    /// Adds an attachment.
    #[must_use]
    pub fn attach(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    /// Builds the message.
    #[must_use]
    pub fn build(mut self) -> Message {
        let body_part = self.build_body_root();

        if self.attachments.is_empty() {
            // Copy the body's own Content-Type/Content-Transfer-Encoding up
            // to the message header, since there is no wrapping multipart.
            for name in ["Content-Type", "Content-Transfer-Encoding"] {
                if let Some(field) = body_part.header().get(name) {
                    self.header.set(field.clone());
                }
            }
            return Message { root: body_part };
        }

        let mut children = vec![body_part];
        for attachment in &self.attachments {
            children.push(leaf_for_attachment(attachment));
        }

        let boundary = unique_boundary(&children);
        self.header.set(crate::header_field::HeaderField::parse(
            "Content-Type",
            &ContentType::multipart_mixed(boundary.clone()).to_string(),
        ));

        let root_body = Body::Multipart {
            boundary,
            prolog: "This is a multi-part message in MIME format.\n".to_string(),
            epilog: String::new(),
            children: children.clone(),
        };
        let root = Arc::new(BodyPart::new(self.header, root_body));
        for child in &children {
            child.reparent(&root);
        }
        Message { root }
    }

    fn build_body_root(&self) -> Arc<BodyPart> {
        match (&self.text, &self.html) {
            (Some(text), None) => leaf_for_text(text, ContentType::text_plain()),
            (None, Some(html)) => leaf_for_text(html, ContentType::text_html()),
            (Some(text), Some(html)) => {
                let text_part = leaf_for_text(text, ContentType::text_plain());
                let html_part = leaf_for_text(html, ContentType::text_html());
                let boundary = unique_boundary(&[text_part.clone(), html_part.clone()]);
                let mut header = Header::new();
                header.add("Content-Type", ContentType::multipart_alternative(boundary.clone()).to_string());
                let children = vec![text_part, html_part];
                let body = Body::Multipart {
                    boundary,
                    prolog: String::new(),
                    epilog: String::new(),
                    children: children.clone(),
                };
                let part = Arc::new(BodyPart::new(header, body));
                for child in &children {
                    child.reparent(&part);
                }
                part
            }
            (None, None) => leaf_for_text("", ContentType::text_plain()),
        }
    }
}

fn leaf_for_text(text: &str, content_type: ContentType) -> Arc<BodyPart> {
    let encoding = Encoding::recommended_for(Usage::Text);
    let mut header = Header::new();
    header.add("Content-Type", content_type.to_string());
    header.add("Content-Transfer-Encoding", encoding.to_string());
    let encoded = encoding.encode(text.as_bytes());
    Arc::new(BodyPart::new(header, Body::leaf(ContentHandler::inline(encoded), encoding)))
}

fn leaf_for_attachment(attachment: &Attachment) -> Arc<BodyPart> {
    let encoding = Encoding::recommended_for(Usage::Binary);
    let mut header = Header::new();
    header.add("Content-Type", attachment.content_type.to_string());
    header.add("Content-Transfer-Encoding", encoding.to_string());
    header.add(
        "Content-Disposition",
        format!(r#"attachment; filename="{}""#, attachment.filename),
    );
    let encoded = encoding.encode(&attachment.data);
    Arc::new(BodyPart::new(header, Body::leaf(ContentHandler::inline(encoded), encoding)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_single_part_message() {
        let raw = concat!(
            "From: sender@example.com\r\n",
            "To: recipient@example.com\r\n",
            "Subject: Test\r\n",
            "Content-Type: text/plain\r\n",
            "\r\n",
            "Hello, World!"
        );
        let message = Message::parse(raw);
        assert_eq!(message.subject(), Some("Test".to_string()));
        assert_eq!(message.text_part(), Some("Hello, World!".to_string()));
    }

    #[test]
    fn parses_multipart_alternative_and_finds_html() {
        let raw = concat!(
            "Content-Type: multipart/alternative; boundary=abc\r\n",
            "\r\n",
            "--abc\r\n",
            "Content-Type: text/plain\r\n",
            "\r\n",
            "plain version\r\n",
            "--abc\r\n",
            "Content-Type: text/html\r\n",
            "\r\n",
            "<b>html version</b>\r\n",
            "--abc--\r\n",
        );
        let message = Message::parse(raw);
        assert_eq!(message.text_part(), Some("plain version".to_string()));
        assert_eq!(message.html_part(), Some("<b>html version</b>".to_string()));
    }

    #[test]
    fn builder_produces_single_part_text_message() {
        let message = MessageBuilder::new()
            .from("sender@example.com")
            .to("recipient@example.com")
            .subject("Hi")
            .text_body("Hello, World!")
            .build();

        assert_eq!(message.subject(), Some("Hi".to_string()));
        assert_eq!(message.text_part(), Some("Hello, World!".to_string()));
    }

    #[test]
    fn builder_produces_multipart_alternative() {
        let message = MessageBuilder::new()
            .text_body("plain")
            .html_body("<p>html</p>")
            .build();

        assert_eq!(message.text_part(), Some("plain".to_string()));
        assert_eq!(message.html_part(), Some("<p>html</p>".to_string()));
    }

    #[test]
    fn builder_with_attachment_produces_multipart_mixed() {
        let message = MessageBuilder::new()
            .text_body("see attached")
            .attach(Attachment::new(
                "notes.txt",
                ContentType::new("text", "plain"),
                b"attachment body".to_vec(),
            ))
            .build();

        assert_eq!(message.text_part(), Some("see attached".to_string()));
        assert_eq!(message.root().body().children().len(), 2);
    }

    #[test]
    fn unique_boundary_avoids_colliding_with_child_content() {
        let poisoned = leaf_for_text("harmless", ContentType::text_plain());
        let boundary = unique_boundary(&[poisoned.clone()]);
        assert!(!render_part(&poisoned).contains(&boundary));

        // Force a collision by reusing a just-picked boundary as content,
        // then confirm the next pick avoids it.
        let colliding_body = format!("--{boundary}\r\nmore text");
        let colliding = leaf_for_text(&colliding_body, ContentType::text_plain());
        let next = unique_boundary(&[colliding.clone()]);
        assert_ne!(next, boundary);
        assert!(!render_part(&colliding).contains(&next));
    }

    #[test]
    fn round_trips_built_message_through_parse() {
        let built = MessageBuilder::new()
            .from("a@example.com")
            .subject("Round trip")
            .text_body("content")
            .build();
        let wire = built.to_wire();
        let reparsed = Message::parse(&wire);
        assert_eq!(reparsed.subject(), Some("Round trip".to_string()));
        assert_eq!(reparsed.text_part(), Some("content".to_string()));
    }
}
