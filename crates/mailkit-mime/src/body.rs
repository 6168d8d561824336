//! The body-part tree: [`ContentHandler`] (the body's raw bytes, however
//! they were sourced), [`Body`] (a leaf's encoded content or a multipart
//! node's children/boundary/prolog/epilog), and [`BodyPart`] (a `Header` +
//! `Body` pair, non-owning-linked to its parent).

use std::sync::{Arc, Weak};

use crate::content_type::ContentType;
use crate::encoding::Encoding;
use crate::header::Header;

/// The raw bytes of a leaf body, independent of how they were obtained.
///
/// Everything this crate parses comes from an in-memory buffer, so only
/// the inline variants are populated by the parser; the streamed variants
/// exist so a caller building a message can hand over a large attachment
/// without copying it into this type up front.
#[derive(Debug, Clone)]
pub enum ContentHandler {
    /// Bytes already in memory, still in their wire (encoded) form.
    Inline(Arc<[u8]>),
    /// Bytes sourced from elsewhere, with a known total length.
    Streamed {
        /// The data, already read into memory by the caller.
        data: Arc<[u8]>,
        /// The length the caller asserted ahead of time.
        length: u64,
    },
    /// Bytes sourced from elsewhere, with no length known in advance
    /// (e.g. the tail of a streamed IMAP literal).
    StreamedUnknownLength(Arc<[u8]>),
}

impl ContentHandler {
    /// Wraps an in-memory buffer.
    #[must_use]
    pub fn inline(data: impl Into<Arc<[u8]>>) -> Self {
        Self::Inline(data.into())
    }

    /// The underlying bytes, regardless of variant.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        match self {
            Self::Inline(data) | Self::StreamedUnknownLength(data) => data,
            Self::Streamed { data, .. } => data,
        }
    }

    /// The byte length, if known up front.
    #[must_use]
    pub fn length(&self) -> Option<u64> {
        match self {
            Self::Inline(data) => Some(data.len() as u64),
            Self::Streamed { length, .. } => Some(*length),
            Self::StreamedUnknownLength(_) => None,
        }
    }
}

/// A body's content: either a leaf's encoded bytes, or a multipart node's
/// children plus the text surrounding them.
#[derive(Debug, Clone)]
pub enum Body {
    /// A leaf body: its wire-encoded bytes and the encoding applied to them.
    Leaf {
        /// The encoded bytes as found on (or destined for) the wire.
        content: ContentHandler,
        /// The `Content-Transfer-Encoding` applied to `content`.
        encoding: Encoding,
    },
    /// A `multipart/*` body: the MIME boundary and its child parts, plus
    /// the (usually ignored) text before the first and after the last
    /// boundary delimiter.
    Multipart {
        /// The `boundary` parameter value, without the leading `--`.
        boundary: String,
        /// Text before the first boundary line; traditionally
        /// "This is a multi-part message in MIME format."
        prolog: String,
        /// Text after the closing boundary line; normally empty.
        epilog: String,
        /// The child parts, in document order.
        children: Vec<Arc<BodyPart>>,
    },
}

impl Body {
    /// Creates a leaf body.
    #[must_use]
    pub fn leaf(content: ContentHandler, encoding: Encoding) -> Self {
        Self::Leaf { content, encoding }
    }

    /// Creates an empty multipart body.
    #[must_use]
    pub fn multipart(boundary: impl Into<String>) -> Self {
        Self::Multipart {
            boundary: boundary.into(),
            prolog: String::new(),
            epilog: String::new(),
            children: Vec::new(),
        }
    }

    /// Decodes a leaf body's content through its transfer encoding. Returns
    /// `None` for a multipart body, which has no content of its own.
    #[must_use]
    pub fn decoded_bytes(&self) -> Option<Vec<u8>> {
        match self {
            Self::Leaf { content, encoding } => Some(encoding.decode(content.bytes())),
            Self::Multipart { .. } => None,
        }
    }

    /// The child parts of a multipart body, empty for a leaf.
    #[must_use]
    pub fn children(&self) -> &[Arc<BodyPart>] {
        match self {
            Self::Multipart { children, .. } => children,
            Self::Leaf { .. } => &[],
        }
    }

    /// Returns true if this is a `Multipart` body.
    #[must_use]
    pub const fn is_multipart(&self) -> bool {
        matches!(self, Self::Multipart { .. })
    }
}

/// A node in the MIME tree: a [`Header`] and a [`Body`], with a non-owning
/// back-link to the parent part (if any).
///
/// The parent link is `Weak` rather than owning so the tree has no
/// reference cycles; [`BodyPart::reparent`] is how a part built separately
/// (e.g. an attachment constructed on its own) is spliced into a tree.
#[derive(Debug)]
pub struct BodyPart {
    header: Header,
    body: Body,
    parent: std::sync::RwLock<Weak<BodyPart>>,
}

impl BodyPart {
    /// Creates a new, unparented body part.
    #[must_use]
    pub fn new(header: Header, body: Body) -> Self {
        Self {
            header,
            body,
            parent: std::sync::RwLock::new(Weak::new()),
        }
    }

    /// This part's header.
    #[must_use]
    pub const fn header(&self) -> &Header {
        &self.header
    }

    /// This part's body.
    #[must_use]
    pub const fn body(&self) -> &Body {
        &self.body
    }

    /// This part's `Content-Type`, or `text/plain` if absent (RFC 2045 §5.2's
    /// default).
    #[must_use]
    pub fn content_type(&self) -> ContentType {
        self.header.value("Content-Type").map_or_else(
            ContentType::text_plain,
            |value| {
                if let crate::header_field::FieldValue::MediaType(ct) = value {
                    ct.clone()
                } else {
                    ContentType::text_plain()
                }
            },
        )
    }

    /// The currently-linked parent part, if this part has been attached to
    /// a tree and the parent is still alive.
    #[must_use]
    pub fn parent(&self) -> Option<Arc<Self>> {
        self.parent.read().ok().and_then(|guard| guard.upgrade())
    }

    /// Re-links this part's parent pointer.
    ///
    /// Called by whatever is assembling the tree (the message parser, or a
    /// builder attaching an existing part to a new multipart node) after
    /// the parent `Arc` exists; a freshly constructed part has no parent
    /// until this is called.
    pub fn reparent(&self, parent: &Arc<Self>) {
        if let Ok(mut guard) = self.parent.write() {
            *guard = Arc::downgrade(parent);
        }
    }

    /// Walks up the parent chain and returns the 1-based section path
    /// (IMAP-style, e.g. `[1, 2, 3]` for `BODY[1.2.3]`) from the root to
    /// this part, or an empty path if this part IS the root.
    #[must_use]
    pub fn section_path(self: &Arc<Self>) -> Vec<usize> {
        let mut path = Vec::new();
        let mut current = Arc::clone(self);
        while let Some(parent) = current.parent() {
            let index = parent
                .body
                .children()
                .iter()
                .position(|child| Arc::ptr_eq(child, &current))
                .map_or(0, |i| i + 1);
            path.push(index);
            current = parent;
        }
        path.reverse();
        path
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn leaf(text: &str) -> Arc<BodyPart> {
        let mut header = Header::new();
        header.add("Content-Type", "text/plain; charset=utf-8");
        Arc::new(BodyPart::new(
            header,
            Body::leaf(ContentHandler::inline(text.as_bytes().to_vec()), Encoding::SevenBit),
        ))
    }

    #[test]
    fn leaf_body_decodes_through_encoding() {
        let content = ContentHandler::inline(b"aGVsbG8=".to_vec());
        let body = Body::leaf(content, Encoding::Base64);
        assert_eq!(body.decoded_bytes().unwrap(), b"hello");
    }

    #[test]
    fn multipart_body_has_no_decoded_bytes() {
        let body = Body::multipart("abc");
        assert!(body.decoded_bytes().is_none());
    }

    #[test]
    fn reparent_links_child_to_parent_and_section_path() {
        let child1 = leaf("one");
        let child2 = leaf("two");

        let mut header = Header::new();
        header.add("Content-Type", "multipart/mixed; boundary=abc");
        let body = Body::Multipart {
            boundary: "abc".to_string(),
            prolog: String::new(),
            epilog: String::new(),
            children: vec![Arc::clone(&child1), Arc::clone(&child2)],
        };
        let parent = Arc::new(BodyPart::new(header, body));
        child1.reparent(&parent);
        child2.reparent(&parent);

        assert!(child1.parent().is_some());
        assert_eq!(child1.section_path(), vec![1]);
        assert_eq!(child2.section_path(), vec![2]);
        assert!(parent.section_path().is_empty());
    }

    #[test]
    fn content_type_defaults_to_text_plain() {
        let part = BodyPart::new(Header::new(), Body::leaf(ContentHandler::inline(Vec::new()), Encoding::SevenBit));
        assert_eq!(part.content_type().main_type(), "text");
    }
}
