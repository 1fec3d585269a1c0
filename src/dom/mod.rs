//! Mutable HTML tree used by the page transformer.
//!
//! HTML produced by a [`MarkupRenderer`](crate::render::MarkupRenderer) is
//! parsed into an [`ArenaDom`] through an injected [`HtmlParser`]. The bundled
//! [`Html5everParser`] is error tolerant: malformed markup is recovered the
//! way a browser would, never reported as a failure.
//!
//! # Example
//!
//! ```
//! use rstpage::dom::{Html5everParser, HtmlParser};
//!
//! let dom = Html5everParser.parse("<p>Hello<p>World").unwrap();
//! let body = dom.find_by_tag("body").unwrap();
//! assert_eq!(dom.inner_html(body), "<p>Hello</p><p>World</p>");
//! ```

mod arena;
mod serialize;
mod tree_sink;

pub use arena::{
    ArenaDom, ArenaNode, ArenaNodeData, ArenaNodeId, Attribute, ChildrenIter, attr_name,
    html_name,
};
pub use serialize::NodeRef;

use html5ever::driver::ParseOpts;
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;

use crate::error::{Error, Result};
use tree_sink::ArenaSink;

/// Turns an HTML string into a mutable tree.
pub trait HtmlParser {
    /// Parse HTML text into a document tree.
    fn parse(&self, html: &str) -> Result<ArenaDom>;

    /// Parse raw bytes, failing only when they are not valid UTF-8.
    fn parse_bytes(&self, bytes: &[u8]) -> Result<ArenaDom> {
        let html = std::str::from_utf8(bytes).map_err(|e| Error::Parse(e.to_string()))?;
        self.parse(html)
    }
}

/// Permissive HTML5 parser backed by html5ever.
#[derive(Debug, Clone, Copy, Default)]
pub struct Html5everParser;

impl HtmlParser for Html5everParser {
    fn parse(&self, html: &str) -> Result<ArenaDom> {
        let sink = ArenaSink::new();
        let result = parse_document(sink, ParseOpts::default())
            .from_utf8()
            .one(html.as_bytes());
        Ok(result.into_dom())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bytes_rejects_invalid_utf8() {
        let err = Html5everParser
            .parse_bytes(&[b'<', b'p', b'>', 0xff, 0xfe])
            .unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn test_parse_bytes_accepts_utf8() {
        let dom = Html5everParser
            .parse_bytes("<p>caf\u{e9}</p>".as_bytes())
            .unwrap();
        let p = dom.find_by_tag("p").unwrap();
        assert_eq!(dom.deep_text(p), "caf\u{e9}");
    }
}
