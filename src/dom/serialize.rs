//! HTML serialization of arena subtrees via html5ever's serializer.

use std::collections::VecDeque;
use std::io;

use html5ever::QualName;
use html5ever::serialize::{Serialize, SerializeOpts, Serializer, TraversalScope, serialize};

use super::arena::{ArenaDom, ArenaNodeData, ArenaNodeId};

/// A borrowed view of one node that html5ever can serialize.
pub struct NodeRef<'a> {
    dom: &'a ArenaDom,
    id: ArenaNodeId,
}

impl<'a> NodeRef<'a> {
    pub fn new(dom: &'a ArenaDom, id: ArenaNodeId) -> Self {
        Self { dom, id }
    }
}

enum SerializeOp {
    Open(ArenaNodeId),
    Close(QualName),
}

impl Serialize for NodeRef<'_> {
    fn serialize<S>(&self, serializer: &mut S, traversal_scope: TraversalScope) -> io::Result<()>
    where
        S: Serializer,
    {
        let mut ops = VecDeque::new();
        match traversal_scope {
            TraversalScope::IncludeNode => ops.push_back(SerializeOp::Open(self.id)),
            TraversalScope::ChildrenOnly(_) => {
                ops.extend(self.dom.children(self.id).map(SerializeOp::Open))
            }
        }

        while let Some(op) = ops.pop_front() {
            let id = match op {
                SerializeOp::Open(id) => id,
                SerializeOp::Close(name) => {
                    serializer.end_elem(name)?;
                    continue;
                }
            };
            let Some(node) = self.dom.get(id) else {
                continue;
            };

            match &node.data {
                ArenaNodeData::Element { name, attrs } => {
                    serializer.start_elem(
                        name.clone(),
                        attrs.iter().map(|a| (&a.name, a.value.as_str())),
                    )?;
                    ops.push_front(SerializeOp::Close(name.clone()));
                    let children: Vec<_> = self.dom.children(id).collect();
                    for child in children.into_iter().rev() {
                        ops.push_front(SerializeOp::Open(child));
                    }
                }
                ArenaNodeData::Document => {
                    let children: Vec<_> = self.dom.children(id).collect();
                    for child in children.into_iter().rev() {
                        ops.push_front(SerializeOp::Open(child));
                    }
                }
                ArenaNodeData::Text(text) => serializer.write_text(text)?,
                ArenaNodeData::Comment(text) => serializer.write_comment(text)?,
                ArenaNodeData::Doctype { name, .. } => serializer.write_doctype(name)?,
            }
        }

        Ok(())
    }
}

fn serialize_with_scope(dom: &ArenaDom, id: ArenaNodeId, scope: TraversalScope) -> String {
    let mut bytes = Vec::new();
    let opts = SerializeOpts {
        traversal_scope: scope,
        ..Default::default()
    };

    serialize(&mut bytes, &NodeRef::new(dom, id), opts).expect("serialization failed");

    String::from_utf8(bytes).unwrap_or_default()
}

impl ArenaDom {
    /// Serialize a node, including its own tag, to HTML.
    pub fn outer_html(&self, id: ArenaNodeId) -> String {
        serialize_with_scope(self, id, TraversalScope::IncludeNode)
    }

    /// Serialize a node's children (but not the node's own tag) to HTML.
    pub fn inner_html(&self, id: ArenaNodeId) -> String {
        serialize_with_scope(self, id, TraversalScope::ChildrenOnly(None))
    }

    /// Serialize a sequence of sibling subtrees and concatenate the results.
    pub fn nodes_html(&self, ids: &[ArenaNodeId]) -> String {
        ids.iter().map(|&id| self.outer_html(id)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Html5everParser, HtmlParser};

    fn body_of(html: &str) -> (ArenaDom, ArenaNodeId) {
        let dom = Html5everParser.parse(html).unwrap();
        let body = dom.find_by_tag("body").unwrap();
        (dom, body)
    }

    #[test]
    fn test_outer_and_inner_html() {
        let (dom, body) = body_of(r#"<h2 id="a">Hello <em>there</em></h2>"#);
        let h2 = dom.first_child(body).unwrap();

        assert_eq!(dom.outer_html(h2), r#"<h2 id="a">Hello <em>there</em></h2>"#);
        assert_eq!(dom.inner_html(h2), "Hello <em>there</em>");
    }

    #[test]
    fn test_escapes_text_and_attributes() {
        let (dom, body) = body_of(r#"<p title="a &quot;b&quot;">x &lt; y &amp; z</p>"#);

        assert_eq!(
            dom.inner_html(body),
            r#"<p title="a &quot;b&quot;">x &lt; y &amp; z</p>"#
        );
    }

    #[test]
    fn test_void_elements() {
        let (dom, body) = body_of(r#"<p>a<br>b</p><hr class="docutils">"#);

        assert_eq!(
            dom.inner_html(body),
            r#"<p>a<br>b</p><hr class="docutils">"#
        );
    }

    #[test]
    fn test_nodes_html_concatenates() {
        let (dom, body) = body_of("<p>1</p>\n<p>2</p>");
        let nodes: Vec<_> = dom.children(body).collect();

        assert_eq!(dom.nodes_html(&nodes), "<p>1</p>\n<p>2</p>");
    }
}
