//! Section-wrapper flattening.

use crate::dom::{ArenaDom, ArenaNode, ArenaNodeId};

/// Class that marks a section wrapper `<div>`.
pub const SECTION_CLASS: &str = "section";

/// Check whether a node is a `<div class="section">` wrapper.
pub fn is_section_wrapper(node: &ArenaNode) -> bool {
    node.is_element_named("div") && node.has_class(SECTION_CLASS)
}

/// Replace every section wrapper below `root` with its own children.
///
/// The wrapper's `id` moves to its first element child, which is the section
/// heading in rendered output. Wrappers are unwound one at a time, always
/// taking the first one left in document order, so nesting of any depth ends
/// up flat with content order unchanged.
///
/// Returns the number of wrappers removed; a second call returns 0.
pub fn flatten_sections(dom: &mut ArenaDom, root: ArenaNodeId) -> usize {
    let mut removed = 0;

    while let Some(wrapper) = dom.find_descendant(root, is_section_wrapper) {
        let first_element = dom.element_children(wrapper).next();
        if let Some(id) = dom.remove_attr(wrapper, "id")
            && let Some(heading) = first_element
        {
            dom.set_attr(heading, "id", id);
        }

        let children: Vec<_> = dom.children(wrapper).collect();
        for child in children {
            dom.insert_before(wrapper, child);
        }
        dom.detach(wrapper);
        removed += 1;
    }

    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Html5everParser, HtmlParser};

    fn flattened(html: &str) -> (String, usize) {
        let mut dom = Html5everParser.parse(html).unwrap();
        let body = dom.find_by_tag("body").unwrap();
        let removed = flatten_sections(&mut dom, body);
        (dom.inner_html(body), removed)
    }

    #[test]
    fn test_wrapper_id_moves_to_heading() {
        let (html, removed) =
            flattened("<div class=\"section\" id=\"usage\"><h2>Usage</h2><p>Run it.</p></div>");
        assert_eq!(html, "<h2 id=\"usage\">Usage</h2><p>Run it.</p>");
        assert_eq!(removed, 1);
    }

    #[test]
    fn test_leading_whitespace_does_not_take_id() {
        let (html, _) = flattened("<div class=\"section\" id=\"a\">\n<h2>A</h2>\n</div>");
        assert_eq!(html, "\n<h2 id=\"a\">A</h2>\n");
    }

    #[test]
    fn test_three_levels_of_nesting() {
        let (html, removed) = flattened(
            "<div class=\"section\" id=\"a\"><h2>A</h2>\
             <div class=\"section\" id=\"b\"><h3>B</h3>\
             <div class=\"section\" id=\"c\"><h4>C</h4><p>deep</p></div>\
             <p>after c</p></div>\
             <p>after b</p></div><p>tail</p>",
        );
        assert_eq!(
            html,
            "<h2 id=\"a\">A</h2><h3 id=\"b\">B</h3><h4 id=\"c\">C</h4><p>deep</p>\
             <p>after c</p><p>after b</p><p>tail</p>"
        );
        assert_eq!(removed, 3);
    }

    #[test]
    fn test_siblings_keep_order() {
        let (html, _) = flattened(
            "<div class=\"section\" id=\"x\"><h2>X</h2></div>\
             <div class=\"section\" id=\"y\"><h2>Y</h2></div>",
        );
        assert_eq!(html, "<h2 id=\"x\">X</h2><h2 id=\"y\">Y</h2>");
    }

    #[test]
    fn test_second_pass_is_noop() {
        let mut dom = Html5everParser
            .parse("<div class=\"section\" id=\"a\"><h2>A</h2><p>x</p></div>")
            .unwrap();
        let body = dom.find_by_tag("body").unwrap();

        assert_eq!(flatten_sections(&mut dom, body), 1);
        let once = dom.inner_html(body);
        assert_eq!(flatten_sections(&mut dom, body), 0);
        assert_eq!(dom.inner_html(body), once);
    }

    #[test]
    fn test_other_divs_are_left_alone() {
        let (html, removed) = flattened("<div class=\"note\"><p>keep</p></div>");
        assert_eq!(html, "<div class=\"note\"><p>keep</p></div>");
        assert_eq!(removed, 0);
    }

    #[test]
    fn test_section_class_is_matched_as_token() {
        let (html, removed) = flattened(
            "<div class=\"sections\"><p>keep</p></div>\
             <span class=\"section\">span</span>\
             <div class=\"wide section\" id=\"w\"><h2>W</h2></div>",
        );
        assert_eq!(
            html,
            "<div class=\"sections\"><p>keep</p></div>\
             <span class=\"section\">span</span><h2 id=\"w\">W</h2>"
        );
        assert_eq!(removed, 1);
    }

    #[test]
    fn test_wrapper_without_id() {
        let (html, _) = flattened("<div class=\"section\"><h2>A</h2></div>");
        assert_eq!(html, "<h2>A</h2>");
    }
}
