//! Short-feature assembly.

use tracing::debug;

use crate::dom::{ArenaDom, ArenaNodeId, html_name};
use crate::error::{Error, Result};

use super::Feature;
use super::extract::extract_section;

/// Pull the short-features region out of `body` and split it into features.
///
/// The region starts at the first element whose `id` matches one of
/// `anchor_ids` (tried in order) and runs to the next heading of the same
/// level. Its own heading is dropped; every sub-heading and the content after
/// it becomes one [`Feature`].
pub(crate) fn extract_features(
    dom: &mut ArenaDom,
    body: ArenaNodeId,
    anchor_ids: &[String],
) -> Result<Vec<Feature>> {
    let (anchor_id, anchor) = anchor_ids
        .iter()
        .find_map(|id| dom.find_by_id(body, id).map(|node| (id, node)))
        .ok_or_else(|| {
            Error::Structure(format!(
                "short-features anchor not found (looked for id {})",
                anchor_ids.join(", ")
            ))
        })?;
    debug!(id = %anchor_id, "found short-features anchor");
    let anchor = resolve_anchor(dom, anchor);

    let parent = dom
        .parent(anchor)
        .ok_or_else(|| Error::Structure(format!("anchor #{anchor_id} has no parent")))?;
    let region = extract_section(dom, parent, anchor)?;

    let scratch = dom.create_element(html_name("div"), Vec::new());
    for node in region.into_iter().skip(1) {
        dom.append(scratch, node);
    }

    let mut features = Vec::new();
    while let Some(first) = dom.first_child(scratch) {
        if !dom.is_element(first) {
            dom.detach(first);
            continue;
        }
        let block = extract_section(dom, scratch, first)?;
        features.push(Feature {
            title: dom.inner_html(block[0]).trim().to_string(),
            body: dom.nodes_html(&block[1..]).trim().to_string(),
        });
    }

    Ok(features)
}

/// A section with several ids is preceded by empty `<span id>` markers. An
/// anchor that lands on one resolves to the heading they precede; the markers
/// themselves are removed so no trace of the region is left in the body.
fn resolve_anchor(dom: &mut ArenaDom, anchor: ArenaNodeId) -> ArenaNodeId {
    let mut current = anchor;
    while is_id_marker(dom, current)
        && let Some(next) = next_element_sibling(dom, current)
    {
        current = next;
    }

    let mut markers = Vec::new();
    let mut prev = dom.prev_sibling(current);
    while let Some(node) = prev {
        prev = dom.prev_sibling(node);
        if is_id_marker(dom, node) {
            markers.push(node);
        } else if dom.is_element(node) {
            break;
        }
    }

    for marker in markers {
        dom.detach(marker);
    }
    current
}

fn is_id_marker(dom: &ArenaDom, node: ArenaNodeId) -> bool {
    dom.get(node)
        .is_some_and(|n| n.is_element_named("span") && n.attr("id").is_some())
        && dom.first_child(node).is_none()
}

fn next_element_sibling(dom: &ArenaDom, node: ArenaNodeId) -> Option<ArenaNodeId> {
    let mut next = dom.next_sibling(node);
    while let Some(sibling) = next {
        if dom.is_element(sibling) {
            return Some(sibling);
        }
        next = dom.next_sibling(sibling);
    }
    None
}
