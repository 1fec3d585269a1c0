//! Destructive extraction of a heading and the content that follows it.

use crate::dom::{ArenaDom, ArenaNodeId};
use crate::error::{Error, Result};

/// Detach `anchor` and its following siblings up to the next element with the
/// same tag, returning them in document order with `anchor` first.
///
/// The nodes are moved out of `parent`: each returned id is the root of a
/// detached subtree. Text between elements is consumed like any other
/// sibling. When no same-tag sibling follows, everything after `anchor` is
/// taken.
///
/// Fails with [`Error::Structure`] if `anchor` is not a child of `parent`.
pub fn extract_section(
    dom: &mut ArenaDom,
    parent: ArenaNodeId,
    anchor: ArenaNodeId,
) -> Result<Vec<ArenaNodeId>> {
    if dom.parent(anchor) != Some(parent) {
        return Err(Error::Structure(format!(
            "node {} is not a child of node {}",
            anchor.0, parent.0
        )));
    }

    let tag = dom.element_name(anchor).cloned();
    let mut block = vec![anchor];

    let mut next = dom.next_sibling(anchor);
    while let Some(sibling) = next {
        if tag.is_some() && dom.element_name(sibling) == tag.as_ref() {
            break;
        }
        next = dom.next_sibling(sibling);
        dom.detach(sibling);
        block.push(sibling);
    }

    dom.detach(anchor);
    Ok(block)
}
