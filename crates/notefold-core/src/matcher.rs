use tracing::debug;

use crate::fragment::{Fragment, NodeId, Tag};
use crate::settings::MatchMode;

/// Decide whether a single internal link qualifies as a toggle anchor.
///
/// A link qualifies iff its immediate parent is a paragraph whose own parent
/// is not a list item, and, under [`MatchMode::StartOnly`], it is the first
/// internal link of that paragraph and the paragraph's trimmed text begins
/// with the link's trimmed display text verbatim. List items never match;
/// the old leading-bullet variant is gone.
pub fn link_qualifies(fragment: &Fragment, link: NodeId, mode: MatchMode) -> bool {
    let Some(parent) = fragment.parent(link) else {
        debug!(?link, "skipping detached link");
        return false;
    };

    match fragment.tag(parent) {
        Some(Tag::P) => {}
        other => {
            debug!(?link, parent_tag = ?other, "skipping link: parent is not a paragraph");
            return false;
        }
    }

    if let Some(grandparent) = fragment.parent(parent) {
        if fragment.tag(grandparent) == Some(Tag::Li) {
            debug!(?link, "skipping link: paragraph sits inside a list item");
            return false;
        }
    }

    let link_text = fragment.text_content(link);
    let link_text = link_text.trim();
    if link_text.is_empty() {
        debug!(?link, "skipping link with empty display text");
        return false;
    }

    match mode {
        MatchMode::Anywhere => true,
        MatchMode::StartOnly => {
            let first = fragment.internal_links(parent).into_iter().next();
            if first != Some(link) {
                return false;
            }
            let parent_text = fragment.text_content(parent);
            parent_text.trim().starts_with(link_text)
        }
    }
}

/// All internal links under `root` that qualify as toggle anchors, in
/// document order. Collected before any mutation so inserted icon text never
/// skews the paragraph-start comparison.
pub fn qualifying_links(fragment: &Fragment, root: NodeId, mode: MatchMode) -> Vec<NodeId> {
    fragment
        .internal_links(root)
        .into_iter()
        .filter(|&link| link_qualifies(fragment, link, mode))
        .collect()
}
