use tracing::debug;

use crate::fragment::{Fragment, NodeId, Tag, TARGET_ATTR};
use crate::matcher;
use crate::settings::Settings;
use crate::toggle::{
    Toggle, ToggleRegistry, GLYPH_CLOSED, ICON_CLASS, PANE_CLASS, TOGGLE_ID_ATTR,
};

/// The link toggle transformer: the post-processor the host render pipeline
/// invokes once per rendered fragment.
///
/// For every candidate link whose context satisfies the match predicate it
/// mutates the tree in place (a toggle icon immediately before the link, a
/// hidden content pane after the link's paragraph) and registers the pair
/// in the toggle registry so the host can route clicks. Mutation and
/// registration are the only output channels.
pub fn process(
    fragment: &mut Fragment,
    root: NodeId,
    source_path: &str,
    settings: Settings,
    toggles: &ToggleRegistry,
) {
    // Collect before mutating: inserted icon glyphs must not skew the
    // paragraph-start comparison for later links in the same paragraph.
    let links = matcher::qualifying_links(fragment, root, settings.match_mode());
    let attached = links.len();

    for link in links {
        let Some(parent) = fragment.parent(link) else {
            continue;
        };

        let icon = fragment.create_element(Tag::Span);
        fragment.add_class(icon, ICON_CLASS);
        fragment.replace_text(icon, GLYPH_CLOSED);
        if fragment.insert_before(icon, link).is_err() {
            continue;
        }

        let pane = fragment.create_element(Tag::Div);
        fragment.add_class(pane, PANE_CLASS);
        fragment.set_hidden(pane, true);
        if fragment.parent(parent).is_some() {
            // Directly after the paragraph, inside its parent.
            let _ = fragment.insert_after(pane, parent);
        } else {
            // Unparented paragraph: fall back to the processed subtree root.
            fragment.append_child(root, pane);
        }

        let target = fragment.attr(link, TARGET_ATTR).map(str::to_string);
        let id = toggles.register(Toggle::new(icon, pane, target, source_path.to_string()));
        fragment.set_attr(icon, TOGGLE_ID_ATTR, id.as_str());
    }

    debug!(source = source_path, attached, "toggle transformer pass complete");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fragment::INTERNAL_LINK_CLASS;
    use crate::toggle::ToggleId;

    fn link_paragraph(frag: &mut Fragment, lead: &str, target: &str, tail: &str) -> NodeId {
        let p = frag.create_element(Tag::P);
        frag.append_child(frag.root(), p);
        if !lead.is_empty() {
            let t = frag.create_text(lead);
            frag.append_child(p, t);
        }
        let a = frag.create_element(Tag::A);
        frag.add_class(a, INTERNAL_LINK_CLASS);
        frag.set_attr(a, TARGET_ATTR, target);
        let t = frag.create_text(target);
        frag.append_child(a, t);
        frag.append_child(p, a);
        let tail_node = frag.create_text(tail);
        frag.append_child(p, tail_node);
        p
    }

    fn icons(frag: &Fragment) -> Vec<NodeId> {
        frag.descendants(frag.root())
            .into_iter()
            .filter(|&id| frag.has_class(id, ICON_CLASS))
            .collect()
    }

    #[test]
    fn attaches_icon_before_link_and_pane_after_paragraph() {
        let mut frag = Fragment::new();
        let p = link_paragraph(&mut frag, "", "Note A", " leads to more detail.");
        let toggles = ToggleRegistry::new();

        let root = frag.root();
        process(&mut frag, root, "/Source.md", Settings::default(), &toggles);

        assert_eq!(toggles.len(), 1);
        let icon = icons(&frag)[0];
        assert_eq!(frag.children(p)[0], icon, "icon sits before the link");
        assert_eq!(frag.text_content(icon), GLYPH_CLOSED);

        let root_children = frag.children(frag.root());
        let pane = root_children[1];
        assert!(frag.has_class(pane, PANE_CLASS));
        assert!(frag.is_hidden(pane));
        assert_eq!(frag.text_content(pane), "");

        let id = ToggleId::from(frag.attr(icon, TOGGLE_ID_ATTR).unwrap());
        let toggle = toggles.get(&id).unwrap();
        assert_eq!(toggle.icon, icon);
        assert_eq!(toggle.pane, pane);
        assert_eq!(toggle.target.as_deref(), Some("Note A"));
        assert_eq!(toggle.source, "/Source.md");
    }

    #[test]
    fn mid_paragraph_link_gets_nothing_under_default_settings() {
        let mut frag = Fragment::new();
        link_paragraph(&mut frag, "See ", "Note A", " for detail.");
        let toggles = ToggleRegistry::new();

        let root = frag.root();
        process(&mut frag, root, "/Source.md", Settings::default(), &toggles);

        assert!(toggles.is_empty());
        assert!(icons(&frag).is_empty());
    }

    #[test]
    fn anywhere_mode_attaches_independent_toggles_per_link() {
        let mut frag = Fragment::new();
        let p = frag.create_element(Tag::P);
        frag.append_child(frag.root(), p);
        for target in ["Note A", "Note B"] {
            let a = frag.create_element(Tag::A);
            frag.add_class(a, INTERNAL_LINK_CLASS);
            frag.set_attr(a, TARGET_ATTR, target);
            let t = frag.create_text(target);
            frag.append_child(a, t);
            frag.append_child(p, a);
            let gap = frag.create_text(" and ");
            frag.append_child(p, gap);
        }

        let mut settings = Settings::default();
        settings.set_match_only_at_start(false);
        let toggles = ToggleRegistry::new();
        let root = frag.root();
        process(&mut frag, root, "/Source.md", settings, &toggles);

        assert_eq!(toggles.len(), 2);
        assert_eq!(icons(&frag).len(), 2);
    }

    #[test]
    fn list_items_are_left_untouched() {
        let mut frag = Fragment::new();
        let ul = frag.create_element(Tag::Ul);
        frag.append_child(frag.root(), ul);
        let li = frag.create_element(Tag::Li);
        frag.append_child(ul, li);
        let a = frag.create_element(Tag::A);
        frag.add_class(a, INTERNAL_LINK_CLASS);
        frag.set_attr(a, TARGET_ATTR, "Note A");
        let t = frag.create_text("Note A");
        frag.append_child(a, t);
        frag.append_child(li, a);

        let toggles = ToggleRegistry::new();
        let root = frag.root();
        process(&mut frag, root, "/Source.md", Settings::default(), &toggles);

        assert!(toggles.is_empty());
        assert!(icons(&frag).is_empty());
    }

    #[test]
    fn link_without_target_attr_registers_targetless_toggle() {
        let mut frag = Fragment::new();
        let p = frag.create_element(Tag::P);
        frag.append_child(frag.root(), p);
        let a = frag.create_element(Tag::A);
        frag.add_class(a, INTERNAL_LINK_CLASS);
        let t = frag.create_text("Orphan");
        frag.append_child(a, t);
        frag.append_child(p, a);

        let toggles = ToggleRegistry::new();
        let root = frag.root();
        process(&mut frag, root, "/Source.md", Settings::default(), &toggles);

        assert_eq!(toggles.len(), 1);
        let icon = icons(&frag)[0];
        let id = ToggleId::from(frag.attr(icon, TOGGLE_ID_ATTR).unwrap());
        assert_eq!(toggles.get(&id).unwrap().target, None);
    }
}
