use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag as MdTag, TagEnd};

use notefold_core::fragment::{Fragment, NodeId, Tag, INTERNAL_LINK_CLASS, TARGET_ATTR};
use notefold_core::wikilink;

/// Render markdown into `container`, splitting text runs around wikilinks so
/// `[[Target]]` becomes an `a.internal-link` anchor carrying `data-target`.
///
/// Code spans and fenced code arrive as dedicated events and are appended
/// verbatim, so wikilinks inside code are never linkified. Unmapped block
/// constructs (tables, images, footnotes) are treated as transparent: their
/// textual content still lands in the tree.
pub fn render_markdown_into(fragment: &mut Fragment, container: NodeId, markdown: &str) {
    let parser = Parser::new_ext(markdown, Options::empty());
    let mut stack: Vec<NodeId> = vec![container];
    let mut in_code_block = false;
    // pulldown-cmark splits inline text at bracket boundaries (brackets are
    // link candidates), so "[[Note A]]" arrives as five separate text
    // events. Buffer consecutive inline text and scan the whole run when
    // the surrounding structure changes.
    let mut run = String::new();

    for event in parser {
        let top = *stack.last().unwrap_or(&container);
        match event {
            Event::Start(tag) => {
                flush_text_run(fragment, top, &mut run);
                let node = match tag {
                    MdTag::Paragraph => Some(fragment.create_element(Tag::P)),
                    MdTag::Heading { level, .. } => {
                        Some(fragment.create_element(Tag::Heading(heading_rank(level))))
                    }
                    MdTag::List(Some(_)) => Some(fragment.create_element(Tag::Ol)),
                    MdTag::List(None) => Some(fragment.create_element(Tag::Ul)),
                    MdTag::Item => Some(fragment.create_element(Tag::Li)),
                    MdTag::Emphasis => Some(fragment.create_element(Tag::Em)),
                    MdTag::Strong => Some(fragment.create_element(Tag::Strong)),
                    MdTag::BlockQuote(_) => Some(fragment.create_element(Tag::Blockquote)),
                    MdTag::CodeBlock(_) => {
                        in_code_block = true;
                        Some(fragment.create_element(Tag::Pre))
                    }
                    MdTag::Link { dest_url, .. } => {
                        let a = fragment.create_element(Tag::A);
                        fragment.set_attr(a, "href", dest_url.to_string());
                        Some(a)
                    }
                    _ => None,
                };
                match node {
                    Some(id) => {
                        fragment.append_child(top, id);
                        stack.push(id);
                    }
                    // Transparent container: keep nesting balanced.
                    None => stack.push(top),
                }
            }
            Event::End(end) => {
                flush_text_run(fragment, top, &mut run);
                if matches!(end, TagEnd::CodeBlock) {
                    in_code_block = false;
                }
                if stack.len() > 1 {
                    stack.pop();
                }
            }
            Event::Text(text) => {
                if in_code_block {
                    let t = fragment.create_text(text.to_string());
                    fragment.append_child(top, t);
                } else {
                    run.push_str(&text);
                }
            }
            Event::Code(code) => {
                flush_text_run(fragment, top, &mut run);
                let el = fragment.create_element(Tag::Code);
                let t = fragment.create_text(code.to_string());
                fragment.append_child(el, t);
                fragment.append_child(top, el);
            }
            Event::SoftBreak => {
                run.push(' ');
            }
            Event::HardBreak => {
                flush_text_run(fragment, top, &mut run);
                let br = fragment.create_element(Tag::Br);
                fragment.append_child(top, br);
            }
            Event::Rule => {
                flush_text_run(fragment, top, &mut run);
                let hr = fragment.create_element(Tag::Hr);
                fragment.append_child(top, hr);
            }
            Event::Html(html) | Event::InlineHtml(html) => {
                flush_text_run(fragment, top, &mut run);
                let t = fragment.create_text(html.to_string());
                fragment.append_child(top, t);
            }
            _ => {
                flush_text_run(fragment, top, &mut run);
            }
        }
    }

    let top = *stack.last().unwrap_or(&container);
    flush_text_run(fragment, top, &mut run);
}

fn flush_text_run(fragment: &mut Fragment, parent: NodeId, run: &mut String) {
    if run.is_empty() {
        return;
    }
    let text = std::mem::take(run);
    append_text_with_wikilinks(fragment, parent, &text);
}

fn heading_rank(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

fn append_text_with_wikilinks(fragment: &mut Fragment, parent: NodeId, text: &str) {
    let spans = wikilink::scan_wikilinks(text);
    let mut cursor = 0;

    for span in spans {
        if span.start > cursor {
            let t = fragment.create_text(&text[cursor..span.start]);
            fragment.append_child(parent, t);
        }
        let a = fragment.create_element(Tag::A);
        fragment.add_class(a, INTERNAL_LINK_CLASS);
        fragment.set_attr(a, TARGET_ATTR, span.target);
        let label = fragment.create_text(span.display);
        fragment.append_child(a, label);
        fragment.append_child(parent, a);
        cursor = span.end;
    }

    if cursor < text.len() {
        let t = fragment.create_text(&text[cursor..]);
        fragment.append_child(parent, t);
    }
}

/// Print a fragment subtree as indented text, one node per line. Used by the
/// CLI to show the rendered reading view.
pub fn dump(fragment: &Fragment, root: NodeId) -> String {
    let mut out = String::new();
    dump_node(fragment, root, 0, &mut out);
    out
}

fn dump_node(fragment: &Fragment, node: NodeId, depth: usize, out: &mut String) {
    for _ in 0..depth {
        out.push_str("  ");
    }
    if let Some(text) = fragment.text(node) {
        out.push('"');
        out.push_str(text);
        out.push_str("\"\n");
        return;
    }
    out.push_str(&tag_name(fragment.tag(node).unwrap_or(Tag::Div)));
    for class in fragment.classes(node) {
        out.push('.');
        out.push_str(class);
    }
    if fragment.is_hidden(node) {
        out.push_str(" [hidden]");
    }
    out.push('\n');
    for &child in fragment.children(node) {
        dump_node(fragment, child, depth + 1, out);
    }
}

fn tag_name(tag: Tag) -> String {
    match tag {
        Tag::Div => "div".to_string(),
        Tag::P => "p".to_string(),
        Tag::Span => "span".to_string(),
        Tag::A => "a".to_string(),
        Tag::Ul => "ul".to_string(),
        Tag::Ol => "ol".to_string(),
        Tag::Li => "li".to_string(),
        Tag::Heading(rank) => format!("h{rank}"),
        Tag::Em => "em".to_string(),
        Tag::Strong => "strong".to_string(),
        Tag::Code => "code".to_string(),
        Tag::Pre => "pre".to_string(),
        Tag::Blockquote => "blockquote".to_string(),
        Tag::Hr => "hr".to_string(),
        Tag::Br => "br".to_string(),
    }
}
