use regex::Regex;
use std::sync::LazyLock;

// Compile regex once, reuse across calls
static WIKILINK_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[\[([^\]]+)\]\]").unwrap());

static FENCED_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```[^\n]*\n.*?```|~~~[^\n]*\n.*?~~~").unwrap());

static INLINE_CODE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`[^`]*`").unwrap());

/// A wikilink occurrence inside a text run.
///
/// `start`/`end` are byte offsets of the whole `[[...]]` span so callers can
/// split the surrounding text around it. `target` is the trimmed page name
/// (anchor and alias stripped); `display` is what the reader sees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WikilinkSpan {
    pub target: String,
    pub display: String,
    pub start: usize,
    pub end: usize,
}

/// Split wikilink inner text into (target, anchor, alias).
///
/// `"Note#Section|Alias"` → `("Note", Some("Section"), Some("Alias"))`.
/// The target is trimmed; an all-whitespace target yields `None`.
pub fn parse_inner(inner: &str) -> Option<(String, Option<String>, Option<String>)> {
    let (target_and_anchor, alias) = match inner.split_once('|') {
        Some((left, right)) => (left, Some(right.to_string())),
        None => (inner, None),
    };
    let (target, anchor) = match target_and_anchor.split_once('#') {
        Some((left, right)) => (left, Some(right.to_string())),
        None => (target_and_anchor, None),
    };
    let target = target.trim();
    if target.is_empty() {
        return None;
    }
    Some((target.to_string(), anchor, alias))
}

/// Byte ranges covered by fenced code blocks or inline code.
fn build_excluded_ranges(text: &str) -> Vec<(usize, usize)> {
    let mut ranges = Vec::new();
    for m in FENCED_CODE_RE.find_iter(text) {
        ranges.push((m.start(), m.end()));
    }
    for m in INLINE_CODE_RE.find_iter(text) {
        ranges.push((m.start(), m.end()));
    }
    ranges
}

fn is_excluded(offset: usize, excluded: &[(usize, usize)]) -> bool {
    excluded.iter().any(|&(start, end)| offset >= start && offset < end)
}

/// Scan a text run for wikilinks, preserving byte positions.
///
/// Matches inside fenced code blocks or inline code are skipped. Empty
/// targets (`[[]]`, `[[ ]]`, `[[#anchor]]`) yield no span. The display text
/// is the alias when present, otherwise the target (anchor stripped),
/// matching how the reading view labels the anchor.
pub fn scan_wikilinks(text: &str) -> Vec<WikilinkSpan> {
    let excluded = build_excluded_ranges(text);
    let mut spans = Vec::new();

    for cap in WIKILINK_RE.captures_iter(text) {
        let full = cap.get(0).expect("capture 0 always present");
        if is_excluded(full.start(), &excluded) {
            continue;
        }

        let inner = &cap[1];
        let Some((target, _anchor, alias)) = parse_inner(inner) else {
            continue;
        };

        let display = match alias {
            Some(a) if !a.trim().is_empty() => a.trim().to_string(),
            _ => target.clone(),
        };

        spans.push(WikilinkSpan {
            target,
            display,
            start: full.start(),
            end: full.end(),
        });
    }

    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    // === parse_inner ===

    #[test]
    fn splits_plain_target() {
        assert_eq!(
            parse_inner("Note"),
            Some(("Note".to_string(), None, None))
        );
    }

    #[test]
    fn splits_anchor() {
        assert_eq!(
            parse_inner("Note#Section"),
            Some(("Note".to_string(), Some("Section".to_string()), None))
        );
    }

    #[test]
    fn splits_alias() {
        assert_eq!(
            parse_inner("Note|Display Text"),
            Some(("Note".to_string(), None, Some("Display Text".to_string())))
        );
    }

    #[test]
    fn splits_anchor_and_alias() {
        assert_eq!(
            parse_inner("Note#Section|Display"),
            Some((
                "Note".to_string(),
                Some("Section".to_string()),
                Some("Display".to_string())
            ))
        );
    }

    #[test]
    fn rejects_empty_target() {
        assert_eq!(parse_inner("   "), None);
        assert_eq!(parse_inner("#Section"), None);
    }

    #[test]
    fn preserves_relative_segments() {
        assert_eq!(
            parse_inner("../Ideas"),
            Some(("../Ideas".to_string(), None, None))
        );
    }

    // === scan_wikilinks ===

    #[test]
    fn scans_simple_wikilink() {
        let spans = scan_wikilinks("[[Note]] follows");
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].target, "Note");
        assert_eq!(spans[0].display, "Note");
        assert_eq!(spans[0].start, 0);
        assert_eq!(spans[0].end, 8);
    }

    #[test]
    fn returns_empty_for_plain_text() {
        assert!(scan_wikilinks("plain text").is_empty());
    }

    #[test]
    fn scans_multiple_with_positions() {
        let spans = scan_wikilinks("[[A]] then [[B]]");
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].target, "A");
        assert_eq!((spans[0].start, spans[0].end), (0, 5));
        assert_eq!(spans[1].target, "B");
        assert_eq!((spans[1].start, spans[1].end), (11, 16));
    }

    #[test]
    fn alias_becomes_display_text() {
        let spans = scan_wikilinks("[[Note A|the first note]]");
        assert_eq!(spans[0].target, "Note A");
        assert_eq!(spans[0].display, "the first note");
    }

    #[test]
    fn anchor_is_stripped_from_display_and_target() {
        let spans = scan_wikilinks("[[Note#Section]]");
        assert_eq!(spans[0].target, "Note");
        assert_eq!(spans[0].display, "Note");
    }

    #[test]
    fn anchor_with_alias_displays_the_alias() {
        let spans = scan_wikilinks("[[Note#Section|see this part]]");
        assert_eq!(spans[0].target, "Note");
        assert_eq!(spans[0].display, "see this part");
    }

    #[test]
    fn ignores_empty_brackets() {
        assert!(scan_wikilinks("[[]]").is_empty());
    }

    #[test]
    fn skips_links_in_fenced_code() {
        let spans = scan_wikilinks("```\n[[CodeLink]]\n```\nOutside [[RealLink]]");
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].target, "RealLink");
    }

    #[test]
    fn skips_links_in_inline_code() {
        let spans = scan_wikilinks("See `[[Fake]]` but [[Real]]");
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].target, "Real");
    }
}
