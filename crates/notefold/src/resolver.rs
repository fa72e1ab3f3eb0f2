use notefold_core::host::{LinkResolver, NoteHandle};

use crate::vault::{Vault, VaultError};

/// Resolves wikilink targets against the scanned vault.
///
/// Algorithm, in priority order:
/// 1. Relative: the target resolved from the source note's directory,
///    case-insensitive.
/// 2. Absolute fallback: `/{target}.md` from the vault root,
///    case-insensitive.
///
/// Only markdown notes exist in the entry list, so resolution is
/// markdown-only by construction. The entry list is a snapshot taken when
/// the reading view opens; there is no file-watching.
#[derive(Debug)]
pub struct VaultResolver {
    entries: Vec<String>,
}

impl VaultResolver {
    pub fn new(entries: Vec<String>) -> Self {
        Self { entries }
    }

    pub fn from_vault(vault: &Vault) -> Result<Self, VaultError> {
        Ok(Self::new(vault.scan()?))
    }
}

/// Append `.md` unless the name already carries it.
fn ensure_md_extension(path: &str) -> String {
    if path.to_ascii_lowercase().ends_with(".md") {
        path.to_string()
    } else {
        format!("{path}.md")
    }
}

/// Resolve a target relative to the directory containing `source`.
/// Returns an absolute vault path with `.md` extension.
///
/// Example: `resolve_relative("/Notes/Source.md", "../Ideas")` → `/Ideas.md`.
pub fn resolve_relative(source: &str, target: &str) -> String {
    let last_slash = source.rfind('/').unwrap_or(0);
    let dir = &source[..last_slash];
    let mut segments: Vec<&str> = dir.split('/').filter(|s| !s.is_empty()).collect();

    for part in target.split('/') {
        if part == ".." {
            if !segments.is_empty() {
                segments.pop();
            }
        } else if part != "." && !part.is_empty() {
            segments.push(part);
        }
    }

    if segments.is_empty() {
        // Edge case: resolved to the root with no filename left
        "/.md".to_string()
    } else {
        ensure_md_extension(&format!("/{}", segments.join("/")))
    }
}

impl LinkResolver for VaultResolver {
    fn resolve(&self, target: &str, source: &str) -> Option<NoteHandle> {
        let relative = resolve_relative(source, target);
        let absolute = ensure_md_extension(&format!("/{target}"));

        let lower_relative = relative.to_lowercase();
        let lower_absolute = absolute.to_lowercase();

        let mut absolute_match: Option<&String> = None;

        for entry in &self.entries {
            let lower_entry = entry.to_lowercase();

            // Priority 1: relative match, return immediately
            if lower_entry == lower_relative {
                return Some(NoteHandle::new(entry.clone()));
            }

            // Priority 2: absolute match, saved as fallback
            if absolute_match.is_none() && lower_entry == lower_absolute {
                absolute_match = Some(entry);
            }
        }

        absolute_match.map(|entry| NoteHandle::new(entry.clone()))
    }
}
