use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;

use notefold_core::host::{NoteHandle, NoteStore, StoreError};

#[derive(Debug, Error)]
pub enum VaultError {
    #[error("io error under vault root: {0}")]
    Io(#[from] std::io::Error),
    #[error("path {0} escapes the vault root")]
    OutsideRoot(PathBuf),
}

/// A directory of markdown notes.
///
/// Notes are addressed by vault-relative paths with a leading slash
/// (`/Notes/Ideas.md`), matching the path form the resolver produces.
#[derive(Debug)]
pub struct Vault {
    root: PathBuf,
}

impl Vault {
    pub fn open(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// All markdown note paths in the vault, sorted. Dotfiles and
    /// dot-directories are skipped.
    pub fn scan(&self) -> Result<Vec<String>, VaultError> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }
        let mut entries = Vec::new();
        collect_markdown_files(&self.root, &self.root, &mut entries)?;
        entries.sort();
        Ok(entries)
    }

    /// Read the full text of a note by vault-relative path.
    pub fn read_note(&self, rel: &str) -> Result<String, VaultError> {
        Ok(fs::read_to_string(self.abs(rel))?)
    }

    fn abs(&self, rel: &str) -> PathBuf {
        self.root.join(rel.trim_start_matches('/'))
    }
}

fn collect_markdown_files(
    root: &Path,
    dir: &Path,
    out: &mut Vec<String>,
) -> Result<(), VaultError> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let file_name = entry.file_name().to_string_lossy().into_owned();
        if file_name.starts_with('.') {
            continue;
        }
        let path = entry.path();
        if path.is_dir() {
            collect_markdown_files(root, &path, out)?;
            continue;
        }
        if !path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("md"))
        {
            continue;
        }
        let rel = path
            .strip_prefix(root)
            .map_err(|_| VaultError::OutsideRoot(path.clone()))?
            .to_string_lossy()
            .replace('\\', "/");
        out.push(format!("/{rel}"));
    }
    Ok(())
}

#[async_trait]
impl NoteStore for Vault {
    async fn read(&self, handle: &NoteHandle) -> Result<String, StoreError> {
        Ok(fs::read_to_string(self.abs(&handle.path))?)
    }
}
