//! Seams between the toggle feature and its host application.
//!
//! The core never touches storage or markdown itself; the host supplies link
//! resolution, note reads, and rendering through these traits. Errors cross
//! the seam typed, but the loader converts them to pane text locally; the
//! host only ever observes a populated or error-text pane.

use async_trait::async_trait;
use thiserror::Error;

use crate::fragment::{Fragment, NodeId};
use crate::toggle::ToggleRegistry;

/// A resolved reference to a concrete note in the host's storage.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NoteHandle {
    /// Vault-relative path with a leading slash, e.g. `/Notes/Ideas.md`.
    pub path: String,
}

impl NoteHandle {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error reading note: {0}")]
    Io(#[from] std::io::Error),
    #[error("note read failed: {0}")]
    Other(String),
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("render failed: {0}")]
    Failed(String),
}

/// Maps a link's target path reference plus the current source path to a
/// concrete note handle, or `None` when nothing in the vault matches.
pub trait LinkResolver: Send + Sync {
    fn resolve(&self, target: &str, source: &str) -> Option<NoteHandle>;
}

/// Reads a resolved note's full textual content.
#[async_trait]
pub trait NoteStore: Send + Sync {
    async fn read(&self, handle: &NoteHandle) -> Result<String, StoreError>;
}

/// Renders markdown into a container node.
///
/// Host implementations re-run their post-processing over the rendered
/// subtree, so panes can grow nested toggles of their own; new toggles are
/// registered into the passed registry. No cycle detection happens anywhere
/// on this path.
#[async_trait]
pub trait NoteRenderer: Send + Sync {
    async fn render(
        &self,
        markdown: &str,
        fragment: &mut Fragment,
        container: NodeId,
        source: &str,
        toggles: &ToggleRegistry,
    ) -> Result<(), RenderError>;
}
