//! The reading-view pipeline: read a note, render it, attach toggles, and
//! handle icon activations.

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

use notefold_core::fragment::{Fragment, NodeId};
use notefold_core::host::{NoteRenderer, RenderError};
use notefold_core::settings::Settings;
use notefold_core::toggle::{ToggleId, ToggleRegistry, ToggleState};
use notefold_core::transformer;

use crate::config::{self, ConfigError};
use crate::render;
use crate::resolver::VaultResolver;
use crate::vault::{Vault, VaultError};

#[derive(Debug, Error)]
pub enum ViewError {
    #[error(transparent)]
    Vault(#[from] VaultError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// A note rendered for reading, together with the toggles attached to it.
///
/// The registry grows while the note is displayed: opening a toggle renders
/// the linked note into its pane, and that nested pass attaches toggles of
/// its own.
pub struct RenderedNote {
    pub fragment: Fragment,
    pub root: NodeId,
    pub source: String,
    pub toggles: ToggleRegistry,
}

/// One open vault plus the settings governing its reading view.
pub struct ReadingView {
    vault: Vault,
    resolver: VaultResolver,
    settings: Settings,
}

impl ReadingView {
    /// Open a vault, index its notes for link resolution, and load settings.
    pub fn open(root: impl Into<std::path::PathBuf>) -> Result<Self, ViewError> {
        let vault = Vault::open(root);
        let resolver = VaultResolver::from_vault(&vault)?;
        let settings = config::load_settings(vault.root());
        Ok(Self {
            vault,
            resolver,
            settings,
        })
    }

    pub fn settings(&self) -> Settings {
        self.settings
    }

    /// Flip the match-strictness setting and persist it. Takes effect on the
    /// next render pass; already-rendered notes keep their toggles.
    pub fn set_match_only_at_start(&mut self, value: bool) -> Result<(), ViewError> {
        self.settings.set_match_only_at_start(value);
        config::save_settings(self.vault.root(), &self.settings)?;
        Ok(())
    }

    /// Read and render a note into a fresh fragment with toggles attached.
    pub async fn render_note(&self, path: &str) -> Result<RenderedNote, ViewError> {
        let markdown = self.vault.read_note(path)?;
        let mut fragment = Fragment::new();
        let root = fragment.root();
        let toggles = ToggleRegistry::new();

        render::render_markdown_into(&mut fragment, root, &markdown);
        transformer::process(&mut fragment, root, path, self.settings, &toggles);
        debug!(path, toggles = toggles.len(), "rendered note");

        Ok(RenderedNote {
            fragment,
            root,
            source: path.to_string(),
            toggles,
        })
    }

    /// Handle a click on a toggle icon in a rendered note.
    pub async fn toggle(&self, note: &mut RenderedNote, id: &ToggleId) -> Option<ToggleState> {
        let RenderedNote {
            fragment, toggles, ..
        } = note;
        toggles
            .activate(id, fragment, &self.resolver, &self.vault, self)
            .await
    }
}

#[async_trait]
impl NoteRenderer for ReadingView {
    /// Pane rendering runs the same pass as top-level notes, so panes get
    /// their own toggles and the nesting recurses naturally.
    async fn render(
        &self,
        markdown: &str,
        fragment: &mut Fragment,
        container: NodeId,
        source: &str,
        toggles: &ToggleRegistry,
    ) -> Result<(), RenderError> {
        render::render_markdown_into(fragment, container, markdown);
        transformer::process(fragment, container, source, self.settings, toggles);
        Ok(())
    }
}
