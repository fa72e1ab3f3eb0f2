use dashmap::DashMap;
use nanoid::nanoid;
use tracing::debug;

use crate::fragment::{Fragment, NodeId};
use crate::host::{LinkResolver, NoteRenderer, NoteStore};
use crate::loader;

pub const ICON_CLASS: &str = "inline-toggle-icon";
pub const PANE_CLASS: &str = "inline-toggle-content";
pub const OPEN_CLASS: &str = "is-open";
pub const TOGGLE_ID_ATTR: &str = "data-toggle-id";

pub const GLYPH_CLOSED: &str = "▶";
pub const GLYPH_OPEN: &str = "▼";

/// Opaque identifier routing clicks from the host to a registered toggle.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ToggleId(String);

impl ToggleId {
    fn generate() -> Self {
        Self(nanoid!())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ToggleId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// The explicit state a toggle owns: whether its pane has ever been
/// populated, and whether it is currently revealed. Both flags mutate only
/// through [`ToggleRegistry::activate`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ToggleState {
    pub loaded: bool,
    pub open: bool,
}

/// One toggle: the icon/pane node pair it controls plus the link it loads.
#[derive(Clone, Debug)]
pub struct Toggle {
    pub icon: NodeId,
    pub pane: NodeId,
    /// Raw target path reference from the link; `None` makes the loader a
    /// no-op and the pane stays empty.
    pub target: Option<String>,
    /// Source path of the note the link appeared in.
    pub source: String,
    pub state: ToggleState,
}

impl Toggle {
    pub fn new(icon: NodeId, pane: NodeId, target: Option<String>, source: String) -> Self {
        Self {
            icon,
            pane,
            target,
            source,
            state: ToggleState::default(),
        }
    }
}

/// Registry of live toggles for one rendered note.
///
/// Backed by a `DashMap` behind `&self` so a render pass triggered from an
/// in-flight activation (nested toggles in a freshly loaded pane) can
/// register new entries without re-entrancy trouble. Entries die with the
/// rendered note; nothing is ever explicitly torn down.
#[derive(Debug, Default)]
pub struct ToggleRegistry {
    inner: DashMap<ToggleId, Toggle>,
}

impl ToggleRegistry {
    pub fn new() -> Self {
        Self {
            inner: DashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Register a toggle under a fresh id.
    pub fn register(&self, toggle: Toggle) -> ToggleId {
        let id = ToggleId::generate();
        self.inner.insert(id.clone(), toggle);
        id
    }

    /// Snapshot of a registered toggle.
    pub fn get(&self, id: &ToggleId) -> Option<Toggle> {
        self.inner.get(id).map(|t| t.clone())
    }

    /// Ids of all registered toggles (unordered).
    pub fn ids(&self) -> Vec<ToggleId> {
        self.inner.iter().map(|entry| entry.key().clone()).collect()
    }

    /// Handle a click on a toggle's icon.
    ///
    /// closed → open: run the lazy load sequence first if the pane was never
    /// successfully populated, then reveal the pane and flip the icon to the
    /// open glyph. open → closed: hide the pane (content stays) and flip the
    /// icon back. Returns the state after the transition, or `None` for an
    /// unknown id.
    pub async fn activate(
        &self,
        id: &ToggleId,
        fragment: &mut Fragment,
        resolver: &dyn LinkResolver,
        store: &dyn NoteStore,
        renderer: &dyn NoteRenderer,
    ) -> Option<ToggleState> {
        // Snapshot and drop the guard before any await: a nested render pass
        // may register into this same map.
        let toggle = self.get(id)?;
        let mut state = toggle.state;

        if state.open {
            fragment.set_hidden(toggle.pane, true);
            fragment.replace_text(toggle.icon, GLYPH_CLOSED);
            fragment.remove_class(toggle.icon, OPEN_CLASS);
            state.open = false;
        } else {
            if !state.loaded {
                state.loaded = loader::load_pane(
                    fragment,
                    toggle.pane,
                    toggle.target.as_deref(),
                    &toggle.source,
                    resolver,
                    store,
                    renderer,
                    self,
                )
                .await;
            }
            fragment.set_hidden(toggle.pane, false);
            fragment.replace_text(toggle.icon, GLYPH_OPEN);
            fragment.add_class(toggle.icon, OPEN_CLASS);
            state.open = true;
        }

        debug!(id = id.as_str(), ?state, "toggle transition");
        if let Some(mut entry) = self.inner.get_mut(id) {
            entry.state = state;
        }
        Some(state)
    }
}
