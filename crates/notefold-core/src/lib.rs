//! Sans-I/O core of the notefold reading view.
//!
//! The host owns rendering, storage, and the event loop; this crate owns the
//! rendered-fragment tree, the wikilink syntax, the match predicate deciding
//! which links become toggles, the toggle state machine, and the lazy load
//! sequence, all generic over the host service traits in [`host`].

pub mod fragment;
pub mod host;
mod loader;
pub mod matcher;
pub mod settings;
pub mod toggle;
pub mod transformer;
pub mod wikilink;

pub use fragment::{Fragment, NodeId, Tag};
pub use settings::{MatchMode, Settings};
pub use toggle::{Toggle, ToggleId, ToggleRegistry, ToggleState};
