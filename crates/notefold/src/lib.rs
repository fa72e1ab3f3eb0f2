//! Vault-backed host for the notefold reading view.
//!
//! Wires the sans-I/O core to a markdown vault on disk: scanning and reading
//! notes, resolving wikilink targets against the vault tree, rendering
//! markdown into fragments, and persisting settings.

pub mod config;
pub mod pipeline;
pub mod render;
pub mod resolver;
pub mod vault;

pub use pipeline::{ReadingView, RenderedNote, ViewError};
pub use resolver::VaultResolver;
pub use vault::{Vault, VaultError};
