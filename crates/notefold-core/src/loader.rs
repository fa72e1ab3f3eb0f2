use tracing::{debug, warn};

use crate::fragment::{Fragment, NodeId};
use crate::host::{LinkResolver, NoteRenderer, NoteStore};
use crate::toggle::ToggleRegistry;

/// Run the lazy load sequence for a toggle's content pane: resolve the link
/// target, read the note, render it into the pane.
///
/// Returns `true` only when the pane was fully populated; any failure leaves
/// the pane carrying a short error message and returns `false`, so the next
/// open attempts the whole sequence again. The pane is cleared at the start
/// of every attempt, which also wipes error text left by a previous one.
#[allow(clippy::too_many_arguments)]
pub(crate) async fn load_pane(
    fragment: &mut Fragment,
    pane: NodeId,
    target: Option<&str>,
    source: &str,
    resolver: &dyn LinkResolver,
    store: &dyn NoteStore,
    renderer: &dyn NoteRenderer,
    toggles: &ToggleRegistry,
) -> bool {
    let Some(target) = target else {
        debug!(source, "link has no target reference; leaving pane empty");
        return false;
    };

    fragment.remove_children(pane);

    let Some(handle) = resolver.resolve(target, source) else {
        debug!(target, source, "link target did not resolve");
        fragment.replace_text(pane, format!("Error: File \"{target}\" not found."));
        return false;
    };

    let markdown = match store.read(&handle).await {
        Ok(text) => text,
        Err(err) => {
            warn!(target, path = %handle.path, %err, "failed to read linked note");
            fragment.replace_text(pane, format!("Error: Could not read file \"{target}\"."));
            return false;
        }
    };

    // Pane content belongs to the loaded note, so its own links resolve
    // relative to the resolved path, not the containing note.
    if let Err(err) = renderer
        .render(&markdown, fragment, pane, &handle.path, toggles)
        .await
    {
        warn!(target, path = %handle.path, %err, "failed to render linked note");
        fragment.replace_text(pane, format!("Error: Could not read file \"{target}\"."));
        return false;
    }

    debug!(target, path = %handle.path, "pane populated");
    true
}
