use serde::{Deserialize, Serialize};

/// Match strictness for the toggle transformer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchMode {
    /// Only the first internal link of a paragraph qualifies, and only when
    /// the paragraph's trimmed text starts with the link text verbatim.
    StartOnly,
    /// Every internal link in an eligible paragraph qualifies.
    Anywhere,
}

/// Reading-view settings, persisted by the host as a generic JSON blob.
///
/// The blob may be partial or empty (`{}`); missing fields fall back to
/// defaults. The value is read once per render pass and passed explicitly;
/// there is no ambient global. Changing it affects the next pass only.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub match_only_at_start: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            match_only_at_start: true,
        }
    }
}

impl Settings {
    pub fn match_mode(&self) -> MatchMode {
        if self.match_only_at_start {
            MatchMode::StartOnly
        } else {
            MatchMode::Anywhere
        }
    }

    /// The one mutation entry point, invoked by the host's settings surface.
    pub fn set_match_only_at_start(&mut self, value: bool) {
        self.match_only_at_start = value;
    }
}
