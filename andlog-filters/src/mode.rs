use serde::{Deserialize, Serialize};
use std::fmt;

/// role of a filter in the decision engines
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FilteringMode {
    /// allowlist: once any SHOW filter exists, only matching records are shown
    #[default]
    Show,
    /// blocklist: matching records are hidden, whatever SHOW filters say
    Hide,
    /// matching records are painted with the filter's color
    Highlight,
    /// matching records are collected into a separate scoped view
    Window,
}

impl FilteringMode {
    pub const ALL: [FilteringMode; 4] = [
        FilteringMode::Show,
        FilteringMode::Hide,
        FilteringMode::Highlight,
        FilteringMode::Window,
    ];

    /// Outcome of "does any filter of this mode match" when the mode has no
    /// active filters at all.
    pub fn default_result(self) -> bool {
        match self {
            FilteringMode::Show => true,
            FilteringMode::Hide | FilteringMode::Highlight | FilteringMode::Window => false,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            FilteringMode::Show => "Show only",
            FilteringMode::Hide => "Hide",
            FilteringMode::Highlight => "Highlight",
            FilteringMode::Window => "Show in index window",
        }
    }
}

impl fmt::Display for FilteringMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}
