use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which entries stay visible on a list page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EntryVisibility {
    /// Everything is visible.
    #[default]
    #[serde(rename = "default")]
    Default,
    /// Only entries that are neither in a list nor marked not interested.
    #[serde(rename = "not-in-list-only")]
    NotInListOnly,
    /// Everything except entries marked not interested.
    #[serde(rename = "hide-not-interested", alias = "hide-not-interested-only")]
    HideNotInterestedOnly,
    /// Only entries in a list (watching, completed, ...) that are not marked.
    #[serde(rename = "in-list-only")]
    InListOnly,
}

impl EntryVisibility {
    pub const ALL: [EntryVisibility; 4] = [
        EntryVisibility::Default,
        EntryVisibility::NotInListOnly,
        EntryVisibility::HideNotInterestedOnly,
        EntryVisibility::InListOnly,
    ];

    /// Value written to the preference store.
    pub fn as_str(self) -> &'static str {
        match self {
            EntryVisibility::Default => "default",
            EntryVisibility::NotInListOnly => "not-in-list-only",
            EntryVisibility::HideNotInterestedOnly => "hide-not-interested",
            EntryVisibility::InListOnly => "in-list-only",
        }
    }
}

impl fmt::Display for EntryVisibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown entry visibility value: {0:?}")]
pub struct UnknownVisibility(pub String);

impl FromStr for EntryVisibility {
    type Err = UnknownVisibility;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim() {
            "default" => Ok(EntryVisibility::Default),
            "not-in-list-only" => Ok(EntryVisibility::NotInListOnly),
            "hide-not-interested" | "hide-not-interested-only" => {
                Ok(EntryVisibility::HideNotInterestedOnly)
            }
            "in-list-only" => Ok(EntryVisibility::InListOnly),
            other => Err(UnknownVisibility(other.to_string())),
        }
    }
}

/// Decides whether an entry is shown under `mode`.
///
/// `in_list` is the status-control reading (marked entries count as in list),
/// `ignored` is membership in the ignored-name set.
pub fn is_entry_visible(mode: EntryVisibility, in_list: bool, ignored: bool) -> bool {
    match mode {
        EntryVisibility::Default => true,
        EntryVisibility::NotInListOnly => !in_list && !ignored,
        EntryVisibility::HideNotInterestedOnly => !ignored,
        EntryVisibility::InListOnly => in_list && !ignored,
    }
}
