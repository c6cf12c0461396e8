use async_trait::async_trait;
use overlay_core::{EntryVisibility, IgnoredNames, Msg, UnknownVisibility};
use tokio::sync::broadcast;

use crate::persist::PersistError;

pub const ENTRY_VISIBILITY_KEY: &str = "entry-visibility";
pub const IGNORED_NAMES_KEY: &str = "ignored-names";
/// Boolean key written by older versions before the visibility modes existed.
pub const LEGACY_ENTRIES_VISIBLE_KEY: &str = "entries-visible";

/// Storage area a change was made in. The overlay only listens to one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageArea {
    #[default]
    Local,
    Sync,
    Managed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreferenceChange {
    EntryVisibility {
        old: EntryVisibility,
        new: EntryVisibility,
    },
    IgnoredNames {
        old: IgnoredNames,
        new: IgnoredNames,
    },
}

impl PreferenceChange {
    pub fn key(&self) -> &'static str {
        match self {
            PreferenceChange::EntryVisibility { .. } => ENTRY_VISIBILITY_KEY,
            PreferenceChange::IgnoredNames { .. } => IGNORED_NAMES_KEY,
        }
    }

    pub fn into_msg(self) -> Msg {
        match self {
            PreferenceChange::EntryVisibility { old, new } => Msg::VisibilityChanged { old, new },
            PreferenceChange::IgnoredNames { old, new } => Msg::IgnoredNamesChanged { old, new },
        }
    }
}

/// Change notification, delivered for writes from any window or tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageChange {
    pub area: StorageArea,
    pub change: PreferenceChange,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("preference file: {0}")]
    Persist(#[from] PersistError),
    #[error("malformed preference document: {0}")]
    Format(#[from] serde_json::Error),
    #[error(transparent)]
    UnknownVisibility(#[from] UnknownVisibility),
}

/// Asynchronous key-value store holding the two overlay preferences.
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    /// Empty if never written.
    async fn ignored_names(&self) -> Result<IgnoredNames, StoreError>;
    async fn add_ignored_name(&self, name: &str) -> Result<(), StoreError>;
    async fn remove_ignored_name(&self, name: &str) -> Result<(), StoreError>;
    async fn remove_ignored_names(&self, names: &[String]) -> Result<(), StoreError>;
    async fn clear_ignored_names(&self) -> Result<(), StoreError>;

    /// [`EntryVisibility::Default`] if never written.
    async fn entry_visibility(&self) -> Result<EntryVisibility, StoreError>;
    async fn set_entry_visibility(&self, value: EntryVisibility) -> Result<(), StoreError>;

    /// Receiver for every later change, whoever made it.
    fn subscribe(&self) -> broadcast::Receiver<StorageChange>;
}
