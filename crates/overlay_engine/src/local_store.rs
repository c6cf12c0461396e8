use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use overlay_core::{EntryVisibility, IgnoredNames};
use overlay_logging::{overlay_debug, overlay_info};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::persist::PreferenceFile;
use crate::preferences::{
    PreferenceChange, PreferenceStore, StorageArea, StorageChange, StoreError,
};

pub const PREFERENCES_FILENAME: &str = "preferences.json";

const CHANGE_CAPACITY: usize = 64;

/// Stored key-value document. The visibility stays a raw string so an
/// unknown value surfaces as an error when read instead of failing the load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct PreferenceDocument {
    #[serde(rename = "entry-visibility", default, skip_serializing_if = "Option::is_none")]
    entry_visibility: Option<String>,
    #[serde(rename = "ignored-names", default)]
    ignored_names: IgnoredNames,
    #[serde(rename = "entries-visible", default, skip_serializing_if = "Option::is_none")]
    legacy_entries_visible: Option<bool>,
}

impl PreferenceDocument {
    fn visibility(&self) -> Result<EntryVisibility, StoreError> {
        match (&self.entry_visibility, self.legacy_entries_visible) {
            (Some(raw), _) => Ok(raw.parse()?),
            (None, Some(false)) => Ok(EntryVisibility::NotInListOnly),
            (None, _) => Ok(EntryVisibility::Default),
        }
    }
}

/// Preference store kept in process memory, optionally mirrored to a JSON file.
///
/// Every successful write is broadcast as a [`StorageChange`] in the store's
/// area, including to subscribers in the writing window.
#[derive(Debug)]
pub struct LocalPreferenceStore {
    document: Mutex<PreferenceDocument>,
    file: Option<PreferenceFile>,
    area: StorageArea,
    changes: broadcast::Sender<StorageChange>,
}

impl LocalPreferenceStore {
    pub fn in_memory() -> Self {
        Self::with_document(PreferenceDocument::default(), None)
    }

    /// Opens `{dir}/preferences.json`, starting empty if it does not exist.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let file = PreferenceFile::new(dir, PREFERENCES_FILENAME);
        let document = match file.load()? {
            Some(content) => serde_json::from_str(&content)?,
            None => PreferenceDocument::default(),
        };
        overlay_info!("loaded preferences from {:?}", file.path());
        Ok(Self::with_document(document, Some(file)))
    }

    /// Tags broadcast changes with `area` instead of [`StorageArea::Local`].
    pub fn with_area(mut self, area: StorageArea) -> Self {
        self.area = area;
        self
    }

    fn with_document(document: PreferenceDocument, file: Option<PreferenceFile>) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CAPACITY);
        Self {
            document: Mutex::new(document),
            file,
            area: StorageArea::Local,
            changes,
        }
    }

    fn lock(&self) -> MutexGuard<'_, PreferenceDocument> {
        self.document.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Applies `edit` to a copy, persists it, then commits and notifies.
    fn write(&self, edit: impl FnOnce(&mut PreferenceDocument)) -> Result<(), StoreError> {
        let changes = {
            let mut document = self.lock();
            let mut next = document.clone();
            edit(&mut next);
            if next == *document {
                return Ok(());
            }
            if let Some(file) = &self.file {
                file.save(&serde_json::to_string_pretty(&next)?)?;
            }
            let changes = diff(&document, &next);
            *document = next;
            changes
        };

        for change in changes {
            overlay_debug!("preference {:?} changed", change.key());
            // No subscribers is fine.
            let _ = self.changes.send(StorageChange {
                area: self.area,
                change,
            });
        }
        Ok(())
    }
}

fn diff(old: &PreferenceDocument, new: &PreferenceDocument) -> Vec<PreferenceChange> {
    let mut changes = Vec::new();
    match (old.visibility(), new.visibility()) {
        (Ok(old_vis), Ok(new_vis)) if old_vis != new_vis => {
            changes.push(PreferenceChange::EntryVisibility {
                old: old_vis,
                new: new_vis,
            });
        }
        // An unreadable value being repaired; readers saw the default before.
        (Err(_), Ok(new_vis)) => changes.push(PreferenceChange::EntryVisibility {
            old: EntryVisibility::default(),
            new: new_vis,
        }),
        _ => {}
    }
    if old.ignored_names != new.ignored_names {
        changes.push(PreferenceChange::IgnoredNames {
            old: old.ignored_names.clone(),
            new: new.ignored_names.clone(),
        });
    }
    changes
}

#[async_trait]
impl PreferenceStore for LocalPreferenceStore {
    async fn ignored_names(&self) -> Result<IgnoredNames, StoreError> {
        Ok(self.lock().ignored_names.clone())
    }

    async fn add_ignored_name(&self, name: &str) -> Result<(), StoreError> {
        self.write(|doc| {
            doc.ignored_names.insert(name);
        })
    }

    async fn remove_ignored_name(&self, name: &str) -> Result<(), StoreError> {
        self.write(|doc| {
            doc.ignored_names.remove(name);
        })
    }

    async fn remove_ignored_names(&self, names: &[String]) -> Result<(), StoreError> {
        self.write(|doc| {
            for name in names {
                doc.ignored_names.remove(name);
            }
        })
    }

    async fn clear_ignored_names(&self) -> Result<(), StoreError> {
        self.write(|doc| doc.ignored_names.clear())
    }

    async fn entry_visibility(&self) -> Result<EntryVisibility, StoreError> {
        self.lock().visibility()
    }

    async fn set_entry_visibility(&self, value: EntryVisibility) -> Result<(), StoreError> {
        self.write(|doc| {
            doc.entry_visibility = Some(value.as_str().to_string());
            doc.legacy_entries_visible = None;
        })
    }

    fn subscribe(&self) -> broadcast::Receiver<StorageChange> {
        self.changes.subscribe()
    }
}
