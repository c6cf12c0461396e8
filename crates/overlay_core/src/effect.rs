/// Work requested by [`crate::update`]. DOM effects are executed by the page
/// controller; `PersistIgnoredName` is handed to the preference store without
/// being awaited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Run a full entry pass. `inject_controls` is false once the page is Ready.
    ScanPage { inject_controls: bool },
    /// Recompute visibility for every entry and the removable elements.
    RefreshVisibility,
    /// Undo the "not interested" transform of the entry with this name.
    RestoreEntry { name: String },
    PersistIgnoredName { name: String },
}
