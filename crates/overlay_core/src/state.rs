use crate::{EntryVisibility, IgnoredNames};

/// Page controller lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// No page variant resolved.
    #[default]
    Unloaded,
    /// Variant resolved, first full pass (with control injection) in progress.
    Scanning,
    /// Initial pass done; later passes only refresh visibility and transforms.
    Ready,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OverlayState {
    preferences_loaded: bool,
    phase: Phase,
    visibility: EntryVisibility,
    ignored: IgnoredNames,
    last_entry_count: usize,
}

/// Read-only snapshot of [`OverlayState`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OverlayView {
    pub preferences_loaded: bool,
    pub phase: Phase,
    pub visibility: EntryVisibility,
    pub ignored_count: usize,
    pub last_entry_count: usize,
}

impl OverlayState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> OverlayView {
        OverlayView {
            preferences_loaded: self.preferences_loaded,
            phase: self.phase,
            visibility: self.visibility,
            ignored_count: self.ignored.len(),
            last_entry_count: self.last_entry_count,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn visibility(&self) -> EntryVisibility {
        self.visibility
    }

    pub fn is_ignored(&self, name: &str) -> bool {
        self.ignored.contains(name)
    }

    pub fn ignored(&self) -> &IgnoredNames {
        &self.ignored
    }

    pub fn preferences_loaded(&self) -> bool {
        self.preferences_loaded
    }

    pub(crate) fn load_preferences(&mut self, visibility: EntryVisibility, ignored: IgnoredNames) {
        self.visibility = visibility;
        self.ignored = ignored;
        self.preferences_loaded = true;
    }

    pub(crate) fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }

    pub(crate) fn set_visibility(&mut self, visibility: EntryVisibility) {
        self.visibility = visibility;
    }

    pub(crate) fn ignored_mut(&mut self) -> &mut IgnoredNames {
        &mut self.ignored
    }

    pub(crate) fn set_last_entry_count(&mut self, entries: usize) {
        self.last_entry_count = entries;
    }
}
