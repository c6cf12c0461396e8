use crate::{EntryVisibility, IgnoredNames};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Initial preference load finished. No page work happens before this.
    PreferencesLoaded {
        visibility: EntryVisibility,
        ignored: IgnoredNames,
    },
    /// The host document reported a subtree or attribute mutation.
    DomMutated,
    /// A full entry pass completed against a resolved page variant.
    ScanFinished { entries: usize },
    /// No known page variant matched the document.
    PageUnsupported,
    /// Visibility preference changed in the store (from any window).
    VisibilityChanged {
        old: EntryVisibility,
        new: EntryVisibility,
    },
    /// Ignored-name preference changed in the store (from any window).
    IgnoredNamesChanged {
        old: IgnoredNames,
        new: IgnoredNames,
    },
    /// User clicked the injected control of the entry with this name.
    NotInterestedClicked { name: String },
    NoOp,
}
