//! Overlay engine: DOM boundary, page variants, button transforms, the page
//! controller and the preference store it consumes.
mod controller;
mod decode;
mod document;
mod dom;
mod local_store;
mod persist;
mod preferences;
mod runtime;
mod transform;
mod variant;

pub use controller::{EntryReport, InjectedControl, PageController};
pub use decode::{decode_page, DecodeError, DecodedPage};
pub use document::{PageDocument, PageNode};
pub use dom::{ButtonTemplate, HostDom};
pub use local_store::{LocalPreferenceStore, PREFERENCES_FILENAME};
pub use persist::{PersistError, PreferenceFile};
pub use preferences::{
    PreferenceChange, PreferenceStore, StorageArea, StorageChange, StoreError,
    ENTRY_VISIBILITY_KEY, IGNORED_NAMES_KEY, LEGACY_ENTRIES_VISIBLE_KEY,
};
pub use runtime::{OverlayRuntime, PageEvent, RuntimeSettings};
pub use transform::{
    ButtonTransformer, FALLBACK_STATUS_TEXT, INJECTED_BUTTON, NOT_INTERESTED_LABEL,
};
pub use variant::{EntryError, EntryView, PageModel, PageVariant, VariantDescriptor};
