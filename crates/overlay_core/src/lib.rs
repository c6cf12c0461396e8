//! Overlay core: visibility policy, preference caches and the page controller
//! state machine. Pure; the engine crate executes the effects it produces.
mod effect;
mod ignored;
mod msg;
mod state;
mod update;
mod visibility;

pub use effect::Effect;
pub use ignored::IgnoredNames;
pub use msg::Msg;
pub use state::{OverlayState, OverlayView, Phase};
pub use update::update;
pub use visibility::{is_entry_visible, EntryVisibility, UnknownVisibility};
