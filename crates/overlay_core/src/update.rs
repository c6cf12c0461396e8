use crate::{Effect, Msg, OverlayState, Phase};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: OverlayState, msg: Msg) -> (OverlayState, Vec<Effect>) {
    let effects = match msg {
        Msg::PreferencesLoaded {
            visibility,
            ignored,
        } => {
            state.load_preferences(visibility, ignored);
            Vec::new()
        }
        Msg::DomMutated => {
            // Preferences must be in the cache before the first pass reads them.
            if !state.preferences_loaded() {
                return (state, Vec::new());
            }
            match state.phase() {
                Phase::Unloaded => {
                    state.set_phase(Phase::Scanning);
                    vec![Effect::ScanPage {
                        inject_controls: true,
                    }]
                }
                Phase::Scanning => vec![Effect::ScanPage {
                    inject_controls: true,
                }],
                Phase::Ready => vec![Effect::ScanPage {
                    inject_controls: false,
                }],
            }
        }
        Msg::ScanFinished { entries } => {
            state.set_last_entry_count(entries);
            state.set_phase(Phase::Ready);
            Vec::new()
        }
        Msg::PageUnsupported => {
            state.set_last_entry_count(0);
            state.set_phase(Phase::Unloaded);
            Vec::new()
        }
        Msg::VisibilityChanged { old: _, new } => {
            state.set_visibility(new);
            if state.phase() == Phase::Unloaded {
                Vec::new()
            } else {
                vec![Effect::RefreshVisibility]
            }
        }
        Msg::IgnoredNamesChanged { old, new } => {
            let removed = old.difference(&new);
            let added = new.difference(&old);
            let cache = state.ignored_mut();
            for name in &removed {
                cache.remove(name);
            }
            cache.extend(added);

            if state.phase() == Phase::Unloaded {
                Vec::new()
            } else {
                removed
                    .into_iter()
                    .map(|name| Effect::RestoreEntry { name })
                    .collect()
            }
        }
        Msg::NotInterestedClicked { name } => {
            if state.ignored_mut().insert(name.clone()) {
                vec![Effect::PersistIgnoredName { name }]
            } else {
                Vec::new()
            }
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
