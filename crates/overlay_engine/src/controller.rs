use std::collections::VecDeque;

use overlay_core::{is_entry_visible, update, Effect, Msg, OverlayState};
use overlay_logging::{overlay_debug, overlay_info, overlay_warn};

use crate::dom::HostDom;
use crate::transform::ButtonTransformer;
use crate::variant::{PageModel, PageVariant};

/// Click binding of one injected control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InjectedControl<N> {
    pub button: N,
    pub entry: N,
    pub name: String,
}

/// Per-entry reading of the page as the user currently sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryReport {
    pub name: String,
    pub in_list: bool,
    pub ignored: bool,
    pub visible: bool,
    pub status_text: String,
    /// `None` when the entry has no injected control.
    pub control_visible: Option<bool>,
}

/// Everything tied to one resolved page variant. Replaced when the variant
/// changes, which also resets control injection.
#[derive(Debug)]
struct PageSession<N> {
    model: PageModel,
    transformer: ButtonTransformer,
    controls: Vec<InjectedControl<N>>,
}

impl<N> PageSession<N> {
    fn new(model: PageModel) -> Self {
        Self {
            model,
            transformer: ButtonTransformer::new(model.variant()),
            controls: Vec::new(),
        }
    }
}

/// Runs [`update`] and executes its DOM effects. Store effects are returned
/// to the caller, which hands them to the preference store.
#[derive(Debug)]
pub struct PageController<D: HostDom> {
    state: OverlayState,
    session: Option<PageSession<D::Node>>,
    scan_pass: u64,
}

impl<D: HostDom> Default for PageController<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: HostDom> PageController<D> {
    pub fn new() -> Self {
        Self {
            state: OverlayState::new(),
            session: None,
            scan_pass: 0,
        }
    }

    pub fn state(&self) -> &OverlayState {
        &self.state
    }

    pub fn variant(&self) -> Option<PageVariant> {
        self.session.as_ref().map(|s| s.model.variant())
    }

    pub fn controls(&self) -> &[InjectedControl<D::Node>] {
        self.session
            .as_ref()
            .map(|s| s.controls.as_slice())
            .unwrap_or_default()
    }

    /// Injected control bound to the entry called `name`.
    pub fn control_for(&self, name: &str) -> Option<&D::Node> {
        self.controls()
            .iter()
            .find(|c| c.name == name)
            .map(|c| &c.button)
    }

    pub fn dispatch(&mut self, dom: &mut D, msg: Msg) -> Vec<Effect> {
        let mut inbox = VecDeque::from([msg]);
        let mut deferred = Vec::new();

        while let Some(msg) = inbox.pop_front() {
            let state = std::mem::take(&mut self.state);
            let (state, effects) = update(state, msg);
            self.state = state;

            for effect in effects {
                match effect {
                    Effect::ScanPage { inject_controls } => {
                        inbox.push_back(self.scan(dom, inject_controls));
                    }
                    Effect::RefreshVisibility => self.refresh_visibility(dom),
                    Effect::RestoreEntry { name } => self.restore_entry(dom, &name),
                    Effect::PersistIgnoredName { .. } => deferred.push(effect),
                }
            }
        }

        deferred
    }

    /// Handles a click on an injected control.
    pub fn click(&mut self, dom: &mut D, button: &D::Node) -> Vec<Effect> {
        let Some(session) = self.session.as_mut() else {
            return Vec::new();
        };
        let Some(control) = session.controls.iter().find(|c| &c.button == button).cloned() else {
            overlay_warn!("click on unknown control {:?}", button);
            return Vec::new();
        };
        if !session.transformer.on_click(dom, button) {
            overlay_warn!("control of {:?} has no status control beside it", control.name);
        }

        let visible = is_entry_visible(self.state.visibility(), false, true);
        dom.set_displayed(&control.entry, visible);
        self.dispatch(dom, Msg::NotInterestedClicked { name: control.name })
    }

    pub fn report(&self, dom: &D) -> Vec<EntryReport> {
        let Some(session) = self.session.as_ref() else {
            return Vec::new();
        };
        session
            .model
            .entry_views(dom)
            .into_iter()
            .map(|view| EntryReport {
                ignored: self.state.is_ignored(&view.name),
                visible: dom.is_displayed(&view.entry),
                status_text: dom.text(&view.status_control).trim().to_string(),
                control_visible: session
                    .transformer
                    .find_injected_button(dom, &view.status_parent)
                    .map(|button| dom.is_displayed(&button)),
                in_list: view.in_list,
                name: view.name,
            })
            .collect()
    }

    /// Keeps the current variant while its container still matches, otherwise
    /// resolves again. `Some(true)` when a new session was opened.
    fn ensure_session(&mut self, dom: &D) -> Option<bool> {
        if let Some(session) = &self.session {
            if session.model.matches(dom) {
                return Some(false);
            }
        }
        match PageModel::resolve(dom) {
            Some(model) => {
                overlay_info!("page resolved as {:?}", model.variant());
                self.session = Some(PageSession::new(model));
                Some(true)
            }
            None => {
                if let Some(previous) = self.session.take() {
                    overlay_info!("{:?} page no longer matches", previous.model.variant());
                }
                None
            }
        }
    }

    fn scan(&mut self, dom: &mut D, inject_controls: bool) -> Msg {
        self.scan_pass += 1;
        overlay_logging::set_scan_pass(self.scan_pass);

        let Some(fresh) = self.ensure_session(dom) else {
            overlay_debug!("no supported layout on page");
            return Msg::PageUnsupported;
        };
        let Some(session) = self.session.as_mut() else {
            return Msg::PageUnsupported;
        };
        let inject_controls = inject_controls || fresh;
        let state = &self.state;
        let visibility = state.visibility();
        let PageSession {
            model,
            transformer,
            controls,
        } = session;

        let entries = model.for_each_entry(dom, |dom, view| {
            let ignored = state.is_ignored(&view.name);
            if view.in_list {
                dom.set_displayed(&view.entry, is_entry_visible(visibility, true, ignored));
                return;
            }

            if ignored {
                transformer.transform(dom, &view.status_control);
            }
            dom.set_displayed(&view.entry, is_entry_visible(visibility, false, ignored));

            if inject_controls
                && transformer
                    .find_injected_button(dom, &view.status_parent)
                    .is_none()
            {
                let button = transformer.create_button(dom, view, !ignored);
                controls.push(InjectedControl {
                    button,
                    entry: view.entry.clone(),
                    name: view.name.clone(),
                });
            }
        });

        for element in model.removable_elements(dom) {
            dom.set_displayed(&element, false);
        }

        overlay_debug!(
            "{:?} pass done: entries={} controls={}",
            model.variant(),
            entries,
            controls.len()
        );
        Msg::ScanFinished { entries }
    }

    fn refresh_visibility(&mut self, dom: &mut D) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        let state = &self.state;
        let visibility = state.visibility();
        session.model.for_each_entry(dom, |dom, view| {
            let ignored = state.is_ignored(&view.name);
            dom.set_displayed(&view.entry, is_entry_visible(visibility, view.in_list, ignored));
        });
        for element in session.model.removable_elements(dom) {
            dom.set_displayed(&element, false);
        }
    }

    fn restore_entry(&mut self, dom: &mut D, name: &str) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let Some(view) = session
            .model
            .entry_views(dom)
            .into_iter()
            .find(|view| view.name == name)
        else {
            overlay_debug!("{:?} is not on this page", name);
            return;
        };

        let marker = session.model.descriptor().marker_class;
        if dom.has_class(&view.status_control, marker) {
            session.transformer.undo(dom, &view.status_control);
        }
        let in_list = session.model.is_in_list(dom, &view.status_control);
        dom.set_displayed(
            &view.entry,
            is_entry_visible(self.state.visibility(), in_list, false),
        );
        if let Some(button) = session
            .transformer
            .find_injected_button(dom, &view.status_parent)
        {
            dom.set_displayed(&button, true);
        }
        overlay_info!("restored {:?}", name);
    }
}
