use std::sync::Arc;

use overlay_core::{Effect, Msg};
use overlay_logging::{overlay_debug, overlay_error, overlay_trace, overlay_warn};
use tokio::sync::broadcast::error::{RecvError, TryRecvError};
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

use crate::controller::PageController;
use crate::dom::HostDom;
use crate::preferences::{PreferenceStore, StorageArea, StorageChange, StoreError};

#[derive(Debug, Clone, Default)]
pub struct RuntimeSettings {
    /// Only changes made in this area reach the controller.
    pub storage_area: StorageArea,
}

/// Notification from the host document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageEvent<N> {
    /// Subtree or attribute mutation somewhere in the document.
    Mutated,
    /// The user clicked an injected control.
    Clicked(N),
}

/// Event loop of one document: page events, store change notifications and
/// the store writes they cause, all handled on one task.
pub struct OverlayRuntime<D: HostDom, S: PreferenceStore + 'static> {
    controller: PageController<D>,
    dom: D,
    store: Arc<S>,
    changes: broadcast::Receiver<StorageChange>,
    settings: RuntimeSettings,
    writes: Vec<JoinHandle<()>>,
}

impl<D: HostDom, S: PreferenceStore + 'static> OverlayRuntime<D, S> {
    /// Loads both preferences before any page event can be handled.
    pub async fn start(dom: D, store: Arc<S>, settings: RuntimeSettings) -> Result<Self, StoreError> {
        let changes = store.subscribe();
        let visibility = store.entry_visibility().await?;
        let ignored = store.ignored_names().await?;

        let mut runtime = Self {
            controller: PageController::new(),
            dom,
            store,
            changes,
            settings,
            writes: Vec::new(),
        };
        let effects = runtime.controller.dispatch(
            &mut runtime.dom,
            Msg::PreferencesLoaded {
                visibility,
                ignored,
            },
        );
        runtime.spawn_writes(effects);
        Ok(runtime)
    }

    pub fn controller(&self) -> &PageController<D> {
        &self.controller
    }

    pub fn dom(&self) -> &D {
        &self.dom
    }

    /// For hosts whose document changes outside the runtime. Follow with a
    /// [`PageEvent::Mutated`].
    pub fn dom_mut(&mut self) -> &mut D {
        &mut self.dom
    }

    pub fn into_dom(self) -> D {
        self.dom
    }

    pub fn handle_page_event(&mut self, event: PageEvent<D::Node>) {
        let effects = match event {
            PageEvent::Mutated => self.controller.dispatch(&mut self.dom, Msg::DomMutated),
            PageEvent::Clicked(button) => self.controller.click(&mut self.dom, &button),
        };
        self.spawn_writes(effects);
    }

    pub fn handle_storage_change(&mut self, change: StorageChange) {
        if change.area != self.settings.storage_area {
            overlay_trace!("ignoring {:?} change in {:?}", change.change.key(), change.area);
            return;
        }
        let effects = self
            .controller
            .dispatch(&mut self.dom, change.change.into_msg());
        self.spawn_writes(effects);
    }

    /// Handles every change notification already queued, without waiting for more.
    pub async fn pump_storage_changes(&mut self) {
        loop {
            match self.changes.try_recv() {
                Ok(change) => self.handle_storage_change(change),
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
                Err(TryRecvError::Lagged(skipped)) => self.recover_lag(skipped).await,
            }
        }
    }

    /// Reloads both preferences and reconciles them against the caches as
    /// though change notifications had arrived. Pending writes land first, so
    /// a name added here is never mistaken for one removed elsewhere.
    pub async fn resync(&mut self) -> Result<(), StoreError> {
        self.flush().await;
        let visibility = self.store.entry_visibility().await?;
        let ignored = self.store.ignored_names().await?;

        let state = self.controller.state();
        let mut pending = Vec::new();
        if state.visibility() != visibility {
            pending.push(Msg::VisibilityChanged {
                old: state.visibility(),
                new: visibility,
            });
        }
        if *state.ignored() != ignored {
            pending.push(Msg::IgnoredNamesChanged {
                old: state.ignored().clone(),
                new: ignored,
            });
        }

        for msg in pending {
            let effects = self.controller.dispatch(&mut self.dom, msg);
            self.spawn_writes(effects);
        }
        Ok(())
    }

    /// Waits for every store write started so far.
    pub async fn flush(&mut self) {
        for write in self.writes.drain(..) {
            if let Err(err) = write.await {
                overlay_error!("preference write task failed: {}", err);
            }
        }
    }

    /// Serves page events and store changes until `events` closes, then waits
    /// for outstanding writes.
    pub async fn run(mut self, mut events: mpsc::UnboundedReceiver<PageEvent<D::Node>>) -> Self {
        let mut store_open = true;
        loop {
            tokio::select! {
                event = events.recv() => match event {
                    Some(event) => self.handle_page_event(event),
                    None => break,
                },
                change = self.changes.recv(), if store_open => match change {
                    Ok(change) => self.handle_storage_change(change),
                    Err(RecvError::Lagged(skipped)) => self.recover_lag(skipped).await,
                    Err(RecvError::Closed) => {
                        overlay_warn!("preference change notifications closed");
                        store_open = false;
                    }
                },
            }
        }
        self.flush().await;
        self
    }

    async fn recover_lag(&mut self, skipped: u64) {
        overlay_warn!("missed {} preference changes, reloading", skipped);
        if let Err(err) = self.resync().await {
            overlay_error!("preference reload failed: {}", err);
        }
    }

    /// Store writes are not awaited; the cache already holds the new value.
    fn spawn_writes(&mut self, effects: Vec<Effect>) {
        self.writes.retain(|write| !write.is_finished());
        for effect in effects {
            match effect {
                Effect::PersistIgnoredName { name } => {
                    let store = Arc::clone(&self.store);
                    self.writes.push(tokio::spawn(async move {
                        if let Err(err) = store.add_ignored_name(&name).await {
                            overlay_error!("failed to persist ignored name {:?}: {}", name, err);
                        }
                    }));
                }
                other => overlay_debug!("effect {:?} left unhandled by the runtime", other),
            }
        }
    }
}
