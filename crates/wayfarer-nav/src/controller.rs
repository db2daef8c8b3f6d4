//! Browser controller: ties the store to a viewport and to persistence.
//!
//! The controller is the object UI layers hold. It forwards user intent and
//! viewport events to the [`NavigationStore`], sends the resulting commands to
//! the [`NavigableViewport`], and after every action that changed a persisted
//! field hands a fresh snapshot to the [`PersistenceBridge`]. Each public
//! method runs to completion before returning, so no reader ever observes a
//! half-applied action.

use std::sync::Arc;

use wayfarer_blob::BlobStore;
use wayfarer_types::config::BrowserConfig;

use crate::persist::PersistenceBridge;
use crate::snapshot::PersistedSnapshot;
use crate::state::BrowserState;
use crate::store::NavigationStore;
use crate::viewport::{NavigableViewport, ViewportCommand, ViewportEvent};

/// Owner of the navigation state for one browsing surface.
pub struct BrowserController<V: NavigableViewport> {
    store: NavigationStore,
    viewport: V,
    persistence: Option<PersistenceBridge>,
}

impl<V: NavigableViewport> BrowserController<V> {
    /// Controller over an already built state, without persistence.
    pub fn new(state: BrowserState, config: &BrowserConfig, viewport: V) -> Self {
        Self {
            store: NavigationStore::new(state, config.address_tracking),
            viewport,
            persistence: None,
        }
    }

    /// Rehydrate from `store` and persist every later change back to it.
    ///
    /// If the persistence worker cannot be started the controller still
    /// works, it just keeps its state in memory.
    pub fn open(config: &BrowserConfig, store: Arc<dyn BlobStore>, viewport: V) -> Self {
        match PersistenceBridge::spawn(store, config.storage_key.clone()) {
            Ok(bridge) => {
                let state = bridge.rehydrate(&config.home_url);
                Self::new(state, config, viewport).with_persistence(bridge)
            },
            Err(e) => {
                log::error!("Could not start persistence, running in memory: {e}");
                Self::new(BrowserState::new(&config.home_url), config, viewport)
            },
        }
    }

    /// Attach a persistence bridge.
    pub fn with_persistence(mut self, bridge: PersistenceBridge) -> Self {
        self.persistence = Some(bridge);
        self
    }

    pub fn state(&self) -> &BrowserState {
        self.store.state()
    }

    /// Changes whenever observable state changed; UI layers re-render when it
    /// differs from the value they last drew.
    pub fn revision(&self) -> u64 {
        self.store.revision()
    }

    pub fn store(&self) -> &NavigationStore {
        &self.store
    }

    pub fn viewport(&self) -> &V {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut V {
        &mut self.viewport
    }

    pub fn persistence(&self) -> Option<&PersistenceBridge> {
        self.persistence.as_ref()
    }

    /// Point the viewport at the committed URL. Called once at startup.
    pub fn load_committed(&mut self) {
        let command = ViewportCommand::NavigateTo(self.state().committed_url().to_string());
        self.dispatch(command);
    }

    // -- User intent --

    pub fn set_address_text(&mut self, text: impl Into<String>) {
        self.store.set_address_text(text);
    }

    pub fn set_address_focus(&mut self, focused: bool) {
        self.store.set_address_focus(focused);
    }

    /// Commit `raw_input` and navigate the viewport there.
    pub fn commit_navigation(&mut self, raw_input: &str) {
        self.store.set_address_focus(false);
        let command = self.store.commit_navigation(raw_input);
        self.dispatch(command);
        self.after_action();
    }

    /// Commit whatever is in the address bar (the "enter" key).
    pub fn submit_address(&mut self) {
        let text = self.state().address_text().to_string();
        self.commit_navigation(&text);
    }

    /// Toolbar back. Like every toolbar and history action this ends any
    /// address-bar editing.
    pub fn request_go_back(&mut self) {
        self.store.set_address_focus(false);
        match self.store.request_go_back() {
            Some(command) => self.dispatch(command),
            None => log::debug!("Back requested with nothing to go back to"),
        }
    }

    pub fn request_go_forward(&mut self) {
        self.store.set_address_focus(false);
        match self.store.request_go_forward() {
            Some(command) => self.dispatch(command),
            None => log::debug!("Forward requested with nothing to go forward to"),
        }
    }

    pub fn request_reload(&mut self) {
        self.store.set_address_focus(false);
        let command = self.store.request_reload();
        self.dispatch(command);
    }

    /// Platform back button. Returns `true` when the press was consumed by a
    /// back navigation, `false` to let the platform handle it.
    pub fn handle_back_press(&mut self) -> bool {
        self.store.set_address_focus(false);
        match self.store.request_go_back() {
            Some(command) => {
                self.dispatch(command);
                true
            },
            None => false,
        }
    }

    pub fn show_history_panel(&mut self) {
        self.store.show_history_panel();
    }

    pub fn hide_history_panel(&mut self) {
        self.store.hide_history_panel();
    }

    /// Open a history entry: commit it, show it in the address bar and close
    /// the panel, then navigate.
    pub fn select_history_entry(&mut self, url: &str) {
        self.store.set_address_focus(false);
        let command = self.store.select_history_entry(url);
        self.dispatch(command);
        self.after_action();
    }

    /// Empty the history. The caller must have obtained confirmation.
    pub fn clear_history(&mut self) {
        self.store.clear_history();
        self.after_action();
    }

    // -- Viewport events --

    /// Apply one event emitted by the viewport.
    pub fn handle_event(&mut self, event: ViewportEvent) {
        match event {
            ViewportEvent::NavigationStateChanged {
                url,
                can_go_back,
                can_go_forward,
            } => {
                self.store
                    .report_navigation_state(&url, can_go_back, can_go_forward);
            },
            ViewportEvent::LoadStarted { load: Some(load) } => self.store.begin_load(load),
            ViewportEvent::LoadStarted { load: None } => self.store.set_loading(true),
            ViewportEvent::LoadFinished { load: Some(load) } => {
                self.store.end_load(load);
            },
            ViewportEvent::LoadFinished { load: None } => self.store.set_loading(false),
        }
        self.after_action();
    }

    /// Flush pending writes and stop persistence.
    pub fn shutdown(mut self) {
        if let Some(bridge) = self.persistence.take() {
            bridge.flush();
            bridge.shutdown();
        }
    }

    fn dispatch(&mut self, command: ViewportCommand) {
        log::debug!("Viewport command: {command}");
        if let Err(e) = self.viewport.execute(&command) {
            log::warn!("Viewport rejected '{command}': {e}");
        }
    }

    fn after_action(&mut self) {
        if !self.store.take_persist_dirty() {
            return;
        }
        if let Some(bridge) = &self.persistence {
            bridge.persist(PersistedSnapshot::capture(self.store.state()));
        }
    }
}
