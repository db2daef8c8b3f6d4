//! Navigation store: the only legal mutation surface of [`BrowserState`].
//!
//! Every action runs to completion synchronously. Actions never fail; bad
//! input degrades to a safe value (an empty address commits to `https://`,
//! a gated-off back request does nothing). Requests aimed at the viewport
//! come back as a [`ViewportCommand`] for the caller to forward, so the store
//! itself never performs navigation.

use wayfarer_types::config::AddressTracking;

use crate::state::BrowserState;
use crate::url::normalize_address;
use crate::viewport::{LoadId, ViewportCommand};

/// Owner of the navigation state and its actions.
#[derive(Debug, Clone)]
pub struct NavigationStore {
    state: BrowserState,
    tracking: AddressTracking,
    address_focused: bool,
    active_load: Option<LoadId>,
    /// A persisted field (history or committed URL) changed since the last
    /// call to `take_persist_dirty`.
    persist_dirty: bool,
    /// Bumped by every action that changed observable state.
    revision: u64,
}

impl NavigationStore {
    pub fn new(state: BrowserState, tracking: AddressTracking) -> Self {
        Self {
            state,
            tracking,
            address_focused: false,
            active_load: None,
            persist_dirty: false,
            revision: 0,
        }
    }

    pub fn state(&self) -> &BrowserState {
        &self.state
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn tracking(&self) -> AddressTracking {
        self.tracking
    }

    pub fn address_focused(&self) -> bool {
        self.address_focused
    }

    /// The load currently tracked by identity, if any.
    pub fn active_load(&self) -> Option<LoadId> {
        self.active_load
    }

    /// Report and reset whether a persisted field changed.
    pub fn take_persist_dirty(&mut self) -> bool {
        std::mem::take(&mut self.persist_dirty)
    }

    fn touch(&mut self) {
        self.revision += 1;
    }

    // -- Address bar --

    /// Replace the address text verbatim.
    pub fn set_address_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        if self.state.address_text != text {
            self.state.address_text = text;
            self.touch();
        }
    }

    /// Record whether the user is currently editing the address bar.
    pub fn set_address_focus(&mut self, focused: bool) {
        self.address_focused = focused;
    }

    /// Normalize `raw_input` and make it the committed URL. Returns the
    /// command instructing the viewport to load it. Neither the history nor
    /// the address text is touched.
    pub fn commit_navigation(&mut self, raw_input: &str) -> ViewportCommand {
        let url = normalize_address(raw_input);
        if self.state.committed_url != url {
            self.state.committed_url = url.into_owned();
            self.persist_dirty = true;
            self.touch();
        }
        ViewportCommand::NavigateTo(self.state.committed_url.clone())
    }

    // -- Viewport reports --

    /// Mirror one navigation event from the viewport.
    ///
    /// Capability flags are copied verbatim, the address bar follows `url`
    /// (unless the user is editing it and tracking is set to preserve), and
    /// `url` is appended to the history unless it repeats the last entry.
    pub fn report_navigation_state(&mut self, url: &str, can_go_back: bool, can_go_forward: bool) {
        let mut changed = false;

        if self.state.can_go_back != can_go_back || self.state.can_go_forward != can_go_forward {
            self.state.can_go_back = can_go_back;
            self.state.can_go_forward = can_go_forward;
            changed = true;
        }

        let preserve = self.tracking == AddressTracking::PreserveWhileEditing && self.address_focused;
        if preserve {
            log::debug!("Address bar focused, not overwriting with {url}");
        } else if self.state.address_text != url {
            self.state.address_text = url.to_string();
            changed = true;
        }

        if self.state.last_history_entry() == Some(url) {
            log::debug!("Suppressed adjacent duplicate history entry {url}");
        } else {
            self.state.history.push(url.to_string());
            self.persist_dirty = true;
            changed = true;
        }

        if changed {
            self.touch();
        }
    }

    /// Set the loading flag directly. Clears any tracked load identity.
    pub fn set_loading(&mut self, loading: bool) {
        self.active_load = None;
        if self.state.is_loading != loading {
            self.state.is_loading = loading;
            self.touch();
        }
    }

    /// Mark `load` as the load in flight. A newer load supersedes an older
    /// one that has not finished yet.
    pub fn begin_load(&mut self, load: LoadId) {
        self.active_load = Some(load);
        if !self.state.is_loading {
            self.state.is_loading = true;
            self.touch();
        }
    }

    /// Finish `load`. Returns `false` (and changes nothing) when `load` is a
    /// stale load that was superseded by a newer one.
    pub fn end_load(&mut self, load: LoadId) -> bool {
        match self.active_load {
            Some(active) if active != load => {
                log::debug!("Ignoring end of stale {load}, {active} still in flight");
                false
            },
            _ => {
                self.set_loading(false);
                true
            },
        }
    }

    // -- Navigation requests --

    /// Back command if the viewport reported it can go back.
    pub fn request_go_back(&self) -> Option<ViewportCommand> {
        self.state.can_go_back.then_some(ViewportCommand::GoBack)
    }

    /// Forward command if the viewport reported it can go forward.
    pub fn request_go_forward(&self) -> Option<ViewportCommand> {
        self.state.can_go_forward.then_some(ViewportCommand::GoForward)
    }

    /// Reload is always allowed.
    pub fn request_reload(&self) -> ViewportCommand {
        ViewportCommand::Reload
    }

    // -- History panel --

    pub fn show_history_panel(&mut self) {
        if !self.state.history_panel_visible {
            self.state.history_panel_visible = true;
            self.touch();
        }
    }

    pub fn hide_history_panel(&mut self) {
        if self.state.history_panel_visible {
            self.state.history_panel_visible = false;
            self.touch();
        }
    }

    /// Commit `url`, copy it into the address bar and close the panel.
    pub fn select_history_entry(&mut self, url: &str) -> ViewportCommand {
        let command = self.commit_navigation(url);
        self.set_address_text(url);
        self.hide_history_panel();
        command
    }

    /// Empty the history. Confirmation is the caller's job.
    pub fn clear_history(&mut self) {
        if !self.state.history.is_empty() {
            self.state.history.clear();
            self.persist_dirty = true;
            self.touch();
        }
    }
}

impl Default for NavigationStore {
    fn default() -> Self {
        Self::new(BrowserState::default(), AddressTracking::default())
    }
}
