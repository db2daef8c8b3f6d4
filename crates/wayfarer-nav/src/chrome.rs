//! View models for the browser chrome.
//!
//! Pure functions of [`BrowserState`]: whatever draws the toolbar and the
//! history panel reads these instead of re-deriving enablement rules.

use crate::controller::BrowserController;
use crate::state::BrowserState;
use crate::viewport::NavigableViewport;

/// What the toolbar shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolbar {
    pub address: String,
    pub back_enabled: bool,
    pub forward_enabled: bool,
    pub reload_enabled: bool,
    pub history_enabled: bool,
    pub spinner_visible: bool,
}

impl Toolbar {
    pub fn from_state(state: &BrowserState) -> Self {
        Self {
            address: state.address_text().to_string(),
            back_enabled: state.can_go_back(),
            forward_enabled: state.can_go_forward(),
            reload_enabled: true,
            history_enabled: true,
            spinner_visible: state.is_loading(),
        }
    }
}

/// The history panel's list, newest visit first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryListing {
    pub entries: Vec<String>,
    pub clear_enabled: bool,
}

impl HistoryListing {
    pub fn from_state(state: &BrowserState) -> Self {
        Self {
            entries: state.history_newest_first().map(str::to_string).collect(),
            clear_enabled: !state.history().is_empty(),
        }
    }

    /// Entry at `position` as numbered on screen (1 = most recent).
    pub fn entry(&self, position: usize) -> Option<&str> {
        position
            .checked_sub(1)
            .and_then(|i| self.entries.get(i))
            .map(String::as_str)
    }
}

/// Two-step confirmation guarding "clear history".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClearHistoryPrompt {
    #[default]
    Idle,
    /// Waiting for the user to confirm or cancel.
    Pending,
}

impl ClearHistoryPrompt {
    /// Ask for confirmation. Stays idle when there is nothing to clear.
    /// Returns whether a confirmation is now pending.
    pub fn request(&mut self, state: &BrowserState) -> bool {
        *self = if state.history().is_empty() {
            Self::Idle
        } else {
            Self::Pending
        };
        self.is_pending()
    }

    /// Clear the history if a confirmation was pending. Returns whether the
    /// history was cleared.
    pub fn confirm<V: NavigableViewport>(&mut self, controller: &mut BrowserController<V>) -> bool {
        if !self.is_pending() {
            return false;
        }
        *self = Self::Idle;
        controller.clear_history();
        true
    }

    pub fn cancel(&mut self) {
        *self = Self::Idle;
    }

    pub fn is_pending(&self) -> bool {
        *self == Self::Pending
    }
}
