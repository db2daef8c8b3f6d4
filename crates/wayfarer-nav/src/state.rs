//! The navigation state read by every UI surface.

use wayfarer_types::config::DEFAULT_HOME_URL;

use crate::url::normalize_address;

/// Snapshot of the browsing surface: address bar, committed target,
/// capability flags, loading status, visit history and panel mode.
///
/// Only [`NavigationStore`](crate::store::NavigationStore) mutates it; every
/// other reader gets a shared reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserState {
    pub(crate) address_text: String,
    pub(crate) committed_url: String,
    pub(crate) is_loading: bool,
    pub(crate) can_go_back: bool,
    pub(crate) can_go_forward: bool,
    pub(crate) history: Vec<String>,
    pub(crate) history_panel_visible: bool,
}

impl BrowserState {
    /// Fresh state pointing at `home_url` with an empty history.
    pub fn new(home_url: &str) -> Self {
        let committed_url = normalize_address(home_url).into_owned();
        Self {
            address_text: committed_url.clone(),
            committed_url,
            is_loading: false,
            can_go_back: false,
            can_go_forward: false,
            history: Vec::new(),
            history_panel_visible: false,
        }
    }

    /// Address-bar text, possibly still being typed.
    pub fn address_text(&self) -> &str {
        &self.address_text
    }

    /// The URL the viewport was last instructed to show. Always carries a web
    /// scheme.
    pub fn committed_url(&self) -> &str {
        &self.committed_url
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn can_go_back(&self) -> bool {
        self.can_go_back
    }

    pub fn can_go_forward(&self) -> bool {
        self.can_go_forward
    }

    /// Visited URLs in visit order (oldest first).
    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Visited URLs, most recent first.
    pub fn history_newest_first(&self) -> impl Iterator<Item = &str> {
        self.history.iter().rev().map(String::as_str)
    }

    pub fn last_history_entry(&self) -> Option<&str> {
        self.history.last().map(String::as_str)
    }

    pub fn history_panel_visible(&self) -> bool {
        self.history_panel_visible
    }
}

impl Default for BrowserState {
    fn default() -> Self {
        Self::new(DEFAULT_HOME_URL)
    }
}
