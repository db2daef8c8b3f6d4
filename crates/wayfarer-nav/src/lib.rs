//! Navigation/history core of the Wayfarer browsing surface.
//!
//! This crate reconciles the address bar, the committed navigation target,
//! the viewport's capability flags, the loading status and a persisted visit
//! history into one [`BrowserState`]:
//!
//! - [`NavigationStore`] holds the state and is its only mutation surface.
//! - [`BrowserController`] connects the store to a [`NavigableViewport`] and
//!   to a [`PersistenceBridge`] that writes snapshots in the background.
//! - [`chrome`] derives what the toolbar and history panel show.
//!
//! The rendering engine and the storage medium are collaborators behind the
//! [`NavigableViewport`] and [`wayfarer_blob::BlobStore`] traits.

pub mod chrome;
pub mod controller;
pub mod persist;
pub mod snapshot;
pub mod state;
pub mod store;
pub mod url;
pub mod viewport;

#[cfg(test)]
pub(crate) mod test_utils;

// -----------------------------------------------------------------------
// Public re-exports
// -----------------------------------------------------------------------

pub use chrome::{ClearHistoryPrompt, HistoryListing, Toolbar};
pub use controller::BrowserController;
pub use persist::{PersistStats, PersistenceBridge, rehydrate};
pub use snapshot::{PersistedSnapshot, RecoveredFields, SCHEMA_VERSION};
pub use state::BrowserState;
pub use store::NavigationStore;
pub use url::normalize_address;
pub use viewport::{LoadId, NavigableViewport, ViewportCommand, ViewportEvent};
