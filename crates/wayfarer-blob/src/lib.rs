//! Durable key-value blob stores.
//!
//! A [`BlobStore`] maps string keys to opaque byte blobs. The navigation core
//! keeps its whole persisted snapshot under a single key, so stores only need
//! whole-value reads and writes. Two implementations ship here: the
//! [`MemoryBlobStore`] for tests and ephemeral sessions, and the
//! [`DirBlobStore`] that keeps one file per key on disk.

pub mod dir;
pub mod memory;

pub use dir::DirBlobStore;
pub use memory::MemoryBlobStore;

use wayfarer_types::error::{Result, WayfarerError};

/// Abstract durable key-value storage.
///
/// Receivers are `&self` so one store can be shared between the thread that
/// rehydrates at startup and the background persistence worker.
pub trait BlobStore: Send + Sync {
    /// Read the blob stored under `key`, or `None` if absent.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Replace the blob stored under `key`.
    fn set(&self, key: &str, data: &[u8]) -> Result<()>;

    /// Remove the blob stored under `key`. Removing an absent key is not an
    /// error.
    fn remove(&self, key: &str) -> Result<()>;

    /// Check whether a blob exists under `key`.
    fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }
}

/// Reject keys that cannot be used as a single file name.
pub(crate) fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(WayfarerError::Blob("empty key".to_string()));
    }
    // Dot-prefixed names are reserved for in-flight writes.
    if key.starts_with('.') {
        return Err(WayfarerError::Blob(format!("reserved key: {key}")));
    }
    if key.contains(['/', '\\', '\0']) {
        return Err(WayfarerError::Blob(format!(
            "key contains a path separator: {key}"
        )));
    }
    Ok(())
}
