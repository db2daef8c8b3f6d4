//! Background persistence of the navigation snapshot.
//!
//! [`PersistenceBridge::persist`] hands a snapshot to a worker thread and
//! returns immediately. The worker drains everything queued, writes only the
//! newest snapshot, and logs (never propagates) write failures. Rehydration
//! happens synchronously at startup and falls back to a fresh state whenever
//! the stored blob is missing or unusable.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

use wayfarer_blob::BlobStore;
use wayfarer_types::error::Result;

use crate::snapshot::{PersistedSnapshot, RecoveredFields};
use crate::state::BrowserState;

/// Counters describing what the worker has done so far.
#[derive(Debug, Default)]
pub struct PersistStats {
    writes: AtomicU64,
    failures: AtomicU64,
    coalesced: AtomicU64,
}

impl PersistStats {
    /// Successful blob writes.
    pub fn writes(&self) -> u64 {
        self.writes.load(Ordering::Relaxed)
    }

    /// Failed encode or write attempts.
    pub fn failures(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }

    /// Snapshots superseded before they were written.
    pub fn coalesced(&self) -> u64 {
        self.coalesced.load(Ordering::Relaxed)
    }
}

enum WorkerMsg {
    Persist(PersistedSnapshot),
    Flush(Sender<()>),
    Shutdown,
}

/// Read the stored snapshot under `key` and build the startup state.
///
/// Absent, unreadable or malformed blobs yield `BrowserState::new(home_url)`.
pub fn rehydrate(store: &dyn BlobStore, key: &str, home_url: &str) -> BrowserState {
    let bytes = match store.get(key) {
        Ok(Some(bytes)) => bytes,
        Ok(None) => {
            log::info!("No stored navigation state under '{key}', starting fresh");
            return BrowserState::new(home_url);
        },
        Err(e) => {
            log::warn!("Reading navigation state failed, starting fresh: {e}");
            return BrowserState::new(home_url);
        },
    };
    match RecoveredFields::decode(&bytes) {
        Ok(fields) => {
            let state = fields.into_state(home_url);
            log::info!(
                "Restored {} history entries, last URL {}",
                state.history().len(),
                state.committed_url()
            );
            state
        },
        Err(e) => {
            log::warn!("Stored navigation state unusable, starting fresh: {e}");
            BrowserState::new(home_url)
        },
    }
}

/// Fire-and-forget writer of navigation snapshots.
pub struct PersistenceBridge {
    store: Arc<dyn BlobStore>,
    key: String,
    tx: Option<Sender<WorkerMsg>>,
    worker: Option<JoinHandle<()>>,
    stats: Arc<PersistStats>,
}

impl PersistenceBridge {
    /// Start the worker thread writing to `store` under `key`.
    pub fn spawn(store: Arc<dyn BlobStore>, key: impl Into<String>) -> Result<Self> {
        let key = key.into();
        let stats = Arc::new(PersistStats::default());
        let (tx, rx) = mpsc::channel();

        let worker = {
            let store = Arc::clone(&store);
            let key = key.clone();
            let stats = Arc::clone(&stats);
            thread::Builder::new()
                .name("wayfarer-persist".to_string())
                .spawn(move || run_worker(store.as_ref(), &key, &rx, &stats))?
        };

        Ok(Self {
            store,
            key,
            tx: Some(tx),
            worker: Some(worker),
            stats,
        })
    }

    /// Rehydrate from the store this bridge writes to.
    pub fn rehydrate(&self, home_url: &str) -> BrowserState {
        rehydrate(self.store.as_ref(), &self.key, home_url)
    }

    /// Queue `snapshot` for writing. Never blocks.
    pub fn persist(&self, snapshot: PersistedSnapshot) {
        let Some(tx) = &self.tx else {
            return;
        };
        if tx.send(WorkerMsg::Persist(snapshot)).is_err() {
            log::warn!("Persistence worker has stopped, snapshot dropped");
        }
    }

    /// Block until every snapshot queued so far has been handled.
    pub fn flush(&self) {
        let Some(tx) = &self.tx else {
            return;
        };
        let (ack_tx, ack_rx) = mpsc::channel();
        if tx.send(WorkerMsg::Flush(ack_tx)).is_ok() {
            let _ = ack_rx.recv();
        }
    }

    pub fn stats(&self) -> &PersistStats {
        &self.stats
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Write anything pending and stop the worker.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        if let Some(tx) = self.tx.take() {
            let _ = tx.send(WorkerMsg::Shutdown);
        }
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                log::error!("Persistence worker panicked");
            }
        }
    }
}

impl Drop for PersistenceBridge {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run_worker(store: &dyn BlobStore, key: &str, rx: &Receiver<WorkerMsg>, stats: &PersistStats) {
    while let Ok(first) = rx.recv() {
        let mut pending: Option<PersistedSnapshot> = None;
        let mut acks = Vec::new();
        let mut shutdown = false;

        let mut next = Some(first);
        while let Some(msg) = next {
            match msg {
                WorkerMsg::Persist(snapshot) => {
                    if pending.replace(snapshot).is_some() {
                        stats.coalesced.fetch_add(1, Ordering::Relaxed);
                    }
                },
                WorkerMsg::Flush(ack) => acks.push(ack),
                WorkerMsg::Shutdown => {
                    shutdown = true;
                    break;
                },
            }
            next = rx.try_recv().ok();
        }

        if let Some(snapshot) = pending {
            write_snapshot(store, key, &snapshot, stats);
        }
        for ack in acks {
            let _ = ack.send(());
        }
        if shutdown {
            break;
        }
    }
    log::debug!("Persistence worker for '{key}' stopped");
}

fn write_snapshot(store: &dyn BlobStore, key: &str, snapshot: &PersistedSnapshot, stats: &PersistStats) {
    let result = snapshot.encode().and_then(|bytes| store.set(key, &bytes));
    match result {
        Ok(()) => {
            stats.writes.fetch_add(1, Ordering::Relaxed);
            log::debug!(
                "Persisted {} history entries under '{key}'",
                snapshot.history.len()
            );
        },
        Err(e) => {
            stats.failures.fetch_add(1, Ordering::Relaxed);
            log::warn!("Persisting navigation state failed: {e}");
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wayfarer_blob::{DirBlobStore, MemoryBlobStore};
    use wayfarer_types::error::WayfarerError;

    use crate::snapshot::SCHEMA_VERSION;

    const KEY: &str = "browser-storage";
    const HOME: &str = "https://www.example.com";

    /// A store whose writes always fail.
    struct FailingStore;

    impl BlobStore for FailingStore {
        fn get(&self, _key: &str) -> Result<Option<Vec<u8>>> {
            Err(WayfarerError::Blob("disk on fire".into()))
        }
        fn set(&self, _key: &str, _data: &[u8]) -> Result<()> {
            Err(WayfarerError::Blob("disk on fire".into()))
        }
        fn remove(&self, _key: &str) -> Result<()> {
            Ok(())
        }
    }

    fn shared(store: &Arc<MemoryBlobStore>) -> Arc<dyn BlobStore> {
        Arc::clone(store) as Arc<dyn BlobStore>
    }

    fn snapshot(history: &[&str], url: &str) -> PersistedSnapshot {
        PersistedSnapshot {
            schema_version: SCHEMA_VERSION,
            history: history.iter().map(|s| s.to_string()).collect(),
            committed_url: url.to_string(),
        }
    }

    #[test]
    fn rehydrate_absent_is_default() {
        let store = MemoryBlobStore::new();
        assert_eq!(rehydrate(&store, KEY, HOME), BrowserState::new(HOME));
    }

    #[test]
    fn rehydrate_malformed_is_default() {
        let store = MemoryBlobStore::new();
        store.set(KEY, b"{{{{").unwrap();
        assert_eq!(rehydrate(&store, KEY, HOME), BrowserState::new(HOME));
    }

    #[test]
    fn rehydrate_read_error_is_default() {
        assert_eq!(rehydrate(&FailingStore, KEY, HOME), BrowserState::new(HOME));
    }

    #[test]
    fn rehydrate_restores_persisted_fields() {
        let store = MemoryBlobStore::new();
        store
            .set(KEY, br#"{"history":["a","b"],"committedUrl":"https://x"}"#)
            .unwrap();
        let state = rehydrate(&store, KEY, HOME);
        assert_eq!(state.history(), ["a", "b"]);
        assert_eq!(state.committed_url(), "https://x");
        assert!(!state.is_loading());
        assert!(!state.can_go_back());
        assert!(!state.history_panel_visible());
    }

    #[test]
    fn persist_then_rehydrate() {
        let store = Arc::new(MemoryBlobStore::new());
        let bridge = PersistenceBridge::spawn(shared(&store), KEY).unwrap();
        bridge.persist(snapshot(&["https://a.test"], "https://a.test"));
        bridge.flush();

        let state = bridge.rehydrate(HOME);
        assert_eq!(state.history(), ["https://a.test"]);
        assert_eq!(state.committed_url(), "https://a.test");
        assert_eq!(bridge.stats().writes(), 1);
    }

    #[test]
    fn burst_keeps_newest() {
        let store = Arc::new(MemoryBlobStore::new());
        let bridge = PersistenceBridge::spawn(shared(&store), KEY).unwrap();
        for i in 0..50 {
            bridge.persist(snapshot(&[], &format!("https://{i}.test")));
        }
        bridge.flush();

        let state = rehydrate(store.as_ref(), KEY, HOME);
        assert_eq!(state.committed_url(), "https://49.test");
        let stats = bridge.stats();
        assert_eq!(stats.writes() + stats.coalesced(), 50);
        assert!(stats.writes() >= 1);
    }

    #[test]
    fn write_failure_is_swallowed() {
        let bridge = PersistenceBridge::spawn(Arc::new(FailingStore), KEY).unwrap();
        bridge.persist(snapshot(&["a"], "https://a.test"));
        bridge.flush();
        assert_eq!(bridge.stats().failures(), 1);
        assert_eq!(bridge.stats().writes(), 0);

        // The worker keeps running after a failure.
        bridge.persist(snapshot(&["b"], "https://b.test"));
        bridge.flush();
        assert_eq!(bridge.stats().failures(), 2);
    }

    #[test]
    fn drop_flushes_pending_write() {
        let store = Arc::new(MemoryBlobStore::new());
        {
            let bridge = PersistenceBridge::spawn(shared(&store), KEY).unwrap();
            bridge.persist(snapshot(&["a"], "https://a.test"));
        }
        let state = rehydrate(store.as_ref(), KEY, HOME);
        assert_eq!(state.history(), ["a"]);
    }

    #[test]
    fn shutdown_writes_then_stops() {
        let store = Arc::new(MemoryBlobStore::new());
        let bridge = PersistenceBridge::spawn(shared(&store), KEY).unwrap();
        bridge.persist(snapshot(&["z"], "https://z.test"));
        bridge.shutdown();
        assert!(store.contains(KEY).unwrap());
    }

    #[test]
    fn survives_restart_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = Arc::new(DirBlobStore::open(dir.path()).unwrap());
            let bridge = PersistenceBridge::spawn(store, KEY).unwrap();
            bridge.persist(snapshot(&["https://a.test", "https://b.test"], "https://b.test"));
        }
        let reopened = DirBlobStore::open(dir.path()).unwrap();
        let state = rehydrate(&reopened, KEY, HOME);
        assert_eq!(state.history(), ["https://a.test", "https://b.test"]);
        assert_eq!(state.committed_url(), "https://b.test");
    }
}
