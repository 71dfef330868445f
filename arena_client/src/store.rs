//! Latest-snapshot store.
//!
//! Holds exactly one snapshot. `put` swaps in a new `Arc` under a lock held
//! only for the pointer swap, so a reader gets either the previous snapshot or
//! the new one in full. Nothing older is kept.

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc, Mutex,
};

use arena_shared::world::WorldSnapshot;

#[derive(Debug, Default)]
pub struct StateStore {
    slot: Mutex<Option<Arc<WorldSnapshot>>>,
    updates: AtomicU64,
}

impl StateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the held snapshot unconditionally.
    pub fn put(&self, snapshot: WorldSnapshot) {
        let next = Arc::new(snapshot);
        // Poisoning cannot leave a partial value behind; the slot is one `Arc`.
        let prev = {
            let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
            slot.replace(next)
        };
        self.updates.fetch_add(1, Ordering::Relaxed);
        drop(prev);
    }

    /// The latest snapshot, or `None` before the first one arrives.
    pub fn current(&self) -> Option<Arc<WorldSnapshot>> {
        self.slot
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn has_received(&self) -> bool {
        self.updates() > 0
    }

    /// Number of snapshots stored so far.
    pub fn updates(&self) -> u64 {
        self.updates.load(Ordering::Relaxed)
    }
}
