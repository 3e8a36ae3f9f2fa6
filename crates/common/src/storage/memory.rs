//! In-memory storage shared between contexts
//!
//! Every handle created with [`SharedMemoryStorage::context`] sees the same
//! values, the way tabs of one origin share `localStorage`. Writes are
//! announced to the other handles only.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use super::error::StorageResult;
use super::traits::{KeyValueStore, StorageEvent, StorageListener};
use crate::events::{ListenerSet, Subscription};

#[derive(Default)]
struct SharedState {
    values: Mutex<HashMap<String, String>>,
    contexts: Mutex<Vec<(u64, ListenerSet<StorageEvent>)>>,
    next_context: AtomicU64,
}

impl SharedState {
    fn register(&self) -> (u64, ListenerSet<StorageEvent>) {
        let id = self.next_context.fetch_add(1, Ordering::Relaxed);
        let listeners = ListenerSet::new();
        self.contexts.lock().push((id, listeners.clone()));
        (id, listeners)
    }

    fn broadcast_from(&self, origin: u64, event: &StorageEvent) {
        let targets: Vec<ListenerSet<StorageEvent>> = self
            .contexts
            .lock()
            .iter()
            .filter(|(id, _)| *id != origin)
            .map(|(_, listeners)| listeners.clone())
            .collect();

        for listeners in targets {
            listeners.notify(event);
        }
    }
}

/// Process-local key-value store with per-context change events
pub struct SharedMemoryStorage {
    shared: Arc<SharedState>,
    context_id: u64,
    listeners: ListenerSet<StorageEvent>,
}

impl SharedMemoryStorage {
    /// Create an empty store and its first context
    #[must_use]
    pub fn new() -> Self {
        let shared = Arc::new(SharedState::default());
        let (context_id, listeners) = shared.register();
        Self { shared, context_id, listeners }
    }

    /// Open another context over the same values
    ///
    /// Writes through the new handle notify this one and vice versa.
    #[must_use]
    pub fn context(&self) -> Self {
        let shared = Arc::clone(&self.shared);
        let (context_id, listeners) = shared.register();
        Self { shared, context_id, listeners }
    }

    fn write(&self, key: &str, value: Option<&str>) {
        let changed = {
            let mut values = self.shared.values.lock();
            match value {
                Some(value) => {
                    values.insert(key.to_string(), value.to_string()).as_deref() != Some(value)
                }
                None => values.remove(key).is_some(),
            }
        };

        if changed {
            let event = StorageEvent::new(key, value.map(str::to_string));
            self.shared.broadcast_from(self.context_id, &event);
        }
    }
}

impl Default for SharedMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for SharedMemoryStorage {
    fn drop(&mut self) {
        self.shared.contexts.lock().retain(|(id, _)| *id != self.context_id);
    }
}

impl fmt::Debug for SharedMemoryStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedMemoryStorage")
            .field("context_id", &self.context_id)
            .field("keys", &self.shared.values.lock().len())
            .finish()
    }
}

impl KeyValueStore for SharedMemoryStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.shared.values.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.write(key, Some(value));
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.write(key, None);
        Ok(())
    }

    fn subscribe(&self, listener: StorageListener) -> Subscription {
        self.listeners.subscribe(listener)
    }
}
