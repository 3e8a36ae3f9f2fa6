//! Storage abstraction

use std::fmt::Debug;

use serde::{Deserialize, Serialize};

use super::error::StorageResult;
use crate::events::Subscription;

/// Change made to a key by another handle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageEvent {
    pub key: String,
    /// `None` when the key was removed.
    pub new_value: Option<String>,
}

impl StorageEvent {
    pub fn new(key: impl Into<String>, new_value: Option<String>) -> Self {
        Self { key: key.into(), new_value }
    }
}

/// Callback invoked with external storage changes
pub type StorageListener = Box<dyn Fn(&StorageEvent) + Send + Sync>;

/// String key-value store with external-change notifications
///
/// Implementations must be safe to share across threads. Listeners only hear
/// about changes that did not originate from the same handle.
pub trait KeyValueStore: Debug + Send + Sync {
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    fn remove(&self, key: &str) -> StorageResult<()>;

    /// Observe changes made outside this handle
    fn subscribe(&self, listener: StorageListener) -> Subscription;
}
