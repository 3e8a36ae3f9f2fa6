//! Bounded log of request/response/error/token events
//!
//! Recording is gated by a flag resolved once per log instance. Subscribers
//! receive the full buffer snapshot after every change.

use std::fmt;
use std::sync::Arc;

use chrono::Utc;
use noteapp_common::{ListenerSet, RingBuffer, Subscription};
use noteapp_domain::constants::MAX_DEBUG_ENTRIES;
use noteapp_domain::{ClientConfig, DebugDetails, DebugEntry, DebugPhase};
use once_cell::sync::OnceCell;
use parking_lot::{Mutex, ReentrantMutex};
use serde_json::Value;
use uuid::Uuid;

enum Gate {
    Config(ClientConfig),
    Fixed(bool),
}

/// Ring buffer of the most recent debug entries
pub struct DebugLog {
    gate: Gate,
    enabled: OnceCell<bool>,
    entries: Mutex<RingBuffer<DebugEntry>>,
    listeners: ListenerSet<[DebugEntry]>,
    /// Held across change + notify so every listener sees snapshots in order.
    /// Reentrant so a listener may itself record or subscribe.
    delivery: ReentrantMutex<()>,
}

impl DebugLog {
    /// Log gated by the configured environment and opt-in flag
    #[must_use]
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::with_gate(Gate::Config(config.clone()))
    }

    /// Log with an explicit on/off switch
    #[must_use]
    pub fn with_enabled(enabled: bool) -> Self {
        Self::with_gate(Gate::Fixed(enabled))
    }

    fn with_gate(gate: Gate) -> Self {
        Self {
            gate,
            enabled: OnceCell::new(),
            entries: Mutex::new(RingBuffer::new(MAX_DEBUG_ENTRIES)),
            listeners: ListenerSet::new(),
            delivery: ReentrantMutex::new(()),
        }
    }

    /// Whether entries are recorded; resolved on first call and then fixed
    pub fn is_enabled(&self) -> bool {
        *self.enabled.get_or_init(|| match &self.gate {
            Gate::Config(config) => config.debug_enabled(),
            Gate::Fixed(enabled) => *enabled,
        })
    }

    /// Append an entry and notify subscribers; no-op when disabled
    pub fn add_entry(
        &self,
        phase: DebugPhase,
        label: impl Into<String>,
        details: Option<DebugDetails>,
    ) {
        if !self.is_enabled() {
            return;
        }

        let entry = DebugEntry {
            id: Uuid::now_v7().to_string(),
            timestamp: Utc::now().timestamp_millis(),
            phase,
            label: label.into(),
            details,
        };

        let _delivery = self.delivery.lock();
        let snapshot = {
            let mut entries = self.entries.lock();
            entries.push(entry);
            entries.to_vec()
        };

        self.listeners.notify(snapshot.as_slice());
    }

    /// Register `listener`; it is called immediately with the current
    /// entries, then after every append or clear
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&[DebugEntry]) + Send + Sync + 'static,
    {
        let listener = Arc::new(listener);
        let registered = Arc::clone(&listener);

        let _delivery = self.delivery.lock();
        let subscription = self.listeners.subscribe(move |entries: &[DebugEntry]| registered(entries));
        listener(self.entries().as_slice());
        subscription
    }

    pub fn clear(&self) {
        let _delivery = self.delivery.lock();
        self.entries.lock().clear();
        self.listeners.notify(&[]);
    }

    /// Current entries, oldest first
    #[must_use]
    pub fn entries(&self) -> Vec<DebugEntry> {
        self.entries.lock().to_vec()
    }
}

impl fmt::Debug for DebugLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DebugLog")
            .field("enabled", &self.enabled.get())
            .field("entries", &self.entries.lock().len())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

/// Turn a `json!({...})` object into entry details
///
/// Non-object values yield `None`.
#[must_use]
pub fn details(value: Value) -> Option<DebugDetails> {
    match value {
        Value::Object(map) => Some(map),
        _ => None,
    }
}
