//! Listener registries
//!
//! A [`ListenerSet`] fans an event out to every registered callback. Each
//! registration hands back a [`Subscription`] that removes exactly that
//! callback when [`Subscription::unsubscribe`] is called.
//!
//! Callbacks run after the registry lock is released, so a listener may
//! subscribe, unsubscribe or trigger another notification without
//! deadlocking.

use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

type Listener<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct Registry<T: ?Sized> {
    next_id: u64,
    listeners: Vec<(u64, Listener<T>)>,
}

/// Ordered set of callbacks for events of type `T`
///
/// Cloning yields another handle to the same set.
pub struct ListenerSet<T: ?Sized> {
    registry: Arc<Mutex<Registry<T>>>,
}

impl<T: ?Sized + 'static> ListenerSet<T> {
    #[must_use]
    pub fn new() -> Self {
        Self { registry: Arc::new(Mutex::new(Registry { next_id: 0, listeners: Vec::new() })) }
    }

    /// Register `listener`; it stays registered until the returned
    /// subscription is unsubscribed
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let id = {
            let mut registry = self.registry.lock();
            let id = registry.next_id;
            registry.next_id += 1;
            registry.listeners.push((id, Arc::new(listener)));
            id
        };

        let weak: Weak<Mutex<Registry<T>>> = Arc::downgrade(&self.registry);
        Subscription::new(move || {
            if let Some(registry) = weak.upgrade() {
                registry.lock().listeners.retain(|(listener_id, _)| *listener_id != id);
            }
        })
    }

    /// Invoke every listener registered at the time of the call, in
    /// registration order
    pub fn notify(&self, event: &T) {
        let snapshot: Vec<Listener<T>> =
            self.registry.lock().listeners.iter().map(|(_, listener)| Arc::clone(listener)).collect();

        for listener in snapshot {
            listener(event);
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.registry.lock().listeners.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: ?Sized + 'static> Default for ListenerSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> Clone for ListenerSet<T> {
    fn clone(&self) -> Self {
        Self { registry: Arc::clone(&self.registry) }
    }
}

impl<T: ?Sized> fmt::Debug for ListenerSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerSet").field("listeners", &self.registry.lock().listeners.len()).finish()
    }
}

/// Handle for removing a registered listener
///
/// Dropping the handle leaves the listener registered.
#[must_use = "dropping a Subscription keeps the listener registered forever"]
pub struct Subscription {
    remover: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    pub fn new<F>(remover: F) -> Self
    where
        F: FnOnce() + Send + Sync + 'static,
    {
        Self { remover: Some(Box::new(remover)) }
    }

    /// Remove the listener; later notifications no longer reach it
    pub fn unsubscribe(mut self) {
        if let Some(remover) = self.remover.take() {
            remover();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("active", &self.remover.is_some()).finish()
    }
}
