//! Bearer token persistence
//!
//! Manages the token lifecycle against a durable key-value store:
//! - Cached token and expiry, re-read from storage when the cache is empty
//! - Set/clear with debug-log entries and subscriber notification
//! - Re-sync when another context changes either storage key

use std::fmt;
use std::sync::{Arc, Weak};

use chrono::Utc;
use noteapp_common::{KeyValueStore, ListenerSet, StorageEvent, StorageResult, Subscription};
use noteapp_domain::constants::{TOKEN_EXPIRY_STORAGE_KEY, TOKEN_STORAGE_KEY};
use noteapp_domain::DebugPhase;
use parking_lot::Mutex;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::debug::{details, mask_token, DebugLog};

#[derive(Debug, Default)]
struct TokenCache {
    token: Option<String>,
    expires_at: Option<i64>,
}

struct Inner {
    storage: Arc<dyn KeyValueStore>,
    debug_log: Arc<DebugLog>,
    cache: Mutex<TokenCache>,
    listeners: ListenerSet<Option<String>>,
}

impl Inner {
    fn read_key(&self, key: &str) -> Option<String> {
        match self.storage.get(key) {
            Ok(value) => value,
            Err(err) => {
                warn!(key, error = %err, "Failed to read token storage");
                None
            }
        }
    }

    fn sync_from_storage(&self, cache: &mut TokenCache) {
        cache.token = self.read_key(TOKEN_STORAGE_KEY);
        cache.expires_at = self.read_key(TOKEN_EXPIRY_STORAGE_KEY).and_then(|raw| parse_expiry(&raw));
    }

    fn write_token(&self, token: &str, expires_at: Option<i64>) -> StorageResult<()> {
        self.storage.remove(TOKEN_STORAGE_KEY)?;
        self.storage.remove(TOKEN_EXPIRY_STORAGE_KEY)?;
        self.storage.set(TOKEN_STORAGE_KEY, token)?;
        if let Some(at) = expires_at {
            self.storage.set(TOKEN_EXPIRY_STORAGE_KEY, &at.to_string())?;
        }
        Ok(())
    }

    fn handle_storage_event(&self, event: &StorageEvent) {
        if event.key != TOKEN_STORAGE_KEY && event.key != TOKEN_EXPIRY_STORAGE_KEY {
            return;
        }

        let token = {
            let mut cache = self.cache.lock();
            self.sync_from_storage(&mut cache);
            cache.token.clone()
        };

        debug!(key = %event.key, present = token.is_some(), "Token changed in another context");
        self.listeners.notify(&token);
    }
}

/// Stored expiry is a decimal millisecond timestamp; anything else reads as
/// absent
fn parse_expiry(raw: &str) -> Option<i64> {
    let parsed = raw.trim().parse::<f64>().ok()?;
    #[allow(clippy::cast_possible_truncation)]
    parsed.is_finite().then(|| parsed.trunc() as i64)
}

/// Durable bearer token with change notification
///
/// Cloning is not supported; share it behind an `Arc`.
pub struct TokenStore {
    inner: Arc<Inner>,
    storage_subscription: Option<Subscription>,
}

impl TokenStore {
    /// Create a store over `storage`, loading any persisted token
    pub fn new(storage: Arc<dyn KeyValueStore>, debug_log: Arc<DebugLog>) -> Self {
        let inner = Arc::new(Inner {
            storage,
            debug_log,
            cache: Mutex::new(TokenCache::default()),
            listeners: ListenerSet::new(),
        });

        inner.sync_from_storage(&mut inner.cache.lock());

        let weak: Weak<Inner> = Arc::downgrade(&inner);
        let storage_subscription = inner.storage.subscribe(Box::new(move |event| {
            if let Some(inner) = weak.upgrade() {
                inner.handle_storage_event(event);
            }
        }));

        Self { inner, storage_subscription: Some(storage_subscription) }
    }

    /// Current token, re-read from storage when none is cached
    pub fn token(&self) -> Option<String> {
        let mut cache = self.inner.cache.lock();
        if cache.token.is_none() {
            self.inner.sync_from_storage(&mut cache);
        }
        cache.token.clone()
    }

    /// Recorded expiry in milliseconds since the Unix epoch
    pub fn token_expiry(&self) -> Option<i64> {
        let mut cache = self.inner.cache.lock();
        if cache.expires_at.is_none() {
            self.inner.sync_from_storage(&mut cache);
        }
        cache.expires_at
    }

    /// Persist `token`, with an expiry `expires_in_seconds` from now when the
    /// lifetime is finite
    ///
    /// Storage is written before the cache so no lock is held while other
    /// contexts are notified.
    ///
    /// # Errors
    /// Returns the storage error if either key cannot be written; the cache
    /// is then re-read from storage so it reflects what was persisted.
    pub fn set_token(&self, token: &str, expires_in_seconds: Option<f64>) -> StorageResult<()> {
        #[allow(clippy::cast_possible_truncation)]
        let expires_at = expires_in_seconds
            .filter(|seconds| seconds.is_finite())
            .map(|seconds| Utc::now().timestamp_millis() + (seconds * 1000.0).round() as i64);

        if let Err(err) = self.inner.write_token(token, expires_at) {
            warn!(error = %err, "Failed to store token");
            self.inner.sync_from_storage(&mut self.inner.cache.lock());
            return Err(err);
        }

        {
            let mut cache = self.inner.cache.lock();
            cache.token = Some(token.to_string());
            cache.expires_at = expires_at;
        }

        let preview = mask_token(Some(token));
        match expires_at {
            Some(at) => {
                info!(token = %preview, expires_at = at, "Token stored");
                self.inner.debug_log.add_entry(
                    DebugPhase::Token,
                    "Token stored",
                    details(json!({ "tokenPreview": preview, "expiresAt": at })),
                );
            }
            None => {
                info!(token = %preview, "Token stored without expiry");
                self.inner.debug_log.add_entry(
                    DebugPhase::Token,
                    "Token stored (no expiry)",
                    details(json!({ "tokenPreview": preview })),
                );
            }
        }

        self.inner.listeners.notify(&Some(token.to_string()));
        Ok(())
    }

    /// Remove the token and its expiry
    ///
    /// The cache is cleared and subscribers are notified even when storage
    /// fails.
    ///
    /// # Errors
    /// Returns the first storage error encountered.
    pub fn clear_token(&self) -> StorageResult<()> {
        let storage = &self.inner.storage;
        let token_removed = storage.remove(TOKEN_STORAGE_KEY);
        let expiry_removed = storage.remove(TOKEN_EXPIRY_STORAGE_KEY);
        *self.inner.cache.lock() = TokenCache::default();
        let result = token_removed.and(expiry_removed);

        if let Err(err) = &result {
            warn!(error = %err, "Failed to remove token from storage");
        }

        info!("Token cleared");
        self.inner.debug_log.add_entry(DebugPhase::Token, "Token cleared", None);
        self.inner.listeners.notify(&None);
        result
    }

    /// Observe token changes, local and external
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(Option<&str>) + Send + Sync + 'static,
    {
        self.inner.listeners.subscribe(move |token: &Option<String>| listener(token.as_deref()))
    }
}

impl Drop for TokenStore {
    fn drop(&mut self) {
        if let Some(subscription) = self.storage_subscription.take() {
            subscription.unsubscribe();
        }
    }
}

impl fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cache = self.inner.cache.lock();
        f.debug_struct("TokenStore")
            .field("token", &cache.token.as_deref().map(|t| mask_token(Some(t))))
            .field("expires_at", &cache.expires_at)
            .finish()
    }
}
