//! File-backed storage
//!
//! Values live in a single JSON object on disk. Writes replace the file
//! atomically (temp file + rename) after re-reading the current contents, so
//! a write only ever changes its own key. Changes made by another process
//! become visible through [`FileStorage::rescan`] or the next write, which
//! report each differing key to the subscribed listeners.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use tracing::{debug, warn};

use super::error::StorageResult;
use super::traits::{KeyValueStore, StorageEvent, StorageListener};
use crate::events::{ListenerSet, Subscription};

/// Key-value store persisted as a JSON file
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    values: Mutex<HashMap<String, String>>,
    listeners: ListenerSet<StorageEvent>,
}

impl FileStorage {
    /// Open the store at `path`, creating nothing until the first write
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or is not a
    /// JSON object of strings.
    pub fn open(path: impl Into<PathBuf>) -> StorageResult<Self> {
        let path = path.into();
        let values = read_values(&path)?;
        debug!(path = %path.display(), keys = values.len(), "Opened file storage");
        Ok(Self { path, values: Mutex::new(values), listeners: ListenerSet::new() })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Re-read the file and announce keys changed by another writer
    ///
    /// Returns the number of changed keys.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed; the cached
    /// values are left untouched in that case.
    pub fn rescan(&self) -> StorageResult<usize> {
        let on_disk = read_values(&self.path)?;

        let events = {
            let mut cached = self.values.lock();
            let events = diff_values(&cached, &on_disk, None);
            *cached = on_disk;
            events
        };

        self.announce(&events);
        Ok(events.len())
    }

    /// Apply a single-key change on top of the current file contents
    ///
    /// Keys another writer changed since the last read are adopted and
    /// announced; they are never overwritten by this handle's cache.
    fn write_key(&self, key: &str, value: Option<&str>) -> StorageResult<()> {
        let (events, result) = {
            let mut cached = self.values.lock();
            let on_disk = read_values(&self.path)?;
            let events = diff_values(&cached, &on_disk, Some(key));

            let mut next = on_disk.clone();
            let changed = match value {
                Some(value) => {
                    next.insert(key.to_string(), value.to_string()).as_deref() != Some(value)
                }
                None => next.remove(key).is_some(),
            };

            let result = if changed { self.persist(&next) } else { Ok(()) };
            *cached = if result.is_ok() { next } else { on_disk };
            (events, result)
        };

        self.announce(&events);
        result
    }

    fn announce(&self, events: &[StorageEvent]) {
        if !events.is_empty() {
            debug!(path = %self.path.display(), changed = events.len(), "External storage changes");
        }
        for event in events {
            self.listeners.notify(event);
        }
    }

    fn persist(&self, values: &HashMap<String, String>) -> StorageResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let payload = serde_json::to_vec_pretty(values)?;
        let temp = self.path.with_extension("tmp");
        fs::write(&temp, payload)?;
        if let Err(err) = fs::rename(&temp, &self.path) {
            warn!(path = %self.path.display(), error = %err, "Failed to replace storage file");
            let _ = fs::remove_file(&temp);
            return Err(err.into());
        }
        Ok(())
    }
}

/// Keys whose value differs between `cached` and `on_disk`, except `skip`
fn diff_values(
    cached: &HashMap<String, String>,
    on_disk: &HashMap<String, String>,
    skip: Option<&str>,
) -> Vec<StorageEvent> {
    let mut events: Vec<StorageEvent> = on_disk
        .iter()
        .filter(|(key, value)| cached.get(*key) != Some(*value))
        .map(|(key, value)| StorageEvent::new(key.clone(), Some(value.clone())))
        .collect();
    events.extend(
        cached
            .keys()
            .filter(|key| !on_disk.contains_key(*key))
            .map(|key| StorageEvent::new(key.clone(), None)),
    );
    events.retain(|event| skip != Some(event.key.as_str()));
    events
}

fn read_values(path: &Path) -> StorageResult<HashMap<String, String>> {
    match fs::read(path) {
        Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Ok(HashMap::new()),
        Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(HashMap::new()),
        Err(err) => Err(err.into()),
    }
}

impl KeyValueStore for FileStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.values.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.write_key(key, Some(value))
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.write_key(key, None)
    }

    fn subscribe(&self, listener: StorageListener) -> Subscription {
        self.listeners.subscribe(listener)
    }
}
