//! Integration tests for the `storage` module.
//!
//! Covers cross-context notifications for the shared in-memory store and
//! external-change detection for the file store, including listeners that
//! unsubscribe.

#![cfg(feature = "platform")]

use std::sync::Arc;

use noteapp_common::{
    FileStorage, KeyValueStore, SharedMemoryStorage, StorageEvent, Subscription,
};
use parking_lot::Mutex;
use tempfile::TempDir;

fn record(store: &dyn KeyValueStore) -> (Arc<Mutex<Vec<StorageEvent>>>, Subscription) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let subscription = store.subscribe(Box::new(move |event| sink.lock().push(event.clone())));
    (seen, subscription)
}

/// Verifies a removal in one context reaches listeners of the others.
#[test]
fn test_memory_contexts_broadcast_changes() {
    let tab_a = SharedMemoryStorage::new();
    let tab_b = tab_a.context();
    let tab_c = tab_a.context();
    let (seen_b, _sub_b) = record(&tab_b);
    let (seen_c, sub_c) = record(&tab_c);

    tab_a.set("noteapp:token", "t1").unwrap();
    sub_c.unsubscribe();
    tab_a.remove("noteapp:token").unwrap();

    assert_eq!(
        *seen_b.lock(),
        vec![
            StorageEvent::new("noteapp:token", Some("t1".into())),
            StorageEvent::new("noteapp:token", None),
        ]
    );
    assert_eq!(seen_c.lock().len(), 1);
}

/// Verifies two file stores on the same path see each other through rescan.
#[test]
fn test_file_storage_rescan_reports_external_writes() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("session.json");

    let writer = FileStorage::open(&path).unwrap();
    let reader = FileStorage::open(&path).unwrap();
    let (seen, _sub) = record(&reader);

    writer.set("noteapp:token", "t1").unwrap();
    writer.set("noteapp:token-expiry", "1700000000000").unwrap();
    assert_eq!(reader.get("noteapp:token").unwrap(), None);

    assert_eq!(reader.rescan().unwrap(), 2);
    assert_eq!(reader.get("noteapp:token").unwrap().as_deref(), Some("t1"));
    assert_eq!(seen.lock().len(), 2);

    writer.remove("noteapp:token").unwrap();
    assert_eq!(reader.rescan().unwrap(), 1);
    assert_eq!(seen.lock().last(), Some(&StorageEvent::new("noteapp:token", None)));

    assert_eq!(reader.rescan().unwrap(), 0);
}

/// Verifies the writing file store does not notify its own listeners.
#[test]
fn test_file_storage_own_writes_are_silent() {
    let dir = TempDir::new().unwrap();
    let store = FileStorage::open(dir.path().join("session.json")).unwrap();
    let (seen, _sub) = record(&store);

    store.set("k", "v").unwrap();
    assert_eq!(store.rescan().unwrap(), 0);
    assert!(seen.lock().is_empty());
}

/// Verifies a handle that never rescanned still removes a key written by
/// another handle.
#[test]
fn test_file_storage_remove_through_stale_handle() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("session.json");

    let writer = FileStorage::open(&path).unwrap();
    let stale = FileStorage::open(&path).unwrap();
    writer.set("noteapp:token", "abc").unwrap();

    stale.remove("noteapp:token").unwrap();

    let reopened = FileStorage::open(&path).unwrap();
    assert_eq!(reopened.get("noteapp:token").unwrap(), None);
}

/// Verifies a write from a stale handle keeps keys added by another handle
/// and announces them.
#[test]
fn test_file_storage_set_through_stale_handle_keeps_other_keys() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("session.json");

    let writer = FileStorage::open(&path).unwrap();
    let stale = FileStorage::open(&path).unwrap();
    let (seen, _sub) = record(&stale);
    writer.set("noteapp:token-expiry", "123").unwrap();

    stale.set("noteapp:token", "t").unwrap();

    let reopened = FileStorage::open(&path).unwrap();
    assert_eq!(reopened.get("noteapp:token-expiry").unwrap().as_deref(), Some("123"));
    assert_eq!(reopened.get("noteapp:token").unwrap().as_deref(), Some("t"));
    assert_eq!(stale.get("noteapp:token-expiry").unwrap().as_deref(), Some("123"));
    assert_eq!(*seen.lock(), vec![StorageEvent::new("noteapp:token-expiry", Some("123".into()))]);
}
