//! Store interface consumed by the lock registry reader.
//!
//! The reader never owns a store connection. It receives a handle
//! implementing [`LockStore`]. The production handle wraps whatever client
//! the deployment uses, while [`MemoryStore`] backs tests and in-process
//! embedding.
//!
//! # Watch Bracketing
//!
//! `watch`/`unwatch` expose the store's optimistic-concurrency marker so
//! that reads can be bracketed 1:1. Backends without such a primitive may
//! implement them as no-ops.

use crate::error::Result;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

/// Key-value store handle the lock registry reads from.
pub trait LockStore {
    /// Fetch the raw value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Enumerate the key names currently present, in store-defined order.
    fn keys(&self) -> Result<Vec<String>>;

    /// Begin watching `key` for concurrent modification.
    fn watch(&self, key: &str) -> Result<()>;

    /// End the current watch.
    fn unwatch(&self) -> Result<()>;
}

/// A watch or unwatch call observed by [`MemoryStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchEvent {
    /// `watch(key)` was called.
    Watch(String),
    /// `unwatch()` was called.
    Unwatch,
}

/// In-process store backend.
///
/// Keys enumerate in sorted order. Watch calls are recorded rather than
/// enforced; the log lets callers verify the read bracket.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<MemoryInner>,
}

#[derive(Debug, Default)]
struct MemoryInner {
    entries: BTreeMap<String, String>,
    watch_log: Vec<WatchEvent>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the value under `key`.
    pub fn set(&self, key: &str, value: &str) {
        self.lock_inner()
            .entries
            .insert(key.to_string(), value.to_string());
    }

    /// Remove the value under `key`, if present.
    pub fn remove(&self, key: &str) {
        self.lock_inner().entries.remove(key);
    }

    /// The watch/unwatch calls observed so far, in order.
    pub fn watch_events(&self) -> Vec<WatchEvent> {
        self.lock_inner().watch_log.clone()
    }

    fn lock_inner(&self) -> MutexGuard<'_, MemoryInner> {
        // Poisoning only means another holder panicked; the map is still usable.
        self.inner
            .lock()
            .unwrap_or_else(|poison| poison.into_inner())
    }
}

impl LockStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock_inner().entries.get(key).cloned())
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.lock_inner().entries.keys().cloned().collect())
    }

    fn watch(&self, key: &str) -> Result<()> {
        self.lock_inner()
            .watch_log
            .push(WatchEvent::Watch(key.to_string()));
        Ok(())
    }

    fn unwatch(&self) -> Result<()> {
        self.lock_inner().watch_log.push(WatchEvent::Unwatch);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_returns_stored_value() {
        let store = MemoryStore::new();
        store.set("lock:1", "payload");

        assert_eq!(store.get("lock:1").unwrap(), Some("payload".to_string()));
        assert_eq!(store.get("lock:2").unwrap(), None);
    }

    #[test]
    fn set_replaces_existing_value() {
        let store = MemoryStore::new();
        store.set("lock:1", "old");
        store.set("lock:1", "new");

        assert_eq!(store.get("lock:1").unwrap(), Some("new".to_string()));
    }

    #[test]
    fn remove_deletes_value() {
        let store = MemoryStore::new();
        store.set("lock:1", "payload");
        store.remove("lock:1");

        assert_eq!(store.get("lock:1").unwrap(), None);
        assert!(store.keys().unwrap().is_empty());
    }

    #[test]
    fn keys_enumerate_in_sorted_order() {
        let store = MemoryStore::new();
        store.set("b", "2");
        store.set("a", "1");
        store.set("c", "3");

        assert_eq!(store.keys().unwrap(), vec!["a", "b", "c"]);
    }

    #[test]
    fn watch_calls_are_logged_in_order() {
        let store = MemoryStore::new();
        store.watch("a").unwrap();
        store.unwatch().unwrap();
        store.watch("b").unwrap();
        store.unwatch().unwrap();

        assert_eq!(
            store.watch_events(),
            vec![
                WatchEvent::Watch("a".to_string()),
                WatchEvent::Unwatch,
                WatchEvent::Watch("b".to_string()),
                WatchEvent::Unwatch,
            ]
        );
    }
}
