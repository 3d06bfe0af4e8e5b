//! In-memory key-value store.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use super::KeyValueStore;
use crate::error::StorageError;

/// A `KeyValueStore` held in a `HashMap`.
///
/// Counts logical writes (a `set_many` batch counts once) and can be
/// switched into a mode where every write fails, to exercise the
/// non-fatal persistence path.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
    fail_writes: AtomicBool,
    writes: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate the store, e.g. with values left by an earlier session.
    pub fn with_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let store = Self::new();
        store
            .lock()
            .extend(entries.into_iter().map(|(k, v)| (k.into(), v.into())));
        store
    }

    /// Make every subsequent write fail (or succeed again).
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of successful logical writes so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Read a raw value without going through the trait.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.lock().get(key).cloned()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn check_writable(&self) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("quota exceeded".into()));
        }
        Ok(())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.check_writable()?;
        self.lock().insert(key.to_string(), value.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn set_many(&self, entries: &[(&str, String)]) -> Result<(), StorageError> {
        self.check_writable()?;
        let mut map = self.lock();
        for (key, value) in entries {
            map.insert(key.to_string(), value.clone());
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_counts_as_one_write() {
        let store = MemoryStore::new();
        store
            .set_many(&[("a", "1".to_string()), ("b", "2".to_string())])
            .unwrap();
        assert_eq!(store.write_count(), 1);
        assert_eq!(store.get("b").unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn failing_writes_leave_contents_untouched() {
        let store = MemoryStore::with_entries([("a", "1")]);
        store.fail_writes(true);
        assert!(matches!(
            store.set("a", "2"),
            Err(StorageError::Unavailable(_))
        ));
        assert_eq!(store.raw("a").as_deref(), Some("1"));
        assert_eq!(store.write_count(), 0);
    }
}
