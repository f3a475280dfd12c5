//! Implements an in-memory key-value store.

use std::{
    cell::{Cell, RefCell},
    collections::HashMap,
};

use crate::{Error, stores::KeyValueStore};

/// Keeps values in memory for the lifetime of the store.
///
/// An optional quota limits the total number of bytes across all keys and
/// values, which makes it possible to exercise failed writes.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    entries: RefCell<HashMap<String, String>>,
    quota: Option<usize>,
    writes: Cell<usize>,
}

impl MemoryKeyValueStore {
    /// Create an empty store with no size limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store that rejects writes once keys and values take
    /// up more than `limit` bytes.
    pub fn with_quota(limit: usize) -> Self {
        Self {
            quota: Some(limit),
            ..Self::default()
        }
    }

    /// The number of successful calls to [KeyValueStore::set].
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, Error> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    /// # Errors
    /// Returns [Error::QuotaExceeded] if the write would take the store over
    /// its quota. The previous value is kept in that case.
    fn set(&self, key: &str, value: &str) -> Result<(), Error> {
        let mut entries = self.entries.borrow_mut();

        if let Some(limit) = self.quota {
            let used: usize = entries
                .iter()
                .filter(|(existing_key, _)| existing_key.as_str() != key)
                .map(|(existing_key, existing_value)| existing_key.len() + existing_value.len())
                .sum();

            if used + key.len() + value.len() > limit {
                return Err(Error::QuotaExceeded { limit });
            }
        }

        entries.insert(key.to_owned(), value.to_owned());
        self.writes.set(self.writes.get() + 1);

        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), Error> {
        self.entries.borrow_mut().remove(key);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{Error, stores::KeyValueStore};

    use super::MemoryKeyValueStore;

    #[test]
    fn set_then_get() {
        let store = MemoryKeyValueStore::new();

        store.set("greeting", "hello").unwrap();

        assert_eq!(store.get("greeting"), Ok(Some("hello".to_owned())));
        assert_eq!(store.get("missing"), Ok(None));
        assert_eq!(store.write_count(), 1);
    }

    #[test]
    fn remove_deletes_value() {
        let store = MemoryKeyValueStore::new();
        store.set("greeting", "hello").unwrap();

        store.remove("greeting").unwrap();

        assert_eq!(store.get("greeting"), Ok(None));
        assert_eq!(store.remove("greeting"), Ok(()));
    }

    #[test]
    fn quota_rejects_large_writes_and_keeps_old_value() {
        let store = MemoryKeyValueStore::with_quota(10);
        store.set("k", "12345").unwrap();

        let result = store.set("k", "1234567890");

        assert_eq!(result, Err(Error::QuotaExceeded { limit: 10 }));
        assert_eq!(store.get("k"), Ok(Some("12345".to_owned())));
        assert_eq!(store.write_count(), 1);
    }

    #[test]
    fn quota_counts_replaced_value_once() {
        let store = MemoryKeyValueStore::with_quota(6);
        store.set("k", "12345").unwrap();

        assert_eq!(store.set("k", "54321"), Ok(()));
    }
}
