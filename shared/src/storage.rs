//! Persisted client-local records.
//!
//! Records are JSON documents under a fixed key, wrapped as
//! `{"state": ..., "version": 0}`. Reads and writes are best-effort: a
//! broken or missing record falls back to the default state.

use std::cell::RefCell;
use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::StorageError;

pub const RECORD_VERSION: u32 = 0;

/// String key/value storage in the shape of `window.localStorage`.
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get_item(key)
    }
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set_item(key, value)
    }
    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove_item(key)
    }
}

/// Process-memory store for tests and non-browser hosts.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw stored text, for inspecting what was written.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items
            .borrow_mut()
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Persisted<T> {
    pub state: T,
    #[serde(default)]
    pub version: u32,
}

/// Read the record under `key`, or the default state if it can't be read.
pub fn load_record<T, S>(store: &S, key: &str) -> T
where
    T: DeserializeOwned + Default,
    S: KeyValueStore + ?Sized,
{
    let raw = match store.get_item(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return T::default(),
        Err(e) => {
            tracing::warn!(key, error = %e, "storage read failed, using defaults");
            return T::default();
        }
    };
    match serde_json::from_str::<Persisted<T>>(&raw) {
        Ok(record) => record.state,
        Err(e) => {
            tracing::warn!(key, error = %e, "stored record is corrupt, using defaults");
            T::default()
        }
    }
}

/// Write `state` under `key`. Failures are logged, never returned.
pub fn save_record<T, S>(store: &S, key: &str, state: &T)
where
    T: Serialize,
    S: KeyValueStore + ?Sized,
{
    let record = Persisted {
        state,
        version: RECORD_VERSION,
    };
    let raw = match serde_json::to_string(&record) {
        Ok(raw) => raw,
        Err(e) => {
            tracing::warn!(key, error = %e, "could not encode record");
            return;
        }
    };
    if let Err(e) = store.set_item(key, &raw) {
        tracing::warn!(key, error = %e, "storage write failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Counter {
        hits: u32,
    }

    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get_item(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable("private mode".into()))
        }
        fn set_item(&self, key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Write {
                key: key.into(),
                reason: "quota exceeded".into(),
            })
        }
        fn remove_item(&self, _key: &str) -> Result<(), StorageError> {
            Ok(())
        }
    }

    #[test]
    fn record_is_wrapped_in_envelope() {
        let store = MemoryStore::new();
        save_record(&store, "counter", &Counter { hits: 3 });
        assert_eq!(
            store.raw("counter").as_deref(),
            Some(r#"{"state":{"hits":3},"version":0}"#)
        );
        assert_eq!(load_record::<Counter, _>(&store, "counter"), Counter { hits: 3 });
    }

    #[test]
    fn missing_or_corrupt_record_gives_default() {
        let store = MemoryStore::new();
        assert_eq!(load_record::<Counter, _>(&store, "counter"), Counter::default());

        store.set_item("counter", "{not json").unwrap();
        assert_eq!(load_record::<Counter, _>(&store, "counter"), Counter::default());
    }

    #[test]
    fn storage_failures_are_swallowed() {
        save_record(&BrokenStore, "counter", &Counter { hits: 1 });
        assert_eq!(
            load_record::<Counter, _>(&BrokenStore, "counter"),
            Counter::default()
        );
    }
}
