//! Key-value persistence shared by the wizard steps.
//!
//! [`KeyValueStore`] is the injectable backend; [`StoredValues`] is the typed
//! accessor the workflow talks to. Reads through the accessor never fail:
//! a broken entry is logged and treated as absent so the wizard can fall
//! back to its defaults.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::StoreError;

/// Raw JSON key-value backend.
pub trait KeyValueStore {
    /// Read `key`. `Ok(None)` when the key was never written or was removed.
    fn read(&self, key: &str) -> Result<Option<Value>, StoreError>;

    /// Insert or replace `key`.
    fn write(&mut self, key: &str, value: Value) -> Result<(), StoreError>;

    /// Remove `key`. Removing an absent key is not an error.
    fn delete(&mut self, key: &str) -> Result<(), StoreError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &mut S {
    fn read(&self, key: &str) -> Result<Option<Value>, StoreError> {
        (**self).read(key)
    }

    fn write(&mut self, key: &str, value: Value) -> Result<(), StoreError> {
        (**self).write(key, value)
    }

    fn delete(&mut self, key: &str) -> Result<(), StoreError> {
        (**self).delete(key)
    }
}

// ---------------------------------------------------------------------------
// In-memory backend
// ---------------------------------------------------------------------------

/// `HashMap`-backed store for tests and dry runs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryStore {
    entries: HashMap<String, Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with_entry(mut self, key: &str, value: Value) -> Self {
        self.entries.insert(key.to_string(), value);
        self
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: Value) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Typed accessor
// ---------------------------------------------------------------------------

/// Typed read/write wrapper over a [`KeyValueStore`].
#[derive(Debug, Clone, Default)]
pub struct StoredValues<S> {
    store: S,
}

impl<S: KeyValueStore> StoredValues<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Untyped read. JSON `null` counts as absent; failures are logged.
    pub fn get_value(&self, key: &str) -> Option<Value> {
        match self.store.read(key) {
            Ok(Some(Value::Null)) | Ok(None) => None,
            Ok(Some(value)) => Some(value),
            Err(err) => {
                tracing::warn!(key, error = %err, "failed to read stored value");
                None
            }
        }
    }

    /// Typed read. A value that does not deserialize as `T` is logged and
    /// reported as absent.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.get_value(key)?;
        match serde_json::from_value(value) {
            Ok(parsed) => Some(parsed),
            Err(err) => {
                tracing::warn!(key, error = %err, "stored value has unexpected shape");
                None
            }
        }
    }

    pub fn set<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<(), StoreError> {
        let value = serde_json::to_value(value)?;
        self.store.write(key, value)
    }

    pub fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.store.delete(key)
    }

    /// Remove every key in `keys`, continuing past individual failures.
    ///
    /// Returns the number of keys removed without error.
    pub fn purge(&mut self, keys: &[&str]) -> usize {
        let mut removed = 0;
        for key in keys {
            match self.store.delete(key) {
                Ok(()) => removed += 1,
                Err(err) => tracing::warn!(key, error = %err, "failed to remove stored value"),
            }
        }
        removed
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
