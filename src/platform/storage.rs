//! Key-value storage capability
//!
//! Every persisted record goes through [`KvStore`], which mirrors the
//! browser's `localStorage` surface. Tests and native builds use
//! [`MemoryStore`]; the browser build wires in `window.localStorage`.

use std::cell::RefCell;
use std::collections::HashMap;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Failure talking to the backing store
#[derive(Debug, Error)]
pub enum StorageError {
    /// No storage available (disabled, private mode, no window)
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    /// Write rejected because the store is full
    #[error("storage quota exceeded while writing `{key}`")]
    QuotaExceeded { key: String },
    /// Any other rejected write
    #[error("failed to write `{key}`: {reason}")]
    Write { key: String, reason: String },
    #[error("failed to serialize value: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// String key-value store with `localStorage` semantics
pub trait KvStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

impl<S: KvStore + ?Sized> KvStore for &S {
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

/// Load and decode a JSON value.
///
/// Missing keys and malformed JSON both come back as `Ok(None)`; only a
/// failing backend is an error.
pub fn load_json<T, S>(store: &S, key: &str) -> Result<Option<T>, StorageError>
where
    T: DeserializeOwned,
    S: KvStore + ?Sized,
{
    let Some(raw) = store.get_item(key)? else {
        return Ok(None);
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            log::warn!("Ignoring malformed value under `{}`: {}", key, e);
            Ok(None)
        }
    }
}

/// Encode a value as JSON and store it, replacing any previous value
pub fn save_json<T, S>(store: &S, key: &str, value: &T) -> Result<(), StorageError>
where
    T: Serialize + ?Sized,
    S: KvStore + ?Sized,
{
    let json = serde_json::to_string(value)?;
    store.set_item(key, &json)
}

/// In-memory store, optionally with a byte quota like a real browser
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: RefCell<HashMap<String, String>>,
    quota_bytes: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that rejects writes once keys + values exceed `quota_bytes`
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            items: RefCell::new(HashMap::new()),
            quota_bytes: Some(quota_bytes),
        }
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }

    fn used_bytes_without(&self, key: &str) -> usize {
        self.items
            .borrow()
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }
}

impl KvStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if let Some(quota) = self.quota_bytes {
            if self.used_bytes_without(key) + key.len() + value.len() > quota {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_string(),
                });
            }
        }
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_missing_key_is_none() {
        let store = MemoryStore::new();
        let value: Option<Vec<u32>> = load_json(&store, "nothing").unwrap();
        assert!(value.is_none());
    }

    #[test]
    fn test_load_malformed_is_none() {
        let store = MemoryStore::new();
        store.set_item("k", "{not json").unwrap();
        let value: Option<Vec<u32>> = load_json(&store, "k").unwrap();
        assert!(value.is_none());
    }

    #[test]
    fn test_save_then_load() {
        let store = MemoryStore::new();
        save_json(&store, "k", &vec![3u32, 1, 2]).unwrap();
        assert_eq!(store.get_item("k").unwrap().as_deref(), Some("[3,1,2]"));
        let value: Option<Vec<u32>> = load_json(&store, "k").unwrap();
        assert_eq!(value, Some(vec![3, 1, 2]));
    }

    #[test]
    fn test_quota_rejects_large_write() {
        let store = MemoryStore::with_quota(8);
        store.set_item("a", "1234").unwrap();
        let err = store.set_item("b", "123456").unwrap_err();
        assert!(matches!(err, StorageError::QuotaExceeded { ref key } if key == "b"));
        // Overwriting an existing key only counts the new value
        store.set_item("a", "1234567").unwrap();
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_remove_item() {
        let store = MemoryStore::new();
        store.set_item("k", "v").unwrap();
        store.remove_item("k").unwrap();
        assert!(store.is_empty());
    }
}
