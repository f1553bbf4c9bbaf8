//! Persistence keys, the storage error type, and an in-memory store.
use std::cell::RefCell;
use std::collections::HashMap;
use std::convert::Infallible;
use std::rc::Rc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::KeyValueStore;

/// Key holding the serialized [`crate::TossStats`].
pub const STATS_KEY: &str = "tossStats";
/// Key holding the serialized [`crate::AchievementSet`].
pub const ACHIEVEMENTS_KEY: &str = "achievements";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Storage error: {0}")]
    Backend(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Serialize `value` and write it under `key`.
///
/// # Errors
///
/// Returns an error if serialization fails or the backend rejects the write.
pub fn save_json<S, T>(store: &S, key: &str, value: &T) -> Result<(), StorageError>
where
    S: KeyValueStore,
    T: Serialize,
{
    let blob = serde_json::to_string(value)?;
    store
        .set(key, &blob)
        .map_err(|err| StorageError::Backend(err.to_string()))
}

/// Read and parse the value under `key`. `Ok(None)` when nothing is stored.
///
/// # Errors
///
/// Returns an error if the backend read fails or the stored blob is malformed.
pub fn load_json<S, T>(store: &S, key: &str) -> Result<Option<T>, StorageError>
where
    S: KeyValueStore,
    T: DeserializeOwned,
{
    let Some(blob) = store
        .get(key)
        .map_err(|err| StorageError::Backend(err.to_string()))?
    else {
        return Ok(None);
    };
    Ok(Some(serde_json::from_str(&blob)?))
}

/// Load `key`, substituting `T::default()` for missing or unreadable data.
pub fn load_or_default<S, T>(store: &S, key: &str) -> T
where
    S: KeyValueStore,
    T: DeserializeOwned + Default,
{
    match load_json(store, key) {
        Ok(Some(value)) => value,
        Ok(None) => T::default(),
        Err(err) => {
            log::warn!("discarding stored {key}: {err}");
            T::default()
        }
    }
}

/// Shared in-memory store; clones see the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw blob stored under `key`, if any.
    #[must_use]
    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    pub fn insert_raw(&self, key: &str, blob: &str) {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), blob.to_string());
    }
}

impl KeyValueStore for MemoryStore {
    type Error = Infallible;

    fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        self.insert_raw(key, value);
        Ok(())
    }
}
