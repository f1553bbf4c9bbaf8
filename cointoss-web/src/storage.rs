//! `localStorage` backend for the stats engine.

use cointoss_core::KeyValueStore;

use crate::dom;

/// Web-specific key-value store using `localStorage`
#[derive(Debug, Clone, Copy, Default)]
pub struct WebStorage;

#[derive(Debug, thiserror::Error)]
pub enum WebStorageError {
    #[error("localStorage unavailable: {0}")]
    Unavailable(String),
    #[error("localStorage {op} failed for {key}: {message}")]
    Operation {
        op: &'static str,
        key: String,
        message: String,
    },
}

impl KeyValueStore for WebStorage {
    type Error = WebStorageError;

    fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        let storage = dom::local_storage()
            .map_err(|err| WebStorageError::Unavailable(dom::js_error_message(&err)))?;
        storage
            .get_item(key)
            .map_err(|err| WebStorageError::Operation {
                op: "read",
                key: key.to_string(),
                message: dom::js_error_message(&err),
            })
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        let storage = dom::local_storage()
            .map_err(|err| WebStorageError::Unavailable(dom::js_error_message(&err)))?;
        storage
            .set_item(key, value)
            .map_err(|err| WebStorageError::Operation {
                op: "write",
                key: key.to_string(),
                message: dom::js_error_message(&err),
            })
    }
}
