//! Key-value store contract.
//!
//! The persisted workspace lives under a handful of fixed string keys, each
//! holding one JSON document. Writers never share a key, so no transaction
//! or locking discipline is needed on top of this port.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;

pub const DOCUMENTS_KEY: &str = "documents";
pub const FILE_SYSTEM_KEY: &str = "txtwFileSystem";
pub const LAST_ACTIVE_KEY: &str = "lastActiveDocument";
pub const CURSOR_KEY: &str = "lastCursorPosition";
pub const SCROLL_KEY: &str = "lastScrollPosition";
pub const VERSIONS_KEY: &str = "documentVersions";

#[derive(Debug)]
pub enum StoreError {
    QuotaExceeded { key: String, needed: usize },
    Io(std::io::Error),
    Serialize(serde_json::Error),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::QuotaExceeded { key, needed } => {
                write!(f, "storage quota exceeded writing {key} ({needed} bytes)")
            }
            StoreError::Io(e) => write!(f, "storage io error: {e}"),
            StoreError::Serialize(e) => write!(f, "failed to serialize value: {e}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Io(e) => Some(e),
            StoreError::Serialize(e) => Some(e),
            StoreError::QuotaExceeded { .. } => None,
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::Io(e)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialize(e)
    }
}

/// Synchronous string storage that survives restarts. Writes may fail.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str);
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &mut S {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) {
        (**self).remove(key)
    }
}

/// Reads and parses `key`. Missing keys and malformed JSON both yield `None`;
/// the latter is logged and otherwise ignored.
pub fn read_json<T, S>(store: &S, key: &str) -> Option<T>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    let raw = store.get(key)?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(key, error = %e, "discarding malformed persisted value");
            None
        }
    }
}

/// Serializes and writes `value` under `key`, logging any failure.
pub fn write_json<T, S>(store: &mut S, key: &str, value: &T) -> Result<(), StoreError>
where
    T: Serialize + ?Sized,
    S: KeyValueStore + ?Sized,
{
    let result = serde_json::to_string(value)
        .map_err(StoreError::from)
        .and_then(|raw| store.set(key, &raw));
    if let Err(e) = &result {
        tracing::error!(key, error = %e, "failed to persist value");
    }
    result
}
