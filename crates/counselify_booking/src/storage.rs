//! Best-effort scratch storage for in-progress selections.
//!
//! Persistence is a convenience: every caller in the engine logs and drops
//! storage errors instead of propagating them.

use crate::time::{date_key, parse_date_key};
use chrono::NaiveDate;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Scratch storage unavailable: {0}")]
    Unavailable(String),
    #[error("Scratch storage I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Scratch storage is corrupt: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<StorageError> for counselify_common::CounselifyError {
    fn from(err: StorageError) -> Self {
        counselify_common::CounselifyError::StorageError(err.to_string())
    }
}

/// A synchronous key-value store, e.g. the browser's session storage or a
/// file on disk.
pub trait ScratchStorage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Process-local storage.
#[derive(Debug, Default)]
pub struct MemoryScratchStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryScratchStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, StorageError> {
        self.entries
            .lock()
            .map_err(|_| StorageError::Unavailable("memory storage lock poisoned".to_string()))
    }
}

impl ScratchStorage for MemoryScratchStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.lock()?.remove(key);
        Ok(())
    }
}

/// Storage kept as one JSON object in a file, re-read on every access.
///
/// Last write wins; there is no locking across processes.
#[derive(Debug, Clone)]
pub struct FileScratchStorage {
    path: PathBuf,
}

impl FileScratchStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_all(&self) -> Result<Map<String, Value>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) if contents.trim().is_empty() => Ok(Map::new()),
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Map::new()),
            Err(err) => Err(err.into()),
        }
    }

    fn write_all(&self, entries: &Map<String, Value>) -> Result<(), StorageError> {
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(entries)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl ScratchStorage for FileScratchStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self
            .read_all()?
            .get(key)
            .and_then(Value::as_str)
            .map(str::to_string))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.read_all()?;
        entries.insert(key.to_string(), Value::String(value.to_string()));
        self.write_all(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.read_all()?;
        if entries.remove(key).is_some() {
            self.write_all(&entries)?;
        }
        Ok(())
    }
}

/// Storage that fails every call, like a browser with storage disabled.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableStorage;

impl ScratchStorage for UnavailableStorage {
    fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Unavailable("storage disabled".to_string()))
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable("storage disabled".to_string()))
    }

    fn remove(&self, _key: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable("storage disabled".to_string()))
    }
}

/// The two scratch entries of one counselor.
///
/// Keys are `"{prefix}:{counselor_id}:date"` and `"{prefix}:{counselor_id}:slot"`.
/// All methods swallow storage failures after logging them.
#[derive(Clone)]
pub struct CounselorScratch {
    storage: Arc<dyn ScratchStorage>,
    date_key: String,
    slot_key: String,
}

impl CounselorScratch {
    pub fn new(storage: Arc<dyn ScratchStorage>, prefix: &str, counselor_id: &str) -> Self {
        Self {
            storage,
            date_key: format!("{}:{}:date", prefix, counselor_id),
            slot_key: format!("{}:{}:slot", prefix, counselor_id),
        }
    }

    pub fn date_key(&self) -> &str {
        &self.date_key
    }

    pub fn slot_key(&self) -> &str {
        &self.slot_key
    }

    /// The stored date, or `None` when absent, unreadable or not a date.
    pub fn load_date(&self) -> Option<NaiveDate> {
        let raw = self.read(&self.date_key)?;
        let date = parse_date_key(&raw);
        if date.is_none() {
            warn!("Ignoring corrupt scratch date {:?} under {}", raw, self.date_key);
        }
        date
    }

    pub fn load_slot(&self) -> Option<String> {
        self.read(&self.slot_key).filter(|s| !s.trim().is_empty())
    }

    pub fn save_date(&self, date: NaiveDate) {
        self.write(&self.date_key, Some(&date_key(date)));
    }

    pub fn save_slot(&self, slot_id: Option<&str>) {
        self.write(&self.slot_key, slot_id);
    }

    pub fn clear(&self) {
        self.write(&self.date_key, None);
        self.write(&self.slot_key, None);
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.storage.get(key) {
            Ok(value) => value,
            Err(err) => {
                warn!("Scratch storage read of {} failed: {}", key, err);
                None
            }
        }
    }

    fn write(&self, key: &str, value: Option<&str>) {
        let result = match value {
            Some(value) => self.storage.set(key, value),
            None => self.storage.remove(key),
        };
        if let Err(err) = result {
            warn!("Scratch storage write of {} failed: {}", key, err);
        }
    }
}
