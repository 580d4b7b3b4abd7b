//! Cache layer that stores timestamped payloads in a storage medium.

use chrono::Utc;
use serde_json::Value;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tracing::{debug, warn};

use super::storage::{CacheStorage, StorageError};
use super::traits::{CacheEntry, CacheStore};

/// Namespace for cache keys inside the shared storage medium.
pub const CACHE_PREFIX: &str = "sm-cache:";

/// Faults absorbed by the cache layer. They are logged, never returned to callers.
#[derive(Debug, Error)]
pub enum CacheError {
  #[error("cache read failed: {0}")]
  Read(String),

  #[error("cache write failed: {0}")]
  Write(String),
}

impl CacheError {
  fn read(e: impl std::fmt::Display) -> Self {
    Self::Read(e.to_string())
  }

  fn write(e: impl std::fmt::Display) -> Self {
    Self::Write(e.to_string())
  }
}

/// Cache store backed by a string storage medium.
///
/// Entries are stored as JSON under `sm-cache:` + key and expire lazily: a
/// read that finds an entry older than its TTL removes it.
pub struct CacheLayer<S: CacheStorage + ?Sized> {
  storage: Arc<S>,
  /// Serializes read-evict and write sequences
  guard: Mutex<()>,
}

impl<S: CacheStorage + ?Sized> CacheLayer<S> {
  /// Create a new cache layer over the given storage backend.
  pub fn new(storage: Arc<S>) -> Self {
    Self {
      storage,
      guard: Mutex::new(()),
    }
  }

  /// Remove every cached response, returning how many entries were dropped.
  pub fn clear(&self) -> Result<usize, StorageError> {
    let _guard = self.guard.lock().unwrap_or_else(|e| e.into_inner());
    self.storage.remove_prefixed(CACHE_PREFIX)
  }

  fn storage_key(key: &str) -> String {
    format!("{}{}", CACHE_PREFIX, key)
  }

  fn read(&self, key: &str, ttl_seconds: u64) -> Result<Option<Value>, CacheError> {
    let storage_key = Self::storage_key(key);

    let raw = match self.storage.get_item(&storage_key).map_err(CacheError::read)? {
      Some(raw) => raw,
      None => return Ok(None),
    };

    let entry: CacheEntry = serde_json::from_str(&raw).map_err(CacheError::read)?;

    if entry.is_expired(ttl_seconds, Utc::now()) {
      debug!(key, ttl_seconds, "cache entry expired, evicting");
      self
        .storage
        .remove_item(&storage_key)
        .map_err(CacheError::read)?;
      return Ok(None);
    }

    Ok(Some(entry.payload))
  }

  fn write(&self, key: &str, payload: &Value) -> Result<(), CacheError> {
    let entry = CacheEntry::new(payload.clone());
    let raw = serde_json::to_string(&entry).map_err(CacheError::write)?;
    self
      .storage
      .set_item(&Self::storage_key(key), &raw)
      .map_err(CacheError::write)
  }
}

impl<S: CacheStorage + ?Sized> CacheStore for CacheLayer<S> {
  fn get(&self, key: &str, ttl_seconds: u64) -> Option<Value> {
    // A poisoned guard only means another reader panicked; the medium is still usable
    let _guard = self.guard.lock().unwrap_or_else(|e| e.into_inner());
    match self.read(key, ttl_seconds) {
      Ok(payload) => payload,
      Err(e) => {
        debug!(key, error = %e, "treating cache fault as a miss");
        None
      }
    }
  }

  fn set(&self, key: &str, payload: &Value) {
    let _guard = self.guard.lock().unwrap_or_else(|e| e.into_inner());
    if let Err(e) = self.write(key, payload) {
      warn!(key, error = %e, "dropping cache write");
    }
  }
}
