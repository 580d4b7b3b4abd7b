//! Storage media for the response cache: a string-keyed, string-valued,
//! size-bounded synchronous store, plus SQLite, in-memory and no-op backends.

use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use thiserror::Error;

/// Default quota for a storage medium, matching a browser's localStorage budget.
pub const DEFAULT_QUOTA_BYTES: u64 = 5 * 1024 * 1024;

/// Errors raised by a storage medium.
#[derive(Debug, Error)]
pub enum StorageError {
  #[error("storage unavailable: {0}")]
  Unavailable(String),

  #[error("storage quota exceeded: {needed} bytes needed, quota is {quota} bytes")]
  QuotaExceeded { needed: u64, quota: u64 },

  #[error("sqlite error: {0}")]
  Sqlite(#[from] rusqlite::Error),
}

pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Trait for cache storage backends.
///
/// Keys and values are plain strings; the medium knows nothing about
/// entries, timestamps or JSON.
pub trait CacheStorage: Send + Sync {
  /// Read the value stored under `key`.
  fn get_item(&self, key: &str) -> StorageResult<Option<String>>;

  /// Store `value` under `key`, replacing any previous value.
  fn set_item(&self, key: &str, value: &str) -> StorageResult<()>;

  /// Remove `key`. Removing a missing key is not an error.
  fn remove_item(&self, key: &str) -> StorageResult<()>;

  /// Remove every key starting with `prefix`, returning how many were removed.
  fn remove_prefixed(&self, prefix: &str) -> StorageResult<usize>;
}

/// Storage implementation that doesn't store anything.
/// Used when caching is disabled - all operations are no-ops.
pub struct NoopStorage;

impl CacheStorage for NoopStorage {
  fn get_item(&self, _key: &str) -> StorageResult<Option<String>> {
    Ok(None) // Always miss
  }

  fn set_item(&self, _key: &str, _value: &str) -> StorageResult<()> {
    Ok(()) // Discard
  }

  fn remove_item(&self, _key: &str) -> StorageResult<()> {
    Ok(())
  }

  fn remove_prefixed(&self, _prefix: &str) -> StorageResult<usize> {
    Ok(0)
  }
}

/// In-memory storage, lost when the process exits.
pub struct MemoryStorage {
  items: Mutex<HashMap<String, String>>,
  quota: Option<u64>,
}

impl MemoryStorage {
  pub fn new() -> Self {
    Self {
      items: Mutex::new(HashMap::new()),
      quota: None,
    }
  }

  /// Create an in-memory store that rejects writes beyond `quota` bytes.
  pub fn with_quota(quota: u64) -> Self {
    Self {
      items: Mutex::new(HashMap::new()),
      quota: Some(quota),
    }
  }

  fn lock(&self) -> StorageResult<MutexGuard<'_, HashMap<String, String>>> {
    self
      .items
      .lock()
      .map_err(|e| StorageError::Unavailable(format!("Lock poisoned: {}", e)))
  }
}

impl Default for MemoryStorage {
  fn default() -> Self {
    Self::new()
  }
}

impl CacheStorage for MemoryStorage {
  fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
    Ok(self.lock()?.get(key).cloned())
  }

  fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
    let mut items = self.lock()?;

    if let Some(quota) = self.quota {
      let used: u64 = items
        .iter()
        .filter(|(k, _)| k.as_str() != key)
        .map(|(k, v)| (k.len() + v.len()) as u64)
        .sum();
      check_quota(used, (key.len() + value.len()) as u64, quota)?;
    }

    items.insert(key.to_string(), value.to_string());
    Ok(())
  }

  fn remove_item(&self, key: &str) -> StorageResult<()> {
    self.lock()?.remove(key);
    Ok(())
  }

  fn remove_prefixed(&self, prefix: &str) -> StorageResult<usize> {
    let mut items = self.lock()?;
    let before = items.len();
    items.retain(|k, _| !k.starts_with(prefix));
    Ok(before - items.len())
  }
}

/// SQLite-based storage implementation.
pub struct SqliteStorage {
  conn: Mutex<Connection>,
  quota: u64,
}

impl SqliteStorage {
  /// Open the storage file at `path`, creating parent directories as needed.
  pub fn open(path: &Path, quota: u64) -> StorageResult<Self> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent).map_err(|e| {
        StorageError::Unavailable(format!("Failed to create storage directory: {}", e))
      })?;
    }

    let conn = Connection::open(path)?;
    Self::with_connection(conn, quota)
  }

  /// Open a private in-memory database.
  #[cfg(test)]
  pub fn open_in_memory(quota: u64) -> StorageResult<Self> {
    Self::with_connection(Connection::open_in_memory()?, quota)
  }

  /// Get the default storage path.
  pub fn default_path() -> Option<PathBuf> {
    dirs::data_dir()
      .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
      .map(|dir| dir.join("myq").join("storage.db"))
  }

  fn with_connection(conn: Connection, quota: u64) -> StorageResult<Self> {
    conn.execute_batch(STORAGE_SCHEMA)?;
    Ok(Self {
      conn: Mutex::new(conn),
      quota,
    })
  }

  fn lock(&self) -> StorageResult<MutexGuard<'_, Connection>> {
    self
      .conn
      .lock()
      .map_err(|e| StorageError::Unavailable(format!("Lock poisoned: {}", e)))
  }
}

/// Schema for the key-value table.
const STORAGE_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS kv_store (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
"#;

impl CacheStorage for SqliteStorage {
  fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
    let conn = self.lock()?;
    let value = conn
      .query_row(
        "SELECT value FROM kv_store WHERE key = ?",
        params![key],
        |row| row.get(0),
      )
      .optional()?;
    Ok(value)
  }

  fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
    let conn = self.lock()?;

    // Bytes held by every other key; the value being replaced doesn't count
    let used: i64 = conn.query_row(
      "SELECT COALESCE(SUM(LENGTH(CAST(key AS BLOB)) + LENGTH(CAST(value AS BLOB))), 0)
       FROM kv_store WHERE key != ?",
      params![key],
      |row| row.get(0),
    )?;
    check_quota(used.max(0) as u64, (key.len() + value.len()) as u64, self.quota)?;

    conn.execute(
      "INSERT OR REPLACE INTO kv_store (key, value) VALUES (?, ?)",
      params![key, value],
    )?;
    Ok(())
  }

  fn remove_item(&self, key: &str) -> StorageResult<()> {
    let conn = self.lock()?;
    conn.execute("DELETE FROM kv_store WHERE key = ?", params![key])?;
    Ok(())
  }

  fn remove_prefixed(&self, prefix: &str) -> StorageResult<usize> {
    let conn = self.lock()?;
    // substr() instead of LIKE so '%' and '_' in the prefix stay literal
    let removed = conn.execute(
      "DELETE FROM kv_store WHERE substr(key, 1, ?) = ?",
      params![prefix.chars().count() as i64, prefix],
    )?;
    Ok(removed)
  }
}

fn check_quota(used: u64, incoming: u64, quota: u64) -> StorageResult<()> {
  let needed = used.saturating_add(incoming);
  if needed > quota {
    return Err(StorageError::QuotaExceeded { needed, quota });
  }
  Ok(())
}
