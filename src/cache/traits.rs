//! Core traits and types for the caching system.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A read-through cache of decoded response payloads.
///
/// Implementations never fail: faults in the underlying medium degrade to a
/// miss on `get` and a dropped write on `set`.
pub trait CacheStore: Send + Sync {
  /// Look up `key`, returning the payload only if it is younger than `ttl_seconds`.
  fn get(&self, key: &str, ttl_seconds: u64) -> Option<Value>;

  /// Store `payload` under `key`, replacing any previous entry.
  fn set(&self, key: &str, payload: &Value);
}

/// A stored payload with its creation time.
///
/// Serialized as `{"at": <epoch millis>, "data": <payload>}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
  /// When the entry was stored
  #[serde(rename = "at", with = "chrono::serde::ts_milliseconds")]
  pub stored_at: DateTime<Utc>,
  /// The decoded response body
  #[serde(rename = "data")]
  pub payload: Value,
}

impl CacheEntry {
  /// Create a new entry stamped with the current time.
  pub fn new(payload: Value) -> Self {
    Self {
      stored_at: Utc::now(),
      payload,
    }
  }

  /// Check if this entry is older than `ttl_seconds` at time `now`.
  pub fn is_expired(&self, ttl_seconds: u64, now: DateTime<Utc>) -> bool {
    let age_ms = now.signed_duration_since(self.stored_at).num_milliseconds();
    let ttl_ms = i64::try_from(ttl_seconds)
      .unwrap_or(i64::MAX)
      .saturating_mul(1000);
    age_ms > ttl_ms
  }
}

/// Result from a cache operation, including data and metadata about the source.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheResult<T> {
  /// The actual data
  pub data: T,
  /// Where the data came from
  pub source: CacheSource,
}

impl<T> CacheResult<T> {
  /// Create a new cache result from fresh network data.
  pub fn from_network(data: T) -> Self {
    Self {
      data,
      source: CacheSource::Network,
    }
  }

  /// Create a new cache result from cached data.
  pub fn from_cache(data: T) -> Self {
    Self {
      data,
      source: CacheSource::Cache,
    }
  }

  /// Transform the data, keeping the source.
  pub fn map<U>(self, f: impl FnOnce(T) -> U) -> CacheResult<U> {
    CacheResult {
      data: f(self.data),
      source: self.source,
    }
  }

  /// Fallible version of [`CacheResult::map`].
  pub fn try_map<U, E>(self, f: impl FnOnce(T) -> Result<U, E>) -> Result<CacheResult<U>, E> {
    Ok(CacheResult {
      data: f(self.data)?,
      source: self.source,
    })
  }

  pub fn is_cached(&self) -> bool {
    self.source == CacheSource::Cache
  }
}

/// Indicates where a payload came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheSource {
  /// Fresh data from network
  Network,
  /// Data from cache, still within its TTL
  Cache,
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::Duration;
  use serde_json::json;

  #[test]
  fn test_entry_serialized_shape() {
    let entry = CacheEntry {
      stored_at: DateTime::from_timestamp_millis(1_700_000_000_123).unwrap(),
      payload: json!({"data": [1, 2]}),
    };

    let raw = serde_json::to_value(&entry).unwrap();
    assert_eq!(raw, json!({"at": 1_700_000_000_123i64, "data": {"data": [1, 2]}}));

    let back: CacheEntry = serde_json::from_value(raw).unwrap();
    assert_eq!(back, entry);
  }

  #[test]
  fn test_entry_missing_payload_is_malformed() {
    assert!(serde_json::from_str::<CacheEntry>(r#"{"at": 1}"#).is_err());
  }

  #[test]
  fn test_expiry_boundary() {
    let now = Utc::now();
    let entry = CacheEntry {
      stored_at: now - Duration::seconds(300),
      payload: Value::Null,
    };

    // Exactly at the TTL is still valid; one millisecond later it is not
    assert!(!entry.is_expired(300, now));
    assert!(entry.is_expired(300, now + Duration::milliseconds(1)));
  }

  #[test]
  fn test_huge_ttl_never_overflows() {
    let entry = CacheEntry::new(Value::Null);
    assert!(!entry.is_expired(u64::MAX, Utc::now()));
  }

  #[test]
  fn test_result_map_keeps_source() {
    let result = CacheResult::from_cache(2).map(|n| n * 2);
    assert_eq!(result.data, 4);
    assert!(result.is_cached());
  }
}
