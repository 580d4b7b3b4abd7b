//! Response caching over a persistent string storage medium.
//!
//! This module provides:
//! - A storage medium abstraction (`CacheStorage`) with SQLite, in-memory and no-op backends
//! - A TTL-at-read cache store (`CacheLayer`) that fails open on every storage fault
//! - Lazy expiration: expired entries are removed by the read that finds them

mod layer;
mod storage;
mod traits;

use std::sync::Arc;
use tracing::{info, warn};

use crate::config::CacheConfig;

pub use layer::CacheLayer;
pub use storage::{CacheStorage, MemoryStorage, NoopStorage, SqliteStorage, DEFAULT_QUOTA_BYTES};
pub use traits::{CacheResult, CacheStore};

#[cfg(test)]
pub use layer::CACHE_PREFIX;
#[cfg(test)]
pub use storage::{StorageError, StorageResult};
#[cfg(test)]
pub use traits::CacheEntry;

/// Open the persistent storage medium described by the configuration.
///
/// Falls back to session-only memory storage when the file can't be opened,
/// so a broken cache never stops the client from working.
pub fn open_storage(config: &CacheConfig) -> Arc<dyn CacheStorage> {
  let path = match config.path.clone().or_else(SqliteStorage::default_path) {
    Some(path) => path,
    None => {
      warn!("could not determine a storage location, using memory storage");
      return Arc::new(MemoryStorage::with_quota(config.quota_bytes));
    }
  };

  match SqliteStorage::open(&path, config.quota_bytes) {
    Ok(storage) => {
      info!(path = %path.display(), "opened storage");
      Arc::new(storage)
    }
    Err(e) => {
      warn!(path = %path.display(), error = %e, "failed to open storage, using memory storage");
      Arc::new(MemoryStorage::with_quota(config.quota_bytes))
    }
  }
}

/// Build the response cache over `storage`, or a pass-through cache when disabled.
pub fn build_store(
  config: &CacheConfig,
  storage: Arc<dyn CacheStorage>,
) -> Arc<CacheLayer<dyn CacheStorage>> {
  let medium: Arc<dyn CacheStorage> = if config.enabled {
    storage
  } else {
    Arc::new(NoopStorage)
  };
  Arc::new(CacheLayer::new(medium))
}
