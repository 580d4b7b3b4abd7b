//! User preferences persisted in the storage medium.

use std::sync::Arc;
use tracing::{debug, warn};

use crate::cache::CacheStorage;

/// Storage key for the night reading flag (not part of the cache namespace).
pub const NIGHT_READING_KEY: &str = "sm-night-reading";

#[derive(Clone)]
pub struct Preferences {
  storage: Arc<dyn CacheStorage>,
}

impl Preferences {
  pub fn new(storage: Arc<dyn CacheStorage>) -> Self {
    Self { storage }
  }

  /// Whether night reading is on. Missing or unreadable values mean off.
  pub fn night_reading(&self) -> bool {
    match self.storage.get_item(NIGHT_READING_KEY) {
      Ok(value) => value.as_deref() == Some("1"),
      Err(e) => {
        debug!(error = %e, "could not read night reading preference");
        false
      }
    }
  }

  pub fn set_night_reading(&self, enabled: bool) {
    let value = if enabled { "1" } else { "0" };
    if let Err(e) = self.storage.set_item(NIGHT_READING_KEY, value) {
      warn!(error = %e, "could not save night reading preference");
    }
  }
}

impl std::fmt::Debug for Preferences {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Preferences").finish_non_exhaustive()
  }
}
