use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::api::DEFAULT_CACHE_SECONDS;
use crate::cache::DEFAULT_QUOTA_BYTES;

pub const DEFAULT_BASE_URL: &str = "https://api.myquran.com/v3";

/// Environment variable overriding `api.base_url`.
pub const BASE_URL_ENV: &str = "MYQ_BASE_URL";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
  pub api: ApiConfig,
  pub cache: CacheConfig,
  pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
  pub base_url: String,
  /// TTL applied when a request does not specify one
  pub default_cache_seconds: u64,
  pub timeout_seconds: u64,
}

impl Default for ApiConfig {
  fn default() -> Self {
    Self {
      base_url: DEFAULT_BASE_URL.to_string(),
      default_cache_seconds: DEFAULT_CACHE_SECONDS,
      timeout_seconds: 15,
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
  /// When false, responses are never stored or served from storage
  pub enabled: bool,
  /// SQLite file (defaults to $XDG_DATA_HOME/myq/storage.db)
  pub path: Option<PathBuf>,
  pub quota_bytes: u64,
}

impl Default for CacheConfig {
  fn default() -> Self {
    Self {
      enabled: true,
      path: None,
      quota_bytes: DEFAULT_QUOTA_BYTES,
    }
  }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LogConfig {
  /// Filter directive used when RUST_LOG is not set (e.g. "info", "myq=debug")
  pub level: Option<String>,
  /// Directory for myq.log (defaults to $XDG_DATA_HOME/myq/logs)
  pub dir: Option<PathBuf>,
}

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided
  /// 2. ./myq.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/myq/config.yaml
  ///
  /// Built-in defaults are used when no file exists.
  pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(eyre!("Config file not found: {}", p.display()));
      }
    } else {
      Self::find_config_file()
    };

    let config = match path {
      Some(p) => Self::load_from_path(&p)?,
      None => Config::default(),
    };

    Ok(config.with_base_url_override(std::env::var(BASE_URL_ENV).ok()))
  }

  fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from("myq.yaml");
    if local.exists() {
      return Some(local);
    }

    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("myq").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    Self::from_yaml(&contents)
      .map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))
  }

  fn from_yaml(contents: &str) -> Result<Self, serde_yaml::Error> {
    // An empty file deserializes to null
    if contents.trim().is_empty() {
      return Ok(Config::default());
    }
    serde_yaml::from_str(contents)
  }

  /// Replace the base URL when `base_url` is a non-empty value.
  pub fn with_base_url_override(mut self, base_url: Option<String>) -> Self {
    if let Some(url) = base_url.filter(|u| !u.trim().is_empty()) {
      self.api.base_url = url.trim().to_string();
    }
    self
  }

  /// Disable response caching.
  pub fn without_cache(mut self) -> Self {
    self.cache.enabled = false;
    self
  }
}
