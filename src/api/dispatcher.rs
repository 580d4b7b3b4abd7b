//! Read-through request dispatcher.
//!
//! Every API call goes through [`Dispatcher::request`], which decides whether
//! the answer can come from the response cache or needs a network round trip.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT};
use reqwest::Method;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use crate::cache::{CacheResult, CacheStore};

use super::error::{ApiError, Result};
use super::transport::{HttpRequest, Transport};

/// TTL applied when a call doesn't specify one.
pub const DEFAULT_CACHE_SECONDS: u64 = 300;

/// Per-call request options.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
  /// HTTP method, `GET` when unset. Case-insensitive.
  pub method: Option<String>,
  /// Extra headers, applied over the `Accept: application/json` default
  pub headers: Vec<(String, String)>,
  /// Cache TTL for this call; `Some(0)` bypasses the cache
  pub cache_seconds: Option<u64>,
}

impl RequestOptions {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn method(mut self, method: impl Into<String>) -> Self {
    self.method = Some(method.into());
    self
  }

  pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
    self.headers.push((name.into(), value.into()));
    self
  }

  pub fn cache_seconds(mut self, seconds: u64) -> Self {
    self.cache_seconds = Some(seconds);
    self
  }
}

/// Build the cache key for a request: `METHOD:path`, path used verbatim.
pub fn cache_key(method: &str, path: &str) -> String {
  format!("{}:{}", method, path)
}

/// Dispatches API requests, consulting the cache store for GETs.
///
/// Concurrent requests for the same key are not coalesced: each one that
/// misses goes to the network and writes its own result back.
pub struct Dispatcher<T: Transport> {
  transport: T,
  store: Arc<dyn CacheStore>,
  base_url: String,
  default_cache_seconds: u64,
}

impl<T: Transport> Dispatcher<T> {
  pub fn new(transport: T, store: Arc<dyn CacheStore>, base_url: impl Into<String>) -> Self {
    Self {
      transport,
      store,
      base_url: base_url.into().trim_end_matches('/').to_string(),
      default_cache_seconds: DEFAULT_CACHE_SECONDS,
    }
  }

  /// Set the TTL used when a call doesn't specify one.
  pub fn with_default_cache_seconds(mut self, seconds: u64) -> Self {
    self.default_cache_seconds = seconds;
    self
  }

  pub fn base_url(&self) -> &str {
    &self.base_url
  }

  /// Fetch the decoded JSON payload for `path`.
  pub async fn request(&self, path: &str, options: RequestOptions) -> Result<Value> {
    Ok(self.request_with_source(path, options).await?.data)
  }

  /// Fetch the decoded JSON payload for `path`, reporting whether it came from the cache.
  ///
  /// 1. GET with a non-zero TTL: return a fresh cached payload if there is one
  /// 2. Otherwise send the request; non-2xx fails with the response text
  /// 3. Decode the body as JSON
  /// 4. GET with a non-zero TTL: write the payload back to the cache
  pub async fn request_with_source(
    &self,
    path: &str,
    options: RequestOptions,
  ) -> Result<CacheResult<Value>> {
    let method = options
      .method
      .as_deref()
      .unwrap_or("GET")
      .to_uppercase();
    let ttl = options.cache_seconds.unwrap_or(self.default_cache_seconds);
    let key = cache_key(&method, path);
    let cacheable = method == "GET" && ttl > 0;

    if cacheable {
      if let Some(payload) = self.store.get(&key, ttl) {
        debug!(%key, "cache hit");
        return Ok(CacheResult::from_cache(payload));
      }
    }

    let request = HttpRequest {
      method: Method::from_bytes(method.as_bytes())
        .map_err(|_| ApiError::InvalidRequest(format!("unsupported method '{}'", method)))?,
      url: format!("{}{}", self.base_url, path),
      headers: merge_headers(&options.headers)?,
    };

    debug!(%method, %path, "sending request");
    let response = self.transport.send(request).await?;

    if !response.status.is_success() {
      debug!(%method, %path, status = response.status.as_u16(), "request failed");
      return Err(ApiError::request_failed(
        response.status.as_u16(),
        response.body,
      ));
    }

    let payload: Value = serde_json::from_str(&response.body)?;

    if cacheable {
      self.store.set(&key, &payload);
    }

    Ok(CacheResult::from_network(payload))
  }
}

impl<T: Transport + Clone> Clone for Dispatcher<T> {
  fn clone(&self) -> Self {
    Self {
      transport: self.transport.clone(),
      store: Arc::clone(&self.store),
      base_url: self.base_url.clone(),
      default_cache_seconds: self.default_cache_seconds,
    }
  }
}

/// Merge caller headers over the JSON `Accept` default. Later values win.
fn merge_headers(extra: &[(String, String)]) -> Result<HeaderMap> {
  let mut headers = HeaderMap::new();
  headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

  for (name, value) in extra {
    let name = HeaderName::from_bytes(name.as_bytes())
      .map_err(|e| ApiError::InvalidRequest(format!("header name '{}': {}", name, e)))?;
    let value = HeaderValue::from_str(value)
      .map_err(|e| ApiError::InvalidRequest(format!("header '{}': {}", name, e)))?;
    headers.insert(name, value);
  }

  Ok(headers)
}
