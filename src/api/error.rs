// Error types for the myQuran API layer.
// Only these errors cross the dispatcher boundary; cache faults never do.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
  /// Non-2xx response. Displays the server's error text when it sent any.
  #[error("{message}")]
  RequestFailed { status: u16, message: String },

  #[error("{0}")]
  Decode(#[from] serde_json::Error),

  #[error("Network error: {0}")]
  Network(#[from] reqwest::Error),

  #[error("Invalid request: {0}")]
  InvalidRequest(String),
}

impl ApiError {
  /// Build a `RequestFailed` from a status code and response body.
  pub fn request_failed(status: u16, body: String) -> Self {
    let message = if body.is_empty() {
      format!("Request failed: {}", status)
    } else {
      body
    };
    Self::RequestFailed { status, message }
  }

  /// HTTP status of a failed request, if this error came from one.
  #[cfg(test)]
  pub fn status(&self) -> Option<u16> {
    match self {
      Self::RequestFailed { status, .. } => Some(*status),
      _ => None,
    }
  }
}

pub type Result<T> = std::result::Result<T, ApiError>;
