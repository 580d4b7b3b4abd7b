//! Async query slots for data fetching from the UI loop.
//!
//! A `Query<T>` holds the state of one pane's data: idle, loading, loaded or
//! failed. Starting a request spawns it on the runtime; the UI polls the slot
//! on every tick.
//!
//! # Example
//!
//! ```ignore
//! let client = client.clone();
//! query.start(async move { client.surah("36").await.map_err(|e| e.to_string()) });
//!
//! // In event loop tick
//! if query.poll() {
//!     // State changed, trigger re-render
//! }
//! ```
//!
//! Starting a new request supersedes the pending one: the older task keeps
//! running to completion, but its result is never delivered.

use std::future::Future;
use std::time::Instant;
use tokio::sync::mpsc;

/// The state of a query
#[derive(Debug, Clone)]
pub enum QueryState<T> {
  /// Query has not been started
  Idle,
  /// Query is currently fetching data
  Loading,
  /// Query completed successfully
  Success(T),
  /// Query failed with an error
  Error(String),
}

impl<T> QueryState<T> {
  pub fn data(&self) -> Option<&T> {
    match self {
      QueryState::Success(data) => Some(data),
      _ => None,
    }
  }

  pub fn error(&self) -> Option<&str> {
    match self {
      QueryState::Error(e) => Some(e),
      _ => None,
    }
  }
}

/// One pane's async data slot.
pub struct Query<T> {
  state: QueryState<T>,
  receiver: Option<mpsc::UnboundedReceiver<Result<T, String>>>,
  fetched_at: Option<Instant>,
}

impl<T> Default for Query<T> {
  fn default() -> Self {
    Self {
      state: QueryState::Idle,
      receiver: None,
      fetched_at: None,
    }
  }
}

impl<T> Query<T> {
  pub fn new() -> Self {
    Self::default()
  }

  /// Get the current state of the query.
  pub fn state(&self) -> &QueryState<T> {
    &self.state
  }

  /// Get the data if the query succeeded.
  pub fn data(&self) -> Option<&T> {
    self.state.data()
  }

  pub fn error(&self) -> Option<&str> {
    self.state.error()
  }

  /// Show `data` immediately without a request, superseding any pending one.
  #[cfg(test)]
  pub fn set(&mut self, data: T) {
    self.receiver = None;
    self.state = QueryState::Success(data);
    self.fetched_at = Some(Instant::now());
  }

  /// Poll for results from a pending request.
  ///
  /// Returns `true` if the state changed (data arrived or error occurred).
  /// Call this in your event loop tick handler.
  pub fn poll(&mut self) -> bool {
    let receiver = match &mut self.receiver {
      Some(rx) => rx,
      None => return false,
    };

    match receiver.try_recv() {
      Ok(Ok(data)) => {
        self.state = QueryState::Success(data);
        self.fetched_at = Some(Instant::now());
        self.receiver = None;
        true
      }
      Ok(Err(error)) => {
        self.state = QueryState::Error(error);
        self.receiver = None;
        true
      }
      Err(mpsc::error::TryRecvError::Empty) => false,
      Err(mpsc::error::TryRecvError::Disconnected) => {
        // Task ended without sending (panicked)
        self.state = QueryState::Error("Request was cancelled".to_string());
        self.receiver = None;
        true
      }
    }
  }
}

impl<T: Send + 'static> Query<T> {
  /// Spawn `future` and make this slot wait for its result.
  ///
  /// Any request still pending in this slot is superseded.
  pub fn start<F>(&mut self, future: F)
  where
    F: Future<Output = Result<T, String>> + Send + 'static,
  {
    let (tx, rx) = mpsc::unbounded_channel();
    self.receiver = Some(rx);
    self.state = QueryState::Loading;

    tokio::spawn(async move {
      let result = future.await;
      // Ignore send errors - the slot may have moved on
      let _ = tx.send(result);
    });
  }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Query<T> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Query")
      .field("state", &self.state)
      .field("fetched_at", &self.fetched_at)
      .finish_non_exhaustive()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::sync::atomic::{AtomicU32, Ordering};
  use std::sync::Arc;
  use std::time::Duration;

  #[tokio::test]
  async fn test_query_success() {
    let mut query = Query::new();
    assert!(matches!(query.state(), QueryState::Idle));

    query.start(async { Ok::<_, String>(vec![1, 2, 3]) });
    assert!(matches!(query.state(), QueryState::Loading));

    // Wait for the result
    tokio::time::sleep(Duration::from_millis(10)).await;

    assert!(query.poll());
    assert_eq!(query.data(), Some(&vec![1, 2, 3]));
  }

  #[tokio::test]
  async fn test_query_error() {
    let mut query: Query<i32> = Query::new();

    query.start(async { Err("Request failed: 500".to_string()) });
    tokio::time::sleep(Duration::from_millis(10)).await;

    assert!(query.poll());
    assert_eq!(query.error(), Some("Request failed: 500"));
  }

  #[tokio::test]
  async fn test_poll_without_request() {
    let mut query: Query<i32> = Query::new();
    assert!(!query.poll());
  }

  #[tokio::test]
  async fn test_newer_request_supersedes_pending() {
    let completed = Arc::new(AtomicU32::new(0));
    let mut query = Query::new();

    let slow = completed.clone();
    query.start(async move {
      tokio::time::sleep(Duration::from_millis(50)).await;
      slow.fetch_add(1, Ordering::SeqCst);
      Ok::<_, String>("old")
    });

    let fast = completed.clone();
    query.start(async move {
      fast.fetch_add(1, Ordering::SeqCst);
      Ok::<_, String>("new")
    });

    tokio::time::sleep(Duration::from_millis(100)).await;
    query.poll();

    // Both tasks ran, only the newer result is shown
    assert_eq!(completed.load(Ordering::SeqCst), 2);
    assert_eq!(query.data(), Some(&"new"));
    assert!(!query.poll());
  }

  #[tokio::test]
  async fn test_set_supersedes_pending() {
    let mut query = Query::new();
    query.start(async {
      tokio::time::sleep(Duration::from_millis(20)).await;
      Ok::<_, String>(1)
    });
    query.set(2);
    assert_eq!(query.data(), Some(&2));

    tokio::time::sleep(Duration::from_millis(40)).await;
    assert!(!query.poll());
    assert_eq!(query.data(), Some(&2));
  }
}
