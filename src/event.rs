use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};
use std::time::Duration;
use tokio::sync::mpsc;

/// Application events
#[derive(Debug)]
pub enum Event {
  /// Terminal key press
  Key(KeyEvent),
  /// Terminal resized; the next draw picks up the new size
  Resize,
  /// Periodic tick for polling pending requests
  Tick,
}

/// Event handler that produces events from terminal input and a tick timer
pub struct EventHandler {
  rx: mpsc::UnboundedReceiver<Event>,
}

impl EventHandler {
  /// Create a new event handler with the given tick rate
  pub fn new(tick_rate: Duration) -> Self {
    let (tx, rx) = mpsc::unbounded_channel();

    // crossterm's poll/read block, so they get their own thread
    tokio::task::spawn_blocking(move || loop {
      let event = match event::poll(tick_rate) {
        Ok(true) => match event::read() {
          Ok(CrosstermEvent::Key(key)) if key.kind == KeyEventKind::Press => Event::Key(key),
          Ok(CrosstermEvent::Resize(_, _)) => Event::Resize,
          _ => continue,
        },
        Ok(false) => Event::Tick,
        Err(_) => break,
      };
      if tx.send(event).is_err() {
        break;
      }
    });

    Self { rx }
  }

  /// Receive the next event
  pub async fn next(&mut self) -> Option<Event> {
    self.rx.recv().await
  }
}
