use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Result of handling a key event in an input component
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputResult {
  /// Key was handled, continue input mode
  Consumed,
  /// Enter pressed, here's the submitted value
  Submitted(String),
  /// Escape pressed, input cancelled
  Cancelled,
  /// Key not handled, pass to next handler
  NotHandled,
}

/// Reusable single-line text input.
///
/// The cursor counts characters, not bytes, so Arabic and other multi-byte
/// text edits cleanly.
#[derive(Debug, Clone, Default)]
pub struct TextInput {
  buffer: String,
  cursor: usize,
}

impl TextInput {
  #[cfg(test)]
  pub fn new() -> Self {
    Self::default()
  }

  /// Get the current input value
  pub fn value(&self) -> &str {
    &self.buffer
  }

  #[cfg(test)]
  pub fn is_empty(&self) -> bool {
    self.buffer.is_empty()
  }

  pub fn clear(&mut self) {
    self.buffer.clear();
    self.cursor = 0;
  }

  /// Replace the value and move the cursor to the end
  pub fn set_value(&mut self, value: &str) {
    self.buffer = value.to_string();
    self.cursor = self.char_count();
  }

  /// Get cursor position (in characters) for rendering
  pub fn cursor_position(&self) -> usize {
    self.cursor
  }

  fn char_count(&self) -> usize {
    self.buffer.chars().count()
  }

  /// Byte offset of the character at `index`
  fn byte_offset(&self, index: usize) -> usize {
    self
      .buffer
      .char_indices()
      .nth(index)
      .map(|(i, _)| i)
      .unwrap_or(self.buffer.len())
  }

  /// Handle a key event, returning the result
  pub fn handle_key(&mut self, key: KeyEvent) -> InputResult {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
      KeyCode::Esc => InputResult::Cancelled,
      KeyCode::Enter => InputResult::Submitted(self.buffer.clone()),
      KeyCode::Backspace => {
        if self.cursor > 0 {
          self.cursor -= 1;
          let at = self.byte_offset(self.cursor);
          self.buffer.remove(at);
        }
        InputResult::Consumed
      }
      KeyCode::Delete => {
        if self.cursor < self.char_count() {
          let at = self.byte_offset(self.cursor);
          self.buffer.remove(at);
        }
        InputResult::Consumed
      }
      KeyCode::Left => {
        self.cursor = self.cursor.saturating_sub(1);
        InputResult::Consumed
      }
      KeyCode::Right => {
        if self.cursor < self.char_count() {
          self.cursor += 1;
        }
        InputResult::Consumed
      }
      KeyCode::Home => {
        self.cursor = 0;
        InputResult::Consumed
      }
      KeyCode::End => {
        self.cursor = self.char_count();
        InputResult::Consumed
      }
      KeyCode::Char('a') if ctrl => {
        self.cursor = 0;
        InputResult::Consumed
      }
      KeyCode::Char('e') if ctrl => {
        self.cursor = self.char_count();
        InputResult::Consumed
      }
      KeyCode::Char('u') if ctrl => {
        // Clear line before cursor
        let at = self.byte_offset(self.cursor);
        self.buffer = self.buffer[at..].to_string();
        self.cursor = 0;
        InputResult::Consumed
      }
      KeyCode::Char('w') if ctrl => {
        // Delete word before cursor
        if self.cursor > 0 {
          let at = self.byte_offset(self.cursor);
          let before = self.buffer[..at].trim_end();
          let start = before.rfind(' ').map(|i| i + 1).unwrap_or(0);
          self.buffer = format!("{}{}", &self.buffer[..start], &self.buffer[at..]);
          self.cursor = self.buffer[..start].chars().count();
        }
        InputResult::Consumed
      }
      KeyCode::Char(_) if ctrl => InputResult::NotHandled,
      KeyCode::Char(c) => {
        let at = self.byte_offset(self.cursor);
        self.buffer.insert(at, c);
        self.cursor += 1;
        InputResult::Consumed
      }
      _ => InputResult::NotHandled,
    }
  }
}
