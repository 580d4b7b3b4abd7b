use super::input::{InputResult, TextInput};
use super::KeyResult;
use crate::ui::theme::Theme;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

/// Events emitted by the filter input that the parent needs to handle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterEvent {
  /// Filter text changed (emitted on each keystroke, empty string on cancel)
  Changed(String),
  /// Filter accepted (overlay closed, filter persists)
  Submitted,
}

/// Live list filter opened with `/`
#[derive(Debug, Clone, Default)]
pub struct FilterInput {
  input: TextInput,
  active: bool,
}

impl FilterInput {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn is_active(&self) -> bool {
    self.active
  }

  pub fn query(&self) -> &str {
    self.input.value()
  }

  pub fn activate(&mut self) {
    self.active = true;
    self.input.clear();
  }

  /// Handle a key event
  /// Call this regardless of active state - it handles activation too
  pub fn handle_key(&mut self, key: KeyEvent) -> KeyResult<FilterEvent> {
    if !self.active {
      if key.code == KeyCode::Char('/') {
        self.activate();
        return KeyResult::Event(FilterEvent::Changed(String::new()));
      }
      return KeyResult::NotHandled;
    }

    match self.input.handle_key(key) {
      InputResult::Submitted(_) => {
        self.active = false;
        KeyResult::Event(FilterEvent::Submitted)
      }
      InputResult::Cancelled => {
        self.active = false;
        self.input.clear();
        KeyResult::Event(FilterEvent::Changed(String::new()))
      }
      InputResult::Consumed => {
        KeyResult::Event(FilterEvent::Changed(self.input.value().to_string()))
      }
      InputResult::NotHandled => KeyResult::Handled,
    }
  }

  /// Render the filter overlay if active
  pub fn render_overlay(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
    if !self.active {
      return;
    }

    let width = (area.width * 60 / 100).clamp(30, 64).min(area.width);
    let overlay_area =
      Rect::new(area.x + 1, area.y + 1, width.saturating_sub(1), 3).intersection(area);

    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
      .borders(Borders::ALL)
      .border_style(Style::default().fg(theme.accent))
      .style(Style::default().bg(theme.background))
      .title(" Filter ");

    let inner = block.inner(overlay_area);
    frame.render_widget(block, overlay_area);

    if inner.height == 0 {
      return;
    }

    let input_line = Line::from(vec![
      Span::styled("/", Style::default().fg(theme.accent)),
      Span::styled(self.input.value(), theme.text_style()),
      Span::styled("_", Style::default().fg(theme.accent)), // Cursor
    ]);
    frame.render_widget(Paragraph::new(input_line), inner);
  }
}

/// Case-insensitive substring match used by list filters
pub fn matches_filter(text: &str, filter: &str) -> bool {
  filter.is_empty() || text.to_lowercase().contains(&filter.to_lowercase())
}
