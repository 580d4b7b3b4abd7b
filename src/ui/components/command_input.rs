use super::input::{InputResult, TextInput};
use super::KeyResult;
use crate::commands::{self, Command};
use crate::ui::theme::Theme;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph};

const MAX_SUGGESTIONS: usize = 8;

/// Events emitted by command input that parent needs to handle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandEvent {
  /// Command line submitted
  Submitted(String),
  /// Command cancelled
  Cancelled,
}

/// Command line with autocomplete on the command word
#[derive(Debug, Clone, Default)]
pub struct CommandInput {
  input: TextInput,
  active: bool,
  selected_suggestion: usize,
}

impl CommandInput {
  pub fn new() -> Self {
    Self::default()
  }

  /// Check if command mode is currently active
  pub fn is_active(&self) -> bool {
    self.active
  }

  /// Get the current input value
  pub fn value(&self) -> &str {
    self.input.value()
  }

  /// Activate command mode
  pub fn activate(&mut self) {
    self.active = true;
    self.input.clear();
    self.selected_suggestion = 0;
  }

  fn deactivate(&mut self) {
    self.active = false;
    self.input.clear();
    self.selected_suggestion = 0;
  }

  /// Whether the cursor is still on the command word
  fn editing_command_word(&self) -> bool {
    !self.input.value().trim_start().contains(' ')
  }

  /// Suggestions for the command word.
  ///
  /// Once arguments are being typed only the chosen command is listed, so its
  /// usage stays visible.
  pub fn suggestions(&self) -> Vec<&'static Command> {
    let value = self.input.value().trim_start();
    if self.editing_command_word() {
      commands::get_suggestions(value)
    } else {
      let word = value.split_whitespace().next().unwrap_or_default();
      commands::find(word).into_iter().collect()
    }
  }

  pub fn selected_suggestion(&self) -> usize {
    self.selected_suggestion
  }

  /// Handle a key event
  /// Call this regardless of active state - it handles activation too
  pub fn handle_key(&mut self, key: KeyEvent) -> KeyResult<CommandEvent> {
    if !self.active {
      if key.code == KeyCode::Char(':') {
        self.activate();
        return KeyResult::Handled;
      }
      return KeyResult::NotHandled;
    }

    match key.code {
      KeyCode::Esc => {
        self.deactivate();
        return KeyResult::Event(CommandEvent::Cancelled);
      }
      KeyCode::Enter => {
        let line = self.resolve_command();
        self.deactivate();
        return KeyResult::Event(CommandEvent::Submitted(line));
      }
      KeyCode::Tab => {
        self.complete();
        return KeyResult::Handled;
      }
      KeyCode::Down => {
        let count = self.suggestions().len();
        if count > 0 {
          self.selected_suggestion = (self.selected_suggestion + 1) % count;
        }
        return KeyResult::Handled;
      }
      KeyCode::BackTab | KeyCode::Up => {
        let count = self.suggestions().len();
        if count > 0 {
          self.selected_suggestion = if self.selected_suggestion == 0 {
            count - 1
          } else {
            self.selected_suggestion - 1
          };
        }
        return KeyResult::Handled;
      }
      _ => {}
    }

    match self.input.handle_key(key) {
      InputResult::Consumed => {
        self.selected_suggestion = 0; // Reset on input change
        KeyResult::Handled
      }
      InputResult::Submitted(_) | InputResult::Cancelled => KeyResult::Handled,
      InputResult::NotHandled => KeyResult::NotHandled,
    }
  }

  /// Replace the command word with the selected suggestion, ready for arguments
  fn complete(&mut self) {
    if !self.editing_command_word() {
      return;
    }
    if let Some(cmd) = self.suggestions().get(self.selected_suggestion) {
      self.input.set_value(&format!("{} ", cmd.name));
      self.selected_suggestion = 0;
    }
  }

  /// Resolve the final command line.
  ///
  /// A bare partial word resolves to the selected suggestion; anything with
  /// arguments is submitted as typed.
  fn resolve_command(&self) -> String {
    let typed = self.input.value().trim();
    if self.editing_command_word() && !typed.is_empty() {
      if let Some(cmd) = self.suggestions().get(self.selected_suggestion) {
        return cmd.name.to_string();
      }
    }
    typed.to_string()
  }

  /// Render the command overlay if active
  pub fn render_overlay(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
    if !self.active {
      return;
    }

    let suggestions = self.suggestions();

    let width = (area.width * 60 / 100).clamp(30, 64).min(area.width);
    let suggestion_count = suggestions.len().min(MAX_SUGGESTIONS) as u16;
    let height = (3 + suggestion_count).min(area.height);

    let overlay_area = Rect::new(area.x + 1, area.y + 1, width.saturating_sub(1), height);
    let overlay_area = overlay_area.intersection(area);

    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
      .borders(Borders::ALL)
      .border_style(Style::default().fg(theme.accent))
      .style(Style::default().bg(theme.background))
      .title(" Command ");

    let inner = block.inner(overlay_area);
    frame.render_widget(block, overlay_area);

    if inner.height == 0 {
      return;
    }

    let chunks = Layout::default()
      .direction(Direction::Vertical)
      .constraints([
        Constraint::Length(1), // Input line
        Constraint::Min(0),    // Suggestions
      ])
      .split(inner);

    let value = self.input.value();
    let split = value
      .char_indices()
      .nth(self.input.cursor_position())
      .map(|(i, _)| i)
      .unwrap_or(value.len());
    let (before, rest) = value.split_at(split);
    let mut after = rest.chars();
    let under_cursor = after.next().map(String::from).unwrap_or_else(|| " ".to_string());
    let input_line = Line::from(vec![
      Span::styled(":", Style::default().fg(theme.accent)),
      Span::styled(before, theme.text_style()),
      Span::styled(under_cursor, theme.text_style().add_modifier(Modifier::REVERSED)),
      Span::styled(after.as_str(), theme.text_style()),
    ]);
    frame.render_widget(Paragraph::new(input_line), chunks[0]);

    if !suggestions.is_empty() && chunks[1].height > 0 {
      let items: Vec<ListItem> = suggestions
        .iter()
        .take(MAX_SUGGESTIONS)
        .map(|cmd| {
          ListItem::new(Line::from(vec![
            Span::styled(format!("{:<30}", cmd.usage), theme.label_style()),
            Span::styled(cmd.description, theme.dim_style()),
          ]))
        })
        .collect();

      let list = List::new(items)
        .highlight_style(Style::default().bg(theme.highlight_bg).fg(theme.text));

      let mut state = ListState::default();
      state.select(Some(self.selected_suggestion()));

      frame.render_stateful_widget(list, chunks[1], &mut state);
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crossterm::event::KeyModifiers;

  fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
  }

  fn type_str(input: &mut CommandInput, text: &str) {
    for c in text.chars() {
      input.handle_key(key(KeyCode::Char(c)));
    }
  }

  #[test]
  fn test_activation() {
    let mut input = CommandInput::new();
    assert_eq!(input.handle_key(key(KeyCode::Char('x'))), KeyResult::NotHandled);
    assert_eq!(input.handle_key(key(KeyCode::Char(':'))), KeyResult::Handled);
    assert!(input.is_active());
  }

  #[test]
  fn test_partial_word_resolves_to_suggestion() {
    let mut input = CommandInput::new();
    input.activate();
    type_str(&mut input, "jad");
    assert_eq!(
      input.handle_key(key(KeyCode::Enter)),
      KeyResult::Event(CommandEvent::Submitted("jadwal".to_string()))
    );
    assert!(!input.is_active());
  }

  #[test]
  fn test_arguments_submitted_as_typed() {
    let mut input = CommandInput::new();
    input.activate();
    type_str(&mut input, "ayah 2:255 ");
    assert_eq!(
      input.handle_key(key(KeyCode::Enter)),
      KeyResult::Event(CommandEvent::Submitted("ayah 2:255".to_string()))
    );
  }

  #[test]
  fn test_tab_completes_command_word() {
    let mut input = CommandInput::new();
    input.activate();
    type_str(&mut input, "sur");
    input.handle_key(key(KeyCode::Tab));
    assert_eq!(input.value(), "surah ");
    type_str(&mut input, "36");
    assert_eq!(input.suggestions().len(), 1);
    assert_eq!(input.suggestions()[0].name, "surah");
  }

  #[test]
  fn test_suggestion_navigation() {
    let mut input = CommandInput::new();
    input.activate();
    input.handle_key(key(KeyCode::Up));
    assert_eq!(input.selected_suggestion(), input.suggestions().len() - 1);
    input.handle_key(key(KeyCode::Down));
    assert_eq!(input.selected_suggestion(), 0);
  }

  #[test]
  fn test_cancel() {
    let mut input = CommandInput::new();
    input.activate();
    type_str(&mut input, "quit");
    assert_eq!(
      input.handle_key(key(KeyCode::Esc)),
      KeyResult::Event(CommandEvent::Cancelled)
    );
    assert_eq!(input.value(), "");
  }
}
