use crate::ui::theme::Theme;
use ratatui::prelude::*;

/// Width of the label column in key/value blocks
const LABEL_WIDTH: usize = 12;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max_len: usize) -> String {
  if s.chars().count() <= max_len {
    s.to_string()
  } else {
    let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
    format!("{}...", kept)
  }
}

/// The value, or "-" when missing or empty
pub fn or_dash(value: Option<&str>) -> String {
  match value {
    Some(v) if !v.trim().is_empty() => v.to_string(),
    _ => "-".to_string(),
  }
}

/// One aligned `label  value` line
pub fn key_value(label: &str, value: Option<&str>, theme: &Theme) -> Line<'static> {
  Line::from(vec![
    Span::styled(format!("{:<width$}", label, width = LABEL_WIDTH), theme.label_style()),
    Span::styled(or_dash(value), theme.text_style()),
  ])
}

/// Bold title line
pub fn title(text: impl Into<String>, theme: &Theme) -> Line<'static> {
  Line::from(Span::styled(text.into(), theme.title_style()))
}

/// Dimmed secondary line
pub fn meta(text: impl Into<String>, theme: &Theme) -> Line<'static> {
  Line::from(Span::styled(text.into(), theme.dim_style()))
}

/// Text shown when a loaded value carries nothing to display
pub fn empty(message: &str, theme: &Theme) -> Text<'static> {
  Text::from(meta(message.to_string(), theme))
}

/// Concatenated text of a line
#[cfg(test)]
pub fn line_text(line: &Line) -> String {
  line.spans.iter().map(|s| s.content.as_ref()).collect()
}

/// All lines of a text joined by newlines
#[cfg(test)]
pub fn plain_text(text: &Text) -> String {
  text.lines.iter().map(line_text).collect::<Vec<_>>().join("\n")
}
