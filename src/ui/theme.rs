use ratatui::prelude::*;

/// Colour palette for the current display mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
  pub background: Color,
  pub text: Color,
  pub dim: Color,
  pub accent: Color,
  pub key: Color,
  pub border: Color,
  pub highlight_bg: Color,
  pub error: Color,
  pub arabic: Color,
}

impl Theme {
  pub const DAY: Theme = Theme {
    background: Color::Reset,
    text: Color::White,
    dim: Color::DarkGray,
    accent: Color::Yellow,
    key: Color::Cyan,
    border: Color::Blue,
    highlight_bg: Color::DarkGray,
    error: Color::Red,
    arabic: Color::LightGreen,
  };

  /// Low-glare palette for reading in the dark.
  pub const NIGHT: Theme = Theme {
    background: Color::Black,
    text: Color::Gray,
    dim: Color::DarkGray,
    accent: Color::Rgb(200, 160, 90),
    key: Color::Rgb(120, 150, 150),
    border: Color::Rgb(60, 60, 60),
    highlight_bg: Color::Rgb(40, 40, 40),
    error: Color::Rgb(180, 90, 90),
    arabic: Color::Rgb(170, 190, 150),
  };

  pub fn for_night(night: bool) -> Self {
    if night {
      Self::NIGHT
    } else {
      Self::DAY
    }
  }

  pub fn text_style(&self) -> Style {
    Style::default().fg(self.text)
  }

  pub fn dim_style(&self) -> Style {
    Style::default().fg(self.dim)
  }

  pub fn label_style(&self) -> Style {
    Style::default().fg(self.key)
  }

  pub fn title_style(&self) -> Style {
    Style::default().fg(self.accent).add_modifier(Modifier::BOLD)
  }
}

impl Default for Theme {
  fn default() -> Self {
    Self::DAY
  }
}
