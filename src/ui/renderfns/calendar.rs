use super::utils::{key_value, meta, title};
use crate::api::api_types::CalendarDay;
use crate::ui::theme::Theme;
use ratatui::prelude::*;

/// A converted date. The calendar the user asked about comes first.
pub fn calendar(day: &CalendarDay, gregorian_first: bool, theme: &Theme) -> Text<'static> {
  let hijri = day.hijri_text().unwrap_or_default().to_string();
  let gregorian = day.gregorian_text().unwrap_or_default().to_string();
  let (primary, secondary) = if gregorian_first {
    (gregorian, hijri)
  } else {
    (hijri, gregorian)
  };

  Text::from(vec![
    title(primary, theme),
    meta(secondary, theme),
    Line::default(),
    key_value("Metode", day.method.as_deref(), theme),
    key_value("Adjustment", day.adjustment.as_deref(), theme),
  ])
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::api::api_types::DateText;
  use crate::ui::renderfns::utils::plain_text;

  fn day() -> CalendarDay {
    CalendarDay {
      hijr: Some(DateText {
        today: Some("1 Ramadhan 1445 H".to_string()),
      }),
      ce: Some(DateText {
        today: Some("Senin, 11 Maret 2024".to_string()),
      }),
      method: Some("standar".to_string()),
      adjustment: None,
    }
  }

  #[test]
  fn test_hijri_first() {
    let text = plain_text(&calendar(&day(), false, &Theme::DAY));
    assert!(text.starts_with("1 Ramadhan 1445 H\nSenin, 11 Maret 2024"));
    assert!(text.contains("Metode      standar"));
    assert!(text.contains("Adjustment  -"));
  }

  #[test]
  fn test_gregorian_first() {
    let text = plain_text(&calendar(&day(), true, &Theme::DAY));
    assert!(text.starts_with("Senin, 11 Maret 2024\n1 Ramadhan 1445 H"));
  }
}
