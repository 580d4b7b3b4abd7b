use super::utils::{meta, or_dash, title, truncate};
use crate::api::api_types::Hadis;
use crate::ui::theme::Theme;
use ratatui::prelude::*;

pub fn hadis_label(hadis: &Hadis) -> String {
  format!(
    "{} - {}",
    or_dash(hadis.id.as_deref()),
    truncate(hadis.translation().unwrap_or_default(), 80)
  )
}

/// A hadith. Reading mode keeps only the Arabic text and translation.
pub fn hadis(hadis: &Hadis, reading: bool, theme: &Theme) -> Text<'static> {
  let mut lines = Vec::new();

  if !reading {
    lines.push(title(format!("Hadis #{}", or_dash(hadis.id.as_deref())), theme));
    lines.push(Line::default());
  }

  if let Some(arabic) = hadis.arabic().filter(|a| !a.is_empty()) {
    lines.push(Line::from(Span::styled(
      arabic.to_string(),
      Style::default().fg(theme.arabic),
    )));
    lines.push(Line::default());
  }
  lines.push(Line::from(Span::styled(
    hadis.translation().unwrap_or_default().to_string(),
    theme.text_style(),
  )));

  if !reading {
    lines.push(Line::default());
    lines.push(meta(
      format!(
        "Grade: {}  Takhrij: {}",
        or_dash(hadis.grade.as_deref()),
        or_dash(hadis.takhrij.as_deref())
      ),
      theme,
    ));
  }

  Text::from(lines)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::api::api_types::HadisText;
  use crate::ui::renderfns::utils::plain_text;

  fn sample() -> Hadis {
    Hadis {
      id: Some("1".to_string()),
      text: Some(HadisText::Pair {
        ar: Some("إنما الأعمال بالنيات".to_string()),
        id: Some("Sesungguhnya amal itu tergantung niatnya".to_string()),
      }),
      grade: Some("Shahih".to_string()),
      takhrij: None,
    }
  }

  #[test]
  fn test_hadis_detail() {
    let text = plain_text(&hadis(&sample(), false, &Theme::DAY));
    assert!(text.starts_with("Hadis #1\n\nإنما الأعمال بالنيات"));
    assert!(text.ends_with("Grade: Shahih  Takhrij: -"));
  }

  #[test]
  fn test_hadis_reading_mode() {
    let text = plain_text(&hadis(&sample(), true, &Theme::DAY));
    assert_eq!(
      text,
      "إنما الأعمال بالنيات\n\nSesungguhnya amal itu tergantung niatnya"
    );
  }

  #[test]
  fn test_plain_text_hadis() {
    let plain = Hadis {
      id: Some("7".to_string()),
      text: Some(HadisText::Plain("Teks".to_string())),
      grade: None,
      takhrij: None,
    };
    assert_eq!(hadis_label(&plain), "7 - Teks");
    let text = plain_text(&hadis(&plain, true, &Theme::DAY));
    assert_eq!(text, "Teks");
  }
}
