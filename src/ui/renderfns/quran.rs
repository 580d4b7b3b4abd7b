use super::utils::{key_value, meta, or_dash, title};
use crate::api::api_types::{Ayah, SurahDetail, SurahSummary};
use crate::ui::theme::Theme;
use ratatui::prelude::*;

pub fn surah_label(surah: &SurahSummary) -> String {
  format!(
    "{}. {}",
    or_dash(surah.number.as_deref()),
    or_dash(surah.name_latin.as_deref())
  )
}

pub fn surah(detail: &SurahDetail, theme: &Theme) -> Text<'static> {
  let audio = if detail.audio_url.as_deref().is_some_and(|u| !u.is_empty()) {
    "Tersedia"
  } else {
    "Tidak"
  };

  Text::from(vec![
    title(detail.name_latin.clone().unwrap_or_default(), theme),
    meta(
      format!(
        "{} • {}",
        detail.translation.as_deref().unwrap_or_default(),
        detail.revelation.as_deref().unwrap_or_default()
      ),
      theme,
    ),
    Line::default(),
    key_value("Jumlah Ayat", detail.number_of_ayahs.as_deref(), theme),
    key_value("Audio Surah", Some(audio), theme),
  ])
}

/// A single ayah. Reading mode keeps only the Arabic text and translation.
pub fn ayah(ayah: &Ayah, reading: bool, theme: &Theme) -> Text<'static> {
  let mut lines = Vec::new();

  if !reading {
    lines.push(title(
      format!(
        "QS {}:{}",
        or_dash(ayah.surah_number.as_deref()),
        or_dash(ayah.ayah_number.as_deref())
      ),
      theme,
    ));
    lines.push(Line::default());
  }

  lines.push(Line::from(Span::styled(
    ayah.arab.clone().unwrap_or_default(),
    Style::default().fg(theme.arabic),
  )));
  lines.push(Line::default());
  lines.push(Line::from(Span::styled(
    ayah.translation.clone().unwrap_or_default(),
    theme.text_style(),
  )));

  if !reading {
    let meta_info = ayah.meta.clone().unwrap_or_default();
    lines.push(Line::default());
    lines.push(meta(
      format!(
        "Juz: {}  Page: {}  Ruku: {}",
        or_dash(meta_info.juz.as_deref()),
        or_dash(meta_info.page.as_deref()),
        or_dash(meta_info.ruku.as_deref())
      ),
      theme,
    ));
    if let Some(url) = ayah.audio_url.as_deref().filter(|u| !u.is_empty()) {
      lines.push(key_value("Audio", Some(url), theme));
    }
  }

  Text::from(lines)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::api::api_types::AyahMeta;
  use crate::ui::renderfns::utils::plain_text;

  fn kursi() -> Ayah {
    Ayah {
      surah_number: Some("2".to_string()),
      ayah_number: Some("255".to_string()),
      arab: Some("اللَّهُ لَا إِلَٰهَ إِلَّا هُوَ".to_string()),
      translation: Some("Allah, tidak ada tuhan selain Dia".to_string()),
      meta: Some(AyahMeta {
        juz: Some("3".to_string()),
        page: Some("42".to_string()),
        ruku: None,
      }),
      audio_url: Some("https://cdn.example/2/255.mp3".to_string()),
    }
  }

  #[test]
  fn test_surah_label() {
    let summary = SurahSummary {
      number: Some("1".to_string()),
      name_latin: Some("Al-Fatihah".to_string()),
    };
    assert_eq!(surah_label(&summary), "1. Al-Fatihah");
  }

  #[test]
  fn test_surah_detail() {
    let detail = SurahDetail {
      name_latin: Some("Yasin".to_string()),
      translation: Some("Yasin".to_string()),
      revelation: Some("Makkiyah".to_string()),
      number_of_ayahs: Some("83".to_string()),
      audio_url: Some("https://cdn.example/36.mp3".to_string()),
      ..Default::default()
    };
    let text = plain_text(&surah(&detail, &Theme::DAY));
    assert!(text.starts_with("Yasin\nYasin • Makkiyah"));
    assert!(text.contains("Jumlah Ayat 83"));
    assert!(text.contains("Audio Surah Tersedia"));
  }

  #[test]
  fn test_ayah_full() {
    let text = plain_text(&ayah(&kursi(), false, &Theme::DAY));
    assert!(text.starts_with("QS 2:255"));
    assert!(text.contains("Juz: 3  Page: 42  Ruku: -"));
    assert!(text.ends_with("Audio       https://cdn.example/2/255.mp3"));
  }

  #[test]
  fn test_ayah_without_audio() {
    let silent = Ayah {
      audio_url: None,
      ..kursi()
    };
    let text = plain_text(&ayah(&silent, false, &Theme::DAY));
    assert!(!text.contains("Audio"));
  }

  #[test]
  fn test_ayah_reading_mode() {
    let text = plain_text(&ayah(&kursi(), true, &Theme::DAY));
    assert_eq!(
      text,
      "اللَّهُ لَا إِلَٰهَ إِلَّا هُوَ\n\nAllah, tidak ada tuhan selain Dia"
    );
  }
}
