//! Serde-deserializable types matching myQuran API responses.
//!
//! The API mixes strings and numbers for the same fields across endpoints
//! (ids, ayah counts, juz numbers), so scalar fields are decoded leniently
//! into optional strings.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Decode a string, number or boolean into `Some(String)`; null into `None`.
pub fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
  D: Deserializer<'de>,
{
  Ok(match Value::deserialize(deserializer)? {
    Value::Null => None,
    Value::String(s) => Some(s),
    Value::Number(n) => Some(n.to_string()),
    Value::Bool(b) => Some(b.to_string()),
    other => Some(other.to_string()),
  })
}

// ============================================================================
// Sholat
// ============================================================================

/// A city/regency that has a prayer schedule.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Location {
  #[serde(default, deserialize_with = "lenient_string")]
  pub id: Option<String>,
  #[serde(default, deserialize_with = "lenient_string")]
  pub lokasi: Option<String>,
}

/// Prayer times for one day.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PrayerDay {
  #[serde(default, deserialize_with = "lenient_string")]
  pub tanggal: Option<String>,
  #[serde(default, deserialize_with = "lenient_string")]
  pub imsak: Option<String>,
  #[serde(default, deserialize_with = "lenient_string")]
  pub subuh: Option<String>,
  #[serde(default, deserialize_with = "lenient_string")]
  pub terbit: Option<String>,
  #[serde(default, deserialize_with = "lenient_string")]
  pub dhuha: Option<String>,
  #[serde(default, deserialize_with = "lenient_string")]
  pub dzuhur: Option<String>,
  #[serde(default, deserialize_with = "lenient_string")]
  pub ashar: Option<String>,
  #[serde(default, deserialize_with = "lenient_string")]
  pub maghrib: Option<String>,
  #[serde(default, deserialize_with = "lenient_string")]
  pub isya: Option<String>,
}

impl PrayerDay {
  /// Prayer names with their times, in the order of the day.
  pub fn times(&self) -> [(&'static str, Option<&str>); 8] {
    [
      ("Imsak", self.imsak.as_deref()),
      ("Subuh", self.subuh.as_deref()),
      ("Terbit", self.terbit.as_deref()),
      ("Dhuha", self.dhuha.as_deref()),
      ("Dzuhur", self.dzuhur.as_deref()),
      ("Ashar", self.ashar.as_deref()),
      ("Maghrib", self.maghrib.as_deref()),
      ("Isya", self.isya.as_deref()),
    ]
  }
}

// ============================================================================
// Calendar
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DateText {
  #[serde(default, deserialize_with = "lenient_string")]
  pub today: Option<String>,
}

/// A date expressed in both calendars.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CalendarDay {
  #[serde(default)]
  pub hijr: Option<DateText>,
  #[serde(default)]
  pub ce: Option<DateText>,
  #[serde(default, deserialize_with = "lenient_string")]
  pub method: Option<String>,
  #[serde(default, deserialize_with = "lenient_string")]
  pub adjustment: Option<String>,
}

impl CalendarDay {
  pub fn hijri_text(&self) -> Option<&str> {
    self.hijr.as_ref().and_then(|d| d.today.as_deref())
  }

  pub fn gregorian_text(&self) -> Option<&str> {
    self.ce.as_ref().and_then(|d| d.today.as_deref())
  }
}

// ============================================================================
// Quran
// ============================================================================

/// Entry of the surah index.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SurahSummary {
  #[serde(default, deserialize_with = "lenient_string")]
  pub number: Option<String>,
  #[serde(default, deserialize_with = "lenient_string")]
  pub name_latin: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SurahDetail {
  #[serde(default, deserialize_with = "lenient_string")]
  pub number: Option<String>,
  #[serde(default, deserialize_with = "lenient_string")]
  pub name_latin: Option<String>,
  #[serde(default, deserialize_with = "lenient_string")]
  pub translation: Option<String>,
  #[serde(default, deserialize_with = "lenient_string")]
  pub revelation: Option<String>,
  #[serde(default, deserialize_with = "lenient_string")]
  pub number_of_ayahs: Option<String>,
  #[serde(default, deserialize_with = "lenient_string")]
  pub audio_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AyahMeta {
  #[serde(default, deserialize_with = "lenient_string")]
  pub juz: Option<String>,
  #[serde(default, deserialize_with = "lenient_string")]
  pub page: Option<String>,
  #[serde(default, deserialize_with = "lenient_string")]
  pub ruku: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Ayah {
  #[serde(default, deserialize_with = "lenient_string")]
  pub surah_number: Option<String>,
  #[serde(default, deserialize_with = "lenient_string")]
  pub ayah_number: Option<String>,
  #[serde(default, deserialize_with = "lenient_string")]
  pub arab: Option<String>,
  #[serde(default, deserialize_with = "lenient_string")]
  pub translation: Option<String>,
  #[serde(default)]
  pub meta: Option<AyahMeta>,
  #[serde(default, deserialize_with = "lenient_string")]
  pub audio_url: Option<String>,
}

// ============================================================================
// Hadis
// ============================================================================

/// Hadith text: either an Arabic/Indonesian pair or a single plain string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum HadisText {
  Pair {
    #[serde(default, deserialize_with = "lenient_string")]
    ar: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    id: Option<String>,
  },
  Plain(String),
}

impl HadisText {
  pub fn arabic(&self) -> Option<&str> {
    match self {
      HadisText::Pair { ar, .. } => ar.as_deref(),
      HadisText::Plain(_) => None,
    }
  }

  pub fn translation(&self) -> Option<&str> {
    match self {
      HadisText::Pair { id, .. } => id.as_deref(),
      HadisText::Plain(text) => Some(text),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Hadis {
  #[serde(default, deserialize_with = "lenient_string")]
  pub id: Option<String>,
  #[serde(default)]
  pub text: Option<HadisText>,
  #[serde(default, deserialize_with = "lenient_string")]
  pub grade: Option<String>,
  #[serde(default, deserialize_with = "lenient_string")]
  pub takhrij: Option<String>,
}

impl Hadis {
  pub fn arabic(&self) -> Option<&str> {
    self.text.as_ref().and_then(HadisText::arabic)
  }

  pub fn translation(&self) -> Option<&str> {
    self.text.as_ref().and_then(HadisText::translation)
  }
}

// ============================================================================
// Perawi
// ============================================================================

/// A hadith narrator.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Perawi {
  #[serde(default, deserialize_with = "lenient_string")]
  pub id: Option<String>,
  #[serde(default, deserialize_with = "lenient_string")]
  pub name: Option<String>,
  #[serde(default, deserialize_with = "lenient_string")]
  pub grade: Option<String>,
  #[serde(default, deserialize_with = "lenient_string")]
  pub birth_date_place: Option<String>,
  #[serde(default, deserialize_with = "lenient_string")]
  pub birth_date: Option<String>,
  #[serde(default, deserialize_with = "lenient_string")]
  pub death_date_place: Option<String>,
  #[serde(default, deserialize_with = "lenient_string")]
  pub death_date: Option<String>,
  #[serde(default, deserialize_with = "lenient_string")]
  pub teachers: Option<String>,
  #[serde(default, deserialize_with = "lenient_string")]
  pub students: Option<String>,
}

impl Perawi {
  pub fn birth(&self) -> Option<&str> {
    non_empty(&self.birth_date_place).or_else(|| non_empty(&self.birth_date))
  }

  pub fn death(&self) -> Option<&str> {
    non_empty(&self.death_date_place).or_else(|| non_empty(&self.death_date))
  }
}

/// Treat empty strings like missing values.
pub fn non_empty(value: &Option<String>) -> Option<&str> {
  value.as_deref().filter(|s| !s.is_empty())
}
