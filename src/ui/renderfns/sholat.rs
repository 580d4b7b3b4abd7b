use super::utils::{empty, key_value, or_dash, title};
use crate::api::api_types::{Location, PrayerDay};
use crate::ui::theme::Theme;
use ratatui::prelude::*;

pub fn location_label(location: &Location) -> String {
  or_dash(location.lokasi.as_deref())
}

/// Prayer schedule for a location, one block per day
pub fn schedule(location: &str, days: &[PrayerDay], theme: &Theme) -> Text<'static> {
  let mut lines = vec![title(location.to_string(), theme)];

  if days.is_empty() {
    lines.extend(empty("Jadwal tidak tersedia.", theme).lines);
    return Text::from(lines);
  }

  for day in days {
    lines.push(Line::default());
    lines.push(title(day.tanggal.clone().unwrap_or_default(), theme));
    lines.extend(
      day
        .times()
        .into_iter()
        .map(|(name, time)| key_value(name, time, theme)),
    );
  }
  Text::from(lines)
}
