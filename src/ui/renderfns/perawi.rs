use super::utils::{key_value, or_dash, title};
use crate::api::api_types::{non_empty, Perawi};
use crate::ui::theme::Theme;
use ratatui::prelude::*;

pub fn perawi_label(perawi: &Perawi) -> String {
  format!(
    "{} - {}",
    or_dash(perawi.id.as_deref()),
    non_empty(&perawi.name).unwrap_or("Tanpa nama")
  )
}

pub fn perawi(perawi: &Perawi, theme: &Theme) -> Text<'static> {
  Text::from(vec![
    title(non_empty(&perawi.name).unwrap_or("Perawi").to_string(), theme),
    Line::default(),
    key_value("ID", perawi.id.as_deref(), theme),
    key_value("Grade", perawi.grade.as_deref(), theme),
    key_value("Birth", perawi.birth(), theme),
    key_value("Death", perawi.death(), theme),
    key_value("Teachers", perawi.teachers.as_deref(), theme),
    key_value("Students", perawi.students.as_deref(), theme),
  ])
}
