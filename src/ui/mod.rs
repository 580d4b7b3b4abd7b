pub mod components;
pub mod renderfns;
pub mod theme;

use crate::api::Transport;
use crate::app::{App, Detail, Mode, Panel, Section};
use crate::cache::CacheResult;
use crate::query::{Query, QueryState};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};
use renderfns::{calendar, hadis, perawi, quran, sholat, HeaderInfo};
use theme::Theme;

/// Main draw function
pub fn draw<T: Transport + Clone + 'static>(frame: &mut Frame, app: &App<T>) {
  let theme = app.theme();
  let area = frame.area();
  frame.render_widget(Block::default().style(Style::default().bg(theme.background)), area);

  let chunks = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // Header
      Constraint::Min(1),    // Panes
      Constraint::Length(1), // Status bar
    ])
    .split(area);

  let header = HeaderInfo {
    base_url: app.base_url(),
    active: app.section(),
    night: app.night(),
    reading: app.reading(),
  };
  renderfns::draw_header(frame, chunks[0], &header, &theme);

  let section = app.section();
  let panel = app.panel(section);
  if section.has_list() {
    let panes = Layout::default()
      .direction(Direction::Horizontal)
      .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
      .split(chunks[1]);
    draw_list_pane(frame, panes[0], section, panel, &theme);
    draw_detail_pane(frame, panes[1], section, panel, app.reading(), &theme);
  } else {
    draw_detail_pane(frame, chunks[1], section, panel, app.reading(), &theme);
  }

  draw_status_bar(frame, chunks[2], app, &theme);

  app.command_input().render_overlay(frame, chunks[1], &theme);
  app.filter_input().render_overlay(frame, chunks[1], &theme);
}

/// Pane title with loading state, item count and cache marker
pub fn pane_title<T>(title: &str, query: &Query<CacheResult<T>>, count: Option<usize>) -> String {
  let mut text = format!(" {}", title);
  match query.state() {
    QueryState::Loading => text.push_str(" (loading...)"),
    QueryState::Success(result) => {
      if let Some(count) = count {
        text.push_str(&format!(" ({})", count));
      }
      if result.is_cached() {
        text.push_str(" [cache]");
      }
    }
    QueryState::Idle | QueryState::Error(_) => {}
  }
  text.push(' ');
  text
}

fn pane_block(title: String, theme: &Theme) -> Block<'static> {
  Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(theme.border))
}

/// Paragraph for the idle/loading/error states shared by both panes
fn state_paragraph<T>(
  state: &QueryState<T>,
  idle_hint: &str,
  theme: &Theme,
) -> Option<Paragraph<'static>> {
  match state {
    QueryState::Idle => Some(Paragraph::new(idle_hint.to_string()).style(theme.dim_style())),
    QueryState::Loading => Some(Paragraph::new("Loading...").style(theme.dim_style())),
    QueryState::Error(e) => Some(
      Paragraph::new(format!("Error: {}", e))
        .style(Style::default().fg(theme.error))
        .wrap(Wrap { trim: false }),
    ),
    QueryState::Success(_) => None,
  }
}

fn draw_list_pane(frame: &mut Frame, area: Rect, section: Section, panel: &Panel, theme: &Theme) {
  let entries = panel.visible_entries();
  let mut title = pane_title(&panel.list_title, &panel.list, Some(entries.len()));
  if !panel.filter.is_empty() {
    title.push_str(&format!("/{} ", panel.filter));
  }
  let block = pane_block(title, theme);

  if let Some(paragraph) = state_paragraph(panel.list.state(), list_hint(section), theme) {
    frame.render_widget(paragraph.block(block), area);
    return;
  }

  if entries.is_empty() {
    let paragraph = Paragraph::new("No results.").style(theme.dim_style()).block(block);
    frame.render_widget(paragraph, area);
    return;
  }

  let width = area.width.saturating_sub(4) as usize;
  let items: Vec<ListItem> = entries
    .iter()
    .map(|entry| ListItem::new(renderfns::truncate(&entry.label, width)).style(theme.text_style()))
    .collect();

  let list = List::new(items)
    .block(block)
    .highlight_style(
      Style::default()
        .bg(theme.highlight_bg)
        .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("> ");

  let mut state = ListState::default();
  state.select(Some(panel.selected));

  frame.render_stateful_widget(list, area, &mut state);
}

fn draw_detail_pane(
  frame: &mut Frame,
  area: Rect,
  section: Section,
  panel: &Panel,
  reading: bool,
  theme: &Theme,
) {
  let block = pane_block(pane_title(&panel.detail_title, &panel.detail, None), theme);

  if let Some(paragraph) = state_paragraph(panel.detail.state(), detail_hint(section), theme) {
    frame.render_widget(paragraph.block(block), area);
    return;
  }

  if let Some(result) = panel.detail.data() {
    let paragraph = Paragraph::new(render_detail(&result.data, reading, theme))
      .block(block)
      .wrap(Wrap { trim: false })
      .scroll((panel.scroll, 0));
    frame.render_widget(paragraph, area);
  }
}

/// Render a detail value with the matching renderer
pub fn render_detail(detail: &Detail, reading: bool, theme: &Theme) -> Text<'static> {
  match detail {
    Detail::Schedule { location, days } => sholat::schedule(location, days, theme),
    Detail::Calendar {
      day,
      gregorian_first,
    } => calendar::calendar(day, *gregorian_first, theme),
    Detail::Surah(detail) => quran::surah(detail, theme),
    Detail::Ayah(ayah) => quran::ayah(ayah, reading, theme),
    Detail::Hadis(item) => hadis::hadis(item, reading, theme),
    Detail::Perawi(item) => perawi::perawi(item, theme),
  }
}

fn list_hint(section: Section) -> &'static str {
  match section {
    Section::Sholat => ":sholat <keyword> to search locations",
    Section::Calendar => "",
    Section::Quran => ":quran to list surahs",
    Section::Hadis => ":search <keyword> or :explore [page] [limit]",
    Section::Perawi => ":browse [page] [limit]",
  }
}

fn detail_hint(section: Section) -> &'static str {
  match section {
    Section::Sholat => "Pick a location with Enter, then :jadwal [today|YYYY-MM|YYYY-MM-DD]",
    Section::Calendar => ":today  :ce <YYYY-MM-DD>  :hijr <YYYY-MM-DD>",
    Section::Quran => ":surah <number>  :ayah <surah>:<ayah>",
    Section::Hadis => ":hadis <id>  :random",
    Section::Perawi => ":perawi <id>",
  }
}

fn draw_status_bar<T: Transport + Clone + 'static>(
  frame: &mut Frame,
  area: Rect,
  app: &App<T>,
  theme: &Theme,
) {
  let (content, style) = match app.mode() {
    Mode::Normal => match app.status() {
      Some(status) if status.is_error => (
        format!(" {}", status.text),
        Style::default().fg(theme.error),
      ),
      Some(status) => (format!(" {}", status.text), Style::default().fg(theme.accent)),
      None => (status_hint(app.section(), app.location_name()), theme.dim_style()),
    },
    Mode::Command => (
      format!(":{}", app.command_input().value()),
      Style::default().fg(theme.accent),
    ),
    Mode::Filter => (
      format!("/{}", app.filter_input().query()),
      Style::default().fg(theme.key),
    ),
  };

  let paragraph = Paragraph::new(content).style(style);
  frame.render_widget(paragraph, area);
}

fn status_hint(section: Section, location: Option<&str>) -> String {
  let mut hint = String::from(" :command  /filter  Tab:section  j/k:nav  Enter:open");
  if section == Section::Hadis {
    hint.push_str("  n/p:next/prev");
  }
  hint.push_str("  r:read  N:night  q:quit");
  if let (Section::Sholat, Some(name)) = (section, location) {
    hint.push_str(&format!("  │ {}", name));
  }
  hint
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_pane_title_states() {
    let mut query: Query<CacheResult<Vec<u8>>> = Query::new();
    assert_eq!(pane_title("Surah", &query, Some(0)), " Surah ");

    query.set(CacheResult::from_network(vec![1, 2]));
    assert_eq!(pane_title("Surah", &query, Some(2)), " Surah (2) ");

    query.set(CacheResult::from_cache(vec![1, 2]));
    assert_eq!(pane_title("Surah", &query, Some(2)), " Surah (2) [cache] ");
    assert_eq!(pane_title("Detail", &query, None), " Detail [cache] ");
  }

  #[test]
  fn test_status_hint() {
    assert!(status_hint(Section::Hadis, None).contains("n/p:next/prev"));
    assert!(!status_hint(Section::Quran, None).contains("n/p"));
    assert!(status_hint(Section::Sholat, Some("KOTA BOGOR")).ends_with("│ KOTA BOGOR"));
  }

  #[test]
  fn test_render_detail_dispatch() {
    let detail = Detail::Perawi(crate::api::api_types::Perawi {
      name: Some("Anas bin Malik".to_string()),
      ..Default::default()
    });
    let text = render_detail(&detail, false, &Theme::DAY);
    assert_eq!(renderfns::utils::line_text(&text.lines[0]), "Anas bin Malik");
  }
}
