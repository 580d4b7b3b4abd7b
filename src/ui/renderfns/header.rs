use crate::app::Section;
use crate::ui::theme::Theme;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// Header state shown above the panes
#[derive(Debug, Clone, Copy)]
pub struct HeaderInfo<'a> {
  pub base_url: &'a str,
  pub active: Section,
  pub night: bool,
  pub reading: bool,
}

/// Header line with logo, API host, section tabs and mode flags
pub fn header_line(info: &HeaderInfo, theme: &Theme) -> Line<'static> {
  let separator = || Span::styled("│", theme.dim_style());

  let mut spans = vec![
    Span::styled(" myq ", Style::default().fg(theme.key).bold()),
    separator(),
    Span::styled(format!(" {} ", extract_domain(info.base_url)), theme.text_style()),
    separator(),
    Span::raw(" "),
  ];

  for section in Section::ALL {
    let label = format!("{}:{}", section.index() + 1, section.title());
    let style = if section == info.active {
      Style::default().fg(theme.accent).bold().reversed()
    } else {
      theme.dim_style()
    };
    spans.push(Span::styled(format!(" {} ", label), style));
  }

  spans.push(Span::raw(" "));
  if info.night {
    spans.push(Span::styled("[night]", Style::default().fg(theme.accent)));
  }
  if info.reading {
    spans.push(Span::styled("[read]", Style::default().fg(theme.accent)));
  }

  Line::from(spans)
}

/// Draw the header bar
pub fn draw_header(frame: &mut Frame, area: Rect, info: &HeaderInfo, theme: &Theme) {
  let paragraph =
    Paragraph::new(header_line(info, theme)).style(Style::default().bg(theme.background));
  frame.render_widget(paragraph, area);
}

/// Extract host from the API base URL
fn extract_domain(url: &str) -> &str {
  url
    .strip_prefix("https://")
    .or_else(|| url.strip_prefix("http://"))
    .unwrap_or(url)
    .split('/')
    .next()
    .unwrap_or(url)
}
