use crate::api::api_types::{
  Ayah, CalendarDay, Hadis, Location, Perawi, PrayerDay, SurahDetail, SurahSummary,
};
use crate::api::{ApiError, MyQuranClient, Transport};
use crate::cache::CacheResult;
use crate::commands::{self, Action};
use crate::event::{Event, EventHandler};
use crate::prefs::Preferences;
use crate::query::Query;
use crate::ui;
use crate::ui::components::{
  matches_filter, CommandEvent, CommandInput, FilterEvent, FilterInput, KeyResult,
};
use crate::ui::renderfns::{hadis, perawi, quran, sholat};
use crate::ui::theme::Theme;
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{
  disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::prelude::*;
use std::future::Future;
use std::io::{stdout, Stdout};
use std::time::Duration;
use tracing::{debug, info};

const TICK_RATE: Duration = Duration::from_millis(100);

/// Input mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
  Normal,
  Command,
  Filter,
}

/// Top-level sections, one tab each
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
  Sholat,
  Calendar,
  Quran,
  Hadis,
  Perawi,
}

impl Section {
  pub const ALL: [Section; 5] = [
    Section::Sholat,
    Section::Calendar,
    Section::Quran,
    Section::Hadis,
    Section::Perawi,
  ];

  pub fn index(self) -> usize {
    self as usize
  }

  pub fn title(self) -> &'static str {
    match self {
      Section::Sholat => "Sholat",
      Section::Calendar => "Calendar",
      Section::Quran => "Quran",
      Section::Hadis => "Hadis",
      Section::Perawi => "Perawi",
    }
  }

  /// Section for a `1`-`5` key
  pub fn from_digit(c: char) -> Option<Self> {
    let n = c.to_digit(10)? as usize;
    Self::ALL.get(n.checked_sub(1)?).copied()
  }

  pub fn next(self) -> Self {
    Self::ALL[(self.index() + 1) % Self::ALL.len()]
  }

  pub fn prev(self) -> Self {
    Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
  }

  /// Whether the section has a list pane
  pub fn has_list(self) -> bool {
    !matches!(self, Section::Calendar)
  }
}

/// A row in a list pane
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEntry {
  pub id: Option<String>,
  pub label: String,
}

impl ListEntry {
  fn location(location: &Location) -> Self {
    Self {
      id: location.id.clone(),
      label: sholat::location_label(location),
    }
  }

  fn surah(surah: &SurahSummary) -> Self {
    Self {
      id: surah.number.clone(),
      label: quran::surah_label(surah),
    }
  }

  fn hadis(item: &Hadis) -> Self {
    Self {
      id: item.id.clone(),
      label: hadis::hadis_label(item),
    }
  }

  fn perawi(item: &Perawi) -> Self {
    Self {
      id: item.id.clone(),
      label: perawi::perawi_label(item),
    }
  }
}

/// Content of a detail pane
#[derive(Debug, Clone)]
pub enum Detail {
  Schedule {
    location: String,
    days: Vec<PrayerDay>,
  },
  Calendar {
    day: CalendarDay,
    gregorian_first: bool,
  },
  Surah(SurahDetail),
  Ayah(Ayah),
  Hadis(Hadis),
  Perawi(Perawi),
}

pub type ListQuery = Query<CacheResult<Vec<ListEntry>>>;
pub type DetailQuery = Query<CacheResult<Detail>>;

/// List and detail panes of one section
#[derive(Debug)]
pub struct Panel {
  pub list_title: String,
  pub list: ListQuery,
  pub selected: usize,
  pub filter: String,
  pub detail_title: String,
  pub detail: DetailQuery,
  pub scroll: u16,
}

impl Panel {
  fn new(section: Section) -> Self {
    let (list_title, detail_title) = match section {
      Section::Sholat => ("Lokasi", "Jadwal"),
      Section::Calendar => ("", "Kalender"),
      Section::Quran => ("Surah", "Detail"),
      Section::Hadis => ("Hadis", "Detail"),
      Section::Perawi => ("Perawi", "Detail"),
    };
    Self {
      list_title: list_title.to_string(),
      list: Query::new(),
      selected: 0,
      filter: String::new(),
      detail_title: detail_title.to_string(),
      detail: Query::new(),
      scroll: 0,
    }
  }

  /// List rows matching the current filter
  pub fn visible_entries(&self) -> Vec<&ListEntry> {
    self
      .list
      .data()
      .map(|result| {
        result
          .data
          .iter()
          .filter(|entry| matches_filter(&entry.label, &self.filter))
          .collect()
      })
      .unwrap_or_default()
  }

  pub fn selected_entry(&self) -> Option<&ListEntry> {
    self.visible_entries().get(self.selected).copied()
  }

  fn move_selection(&mut self, delta: i32) {
    let len = self.visible_entries().len();
    if len > 0 {
      self.selected = (self.selected as i32 + delta).rem_euclid(len as i32) as usize;
    }
  }

  fn set_filter(&mut self, filter: String) {
    self.filter = filter;
    self.selected = 0;
  }

  fn start_list<F>(&mut self, title: String, future: F)
  where
    F: Future<Output = std::result::Result<CacheResult<Vec<ListEntry>>, String>> + Send + 'static,
  {
    self.list_title = title;
    self.selected = 0;
    self.filter.clear();
    self.list.start(future);
  }

  fn start_detail<F>(&mut self, title: String, future: F)
  where
    F: Future<Output = std::result::Result<CacheResult<Detail>, String>> + Send + 'static,
  {
    self.detail_title = title;
    self.scroll = 0;
    self.detail.start(future);
  }

  fn poll(&mut self) -> bool {
    let list_changed = self.list.poll();
    let detail_changed = self.detail.poll();
    if list_changed {
      self.selected = 0;
    }
    if let Some(error) = self.list.error().filter(|_| list_changed) {
      debug!(pane = %self.list_title, %error, "list request failed");
    }
    if let Some(error) = self.detail.error().filter(|_| detail_changed) {
      debug!(pane = %self.detail_title, %error, "detail request failed");
    }
    list_changed || detail_changed
  }
}

/// Message shown in the status bar until the next action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
  pub text: String,
  pub is_error: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct SelectedLocation {
  id: String,
  name: String,
}

fn user_error(error: ApiError) -> String {
  error.to_string()
}

/// Main application state
pub struct App<T: Transport> {
  client: MyQuranClient<T>,
  prefs: Preferences,
  section: Section,
  panels: Vec<Panel>,
  command: CommandInput,
  filter: FilterInput,
  status: Option<StatusMessage>,
  location: Option<SelectedLocation>,
  /// Last hadith opened or shown; `n`/`p` step from here
  hadis_id: Option<String>,
  reading: bool,
  night: bool,
  should_quit: bool,
}

impl<T: Transport + Clone + 'static> App<T> {
  pub fn new(client: MyQuranClient<T>, prefs: Preferences) -> Self {
    let night = prefs.night_reading();
    Self {
      client,
      prefs,
      section: Section::Sholat,
      panels: Section::ALL.iter().map(|s| Panel::new(*s)).collect(),
      command: CommandInput::new(),
      filter: FilterInput::new(),
      status: None,
      location: None,
      hadis_id: None,
      reading: false,
      night,
      should_quit: false,
    }
  }

  pub async fn run(&mut self) -> Result<()> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let mut events = EventHandler::new(TICK_RATE);
    self.load_initial_data();

    let result = self.event_loop(&mut terminal, &mut events).await;

    // Restore the terminal even when drawing failed
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;
    result
  }

  async fn event_loop(
    &mut self,
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    events: &mut EventHandler,
  ) -> Result<()> {
    while !self.should_quit() {
      terminal.draw(|frame| ui::draw(frame, self))?;

      match events.next().await {
        Some(Event::Key(key)) => self.handle_key(key),
        Some(Event::Tick) => {
          self.tick();
        }
        Some(Event::Resize) => {}
        None => break,
      }
    }
    Ok(())
  }

  fn load_initial_data(&mut self) {
    self.dispatch(Action::CalendarToday);
    self.dispatch(Action::Surahs);
    self.section = Section::Sholat;
  }

  /// Poll every pane for finished requests. Returns true when anything changed.
  pub fn tick(&mut self) -> bool {
    let changed = self
      .panels
      .iter_mut()
      .fold(false, |changed, panel| panel.poll() || changed);
    if let Some(id) = self.shown_hadis_id() {
      self.hadis_id = Some(id);
    }
    changed
  }

  // ==========================================================================
  // Key handling
  // ==========================================================================

  pub fn handle_key(&mut self, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
      self.should_quit = true;
      return;
    }

    if self.filter.is_active() {
      self.handle_filter_key(key);
      return;
    }

    match self.command.handle_key(key) {
      KeyResult::Event(CommandEvent::Submitted(line)) => {
        self.execute(&line);
        return;
      }
      KeyResult::Event(CommandEvent::Cancelled) => return,
      KeyResult::Handled => {
        self.status = None;
        return;
      }
      KeyResult::NotHandled => {}
    }

    if self.section.has_list() && key.code == KeyCode::Char('/') {
      self.handle_filter_key(key);
      return;
    }

    self.handle_normal_key(key);
  }

  fn handle_filter_key(&mut self, key: KeyEvent) {
    if let KeyResult::Event(FilterEvent::Changed(filter)) = self.filter.handle_key(key) {
      self.panel_mut(self.section).set_filter(filter);
    }
  }

  fn handle_normal_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Char('q') => self.should_quit = true,

      KeyCode::Tab => self.section = self.section.next(),
      KeyCode::BackTab => self.section = self.section.prev(),
      KeyCode::Char(c @ '1'..='5') => {
        if let Some(section) = Section::from_digit(c) {
          self.section = section;
        }
      }

      KeyCode::Up | KeyCode::Char('k') => self.panel_mut(self.section).move_selection(-1),
      KeyCode::Down | KeyCode::Char('j') => self.panel_mut(self.section).move_selection(1),
      KeyCode::PageDown => {
        let panel = self.panel_mut(self.section);
        panel.scroll = panel.scroll.saturating_add(10);
      }
      KeyCode::PageUp => {
        let panel = self.panel_mut(self.section);
        panel.scroll = panel.scroll.saturating_sub(10);
      }
      KeyCode::Enter => self.open_selected(),
      KeyCode::Esc => self.panel_mut(self.section).set_filter(String::new()),

      KeyCode::Char('n') if self.section == Section::Hadis => self.dispatch(Action::NextHadis),
      KeyCode::Char('p') if self.section == Section::Hadis => self.dispatch(Action::PrevHadis),
      KeyCode::Char('r') => self.dispatch(Action::ToggleReading),
      KeyCode::Char('N') => self.dispatch(Action::ToggleNight),

      _ => {}
    }
  }

  /// Run a command line typed after `:`
  pub fn execute(&mut self, line: &str) {
    match commands::parse(line) {
      Ok(action) => {
        debug!(?action, "executing command");
        self.status = None;
        self.dispatch(action);
      }
      Err(message) => self.set_error(message),
    }
  }

  fn set_error(&mut self, text: impl Into<String>) {
    self.status = Some(StatusMessage {
      text: text.into(),
      is_error: true,
    });
  }

  fn set_info(&mut self, text: impl Into<String>) {
    self.status = Some(StatusMessage {
      text: text.into(),
      is_error: false,
    });
  }

  /// Enter on a list row
  fn open_selected(&mut self) {
    if !self.section.has_list() {
      return;
    }
    let Some(entry) = self.panel(self.section).selected_entry().cloned() else {
      return;
    };
    let Some(id) = entry.id.filter(|id| !id.is_empty()) else {
      self.set_error("Selected entry has no id");
      return;
    };

    match self.section {
      Section::Sholat => {
        info!(%id, name = %entry.label, "location selected");
        self.location = Some(SelectedLocation {
          id,
          name: entry.label,
        });
        self.dispatch(Action::Schedule(None));
      }
      Section::Quran => self.dispatch(Action::Surah(id)),
      Section::Hadis => self.dispatch(Action::Hadis(id)),
      Section::Perawi => self.dispatch(Action::Perawi(id)),
      Section::Calendar => {}
    }
  }

  // ==========================================================================
  // Actions
  // ==========================================================================

  /// Perform an action. Each data action starts one request for one pane;
  /// a later action for the same pane supersedes it.
  pub fn dispatch(&mut self, action: Action) {
    let client = self.client.clone();
    match action {
      Action::SearchLocations(keyword) => {
        self.section = Section::Sholat;
        let title = format!("Lokasi \"{}\"", keyword);
        self.panel_mut(Section::Sholat).start_list(title, async move {
          let result = client.search_locations(&keyword).await.map_err(user_error)?;
          Ok(result.map(|items| items.iter().map(ListEntry::location).collect()))
        });
      }
      Action::Schedule(period) => {
        let Some(location) = self.location.clone() else {
          self.set_error("Select a location first (:sholat <keyword>)");
          return;
        };
        self.section = Section::Sholat;
        let period = period.unwrap_or_else(|| "today".to_string());
        let title = format!("Jadwal {}", period);
        self.panel_mut(Section::Sholat).start_detail(title, async move {
          let result = client
            .prayer_schedule(&location.id, &period)
            .await
            .map_err(user_error)?;
          Ok(result.map(|days| Detail::Schedule {
            location: location.name,
            days,
          }))
        });
      }
      Action::CalendarToday => {
        self.start_calendar("Hari ini".to_string(), false, async move {
          client.calendar_today().await
        });
      }
      Action::FromGregorian(date) => {
        let title = format!("Masehi {}", date);
        self.start_calendar(title, true, async move {
          client.calendar_from_gregorian(&date).await
        });
      }
      Action::FromHijri(date) => {
        let title = format!("Hijriah {}", date);
        self.start_calendar(title, false, async move {
          client.calendar_from_hijri(&date).await
        });
      }
      Action::Surahs => {
        self.section = Section::Quran;
        self.panel_mut(Section::Quran).start_list("Surah".to_string(), async move {
          let result = client.surahs().await.map_err(user_error)?;
          Ok(result.map(|items| items.iter().map(ListEntry::surah).collect()))
        });
      }
      Action::Surah(number) => {
        self.section = Section::Quran;
        let title = format!("Surah {}", number);
        self.panel_mut(Section::Quran).start_detail(title, async move {
          let result = client.surah(&number).await.map_err(user_error)?;
          Ok(result.map(Detail::Surah))
        });
      }
      Action::Ayah { surah, ayah } => {
        self.section = Section::Quran;
        let title = format!("QS {}:{}", surah, ayah);
        self.panel_mut(Section::Quran).start_detail(title, async move {
          let result = client.ayah(&surah, &ayah).await.map_err(user_error)?;
          Ok(result.map(Detail::Ayah))
        });
      }
      Action::RandomHadis => {
        self.start_hadis("Hadis acak".to_string(), async move { client.random_hadis().await });
      }
      Action::Hadis(id) => {
        self.hadis_id = Some(id.clone());
        let title = format!("Hadis #{}", id);
        self.start_hadis(title, async move { client.hadis(&id).await });
      }
      Action::NextHadis => {
        if let Some(id) = self.require_hadis_id() {
          self.start_hadis(format!("Setelah #{}", id), async move {
            client.next_hadis(&id).await
          });
        }
      }
      Action::PrevHadis => {
        if let Some(id) = self.require_hadis_id() {
          self.start_hadis(format!("Sebelum #{}", id), async move {
            client.prev_hadis(&id).await
          });
        }
      }
      Action::SearchHadis(keyword) => {
        self.section = Section::Hadis;
        let title = format!("Cari \"{}\"", keyword);
        self.panel_mut(Section::Hadis).start_list(title, async move {
          let result = client.search_hadis(&keyword).await.map_err(user_error)?;
          Ok(result.map(|items| items.iter().map(ListEntry::hadis).collect()))
        });
      }
      Action::ExploreHadis { page, limit } => {
        self.section = Section::Hadis;
        let title = format!("Jelajah hal. {}", if page.is_empty() { "1" } else { page.as_str() });
        self.panel_mut(Section::Hadis).start_list(title, async move {
          let result = client.explore_hadis(&page, &limit).await.map_err(user_error)?;
          Ok(result.map(|items| items.iter().map(ListEntry::hadis).collect()))
        });
      }
      Action::Perawi(id) => {
        self.section = Section::Perawi;
        let title = format!("Perawi #{}", id);
        self.panel_mut(Section::Perawi).start_detail(title, async move {
          let result = client.perawi(&id).await.map_err(user_error)?;
          Ok(result.map(Detail::Perawi))
        });
      }
      Action::BrowsePerawi { page, limit } => {
        self.section = Section::Perawi;
        let title = format!("Perawi hal. {}", if page.is_empty() { "1" } else { page.as_str() });
        self.panel_mut(Section::Perawi).start_list(title, async move {
          let result = client.browse_perawi(&page, &limit).await.map_err(user_error)?;
          Ok(result.map(|items| items.iter().map(ListEntry::perawi).collect()))
        });
      }
      Action::ToggleNight => {
        self.night = !self.night;
        self.prefs.set_night_reading(self.night);
        self.set_info(if self.night { "Night reading on" } else { "Night reading off" });
      }
      Action::ToggleReading => {
        self.reading = !self.reading;
        self.set_info(if self.reading { "Reading mode on" } else { "Reading mode off" });
      }
      Action::Quit => self.should_quit = true,
    }
  }

  fn start_calendar<F>(&mut self, title: String, gregorian_first: bool, request: F)
  where
    F: Future<Output = crate::api::error::Result<CacheResult<CalendarDay>>> + Send + 'static,
  {
    self.section = Section::Calendar;
    self.panel_mut(Section::Calendar).start_detail(title, async move {
      let result = request.await.map_err(user_error)?;
      Ok(result.map(|day| Detail::Calendar {
        day,
        gregorian_first,
      }))
    });
  }

  fn start_hadis<F>(&mut self, title: String, request: F)
  where
    F: Future<Output = crate::api::error::Result<CacheResult<Hadis>>> + Send + 'static,
  {
    self.section = Section::Hadis;
    self.panel_mut(Section::Hadis).start_detail(title, async move {
      let result = request.await.map_err(user_error)?;
      Ok(result.map(Detail::Hadis))
    });
  }

  fn require_hadis_id(&mut self) -> Option<String> {
    let id = self.hadis_id.clone();
    if id.is_none() {
      self.set_error("No hadith shown (:hadis <id> or :random)");
    }
    id
  }

  /// Id of the hadith currently shown in the Hadis detail pane
  fn shown_hadis_id(&self) -> Option<String> {
    match self.panel(Section::Hadis).detail.data().map(|result| &result.data) {
      Some(Detail::Hadis(item)) => item.id.clone().filter(|id| !id.is_empty()),
      _ => None,
    }
  }

  // ==========================================================================
  // Accessors for UI rendering
  // ==========================================================================

  pub fn section(&self) -> Section {
    self.section
  }

  pub fn panel(&self, section: Section) -> &Panel {
    &self.panels[section.index()]
  }

  fn panel_mut(&mut self, section: Section) -> &mut Panel {
    &mut self.panels[section.index()]
  }

  pub fn mode(&self) -> Mode {
    if self.command.is_active() {
      Mode::Command
    } else if self.filter.is_active() {
      Mode::Filter
    } else {
      Mode::Normal
    }
  }

  pub fn command_input(&self) -> &CommandInput {
    &self.command
  }

  pub fn filter_input(&self) -> &FilterInput {
    &self.filter
  }

  pub fn status(&self) -> Option<&StatusMessage> {
    self.status.as_ref()
  }

  pub fn location_name(&self) -> Option<&str> {
    self.location.as_ref().map(|l| l.name.as_str())
  }

  pub fn base_url(&self) -> &str {
    self.client.dispatcher().base_url()
  }

  pub fn reading(&self) -> bool {
    self.reading
  }

  pub fn night(&self) -> bool {
    self.night
  }

  pub fn theme(&self) -> Theme {
    Theme::for_night(self.night)
  }

  pub fn should_quit(&self) -> bool {
    self.should_quit
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::api::transport::testing::{MockTransport, MOCK_BASE};
  use crate::api::Dispatcher;
  use crate::cache::{CacheLayer, CacheStorage, CacheStore, MemoryStorage};
  use crate::prefs::NIGHT_READING_KEY;
  use crate::query::QueryState;
  use std::sync::Arc;

  fn app(transport: MockTransport) -> (App<MockTransport>, Arc<MemoryStorage>) {
    let storage = Arc::new(MemoryStorage::new());
    let store: Arc<dyn CacheStore> = Arc::new(CacheLayer::new(storage.clone()));
    let client = MyQuranClient::new(Dispatcher::new(transport, store, MOCK_BASE));
    let prefs = Preferences::new(storage.clone());
    (App::new(client, prefs), storage)
  }

  fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
  }

  fn command(app: &mut App<MockTransport>, line: &str) {
    app.handle_key(key(KeyCode::Char(':')));
    for c in line.chars() {
      app.handle_key(key(KeyCode::Char(c)));
    }
    app.handle_key(key(KeyCode::Enter));
  }

  async fn settle(app: &mut App<MockTransport>) {
    tokio::time::sleep(Duration::from_millis(20)).await;
    app.tick();
  }

  fn labels(app: &App<MockTransport>, section: Section) -> Vec<String> {
    app
      .panel(section)
      .visible_entries()
      .into_iter()
      .map(|e| e.label.clone())
      .collect()
  }

  const SURAHS: &str = r#"{"status":true,"data":[
    {"number":1,"name_latin":"Al-Fatihah"},
    {"number":2,"name_latin":"Al-Baqarah"},
    {"number":3,"name_latin":"Ali 'Imran"}
  ]}"#;

  #[test]
  fn test_section_navigation() {
    assert_eq!(Section::Sholat.next(), Section::Calendar);
    assert_eq!(Section::Perawi.next(), Section::Sholat);
    assert_eq!(Section::Sholat.prev(), Section::Perawi);
    assert_eq!(Section::from_digit('3'), Some(Section::Quran));
    assert_eq!(Section::from_digit('0'), None);
    assert_eq!(Section::from_digit('6'), None);
  }

  #[tokio::test]
  async fn test_tab_and_digit_keys_switch_sections() {
    let (mut app, _) = app(MockTransport::new());
    app.handle_key(key(KeyCode::Tab));
    assert_eq!(app.section(), Section::Calendar);
    app.handle_key(key(KeyCode::Char('5')));
    assert_eq!(app.section(), Section::Perawi);
    app.handle_key(key(KeyCode::BackTab));
    assert_eq!(app.section(), Section::Hadis);
  }

  #[tokio::test]
  async fn test_location_search_then_schedule() {
    let transport = MockTransport::new()
      .route(
        "/sholat/kabkota/cari/jakarta",
        200,
        r#"{"status":true,"data":[{"id":"1301","lokasi":"KOTA JAKARTA"}]}"#,
      )
      .route(
        "/sholat/jadwal/1301/today",
        200,
        r#"{"data":{"jadwal":{"2024-03-11":{"tanggal":"Senin, 11/03/2024","subuh":"04:38"}}}}"#,
      );
    let (mut app, _) = app(transport);

    command(&mut app, "sholat jakarta");
    assert!(matches!(app.panel(Section::Sholat).list.state(), QueryState::Loading));
    settle(&mut app).await;
    assert_eq!(labels(&app, Section::Sholat), vec!["KOTA JAKARTA"]);

    app.handle_key(key(KeyCode::Enter));
    settle(&mut app).await;

    assert_eq!(app.location_name(), Some("KOTA JAKARTA"));
    match app.panel(Section::Sholat).detail.data().map(|r| &r.data) {
      Some(Detail::Schedule { location, days }) => {
        assert_eq!(location, "KOTA JAKARTA");
        assert_eq!(days[0].subuh.as_deref(), Some("04:38"));
      }
      other => panic!("unexpected detail: {:?}", other),
    }
  }

  #[tokio::test]
  async fn test_schedule_requires_location() {
    let transport = MockTransport::new();
    let (mut app, _) = app(transport.clone());
    command(&mut app, "jadwal 2024-03");
    assert_eq!(
      app.status().map(|s| s.text.as_str()),
      Some("Select a location first (:sholat <keyword>)")
    );
    assert_eq!(transport.calls(), 0);
  }

  #[tokio::test]
  async fn test_usage_error_in_status_bar() {
    let (mut app, _) = app(MockTransport::new());
    command(&mut app, "surah");
    let status = app.status().unwrap();
    assert!(status.is_error);
    assert_eq!(status.text, "Usage: surah <number>");
  }

  #[tokio::test]
  async fn test_request_error_shown_in_pane() {
    let transport = MockTransport::new().route("/quran/999", 404, "Surah not found");
    let (mut app, _) = app(transport);

    command(&mut app, "surah 999");
    settle(&mut app).await;

    assert_eq!(app.panel(Section::Quran).detail.error(), Some("Surah not found"));
  }

  #[tokio::test]
  async fn test_newer_action_supersedes_older() {
    let transport = MockTransport::new()
      .route("/quran/1", 200, r#"{"data":{"number":1,"name_latin":"Al-Fatihah"}}"#)
      .route("/quran/2", 200, r#"{"data":{"number":2,"name_latin":"Al-Baqarah"}}"#);
    let (mut app, storage) = app(transport.clone());

    command(&mut app, "surah 1");
    command(&mut app, "surah 2");
    settle(&mut app).await;

    match app.panel(Section::Quran).detail.data().map(|r| &r.data) {
      Some(Detail::Surah(detail)) => assert_eq!(detail.name_latin.as_deref(), Some("Al-Baqarah")),
      other => panic!("unexpected detail: {:?}", other),
    }
    // The superseded request still completed and populated the cache
    assert_eq!(transport.calls(), 2);
    assert!(storage.get_item("sm-cache:GET:/quran/1").unwrap().is_some());
  }

  #[tokio::test]
  async fn test_repeated_list_served_from_cache() {
    let transport = MockTransport::new().route("/quran", 200, SURAHS);
    let (mut app, _) = app(transport.clone());

    command(&mut app, "quran");
    settle(&mut app).await;
    assert!(!app.panel(Section::Quran).list.data().unwrap().is_cached());

    command(&mut app, "quran");
    settle(&mut app).await;
    assert!(app.panel(Section::Quran).list.data().unwrap().is_cached());
    assert_eq!(transport.calls(), 1);
  }

  #[tokio::test]
  async fn test_live_filter_and_open() {
    let transport = MockTransport::new()
      .route("/quran", 200, SURAHS)
      .route("/quran/2", 200, r#"{"data":{"number":2,"name_latin":"Al-Baqarah"}}"#);
    let (mut app, _) = app(transport);

    command(&mut app, "quran");
    settle(&mut app).await;
    assert_eq!(labels(&app, Section::Quran).len(), 3);

    app.handle_key(key(KeyCode::Char('/')));
    assert_eq!(app.mode(), Mode::Filter);
    for c in "BAQ".chars() {
      app.handle_key(key(KeyCode::Char(c)));
    }
    assert_eq!(labels(&app, Section::Quran), vec!["2. Al-Baqarah"]);
    app.handle_key(key(KeyCode::Enter));
    assert_eq!(app.mode(), Mode::Normal);

    app.handle_key(key(KeyCode::Enter));
    settle(&mut app).await;
    assert!(matches!(
      app.panel(Section::Quran).detail.data().map(|r| &r.data),
      Some(Detail::Surah(_))
    ));

    app.handle_key(key(KeyCode::Esc));
    assert_eq!(labels(&app, Section::Quran).len(), 3);
  }

  #[tokio::test]
  async fn test_next_and_prev_hadis() {
    let transport = MockTransport::new()
      .route("/hadis/enc/show/5", 200, r#"{"data":{"id":5,"text":{"ar":"a","id":"b"}}}"#)
      .route("/hadis/enc/next/5", 200, r#"{"data":{"id":6,"text":"c"}}"#)
      .route("/hadis/enc/prev/6", 200, r#"{"data":{"id":5,"text":"d"}}"#);
    let (mut app, _) = app(transport.clone());

    command(&mut app, "hadis 5");
    settle(&mut app).await;
    app.handle_key(key(KeyCode::Char('n')));
    settle(&mut app).await;
    assert_eq!(app.hadis_id.as_deref(), Some("6"));

    app.handle_key(key(KeyCode::Char('p')));
    settle(&mut app).await;
    assert_eq!(app.hadis_id.as_deref(), Some("5"));

    let urls: Vec<String> = transport.requests().into_iter().map(|r| r.url).collect();
    assert_eq!(urls[1], format!("{}/hadis/enc/next/5", MOCK_BASE));
  }

  #[tokio::test]
  async fn test_hadis_position_survives_loading_and_failure() {
    let transport = MockTransport::new()
      .route("/hadis/enc/show/5", 200, r#"{"data":{"id":5,"text":"a"}}"#)
      .route("/hadis/enc/next/5", 500, "Server error")
      .route("/hadis/enc/prev/5", 200, r#"{"data":{"id":4,"text":"b"}}"#)
      .route("/hadis/enc/show/7", 200, r#"{"data":{"id":7,"text":"c"}}"#)
      .route("/hadis/enc/next/7", 200, r#"{"data":{"id":8,"text":"d"}}"#);
    let (mut app, _) = app(transport.clone());

    command(&mut app, "hadis 5");
    settle(&mut app).await;
    app.handle_key(key(KeyCode::Char('n')));
    settle(&mut app).await;
    assert_eq!(app.panel(Section::Hadis).detail.error(), Some("Server error"));
    assert_eq!(app.hadis_id.as_deref(), Some("5"));

    app.handle_key(key(KeyCode::Char('p')));
    settle(&mut app).await;
    assert_eq!(app.hadis_id.as_deref(), Some("4"));

    // `n` right after opening, before the detail has arrived
    command(&mut app, "hadis 7");
    app.handle_key(key(KeyCode::Char('n')));
    settle(&mut app).await;
    assert_eq!(app.hadis_id.as_deref(), Some("8"));

    let urls: Vec<String> = transport.requests().into_iter().map(|r| r.url).collect();
    assert_eq!(urls.last(), Some(&format!("{}/hadis/enc/next/7", MOCK_BASE)));
  }

  #[tokio::test]
  async fn test_next_without_hadis_is_error() {
    let (mut app, _) = app(MockTransport::new());
    command(&mut app, "next");
    assert!(app.status().unwrap().is_error);
  }

  #[tokio::test]
  async fn test_random_hadis_always_hits_network() {
    let transport =
      MockTransport::new().route("/hadis/enc/random", 200, r#"{"data":{"id":9,"text":"x"}}"#);
    let (mut app, _) = app(transport.clone());

    command(&mut app, "random");
    settle(&mut app).await;
    command(&mut app, "random");
    settle(&mut app).await;

    assert_eq!(transport.calls(), 2);
    assert_eq!(app.hadis_id.as_deref(), Some("9"));
  }

  #[tokio::test]
  async fn test_calendar_conversion() {
    let transport = MockTransport::new().route(
      "/cal/ce/2024-03-11",
      200,
      r#"{"data":{"hijr":{"today":"1 Ramadhan 1445 H"},"ce":{"today":"Senin, 11 Maret 2024"}}}"#,
    );
    let (mut app, _) = app(transport);

    command(&mut app, "ce 2024-03-11");
    assert_eq!(app.section(), Section::Calendar);
    settle(&mut app).await;

    match app.panel(Section::Calendar).detail.data().map(|r| &r.data) {
      Some(Detail::Calendar {
        day,
        gregorian_first,
      }) => {
        assert!(*gregorian_first);
        assert_eq!(day.hijri_text(), Some("1 Ramadhan 1445 H"));
      }
      other => panic!("unexpected detail: {:?}", other),
    }
  }

  #[tokio::test]
  async fn test_night_toggle_persists() {
    let (mut app, storage) = app(MockTransport::new());
    assert!(!app.night());

    app.handle_key(KeyEvent::new(KeyCode::Char('N'), KeyModifiers::SHIFT));
    assert!(app.night());
    assert_eq!(storage.get_item(NIGHT_READING_KEY).unwrap(), Some("1".to_string()));

    command(&mut app, "night");
    assert!(!app.night());
    assert_eq!(storage.get_item(NIGHT_READING_KEY).unwrap(), Some("0".to_string()));
  }

  #[tokio::test]
  async fn test_night_preference_loaded_on_start() {
    let storage = Arc::new(MemoryStorage::new());
    storage.set_item(NIGHT_READING_KEY, "1").unwrap();
    let store: Arc<dyn CacheStore> = Arc::new(CacheLayer::new(storage.clone()));
    let client = MyQuranClient::new(Dispatcher::new(MockTransport::new(), store, MOCK_BASE));
    let app = App::new(client, Preferences::new(storage));

    assert!(app.night());
    assert_eq!(app.theme(), Theme::NIGHT);
  }

  #[tokio::test]
  async fn test_reading_toggle_and_quit() {
    let (mut app, _) = app(MockTransport::new());
    app.handle_key(key(KeyCode::Char('r')));
    assert!(app.reading());
    command(&mut app, "quit");
    assert!(app.should_quit());
  }

  #[tokio::test]
  async fn test_browse_perawi_and_open() {
    let transport = MockTransport::new()
      .route(
        "/hadist/perawi/browse?page=2&limit=5",
        200,
        r#"{"data":{"rawi":[{"id":12,"name":"Abu Hurairah"}]}}"#,
      )
      .route("/hadist/perawi/id/12", 200, r#"{"data":{"id":12,"name":"Abu Hurairah"}}"#);
    let (mut app, _) = app(transport);

    command(&mut app, "browse 2 5");
    settle(&mut app).await;
    assert_eq!(labels(&app, Section::Perawi), vec!["12 - Abu Hurairah"]);

    app.handle_key(key(KeyCode::Enter));
    settle(&mut app).await;
    assert!(matches!(
      app.panel(Section::Perawi).detail.data().map(|r| &r.data),
      Some(Detail::Perawi(_))
    ));
  }
}
