// App state and main event loop.
// Manages tabs, selector panes, background renders, and keyboard input handling.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::prelude::*;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, error, info};

use crate::data::CensusSource;
use crate::reference::{GeoOption, state_fips_codes, tribal_area_names};
use crate::report::{Report, Reports, SectionBody};
use crate::state::{ConsoleState, RenderRequest, ReportBinder, Selector};
use crate::ui;

/// Rows moved by PgUp/PgDn in a report table.
const PAGE_ROWS: isize = 10;

/// Active tab in the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    States,
    TribalAreas,
    Console,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::States, Tab::TribalAreas, Tab::Console];

    pub fn title(&self) -> &'static str {
        match self {
            Tab::States => "States",
            Tab::TribalAreas => "Tribal Areas",
            Tab::Console => "Console",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            Tab::States => Tab::TribalAreas,
            Tab::TribalAreas => Tab::Console,
            Tab::Console => Tab::States,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            Tab::States => Tab::Console,
            Tab::TribalAreas => Tab::States,
            Tab::Console => Tab::TribalAreas,
        }
    }
}

/// Whether keys go to the selector filter or to navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    Filter,
}

/// A selector and the report bound to it.
#[derive(Debug)]
pub struct Pane {
    pub selector: Selector,
    pub binder: ReportBinder,
}

impl Pane {
    fn new(options: Vec<GeoOption>) -> Self {
        Self {
            selector: Selector::new(options),
            binder: ReportBinder::new(),
        }
    }

    /// Bind the selector's current key, returning a render if it changed.
    fn bind(&mut self) -> Option<RenderRequest> {
        let key = self.selector.selected_item()?.key.clone();
        self.binder.select(&key)
    }
}

/// A finished background render.
#[derive(Debug)]
pub struct RenderOutcome {
    pub tab: Tab,
    pub generation: u64,
    pub key: String,
    pub result: Result<Report, String>,
}

/// Main application state.
pub struct App<S> {
    /// Currently active tab.
    pub active_tab: Tab,
    pub states: Pane,
    pub tribes: Pane,
    pub console: ConsoleState,
    pub input_mode: InputMode,
    pub show_help: bool,
    /// Whether the app should exit.
    pub should_quit: bool,
    reports: Arc<Reports<S>>,
    render_tx: UnboundedSender<RenderOutcome>,
    render_rx: UnboundedReceiver<RenderOutcome>,
}

impl<S: CensusSource> App<S> {
    pub fn new(reports: Reports<S>) -> Self {
        let (render_tx, render_rx) = mpsc::unbounded_channel();
        Self {
            active_tab: Tab::default(),
            states: Pane::new(state_fips_codes()),
            tribes: Pane::new(tribal_area_names()),
            console: ConsoleState::new(),
            input_mode: InputMode::default(),
            show_help: false,
            should_quit: false,
            reports: Arc::new(reports),
            render_tx,
            render_rx,
        }
    }

    pub fn reports(&self) -> &Reports<S> {
        &self.reports
    }

    /// Pane behind the active tab, if it has one.
    pub fn pane(&self) -> Option<&Pane> {
        match self.active_tab {
            Tab::States => Some(&self.states),
            Tab::TribalAreas => Some(&self.tribes),
            Tab::Console => None,
        }
    }

    fn pane_mut(&mut self) -> Option<&mut Pane> {
        match self.active_tab {
            Tab::States => Some(&mut self.states),
            Tab::TribalAreas => Some(&mut self.tribes),
            Tab::Console => None,
        }
    }

    /// Render the first option of both selectors.
    pub fn start(&mut self) {
        self.console.log_info(format!(
            "Census {} ready: {} states, {} tribal areas",
            self.reports.dataset().vintage(),
            self.states.selector.total_len(),
            self.tribes.selector.total_len()
        ));
        if let Some(request) = self.states.bind() {
            self.spawn_render(Tab::States, request);
        }
        if let Some(request) = self.tribes.bind() {
            self.spawn_render(Tab::TribalAreas, request);
        }
    }

    /// Main event loop.
    pub fn run(&mut self, terminal: &mut Terminal<impl Backend>) -> io::Result<()> {
        self.start();
        while !self.should_quit {
            self.drain_renders();
            terminal.draw(|frame| ui::draw(frame, self))?;
            self.handle_events()?;
        }
        info!("exiting");
        Ok(())
    }

    #[allow(clippy::collapsible_if)]
    fn handle_events(&mut self) -> io::Result<()> {
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key(key);
                }
            }
        }
        Ok(())
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        if self.show_help {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?')) {
                self.show_help = false;
            }
            return;
        }

        match self.input_mode {
            InputMode::Filter => self.handle_filter_key(key.code),
            InputMode::Normal => self.handle_normal_key(key.code),
        }
    }

    fn handle_normal_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Tab => self.switch_tab(self.active_tab.next()),
            KeyCode::BackTab => self.switch_tab(self.active_tab.prev()),
            _ if self.active_tab == Tab::Console => match code {
                KeyCode::Up | KeyCode::Char('k') => self.console.select_prev(),
                KeyCode::Down | KeyCode::Char('j') => self.console.select_next(),
                _ => {}
            },
            KeyCode::Up | KeyCode::Char('k') => {
                if let Some(pane) = self.pane_mut() {
                    pane.selector.select_prev();
                }
                self.rebind();
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if let Some(pane) = self.pane_mut() {
                    pane.selector.select_next();
                }
                self.rebind();
            }
            KeyCode::Char('/') => self.input_mode = InputMode::Filter,
            KeyCode::Esc => {
                if let Some(pane) = self.pane_mut() {
                    pane.selector.clear_filter();
                }
                self.rebind();
            }
            KeyCode::Char('r') => self.refresh(),
            code => {
                if let Some(pane) = self.pane_mut() {
                    let binder = &mut pane.binder;
                    match code {
                        KeyCode::Char('n') => binder.next_section(),
                        KeyCode::Char('N') => binder.prev_section(),
                        KeyCode::Left | KeyCode::Char('h') => binder.scroll_columns(-1),
                        KeyCode::Right | KeyCode::Char('l') => binder.scroll_columns(1),
                        KeyCode::PageUp => binder.scroll_rows(-PAGE_ROWS),
                        KeyCode::PageDown => binder.scroll_rows(PAGE_ROWS),
                        KeyCode::Home => binder.scroll_rows_to_start(),
                        KeyCode::End => binder.scroll_rows_to_end(),
                        _ => {}
                    }
                }
            }
        }
    }

    fn handle_filter_key(&mut self, code: KeyCode) {
        let Some(pane) = self.pane_mut() else {
            self.input_mode = InputMode::Normal;
            return;
        };
        match code {
            KeyCode::Enter => self.input_mode = InputMode::Normal,
            KeyCode::Esc => {
                pane.selector.clear_filter();
                self.input_mode = InputMode::Normal;
            }
            KeyCode::Backspace => pane.selector.pop_filter_char(),
            KeyCode::Char(c) => pane.selector.push_filter_char(c),
            KeyCode::Up => pane.selector.select_prev(),
            KeyCode::Down => pane.selector.select_next(),
            _ => return,
        }
        self.rebind();
    }

    fn switch_tab(&mut self, tab: Tab) {
        self.active_tab = tab;
        if tab == Tab::Console {
            self.console.mark_read();
        }
    }

    /// Start a render if the active selector moved to a new key.
    fn rebind(&mut self) {
        let tab = self.active_tab;
        if let Some(request) = self.pane_mut().and_then(Pane::bind) {
            self.spawn_render(tab, request);
        }
    }

    fn refresh(&mut self) {
        let tab = self.active_tab;
        if let Some(request) = self.pane_mut().and_then(|pane| pane.binder.refresh()) {
            self.console.log_info(format!("Refreshing {}", request.key));
            self.spawn_render(tab, request);
        }
    }

    fn spawn_render(&self, tab: Tab, request: RenderRequest) {
        debug!(tab = tab.title(), key = %request.key, generation = request.generation, "render started");
        let reports = Arc::clone(&self.reports);
        let tx = self.render_tx.clone();

        tokio::spawn(async move {
            let result = match tab {
                Tab::States => reports.state_report(&request.key).await,
                Tab::TribalAreas => reports.tribal_report(&request.key).await,
                Tab::Console => return,
            };
            let outcome = RenderOutcome {
                tab,
                generation: request.generation,
                key: request.key,
                result: result.map_err(|e| e.to_string()),
            };
            // The receiver only goes away on shutdown.
            let _ = tx.send(outcome);
        });
    }

    /// Apply every finished render without blocking.
    pub fn drain_renders(&mut self) {
        while let Ok(outcome) = self.render_rx.try_recv() {
            self.apply_render(outcome);
        }
    }

    fn apply_render(&mut self, outcome: RenderOutcome) {
        let summary = match &outcome.result {
            Ok(report) => Ok((report.title.clone(), unavailable_sections(report))),
            Err(e) => Err(e.clone()),
        };

        let binder = match outcome.tab {
            Tab::States => &mut self.states.binder,
            Tab::TribalAreas => &mut self.tribes.binder,
            Tab::Console => return,
        };
        if !binder.complete(outcome.generation, outcome.result) {
            debug!(key = %outcome.key, generation = outcome.generation, "dropped stale render");
            return;
        }

        match summary {
            Ok((title, unavailable)) => {
                self.console.log_info(format!("Rendered {}", title));
                for message in unavailable {
                    self.console.log_warn(message);
                }
            }
            Err(e) => {
                error!(key = %outcome.key, error = %e, "render failed");
                self.console
                    .log_error(format!("Failed to render {}: {}", outcome.key, e));
            }
        }
    }
}

fn unavailable_sections(report: &Report) -> Vec<String> {
    report
        .sections
        .iter()
        .filter_map(|section| match &section.body {
            SectionBody::Unavailable(message) => Some(message.clone()),
            SectionBody::Table(_) => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::census::{Geography, TableRequest, VariableGroup};
    use crate::data::Dataset;
    use crate::data::dataset::fake::{FakeSource, raw_table};
    use crate::state::{ConsoleLevel, LoadingState};

    fn press(app: &mut App<FakeSource>, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn tribal_source() -> FakeSource {
        let geo = Geography::TribalArea.api_name();
        let lang_codes = VariableGroup::Language.codes();
        let lang_row: Vec<&str> = std::iter::once("100")
            .chain(std::iter::repeat_n("1", lang_codes.len() - 1))
            .collect();
        FakeSource::default()
            .with(
                TableRequest::new(Geography::TribalArea, &[VariableGroup::TotalPopulation]),
                raw_table(
                    &VariableGroup::TotalPopulation.codes(),
                    &[geo],
                    &[("Acoma Pueblo and Off-Reservation Trust Land, NM", vec!["3000"], vec!["0010"])],
                ),
            )
            .with(
                TableRequest::new(Geography::TribalArea, &[VariableGroup::Language]),
                raw_table(
                    &lang_codes,
                    &[geo],
                    &[("Acoma Pueblo and Off-Reservation Trust Land, NM", lang_row, vec!["0010"])],
                ),
            )
    }

    fn app() -> App<FakeSource> {
        let dataset = Dataset::new(tribal_source(), "acs5", 2019);
        App::new(Reports::new(dataset, "missing-wic.csv".into(), 0.01))
    }

    async fn next_render(app: &mut App<FakeSource>) {
        let outcome = app.render_rx.recv().await.unwrap();
        app.apply_render(outcome);
    }

    #[test]
    fn test_tab_cycle() {
        let mut tab = Tab::States;
        for _ in 0..3 {
            tab = tab.next();
        }
        assert_eq!(tab, Tab::States);
        assert_eq!(Tab::States.prev(), Tab::Console);
    }

    #[tokio::test]
    async fn test_start_binds_both_panes() {
        let mut app = app();
        app.start();
        assert_eq!(app.states.binder.current_key(), Some("01"));
        assert!(app.tribes.binder.current_key().is_some());

        next_render(&mut app).await;
        next_render(&mut app).await;

        // No census tables for states in the fake: the render fails in place.
        assert!(matches!(app.states.binder.report, LoadingState::Error(_)));
        let tribal = app.tribes.binder.report.data().unwrap();
        assert_eq!(tribal.sections[0].anchor, "tribal");
        assert_eq!(app.console.unread_errors, 1);
    }

    #[tokio::test]
    async fn test_selection_change_rerenders() {
        let mut app = app();
        app.start();
        next_render(&mut app).await;
        next_render(&mut app).await;

        press(&mut app, KeyCode::Char('j'));
        assert_eq!(app.states.binder.current_key(), Some("02"));
        assert!(app.states.binder.report.is_loading());

        // Scrolling keys do not touch the selection.
        press(&mut app, KeyCode::Char('l'));
        press(&mut app, KeyCode::PageDown);
        assert_eq!(app.states.binder.current_key(), Some("02"));
    }

    #[tokio::test]
    async fn test_filter_mode() {
        let mut app = app();
        app.active_tab = Tab::TribalAreas;
        app.start();

        press(&mut app, KeyCode::Char('/'));
        assert_eq!(app.input_mode, InputMode::Filter);
        for c in "acomaq".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        // 'q' while filtering is text, not quit.
        assert!(!app.should_quit);
        assert_eq!(app.tribes.selector.visible_len(), 0);
        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.tribes.selector.filter, "acoma");
        assert_eq!(
            app.tribes.binder.current_key(),
            Some("Acoma Pueblo and Off-Reservation Trust Land, NM")
        );

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.tribes.selector.filter, "acoma");

        press(&mut app, KeyCode::Esc);
        assert!(app.tribes.selector.filter.is_empty());
    }

    #[tokio::test]
    async fn test_stale_render_is_dropped() {
        let mut app = app();
        app.start();
        press(&mut app, KeyCode::Char('j'));

        for _ in 0..3 {
            next_render(&mut app).await;
        }
        assert_eq!(app.states.binder.current_key(), Some("02"));
        let errors = app
            .console
            .messages
            .iter()
            .filter(|m| m.level == ConsoleLevel::Error)
            .count();
        // Alabama's render was superseded by Alaska's.
        assert_eq!(errors, 1);
        assert!(app.console.messages.last().is_some());
    }

    #[tokio::test]
    async fn test_help_and_quit() {
        let mut app = app();
        press(&mut app, KeyCode::Char('?'));
        assert!(app.show_help);
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.should_quit);
        press(&mut app, KeyCode::Esc);
        assert!(!app.show_help);

        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.active_tab, Tab::Console);
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }
}
