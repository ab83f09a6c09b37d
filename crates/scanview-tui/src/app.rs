//! Top-level application state and the main event loop.
//!
//! [`App::run`] sets up the terminal, drives the crossterm event loop, and
//! tears everything down cleanly on exit or panic.
//!
//! Fetches run on the tokio runtime. Reload triggers (startup, timer,
//! manual) and fetch results come back over unbounded channels that are
//! drained once per frame, so every state mutation happens on this thread.

use crate::{
    event::{self, AppEvent},
    surface::TableSurface,
    theme::Theme,
    widgets::{
        confirm::ConfirmPopup,
        filter_bar::{DateField, EditOutcome, FilterBar, FilterBarState},
        help::HelpPopup,
        results_table::ResultsTable,
        status_bar::{Counts, StatusBar, StatusKind, StatusLine},
    },
};
use crossterm::{
    event::{self as ct_event, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout},
    Frame, Terminal,
};
use scanview_core::{
    config::SourcesConfig,
    error::StoreError,
    kv::KeyValueStore,
    prefs::ThemePreference,
    resolver::{self, HostingContext},
    seen::SeenStore,
    view::{SurfaceEvent, SurfaceOptions, ViewBinder},
    CycleOutcome, CycleTicket, FilterState, LoadError, Session, SeenVisibility, Trigger,
};
use scanview_feeds::{FetchCoordinator, FetchProgress, HttpTransport, Loaded, RefreshScheduler};
use std::{io, sync::Arc, time::Duration};
use tokio::{runtime::Handle, sync::mpsc};

const RESET_QUESTION: &str = "Reset all seen marks?";

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

pub struct AppState {
    pub session: Session,
    pub view: ViewBinder<TableSurface>,
    pub status: StatusLine,
    pub filters: FilterBarState,
    pub theme: Theme,
    kv: Arc<dyn KeyValueStore>,
    pub show_help: bool,
    pub confirm_reset: bool,
    /// Set by the reload key; the loop turns it into a manual cycle.
    pub reload_requested: bool,
    pub quit: bool,
}

impl AppState {
    pub fn new(kv: Arc<dyn KeyValueStore>, options: SurfaceOptions) -> Self {
        let session = Session::new(SeenStore::open(kv.clone()));
        let theme = Theme::for_preference(ThemePreference::load(kv.as_ref()));
        let status = StatusLine::default();
        let view = ViewBinder::new(Some(TableSurface::new()), Some(Box::new(status.clone())), options);
        Self {
            session,
            view,
            status,
            filters: FilterBarState::default(),
            theme,
            kv,
            show_help: false,
            confirm_reset: false,
            reload_requested: false,
            quit: false,
        }
    }

    // -- load cycles --------------------------------------------------------

    pub fn begin_cycle(&mut self, trigger: Trigger) -> CycleTicket {
        let ticket = self.session.begin_cycle(trigger);
        self.view.loading();
        ticket
    }

    /// Progress from the fetch belonging to `generation`. Older cycles are
    /// ignored.
    pub fn on_progress(&mut self, generation: u64, progress: FetchProgress) {
        if generation != self.session.generation() {
            return;
        }
        match progress {
            FetchProgress::Trying(location) => self.view.report(&format!("Trying: {location}")),
            FetchProgress::Failed(err) => tracing::debug!(error = %err, "candidate failed"),
            FetchProgress::Loaded(_) => {}
        }
    }

    pub fn finish_cycle(&mut self, ticket: CycleTicket, result: Result<Loaded, LoadError>) -> CycleOutcome {
        let outcome = self.session.complete_cycle(ticket, result.map(|l| l.fetched));
        self.view.cycle_finished(&self.session, &outcome);
        match &outcome {
            CycleOutcome::Rendered { .. } => self.sync_keyword_options(),
            CycleOutcome::Failed(err) => tracing::warn!(error = %err, "load cycle failed"),
            CycleOutcome::Stale { .. } => {}
        }
        outcome
    }

    /// Refresh the selector after a reload. An applied keyword that no
    /// longer occurs in the data is dropped from the session filter too, so
    /// the bar never shows "all" over a table filtered by a stale token.
    fn sync_keyword_options(&mut self) {
        let options = self.session.keyword_options();
        let applied = self.session.filter().keyword.clone();
        if !applied.is_empty() && !options.contains(&applied) {
            tracing::debug!(keyword = %applied, "applied keyword gone after reload");
            let filter = FilterState { keyword: String::new(), ..self.session.filter().clone() };
            self.session.set_filter(filter);
            self.view.render(&self.session);
        }
        self.filters.set_options(options);
    }

    pub fn counts(&self) -> Counts {
        Counts {
            shown: self.view.surface().map_or(0, TableSurface::row_count),
            total: self.session.records().len(),
            seen: self.session.seen().len(),
        }
    }

    fn surface_event(&mut self, event: SurfaceEvent) {
        if let Err(e) = self.view.handle_event(&mut self.session, event) {
            self.store_failed(e);
        }
    }

    fn store_failed(&self, e: StoreError) {
        tracing::warn!(error = %e, "could not persist");
        self.status.set(StatusKind::Error, format!("Could not save: {e}"));
    }

    fn apply_filters(&mut self) {
        match self.filters.to_filter() {
            Ok(filter) => {
                self.session.set_filter(filter);
                self.view.render(&self.session);
            }
            Err(e) => self.status.set(StatusKind::Error, e.to_string()),
        }
    }

    // -- input --------------------------------------------------------------

    pub fn handle(&mut self, event: AppEvent) {
        // Help popup intercepts all events; only close keys pass through.
        if self.show_help {
            if matches!(event, AppEvent::Help | AppEvent::Escape | AppEvent::Quit) {
                tracing::debug!("help popup closed");
                self.show_help = false;
            }
            return;
        }

        if self.confirm_reset {
            self.confirm_reset = false;
            if event == AppEvent::Char('y') {
                tracing::debug!("seen reset confirmed");
                self.surface_event(SurfaceEvent::ResetSeenConfirmed);
            } else {
                self.status.set(StatusKind::Info, "Reset cancelled.");
            }
            return;
        }

        if self.filters.editing.is_some() {
            if event == AppEvent::Quit {
                self.quit = true;
                return;
            }
            if self.filters.handle_edit(&event) == EditOutcome::Commit {
                self.apply_filters();
            }
            return;
        }

        match event {
            AppEvent::Quit => {
                tracing::debug!("quit");
                self.quit = true;
            }
            AppEvent::Help => {
                tracing::debug!("help popup opened");
                self.show_help = true;
            }
            AppEvent::Up => self.with_surface(TableSurface::cursor_up),
            AppEvent::Down => self.with_surface(TableSurface::cursor_down),
            AppEvent::PrevPage => self.with_surface(TableSurface::prev_page),
            AppEvent::NextPage => self.with_surface(TableSurface::next_page),
            AppEvent::CycleSort => self.with_surface(TableSurface::cycle_sort),
            AppEvent::FlipSort => self.with_surface(TableSurface::flip_sort),

            AppEvent::ToggleSeen => {
                let selected = self
                    .view
                    .surface()
                    .and_then(TableSurface::selected)
                    .map(|r| (r.record.message_id.clone(), r.seen));
                if let Some((message_id, seen)) = selected {
                    self.surface_event(SurfaceEvent::SeenToggled { message_id, checked: !seen });
                }
            }
            AppEvent::MarkPageSeen => {
                let ids = self.view.surface().map(TableSurface::page_ids).unwrap_or_default();
                if !ids.is_empty() {
                    self.surface_event(SurfaceEvent::PageSeen(ids));
                }
            }
            AppEvent::ToggleHideSeen => self.surface_event(SurfaceEvent::ToggleHideSeen),
            AppEvent::ResetSeen => {
                tracing::debug!("asking to confirm seen reset");
                self.confirm_reset = true;
            }

            AppEvent::NextKeyword => self.filters.next_keyword(),
            AppEvent::PrevKeyword => self.filters.prev_keyword(),
            AppEvent::EditDateFrom => self.filters.start_edit(DateField::From),
            AppEvent::EditDateTo => self.filters.start_edit(DateField::To),
            AppEvent::Enter => self.apply_filters(),
            AppEvent::ResetFilters => {
                self.filters.reset();
                self.session.reset_filter();
                self.view.render(&self.session);
            }

            AppEvent::Reload => {
                tracing::debug!("manual reload requested");
                self.reload_requested = true;
            }
            AppEvent::ToggleTheme => {
                let pref = self.theme.preference.toggled();
                self.theme = Theme::for_preference(pref);
                if let Err(e) = pref.save(self.kv.as_ref()) {
                    self.store_failed(e);
                }
            }
            AppEvent::ShowUrl => {
                let url = self.view.surface().and_then(TableSurface::selected).map(|r| r.record.url.clone());
                match url {
                    Some(url) if !url.is_empty() => self.status.set(StatusKind::Info, url),
                    _ => self.status.set(StatusKind::Info, "No URL for this row."),
                }
            }

            _ => {}
        }
    }

    fn with_surface(&mut self, f: impl FnOnce(&mut TableSurface)) {
        if let Some(surface) = self.view.surface_mut() {
            f(surface);
        }
    }
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

enum LoadMsg {
    Progress { generation: u64, progress: FetchProgress },
    Done { ticket: CycleTicket, result: Result<Loaded, LoadError> },
}

pub struct App {
    state: AppState,
    runtime: Handle,
    fetcher: Arc<FetchCoordinator<HttpTransport>>,
    hosting: HostingContext,
    sources: SourcesConfig,
    scheduler: RefreshScheduler,
    interval: Duration,
    trigger_tx: mpsc::UnboundedSender<Trigger>,
    trigger_rx: mpsc::UnboundedReceiver<Trigger>,
    load_tx: mpsc::UnboundedSender<LoadMsg>,
    load_rx: mpsc::UnboundedReceiver<LoadMsg>,
}

impl App {
    pub fn new(
        state: AppState,
        runtime: Handle,
        transport: HttpTransport,
        sources: SourcesConfig,
        interval: Duration,
    ) -> Self {
        let hosting = transport.base().hosting_context();
        let (trigger_tx, trigger_rx) = mpsc::unbounded_channel();
        let (load_tx, load_rx) = mpsc::unbounded_channel();
        Self {
            state,
            scheduler: RefreshScheduler::new(runtime.clone()),
            runtime,
            fetcher: Arc::new(FetchCoordinator::new(transport)),
            hosting,
            sources,
            interval,
            trigger_tx,
            trigger_rx,
            load_tx,
            load_rx,
        }
    }

    /// Set up the terminal, run the event loop, and restore the terminal on exit.
    pub fn run(mut self) -> anyhow::Result<()> {
        install_panic_hook();

        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(io::stdout());
        let mut terminal = Terminal::new(backend)?;

        let _ = self.trigger_tx.send(Trigger::Startup);
        let timer_tx = self.trigger_tx.clone();
        self.scheduler.start(self.interval, move || {
            let _ = timer_tx.send(Trigger::Timer);
        });

        let result = self.event_loop(&mut terminal);

        self.scheduler.stop();
        // Always restore terminal, even if the loop returned an error
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        let _ = terminal.show_cursor();

        result
    }

    fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        loop {
            self.pump();

            {
                let s = &self.state;
                terminal.draw(|frame| draw(frame, s))?;
            }

            if self.state.quit {
                break;
            }

            if ct_event::poll(Duration::from_millis(16))? {
                match ct_event::read()? {
                    Event::Key(key) if key.kind == crossterm::event::KeyEventKind::Press => {
                        let raw = Event::Key(key);
                        let app_event = if self.state.filters.editing.is_some() {
                            event::to_app_event_insert(raw)
                        } else {
                            event::to_app_event(raw)
                        };
                        if let Some(ev) = app_event {
                            tracing::debug!(event = ?ev, "key event");
                            self.state.handle(ev);
                        }
                    }
                    other => {
                        if let Some(ev) = event::to_app_event(other) {
                            self.state.handle(ev);
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Drain pending triggers and fetch results.
    fn pump(&mut self) {
        while let Ok(trigger) = self.trigger_rx.try_recv() {
            self.spawn_cycle(trigger);
        }
        if std::mem::take(&mut self.state.reload_requested) {
            self.spawn_cycle(Trigger::Manual);
        }
        while let Ok(msg) = self.load_rx.try_recv() {
            match msg {
                LoadMsg::Progress { generation, progress } => self.state.on_progress(generation, progress),
                LoadMsg::Done { ticket, result } => {
                    self.state.finish_cycle(ticket, result);
                }
            }
        }
    }

    fn spawn_cycle(&mut self, trigger: Trigger) {
        let ticket = self.state.begin_cycle(trigger);
        let candidates = resolver::resolve(&self.hosting, &self.sources);
        let fetcher = self.fetcher.clone();
        let tx = self.load_tx.clone();
        self.runtime.spawn(async move {
            let progress_tx = tx.clone();
            let result = fetcher
                .load_from_with(&candidates, move |progress| {
                    let _ = progress_tx.send(LoadMsg::Progress { generation: ticket.generation, progress });
                })
                .await;
            let _ = tx.send(LoadMsg::Done { ticket, result });
        });
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn draw(frame: &mut Frame, state: &AppState) {
    let area = frame.area();

    // Vertical: 1-line status | table | 3-line filter bar
    let [status_area, table_area, filter_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(3),
    ])
    .areas(area);

    frame.render_widget(
        StatusBar::new(&state.status, state.session.state(), state.counts(), &state.theme),
        status_area,
    );
    if let Some(surface) = state.view.surface() {
        frame.render_widget(ResultsTable::new(surface, &state.theme), table_area);
    }
    let hide_seen = state.session.visibility() == SeenVisibility::HideSeen;
    let filter_bar = FilterBar::new(&state.filters, hide_seen, &state.theme);
    if let Some(pos) = filter_bar.cursor_position(filter_area) {
        frame.set_cursor_position(pos);
    }
    frame.render_widget(filter_bar, filter_area);

    if state.confirm_reset {
        frame.render_widget(ConfirmPopup::new(RESET_QUESTION, &state.theme), area);
    }
    if state.show_help {
        frame.render_widget(HelpPopup::new(&state.theme), area);
    }
}

// ---------------------------------------------------------------------------
// Terminal helpers
// ---------------------------------------------------------------------------

fn install_panic_hook() {
    let original = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original(info);
    }));
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
