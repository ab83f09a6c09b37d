//! View binder: the boundary between the session and a rendering surface.
//!
//! The surface (a paginated, sortable table) is an external collaborator
//! reached only through [`RenderSurface`]. The binder:
//!
//! - builds the fixed column list (five canonical fields plus a synthetic
//!   `seen` checkbox column) independently of the source schema,
//! - decorates each row by looking up the seen store at render time,
//! - replaces the surface content wholesale on every render,
//! - turns surface events back into session mutations and re-renders.
//!
//! Status messages go to an optional [`StatusSink`]. When no sink is wired
//! the surface shows them instead; when neither exists rendering is a no-op.

use crate::config::UiConfig;
use crate::error::StoreError;
use crate::session::{CycleOutcome, Session};
use crate::types::Record;

/// Id of the synthetic checkbox column.
pub const SEEN_COLUMN: &str = "seen";

/// What one cell should display, independent of how the surface draws it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellContent {
    Text(String),
    Link { href: String, label: String },
    Chips(Vec<String>),
    Checkbox(bool),
}

impl CellContent {
    /// Plain-text rendering, used for sorting and headless output.
    pub fn plain(&self) -> String {
        match self {
            CellContent::Text(s) => s.clone(),
            CellContent::Link { href, .. } => href.clone(),
            CellContent::Chips(tokens) => tokens.join("|"),
            CellContent::Checkbox(true) => "x".to_string(),
            CellContent::Checkbox(false) => String::new(),
        }
    }
}

/// Per-cell formatter: receives the raw cell value and the full row.
pub type CellFormatter = fn(&str, &BoundRow) -> CellContent;

#[derive(Clone)]
pub struct ColumnDef {
    pub id: &'static str,
    pub name: &'static str,
    pub formatter: Option<CellFormatter>,
}

impl std::fmt::Debug for ColumnDef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ColumnDef")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("formatter", &self.formatter.is_some())
            .finish()
    }
}

impl ColumnDef {
    /// Resolve this column's cell for `row`.
    pub fn cell(&self, row: &BoundRow) -> CellContent {
        let raw = if self.id == SEEN_COLUMN { "" } else { row.record.field(self.id) };
        match self.formatter {
            Some(f) => f(raw, row),
            None => CellContent::Text(raw.to_string()),
        }
    }
}

/// A record plus its render-time decoration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundRow {
    pub record: Record,
    /// Checkbox state and dimmed styling.
    pub seen: bool,
}

/// Display options handed to the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceOptions {
    pub page_size: usize,
    pub sortable: bool,
    pub search_enabled: bool,
}

impl From<&UiConfig> for SurfaceOptions {
    fn from(ui: &UiConfig) -> Self {
        Self { page_size: ui.page_size.max(1), sortable: ui.sortable, search_enabled: ui.search_enabled }
    }
}

impl Default for SurfaceOptions {
    fn default() -> Self {
        Self::from(&UiConfig::default())
    }
}

/// Everything needed to construct a fresh table instance.
#[derive(Debug, Clone)]
pub struct TableSpec {
    pub columns: Vec<ColumnDef>,
    pub rows: Vec<BoundRow>,
    pub options: SurfaceOptions,
}

/// Placeholder shown instead of a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceMessage {
    Loading,
    Empty,
    Error(String),
    Status(String),
}

impl std::fmt::Display for SurfaceMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SurfaceMessage::Loading => write!(f, "Loading…"),
            SurfaceMessage::Empty => write!(f, "No data to display."),
            SurfaceMessage::Error(e) => write!(f, "{e}"),
            SurfaceMessage::Status(s) => write!(f, "{s}"),
        }
    }
}

/// The external table widget.
pub trait RenderSurface {
    /// Destroy the current instance and empty its container.
    fn clear(&mut self);
    /// Construct a new instance from `spec`.
    fn mount(&mut self, spec: TableSpec);
    /// Swap the data of the mounted instance.
    fn update_data(&mut self, rows: Vec<BoundRow>);
    fn force_render(&mut self);
    /// Show a placeholder message in the container.
    fn show_message(&mut self, message: SurfaceMessage);
}

/// Where "trying X" / "loaded from X" messages go.
pub trait StatusSink {
    fn status(&mut self, text: &str);
}

/// User interaction coming back from the surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceEvent {
    SeenToggled { message_id: String, checked: bool },
    /// Mark every listed row seen (the rows of the current page).
    PageSeen(Vec<String>),
    /// Clear the seen set. Only sent after the user confirmed.
    ResetSeenConfirmed,
    ToggleHideSeen,
}

/// Fixed, schema-independent column list.
pub fn columns() -> Vec<ColumnDef> {
    vec![
        ColumnDef { id: SEEN_COLUMN, name: "seen", formatter: Some(seen_cell) },
        ColumnDef { id: "date_utc", name: "date_utc", formatter: None },
        ColumnDef { id: "message_id", name: "message_id", formatter: None },
        ColumnDef { id: "url", name: "url", formatter: Some(link_cell) },
        ColumnDef { id: "keywords", name: "keywords", formatter: Some(chips_cell) },
        ColumnDef { id: "snippet", name: "snippet", formatter: None },
    ]
}

fn seen_cell(_: &str, row: &BoundRow) -> CellContent {
    CellContent::Checkbox(row.seen)
}

fn link_cell(href: &str, _: &BoundRow) -> CellContent {
    if href.is_empty() {
        CellContent::Text(String::new())
    } else {
        CellContent::Link { href: href.to_string(), label: "post".to_string() }
    }
}

fn chips_cell(_: &str, row: &BoundRow) -> CellContent {
    CellContent::Chips(row.record.keyword_tokens().map(str::to_string).collect())
}

/// Rows for the current view, decorated from the seen store right now.
pub fn bind_rows(session: &Session) -> Vec<BoundRow> {
    session
        .visible()
        .into_iter()
        .map(|r| BoundRow { seen: session.is_seen(&r.message_id), record: r.clone() })
        .collect()
}

pub struct ViewBinder<S: RenderSurface> {
    surface: Option<S>,
    status: Option<Box<dyn StatusSink>>,
    options: SurfaceOptions,
    renders: u64,
}

impl<S: RenderSurface> ViewBinder<S> {
    pub fn new(surface: Option<S>, status: Option<Box<dyn StatusSink>>, options: SurfaceOptions) -> Self {
        if surface.is_none() {
            tracing::warn!("no rendering surface; table rendering disabled");
        }
        Self { surface, status, options, renders: 0 }
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    pub fn surface_mut(&mut self) -> Option<&mut S> {
        self.surface.as_mut()
    }

    /// Number of full renders performed.
    pub fn renders(&self) -> u64 {
        self.renders
    }

    /// Clear the surface and rebuild it from the session.
    pub fn render(&mut self, session: &Session) {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        let rows = bind_rows(session);
        surface.clear();
        if rows.is_empty() {
            surface.show_message(SurfaceMessage::Empty);
        } else {
            surface.mount(TableSpec { columns: columns(), rows, options: self.options });
            surface.force_render();
        }
        self.renders += 1;
    }

    /// Report a status line, falling back to the surface if no sink exists.
    pub fn report(&mut self, text: &str) {
        match (self.status.as_mut(), self.surface.as_mut()) {
            (Some(sink), _) => sink.status(text),
            (None, Some(surface)) => surface.show_message(SurfaceMessage::Status(text.to_string())),
            (None, None) => tracing::debug!(text, "status dropped, no sink"),
        }
    }

    /// Show a loading placeholder for a cycle that has just begun.
    pub fn loading(&mut self) {
        if let Some(surface) = self.surface.as_mut() {
            if self.renders == 0 {
                surface.clear();
                surface.show_message(SurfaceMessage::Loading);
            }
        }
    }

    /// Reflect a finished cycle. Stale outcomes change nothing.
    pub fn cycle_finished(&mut self, session: &Session, outcome: &CycleOutcome) {
        match outcome {
            CycleOutcome::Rendered { source, .. } => {
                self.report(&format!("Loaded from: {source}"));
                self.render(session);
            }
            CycleOutcome::Failed(err) => {
                self.report(&format!("Error while loading: {err}"));
                if self.renders == 0 {
                    if let Some(surface) = self.surface.as_mut() {
                        surface.clear();
                        surface.show_message(SurfaceMessage::Error(err.to_string()));
                    }
                }
            }
            CycleOutcome::Stale { .. } => {}
        }
    }

    /// Apply a surface event to the session, then re-render.
    pub fn handle_event(&mut self, session: &mut Session, event: SurfaceEvent) -> Result<(), StoreError> {
        tracing::debug!(?event, "surface event");
        let result = match event {
            SurfaceEvent::SeenToggled { message_id, checked } => session.set_seen(&message_id, checked),
            SurfaceEvent::PageSeen(ids) => session.mark_all_seen(ids.iter().map(String::as_str)),
            SurfaceEvent::ResetSeenConfirmed => session.reset_seen(),
            SurfaceEvent::ToggleHideSeen => {
                session.set_visibility(session.visibility().toggled());
                Ok(())
            }
        };
        self.render(session);
        result
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
