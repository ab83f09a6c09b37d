//! Terminal table surface: the paginated, sortable table the view binder
//! renders into.
//!
//! The surface keeps the mounted [`TableSpec`] plus its own navigation
//! state: page, cursor row within the page, and sort column/direction.
//! Remounting keeps navigation state, clamped to the new row count, so a
//! checkbox toggle does not throw the user back to page one.

use scanview_core::view::{BoundRow, CellContent, RenderSurface, SurfaceMessage, TableSpec};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDir {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    pub column: usize,
    pub dir: SortDir,
}

#[derive(Debug, Default)]
pub struct TableSurface {
    spec: Option<TableSpec>,
    message: Option<SurfaceMessage>,
    /// Row order after sorting: indices into `spec.rows`.
    order: Vec<usize>,
    page: usize,
    cursor: usize,
    sort: Option<SortState>,
    renders: u64,
}

impl TableSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spec(&self) -> Option<&TableSpec> {
        self.spec.as_ref()
    }

    pub fn message(&self) -> Option<&SurfaceMessage> {
        self.message.as_ref()
    }

    pub fn sort(&self) -> Option<SortState> {
        self.sort
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn renders(&self) -> u64 {
        self.renders
    }

    fn page_size(&self) -> usize {
        self.spec.as_ref().map_or(1, |s| s.options.page_size.max(1))
    }

    pub fn row_count(&self) -> usize {
        self.order.len()
    }

    pub fn page_count(&self) -> usize {
        self.row_count().div_ceil(self.page_size()).max(1)
    }

    /// Rows of the current page, in display order.
    pub fn page_rows(&self) -> Vec<&BoundRow> {
        let Some(spec) = self.spec.as_ref() else {
            return Vec::new();
        };
        self.order
            .iter()
            .skip(self.page * self.page_size())
            .take(self.page_size())
            .map(|&i| &spec.rows[i])
            .collect()
    }

    pub fn selected(&self) -> Option<&BoundRow> {
        self.page_rows().get(self.cursor).copied()
    }

    pub fn page_ids(&self) -> Vec<String> {
        self.page_rows().iter().map(|r| r.record.message_id.clone()).collect()
    }

    // -- navigation ---------------------------------------------------------

    pub fn cursor_up(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
        } else if self.page > 0 {
            self.page -= 1;
            self.cursor = self.page_rows().len().saturating_sub(1);
        }
        tracing::debug!(page = self.page, cursor = self.cursor, "table: cursor up");
    }

    pub fn cursor_down(&mut self) {
        if self.cursor + 1 < self.page_rows().len() {
            self.cursor += 1;
        } else if self.page + 1 < self.page_count() {
            self.page += 1;
            self.cursor = 0;
        }
        tracing::debug!(page = self.page, cursor = self.cursor, "table: cursor down");
    }

    pub fn next_page(&mut self) {
        if self.page + 1 < self.page_count() {
            self.page += 1;
            self.clamp();
            tracing::debug!(page = self.page, "table: next page");
        }
    }

    pub fn prev_page(&mut self) {
        if self.page > 0 {
            self.page -= 1;
            self.clamp();
            tracing::debug!(page = self.page, "table: prev page");
        }
    }

    /// Advance the sort column: unsorted, then each column ascending, then
    /// back to unsorted. Ignored when the table is not sortable.
    pub fn cycle_sort(&mut self) {
        let Some(spec) = self.spec.as_ref() else { return };
        if !spec.options.sortable {
            return;
        }
        let columns = spec.columns.len();
        self.sort = match self.sort {
            None => Some(SortState { column: 0, dir: SortDir::Asc }),
            Some(s) if s.column + 1 < columns => Some(SortState { column: s.column + 1, dir: SortDir::Asc }),
            Some(_) => None,
        };
        tracing::debug!(sort = ?self.sort, "table: sort column");
        self.reorder();
    }

    pub fn flip_sort(&mut self) {
        if let Some(s) = self.sort.as_mut() {
            s.dir = match s.dir {
                SortDir::Asc => SortDir::Desc,
                SortDir::Desc => SortDir::Asc,
            };
            tracing::debug!(sort = ?self.sort, "table: sort direction");
            self.reorder();
        }
    }

    fn reorder(&mut self) {
        let Some(spec) = self.spec.as_ref() else {
            self.order.clear();
            return;
        };
        let mut order: Vec<usize> = (0..spec.rows.len()).collect();
        if let Some(sort) = self.sort {
            if let Some(col) = spec.columns.get(sort.column) {
                let keys: Vec<String> = spec.rows.iter().map(|r| sort_key(&col.cell(r))).collect();
                order.sort_by(|&a, &b| {
                    let ord = keys[a].cmp(&keys[b]);
                    match sort.dir {
                        SortDir::Asc => ord,
                        SortDir::Desc => ord.reverse(),
                    }
                });
            }
        }
        self.order = order;
        self.clamp();
    }

    fn clamp(&mut self) {
        self.page = self.page.min(self.page_count() - 1);
        let on_page = self.page_rows().len();
        self.cursor = self.cursor.min(on_page.saturating_sub(1));
    }
}

fn sort_key(cell: &CellContent) -> String {
    match cell {
        CellContent::Checkbox(b) => u8::from(*b).to_string(),
        other => other.plain(),
    }
}

impl RenderSurface for TableSurface {
    fn clear(&mut self) {
        self.spec = None;
        self.message = None;
        self.order.clear();
    }

    fn mount(&mut self, spec: TableSpec) {
        if !spec.options.sortable {
            self.sort = None;
        }
        self.spec = Some(spec);
        self.message = None;
        self.reorder();
    }

    fn update_data(&mut self, rows: Vec<BoundRow>) {
        if let Some(spec) = self.spec.as_mut() {
            spec.rows = rows;
            self.reorder();
        }
    }

    fn force_render(&mut self) {
        self.renders += 1;
    }

    fn show_message(&mut self, message: SurfaceMessage) {
        match message {
            // Status lines overlay a mounted table instead of replacing it.
            SurfaceMessage::Status(_) if self.spec.is_some() => self.message = Some(message),
            _ => {
                self.spec = None;
                self.order.clear();
                self.message = Some(message);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
