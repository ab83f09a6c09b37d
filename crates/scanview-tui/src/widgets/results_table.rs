//! Results table: draws the current page of the [`TableSurface`].
//!
//! Seen rows are dimmed, the cursor row is highlighted, links show their
//! label and keyword chips are drawn as padded tokens. When the surface holds
//! a message instead of a table, the message is centred in the pane.

use crate::surface::{SortDir, TableSurface};
use crate::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Cell, Paragraph, Row, StatefulWidget, Table, TableState, Widget},
};
use scanview_core::view::{BoundRow, CellContent, ColumnDef, SurfaceMessage};

pub struct ResultsTable<'a> {
    surface: &'a TableSurface,
    theme: &'a Theme,
}

impl<'a> ResultsTable<'a> {
    pub fn new(surface: &'a TableSurface, theme: &'a Theme) -> Self {
        Self { surface, theme }
    }

    fn title(&self) -> String {
        let Some(spec) = self.surface.spec() else {
            return " Findings ".to_string();
        };
        let mut title = format!(
            " Findings: page {}/{}, {} rows ",
            self.surface.page() + 1,
            self.surface.page_count(),
            self.surface.row_count()
        );
        if let Some(sort) = self.surface.sort() {
            if let Some(col) = spec.columns.get(sort.column) {
                let arrow = match sort.dir {
                    SortDir::Asc => '↑',
                    SortDir::Desc => '↓',
                };
                title.push_str(&format!("sorted by {} {arrow} ", col.name));
            }
        }
        title
    }

    fn cell(&self, column: &ColumnDef, row: &BoundRow) -> Cell<'static> {
        let base = if row.seen { self.theme.seen } else { Style::default() };
        match column.cell(row) {
            CellContent::Text(text) => Cell::from(Span::styled(one_line(&text), base)),
            CellContent::Link { label, .. } => Cell::from(Span::styled(label, base.patch(self.theme.link))),
            CellContent::Chips(tokens) => {
                let chip = if row.seen { self.theme.seen } else { self.theme.chip };
                let spans: Vec<Span<'static>> = tokens
                    .into_iter()
                    .flat_map(|t| [Span::styled(format!(" {t} "), chip), Span::raw(" ")])
                    .collect();
                Cell::from(Line::from(spans))
            }
            CellContent::Checkbox(checked) => {
                let mark = if checked { "[x]" } else { "[ ]" };
                Cell::from(Span::styled(mark, base.patch(self.theme.checkbox)))
            }
        }
    }
}

fn one_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn width(column: &ColumnDef) -> Constraint {
    match column.id {
        "seen" => Constraint::Length(4),
        "date_utc" => Constraint::Length(20),
        "message_id" => Constraint::Length(10),
        "url" => Constraint::Length(5),
        "keywords" => Constraint::Percentage(25),
        _ => Constraint::Fill(1),
    }
}

impl Widget for ResultsTable<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::bordered()
            .title(self.title())
            .border_style(self.theme.border_focused);

        let Some(spec) = self.surface.spec() else {
            let inner = block.inner(area);
            block.render(area, buf);
            let (text, style) = match self.surface.message() {
                Some(msg @ SurfaceMessage::Error(_)) => (msg.to_string(), self.theme.status_error),
                Some(msg) => (msg.to_string(), self.theme.status_info),
                None => (String::new(), Style::default()),
            };
            let y = inner.y + inner.height / 2;
            let line_area = Rect { y, height: 1.min(inner.height), ..inner };
            Paragraph::new(Line::from(Span::styled(text, style)))
                .alignment(Alignment::Center)
                .render(line_area, buf);
            return;
        };

        let header = Row::new(spec.columns.iter().map(|c| Cell::from(c.name)))
            .style(self.theme.header);
        let rows: Vec<Row> = self
            .surface
            .page_rows()
            .into_iter()
            .map(|r| Row::new(spec.columns.iter().map(|c| self.cell(c, r))))
            .collect();
        let widths: Vec<Constraint> = spec.columns.iter().map(width).collect();

        let table = Table::new(rows, widths)
            .header(header)
            .block(block)
            .column_spacing(1)
            .row_highlight_style(self.theme.cursor);
        let mut state = TableState::default().with_selected(Some(self.surface.cursor()));
        StatefulWidget::render(table, area, buf, &mut state);
    }
}
