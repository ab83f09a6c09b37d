//! Filter bar: keyword selector plus date-from / date-to inputs.
//!
//! Edits are staged here and only reach the session when applied with
//! `Enter`. The keyword selector cycles through "all" and every observed
//! keyword token; the date fields are free text validated on apply.

use crate::event::AppEvent;
use crate::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Paragraph, Widget},
};
use scanview_core::error::FilterInputError;
use scanview_core::FilterState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateField {
    From,
    To,
}

/// What a key did to an in-progress date edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    Editing,
    Commit,
    Cancel,
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct FilterBarState {
    /// Keyword tokens offered by the selector, sorted.
    pub options: Vec<String>,
    /// Index into `options`; `None` means no keyword constraint.
    pub keyword: Option<usize>,
    pub date_from: String,
    pub date_to: String,
    pub editing: Option<DateField>,
    /// Byte offset of the cursor in the field being edited.
    pub cursor: usize,
    pub error: Option<String>,
    /// Staged edits that have not been applied yet.
    pub dirty: bool,
}

impl FilterBarState {
    pub fn selected_keyword(&self) -> &str {
        self.keyword.and_then(|i| self.options.get(i)).map_or("", String::as_str)
    }

    /// Replace the selector options, keeping the current keyword if it is
    /// still offered.
    pub fn set_options(&mut self, options: Vec<String>) {
        let current = self.selected_keyword().to_string();
        self.keyword = if current.is_empty() {
            None
        } else {
            options.iter().position(|o| *o == current)
        };
        self.options = options;
    }

    pub fn next_keyword(&mut self) {
        self.keyword = match self.keyword {
            None if !self.options.is_empty() => Some(0),
            Some(i) if i + 1 < self.options.len() => Some(i + 1),
            _ => None,
        };
        self.dirty = true;
        tracing::debug!(keyword = self.selected_keyword(), "filter: keyword");
    }

    pub fn prev_keyword(&mut self) {
        self.keyword = match self.keyword {
            None => self.options.len().checked_sub(1),
            Some(0) => None,
            Some(i) => Some(i - 1),
        };
        self.dirty = true;
        tracing::debug!(keyword = self.selected_keyword(), "filter: keyword");
    }

    pub fn start_edit(&mut self, field: DateField) {
        self.editing = Some(field);
        self.cursor = self.field(field).len();
        self.error = None;
    }

    fn field(&self, field: DateField) -> &String {
        match field {
            DateField::From => &self.date_from,
            DateField::To => &self.date_to,
        }
    }

    fn field_mut(&mut self, field: DateField) -> &mut String {
        match field {
            DateField::From => &mut self.date_from,
            DateField::To => &mut self.date_to,
        }
    }

    /// Feed one key to the active date field.
    pub fn handle_edit(&mut self, event: &AppEvent) -> EditOutcome {
        let Some(field) = self.editing else {
            return EditOutcome::Cancel;
        };
        let cursor = self.cursor;
        match event {
            AppEvent::Char(c) => {
                self.field_mut(field).insert(cursor, *c);
                self.cursor += c.len_utf8();
                self.dirty = true;
            }
            AppEvent::Backspace => {
                if cursor > 0 {
                    let text = self.field_mut(field);
                    let prev = text[..cursor].char_indices().last().map_or(0, |(i, _)| i);
                    text.remove(prev);
                    self.cursor = prev;
                    self.dirty = true;
                }
            }
            AppEvent::CursorLeft => {
                let text = self.field(field);
                self.cursor = text[..cursor].char_indices().last().map_or(0, |(i, _)| i);
            }
            AppEvent::CursorRight => {
                let text = self.field(field);
                if cursor < text.len() {
                    self.cursor = text[cursor..]
                        .char_indices()
                        .nth(1)
                        .map_or(text.len(), |(i, _)| cursor + i);
                }
            }
            AppEvent::Enter => {
                self.editing = None;
                return EditOutcome::Commit;
            }
            AppEvent::Escape => {
                self.editing = None;
                return EditOutcome::Cancel;
            }
            _ => {}
        }
        EditOutcome::Editing
    }

    /// Build the filter to apply. Malformed dates are rejected and recorded
    /// in `error`.
    pub fn to_filter(&mut self) -> Result<FilterState, FilterInputError> {
        let built = self.build();
        match &built {
            Ok(_) => {
                self.error = None;
                self.dirty = false;
            }
            Err(e) => self.error = Some(e.to_string()),
        }
        built
    }

    fn build(&self) -> Result<FilterState, FilterInputError> {
        Ok(FilterState {
            keyword: self.selected_keyword().to_string(),
            date_from: FilterState::parse_date(&self.date_from)?,
            date_to: FilterState::parse_date(&self.date_to)?,
        })
    }

    pub fn reset(&mut self) {
        self.keyword = None;
        self.date_from.clear();
        self.date_to.clear();
        self.editing = None;
        self.cursor = 0;
        self.error = None;
        self.dirty = false;
    }
}

// ---------------------------------------------------------------------------
// Widget
// ---------------------------------------------------------------------------

pub struct FilterBar<'a> {
    state: &'a FilterBarState,
    hide_seen: bool,
    theme: &'a Theme,
}

impl<'a> FilterBar<'a> {
    pub fn new(state: &'a FilterBarState, hide_seen: bool, theme: &'a Theme) -> Self {
        Self { state, hide_seen, theme }
    }

    /// Terminal position of the text cursor while a date is being edited.
    pub fn cursor_position(&self, area: Rect) -> Option<(u16, u16)> {
        let field = self.state.editing?;
        let (before, text) = match field {
            DateField::From => (self.prefix_width_from(), &self.state.date_from),
            DateField::To => (self.prefix_width_to(), &self.state.date_to),
        };
        let col = text[..self.state.cursor].chars().count() as u16;
        let x = (area.x + 1 + before + col).min(area.right().saturating_sub(2));
        Some((x, area.y + 1))
    }

    fn keyword_label(&self) -> &str {
        match self.state.selected_keyword() {
            "" => "all",
            k => k,
        }
    }

    fn prefix_width_from(&self) -> u16 {
        ("keyword: ".len() + self.keyword_label().chars().count() + "  from: ".len()) as u16
    }

    fn prefix_width_to(&self) -> u16 {
        self.prefix_width_from() + (self.state.date_from.chars().count() + "  to: ".len()) as u16
    }
}

impl Widget for FilterBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.state.editing.is_some() {
            self.theme.border_focused
        } else {
            self.theme.border_unfocused
        };
        let block = Block::bordered().title("Filters").border_style(border_style);
        let inner = block.inner(area);
        block.render(area, buf);

        let label = self.theme.filter_label;
        let value = self.theme.filter_value;
        let mut spans = vec![
            Span::styled("keyword: ", label),
            Span::styled(self.keyword_label().to_string(), value),
            Span::styled("  from: ", label),
            Span::styled(self.state.date_from.clone(), value),
            Span::styled("  to: ", label),
            Span::styled(self.state.date_to.clone(), value),
        ];
        if self.hide_seen {
            spans.push(Span::styled("  [hiding seen]", label));
        }
        if let Some(err) = &self.state.error {
            spans.push(Span::styled(format!("  {err}"), self.theme.status_error));
        } else if self.state.dirty {
            spans.push(Span::styled("  (Enter to apply)", self.theme.filter_pending));
        }
        Paragraph::new(Line::from(spans)).render(inner, buf);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
