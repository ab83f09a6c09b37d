//! Status bar: one line at the top: the latest status message on the left,
//! cycle state and record counts on the right.

use crate::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};
use scanview_core::view::StatusSink;
use scanview_core::CycleState;
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusKind {
    #[default]
    Info,
    Ok,
    Error,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusEntry {
    pub kind: StatusKind,
    pub text: String,
}

/// Shared status line: the view binder writes through [`StatusSink`], the
/// app reads it when drawing.
#[derive(Debug, Clone, Default)]
pub struct StatusLine(Rc<RefCell<StatusEntry>>);

impl StatusLine {
    pub fn set(&self, kind: StatusKind, text: impl Into<String>) {
        *self.0.borrow_mut() = StatusEntry { kind, text: text.into() };
    }

    pub fn get(&self) -> StatusEntry {
        self.0.borrow().clone()
    }
}

impl StatusSink for StatusLine {
    fn status(&mut self, text: &str) {
        let kind = if text.starts_with("Loaded") {
            StatusKind::Ok
        } else if text.starts_with("Error") {
            StatusKind::Error
        } else {
            StatusKind::Info
        };
        self.set(kind, text);
    }
}

/// Right-hand summary numbers.
#[derive(Debug, Clone, Copy, Default)]
pub struct Counts {
    pub shown: usize,
    pub total: usize,
    pub seen: usize,
}

pub struct StatusBar<'a> {
    entry: StatusEntry,
    state: CycleState,
    counts: Counts,
    theme: &'a Theme,
}

impl<'a> StatusBar<'a> {
    pub fn new(status: &StatusLine, state: CycleState, counts: Counts, theme: &'a Theme) -> Self {
        Self { entry: status.get(), state, counts, theme }
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [left, right] =
            Layout::horizontal([Constraint::Fill(1), Constraint::Length(44)]).areas(area);

        let style = match self.entry.kind {
            StatusKind::Info => self.theme.status_info,
            StatusKind::Ok => self.theme.status_ok,
            StatusKind::Error => self.theme.status_error,
        };
        Paragraph::new(Line::from(Span::styled(format!(" {}", self.entry.text), style)))
            .render(left, buf);

        let summary = format!(
            "{} · {} shown / {} total · {} seen ",
            self.state, self.counts.shown, self.counts.total, self.counts.seen
        );
        Paragraph::new(Line::from(Span::styled(summary, self.theme.status_info)))
            .alignment(Alignment::Right)
            .render(right, buf);
    }
}
