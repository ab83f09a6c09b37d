//! Confirmation popup: a centred yes/no question.

use crate::theme::Theme;
use crate::widgets::help::centered_rect;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, Clear, Paragraph, Widget},
};

pub struct ConfirmPopup<'a> {
    question: &'a str,
    theme: &'a Theme,
}

impl<'a> ConfirmPopup<'a> {
    pub fn new(question: &'a str, theme: &'a Theme) -> Self {
        Self { question, theme }
    }
}

impl Widget for ConfirmPopup<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let width = (self.question.chars().count() as u16 + 6).max(30);
        let popup = centered_rect(width, 5, area);
        Clear.render(popup, buf);

        let block = Block::bordered()
            .title(" Confirm ")
            .border_style(self.theme.border_focused);
        let inner = block.inner(popup);
        block.render(popup, buf);

        let lines = vec![
            Line::from(Span::styled(self.question.to_string(), self.theme.filter_value)),
            Line::from(Span::styled("y = yes, any other key = no", self.theme.filter_label)),
        ];
        Paragraph::new(lines).alignment(Alignment::Center).render(inner, buf);
    }
}
