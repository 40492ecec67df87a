//! Placeholder screen for features on the roadmap.

use color_eyre::eyre::Result;
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::component::Component;
use crate::theme;

pub struct ComingSoonScreen {
    focused: bool,
}

impl ComingSoonScreen {
    pub fn new() -> Self {
        Self { focused: false }
    }
}

impl Component for ComingSoonScreen {
    fn render(&self, frame: &mut Frame, area: Rect) {
        let border = if self.focused {
            theme::border_focused()
        } else {
            theme::border_default()
        };
        let block = Block::default()
            .title(Span::styled(" Coming Soon ", theme::title_style()))
            .borders(Borders::ALL)
            .border_style(border);

        let lines = vec![
            Line::default(),
            Line::from(Span::styled(
                "This shelf is still being built.",
                theme::title_style(),
            )),
            Line::default(),
            Line::from(Span::styled(
                "Reservations, reading lists, and overdue tracking are on the way.",
                theme::tab_inactive(),
            )),
            Line::default(),
            Line::from(Span::styled("Check back after the next release.", theme::key_hint())),
        ];

        let body = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(body, area);
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn id(&self) -> &str {
        "coming-soon"
    }
}
