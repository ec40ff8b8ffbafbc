//! # Welcome Banner Component
//!
//! Shown once when a session starts, until the welcome timer fires or the
//! visitor presses any key. Only the profile title is drawn.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::component::Component;
use crate::tui::styles::Palette;

pub struct WelcomeBanner<'a> {
    pub title: &'a str,
    pub palette: &'a Palette,
}

impl<'a> WelcomeBanner<'a> {
    pub fn new(title: &'a str, palette: &'a Palette) -> Self {
        Self { title, palette }
    }

    pub fn text(&self) -> String {
        format!("━━━ {} ━━━", self.title)
    }
}

impl Component for WelcomeBanner<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let [row] = Layout::vertical([Constraint::Length(1)])
            .flex(Flex::Center)
            .areas(area);
        let banner = Paragraph::new(Line::from(Span::styled(self.text(), self.palette.welcome())))
            .alignment(Alignment::Center);
        frame.render_widget(banner, row);
    }
}
