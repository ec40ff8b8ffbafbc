//! # Status Bar Component
//!
//! Bottom strip of the container:
//!
//! ```text
//!  NORMAL                                  Section: links
//! └─mode─┘└────────── filler ──────────┘└── message ──┘
//! ```
//!
//! The message is right-aligned by padding with filler cells, measured in
//! display columns so wide characters keep the strip one row tall. When
//! the strip is too narrow, the message is clipped at the right edge.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

use crate::core::state::Mode;
use crate::tui::component::Component;
use crate::tui::styles::Palette;

pub const STATUS_BAR_HEIGHT: u16 = 1;

pub struct StatusBar<'a> {
    pub mode: Mode,
    pub message: &'a str,
    pub palette: &'a Palette,
}

impl<'a> StatusBar<'a> {
    pub fn new(mode: Mode, message: &'a str, palette: &'a Palette) -> Self {
        Self {
            mode,
            message,
            palette,
        }
    }

    fn spans(&self, width: u16) -> Vec<Span<'static>> {
        let indicator = format!(" {} ", self.mode.label());
        let message = format!(" {} ", self.message);
        let filler = (width as usize).saturating_sub(indicator.width() + message.width());

        vec![
            Span::styled(indicator, self.palette.mode_indicator()),
            Span::styled(" ".repeat(filler), self.palette.status_fill()),
            Span::styled(message, self.palette.status_message()),
        ]
    }
}

impl Component for StatusBar<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let line = Line::from(self.spans(area.width));
        frame.render_widget(Paragraph::new(line), area);
    }
}
