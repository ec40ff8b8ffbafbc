//! # Title Header Component
//!
//! The profile title between two ornaments, over a heavy rule:
//!
//! ```text
//!            ◇ name ◇
//! ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//! ```

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::component::Component;
use crate::tui::styles::Palette;

/// Rows used: title + rule.
pub const HEADER_HEIGHT: u16 = 2;

const ORNAMENT: &str = "◇";

pub struct TitleHeader<'a> {
    pub title: &'a str,
    pub palette: &'a Palette,
}

impl<'a> TitleHeader<'a> {
    pub fn new(title: &'a str, palette: &'a Palette) -> Self {
        Self { title, palette }
    }
}

impl Component for TitleHeader<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let title = Line::from(vec![
            Span::styled(ORNAMENT, self.palette.ornament()),
            Span::raw(" "),
            Span::styled(self.title, self.palette.title()),
            Span::raw(" "),
            Span::styled(ORNAMENT, self.palette.ornament()),
        ])
        .alignment(Alignment::Center);
        let rule = Line::styled("━".repeat(area.width as usize), self.palette.border());

        frame.render_widget(Paragraph::new(vec![title, rule]), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::content::Theme;
    use crate::test_support::buffer_lines;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    #[test]
    fn test_header_draws_title_and_rule() {
        let palette = Palette::from_theme(&Theme::default()).unwrap();
        let mut terminal = Terminal::new(TestBackend::new(20, 2)).unwrap();
        terminal
            .draw(|f| {
                let area = f.area();
                TitleHeader::new("me", &palette).render(f, area);
            })
            .unwrap();

        let lines = buffer_lines(terminal.backend().buffer());
        assert_eq!(lines[0].trim(), "◇ me ◇");
        assert_eq!(lines[1], "━".repeat(20));
    }
}
