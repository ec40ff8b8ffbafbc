//! # Help Footer Component
//!
//! Key hints for the current mode, centered under a thin rule. The link
//! mode hint is only offered when the active section has links to select.

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::text::Line;
use ratatui::widgets::Paragraph;

use crate::core::state::Mode;
use crate::tui::component::Component;
use crate::tui::styles::Palette;

/// Rows used: rule + hint.
pub const FOOTER_HEIGHT: u16 = 2;

const BROWSE_HINT: &str = "↑/↓ - j/k: navigate sections";
const LINK_MODE_HINT: &str = " • TAB: enter link mode";
const QUIT_HINT: &str = " • q: quit";
const LINK_SELECT_HINT: &str = "↑/↓: navigate links • ENTER: open link • TAB: exit link mode • q: quit";

/// Hint text for `mode`.
pub fn help_text(mode: Mode, section_has_links: bool) -> String {
    match mode {
        Mode::LinkSelect => LINK_SELECT_HINT.to_string(),
        _ => {
            let mut hint = String::from(BROWSE_HINT);
            if section_has_links {
                hint.push_str(LINK_MODE_HINT);
            }
            hint.push_str(QUIT_HINT);
            hint
        }
    }
}

pub struct HelpFooter<'a> {
    pub mode: Mode,
    pub section_has_links: bool,
    pub palette: &'a Palette,
}

impl<'a> HelpFooter<'a> {
    pub fn new(mode: Mode, section_has_links: bool, palette: &'a Palette) -> Self {
        Self {
            mode,
            section_has_links,
            palette,
        }
    }
}

impl Component for HelpFooter<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let rule = Line::styled("─".repeat(area.width as usize), self.palette.subtle());
        let hint = Line::styled(help_text(self.mode, self.section_has_links), self.palette.subtle())
            .alignment(Alignment::Center);
        frame.render_widget(Paragraph::new(vec![rule, hint]), area);
    }
}
