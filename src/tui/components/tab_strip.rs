//! # Tab Strip Component
//!
//! One tab per section, the active one bold and reversed, the rest dimmed,
//! over a thin rule. Long section titles are shortened so a handful of tabs
//! still fit a narrow container; anything past the right edge is clipped.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::tui::component::Component;
use crate::tui::styles::Palette;

/// Rows used: tabs + rule.
pub const TAB_STRIP_HEIGHT: u16 = 2;

/// Titles wider than this many columns are shortened.
const MAX_TAB_LABEL_WIDTH: usize = 12;
const ELLIPSIS: &str = "...";

/// Capitalizes the first character and shortens long titles with `...`.
pub fn tab_label(title: &str) -> String {
    let mut chars = title.chars();
    let mut label: String = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    };

    if label.width() > MAX_TAB_LABEL_WIDTH {
        let budget = MAX_TAB_LABEL_WIDTH - ELLIPSIS.len();
        let mut used = 0;
        let mut cut = 0;
        for (idx, c) in label.char_indices() {
            let w = c.width().unwrap_or(0);
            if used + w > budget {
                break;
            }
            used += w;
            cut = idx + c.len_utf8();
        }
        label.truncate(cut);
        label.push_str(ELLIPSIS);
    }
    label
}

pub struct TabStrip<'a> {
    pub titles: Vec<&'a str>,
    pub active: usize,
    pub palette: &'a Palette,
}

impl<'a> TabStrip<'a> {
    pub fn new(titles: Vec<&'a str>, active: usize, palette: &'a Palette) -> Self {
        Self {
            titles,
            active,
            palette,
        }
    }
}

impl Component for TabStrip<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let tabs: Vec<Span> = self
            .titles
            .iter()
            .enumerate()
            .map(|(i, title)| {
                let style = if i == self.active {
                    self.palette.active_tab()
                } else {
                    self.palette.inactive_tab()
                };
                Span::styled(format!("  {}  ", tab_label(title)), style)
            })
            .collect();
        let rule = Line::styled("─".repeat(area.width as usize), self.palette.subtle());

        frame.render_widget(Paragraph::new(vec![Line::from(tabs), rule]), area);
    }
}
