//! # Section Body Component
//!
//! Renders the active section:
//!
//! ```text
//! ✦ LINKS ✦
//! ──────────────
//!
//!   github: https://github.com/someone       ← link style
//!   web: → https://someone.example           ← selected link (LinkSelect)
//! ```
//!
//! Links are located per line with the same extractor the reducer uses.
//! The selected link is found by ordinal position across the whole
//! section, so duplicate URLs highlight the occurrence the cursor is on
//! rather than every copy of the text.
//!
//! The body never scrolls: whatever does not fit the area is cut off.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};

use crate::core::content::Section;
use crate::core::links::link_ranges;
use crate::tui::component::Component;
use crate::tui::styles::Palette;

/// Maximum body rows; taller sections are truncated.
pub const BODY_MAX_HEIGHT: u16 = 16;

const LINE_INDENT: &str = "  ";
const SELECTED_MARKER: &str = "→ ";

pub struct SectionBody<'a> {
    pub section: &'a Section,
    /// Ordinal of the selected link, when in link-selection mode.
    pub selected_link: Option<usize>,
    /// Width used for the divider under the header.
    pub content_width: u16,
    pub palette: &'a Palette,
}

impl<'a> SectionBody<'a> {
    pub fn new(
        section: &'a Section,
        selected_link: Option<usize>,
        content_width: u16,
        palette: &'a Palette,
    ) -> Self {
        Self {
            section,
            selected_link,
            content_width,
            palette,
        }
    }

    /// Builds every body line, links styled, before any clipping.
    pub fn lines(&self) -> Vec<Line<'a>> {
        let palette = self.palette;
        let section = self.section;
        let mut lines = Vec::with_capacity(section.lines.len() + 3);

        lines.push(Line::styled(
            format!("✦ {} ✦", section.title.to_uppercase()),
            palette.section_header(),
        ));
        lines.push(Line::styled(
            "─".repeat((self.content_width / 2) as usize),
            palette.subtle(),
        ));
        lines.push(Line::default());

        let mut ordinal = 0;
        for text in &section.lines {
            let mut spans = vec![Span::raw(LINE_INDENT)];
            let mut cursor = 0;
            for range in link_ranges(text) {
                if range.start > cursor {
                    spans.push(Span::styled(&text[cursor..range.start], palette.text()));
                }
                let url = &text[range.clone()];
                if self.selected_link == Some(ordinal) {
                    spans.push(Span::styled(
                        format!("{SELECTED_MARKER}{url}"),
                        palette.selected_link(),
                    ));
                } else {
                    spans.push(Span::styled(url, palette.link()));
                }
                ordinal += 1;
                cursor = range.end;
            }
            if cursor < text.len() {
                spans.push(Span::styled(&text[cursor..], palette.text()));
            }
            lines.push(Line::from(spans));
        }
        lines
    }
}

impl Component for SectionBody<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let area = Rect {
            height: area.height.min(BODY_MAX_HEIGHT),
            ..area
        };
        let body = Paragraph::new(self.lines()).wrap(Wrap { trim: false });
        frame.render_widget(body, area);
    }
}
