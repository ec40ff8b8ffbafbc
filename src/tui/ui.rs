use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::widgets::{Block, Padding};

use crate::core::content::Content;
use crate::core::state::{Mode, NavigationState};
use crate::tui::component::Component;
use crate::tui::components::footer::FOOTER_HEIGHT;
use crate::tui::components::header::HEADER_HEIGHT;
use crate::tui::components::section_body::BODY_MAX_HEIGHT;
use crate::tui::components::status_bar::STATUS_BAR_HEIGHT;
use crate::tui::components::tab_strip::TAB_STRIP_HEIGHT;
use crate::tui::components::{
    HelpFooter, SectionBody, StatusBar, TabStrip, TitleHeader, WelcomeBanner,
};
use crate::tui::styles::Palette;

/// Blank row between the header and the tabs.
const HEADER_GAP: u16 = 1;
/// Border (1 each side) plus vertical padding (1 each side).
const FRAME_ROWS: u16 = 4;
/// Columns subtracted from the container for the body's divider width.
const CONTENT_MARGIN: u16 = 8;

const CHROME_ROWS: u16 =
    FRAME_ROWS + HEADER_HEIGHT + HEADER_GAP + TAB_STRIP_HEIGHT + FOOTER_HEIGHT + STATUS_BAR_HEIGHT;

/// Draws one frame for `state`.
///
/// Pure with respect to its inputs: the same state, content and palette
/// always produce the same buffer. Drawing is limited to the session's
/// viewport even if the frame is larger.
pub fn draw_ui(frame: &mut Frame, state: &NavigationState, content: &Content, palette: &Palette) {
    let viewport = Rect::new(0, 0, state.viewport.width, state.viewport.height);
    let area = frame.area().intersection(viewport);
    if area.is_empty() {
        return;
    }

    if state.mode == Mode::Welcome {
        WelcomeBanner::new(&content.title, palette).render(frame, area);
        return;
    }

    draw_profile(frame, area, state, content, palette);
}

fn container_area(area: Rect) -> Rect {
    let width = (u32::from(area.width) * 2 / 3) as u16;
    let height = (CHROME_ROWS + BODY_MAX_HEIGHT).min(area.height);

    let [column] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(area);
    let [container] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(column);
    container
}

fn draw_profile(
    frame: &mut Frame,
    area: Rect,
    state: &NavigationState,
    content: &Content,
    palette: &Palette,
) {
    use Constraint::{Length, Min};

    let container = container_area(area);
    let block = Block::bordered()
        .border_style(palette.border())
        .padding(Padding::new(2, 2, 1, 1));
    let inner = block.inner(container);
    frame.render_widget(block, container);

    let [header_area, _, tabs_area, body_area, footer_area, status_area] = Layout::vertical([
        Length(HEADER_HEIGHT),
        Length(HEADER_GAP),
        Length(TAB_STRIP_HEIGHT),
        Min(0),
        Length(FOOTER_HEIGHT),
        Length(STATUS_BAR_HEIGHT),
    ])
    .areas(inner);

    let section = content.section(state.section_cursor);
    let selected_link = state.in_link_mode().then_some(state.link_cursor);
    let content_width = container.width.saturating_sub(CONTENT_MARGIN);

    TitleHeader::new(&content.title, palette).render(frame, header_area);
    TabStrip::new(content.tab_titles().collect(), state.section_cursor, palette)
        .render(frame, tabs_area);
    SectionBody::new(section, selected_link, content_width, palette).render(frame, body_area);
    HelpFooter::new(state.mode, section.link_count() > 0, palette).render(frame, footer_area);
    StatusBar::new(state.mode, &state.status_message, palette).render(frame, status_area);
}
