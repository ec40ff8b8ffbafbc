//! # Navigation State
//!
//! Per-session cursor state. Each session owns exactly one
//! `NavigationState`; nothing here is shared between sessions.
//!
//! ```text
//! NavigationState
//! ├── section_cursor: usize   // active tab, always a valid section index
//! ├── link_cursor: usize      // selected link, meaningful in LinkSelect only
//! ├── mode: Mode              // Welcome → Browse ⇄ LinkSelect
//! ├── viewport: Viewport      // remote terminal size in cells
//! └── status_message: String  // status strip text
//! ```
//!
//! State changes only happen through `update(state, content, action)` in
//! action.rs.

/// Remote terminal size in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    /// Builds a viewport from the `u32` sizes SSH reports, saturating at
    /// `u16::MAX`.
    pub fn from_cells(width: u32, height: u32) -> Self {
        Self {
            width: u16::try_from(width).unwrap_or(u16::MAX),
            height: u16::try_from(height).unwrap_or(u16::MAX),
        }
    }
}

/// Coarse navigation mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Splash banner. Initial state, left exactly once.
    Welcome,
    /// Moving between sections.
    Browse,
    /// Moving between the links of the active section.
    LinkSelect,
}

impl Mode {
    /// Name shown in the status strip.
    pub fn label(self) -> &'static str {
        match self {
            Mode::Welcome => "WELCOME",
            Mode::Browse => "NORMAL",
            Mode::LinkSelect => "LINK",
        }
    }
}

pub const READY_STATUS: &str = "Ready";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationState {
    pub section_cursor: usize,
    pub link_cursor: usize,
    pub mode: Mode,
    pub viewport: Viewport,
    pub status_message: String,
}

impl NavigationState {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            section_cursor: 0,
            link_cursor: 0,
            mode: Mode::Welcome,
            viewport,
            status_message: READY_STATUS.to_string(),
        }
    }

    pub fn in_link_mode(&self) -> bool {
        self.mode == Mode::LinkSelect
    }
}
