//! # TUI Components
//!
//! Every piece of the profile screen is a small, stateless component that
//! receives its data as props and renders into the `Rect` it is given.
//!
//! ## Layout
//!
//! ```text
//! ┌──────────────── container ────────────────┐
//! │              ◇ title ◇                    │  TitleHeader
//! │ ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━ │
//! │                                           │
//! │   About    Links                          │  TabStrip
//! │ ───────────────────────────────────────── │
//! │ ✦ LINKS ✦                                 │  SectionBody
//! │ ...                                       │
//! │ ───────────────────────────────────────── │  HelpFooter
//! │      ↑/↓ - j/k: navigate sections ...     │
//! │ NORMAL                            Ready   │  StatusBar
//! └───────────────────────────────────────────┘
//! ```
//!
//! `WelcomeBanner` replaces the whole screen until the welcome phase ends.
//!
//! ## Props-Based Data Flow
//!
//! Components never reach for session state on their own. `ui::draw_ui`
//! reads the navigation state and hands each component exactly what it
//! draws, which keeps every component testable against a `TestBackend`.
//!
//! ## Module Structure
//!
//! ```text
//! components/
//! ├── mod.rs           (this file)
//! ├── welcome.rs       (Splash banner)
//! ├── header.rs        (Title and rule)
//! ├── tab_strip.rs     (One tab per section)
//! ├── section_body.rs  (Section text with link highlighting)
//! ├── footer.rs        (Key hints)
//! └── status_bar.rs    (Mode indicator and status message)
//! ```

pub mod footer;
pub mod header;
pub mod section_body;
pub mod status_bar;
pub mod tab_strip;
pub mod welcome;

pub use footer::HelpFooter;
pub use header::TitleHeader;
pub use section_body::SectionBody;
pub use status_bar::StatusBar;
pub use tab_strip::TabStrip;
pub use welcome::WelcomeBanner;
