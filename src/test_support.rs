//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::Mutex;

use async_trait::async_trait;
use ratatui::buffer::Buffer;

use crate::browser::{OpenError, UrlOpener};
use crate::core::content::{Content, Section, Theme};
use crate::core::state::{Mode, NavigationState, Viewport};

/// One section, one link: `"site: https://example.com"`.
pub fn scenario_content() -> Content {
    Content::new(
        "tester",
        vec![Section::new("about", &["site: https://example.com"])],
        Theme::default(),
    )
    .unwrap()
}

/// Two sections: the first without links, the second with two.
pub fn links_content() -> Content {
    Content::new(
        "tester",
        vec![
            Section::new("about", &["no links here", "still none"]),
            Section::new(
                "links",
                &["github: https://github.com/tester", "web: https://tester.example"],
            ),
        ],
        Theme::default(),
    )
    .unwrap()
}

/// A state already past the welcome screen.
pub fn test_state(mode: Mode) -> NavigationState {
    let mut state = NavigationState::new(Viewport::new(80, 24));
    state.mode = mode;
    state
}

/// An opener that records every request instead of spawning a browser.
#[derive(Default)]
pub struct RecordingOpener {
    pub opened: Mutex<Vec<String>>,
    pub fail: bool,
}

#[async_trait]
impl UrlOpener for RecordingOpener {
    async fn open(&self, url: &str) -> Result<(), OpenError> {
        self.opened.lock().unwrap().push(url.to_string());
        if self.fail {
            return Err(OpenError::Unsupported("test".to_string()));
        }
        Ok(())
    }
}

/// Rows of a rendered buffer as plain strings.
pub fn buffer_lines(buffer: &Buffer) -> Vec<String> {
    let width = buffer.area.width as usize;
    if width == 0 {
        return Vec::new();
    }
    buffer
        .content()
        .chunks(width)
        .map(|row| row.iter().map(|cell| cell.symbol()).collect())
        .collect()
}
