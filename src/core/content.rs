//! # Profile Content
//!
//! The document every session browses: a title, an ordered list of
//! sections, and a color theme. Content is loaded once at startup,
//! validated, and then shared read-only (`Arc<Content>`) by all sessions.
//!
//! Colors are kept as strings here. The `core` module knows nothing about
//! terminal styling; `tui::styles` turns a [`Theme`] into concrete styles.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

use crate::core::links::{Link, count_links, extract_links};

/// One tab of the profile.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Section {
    pub title: String,
    #[serde(default)]
    pub lines: Vec<String>,
}

impl Section {
    pub fn new(title: impl Into<String>, lines: &[&str]) -> Self {
        Self {
            title: title.into(),
            lines: lines.iter().map(|l| l.to_string()).collect(),
        }
    }

    pub fn links(&self) -> Vec<Link<'_>> {
        extract_links(&self.lines)
    }

    pub fn link_count(&self) -> usize {
        count_links(&self.lines)
    }
}

/// Named theme colors. Values are `#rrggbb` hex codes or terminal color
/// names (`"blue"`, `"darkgray"`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Theme {
    /// Borders, title, section headers.
    pub primary: String,
    /// Ornaments, active tab, mode indicator.
    pub accent: String,
    /// Body text.
    pub text: String,
    /// Dividers, footer, status strip background.
    pub subtle: String,
    /// Unselected links and the welcome banner.
    pub links: String,
    /// The selected link.
    pub selection: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary: "#5f87ff".to_string(),
            accent: "#ff6ac1".to_string(),
            text: "#abb2bf".to_string(),
            subtle: "#565c64".to_string(),
            links: "#61afef".to_string(),
            selection: "#c678dd".to_string(),
        }
    }
}

impl Theme {
    /// All colors with their field names, for validation and diagnostics.
    pub fn entries(&self) -> [(&'static str, &str); 6] {
        [
            ("primary", self.primary.as_str()),
            ("accent", self.accent.as_str()),
            ("text", self.text.as_str()),
            ("subtle", self.subtle.as_str()),
            ("links", self.links.as_str()),
            ("selection", self.selection.as_str()),
        ]
    }
}

/// The full profile: title, sections, theme.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Content {
    pub title: String,
    pub sections: Vec<Section>,
    #[serde(default)]
    pub theme: Theme,
}

#[derive(Debug)]
pub enum ContentError {
    /// A profile must have at least one section.
    NoSections,
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ContentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentError::NoSections => write!(f, "profile has no sections"),
            ContentError::Io(e) => write!(f, "profile I/O error: {e}"),
            ContentError::Parse(e) => write!(f, "profile parse error: {e}"),
        }
    }
}

impl std::error::Error for ContentError {}

impl Content {
    /// Builds validated content.
    pub fn new(
        title: impl Into<String>,
        sections: Vec<Section>,
        theme: Theme,
    ) -> Result<Self, ContentError> {
        let content = Self {
            title: title.into(),
            sections,
            theme,
        };
        content.validate()?;
        Ok(content)
    }

    /// Loads a standalone profile file (same shape as the `[profile]`
    /// table of the config file).
    pub fn from_file(path: &Path) -> Result<Self, ContentError> {
        let raw = fs::read_to_string(path).map_err(ContentError::Io)?;
        let content: Content = toml::from_str(&raw).map_err(ContentError::Parse)?;
        content.validate()?;
        Ok(content)
    }

    pub fn validate(&self) -> Result<(), ContentError> {
        if self.sections.is_empty() {
            return Err(ContentError::NoSections);
        }
        Ok(())
    }

    /// The section at `index`. Indices come from `NavigationState`, which
    /// keeps them in range; out-of-range indices clamp to the last section.
    pub fn section(&self, index: usize) -> &Section {
        let last = self.sections.len().saturating_sub(1);
        &self.sections[index.min(last)]
    }

    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    pub fn tab_titles(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|s| s.title.as_str())
    }
}

impl Default for Content {
    /// A placeholder profile so a fresh install serves something useful.
    fn default() -> Self {
        Self {
            title: "sshfolio".to_string(),
            sections: vec![
                Section::new(
                    "about",
                    &[
                        "a personal profile, served over ssh.",
                        "edit the [profile] table in ~/.sshfolio/config.toml to make it yours.",
                        "",
                        "source: https://github.com/example/sshfolio",
                    ],
                ),
                Section::new(
                    "projects",
                    &[
                        "sshfolio: this very terminal page",
                        "dotfiles: https://github.com/example/dotfiles",
                    ],
                ),
                Section::new(
                    "setup",
                    &[
                        "editor: neovim",
                        "terminal: foot",
                        "shell: zsh",
                    ],
                ),
                Section::new(
                    "links",
                    &[
                        "github: https://github.com/example",
                        "website: https://example.com",
                        "blog: https://blog.example.com",
                    ],
                ),
            ],
            theme: Theme::default(),
        }
    }
}
