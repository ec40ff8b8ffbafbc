//! # Palette
//!
//! Concrete ratatui styles derived from a profile [`Theme`]. A `Palette` is
//! built once per session and passed into every render call, so two
//! sessions rendering different profiles never share styling state.

use std::fmt;
use std::str::FromStr;

use ratatui::style::{Color, Modifier, Style};

use crate::core::content::Theme;

/// Background behind the active tab.
const BASE_COLOR: Color = Color::Rgb(0x28, 0x2c, 0x34);
/// Background behind the selected link.
const LINK_BACKGROUND: Color = Color::Rgb(0x2a, 0x30, 0x40);
/// Foreground on colored status strip blocks.
const STATUS_FOREGROUND: Color = Color::Rgb(0, 0, 0);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThemeError {
    BadColor { field: &'static str, value: String },
}

impl fmt::Display for ThemeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThemeError::BadColor { field, value } => {
                write!(f, "theme color `{field}` is not a color: {value:?}")
            }
        }
    }
}

impl std::error::Error for ThemeError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub primary: Color,
    pub accent: Color,
    pub text: Color,
    pub subtle: Color,
    pub links: Color,
    pub selection: Color,
}

fn parse_color(field: &'static str, value: &str) -> Result<Color, ThemeError> {
    Color::from_str(value.trim()).map_err(|_| ThemeError::BadColor {
        field,
        value: value.to_string(),
    })
}

impl Palette {
    pub fn from_theme(theme: &Theme) -> Result<Self, ThemeError> {
        let [primary, accent, text, subtle, links, selection] = theme.entries();
        Ok(Self {
            primary: parse_color(primary.0, primary.1)?,
            accent: parse_color(accent.0, accent.1)?,
            text: parse_color(text.0, text.1)?,
            subtle: parse_color(subtle.0, subtle.1)?,
            links: parse_color(links.0, links.1)?,
            selection: parse_color(selection.0, selection.1)?,
        })
    }

    pub fn welcome(&self) -> Style {
        Style::default().fg(self.links).add_modifier(Modifier::BOLD)
    }

    pub fn border(&self) -> Style {
        Style::default().fg(self.primary)
    }

    pub fn title(&self) -> Style {
        Style::default()
            .fg(self.primary)
            .add_modifier(Modifier::BOLD | Modifier::ITALIC)
    }

    pub fn ornament(&self) -> Style {
        Style::default().fg(self.accent)
    }

    pub fn active_tab(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .bg(BASE_COLOR)
            .add_modifier(Modifier::BOLD | Modifier::REVERSED)
    }

    pub fn inactive_tab(&self) -> Style {
        Style::default().fg(self.text).add_modifier(Modifier::DIM)
    }

    pub fn section_header(&self) -> Style {
        Style::default().fg(self.primary).add_modifier(Modifier::BOLD)
    }

    pub fn subtle(&self) -> Style {
        Style::default().fg(self.subtle)
    }

    pub fn text(&self) -> Style {
        Style::default().fg(self.text)
    }

    pub fn link(&self) -> Style {
        Style::default()
            .fg(self.links)
            .add_modifier(Modifier::UNDERLINED)
    }

    pub fn selected_link(&self) -> Style {
        Style::default()
            .fg(self.selection)
            .bg(LINK_BACKGROUND)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
    }

    pub fn mode_indicator(&self) -> Style {
        Style::default()
            .fg(STATUS_FOREGROUND)
            .bg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    pub fn status_fill(&self) -> Style {
        Style::default().bg(self.subtle)
    }

    pub fn status_message(&self) -> Style {
        Style::default()
            .fg(self.text)
            .bg(self.subtle)
            .add_modifier(Modifier::ITALIC)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_theme_parses() {
        let palette = Palette::from_theme(&Theme::default()).unwrap();
        assert_eq!(palette.primary, Color::Rgb(0x5f, 0x87, 0xff));
        assert_eq!(palette.selection, Color::Rgb(0xc6, 0x78, 0xdd));
    }

    #[test]
    fn test_named_colors_accepted() {
        let theme = Theme {
            accent: "magenta".to_string(),
            ..Theme::default()
        };
        let palette = Palette::from_theme(&theme).unwrap();
        assert_eq!(palette.accent, Color::Magenta);
    }

    #[test]
    fn test_bad_color_names_the_field() {
        let theme = Theme {
            links: "not-a-color".to_string(),
            ..Theme::default()
        };
        let err = Palette::from_theme(&theme).unwrap_err();
        assert_eq!(
            err,
            ThemeError::BadColor {
                field: "links",
                value: "not-a-color".to_string()
            }
        );
        assert!(err.to_string().contains("links"));
    }

    #[test]
    fn test_selected_link_differs_from_link() {
        let palette = Palette::from_theme(&Theme::default()).unwrap();
        assert_ne!(palette.link(), palette.selected_link());
        assert!(palette.active_tab().add_modifier.contains(Modifier::REVERSED));
        assert!(palette.inactive_tab().add_modifier.contains(Modifier::DIM));
    }
}
