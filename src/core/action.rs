//! # Actions
//!
//! Everything that can happen in a session becomes an `Action`.
//! User presses Tab? That's `Action::Key(Key::Tab)`.
//! Terminal resized? That's `Action::Resize(viewport)`.
//!
//! The `update()` function takes the current state and an action, mutates
//! the state, and returns the one `Effect` the controller has to carry out.
//! No side effects here. I/O happens elsewhere.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```
//!
//! Transition table:
//!
//! ```text
//!                  Welcome     Browse                 LinkSelect
//! timer / any key  → Browse    -                      -
//! quit             (any key)   Effect::Quit           Effect::Quit
//! tab              (any key)   → LinkSelect if links  → Browse
//! next / prev      (any key)   move section           move link
//! activate         (any key)   -                      Effect::OpenUrl
//! url opened       -           status                 status
//! resize           viewport    viewport               viewport
//! ```

use crate::core::content::Content;
use crate::core::state::{Mode, NavigationState, READY_STATUS, Viewport};

/// Logical keys, decoded from raw terminal input by the TUI layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Quit,
    Tab,
    Next,
    Prev,
    Activate,
    /// Any other key. Only meaningful on the welcome screen.
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Key(Key),
    /// The welcome banner's display time ran out.
    WelcomeElapsed,
    Resize(Viewport),
    /// A fire-and-forget URL open reported success.
    UrlOpened(String),
}

/// What the controller must do after an update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    Quit,
    /// Start an asynchronous open of this URL.
    OpenUrl(String),
}

pub fn update(state: &mut NavigationState, content: &Content, action: Action) -> Effect {
    match action {
        Action::Resize(viewport) => {
            state.viewport = viewport;
            Effect::None
        }
        Action::WelcomeElapsed => {
            if state.mode == Mode::Welcome {
                state.mode = Mode::Browse;
            }
            Effect::None
        }
        // Any key leaves the welcome screen, quit included.
        Action::Key(_) if state.mode == Mode::Welcome => {
            state.mode = Mode::Browse;
            Effect::None
        }
        Action::Key(key) => handle_key(state, content, key),
        Action::UrlOpened(url) => {
            if state.mode != Mode::Welcome {
                state.status_message = format!("Opened: {url}");
            }
            Effect::None
        }
    }
}

fn handle_key(state: &mut NavigationState, content: &Content, key: Key) -> Effect {
    match key {
        Key::Quit => Effect::Quit,
        Key::Tab => {
            toggle_link_mode(state, content);
            Effect::None
        }
        Key::Next if state.in_link_mode() => {
            let count = content.section(state.section_cursor).link_count();
            if state.link_cursor + 1 < count {
                state.link_cursor += 1;
                state.status_message = format!("Link {}/{}", state.link_cursor + 1, count);
            }
            Effect::None
        }
        Key::Prev if state.in_link_mode() => {
            if state.link_cursor > 0 {
                let count = content.section(state.section_cursor).link_count();
                state.link_cursor = (state.link_cursor - 1).min(count.saturating_sub(1));
                state.status_message = format!("Link {}/{}", state.link_cursor + 1, count);
            }
            Effect::None
        }
        Key::Next => {
            if state.section_cursor + 1 < content.section_count() {
                select_section(state, content, state.section_cursor + 1);
            }
            Effect::None
        }
        Key::Prev => {
            if state.section_cursor > 0 {
                select_section(state, content, state.section_cursor - 1);
            }
            Effect::None
        }
        Key::Activate if state.in_link_mode() => {
            let section = content.section(state.section_cursor);
            match section.links().get(state.link_cursor) {
                Some(link) => {
                    state.status_message = format!("Opening: {}", link.text);
                    Effect::OpenUrl(link.text.to_string())
                }
                None => Effect::None,
            }
        }
        Key::Activate | Key::Other => Effect::None,
    }
}

fn toggle_link_mode(state: &mut NavigationState, content: &Content) {
    let count = content.section(state.section_cursor).link_count();
    if count == 0 {
        return;
    }
    if state.in_link_mode() {
        state.mode = Mode::Browse;
        state.status_message = READY_STATUS.to_string();
    } else {
        state.mode = Mode::LinkSelect;
        if state.link_cursor >= count {
            state.link_cursor = 0;
        }
        state.status_message = format!("Links: {count}");
    }
}

fn select_section(state: &mut NavigationState, content: &Content, index: usize) {
    state.section_cursor = index;
    state.link_cursor = 0;
    state.mode = Mode::Browse;
    state.status_message = format!("Section: {}", content.section(index).title);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{links_content, scenario_content, test_state};

    fn press(state: &mut NavigationState, content: &Content, keys: &[Key]) -> Vec<Effect> {
        keys.iter()
            .map(|k| update(state, content, Action::Key(*k)))
            .collect()
    }

    #[test]
    fn test_any_key_leaves_welcome() {
        let content = scenario_content();
        for key in [Key::Quit, Key::Tab, Key::Next, Key::Activate, Key::Other] {
            let mut state = NavigationState::new(Viewport::new(80, 24));
            let effect = update(&mut state, &content, Action::Key(key));
            assert_eq!(effect, Effect::None, "{key:?} must not act on Welcome");
            assert_eq!(state.mode, Mode::Browse);
            assert_eq!(state.section_cursor, 0);
        }
    }

    #[test]
    fn test_timer_leaves_welcome_once() {
        let content = scenario_content();
        let mut state = NavigationState::new(Viewport::new(80, 24));
        update(&mut state, &content, Action::WelcomeElapsed);
        assert_eq!(state.mode, Mode::Browse);

        press(&mut state, &content, &[Key::Tab]);
        assert_eq!(state.mode, Mode::LinkSelect);
        // A late timer never drags the session back or out of link mode.
        update(&mut state, &content, Action::WelcomeElapsed);
        assert_eq!(state.mode, Mode::LinkSelect);
    }

    #[test]
    fn test_quit_outside_welcome() {
        let content = scenario_content();
        let mut state = test_state(Mode::Browse);
        assert_eq!(press(&mut state, &content, &[Key::Quit]), vec![Effect::Quit]);

        let mut state = test_state(Mode::Browse);
        press(&mut state, &content, &[Key::Tab]);
        assert_eq!(press(&mut state, &content, &[Key::Quit]), vec![Effect::Quit]);
    }

    #[test]
    fn test_single_link_scenario() {
        let content = scenario_content();
        let mut state = NavigationState::new(Viewport::new(80, 24));

        press(&mut state, &content, &[Key::Other]);
        assert_eq!(state.mode, Mode::Browse);
        assert_eq!(state.section_cursor, 0);

        press(&mut state, &content, &[Key::Tab]);
        assert_eq!(state.mode, Mode::LinkSelect);
        assert_eq!(state.link_cursor, 0);
        assert_eq!(state.status_message, "Links: 1");

        let effects = press(&mut state, &content, &[Key::Activate]);
        assert_eq!(
            effects,
            vec![Effect::OpenUrl("https://example.com".to_string())]
        );
        assert_eq!(state.status_message, "Opening: https://example.com");

        update(
            &mut state,
            &content,
            Action::UrlOpened("https://example.com".to_string()),
        );
        assert_eq!(state.status_message, "Opened: https://example.com");
    }

    #[test]
    fn test_two_section_scenario() {
        let content = links_content();
        let mut state = test_state(Mode::Browse);

        press(&mut state, &content, &[Key::Tab]);
        assert_eq!(state.mode, Mode::Browse, "no links: tab is a no-op");

        press(&mut state, &content, &[Key::Next]);
        assert_eq!(state.section_cursor, 1);
        assert_eq!(state.status_message, "Section: links");
        assert_eq!(content.section(1).link_count(), 2);

        press(&mut state, &content, &[Key::Tab]);
        assert_eq!(state.mode, Mode::LinkSelect);

        press(&mut state, &content, &[Key::Next]);
        assert_eq!(state.link_cursor, 1);
        assert_eq!(state.status_message, "Link 2/2");

        press(&mut state, &content, &[Key::Prev]);
        assert_eq!(state.link_cursor, 0);
        assert_eq!(state.status_message, "Link 1/2");
    }

    #[test]
    fn test_tab_twice_restores_mode_and_cursor() {
        let content = links_content();
        let mut state = test_state(Mode::Browse);
        press(&mut state, &content, &[Key::Next, Key::Tab, Key::Next]);
        assert_eq!(state.link_cursor, 1);

        press(&mut state, &content, &[Key::Tab]);
        assert_eq!(state.mode, Mode::Browse);
        assert_eq!(state.status_message, "Ready");

        press(&mut state, &content, &[Key::Tab]);
        assert_eq!(state.mode, Mode::LinkSelect);
        assert_eq!(state.link_cursor, 1);
    }

    #[test]
    fn test_out_of_range_link_cursor_resets_on_entry() {
        let content = links_content();
        let mut state = test_state(Mode::Browse);
        state.section_cursor = 1;
        state.link_cursor = 7;

        press(&mut state, &content, &[Key::Tab]);
        assert_eq!(state.mode, Mode::LinkSelect);
        assert_eq!(state.link_cursor, 0);
    }

    #[test]
    fn test_section_change_leaves_link_mode() {
        let content = links_content();
        let mut state = test_state(Mode::Browse);
        state.section_cursor = 1;
        press(&mut state, &content, &[Key::Tab, Key::Next]);
        assert_eq!(state.mode, Mode::LinkSelect);

        // In link mode, up/down move links; leaving to Browse then moving
        // sections must reset link selection.
        press(&mut state, &content, &[Key::Tab, Key::Prev]);
        assert_eq!(state.section_cursor, 0);
        assert_eq!(state.mode, Mode::Browse);
        assert_eq!(state.link_cursor, 0);
    }

    #[test]
    fn test_cursors_clamp_without_wraparound() {
        let content = links_content();
        let mut state = test_state(Mode::Browse);

        press(&mut state, &content, &[Key::Prev, Key::Prev]);
        assert_eq!(state.section_cursor, 0);

        press(&mut state, &content, &[Key::Next; 5]);
        assert_eq!(state.section_cursor, content.section_count() - 1);

        press(&mut state, &content, &[Key::Tab]);
        press(&mut state, &content, &[Key::Next; 5]);
        assert_eq!(state.link_cursor, 1);
        press(&mut state, &content, &[Key::Prev; 5]);
        assert_eq!(state.link_cursor, 0);
    }

    #[test]
    fn test_cursor_bounds_hold_for_mixed_sequences() {
        let content = links_content();
        let keys = [Key::Next, Key::Prev, Key::Tab, Key::Activate, Key::Other];
        // Deterministic pseudo-random walk over the key set.
        let mut seed: u32 = 0x9e37_79b9;
        let mut state = test_state(Mode::Browse);
        for _ in 0..500 {
            seed ^= seed << 13;
            seed ^= seed >> 17;
            seed ^= seed << 5;
            let key = keys[(seed % keys.len() as u32) as usize];
            update(&mut state, &content, Action::Key(key));

            assert!(state.section_cursor < content.section_count());
            if state.in_link_mode() {
                let count = content.section(state.section_cursor).link_count();
                assert!(count > 0);
                assert!(state.link_cursor < count);
            }
        }
    }

    #[test]
    fn test_activate_in_browse_is_noop() {
        let content = scenario_content();
        let mut state = test_state(Mode::Browse);
        assert_eq!(press(&mut state, &content, &[Key::Activate]), vec![Effect::None]);
        assert_eq!(state.status_message, "Ready");
    }

    #[test]
    fn test_activate_picks_duplicate_by_position() {
        let content = crate::core::content::Content::new(
            "dups",
            vec![crate::core::content::Section::new(
                "d",
                &["https://same.example https://same.example https://other.example"],
            )],
            Default::default(),
        )
        .unwrap();
        let mut state = test_state(Mode::Browse);
        press(&mut state, &content, &[Key::Tab, Key::Next, Key::Next]);
        assert_eq!(state.link_cursor, 2);
        assert_eq!(
            press(&mut state, &content, &[Key::Activate]),
            vec![Effect::OpenUrl("https://other.example".to_string())]
        );
    }

    #[test]
    fn test_resize_only_touches_viewport() {
        let content = links_content();
        let mut state = test_state(Mode::Browse);
        press(&mut state, &content, &[Key::Next, Key::Tab, Key::Next]);
        let before = state.clone();

        update(&mut state, &content, Action::Resize(Viewport::new(40, 10)));
        assert_eq!(state.viewport, Viewport::new(40, 10));
        assert_eq!(state.section_cursor, before.section_cursor);
        assert_eq!(state.link_cursor, before.link_cursor);
        assert_eq!(state.mode, before.mode);
        assert_eq!(state.status_message, before.status_message);
    }

    #[test]
    fn test_resize_during_welcome() {
        let content = scenario_content();
        let mut state = NavigationState::new(Viewport::new(80, 24));
        update(&mut state, &content, Action::Resize(Viewport::new(100, 30)));
        assert_eq!(state.mode, Mode::Welcome);
        assert_eq!(state.viewport, Viewport::new(100, 30));
    }
}
