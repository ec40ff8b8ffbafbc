use ratatui::Frame;
use ratatui::layout::Rect;

/// A reusable UI component.
///
/// Components follow a props pattern:
/// - They receive data via props (struct fields), borrowed from the
///   session's state, content and palette.
/// - They render to a `Frame` within a given `Rect`.
/// - They never mutate navigation state; only `update()` does that.
///
/// # Mutability
///
/// `render` takes `&mut self` so a component may cache layout work during
/// the render pass. None of the current components need it, but the
/// signature matches ratatui's `StatefulWidget` convention.
pub trait Component {
    /// Render the component into the given area.
    fn render(&mut self, frame: &mut Frame, area: Rect);
}
