pub mod about;
pub mod help;
pub mod lookup;
pub mod quit_confirm;
pub mod update_prompt;

use ratatui::layout::{Constraint, Flex, Layout, Rect};

/// Spinner frames for animated progress indication.
const SPINNER_FRAMES: &[char] = &[
    '\u{280B}', '\u{2819}', '\u{2839}', '\u{2838}', '\u{283C}', '\u{2834}', '\u{2826}', '\u{2827}',
    '\u{2807}', '\u{280F}',
];

/// Get the current spinner character based on a tick counter.
pub fn spinner_char(tick: usize) -> char {
    SPINNER_FRAMES[tick % SPINNER_FRAMES.len()]
}

/// Create a centered rectangle of the given width (columns) and height (rows),
/// clipped to `area`.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .split(area);
    Layout::horizontal([Constraint::Length(width.min(area.width))])
        .flex(Flex::Center)
        .split(vertical[0])[0]
}

/// The part of `text` to show in a single-line box `width` columns wide so
/// that the cursor (a char index) stays visible. Returns the visible text and
/// the cursor column within it.
pub fn visible_window(text: &str, cursor_chars: usize, width: usize) -> (String, usize) {
    if width == 0 {
        return (String::new(), 0);
    }
    let offset = cursor_chars.saturating_sub(width - 1);
    let visible: String = text.chars().skip(offset).take(width).collect();
    (visible, cursor_chars - offset)
}
