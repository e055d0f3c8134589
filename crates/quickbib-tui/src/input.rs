use ratatui::crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind,
};

use crate::action::Action;
use crate::app::InputMode;

/// Map a crossterm terminal event to an action, respecting input mode.
pub fn map_event(event: &Event, input_mode: InputMode) -> Action {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => {
            let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
            // Ctrl+C always quits regardless of mode
            if ctrl && key.code == KeyCode::Char('c') {
                return Action::Quit;
            }
            if ctrl && key.code == KeyCode::Char('y') {
                return Action::Copy;
            }

            match key.code {
                KeyCode::F(1) => return Action::ToggleHelp,
                KeyCode::F(2) => return Action::ToggleAbout,
                KeyCode::F(5) => return Action::CheckUpdate,
                _ => {}
            }

            match input_mode {
                InputMode::Editing => map_key_editing(key),
                InputMode::Browsing => map_key_browsing(key),
                InputMode::Dialog => map_key_dialog(key),
            }
        }
        Event::Paste(text) if input_mode == InputMode::Editing => Action::Paste(text.clone()),
        Event::Mouse(mouse) if input_mode != InputMode::Dialog => map_mouse(mouse),
        Event::Resize(w, h) => Action::Resize(*w, *h),
        _ => Action::None,
    }
}

fn map_mouse(mouse: &MouseEvent) -> Action {
    match mouse.kind {
        MouseEventKind::ScrollDown => Action::ScrollDown,
        MouseEventKind::ScrollUp => Action::ScrollUp,
        _ => Action::None,
    }
}

fn map_key_editing(key: &KeyEvent) -> Action {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Enter => Action::Fetch,
        KeyCode::Tab | KeyCode::BackTab => Action::ToggleFocus,
        KeyCode::Esc => Action::Cancel,
        KeyCode::Char('u') if ctrl => Action::ClearInput,
        KeyCode::Char('a') if ctrl => Action::CursorHome,
        KeyCode::Char('e') if ctrl => Action::CursorEnd,
        KeyCode::Char(c) if !ctrl => Action::InputChar(c),
        KeyCode::Backspace => Action::Backspace,
        KeyCode::Delete => Action::DeleteForward,
        KeyCode::Left => Action::CursorLeft,
        KeyCode::Right => Action::CursorRight,
        KeyCode::Home => Action::CursorHome,
        KeyCode::End => Action::CursorEnd,
        KeyCode::PageDown => Action::PageDown,
        KeyCode::PageUp => Action::PageUp,
        _ => Action::None,
    }
}

fn map_key_browsing(key: &KeyEvent) -> Action {
    match key.code {
        KeyCode::Char('q') => Action::RequestQuit,
        KeyCode::Char('j') | KeyCode::Down => Action::ScrollDown,
        KeyCode::Char('k') | KeyCode::Up => Action::ScrollUp,
        KeyCode::PageDown | KeyCode::Char(' ') => Action::PageDown,
        KeyCode::PageUp => Action::PageUp,
        KeyCode::Char('g') | KeyCode::Home => Action::ScrollTop,
        KeyCode::Char('G') | KeyCode::End => Action::ScrollBottom,
        KeyCode::Char('y') => Action::Copy,
        KeyCode::Char('?') => Action::ToggleHelp,
        KeyCode::Char('u') => Action::CheckUpdate,
        KeyCode::Enter => Action::Fetch,
        KeyCode::Tab | KeyCode::BackTab => Action::ToggleFocus,
        KeyCode::Esc => Action::Cancel,
        _ => Action::None,
    }
}

fn map_key_dialog(key: &KeyEvent) -> Action {
    match key.code {
        KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('q') => Action::Confirm,
        KeyCode::Esc | KeyCode::Char('n') => Action::Cancel,
        KeyCode::Char('?') => Action::ToggleHelp,
        _ => Action::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn ctrl(c: char) -> Event {
        Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
    }

    #[test]
    fn typing_goes_to_the_input_line() {
        assert_eq!(
            map_event(&key(KeyCode::Char('q')), InputMode::Editing),
            Action::InputChar('q')
        );
        assert_eq!(
            map_event(&key(KeyCode::Char('?')), InputMode::Editing),
            Action::InputChar('?')
        );
    }

    #[test]
    fn letters_are_commands_in_the_record_pane() {
        assert_eq!(
            map_event(&key(KeyCode::Char('q')), InputMode::Browsing),
            Action::RequestQuit
        );
        assert_eq!(
            map_event(&key(KeyCode::Char('y')), InputMode::Browsing),
            Action::Copy
        );
        assert_eq!(
            map_event(&key(KeyCode::Char('j')), InputMode::Browsing),
            Action::ScrollDown
        );
    }

    #[test]
    fn global_keys_work_everywhere() {
        for mode in [InputMode::Editing, InputMode::Browsing, InputMode::Dialog] {
            assert_eq!(map_event(&ctrl('c'), mode), Action::Quit);
            assert_eq!(map_event(&ctrl('y'), mode), Action::Copy);
            assert_eq!(map_event(&key(KeyCode::F(1)), mode), Action::ToggleHelp);
        }
    }

    #[test]
    fn dialogs_confirm_and_cancel() {
        assert_eq!(
            map_event(&key(KeyCode::Enter), InputMode::Dialog),
            Action::Confirm
        );
        assert_eq!(
            map_event(&key(KeyCode::Esc), InputMode::Dialog),
            Action::Cancel
        );
    }

    #[test]
    fn paste_only_while_editing() {
        let paste = Event::Paste("10.1000/xyz".into());
        assert_eq!(
            map_event(&paste, InputMode::Editing),
            Action::Paste("10.1000/xyz".into())
        );
        assert_eq!(map_event(&paste, InputMode::Browsing), Action::None);
    }
}
