/// Everything the user can ask the app to do, after key mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    None,
    Tick,
    Resize(u16, u16),
    /// Leave immediately (Ctrl+C).
    Quit,
    /// Ask before leaving.
    RequestQuit,
    /// Accept the open dialog.
    Confirm,
    /// Dismiss the open dialog, or return focus to the input line.
    Cancel,

    Fetch,
    Copy,
    ToggleFocus,

    // Input line editing
    InputChar(char),
    Paste(String),
    Backspace,
    DeleteForward,
    CursorLeft,
    CursorRight,
    CursorHome,
    CursorEnd,
    ClearInput,

    // Record pane
    ScrollDown,
    ScrollUp,
    PageDown,
    PageUp,
    ScrollTop,
    ScrollBottom,

    ToggleHelp,
    ToggleAbout,
    CheckUpdate,
}
