use quickbib_core::{LookupCompletion, UpdateInfo};

/// Events flowing from background tasks to the TUI.
#[derive(Debug, Clone)]
pub enum BackendEvent {
    /// A lookup submitted to the fetch coordinator has finished.
    LookupFinished(LookupCompletion),
    /// An update check finished. `silent` checks only speak up when a newer
    /// release exists.
    UpdateChecked {
        result: Result<UpdateInfo, String>,
        silent: bool,
    },
    /// SIGINT arrived outside the terminal's key handling.
    Interrupted,
}
