//! Display state for lookup results: the current citation text and a status line.

use crate::LookupResult;
use crate::clipboard::Clipboard;

pub const STATUS_FETCHING: &str = "Fetching BibTeX...";
pub const STATUS_FOUND: &str = "Fetched successfully.";
pub const STATUS_NOT_FOUND: &str = "Not found: no BibTeX record for this identifier.";
pub const STATUS_EMPTY_INPUT: &str = "Please enter a DOI.";
pub const STATUS_COPIED: &str = "Copied to clipboard!";
pub const STATUS_COPY_FAILED: &str = "Failed to copy to clipboard.";
pub const STATUS_NOTHING_TO_COPY: &str = "Nothing to copy.";

/// Category of the current status message, used for colouring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Idle,
    Pending,
    Success,
    NotFound,
    Error,
    Info,
}

/// Receives lookup outcomes and owns what the user currently sees.
#[derive(Debug, Clone)]
pub struct ResultSink {
    citation: String,
    status: String,
    kind: StatusKind,
}

impl Default for ResultSink {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultSink {
    pub fn new() -> Self {
        Self {
            citation: String::new(),
            status: String::new(),
            kind: StatusKind::Idle,
        }
    }

    /// The displayed BibTeX text (empty when nothing is shown).
    pub fn citation(&self) -> &str {
        &self.citation
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn status_kind(&self) -> StatusKind {
        self.kind
    }

    pub fn set_status(&mut self, kind: StatusKind, text: impl Into<String>) {
        self.kind = kind;
        self.status = text.into();
    }

    /// Prepare for a new fetch. Returns `false` (and says so in the status)
    /// when the identifier is blank and no fetch should be submitted.
    pub fn begin_fetch(&mut self, identifier: &str) -> bool {
        if identifier.trim().is_empty() {
            self.set_status(StatusKind::Info, STATUS_EMPTY_INPUT);
            return false;
        }
        self.citation.clear();
        self.set_status(StatusKind::Pending, STATUS_FETCHING);
        true
    }

    /// Apply a completed lookup. Later calls overwrite earlier ones.
    pub fn on_result(&mut self, result: LookupResult) {
        match result {
            LookupResult::Found { bibtex } => {
                self.citation = bibtex;
                self.set_status(StatusKind::Success, STATUS_FOUND);
            }
            LookupResult::NotFound => {
                self.citation.clear();
                self.set_status(StatusKind::NotFound, STATUS_NOT_FOUND);
            }
            LookupResult::Errored { message } => {
                self.citation.clear();
                self.set_status(StatusKind::Error, format!("Error: {}", message));
            }
        }
    }

    /// Copy the displayed citation. Returns whether the clipboard accepted it;
    /// an empty display never touches the clipboard.
    pub fn copy_current_result(&mut self, clipboard: &dyn Clipboard) -> bool {
        if self.citation.trim().is_empty() {
            self.set_status(StatusKind::Info, STATUS_NOTHING_TO_COPY);
            return false;
        }
        match clipboard.set_text(&self.citation) {
            Ok(()) => {
                self.set_status(StatusKind::Success, STATUS_COPIED);
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "clipboard write failed");
                self.set_status(StatusKind::Error, STATUS_COPY_FAILED);
                false
            }
        }
    }
}
