use std::sync::Arc;

use quickbib_core::{LookupRequest, StatusKind};

use super::{App, Focus, Overlay};
use crate::action::Action;
use crate::tui_event::BackendEvent;

impl App {
    /// Process a user action and update state. Returns true if the app should quit.
    pub fn update(&mut self, action: Action) -> bool {
        match action {
            Action::Quit => {
                self.should_quit = true;
                return true;
            }
            Action::Tick => {
                self.tick = self.tick.wrapping_add(1);
                return false;
            }
            Action::Resize(_w, h) => {
                // Header, input box, status line, footer and the pane border take eight rows.
                self.visible_rows = h.saturating_sub(8).max(1);
                return false;
            }
            _ => {}
        }

        if self.overlay.is_some() {
            self.update_overlay(action);
            return self.should_quit;
        }

        match action {
            Action::RequestQuit => self.overlay = Some(Overlay::QuitConfirm),
            Action::Cancel => self.focus = Focus::Input,
            Action::Confirm => {}
            Action::Fetch => self.fetch(),
            Action::Copy => {
                self.sink.copy_current_result(self.clipboard.as_ref());
            }
            Action::ToggleFocus => {
                self.focus = match self.focus {
                    Focus::Input => Focus::Record,
                    Focus::Record => Focus::Input,
                };
            }

            Action::InputChar(c) => self.insert_str(&c.to_string()),
            Action::Paste(text) => {
                // Identifiers are single-line; drop newlines from pasted text.
                let flat: String = text
                    .chars()
                    .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
                    .collect();
                self.insert_str(flat.trim());
            }
            Action::Backspace => {
                if let Some(prev) = self.prev_boundary() {
                    self.input.drain(prev..self.cursor);
                    self.cursor = prev;
                }
            }
            Action::DeleteForward => {
                if let Some(next) = self.next_boundary() {
                    self.input.drain(self.cursor..next);
                }
            }
            Action::CursorLeft => {
                if let Some(prev) = self.prev_boundary() {
                    self.cursor = prev;
                }
            }
            Action::CursorRight => {
                if let Some(next) = self.next_boundary() {
                    self.cursor = next;
                }
            }
            Action::CursorHome => self.cursor = 0,
            Action::CursorEnd => self.cursor = self.input.len(),
            Action::ClearInput => {
                self.input.clear();
                self.cursor = 0;
            }

            Action::ScrollDown => self.scroll = self.scroll.saturating_add(1).min(self.max_scroll()),
            Action::ScrollUp => self.scroll = self.scroll.saturating_sub(1),
            Action::PageDown => {
                self.scroll = self
                    .scroll
                    .saturating_add(self.visible_rows)
                    .min(self.max_scroll())
            }
            Action::PageUp => self.scroll = self.scroll.saturating_sub(self.visible_rows),
            Action::ScrollTop => self.scroll = 0,
            Action::ScrollBottom => self.scroll = self.max_scroll(),

            Action::ToggleHelp => self.overlay = Some(Overlay::Help),
            Action::ToggleAbout => self.overlay = Some(Overlay::About),
            Action::CheckUpdate => self.check_for_updates(false),

            Action::None | Action::Quit | Action::Tick | Action::Resize(..) => {}
        }
        false
    }

    fn update_overlay(&mut self, action: Action) {
        let Some(overlay) = self.overlay.clone() else {
            return;
        };
        match (overlay, action) {
            (Overlay::QuitConfirm, Action::Confirm) => self.should_quit = true,
            (Overlay::UpdateAvailable(info), Action::Confirm) => {
                self.overlay = None;
                match (self.open_url)(&info.url) {
                    Ok(()) => self
                        .sink
                        .set_status(StatusKind::Info, format!("Opened {}", info.url)),
                    Err(e) => {
                        tracing::warn!(url = %info.url, error = %e, "could not open browser");
                        self.sink.set_status(
                            StatusKind::Error,
                            format!("Could not open browser: {}", info.url),
                        );
                    }
                }
            }
            (Overlay::Help, Action::ToggleHelp) | (Overlay::About, Action::ToggleAbout) => {
                self.overlay = None
            }
            (_, Action::ToggleHelp) => self.overlay = Some(Overlay::Help),
            (_, Action::ToggleAbout) => self.overlay = Some(Overlay::About),
            (_, Action::Confirm | Action::Cancel | Action::RequestQuit) => self.overlay = None,
            _ => {}
        }
    }

    /// Submit the input line to the fetch coordinator.
    pub fn fetch(&mut self) {
        let identifier = self.input.trim().to_string();
        if !self.sink.begin_fetch(&identifier) {
            return;
        }
        self.scroll = 0;
        let id = self.coordinator.submit(LookupRequest::new(identifier));
        tracing::debug!(id, "fetch requested from input line");
    }

    /// Ask the update checker in the background. Silent checks stay quiet
    /// unless a newer release exists.
    pub fn check_for_updates(&mut self, silent: bool) {
        let Some(checker) = self.update_checker.as_ref().map(Arc::clone) else {
            return;
        };
        if self.checking_update {
            return;
        }
        self.checking_update = true;
        if !silent {
            self.sink
                .set_status(StatusKind::Pending, "Checking for updates...");
        }

        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            // A panicking checker surfaces as a JoinError, so a result is always sent.
            let result = match tokio::spawn(async move { checker.check().await }).await {
                Ok(checked) => checked.map_err(|e| e.to_string()),
                Err(e) => Err(format!("update checker crashed: {}", e)),
            };
            let _ = tx.send(BackendEvent::UpdateChecked { result, silent });
        });
    }

    fn insert_str(&mut self, text: &str) {
        self.input.insert_str(self.cursor, text);
        self.cursor += text.len();
    }

    fn prev_boundary(&self) -> Option<usize> {
        self.input[..self.cursor]
            .char_indices()
            .next_back()
            .map(|(i, _)| i)
    }

    fn next_boundary(&self) -> Option<usize> {
        self.input[self.cursor..]
            .chars()
            .next()
            .map(|c| self.cursor + c.len_utf8())
    }

    /// Whether the status line should animate.
    pub fn is_busy(&self) -> bool {
        self.sink.status_kind() == StatusKind::Pending || self.checking_update
    }
}
