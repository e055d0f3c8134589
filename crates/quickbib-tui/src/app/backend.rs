use quickbib_core::StatusKind;

use super::{App, Overlay};
use crate::tui_event::BackendEvent;

impl App {
    /// Process a backend event and update model state.
    pub fn handle_backend_event(&mut self, event: BackendEvent) {
        match event {
            BackendEvent::LookupFinished(completion) => {
                tracing::debug!(
                    id = completion.id,
                    found = completion.result.is_found(),
                    "showing lookup result"
                );
                // Whatever finished last is what the user sees.
                self.sink.on_result(completion.result);
                self.scroll = 0;
            }
            BackendEvent::UpdateChecked { result, silent } => {
                self.checking_update = false;
                match result {
                    Ok(info) if info.available => {
                        if !silent {
                            self.sink.set_status(
                                StatusKind::Info,
                                format!("Version {} is available.", info.latest),
                            );
                        }
                        // Don't cover a dialog the user already has open.
                        if self.overlay.is_none() || !silent {
                            self.overlay = Some(Overlay::UpdateAvailable(info));
                        }
                    }
                    Ok(info) => {
                        if !silent {
                            self.sink.set_status(
                                StatusKind::Info,
                                format!("You are running the latest version ({}).", info.latest),
                            );
                        }
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, silent, "update check failed");
                        if !silent {
                            self.sink
                                .set_status(StatusKind::Error, format!("Update check failed: {}", e));
                        }
                    }
                }
            }
            BackendEvent::Interrupted => {
                self.should_quit = true;
            }
        }
    }
}
