mod backend;
mod update;

use std::sync::Arc;

use ratatui::layout::Rect;
use ratatui::widgets::{Paragraph, Wrap};
use tokio::sync::mpsc;

use quickbib_core::{Clipboard, FetchCoordinator, ResultSink, UpdateChecker, UpdateInfo};

use crate::theme::Theme;
use crate::tui_event::BackendEvent;

/// Which part of the main screen receives keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Input,
    Record,
}

/// Popups drawn over the main screen. At most one is open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Overlay {
    Help,
    About,
    UpdateAvailable(UpdateInfo),
    QuitConfirm,
}

/// Input mode determines how keyboard input is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Editing,
    Browsing,
    Dialog,
}

/// Opens a URL in the user's browser.
pub type UrlOpener = fn(&str) -> std::io::Result<()>;

fn open_in_browser(url: &str) -> std::io::Result<()> {
    open::that(url)
}

/// Main application state.
pub struct App {
    /// Identifier being typed.
    pub input: String,
    /// Byte offset of the cursor in `input`.
    pub cursor: usize,
    pub focus: Focus,
    pub overlay: Option<Overlay>,
    pub sink: ResultSink,
    /// First visible line of the record pane.
    pub scroll: u16,
    /// Height of the record pane interior (set during draw, used for paging).
    pub visible_rows: u16,
    /// Width of the record pane interior, for counting wrapped lines.
    pub record_width: u16,
    pub tick: usize,
    pub theme: Theme,
    pub should_quit: bool,
    /// An update check is running.
    pub checking_update: bool,

    coordinator: FetchCoordinator,
    clipboard: Box<dyn Clipboard>,
    update_checker: Option<Arc<dyn UpdateChecker>>,
    event_tx: mpsc::UnboundedSender<BackendEvent>,
    open_url: UrlOpener,
}

impl App {
    pub fn new(
        theme: Theme,
        coordinator: FetchCoordinator,
        clipboard: Box<dyn Clipboard>,
        update_checker: Option<Arc<dyn UpdateChecker>>,
        event_tx: mpsc::UnboundedSender<BackendEvent>,
    ) -> Self {
        Self {
            input: String::new(),
            cursor: 0,
            focus: Focus::Input,
            overlay: None,
            sink: ResultSink::new(),
            scroll: 0,
            visible_rows: 10,
            record_width: 80,
            tick: 0,
            theme,
            should_quit: false,
            checking_update: false,
            coordinator,
            clipboard,
            update_checker,
            event_tx,
            open_url: open_in_browser,
        }
    }

    /// Replace the browser launcher.
    #[cfg(test)]
    pub(crate) fn with_url_opener(mut self, open_url: UrlOpener) -> Self {
        self.open_url = open_url;
        self
    }

    pub fn input_mode(&self) -> InputMode {
        if self.overlay.is_some() {
            InputMode::Dialog
        } else if self.focus == Focus::Input {
            InputMode::Editing
        } else {
            InputMode::Browsing
        }
    }

    /// Whether update checks are offered at all.
    pub fn can_check_updates(&self) -> bool {
        self.update_checker.is_some()
    }

    /// Lookups submitted but not yet reported.
    pub fn in_flight(&self) -> usize {
        self.coordinator.in_flight()
    }

    /// Put `text` in the input line with the cursor at its end.
    pub fn set_input(&mut self, text: &str) {
        self.input = text.trim().to_string();
        self.cursor = self.input.len();
    }

    /// Rows the record occupies once wrapped to the pane width.
    pub(crate) fn record_line_count(&self) -> u16 {
        let citation = self.sink.citation();
        if citation.is_empty() {
            return 0;
        }
        let rows = Paragraph::new(citation)
            .wrap(Wrap { trim: false })
            .line_count(self.record_width.max(1));
        u16::try_from(rows).unwrap_or(u16::MAX)
    }

    pub(crate) fn max_scroll(&self) -> u16 {
        self.record_line_count().saturating_sub(self.visible_rows)
    }

    pub fn view(&mut self, f: &mut ratatui::Frame) {
        let area = f.area();
        let record_area: Rect = crate::view::lookup::render(f, self, area);
        // Borders take two rows and two columns.
        self.visible_rows = record_area.height.saturating_sub(2).max(1);
        self.record_width = record_area.width.saturating_sub(2).max(1);
        self.scroll = self.scroll.min(self.max_scroll());

        match &self.overlay {
            Some(Overlay::Help) => {
                crate::view::help::render(f, &self.theme, self.can_check_updates())
            }
            Some(Overlay::About) => crate::view::about::render(f, &self.theme),
            Some(Overlay::UpdateAvailable(info)) => {
                crate::view::update_prompt::render(f, &self.theme, info)
            }
            Some(Overlay::QuitConfirm) => crate::view::quit_confirm::render(f, &self.theme),
            None => {}
        }
    }
}

#[cfg(test)]
mod tests;
