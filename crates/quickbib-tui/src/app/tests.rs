use std::sync::{Arc, Mutex};

use quickbib_core::resolver::mock::{MockResolver, MockResponse};
use quickbib_core::sink::{STATUS_COPIED, STATUS_EMPTY_INPUT, STATUS_FOUND, STATUS_NOTHING_TO_COPY};
use quickbib_core::update::UpdateFuture;
use quickbib_core::{
    ClipboardError, LookupCompletion, LookupRequest, LookupResult, StatusKind, UpdateError,
};
use tokio::sync::mpsc;

use super::*;
use crate::action::Action;

/// Clipboard that records writes into a shared buffer.
struct SharedClipboard(Arc<Mutex<Vec<String>>>);

impl Clipboard for SharedClipboard {
    fn set_text(&self, text: &str) -> Result<(), ClipboardError> {
        self.0.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

/// Update checker with a canned answer.
struct FixedChecker(Option<UpdateInfo>);

impl UpdateChecker for FixedChecker {
    fn check(&self) -> UpdateFuture<'_> {
        let answer = self.0.clone();
        Box::pin(async move { answer.ok_or(UpdateError::MissingVersion) })
    }
}

/// Update checker that panics when asked.
struct PanickingChecker;

impl UpdateChecker for PanickingChecker {
    fn check(&self) -> UpdateFuture<'_> {
        panic!("release feed exploded")
    }
}

struct Harness {
    app: App,
    done_rx: mpsc::UnboundedReceiver<LookupCompletion>,
    event_rx: mpsc::UnboundedReceiver<BackendEvent>,
    resolver: Arc<MockResolver>,
    copied: Arc<Mutex<Vec<String>>>,
}

/// Build an App around a mock resolver. Must run inside a tokio runtime.
fn harness(response: MockResponse, checker: Option<Arc<dyn UpdateChecker>>) -> Harness {
    let resolver = Arc::new(MockResolver::new(response));
    let (done_tx, done_rx) = mpsc::unbounded_channel();
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let coordinator = FetchCoordinator::new(resolver.clone(), done_tx);
    let copied = Arc::new(Mutex::new(Vec::new()));
    let app = App::new(
        Theme::hacker(),
        coordinator,
        Box::new(SharedClipboard(copied.clone())),
        checker,
        event_tx,
    )
    .with_url_opener(|_| Ok(()));
    Harness {
        app,
        done_rx,
        event_rx,
        resolver,
        copied,
    }
}

fn type_text(app: &mut App, text: &str) {
    for c in text.chars() {
        app.update(Action::InputChar(c));
    }
}

fn found(bibtex: &str) -> BackendEvent {
    BackendEvent::LookupFinished(LookupCompletion {
        id: 1,
        request: LookupRequest::new("x"),
        result: LookupResult::Found {
            bibtex: bibtex.to_string(),
        },
    })
}

// ── Fetching ───────────────────────────────────────────────────

#[tokio::test]
async fn blank_input_is_not_submitted() {
    let mut h = harness(MockResponse::Empty, None);
    type_text(&mut h.app, "   ");
    h.app.update(Action::Fetch);

    assert_eq!(h.app.sink.status(), STATUS_EMPTY_INPUT);
    h.app.coordinator.shutdown().await;
    assert_eq!(h.resolver.call_count(), 0);
}

#[tokio::test]
async fn fetch_shows_pending_then_record() {
    let mut h = harness(MockResponse::Record("@article{a,}".into()), None);
    type_text(&mut h.app, "10.1000/abc");
    h.app.update(Action::Fetch);
    assert!(h.app.is_busy());

    let completion = h.done_rx.recv().await.unwrap();
    assert_eq!(completion.request.identifier, "10.1000/abc");
    h.app
        .handle_backend_event(BackendEvent::LookupFinished(completion));

    assert_eq!(h.app.sink.citation(), "@article{a,}");
    assert_eq!(h.app.sink.status(), STATUS_FOUND);
    assert!(!h.app.is_busy());
}

#[tokio::test]
async fn startup_identifier_is_trimmed_and_fetched() {
    let mut h = harness(MockResponse::Empty, None);
    h.app.set_input("  arXiv:1706.03762 ");
    h.app.fetch();

    let completion = h.done_rx.recv().await.unwrap();
    assert_eq!(completion.request.identifier, "arXiv:1706.03762");
    h.app
        .handle_backend_event(BackendEvent::LookupFinished(completion));
    assert_eq!(h.app.sink.status_kind(), StatusKind::NotFound);
}

#[tokio::test]
async fn last_delivered_result_wins() {
    let mut h = harness(MockResponse::Empty, None);
    h.app.handle_backend_event(found("@misc{first,}"));
    h.app.handle_backend_event(found("@misc{second,}"));
    assert_eq!(h.app.sink.citation(), "@misc{second,}");
}

// ── Clipboard ──────────────────────────────────────────────────

#[tokio::test]
async fn copy_sends_displayed_record() {
    let mut h = harness(MockResponse::Empty, None);
    h.app.handle_backend_event(found("@misc{x,}"));
    h.app.update(Action::Copy);

    assert_eq!(*h.copied.lock().unwrap(), vec!["@misc{x,}".to_string()]);
    assert_eq!(h.app.sink.status(), STATUS_COPIED);
}

#[tokio::test]
async fn copy_with_nothing_shown_leaves_clipboard_alone() {
    let mut h = harness(MockResponse::Empty, None);
    h.app.update(Action::Copy);

    assert!(h.copied.lock().unwrap().is_empty());
    assert_eq!(h.app.sink.status(), STATUS_NOTHING_TO_COPY);
}

// ── Input line ─────────────────────────────────────────────────

#[tokio::test]
async fn editing_moves_by_characters() {
    let mut h = harness(MockResponse::Empty, None);
    type_text(&mut h.app, "aé");
    h.app.update(Action::CursorLeft);
    h.app.update(Action::InputChar('b'));
    assert_eq!(h.app.input, "abé");

    h.app.update(Action::CursorEnd);
    h.app.update(Action::Backspace);
    assert_eq!(h.app.input, "ab");

    h.app.update(Action::CursorHome);
    h.app.update(Action::DeleteForward);
    assert_eq!(h.app.input, "b");
    assert_eq!(h.app.cursor, 0);
}

#[tokio::test]
async fn paste_flattens_newlines() {
    let mut h = harness(MockResponse::Empty, None);
    h.app
        .update(Action::Paste("Projected\nTopological Branes\n".into()));
    assert_eq!(h.app.input, "Projected Topological Branes");
}

// ── Focus, dialogs and quitting ────────────────────────────────

#[tokio::test]
async fn quit_asks_for_confirmation() {
    let mut h = harness(MockResponse::Empty, None);
    h.app.update(Action::ToggleFocus);
    assert_eq!(h.app.input_mode(), InputMode::Browsing);

    h.app.update(Action::RequestQuit);
    assert_eq!(h.app.overlay, Some(Overlay::QuitConfirm));
    assert_eq!(h.app.input_mode(), InputMode::Dialog);

    h.app.update(Action::Cancel);
    assert!(h.app.overlay.is_none());
    assert!(!h.app.should_quit);

    h.app.update(Action::RequestQuit);
    assert!(h.app.update(Action::Confirm));
    assert!(h.app.should_quit);
}

#[tokio::test]
async fn ctrl_c_quits_from_anywhere() {
    let mut h = harness(MockResponse::Empty, None);
    h.app.update(Action::ToggleHelp);
    assert!(h.app.update(Action::Quit));
}

#[tokio::test]
async fn help_and_about_toggle() {
    let mut h = harness(MockResponse::Empty, None);
    h.app.update(Action::ToggleHelp);
    assert_eq!(h.app.overlay, Some(Overlay::Help));
    h.app.update(Action::ToggleAbout);
    assert_eq!(h.app.overlay, Some(Overlay::About));
    h.app.update(Action::ToggleAbout);
    assert!(h.app.overlay.is_none());
}

#[tokio::test]
async fn dialogs_swallow_editing_keys() {
    let mut h = harness(MockResponse::Empty, None);
    h.app.update(Action::ToggleHelp);
    h.app.update(Action::InputChar('x'));
    assert!(h.app.input.is_empty());
}

// ── Scrolling ──────────────────────────────────────────────────

#[tokio::test]
async fn scroll_is_clamped_to_record_length() {
    let mut h = harness(MockResponse::Empty, None);
    let record = (0..30)
        .map(|i| format!("  f{i} = {{{i}}},"))
        .collect::<Vec<_>>()
        .join("\n");
    h.app.handle_backend_event(found(&record));
    h.app.visible_rows = 10;

    h.app.update(Action::ScrollBottom);
    assert_eq!(h.app.scroll, 20);
    h.app.update(Action::ScrollDown);
    assert_eq!(h.app.scroll, 20);
    h.app.update(Action::PageUp);
    assert_eq!(h.app.scroll, 10);
    h.app.update(Action::ScrollTop);
    assert_eq!(h.app.scroll, 0);
    h.app.update(Action::ScrollUp);
    assert_eq!(h.app.scroll, 0);
}

#[tokio::test]
async fn long_record_lines_wrap_into_view() {
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    let mut h = harness(MockResponse::Empty, None);
    let record = format!("@article{{k, title={{{}}}, TAILMARK={{x}}}}", "word ".repeat(20));
    h.app.handle_backend_event(found(&record));

    let mut terminal = Terminal::new(TestBackend::new(60, 20)).unwrap();
    terminal.draw(|f| h.app.view(f)).unwrap();

    let screen: String = terminal
        .backend()
        .buffer()
        .content()
        .iter()
        .map(|cell| cell.symbol())
        .collect();
    assert!(screen.contains("TAILMARK"));
    assert_eq!(h.app.record_width, 58);
}

#[tokio::test]
async fn scrolling_counts_wrapped_rows() {
    let mut h = harness(MockResponse::Empty, None);
    h.app.handle_backend_event(found(&"a".repeat(100)));
    h.app.record_width = 20;
    h.app.visible_rows = 2;

    assert_eq!(h.app.record_line_count(), 5);
    h.app.update(Action::ScrollBottom);
    assert_eq!(h.app.scroll, 3);
}

#[tokio::test]
async fn new_result_resets_scroll() {
    let mut h = harness(MockResponse::Empty, None);
    h.app.scroll = 5;
    h.app.handle_backend_event(found("@misc{x,}"));
    assert_eq!(h.app.scroll, 0);
}

// ── Update checks ──────────────────────────────────────────────

#[tokio::test]
async fn update_check_is_inert_without_capability() {
    let mut h = harness(MockResponse::Empty, None);
    assert!(!h.app.can_check_updates());
    h.app.update(Action::CheckUpdate);
    assert!(!h.app.checking_update);
    assert!(h.event_rx.try_recv().is_err());
}

#[tokio::test]
async fn available_update_prompts_and_opens_release_page() {
    let info = UpdateInfo {
        available: true,
        latest: "99.0.0".into(),
        url: "https://example.org/releases/99".into(),
    };
    let checker: Arc<dyn UpdateChecker> = Arc::new(FixedChecker(Some(info.clone())));
    let mut h = harness(MockResponse::Empty, Some(checker));

    h.app.update(Action::CheckUpdate);
    assert!(h.app.checking_update);
    let event = h.event_rx.recv().await.unwrap();
    h.app.handle_backend_event(event);

    assert!(!h.app.checking_update);
    assert_eq!(h.app.overlay, Some(Overlay::UpdateAvailable(info)));

    h.app.update(Action::Confirm);
    assert!(h.app.overlay.is_none());
    assert!(h.app.sink.status().contains("https://example.org/releases/99"));
}

#[tokio::test]
async fn silent_check_stays_quiet_when_current() {
    let info = UpdateInfo {
        available: false,
        latest: "0.0.1".into(),
        url: String::new(),
    };
    let checker: Arc<dyn UpdateChecker> = Arc::new(FixedChecker(Some(info)));
    let mut h = harness(MockResponse::Empty, Some(checker));

    h.app.check_for_updates(true);
    let event = h.event_rx.recv().await.unwrap();
    h.app.handle_backend_event(event);

    assert!(h.app.overlay.is_none());
    assert_eq!(h.app.sink.status(), "");
}

#[tokio::test]
async fn failed_manual_check_reports_error() {
    let checker: Arc<dyn UpdateChecker> = Arc::new(FixedChecker(None));
    let mut h = harness(MockResponse::Empty, Some(checker));

    h.app.update(Action::CheckUpdate);
    let event = h.event_rx.recv().await.unwrap();
    h.app.handle_backend_event(event);

    assert_eq!(h.app.sink.status_kind(), StatusKind::Error);
    assert!(h.app.sink.status().starts_with("Update check failed"));
}

#[tokio::test]
async fn panicking_check_reports_and_allows_retry() {
    let checker: Arc<dyn UpdateChecker> = Arc::new(PanickingChecker);
    let mut h = harness(MockResponse::Empty, Some(checker));

    h.app.update(Action::CheckUpdate);
    let event = h.event_rx.recv().await.unwrap();
    h.app.handle_backend_event(event);

    assert!(!h.app.checking_update);
    assert_eq!(h.app.sink.status_kind(), StatusKind::Error);
    assert!(h.app.sink.status().starts_with("Update check failed"));

    h.app.update(Action::CheckUpdate);
    assert!(h.app.checking_update);
    let event = h.event_rx.recv().await.unwrap();
    h.app.handle_backend_event(event);
    assert!(!h.app.checking_update);
}
