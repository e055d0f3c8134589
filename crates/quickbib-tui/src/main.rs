use std::io;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use ratatui::Terminal;
use ratatui::crossterm::event;
use ratatui::crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use ratatui::crossterm::execute;
use ratatui::crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::prelude::CrosstermBackend;
use tokio::sync::mpsc;

use quickbib_core::config_file;
use quickbib_core::{FetchCoordinator, GithubReleaseChecker, HttpResolver, UpdateChecker};

mod action;
mod app;
mod input;
mod theme;
mod tui_event;
mod view;

use app::App;
use tui_event::BackendEvent;

/// QuickBib - BibTeX from DOIs, arXiv IDs, journal URLs and titles.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Identifier to fetch at startup
    identifier: Option<String>,

    /// Color theme: hacker (default) or modern
    #[arg(long)]
    theme: Option<String>,

    /// Skip the startup update check
    #[arg(long)]
    no_update_check: bool,
}

/// Log to a daily file under the platform data dir; stdout belongs to the UI.
fn init_logging() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let dir = dirs::data_dir()?.join("quickbib").join("logs");
    std::fs::create_dir_all(&dir).ok()?;
    let appender = tracing_appender::rolling::daily(dir, "quickbib.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();
    Some(guard)
}

fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(
        io::stdout(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableBracketedPaste
    )
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    let _log_guard = init_logging();

    let config = config_file::load_config();
    let theme_name = args
        .theme
        .as_deref()
        .or(config.theme())
        .unwrap_or("hacker");
    let theme = theme::Theme::from_name(theme_name);

    let resolver = HttpResolver::new(config.resolver_config())?;
    let (done_tx, mut done_rx) = mpsc::unbounded_channel();
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let coordinator = FetchCoordinator::new(Arc::new(resolver), done_tx);

    let update_checker: Option<Arc<dyn UpdateChecker>> = if config.updates_enabled() {
        match GithubReleaseChecker::new(config.update_repo(), Duration::from_secs(10)) {
            Ok(checker) => Some(Arc::new(checker)),
            Err(e) => {
                tracing::warn!(error = %e, "update checks unavailable");
                None
            }
        }
    } else {
        None
    };

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste
    )?;

    // Restore the terminal only when the UI thread itself panics. Lookup
    // workers run on other threads and their panics are reported as errors.
    let ui_thread = std::thread::current().id();
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        if std::thread::current().id() == ui_thread {
            let _ = restore_terminal();
            original_hook(panic_info);
        } else {
            tracing::error!(%panic_info, "background task panicked");
        }
    }));

    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    // Drain any stray input events (e.g. Enter keypress from launching the command)
    while event::poll(Duration::from_millis(50)).unwrap_or(false) {
        let _ = event::read();
    }

    let mut app = App::new(
        theme,
        coordinator,
        config.clipboard_backend().build(),
        update_checker,
        event_tx.clone(),
    );

    if let Some(identifier) = args.identifier.as_deref() {
        app.set_input(identifier);
        app.fetch();
    }
    if !args.no_update_check && config.check_updates_on_startup() {
        app.check_for_updates(true);
    }

    let event_tx_for_signal = event_tx.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = event_tx_for_signal.send(BackendEvent::Interrupted);
        }
    });

    tracing::info!(version = quickbib_core::APP_VERSION, "started");

    // Main event loop
    let tick_rate = Duration::from_millis(80);

    loop {
        terminal.draw(|f| app.view(f))?;

        tokio::select! {
            Some(completion) = done_rx.recv() => {
                app.handle_backend_event(BackendEvent::LookupFinished(completion));
                while let Ok(completion) = done_rx.try_recv() {
                    app.handle_backend_event(BackendEvent::LookupFinished(completion));
                }
            }
            Some(backend_event) = event_rx.recv() => {
                app.handle_backend_event(backend_event);
            }
            // Terminal input events
            _ = async {
                if event::poll(tick_rate).unwrap_or(false) {
                    while let Ok(evt) = event::read() {
                        let action = input::map_event(&evt, app.input_mode());
                        app.update(action);
                        if !event::poll(Duration::ZERO).unwrap_or(false) {
                            break;
                        }
                    }
                }
            } => {}
        }

        app.update(action::Action::Tick);

        if app.should_quit {
            break;
        }
    }

    restore_terminal()?;
    terminal.show_cursor()?;

    let pending = app.in_flight();
    if pending > 0 {
        tracing::info!(pending, "exiting with lookups still running");
    }
    Ok(())
}
