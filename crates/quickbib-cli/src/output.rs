use std::io::Write;

use owo_colors::OwoColorize;
use quickbib_core::clipboard::ClipboardBackend;
use quickbib_core::{Clipboard, LookupResult, Osc52Clipboard, ResultSink, StatusKind, UpdateInfo};

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

/// Print one lookup outcome: records to `out`, problems to `err`.
///
/// `first` controls the blank separator line between records.
pub fn print_result(
    out: &mut dyn Write,
    err: &mut dyn Write,
    identifier: &str,
    result: &LookupResult,
    first: bool,
    color: ColorMode,
) -> std::io::Result<()> {
    match result {
        LookupResult::Found { bibtex } => {
            if !first {
                writeln!(out)?;
            }
            writeln!(out, "{}", bibtex.trim_end())?;
        }
        LookupResult::NotFound => {
            let msg = format!("{}: not found", identifier);
            if color.enabled() {
                writeln!(err, "{}", msg.yellow())?;
            } else {
                writeln!(err, "{}", msg)?;
            }
        }
        LookupResult::Errored { message } => {
            if color.enabled() {
                writeln!(err, "{}: {}", identifier.bold(), message.red())?;
            } else {
                writeln!(err, "{}: {}", identifier, message)?;
            }
        }
    }
    Ok(())
}

pub fn print_update(w: &mut dyn Write, info: &UpdateInfo, color: ColorMode) -> std::io::Result<()> {
    if info.available {
        let msg = format!(
            "A newer version is available: {} (running {})",
            info.latest,
            quickbib_core::APP_VERSION
        );
        if color.enabled() {
            writeln!(w, "{}", msg.green().bold())?;
            writeln!(w, "  {}", info.url.cyan())?;
        } else {
            writeln!(w, "{}", msg)?;
            writeln!(w, "  {}", info.url)?;
        }
    } else {
        writeln!(
            w,
            "{} {} is up to date.",
            quickbib_core::APP_NAME,
            quickbib_core::APP_VERSION
        )?;
    }
    Ok(())
}

/// Print the sink's status after a `--copy`, coloured by its kind.
pub fn print_copy_status(
    w: &mut dyn Write,
    sink: &ResultSink,
    color: ColorMode,
) -> std::io::Result<()> {
    let msg = sink.status();
    if !color.enabled() {
        return writeln!(w, "{}", msg);
    }
    match sink.status_kind() {
        StatusKind::Success => writeln!(w, "{}", msg.green()),
        StatusKind::Error => writeln!(w, "{}", msg.red()),
        _ => writeln!(w, "{}", msg.yellow()),
    }
}

/// Clipboard for the command line. The OSC 52 escape goes to `terminal`
/// so it never ends up in redirected records on stdout.
pub fn clipboard_for<W>(backend: ClipboardBackend, terminal: W) -> Box<dyn Clipboard>
where
    W: Write + Send + 'static,
{
    match backend {
        ClipboardBackend::Osc52 => Box::new(Osc52Clipboard::new(terminal)),
        ClipboardBackend::System => backend.build(),
    }
}
