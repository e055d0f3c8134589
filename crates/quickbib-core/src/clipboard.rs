//! Clipboard primitives: the desktop clipboard, or an OSC 52 escape for
//! terminals that are not on the same machine as the clipboard.

use std::io::Write;
use std::sync::Mutex;

use base64::Engine;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClipboardError {
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),
    #[error("clipboard write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// The "set clipboard text" primitive.
pub trait Clipboard: Send + Sync {
    fn set_text(&self, text: &str) -> Result<(), ClipboardError>;
}

/// Which clipboard implementation to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClipboardBackend {
    #[default]
    System,
    Osc52,
}

impl ClipboardBackend {
    /// Parse a config value; unknown names fall back to the system clipboard.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "osc52" | "osc-52" | "terminal" => ClipboardBackend::Osc52,
            _ => ClipboardBackend::System,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ClipboardBackend::System => "system",
            ClipboardBackend::Osc52 => "osc52",
        }
    }

    pub fn build(self) -> Box<dyn Clipboard> {
        match self {
            ClipboardBackend::System => Box::new(SystemClipboard::default()),
            ClipboardBackend::Osc52 => Box::new(Osc52Clipboard::stdout()),
        }
    }
}

/// Desktop clipboard via `arboard`.
///
/// The handle is created on first use and kept, so on X11 the selection
/// stays owned for the lifetime of the process.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Mutex<Option<arboard::Clipboard>>,
}

impl Clipboard for SystemClipboard {
    fn set_text(&self, text: &str) -> Result<(), ClipboardError> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|_| ClipboardError::Unavailable("clipboard lock poisoned".into()))?;
        if guard.is_none() {
            let clipboard =
                arboard::Clipboard::new().map_err(|e| ClipboardError::Unavailable(e.to_string()))?;
            *guard = Some(clipboard);
        }
        match guard.as_mut() {
            Some(clipboard) => clipboard
                .set_text(text)
                .map_err(|e| ClipboardError::Unavailable(e.to_string())),
            None => Err(ClipboardError::Unavailable("no clipboard handle".into())),
        }
    }
}

/// Copy via the OSC 52 escape sequence.
/// Works in Ghostty, iTerm2, kitty, WezTerm, and most modern terminals.
pub struct Osc52Clipboard<W: Write + Send = std::io::Stdout> {
    out: Mutex<W>,
}

impl Osc52Clipboard<std::io::Stdout> {
    /// Write directly to stdout, bypassing any terminal backend buffer.
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> Osc52Clipboard<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        match self.out.into_inner() {
            Ok(w) => w,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

/// Build the `ESC ] 52 ; c ; <base64> BEL` sequence for `text`.
pub fn osc52_sequence(text: &str) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(text.as_bytes());
    format!("\x1b]52;c;{}\x07", encoded)
}

impl<W: Write + Send> Clipboard for Osc52Clipboard<W> {
    fn set_text(&self, text: &str) -> Result<(), ClipboardError> {
        let mut out = self
            .out
            .lock()
            .map_err(|_| ClipboardError::Unavailable("terminal writer lock poisoned".into()))?;
        out.write_all(osc52_sequence(text).as_bytes())?;
        out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn osc52_encodes_text() {
        assert_eq!(osc52_sequence("hi"), "\x1b]52;c;aGk=\x07");
    }

    #[test]
    fn osc52_writes_sequence() {
        let clipboard = Osc52Clipboard::new(Vec::new());
        clipboard.set_text("@article{x,}").unwrap();
        let written = String::from_utf8(clipboard.into_inner()).unwrap();
        assert_eq!(written, osc52_sequence("@article{x,}"));
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn osc52_write_failure_is_an_error() {
        let clipboard = Osc52Clipboard::new(BrokenPipe);
        assert!(matches!(
            clipboard.set_text("x"),
            Err(ClipboardError::Io(_))
        ));
    }

    #[test]
    fn backend_names() {
        assert_eq!(ClipboardBackend::from_name("OSC52"), ClipboardBackend::Osc52);
        assert_eq!(ClipboardBackend::from_name("system"), ClipboardBackend::System);
        assert_eq!(ClipboardBackend::from_name("bogus"), ClipboardBackend::System);
        assert_eq!(ClipboardBackend::Osc52.name(), "osc52");
    }
}
