pub mod bibtex;
pub mod clipboard;
pub mod config_file;
pub mod coordinator;
pub mod identifier;
pub mod resolver;
pub mod sink;
pub mod update;

// Re-export for convenience
pub use clipboard::{Clipboard, ClipboardError, Osc52Clipboard, SystemClipboard};
pub use coordinator::{FetchCoordinator, lookup};
pub use identifier::{Identifier, parse_identifier};
pub use resolver::http::{HttpResolver, HttpResolverConfig};
pub use resolver::{ResolveError, Resolver};
pub use sink::{ResultSink, StatusKind};
pub use update::{GithubReleaseChecker, UpdateChecker, UpdateError, UpdateInfo};

/// Display name of the application.
pub const APP_NAME: &str = "QuickBib";
/// Version of the running build.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
/// Project homepage, also the fallback target for update notices.
pub const HOMEPAGE: &str = "https://github.com/archisman-panigrahi/quickbib";
/// GitHub `owner/repo` used for release checks.
pub const RELEASES_REPO: &str = "archisman-panigrahi/quickbib";
/// SPDX identifier shown in the about screen.
pub const LICENSE: &str = "GPL-3.0-or-later";

/// A user-supplied identifier: DOI, arXiv ID, arXiv URL, journal URL or title.
///
/// The text is passed to the resolver verbatim; classification happens
/// inside the resolver, not here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupRequest {
    pub identifier: String,
}

impl LookupRequest {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
        }
    }
}

/// Outcome of resolving a single [`LookupRequest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupResult {
    /// The backend produced a record; `bibtex` is its literal text.
    Found { bibtex: String },
    /// The backend finished without error but had nothing for this identifier.
    NotFound,
    /// The backend failed; `message` is the error's display string.
    Errored { message: String },
}

impl LookupResult {
    /// Classify a raw resolver outcome. Empty or whitespace-only text is `NotFound`.
    pub fn from_outcome(outcome: Result<String, ResolveError>) -> Self {
        match outcome {
            Ok(text) if text.trim().is_empty() => LookupResult::NotFound,
            Ok(bibtex) => LookupResult::Found { bibtex },
            Err(e) => LookupResult::Errored {
                message: e.to_string(),
            },
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, LookupResult::Found { .. })
    }
}

/// A completed lookup as delivered to the interactive context.
#[derive(Debug, Clone)]
pub struct LookupCompletion {
    /// Monotonic per-coordinator id returned from `submit`.
    pub id: u64,
    pub request: LookupRequest,
    pub result: LookupResult,
}
