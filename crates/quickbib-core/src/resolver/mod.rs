//! Resolver trait and implementations turning an identifier into BibTeX text.

pub mod arxiv;
pub mod crossref;
pub mod doi;
pub mod http;
pub mod landing_page;
pub mod mock;

use std::future::Future;
use std::pin::Pin;

use thiserror::Error;

/// Anything that can go wrong while resolving an identifier.
///
/// A resolver that completes but has no record returns `Ok` with empty text
/// instead; errors are reserved for failures.
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("not a DOI, arXiv identifier, URL or title: {0:?}")]
    InvalidIdentifier(String),
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("lookup failed: HTTP {status} from {url}")]
    Status { url: String, status: u16 },
    #[error("unexpected response from {0}: not a BibTeX record")]
    UnexpectedBody(String),
    #[error("arXiv response parse error: {0}")]
    Xml(String),
    #[error("{0}")]
    Other(String),
}

impl From<String> for ResolveError {
    fn from(s: String) -> Self {
        ResolveError::Other(s)
    }
}

/// Boxed future returned by [`Resolver::resolve`].
pub type ResolveFuture<'a> = Pin<Box<dyn Future<Output = Result<String, ResolveError>> + Send + 'a>>;

/// A bibliographic backend: identifier in, BibTeX record text out.
///
/// Empty text means "resolved, nothing found".
pub trait Resolver: Send + Sync {
    /// Short name used in logs (e.g. "doi.org").
    fn name(&self) -> &str;

    /// Resolve `identifier` into a BibTeX record.
    fn resolve<'a>(&'a self, identifier: &'a str) -> ResolveFuture<'a>;
}
