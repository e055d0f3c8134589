//! Classification of user input into DOI, arXiv identifier, landing-page URL, or title.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::resolver::ResolveError;

/// A classified lookup identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identifier {
    /// A bare DOI such as `10.1038/s41586-020-2649-2`.
    Doi(String),
    /// An arXiv identifier without version suffix, e.g. `2301.12345` or `hep-th/9901001`.
    Arxiv(String),
    /// Any other http(s) URL; the DOI has to be discovered from the page.
    Url(String),
    /// Free text of two or more words, searched as a title.
    Title(String),
}

impl Identifier {
    /// DataCite DOI that arXiv registers for every preprint.
    pub fn arxiv_datacite_doi(arxiv_id: &str) -> String {
        format!("10.48550/arXiv.{}", arxiv_id)
    }
}

static DOI_PREFIXED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:doi:\s*|https?://(?:dx\.)?doi\.org/)(10\.\d{4,9}/\S+)$").unwrap()
});
static DOI_BARE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^10\.\d{4,9}/\S+$").unwrap());
static DOI_EMBEDDED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(10\.\d{4,9}/[^\s?#&]+)").unwrap());

static ARXIV_PREFIXED: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^arxiv:\s*(\S+)$").unwrap());
static ARXIV_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:https?://)?(?:www\.|export\.)?arxiv\.org/(?:abs|pdf)/(\S+?)(?:\.pdf)?/?$")
        .unwrap()
});
static ARXIV_NEW_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4}\.\d{4,5})(?:v\d+)?$").unwrap());
static ARXIV_OLD_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([a-zA-Z-]+(?:\.[a-zA-Z]{2})?/\d{7})(?:v\d+)?$").unwrap());

/// Classify `input`.
///
/// Accepted forms:
/// - `10.1234/example`, `doi:10.1234/example`, `https://doi.org/10.1234/example`
/// - `arXiv:2301.12345v2`, `2301.12345`, `hep-th/9901001`
/// - `https://arxiv.org/abs/2301.12345`, `https://arxiv.org/pdf/2301.12345.pdf`
/// - any other `http(s)://` URL (DOI taken from the path when present)
/// - free text of at least two words, treated as a title search
pub fn parse_identifier(input: &str) -> Result<Identifier, ResolveError> {
    let text = input.trim();
    if text.is_empty() {
        return Err(ResolveError::InvalidIdentifier(input.to_string()));
    }

    if let Some(caps) = DOI_PREFIXED.captures(text) {
        return Ok(Identifier::Doi(clean_doi(&caps[1])));
    }

    if let Some(caps) = ARXIV_PREFIXED
        .captures(text)
        .or_else(|| ARXIV_URL.captures(text))
    {
        if let Some(id) = arxiv_base_id(&caps[1]) {
            return Ok(Identifier::Arxiv(id));
        }
    } else if let Some(id) = arxiv_base_id(text) {
        return Ok(Identifier::Arxiv(id));
    }

    if DOI_BARE.is_match(text) {
        return Ok(Identifier::Doi(clean_doi(text)));
    }

    if is_http_url(text) {
        let decoded = urlencoding::decode(text)
            .map(|s| s.into_owned())
            .unwrap_or_else(|_| text.to_string());
        if let Some(m) = DOI_EMBEDDED.find(&decoded) {
            let doi = m.as_str();
            let doi = doi.strip_suffix(".pdf").unwrap_or(doi);
            return Ok(Identifier::Doi(clean_doi(doi)));
        }
        return Ok(Identifier::Url(text.to_string()));
    }

    if text.split_whitespace().nth(1).is_some() {
        let title = text.split_whitespace().collect::<Vec<_>>().join(" ");
        return Ok(Identifier::Title(title));
    }

    Err(ResolveError::InvalidIdentifier(text.to_string()))
}

/// Validate an arXiv id and drop its version suffix.
fn arxiv_base_id(candidate: &str) -> Option<String> {
    ARXIV_NEW_ID
        .captures(candidate)
        .or_else(|| ARXIV_OLD_ID.captures(candidate))
        .map(|caps| caps[1].to_string())
}

fn is_http_url(text: &str) -> bool {
    let lower = text.to_ascii_lowercase();
    (lower.starts_with("http://") || lower.starts_with("https://")) && !text.contains(' ')
}

/// Percent-decode a DOI and strip trailing punctuation and unbalanced closers.
fn clean_doi(doi: &str) -> String {
    let decoded = urlencoding::decode(doi)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| doi.to_string());
    let mut doi = decoded.trim_end_matches(['.', ',', ';', ':']);

    loop {
        let before = doi.len();
        for (open, close) in [('(', ')'), ('[', ']'), ('{', '}')] {
            if doi.ends_with(close) && doi.matches(close).count() > doi.matches(open).count() {
                doi = &doi[..doi.len() - 1];
                doi = doi.trim_end_matches(['.', ',', ';', ':']);
            }
        }
        if doi.len() == before {
            break;
        }
    }

    doi.to_string()
}
