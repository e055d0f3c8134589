use std::time::Duration;

use super::{ResolveError, ResolveFuture, Resolver, arxiv, crossref, doi, landing_page};
use crate::bibtex;
use crate::identifier::{Identifier, parse_identifier};

pub const DEFAULT_DOI_BASE_URL: &str = "https://doi.org";
pub const DEFAULT_ARXIV_API_URL: &str = "https://export.arxiv.org/api/query";
pub const DEFAULT_CROSSREF_API_URL: &str = "https://api.crossref.org/works";
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Settings for [`HttpResolver`].
#[derive(Debug, Clone)]
pub struct HttpResolverConfig {
    /// Per-request timeout.
    pub timeout: Duration,
    pub user_agent: String,
    pub doi_base_url: String,
    pub arxiv_api_url: String,
    pub crossref_api_url: String,
    /// Contact address sent to Crossref with title searches.
    pub mailto: Option<String>,
    /// Reformat records with [`bibtex::tidy`].
    pub tidy: bool,
}

impl Default for HttpResolverConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: default_user_agent(None),
            doi_base_url: DEFAULT_DOI_BASE_URL.to_string(),
            arxiv_api_url: DEFAULT_ARXIV_API_URL.to_string(),
            crossref_api_url: DEFAULT_CROSSREF_API_URL.to_string(),
            mailto: None,
            tidy: true,
        }
    }
}

/// `QuickBib/<version> (<homepage>[; mailto:<addr>])`, the polite-pool format
/// Crossref asks clients to send.
pub fn default_user_agent(mailto: Option<&str>) -> String {
    match mailto {
        Some(addr) if !addr.trim().is_empty() => format!(
            "{}/{} ({}; mailto:{})",
            crate::APP_NAME,
            crate::APP_VERSION,
            crate::HOMEPAGE,
            addr.trim()
        ),
        _ => format!(
            "{}/{} ({})",
            crate::APP_NAME,
            crate::APP_VERSION,
            crate::HOMEPAGE
        ),
    }
}

/// Network resolver: DOI content negotiation, arXiv API, journal landing pages
/// and Crossref title search.
pub struct HttpResolver {
    client: reqwest::Client,
    config: HttpResolverConfig,
}

impl HttpResolver {
    pub fn new(config: HttpResolverConfig) -> Result<Self, ResolveError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self { client, config })
    }

    async fn resolve_identifier(&self, identifier: &str) -> Result<String, ResolveError> {
        let timeout = self.config.timeout;
        let doi = match parse_identifier(identifier)? {
            Identifier::Doi(doi) => doi,
            Identifier::Arxiv(id) => {
                match arxiv::fetch_entry(&self.client, &self.config.arxiv_api_url, &id, timeout)
                    .await?
                {
                    None => {
                        tracing::info!(arxiv_id = %id, "arXiv has no such paper");
                        return Ok(String::new());
                    }
                    Some(entry) => entry.doi.unwrap_or_else(|| {
                        tracing::debug!(arxiv_id = %id, "no journal DOI, using arXiv DOI");
                        Identifier::arxiv_datacite_doi(&id)
                    }),
                }
            }
            Identifier::Url(url) => {
                match landing_page::find_doi(&self.client, &url, timeout).await? {
                    Some(doi) => doi,
                    None => {
                        tracing::info!(%url, "no DOI advertised on page");
                        return Ok(String::new());
                    }
                }
            }
            Identifier::Title(title) => {
                match crossref::search_title(
                    &self.client,
                    &self.config.crossref_api_url,
                    &title,
                    self.config.mailto.as_deref(),
                    timeout,
                )
                .await?
                {
                    Some(doi) => doi,
                    None => {
                        tracing::info!(%title, "Crossref found no matching work");
                        return Ok(String::new());
                    }
                }
            }
        };

        let record =
            doi::fetch_bibtex(&self.client, &self.config.doi_base_url, &doi, timeout).await?;
        if self.config.tidy && !record.is_empty() {
            Ok(bibtex::tidy(&record))
        } else {
            Ok(record)
        }
    }
}

impl Resolver for HttpResolver {
    fn name(&self) -> &str {
        "doi.org"
    }

    fn resolve<'a>(&'a self, identifier: &'a str) -> ResolveFuture<'a> {
        Box::pin(self.resolve_identifier(identifier))
    }
}
