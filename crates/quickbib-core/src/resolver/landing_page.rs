use std::time::Duration;

use once_cell::sync::Lazy;
use scraper::{Html, Selector};

use super::ResolveError;
use crate::identifier::{Identifier, parse_identifier};

/// `<meta name=...>` values publishers use to expose the article DOI, in priority order.
const DOI_META_NAMES: &[&str] = &[
    "citation_doi",
    "dc.identifier",
    "prism.doi",
    "bepress_citation_doi",
    "dc.identifier.doi",
];

/// Fetch a journal landing page and return the DOI it advertises, if any.
pub async fn find_doi(
    client: &reqwest::Client,
    url: &str,
    timeout: Duration,
) -> Result<Option<String>, ResolveError> {
    tracing::debug!(%url, "fetching landing page");

    let resp = client
        .get(url)
        .header(reqwest::header::ACCEPT, "text/html")
        .timeout(timeout)
        .send()
        .await?;

    if !resp.status().is_success() {
        return Err(ResolveError::Status {
            url: url.to_string(),
            status: resp.status().as_u16(),
        });
    }

    let html = resp.text().await?;
    Ok(doi_from_html(&html))
}

/// Scan `<meta>` tags for a DOI. Meta names are matched case-insensitively.
pub(crate) fn doi_from_html(html: &str) -> Option<String> {
    static META: Lazy<Selector> = Lazy::new(|| Selector::parse("meta").unwrap());

    let document = Html::parse_document(html);
    let metas: Vec<(String, String)> = document
        .select(&META)
        .filter_map(|el| {
            let name = el
                .value()
                .attr("name")
                .or_else(|| el.value().attr("property"))?;
            let content = el.value().attr("content")?;
            Some((name.to_ascii_lowercase(), content.trim().to_string()))
        })
        .collect();

    for wanted in DOI_META_NAMES {
        for (name, content) in &metas {
            if name != wanted {
                continue;
            }
            // dc.identifier is also used for ISSNs/URIs; only accept DOIs.
            if let Ok(Identifier::Doi(doi)) = parse_identifier(content) {
                return Some(doi);
            }
        }
    }

    None
}
