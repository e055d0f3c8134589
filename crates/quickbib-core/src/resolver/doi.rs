use std::time::Duration;

use super::ResolveError;

/// Fetch the BibTeX record for `doi` via doi.org content negotiation.
///
/// A 404 means the DOI is not registered and yields empty text.
pub async fn fetch_bibtex(
    client: &reqwest::Client,
    base_url: &str,
    doi: &str,
    timeout: Duration,
) -> Result<String, ResolveError> {
    let url = format!("{}/{}", base_url.trim_end_matches('/'), doi);
    tracing::debug!(%url, "requesting BibTeX");

    let resp = client
        .get(&url)
        .header(reqwest::header::ACCEPT, "application/x-bibtex")
        .timeout(timeout)
        .send()
        .await?;

    let status = resp.status();
    if status.as_u16() == 404 {
        tracing::info!(doi, "DOI not registered");
        return Ok(String::new());
    }
    if !status.is_success() {
        return Err(ResolveError::Status {
            url,
            status: status.as_u16(),
        });
    }

    let body = resp.text().await?;
    check_bibtex_body(&url, body)
}

/// Reject 2xx bodies that are not a BibTeX record (e.g. an HTML landing page).
pub(crate) fn check_bibtex_body(url: &str, body: String) -> Result<String, ResolveError> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return Ok(String::new());
    }
    if !trimmed.starts_with('@') {
        return Err(ResolveError::UnexpectedBody(url.to_string()));
    }
    Ok(trimmed.to_string())
}
