use std::time::Duration;

use super::ResolveError;

/// Search Crossref for `title` and return the DOI of the best-scoring work.
pub async fn search_title(
    client: &reqwest::Client,
    api_url: &str,
    title: &str,
    mailto: Option<&str>,
    timeout: Duration,
) -> Result<Option<String>, ResolveError> {
    let mut params = vec![("query.bibliographic", title), ("rows", "1")];
    if let Some(addr) = mailto {
        params.push(("mailto", addr));
    }
    tracing::debug!(title, "searching Crossref");

    let resp = client
        .get(api_url)
        .query(&params)
        .timeout(timeout)
        .send()
        .await?;

    if !resp.status().is_success() {
        return Err(ResolveError::Status {
            url: api_url.to_string(),
            status: resp.status().as_u16(),
        });
    }

    let data: serde_json::Value = resp.json().await?;
    Ok(first_doi(&data))
}

/// DOI of the first item in a Crossref `/works` response.
pub(crate) fn first_doi(data: &serde_json::Value) -> Option<String> {
    data["message"]["items"]
        .as_array()?
        .first()?
        .get("DOI")?
        .as_str()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(String::from)
}
