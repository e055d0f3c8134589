use std::time::Duration;

use super::ResolveError;

/// What the arXiv API knows about a preprint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArxivEntry {
    /// Canonical abstract URL, e.g. `http://arxiv.org/abs/1706.03762v7`.
    pub abs_url: String,
    /// Journal DOI when the authors linked a published version.
    pub doi: Option<String>,
}

/// Look up `arxiv_id` via the arXiv Atom API. `None` means arXiv has no such paper.
pub async fn fetch_entry(
    client: &reqwest::Client,
    api_url: &str,
    arxiv_id: &str,
    timeout: Duration,
) -> Result<Option<ArxivEntry>, ResolveError> {
    let url = format!(
        "{}?id_list={}&max_results=1",
        api_url,
        urlencoding::encode(arxiv_id)
    );
    tracing::debug!(%url, "querying arXiv");

    let resp = client.get(&url).timeout(timeout).send().await?;
    if !resp.status().is_success() {
        return Err(ResolveError::Status {
            url,
            status: resp.status().as_u16(),
        });
    }

    let body = resp.text().await?;
    parse_arxiv_response(&body)
}

/// Parse an arXiv Atom feed and return its first real entry.
///
/// arXiv reports bad ids as an entry whose `<id>` points at its error
/// namespace; those are treated as "no such paper".
pub(crate) fn parse_arxiv_response(xml: &str) -> Result<Option<ArxivEntry>, ResolveError> {
    use quick_xml::Reader;
    use quick_xml::events::Event;

    let mut reader = Reader::from_str(xml);

    let mut in_entry = false;
    let mut in_id = false;
    let mut in_doi = false;

    let mut current_id = String::new();
    let mut current_doi = String::new();

    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                b"entry" => {
                    in_entry = true;
                    current_id.clear();
                    current_doi.clear();
                }
                b"id" if in_entry => in_id = true,
                b"doi" if in_entry => in_doi = true,
                _ => {}
            },
            Ok(Event::Text(ref e)) => {
                let text = e.unescape().unwrap_or_default();
                if in_id {
                    current_id.push_str(&text);
                }
                if in_doi {
                    current_doi.push_str(&text);
                }
            }
            Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                b"entry" => {
                    let abs_url = current_id.trim().to_string();
                    if abs_url.contains("arxiv.org/abs/") {
                        let doi = current_doi.trim();
                        return Ok(Some(ArxivEntry {
                            abs_url,
                            doi: (!doi.is_empty()).then(|| doi.to_string()),
                        }));
                    }
                    in_entry = false;
                }
                b"id" => in_id = false,
                b"doi" => in_doi = false,
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(ResolveError::Xml(e.to_string())),
            _ => {}
        }
        buf.clear();
    }

    Ok(None)
}
