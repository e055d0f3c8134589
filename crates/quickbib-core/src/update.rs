//! Checking GitHub releases for a newer version.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use thiserror::Error;

const GITHUB_API: &str = "https://api.github.com";

#[derive(Error, Debug)]
pub enum UpdateError {
    #[error("update check failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("update check failed: HTTP {0}")]
    Status(u16),
    #[error("release information has no version")]
    MissingVersion,
}

/// Result of an update check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateInfo {
    pub available: bool,
    /// Latest released version, without a leading `v`.
    pub latest: String,
    /// Release page to open in the browser.
    pub url: String,
}

pub type UpdateFuture<'a> = Pin<Box<dyn Future<Output = Result<UpdateInfo, UpdateError>> + Send + 'a>>;

/// Something that can tell whether a newer release exists.
///
/// Frontends hold an `Option<Arc<dyn UpdateChecker>>`; `None` means the
/// capability is absent and the update actions are hidden.
pub trait UpdateChecker: Send + Sync {
    fn check(&self) -> UpdateFuture<'_>;
}

/// Queries `GET /repos/{repo}/releases/latest`.
pub struct GithubReleaseChecker {
    client: reqwest::Client,
    api_base: String,
    repo: String,
    current_version: String,
}

impl GithubReleaseChecker {
    pub fn new(repo: impl Into<String>, timeout: Duration) -> Result<Self, UpdateError> {
        let client = reqwest::Client::builder()
            .user_agent(format!("{}/{}", crate::APP_NAME, crate::APP_VERSION))
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            api_base: GITHUB_API.to_string(),
            repo: repo.into(),
            current_version: crate::APP_VERSION.to_string(),
        })
    }

    async fn fetch(&self) -> Result<UpdateInfo, UpdateError> {
        let url = format!("{}/repos/{}/releases/latest", self.api_base, self.repo);
        tracing::debug!(%url, "checking for updates");

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/vnd.github+json")
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(UpdateError::Status(response.status().as_u16()));
        }

        let body: serde_json::Value = response.json().await?;
        let info = release_info(&body, &self.current_version)?;
        tracing::info!(latest = %info.latest, available = info.available, "update check finished");
        Ok(info)
    }
}

impl UpdateChecker for GithubReleaseChecker {
    fn check(&self) -> UpdateFuture<'_> {
        Box::pin(self.fetch())
    }
}

/// Build an [`UpdateInfo`] from a GitHub release JSON object.
pub fn release_info(body: &serde_json::Value, current: &str) -> Result<UpdateInfo, UpdateError> {
    let tag = ["tag_name", "name"]
        .iter()
        .filter_map(|k| body[*k].as_str())
        .map(str::trim)
        .find(|s| !s.is_empty())
        .ok_or(UpdateError::MissingVersion)?;
    let latest = tag.trim_start_matches(['v', 'V']).to_string();
    let url = body["html_url"]
        .as_str()
        .filter(|s| !s.is_empty())
        .unwrap_or(crate::HOMEPAGE)
        .to_string();

    Ok(UpdateInfo {
        available: is_newer(&latest, current),
        latest,
        url,
    })
}

/// Lenient version parse: the leading digits of each dot-separated part.
/// `"1.10rc1"` → `[1, 10]`; a part without leading digits counts as `0`.
pub fn parse_version(version: &str) -> Vec<u64> {
    version
        .trim()
        .trim_start_matches(['v', 'V'])
        .split('.')
        .map(|part| {
            let digits: String = part.chars().take_while(char::is_ascii_digit).collect();
            digits.parse().unwrap_or(0)
        })
        .collect()
}

/// Whether `latest` is strictly newer than `current`.
pub fn is_newer(latest: &str, current: &str) -> bool {
    parse_version(latest) > parse_version(current)
}
