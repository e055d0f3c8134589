use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::clipboard::ClipboardBackend;
use crate::resolver::http::{HttpResolverConfig, default_user_agent};

/// Environment variable overriding `[network] timeout_secs`.
pub const TIMEOUT_ENV: &str = "QUICKBIB_TIMEOUT";

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    pub network: Option<NetworkConfig>,
    pub output: Option<OutputConfig>,
    pub clipboard: Option<ClipboardConfig>,
    pub updates: Option<UpdatesConfig>,
    pub display: Option<DisplayConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NetworkConfig {
    pub timeout_secs: Option<u64>,
    pub user_agent: Option<String>,
    pub mailto: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    pub tidy: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClipboardConfig {
    /// `"system"` or `"osc52"`.
    pub backend: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatesConfig {
    pub enabled: Option<bool>,
    pub check_on_startup: Option<bool>,
    /// GitHub `owner/repo` to query for releases.
    pub repo: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DisplayConfig {
    pub theme: Option<String>,
}

/// Platform config directory path: `<config_dir>/quickbib/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("quickbib").join("config.toml"))
}

/// Load config by cascading CWD `.quickbib.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(Path::new(".quickbib.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &Path) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unparsable config file");
            None
        }
    }
}

fn pick<S, T: Clone>(
    overlay: &Option<S>,
    base: &Option<S>,
    field: impl Fn(&S) -> Option<T>,
) -> Option<T> {
    overlay
        .as_ref()
        .and_then(&field)
        .or_else(|| base.as_ref().and_then(&field))
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    ConfigFile {
        network: Some(NetworkConfig {
            timeout_secs: pick(&overlay.network, &base.network, |n| n.timeout_secs),
            user_agent: pick(&overlay.network, &base.network, |n| n.user_agent.clone()),
            mailto: pick(&overlay.network, &base.network, |n| n.mailto.clone()),
        }),
        output: Some(OutputConfig {
            tidy: pick(&overlay.output, &base.output, |o| o.tidy),
        }),
        clipboard: Some(ClipboardConfig {
            backend: pick(&overlay.clipboard, &base.clipboard, |c| c.backend.clone()),
        }),
        updates: Some(UpdatesConfig {
            enabled: pick(&overlay.updates, &base.updates, |u| u.enabled),
            check_on_startup: pick(&overlay.updates, &base.updates, |u| u.check_on_startup),
            repo: pick(&overlay.updates, &base.updates, |u| u.repo.clone()),
        }),
        display: Some(DisplayConfig {
            theme: pick(&overlay.display, &base.display, |d| d.theme.clone()),
        }),
    }
}

impl ConfigFile {
    /// Timeout from `QUICKBIB_TIMEOUT`, else the file, else `None`.
    pub fn timeout_secs(&self) -> Option<u64> {
        std::env::var(TIMEOUT_ENV)
            .ok()
            .and_then(|v| v.trim().parse().ok())
            .or_else(|| self.network.as_ref().and_then(|n| n.timeout_secs))
    }

    pub fn mailto(&self) -> Option<String> {
        self.network
            .as_ref()
            .and_then(|n| n.mailto.clone())
            .filter(|m| !m.trim().is_empty())
    }

    /// Resolver settings with file and environment values applied over defaults.
    pub fn resolver_config(&self) -> HttpResolverConfig {
        let mut config = HttpResolverConfig::default();
        if let Some(secs) = self.timeout_secs() {
            config.timeout = Duration::from_secs(secs);
        }
        let mailto = self.mailto();
        config.user_agent = self
            .network
            .as_ref()
            .and_then(|n| n.user_agent.clone())
            .unwrap_or_else(|| default_user_agent(mailto.as_deref()));
        config.mailto = mailto;
        if let Some(tidy) = self.output.as_ref().and_then(|o| o.tidy) {
            config.tidy = tidy;
        }
        config
    }

    /// Configured clipboard backend; unknown names fall back to the system clipboard.
    pub fn clipboard_backend(&self) -> ClipboardBackend {
        self.clipboard
            .as_ref()
            .and_then(|c| c.backend.as_deref())
            .map(ClipboardBackend::from_name)
            .unwrap_or_default()
    }

    /// Update checks default to on for Windows builds only.
    pub fn updates_enabled(&self) -> bool {
        self.updates
            .as_ref()
            .and_then(|u| u.enabled)
            .unwrap_or(cfg!(windows))
    }

    pub fn check_updates_on_startup(&self) -> bool {
        self.updates_enabled()
            && self
                .updates
                .as_ref()
                .and_then(|u| u.check_on_startup)
                .unwrap_or(true)
    }

    pub fn update_repo(&self) -> String {
        self.updates
            .as_ref()
            .and_then(|u| u.repo.clone())
            .unwrap_or_else(|| crate::RELEASES_REPO.to_string())
    }

    pub fn theme(&self) -> Option<&str> {
        self.display.as_ref().and_then(|d| d.theme.as_deref())
    }
}
