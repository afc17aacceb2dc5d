use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[cfg(windows)]
const DEFAULT_EXECUTABLE: &str = "zed.exe";
#[cfg(not(windows))]
const DEFAULT_EXECUTABLE: &str = "zed";

const DEFAULT_VERSION_MARKER: &str = "version.txt";
const DEFAULT_DOWNLOAD_URL: &str =
    "https://github.com/deevus/zed-windows-builds/releases/latest/download/zed.exe";
const DEFAULT_RELEASE_LIST_URL: &str =
    "https://api.github.com/repos/deevus/zed-windows-builds/releases?per_page=1";
const DEFAULT_USER_AGENT: &str = "ZedLauncher/1.0";

/// Launcher configuration loaded from `~/.config/zlaunch/config.toml`.
///
/// Built once at startup and passed by reference to every component.
/// Relative paths are taken relative to the working directory; see
/// [`LauncherConfig::resolve_paths`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LauncherConfig {
    /// Managed executable: lock-probe target, download destination and spawn target.
    pub executable_path: PathBuf,
    /// Plain-text marker holding the last installed release name.
    pub version_marker_path: PathBuf,
    /// Direct URL of the executable binary.
    pub download_url: String,
    /// Release feed returning a JSON array of releases, newest first.
    pub release_list_url: String,
    /// `User-Agent` sent with every request (GitHub rejects requests without one).
    pub user_agent: String,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            executable_path: PathBuf::from(DEFAULT_EXECUTABLE),
            version_marker_path: PathBuf::from(DEFAULT_VERSION_MARKER),
            download_url: DEFAULT_DOWNLOAD_URL.to_string(),
            release_list_url: DEFAULT_RELEASE_LIST_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl LauncherConfig {
    /// Check that both endpoints are http(s) URLs and a user-agent is set.
    pub fn validate(&self) -> Result<()> {
        validate_url("download_url", &self.download_url)?;
        validate_url("release_list_url", &self.release_list_url)?;
        if self.user_agent.trim().is_empty() {
            anyhow::bail!("user_agent must not be empty");
        }
        Ok(())
    }

    /// Join relative paths onto `base_dir`. Absolute paths are kept as-is.
    pub fn resolve_paths(&self, base_dir: &Path) -> Self {
        Self {
            executable_path: base_dir.join(&self.executable_path),
            version_marker_path: base_dir.join(&self.version_marker_path),
            ..self.clone()
        }
    }
}

fn validate_url(field: &str, value: &str) -> Result<()> {
    let parsed = url::Url::parse(value).with_context(|| format!("{} is not a valid URL: {}", field, value))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => anyhow::bail!("{} must use http or https, got {}", field, other),
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("zlaunch")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<LauncherConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = LauncherConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    load_from(&path)
}

/// Load configuration from an explicit file (`--config`).
pub fn load_from(path: &Path) -> Result<LauncherConfig> {
    let data = fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
    let cfg: LauncherConfig =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    Ok(cfg)
}
