//! Release feed client: asks the feed for its newest release and returns its name.
//!
//! The feed URL is expected to return at most one release, newest first
//! (GitHub: `/repos/{owner}/{repo}/releases?per_page=1`).

use crate::config::LauncherConfig;
use crate::error::LaunchError;
use crate::http;
use crate::version_store::Version;
use serde::Deserialize;

/// One entry of the release list. Only `name` is used; other fields are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseInfo {
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct ReleaseClient {
    url: String,
    user_agent: String,
}

impl ReleaseClient {
    pub fn new(cfg: &LauncherConfig) -> Self {
        Self {
            url: cfg.release_list_url.clone(),
            user_agent: cfg.user_agent.clone(),
        }
    }

    /// GET the feed and return the first release's name. No retry.
    pub fn fetch_latest_version(&self) -> Result<Version, LaunchError> {
        let body = self.fetch_body()?;
        let latest = parse_latest(&self.url, &body)?;
        tracing::debug!(url = %self.url, version = %latest.name, "latest release");
        Ok(Version::new(latest.name))
    }

    fn fetch_body(&self) -> Result<Vec<u8>, LaunchError> {
        let mut body = Vec::new();
        let mut easy = http::get_handle(&self.url, &self.user_agent)?;
        {
            let mut transfer = easy.transfer();
            transfer
                .write_function(|data| {
                    body.extend_from_slice(data);
                    Ok(data.len())
                })
                .map_err(|e| LaunchError::transport("install body handler", e))?;
            transfer
                .perform()
                .map_err(|e| LaunchError::transport(format!("GET {} failed", self.url), e))?;
        }

        let code = easy
            .response_code()
            .map_err(|e| LaunchError::transport("no response code", e))?;
        if !http::is_success(code) {
            return Err(LaunchError::HttpStatus {
                url: self.url.clone(),
                code,
            });
        }
        Ok(body)
    }
}

/// Parse a release list body and take its first entry.
pub fn parse_latest(url: &str, body: &[u8]) -> Result<ReleaseInfo, LaunchError> {
    let releases: Vec<ReleaseInfo> =
        serde_json::from_slice(body).map_err(|source| LaunchError::Parse {
            url: url.to_string(),
            source,
        })?;
    releases
        .into_iter()
        .next()
        .ok_or_else(|| LaunchError::NotFound {
            url: url.to_string(),
        })
}
