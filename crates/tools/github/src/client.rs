//! HTTP access to GitHub: release listing and asset download.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use setup_sops_core::tools::ToolConfig;
use setup_sops_core::{Error, Result};
use std::path::Path;
use tracing::debug;

use crate::release::Release;

const USER_AGENT: &str = concat!("setup-sops/", env!("CARGO_PKG_VERSION"));

/// Source of release descriptors for the upstream repository.
#[async_trait]
pub trait ReleaseSource: Send + Sync {
    /// List recent releases, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be parsed.
    async fn list_releases(&self) -> Result<Vec<Release>>;
}

/// Downloads a URL to a local file.
#[async_trait]
pub trait Downloader: Send + Sync {
    /// Download `url` and write the body to `dest`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the status is not a success,
    /// or `dest` cannot be written.
    async fn download(&self, url: &str, dest: &Path) -> Result<()>;
}

/// GitHub REST client used for both release listing and asset download.
pub struct GitHubClient {
    client: Client,
    releases_url: String,
    token: Option<String>,
}

impl GitHubClient {
    /// Create a client for the repository in `config`.
    ///
    /// `token` is sent as a bearer token when present; unauthenticated
    /// requests work but are rate limited.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built (TLS backend
    /// initialization failure).
    pub fn new(config: &ToolConfig, token: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| Error::http(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            releases_url: config.releases_url(),
            token: token.filter(|t| !t.is_empty()),
        })
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

#[async_trait]
impl ReleaseSource for GitHubClient {
    async fn list_releases(&self) -> Result<Vec<Release>> {
        debug!(url = %self.releases_url, "Fetching GitHub releases");

        let response = self
            .authorize(self.client.get(&self.releases_url))
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
            .send()
            .await
            .map_err(|e| Error::http(format!("Failed to fetch releases: {e}")))?;

        if !response.status().is_success() {
            return Err(Error::http(format!(
                "Release listing returned HTTP {}",
                response.status()
            )));
        }

        response
            .json::<Vec<Release>>()
            .await
            .map_err(|e| Error::release_lookup(format!("Failed to parse releases: {e}")))
    }
}

#[async_trait]
impl Downloader for GitHubClient {
    async fn download(&self, url: &str, dest: &Path) -> Result<()> {
        debug!(%url, ?dest, "Downloading release asset");

        let response = self
            .authorize(self.client.get(url))
            .send()
            .await
            .map_err(|e| Error::http(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Error::http(format!("HTTP {}", response.status())));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::http(format!("Failed to read response body: {e}")))?;

        tokio::fs::write(dest, &bytes)
            .await
            .map_err(|e| Error::io(e, dest, "write"))?;

        debug!(size = bytes.len(), ?dest, "Downloaded release asset");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_uses_configured_releases_url() {
        let config = ToolConfig::default().with_api_base("http://127.0.0.1:9");
        let client = GitHubClient::new(&config, None).unwrap();
        assert_eq!(
            client.releases_url,
            "http://127.0.0.1:9/repos/mozilla/sops/releases?per_page=100"
        );
    }

    #[test]
    fn test_empty_token_is_ignored() {
        let config = ToolConfig::default();
        let client = GitHubClient::new(&config, Some(String::new())).unwrap();
        assert!(client.token.is_none());

        let client = GitHubClient::new(&config, Some("ghp_abc".into())).unwrap();
        assert_eq!(client.token.as_deref(), Some("ghp_abc"));
    }

    #[tokio::test]
    async fn test_list_releases_unreachable_host_is_http_error() {
        // Port 9 (discard) is closed on test hosts; the connection is refused
        let config = ToolConfig::default().with_api_base("http://127.0.0.1:9");
        let client = GitHubClient::new(&config, None).unwrap();

        let err = client.list_releases().await.unwrap_err();
        assert!(matches!(err, Error::Http { .. }));
    }
}
