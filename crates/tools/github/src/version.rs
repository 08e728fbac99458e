//! Requested-version resolution.

use setup_sops_core::tools::ToolConfig;
use tracing::{info, warn};

use crate::client::ReleaseSource;
use crate::release::select_latest;

/// Outcome of resolving a requested version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Concrete version, always starting with `v`.
    pub version: String,
    /// Why the default version was used instead of the requested one.
    pub fallback: Option<String>,
}

impl Resolution {
    fn exact(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            fallback: None,
        }
    }

    fn fallback(version: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            fallback: Some(reason.into()),
        }
    }

    /// Whether the default version was substituted.
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        self.fallback.is_some()
    }
}

/// Whether `requested` asks for the latest release.
#[must_use]
pub fn is_latest_request(requested: &str) -> bool {
    requested.trim().eq_ignore_ascii_case("latest")
}

/// Prefix `v` unless the version already starts with one (either case).
#[must_use]
pub fn normalize_version(requested: &str) -> String {
    let requested = requested.trim();
    if requested.starts_with(['v', 'V']) {
        requested.to_string()
    } else {
        format!("v{requested}")
    }
}

/// Resolve a requested version to the exact version to install.
///
/// `latest` (any case) is looked up through `source`. Lookup failures never
/// fail the run: they degrade to `config.default_version` and the reason is
/// recorded in [`Resolution::fallback`].
pub async fn resolve_version(
    requested: &str,
    source: &dyn ReleaseSource,
    config: &ToolConfig,
) -> Resolution {
    if !is_latest_request(requested) {
        return Resolution::exact(normalize_version(requested));
    }

    info!(tool = %config.name, "Getting latest version");
    match source.list_releases().await {
        Ok(releases) => match select_latest(&releases) {
            Some(release) => {
                info!(version = %release.tag_name, "Resolved latest release");
                Resolution::exact(release.tag_name.clone())
            }
            None => {
                let reason = format!(
                    "Could not find valid release. Using default version {}",
                    config.default_version
                );
                warn!(candidates = releases.len(), "{reason}");
                Resolution::fallback(config.default_version.clone(), reason)
            }
        },
        Err(e) => {
            let reason = format!(
                "Error while fetching latest {} release: {e}. Using default version {}",
                config.name, config.default_version
            );
            warn!("{reason}");
            Resolution::fallback(config.default_version.clone(), reason)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::release::Release;
    use async_trait::async_trait;
    use setup_sops_core::{Error, Result};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StaticReleases {
        releases: Vec<Release>,
        calls: AtomicUsize,
    }

    impl StaticReleases {
        fn new(tags: &[&str]) -> Self {
            Self {
                releases: tags
                    .iter()
                    .map(|tag| Release {
                        tag_name: (*tag).to_string(),
                        draft: false,
                        prerelease: false,
                        is_latest: false,
                    })
                    .collect(),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl ReleaseSource for StaticReleases {
        async fn list_releases(&self) -> Result<Vec<Release>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.releases.clone())
        }
    }

    struct FailingReleases;

    #[async_trait]
    impl ReleaseSource for FailingReleases {
        async fn list_releases(&self) -> Result<Vec<Release>> {
            Err(Error::http("Release listing returned HTTP 403 Forbidden"))
        }
    }

    fn config() -> ToolConfig {
        ToolConfig::default().with_default_version("v3.7.3")
    }

    #[test]
    fn test_normalize_version() {
        assert_eq!(normalize_version("3.7.3"), "v3.7.3");
        assert_eq!(normalize_version("v3.7.3"), "v3.7.3");
        assert_eq!(normalize_version("V3.7.3"), "V3.7.3");
        assert_eq!(normalize_version(" 3.2.1 "), "v3.2.1");
    }

    #[test]
    fn test_is_latest_request() {
        assert!(is_latest_request("latest"));
        assert!(is_latest_request("LATEST"));
        assert!(is_latest_request("Latest"));
        assert!(!is_latest_request("v3.7.3"));
        assert!(!is_latest_request("latest-1"));
    }

    #[tokio::test]
    async fn test_explicit_version_skips_lookup() {
        let source = StaticReleases::new(&["v4.0.0"]);
        let resolution = resolve_version("3.7.3", &source, &config()).await;

        assert_eq!(resolution, Resolution::exact("v3.7.3"));
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_latest_excludes_rc() {
        let source = StaticReleases::new(&["v4.0.0-rc1", "v4.0.0"]);
        let resolution = resolve_version("latest", &source, &config()).await;

        assert_eq!(resolution.version, "v4.0.0");
        assert!(!resolution.is_fallback());
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_latest_is_case_insensitive() {
        let source = StaticReleases::new(&["v3.8.1", "v3.9.0"]);
        let resolution = resolve_version("LaTeSt", &source, &config()).await;
        assert_eq!(resolution.version, "v3.9.0");
    }

    #[tokio::test]
    async fn test_latest_falls_back_on_error() {
        let resolution = resolve_version("latest", &FailingReleases, &config()).await;

        assert_eq!(resolution.version, "v3.7.3");
        let reason = resolution.fallback.unwrap();
        assert!(reason.starts_with("Error while fetching latest sops release"));
        assert!(reason.contains("HTTP 403"));
        assert!(reason.ends_with("Using default version v3.7.3"));
    }

    #[tokio::test]
    async fn test_latest_falls_back_when_no_candidate() {
        let source = StaticReleases::new(&["v4.0.0-rc1", "nightly"]);
        let resolution = resolve_version("latest", &source, &config()).await;

        assert_eq!(resolution.version, "v3.7.3");
        assert_eq!(
            resolution.fallback.as_deref(),
            Some("Could not find valid release. Using default version v3.7.3")
        );
    }
}
