//! Per-tool configuration.
//!
//! Everything that used to be a process-wide constant (tool name, upstream
//! repository, fallback version, permission bits) lives here and is handed to
//! the resolver, URL builder and fetcher when they are constructed.

use std::path::PathBuf;

/// Tool name used for the cache key and the executable name.
pub const SOPS_TOOL_NAME: &str = "sops";

/// Version installed when `latest` cannot be resolved.
pub const STABLE_SOPS_VERSION: &str = "v3.11.1";

/// Upstream repository in `owner/name` form.
pub const SOPS_REPOSITORY: &str = "mozilla/sops";

/// Base URL of the GitHub REST API.
pub const GITHUB_API_BASE: &str = "https://api.github.com";

/// Permission bits applied to downloaded executables (rwxr-xr-x).
pub const DEFAULT_EXECUTABLE_MODE: u32 = 0o755;

/// Configuration for the tool being installed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolConfig {
    /// Tool name (e.g., "sops").
    pub name: String,
    /// Upstream repository (e.g., "mozilla/sops").
    pub repo: String,
    /// Fallback version when `latest` cannot be resolved.
    pub default_version: String,
    /// Base for release asset downloads, without trailing slash.
    pub download_base: String,
    /// Base URL of the releases API.
    pub api_base: String,
    /// Mode applied to the downloaded file and the located executable.
    pub executable_mode: u32,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            name: SOPS_TOOL_NAME.to_string(),
            repo: SOPS_REPOSITORY.to_string(),
            default_version: STABLE_SOPS_VERSION.to_string(),
            download_base: format!("https://github.com/{SOPS_REPOSITORY}/releases/download"),
            api_base: GITHUB_API_BASE.to_string(),
            executable_mode: DEFAULT_EXECUTABLE_MODE,
        }
    }
}

impl ToolConfig {
    /// Create the default sops configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the fallback version.
    #[must_use]
    pub fn with_default_version(mut self, version: impl Into<String>) -> Self {
        self.default_version = version.into();
        self
    }

    /// Set the download base URL.
    #[must_use]
    pub fn with_download_base(mut self, base: impl Into<String>) -> Self {
        self.download_base = base.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the releases API base URL.
    #[must_use]
    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the executable permission bits.
    #[must_use]
    pub fn with_executable_mode(mut self, mode: u32) -> Self {
        self.executable_mode = mode;
        self
    }

    /// URL listing the most recent releases of the upstream repository.
    #[must_use]
    pub fn releases_url(&self) -> String {
        format!("{}/repos/{}/releases?per_page=100", self.api_base, self.repo)
    }
}

/// Get the default tool cache root.
///
/// Prefers the runner's `RUNNER_TOOL_CACHE`, then `~/.cache/setup-sops/tools`.
#[must_use]
pub fn default_cache_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os("RUNNER_TOOL_CACHE").filter(|v| !v.is_empty()) {
        return PathBuf::from(dir);
    }
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from(".cache"))
        .join("setup-sops")
        .join("tools")
}
