//! GitHub Releases fetcher for setup-sops.
//!
//! Installs a tool published as GitHub release assets. Supports:
//! - Resolving `latest` to the highest stable release tag
//! - Platform-specific asset URLs (`sops-<version>.<os>.<arch>`, `.exe`)
//! - Bare binaries and zip / tar.gz archives
//! - A local tool cache so repeated runs skip the network
//!
//! # Example
//!
//! ```ignore
//! use setup_sops_core::cache::FsToolCache;
//! use setup_sops_core::tools::{Platform, ToolConfig};
//! use setup_sops_tools_github::{Fetcher, GitHubClient, resolve_version};
//!
//! let config = ToolConfig::default();
//! let client = GitHubClient::new(&config, None)?;
//! let resolution = resolve_version("latest", &client, &config).await;
//!
//! let fetcher = Fetcher::new(FsToolCache::default(), client, config, Platform::current());
//! let sops = fetcher.install(&resolution.version).await?;
//! ```

mod client;
mod extract;
mod fetch;
mod release;
mod url;
mod version;

pub use client::{Downloader, GitHubClient, ReleaseSource};
pub use extract::ArtifactKind;
pub use fetch::Fetcher;
pub use release::{Release, parse_tag, select_latest};
pub use url::{asset_name, download_url};
pub use version::{Resolution, is_latest_request, normalize_version, resolve_version};
