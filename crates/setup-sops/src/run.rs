//! One installation run: resolve, fetch, publish.

use crate::cli::{Cli, CliError};
use setup_sops_core::Error;
use setup_sops_core::cache::FsToolCache;
use setup_sops_core::tools::default_cache_dir;
use setup_sops_github::{ActionsRunner, Published, publish};
use setup_sops_tools_github::{Fetcher, GitHubClient, resolve_version};
use std::io::Write;
use tracing::{info, instrument};

/// Install the requested sops version and expose it through `runner`.
///
/// # Errors
///
/// Fails on an empty version, when the download, extraction or cache
/// registration fails, when the executable is missing from the cached
/// artifact, or when the step output cannot be written. Failing to update
/// the search path is not an error.
#[instrument(name = "setup_sops_run", skip_all, fields(requested = %cli.sops_version))]
pub async fn run<W: Write>(cli: &Cli, runner: &mut ActionsRunner<W>) -> Result<Published, CliError> {
    let requested = cli.sops_version.trim();
    if requested.is_empty() {
        return Err(Error::configuration_with_help(
            "No sops version was given",
            "Set the `version` input, e.g. `v3.8.1` or `latest`",
        )
        .into());
    }

    let config = cli.tool_config();
    let platform = cli.target_platform();
    let cache_root = cli
        .tool_cache
        .clone()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(default_cache_dir);
    info!(platform = %platform, cache = %cache_root.display(), "Installing sops");

    let client = GitHubClient::new(&config, cli.token.clone())?;
    let resolution = resolve_version(requested, &client, &config).await;
    if let Some(reason) = &resolution.fallback {
        runner.warning(reason)?;
    }
    let version = resolution.version;

    runner.group(&format!("Downloading {version}"))?;
    let tool = config.name.clone();
    let fetcher = Fetcher::new(FsToolCache::new(cache_root), client, config, platform);
    let installed = fetcher.install(&version).await;
    runner.end_group()?;

    let executable = installed?;
    Ok(publish(runner, &tool, &version, &executable)?)
}
