use crate::tracing::{LogLevel, TracingConfig, TracingFormat};
use clap::Parser;
use miette::Diagnostic;
use setup_sops_core::tools::{Platform, ToolConfig};
use std::path::PathBuf;
use thiserror::Error;

/// Successful run
pub const EXIT_OK: i32 = 0;
/// Any fatal error
pub const EXIT_FAILURE: i32 = 1;

/// Errors that end a run.
#[derive(Error, Debug, Diagnostic)]
pub enum CliError {
    /// Resolution, download, extraction or caching failed.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Install(#[from] setup_sops_core::Error),

    /// The runner could not be told about the result.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Runner(#[from] setup_sops_github::RunnerError),
}

/// Map a CLI error to its exit code
#[must_use]
pub const fn exit_code_for(_err: &CliError) -> i32 {
    EXIT_FAILURE
}

/// Command-line arguments. Every input also reads from the environment the
/// Actions runner provides.
#[derive(Parser, Debug)]
#[command(name = "setup-sops")]
#[command(about = "Install sops into the runner tool cache and put it on PATH")]
#[command(long_about = None)]
#[command(version)]
pub struct Cli {
    /// Version to install, e.g. `v3.8.1`, `3.8.1` or `latest`.
    #[arg(long = "sops-version", env = "INPUT_VERSION", value_name = "VERSION")]
    pub sops_version: String,

    /// Token for the releases API.
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Root of the tool cache.
    #[arg(long, env = "RUNNER_TOOL_CACHE", value_name = "DIR")]
    pub tool_cache: Option<PathBuf>,

    /// Logging verbosity level.
    #[arg(
        short = 'L',
        long,
        env = "SETUP_SOPS_LOG",
        default_value = "info",
        value_enum
    )]
    pub level: LogLevel,

    /// Log output format.
    #[arg(long, default_value = "compact", value_enum)]
    pub log_format: TracingFormat,

    /// Full `tracing` filter directive, e.g. `setup_sops=debug,reqwest=trace`.
    /// Takes precedence over `--level`.
    #[arg(long, env = "SETUP_SOPS_LOG_FILTER", value_name = "DIRECTIVE")]
    pub log_filter: Option<String>,

    /// Target platform as `<os>-<arch>`, e.g. `linux-x64` or `Windows_NT-arm64`.
    #[arg(long, env = "SETUP_SOPS_PLATFORM", hide = true, value_parser = parse_platform)]
    pub platform: Option<Platform>,

    /// Releases API base URL.
    #[arg(long, env = "SETUP_SOPS_API_BASE", hide = true)]
    pub api_base: Option<String>,

    /// Release download base URL.
    #[arg(long, env = "SETUP_SOPS_DOWNLOAD_BASE", hide = true)]
    pub download_base: Option<String>,

    /// Version used when the latest release cannot be determined.
    #[arg(long, env = "SETUP_SOPS_DEFAULT_VERSION", hide = true)]
    pub default_version: Option<String>,
}

fn parse_platform(value: &str) -> Result<Platform, String> {
    Platform::parse(value).ok_or_else(|| format!("expected <os>-<arch>, got '{value}'"))
}

impl Cli {
    /// Tool settings with any overrides applied.
    #[must_use]
    pub fn tool_config(&self) -> ToolConfig {
        let mut config = ToolConfig::default();
        if let Some(base) = &self.api_base {
            config = config.with_api_base(base.as_str());
        }
        if let Some(base) = &self.download_base {
            config = config.with_download_base(base.as_str());
        }
        if let Some(version) = &self.default_version {
            config = config.with_default_version(version.as_str());
        }
        config
    }

    /// Tracing settings from the logging flags.
    #[must_use]
    pub fn tracing_config(&self) -> TracingConfig {
        TracingConfig {
            format: self.log_format,
            level: self.level.into(),
            filter: self.log_filter.clone().filter(|f| !f.trim().is_empty()),
        }
    }

    /// Platform to install for.
    #[must_use]
    pub fn target_platform(&self) -> Platform {
        self.platform.clone().unwrap_or_else(Platform::current)
    }
}

/// Parse command-line arguments
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}
