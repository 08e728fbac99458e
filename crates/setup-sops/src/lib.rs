//! setup-sops: install sops into a GitHub Actions runner.
//!
//! The binary resolves the requested version (`latest` goes through the
//! releases API and degrades to a pinned fallback), installs it into the
//! tool cache and publishes the executable path as the `sops-path` output.

/// CLI argument parsing and exit codes.
pub mod cli;
/// The installation run.
pub mod run;
/// Tracing setup.
pub mod tracing;

pub use cli::{Cli, CliError, EXIT_FAILURE, EXIT_OK, exit_code_for};
pub use run::run;
