//! Exposing an installed tool to later workflow steps.

use crate::error::RunnerError;
use crate::runner::ActionsRunner;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// What [`publish`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Published {
    /// Absolute executable path written to the step output.
    pub path: PathBuf,
    /// Whether the executable's directory was added to the search path.
    pub path_updated: bool,
}

/// Step output name for a tool's executable path.
#[must_use]
pub fn output_name(tool: &str) -> String {
    format!("{tool}-path")
}

/// Publish an installed executable.
///
/// Adds the executable's directory to the search path when the runner
/// allows it, logs the cached location and sets the `<tool>-path` output.
/// A search path update that cannot be made is not an error.
pub fn publish<W: Write>(
    runner: &mut ActionsRunner<W>,
    tool: &str,
    version: &str,
    executable: &Path,
) -> Result<Published, RunnerError> {
    let path = std::path::absolute(executable).map_err(|source| RunnerError::File {
        path: executable.to_path_buf(),
        source,
    })?;

    let path_updated = match path.parent() {
        Some(dir) => match runner.add_path(dir) {
            Ok(()) => true,
            Err(err) => {
                debug!(dir = %dir.display(), "Search path not updated: {err}");
                false
            }
        },
        None => false,
    };

    let message = format!(
        "{tool} tool version '{version}' has been cached at {}",
        path.display()
    );
    info!("{message}");
    runner.info(&message)?;
    runner.set_output(&output_name(tool), &path.to_string_lossy())?;

    Ok(Published { path, path_updated })
}
