//! The Actions runner as seen from inside a step.
//!
//! The runner talks to steps through environment-named files and through
//! workflow commands printed to stdout. [`ActionsRunner`] captures the
//! relevant environment once and keeps the search path in memory, so the
//! process environment is never mutated.

use crate::commands::format_command;
use crate::error::RunnerError;
use std::ffi::OsString;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Step-side handle on the Actions runner.
#[derive(Debug)]
pub struct ActionsRunner<W: Write> {
    writer: W,
    output_file: Option<PathBuf>,
    path_file: Option<PathBuf>,
    search_path: Option<OsString>,
}

/// Read a runner file location, treating an empty value as unset.
fn env_file(name: &str) -> Option<PathBuf> {
    std::env::var_os(name)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

impl<W: Write> ActionsRunner<W> {
    /// A runner with no output file, no path file and no search path.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            output_file: None,
            path_file: None,
            search_path: None,
        }
    }

    /// Capture `GITHUB_OUTPUT`, `GITHUB_PATH` and `PATH` from the environment.
    pub fn from_env(writer: W) -> Self {
        Self {
            writer,
            output_file: env_file("GITHUB_OUTPUT"),
            path_file: env_file("GITHUB_PATH"),
            search_path: std::env::var_os("PATH"),
        }
    }

    /// Set the step output file.
    #[must_use]
    pub fn with_output_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_file = Some(path.into());
        self
    }

    /// Set the path file read by later steps.
    #[must_use]
    pub fn with_path_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.path_file = Some(path.into());
        self
    }

    /// Set the current search path.
    #[must_use]
    pub fn with_search_path(mut self, path: impl Into<OsString>) -> Self {
        self.search_path = Some(path.into());
        self
    }

    /// The search path as this step sees it, including added directories.
    pub fn search_path(&self) -> Option<&OsString> {
        self.search_path.as_ref()
    }

    /// Consume the runner and return the command writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn command(
        &mut self,
        name: &str,
        properties: &[(&str, &str)],
        message: &str,
    ) -> Result<(), RunnerError> {
        writeln!(self.writer, "{}", format_command(name, properties, message))?;
        Ok(())
    }

    /// Print a plain log line.
    pub fn info(&mut self, message: &str) -> Result<(), RunnerError> {
        writeln!(self.writer, "{message}")?;
        Ok(())
    }

    /// Emit a warning annotation.
    pub fn warning(&mut self, message: &str) -> Result<(), RunnerError> {
        self.command("warning", &[], message)
    }

    /// Emit an error annotation.
    pub fn error(&mut self, message: &str) -> Result<(), RunnerError> {
        self.command("error", &[], message)
    }

    /// Open a collapsible log group.
    pub fn group(&mut self, title: &str) -> Result<(), RunnerError> {
        self.command("group", &[], title)
    }

    /// Close the current log group.
    pub fn end_group(&mut self) -> Result<(), RunnerError> {
        self.command("endgroup", &[], "")
    }

    /// Record a step output.
    ///
    /// With `$GITHUB_OUTPUT` set the value is appended in heredoc form under
    /// a random delimiter; otherwise the legacy `set-output` command is used.
    pub fn set_output(&mut self, name: &str, value: &str) -> Result<(), RunnerError> {
        let Some(file) = self.output_file.clone() else {
            return self.command("set-output", &[("name", name)], value);
        };

        let delimiter = format!("ghadelimiter_{}", uuid::Uuid::new_v4());
        if name.contains(&delimiter) || value.contains(&delimiter) {
            return Err(RunnerError::DelimiterCollision {
                name: name.to_string(),
                delimiter,
            });
        }

        append(&file, &format!("{name}<<{delimiter}\n{value}\n{delimiter}\n"))?;
        debug!(output = name, file = %file.display(), "Recorded step output");
        Ok(())
    }

    /// Put `dir` in front of the search path for this and later steps.
    ///
    /// Nothing is written when `dir` is already the first search path entry.
    pub fn add_path(&mut self, dir: &Path) -> Result<(), RunnerError> {
        let current = self
            .search_path
            .as_ref()
            .ok_or(RunnerError::SearchPathUnset)?;

        if std::env::split_paths(current).next().as_deref() == Some(dir) {
            debug!(dir = %dir.display(), "Directory already leads the search path");
            return Ok(());
        }

        let file = self.path_file.clone().ok_or(RunnerError::PathFileUnset)?;
        append(&file, &format!("{}\n", dir.display()))?;

        let mut entries = vec![dir.to_path_buf()];
        entries.extend(std::env::split_paths(current));
        // Joining only fails when an entry contains the separator
        self.search_path = match std::env::join_paths(&entries) {
            Ok(joined) => Some(joined),
            Err(_) => {
                let mut joined = dir.as_os_str().to_os_string();
                joined.push(if cfg!(windows) { ";" } else { ":" });
                joined.push(current);
                Some(joined)
            }
        };
        debug!(dir = %dir.display(), file = %file.display(), "Added directory to search path");
        Ok(())
    }
}

fn append(path: &Path, content: &str) -> Result<(), RunnerError> {
    let file_error = |source| RunnerError::File {
        path: path.to_path_buf(),
        source,
    };
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(file_error)?;
    file.write_all(content.as_bytes()).map_err(file_error)
}
