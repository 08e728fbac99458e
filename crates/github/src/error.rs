//! Error types for runner interactions.

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Errors from talking to the Actions runner.
#[derive(Error, Debug, Diagnostic)]
pub enum RunnerError {
    /// `PATH` is not set in this process.
    #[error("PATH is not set")]
    #[diagnostic(code(setup_sops::runner::search_path_unset))]
    SearchPathUnset,

    /// `$GITHUB_PATH` is not set, so later steps cannot see path changes.
    #[error("GITHUB_PATH is not set")]
    #[diagnostic(code(setup_sops::runner::path_file_unset))]
    PathFileUnset,

    /// A value collides with the generated heredoc delimiter.
    #[error("Unexpected input: {name} contains the delimiter {delimiter}")]
    #[diagnostic(code(setup_sops::runner::delimiter))]
    DelimiterCollision {
        /// Output name.
        name: String,
        /// Generated delimiter.
        delimiter: String,
    },

    /// Writing to a runner file failed.
    #[error("Failed to write {}: {source}", path.display())]
    #[diagnostic(code(setup_sops::runner::file))]
    File {
        /// Runner file path.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Writing a workflow command failed.
    #[error("Failed to write workflow command: {0}")]
    #[diagnostic(code(setup_sops::runner::command))]
    Command(#[from] std::io::Error),
}
