//! Error types for setup-sops operations.

use miette::Diagnostic;
use std::path::Path;
use thiserror::Error;

/// Result type for setup-sops operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while resolving, fetching or locating a tool.
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    /// Invalid step input or configuration.
    #[error("Configuration error: {message}")]
    #[diagnostic(code(setup_sops::config))]
    Configuration {
        /// The error message.
        message: String,
        /// Optional help text.
        #[help]
        help: Option<String>,
    },

    /// The release list could not be fetched or parsed.
    ///
    /// The version resolver recovers from this by falling back to the
    /// configured default version.
    #[error("Failed to fetch releases: {message}")]
    #[diagnostic(code(setup_sops::release_lookup))]
    ReleaseLookup {
        /// The error message.
        message: String,
    },

    /// An HTTP request failed or returned a non-success status.
    #[error("HTTP request failed: {message}")]
    #[diagnostic(code(setup_sops::http))]
    Http {
        /// The error message.
        message: String,
    },

    /// The tool binary or archive could not be downloaded.
    #[error("Failed to download {tool} from location {url}: {message}")]
    #[diagnostic(
        code(setup_sops::download),
        help("Check that the requested version exists and the runner has network access")
    )]
    Download {
        /// Tool name.
        tool: String,
        /// The attempted URL.
        url: String,
        /// Underlying failure.
        message: String,
    },

    /// A downloaded archive could not be unpacked.
    #[error("Failed to extract archive: {message}")]
    #[diagnostic(code(setup_sops::extraction))]
    Extraction {
        /// The error message.
        message: String,
    },

    /// No file with the expected executable name exists under the cached tree.
    #[error("{tool} executable not found in path {}", root.display())]
    #[diagnostic(code(setup_sops::executable_not_found))]
    ExecutableNotFound {
        /// Tool name.
        tool: String,
        /// The directory that was searched.
        root: Box<Path>,
    },

    /// Registering a directory in the tool cache failed.
    #[error("Cache error: {message}")]
    #[diagnostic(code(setup_sops::cache))]
    Cache {
        /// The error message.
        message: String,
    },

    /// Filesystem failure with context.
    #[error("I/O {operation} failed{}: {source}", path.as_ref().map_or(String::new(), |p| format!(" on {}", p.display())))]
    #[diagnostic(
        code(setup_sops::io),
        help("Check file permissions and ensure the path exists")
    )]
    Io {
        /// The underlying error.
        #[source]
        source: std::io::Error,
        /// Path involved, if any.
        path: Option<Box<Path>>,
        /// What was being attempted (e.g. "read", "chmod").
        operation: String,
    },
}

impl Error {
    /// Create a configuration error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
            help: None,
        }
    }

    /// Create a configuration error with help text.
    #[must_use]
    pub fn configuration_with_help(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
            help: Some(help.into()),
        }
    }

    /// Create a release lookup error.
    #[must_use]
    pub fn release_lookup(message: impl Into<String>) -> Self {
        Self::ReleaseLookup {
            message: message.into(),
        }
    }

    /// Create an HTTP error.
    #[must_use]
    pub fn http(message: impl Into<String>) -> Self {
        Self::Http {
            message: message.into(),
        }
    }

    /// Create a download error naming the attempted URL.
    #[must_use]
    pub fn download(
        tool: impl Into<String>,
        url: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Download {
            tool: tool.into(),
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create an extraction error.
    #[must_use]
    pub fn extraction(message: impl Into<String>) -> Self {
        Self::Extraction {
            message: message.into(),
        }
    }

    /// Create an executable-not-found error naming the searched root.
    #[must_use]
    pub fn executable_not_found(tool: impl Into<String>, root: &Path) -> Self {
        Self::ExecutableNotFound {
            tool: tool.into(),
            root: root.into(),
        }
    }

    /// Create a cache error.
    #[must_use]
    pub fn cache(message: impl Into<String>) -> Self {
        Self::Cache {
            message: message.into(),
        }
    }

    /// Wrap an I/O error with the path and operation that produced it.
    #[must_use]
    pub fn io(source: std::io::Error, path: &Path, operation: impl Into<String>) -> Self {
        Self::Io {
            source,
            path: Some(path.into()),
            operation: operation.into(),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Self::Io {
            source,
            path: None,
            operation: "operation".to_string(),
        }
    }
}
