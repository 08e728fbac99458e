//! Tool description types.
//!
//! - [`Platform`], [`Os`], [`Arch`] - host identification, used to pick the
//!   release artifact and the executable name
//! - [`ToolConfig`] - name, upstream repository, fallback version and
//!   permission bits for the tool being installed

mod config;
mod platform;

pub use config::{
    DEFAULT_EXECUTABLE_MODE, GITHUB_API_BASE, SOPS_REPOSITORY, SOPS_TOOL_NAME,
    STABLE_SOPS_VERSION, ToolConfig, default_cache_dir,
};
pub use platform::{Arch, Os, Platform};
