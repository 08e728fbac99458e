//! Tool cache keyed by (tool, version, arch).
//!
//! The on-disk layout matches the hosted runner tool cache so that entries
//! written by other setup steps are found too. Version directories hold the
//! cleaned semver (`v3.11.1` is stored as `3.11.1`):
//!
//! ```text
//! $RUNNER_TOOL_CACHE/
//! └── sops/
//!     └── 3.11.1/
//!         ├── x64/            # Cached tree
//!         │   └── sops
//!         └── x64.complete    # Written last; an entry without it is ignored
//! ```

use std::path::{Path, PathBuf};
use tracing::{debug, trace};
use walkdir::WalkDir;

use crate::tools::default_cache_dir;
use crate::{Error, Result};

/// Lookup and store interface of a tool cache.
pub trait ToolCache {
    /// Find the cached directory for (tool, version, arch), if complete.
    fn find(&self, tool: &str, version: &str, arch: &str) -> Option<PathBuf>;

    /// Copy `source` into the cache under (tool, version, arch).
    ///
    /// Any previous entry for the same key is replaced. Returns the cached
    /// directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be read or the cache written.
    fn cache_dir(&self, source: &Path, tool: &str, version: &str, arch: &str) -> Result<PathBuf>;
}

/// Filesystem-backed tool cache.
#[derive(Debug, Clone)]
pub struct FsToolCache {
    root: PathBuf,
}

impl Default for FsToolCache {
    fn default() -> Self {
        Self::new(default_cache_dir())
    }
}

impl FsToolCache {
    /// Create a cache at the specified root directory.
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Get the directory for a cache entry.
    #[must_use]
    pub fn entry_dir(&self, tool: &str, version: &str, arch: &str) -> PathBuf {
        self.root.join(tool).join(cache_version(version)).join(arch)
    }

    /// Get the completion marker for a cache entry.
    #[must_use]
    pub fn marker_path(&self, tool: &str, version: &str, arch: &str) -> PathBuf {
        self.root
            .join(tool)
            .join(cache_version(version))
            .join(format!("{arch}.complete"))
    }
}

/// Version directory name for `version`.
///
/// Semver versions are stored without the `v` prefix; anything that does not
/// parse is kept as given.
#[must_use]
pub fn cache_version(version: &str) -> String {
    let trimmed = version.trim();
    let bare = trimmed
        .strip_prefix(['v', 'V'])
        .unwrap_or(trimmed);
    match semver::Version::parse(bare) {
        Ok(parsed) => parsed.to_string(),
        Err(_) => version.to_string(),
    }
}

impl ToolCache for FsToolCache {
    fn find(&self, tool: &str, version: &str, arch: &str) -> Option<PathBuf> {
        let dir = self.entry_dir(tool, version, arch);
        if dir.is_dir() && self.marker_path(tool, version, arch).is_file() {
            trace!(tool, version, arch, ?dir, "Cache hit");
            Some(dir)
        } else {
            trace!(tool, version, arch, "Cache miss");
            None
        }
    }

    fn cache_dir(&self, source: &Path, tool: &str, version: &str, arch: &str) -> Result<PathBuf> {
        if !source.is_dir() {
            return Err(Error::cache(format!(
                "Source is not a directory: {}",
                source.display()
            )));
        }

        let dest = self.entry_dir(tool, version, arch);
        let marker = self.marker_path(tool, version, arch);

        if marker.exists() {
            std::fs::remove_file(&marker).map_err(|e| Error::io(e, &marker, "remove"))?;
        }
        if dest.exists() {
            std::fs::remove_dir_all(&dest).map_err(|e| Error::io(e, &dest, "remove"))?;
        }
        std::fs::create_dir_all(&dest).map_err(|e| Error::io(e, &dest, "create"))?;

        copy_tree(source, &dest)?;

        std::fs::write(&marker, b"").map_err(|e| Error::io(e, &marker, "write"))?;
        debug!(tool, version, arch, ?dest, "Stored tool in cache");
        Ok(dest)
    }
}

/// Recursively copy the contents of `source` into `dest`.
///
/// `std::fs::copy` carries permission bits over on Unix.
fn copy_tree(source: &Path, dest: &Path) -> Result<()> {
    for entry in WalkDir::new(source).min_depth(1) {
        let entry = entry.map_err(|e| Error::cache(format!("Failed to read source tree: {e}")))?;
        let relative = entry
            .path()
            .strip_prefix(source)
            .map_err(|e| Error::cache(e.to_string()))?;
        let target = dest.join(relative);

        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&target).map_err(|e| Error::io(e, &target, "create"))?;
        } else {
            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent).map_err(|e| Error::io(e, parent, "create"))?;
            }
            std::fs::copy(entry.path(), &target).map_err(|e| Error::io(e, &target, "copy"))?;
        }
    }
    Ok(())
}
