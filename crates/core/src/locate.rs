//! Executable lookup inside a cached tool tree.
//!
//! Archive layouts are not guaranteed to put the binary at a fixed path, so
//! the cached directory is searched recursively for the expected file name.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::{Error, Result};

/// Find every non-directory entry under `root` whose file name equals `file_name`.
///
/// Entries are returned in the order the filesystem enumerates them; nothing
/// is sorted. Symlinks are not followed. Unreadable directories and entries
/// are skipped with a warning instead of aborting the search, and a missing
/// or unreadable root yields an empty list.
#[must_use]
pub fn find_files(root: &Path, file_name: &str) -> Vec<PathBuf> {
    let target = OsStr::new(file_name);

    WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(path = ?e.path(), error = %e, "Skipping unreadable entry");
                None
            }
        })
        .filter(|entry| !entry.file_type().is_dir())
        .inspect(|entry| debug!(path = ?entry.path(), "Visited"))
        .filter(|entry| entry.file_name() == target)
        .map(walkdir::DirEntry::into_path)
        .collect()
}

/// Find the executable named `file_name` under `root`.
///
/// When several files match, the first one enumerated wins. That order is
/// filesystem-defined.
///
/// # Errors
///
/// Returns [`Error::ExecutableNotFound`] naming `root` if nothing matches.
pub fn find_executable(root: &Path, tool: &str, file_name: &str) -> Result<PathBuf> {
    find_files(root, file_name)
        .into_iter()
        .next()
        .ok_or_else(|| Error::executable_not_found(tool, root))
}

/// Set `mode` on `path`. No-op on non-Unix platforms.
///
/// # Errors
///
/// Returns an error if the permissions cannot be changed.
pub fn make_executable(path: &Path, mode: u32) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode))
            .map_err(|e| Error::io(e, path, "chmod"))?;
    }
    #[cfg(not(unix))]
    {
        let _ = (path, mode);
    }
    Ok(())
}
