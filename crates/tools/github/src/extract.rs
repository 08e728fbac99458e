//! Staging a downloaded artifact into a directory ready for the cache.

use flate2::read::GzDecoder;
use setup_sops_core::locate::make_executable;
use setup_sops_core::{Error, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tar::Archive;
use tracing::debug;

const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
const GZIP_MAGIC: &[u8] = &[0x1f, 0x8b];

/// Packaging of a downloaded artifact, detected from its leading bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    /// Zip archive.
    Zip,
    /// Gzip-compressed tarball.
    TarGz,
    /// Anything else is treated as the executable itself.
    Binary,
}

impl ArtifactKind {
    /// Classify by magic bytes.
    #[must_use]
    pub fn from_magic(header: &[u8]) -> Self {
        if header.starts_with(ZIP_MAGIC) {
            Self::Zip
        } else if header.starts_with(GZIP_MAGIC) {
            Self::TarGz
        } else {
            Self::Binary
        }
    }

    /// Classify the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn detect(path: &Path) -> Result<Self> {
        let mut header = Vec::with_capacity(4);
        File::open(path)
            .map_err(|e| Error::io(e, path, "open"))?
            .take(4)
            .read_to_end(&mut header)
            .map_err(|e| Error::io(e, path, "read"))?;
        Ok(Self::from_magic(&header))
    }
}

/// Lay out `artifact` under `dest` so it can be registered in the cache.
///
/// Archives are unpacked as-is. A bare binary is copied to
/// `dest/<executable_name>` with `mode` applied.
///
/// # Errors
///
/// Returns an error if the archive is malformed or `dest` cannot be written.
pub fn stage(
    artifact: &Path,
    kind: ArtifactKind,
    dest: &Path,
    executable_name: &str,
    mode: u32,
) -> Result<()> {
    std::fs::create_dir_all(dest).map_err(|e| Error::io(e, dest, "create"))?;
    debug!(?artifact, ?kind, ?dest, "Staging artifact");

    match kind {
        ArtifactKind::Zip => extract_zip(artifact, dest),
        ArtifactKind::TarGz => extract_tar_gz(artifact, dest),
        ArtifactKind::Binary => {
            let target = dest.join(executable_name);
            std::fs::copy(artifact, &target).map_err(|e| Error::io(e, &target, "copy"))?;
            make_executable(&target, mode)
        }
    }
}

fn extract_zip(artifact: &Path, dest: &Path) -> Result<()> {
    let file = File::open(artifact).map_err(|e| Error::io(e, artifact, "open"))?;
    let mut archive = zip::ZipArchive::new(file)
        .map_err(|e| Error::extraction(format!("Failed to open zip: {e}")))?;

    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .map_err(|e| Error::extraction(format!("Failed to read zip entry: {e}")))?;

        // Entries escaping the destination are dropped
        let Some(relative) = entry.enclosed_name() else {
            continue;
        };
        let outpath = dest.join(relative);

        if entry.is_dir() {
            std::fs::create_dir_all(&outpath).map_err(|e| Error::io(e, &outpath, "create"))?;
            continue;
        }

        if let Some(parent) = outpath.parent() {
            std::fs::create_dir_all(parent).map_err(|e| Error::io(e, parent, "create"))?;
        }
        let mut out = File::create(&outpath).map_err(|e| Error::io(e, &outpath, "create"))?;
        std::io::copy(&mut entry, &mut out).map_err(|e| Error::io(e, &outpath, "write"))?;

        if let Some(mode) = entry.unix_mode() {
            make_executable(&outpath, mode)?;
        }
    }
    Ok(())
}

fn extract_tar_gz(artifact: &Path, dest: &Path) -> Result<()> {
    let file = File::open(artifact).map_err(|e| Error::io(e, artifact, "open"))?;
    Archive::new(GzDecoder::new(file))
        .unpack(dest)
        .map_err(|e| Error::extraction(format!("Failed to extract tar: {e}")))
}
