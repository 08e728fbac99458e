//! Cache lookup, download and executable location.

use setup_sops_core::cache::ToolCache;
use setup_sops_core::locate::{find_executable, make_executable};
use setup_sops_core::tools::{Platform, ToolConfig};
use setup_sops_core::{Error, Result};
use std::path::PathBuf;
use tracing::{debug, info};

use crate::client::Downloader;
use crate::extract::{ArtifactKind, stage};
use crate::url::download_url;

/// Installs a tool version into the cache and returns its executable.
pub struct Fetcher<C, D> {
    cache: C,
    downloader: D,
    config: ToolConfig,
    platform: Platform,
}

impl<C: ToolCache, D: Downloader> Fetcher<C, D> {
    /// Create a fetcher for `platform`.
    pub fn new(cache: C, downloader: D, config: ToolConfig, platform: Platform) -> Self {
        Self {
            cache,
            downloader,
            config,
            platform,
        }
    }

    /// Download URL for `version` on this fetcher's platform.
    #[must_use]
    pub fn download_url(&self, version: &str) -> String {
        download_url(&self.config, version, &self.platform)
    }

    /// Expected executable file name on this fetcher's platform.
    #[must_use]
    pub fn executable_name(&self) -> String {
        self.platform.executable_name(&self.config.name)
    }

    /// Make sure `version` is cached and return the path of its executable.
    ///
    /// A cache hit performs no network access. On a miss the artifact is
    /// downloaded once (no retry), staged and registered in the cache.
    ///
    /// # Errors
    ///
    /// - [`Error::Download`] naming the URL when the download fails; the
    ///   cache is not written in that case
    /// - [`Error::ExecutableNotFound`] naming the cached directory when no
    ///   file with the executable name exists under it
    pub async fn install(&self, version: &str) -> Result<PathBuf> {
        let tool = self.config.name.as_str();
        let arch = self.platform.arch.to_string();

        let cached = if let Some(dir) = self.cache.find(tool, version, &arch) {
            info!(%tool, %version, ?dir, "Found cached tool");
            dir
        } else {
            self.download_and_cache(version, &arch).await?
        };

        let executable = find_executable(&cached, tool, &self.executable_name())?;
        // Cache registration is not guaranteed to keep permission bits
        make_executable(&executable, self.config.executable_mode)?;
        debug!(?executable, "Located executable");
        Ok(executable)
    }

    async fn download_and_cache(&self, version: &str, arch: &str) -> Result<PathBuf> {
        let tool = self.config.name.as_str();
        let url = self.download_url(version);

        let workdir = tempfile::Builder::new()
            .prefix("setup-sops-")
            .tempdir()
            .map_err(|e| Error::cache(format!("Failed to create temp directory: {e}")))?;
        let download = workdir.path().join("download");

        info!(%tool, %version, %url, "Downloading");
        self.downloader
            .download(&url, &download)
            .await
            .map_err(|e| Error::download(tool, &url, e.to_string()))?;

        make_executable(&download, self.config.executable_mode)?;

        let kind = ArtifactKind::detect(&download)?;
        let staging = workdir.path().join("staging");
        stage(
            &download,
            kind,
            &staging,
            &self.executable_name(),
            self.config.executable_mode,
        )?;

        self.cache.cache_dir(&staging, tool, version, arch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use setup_sops_core::cache::FsToolCache;
    use setup_sops_core::tools::{Arch, Os};
    use std::path::Path;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    /// Serves fixed bytes and records requested URLs.
    #[derive(Clone, Default)]
    struct FakeDownloader {
        body: Option<Vec<u8>>,
        requests: Arc<Mutex<Vec<String>>>,
    }

    impl FakeDownloader {
        fn serving(body: &[u8]) -> Self {
            Self {
                body: Some(body.to_vec()),
                ..Self::default()
            }
        }

        fn failing() -> Self {
            Self::default()
        }

        fn requests(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Downloader for FakeDownloader {
        async fn download(&self, url: &str, dest: &Path) -> Result<()> {
            self.requests.lock().unwrap().push(url.to_string());
            match &self.body {
                Some(body) => {
                    std::fs::write(dest, body)?;
                    Ok(())
                }
                None => Err(Error::http("Unable to download")),
            }
        }
    }

    fn windows() -> Platform {
        Platform::new(Os::Windows, Arch::X86_64)
    }

    fn fetcher(
        temp: &TempDir,
        downloader: FakeDownloader,
        platform: Platform,
    ) -> Fetcher<FsToolCache, FakeDownloader> {
        Fetcher::new(
            FsToolCache::new(temp.path().join("cache")),
            downloader,
            ToolConfig::default(),
            platform,
        )
    }

    #[tokio::test]
    async fn test_cache_hit_skips_download() {
        let temp = TempDir::new().unwrap();
        let cache = FsToolCache::new(temp.path().join("cache"));
        let seeded = temp.path().join("seed");
        std::fs::create_dir_all(&seeded).unwrap();
        std::fs::write(seeded.join("sops.exe"), b"MZ").unwrap();
        let cached_dir = cache.cache_dir(&seeded, "sops", "v3.2.1", "x64").unwrap();

        let downloader = FakeDownloader::failing();
        let fetcher = fetcher(&temp, downloader.clone(), windows());

        let path = fetcher.install("v3.2.1").await.unwrap();
        assert_eq!(path, cached_dir.join("sops.exe"));
        assert!(downloader.requests().is_empty());
    }

    #[tokio::test]
    async fn test_download_failure_names_url_and_leaves_cache_empty() {
        let temp = TempDir::new().unwrap();
        let downloader = FakeDownloader::failing();
        let fetcher = fetcher(&temp, downloader.clone(), windows());

        let err = fetcher.install("v3.2.1").await.unwrap_err();

        let url = "https://github.com/mozilla/sops/releases/download/v3.2.1/sops-v3.2.1.exe";
        assert!(matches!(err, Error::Download { .. }));
        assert!(
            err.to_string()
                .starts_with(&format!("Failed to download sops from location {url}"))
        );
        assert_eq!(downloader.requests(), vec![url.to_string()]);

        let cache = FsToolCache::new(temp.path().join("cache"));
        assert!(cache.find("sops", "v3.2.1", "x64").is_none());
        assert!(!temp.path().join("cache").join("sops").exists());
    }

    #[tokio::test]
    async fn test_bare_binary_is_cached_under_executable_name() {
        let temp = TempDir::new().unwrap();
        let downloader = FakeDownloader::serving(b"\x7fELF");
        let fetcher = fetcher(
            &temp,
            downloader.clone(),
            Platform::new(Os::Linux, Arch::Arm64),
        );

        let path = fetcher.install("v3.8.1").await.unwrap();

        let cache = FsToolCache::new(temp.path().join("cache"));
        let entry = cache.find("sops", "v3.8.1", "arm64").unwrap();
        assert_eq!(path, entry.join("sops"));
        assert_eq!(std::fs::read(&path).unwrap(), b"\x7fELF");
        assert_eq!(
            downloader.requests(),
            vec![
                "https://github.com/mozilla/sops/releases/download/v3.8.1/sops-v3.8.1.linux.arm64"
                    .to_string()
            ]
        );

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(&path).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o755);
        }
    }

    #[tokio::test]
    async fn test_second_install_uses_cache() {
        let temp = TempDir::new().unwrap();
        let downloader = FakeDownloader::serving(b"MZ");
        let fetcher = fetcher(&temp, downloader.clone(), windows());

        let first = fetcher.install("v3.7.3").await.unwrap();
        let second = fetcher.install("v3.7.3").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(downloader.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_zip_archive_is_searched_recursively() {
        use std::io::Write;

        let mut buffer = std::io::Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut buffer);
            writer
                .start_file(
                    "release/bin/sops.exe",
                    zip::write::SimpleFileOptions::default(),
                )
                .unwrap();
            writer.write_all(b"MZ").unwrap();
            writer.finish().unwrap();
        }

        let temp = TempDir::new().unwrap();
        let downloader = FakeDownloader::serving(&buffer.into_inner());
        let fetcher = fetcher(&temp, downloader, windows());

        let path = fetcher.install("v3.7.3").await.unwrap();
        assert!(path.ends_with("release/bin/sops.exe"));
    }

    #[tokio::test]
    async fn test_missing_executable_names_cached_dir() {
        use std::io::Write;

        let mut buffer = std::io::Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut buffer);
            writer
                .start_file("README.md", zip::write::SimpleFileOptions::default())
                .unwrap();
            writer.write_all(b"no binary here").unwrap();
            writer.finish().unwrap();
        }

        let temp = TempDir::new().unwrap();
        let downloader = FakeDownloader::serving(&buffer.into_inner());
        let fetcher = fetcher(&temp, downloader, windows());

        let err = fetcher.install("v3.2.1").await.unwrap_err();

        let cached = FsToolCache::new(temp.path().join("cache")).entry_dir("sops", "v3.2.1", "x64");
        assert!(matches!(err, Error::ExecutableNotFound { .. }));
        assert_eq!(
            err.to_string(),
            format!("sops executable not found in path {}", cached.display())
        );
    }

    #[test]
    fn test_download_url_and_executable_name() {
        let temp = TempDir::new().unwrap();
        let fetcher = fetcher(&temp, FakeDownloader::failing(), windows());

        assert_eq!(
            fetcher.download_url("v3.2.1"),
            "https://github.com/mozilla/sops/releases/download/v3.2.1/sops-v3.2.1.exe"
        );
        assert_eq!(fetcher.executable_name(), "sops.exe");
    }
}
