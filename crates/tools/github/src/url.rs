//! Release asset URLs.

use setup_sops_core::tools::{Arch, Os, Platform, ToolConfig};

/// Asset file name for `tool` at `version` on `platform`.
///
/// Unrecognized operating systems get the Windows asset.
#[must_use]
pub fn asset_name(tool: &str, version: &str, platform: &Platform) -> String {
    match (&platform.os, &platform.arch) {
        (Os::Linux, Arch::Arm64) => format!("{tool}-{version}.linux.arm64"),
        (Os::Linux, _) => format!("{tool}-{version}.linux.amd64"),
        (Os::Darwin, Arch::Arm64) => format!("{tool}-{version}.darwin.arm64"),
        (Os::Darwin, _) => format!("{tool}-{version}.darwin.amd64"),
        (Os::Windows | Os::Other(_), _) => format!("{tool}-{version}.exe"),
    }
}

/// Download URL for the tool in `config` at `version` on `platform`.
#[must_use]
pub fn download_url(config: &ToolConfig, version: &str, platform: &Platform) -> String {
    format!(
        "{}/{}/{}",
        config.download_base,
        version,
        asset_name(&config.name, version, platform)
    )
}
