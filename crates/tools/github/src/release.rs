//! Release descriptors and latest-version selection.

use semver::Version;
use serde::Deserialize;

/// GitHub release metadata from the API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Release {
    /// Git tag of the release (e.g., "v3.8.1").
    pub tag_name: String,
    /// Unpublished draft.
    #[serde(default)]
    pub draft: bool,
    /// Marked as a prerelease.
    #[serde(default)]
    pub prerelease: bool,
    /// Flagged as the repository's latest release, when the API reports it.
    ///
    /// Not consulted by [`select_latest`].
    #[serde(default)]
    pub is_latest: bool,
}

impl Release {
    /// Whether this release is a stable candidate: not a draft, not a
    /// prerelease, and no `rc` in the tag.
    #[must_use]
    pub fn is_stable(&self) -> bool {
        !self.draft && !self.prerelease && !self.tag_name.contains("rc")
    }
}

/// Parse a release tag as semver, ignoring a leading `v`.
#[must_use]
pub fn parse_tag(tag: &str) -> Option<Version> {
    let bare = tag.strip_prefix(|c: char| c == 'v' || c == 'V').unwrap_or(tag);
    Version::parse(bare).ok()
}

/// Pick the highest stable release by semver ordering.
///
/// Tags that do not parse as semver are skipped. Returns `None` when no
/// candidate survives filtering.
#[must_use]
pub fn select_latest(releases: &[Release]) -> Option<&Release> {
    releases
        .iter()
        .filter(|release| release.is_stable())
        .filter_map(|release| parse_tag(&release.tag_name).map(|version| (version, release)))
        .max_by(|(a, _), (b, _)| a.cmp(b))
        .map(|(_, release)| release)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn release(tag: &str) -> Release {
        Release {
            tag_name: tag.to_string(),
            draft: false,
            prerelease: false,
            is_latest: false,
        }
    }

    #[test]
    fn test_excludes_rc_tags() {
        let releases = vec![release("v4.0.0"), release("v4.0.0-rc1")];
        assert_eq!(select_latest(&releases).unwrap().tag_name, "v4.0.0");
    }

    #[test]
    fn test_rc_only_is_none() {
        let releases = vec![release("v4.1.0-rc.1"), release("v4.1.0-rc.2")];
        assert!(select_latest(&releases).is_none());
    }

    #[test]
    fn test_excludes_drafts_and_prereleases() {
        let releases = vec![
            Release {
                draft: true,
                ..release("v3.10.0")
            },
            Release {
                prerelease: true,
                ..release("v3.9.5")
            },
            release("v3.9.1"),
        ];
        assert_eq!(select_latest(&releases).unwrap().tag_name, "v3.9.1");
    }

    #[test]
    fn test_highest_semver_wins_regardless_of_order() {
        let releases = vec![
            release("v3.8.1"),
            release("v3.10.2"),
            release("v3.9.4"),
            release("v3.7.3"),
        ];
        assert_eq!(select_latest(&releases).unwrap().tag_name, "v3.10.2");
    }

    #[test]
    fn test_is_latest_flag_is_not_consulted() {
        let releases = vec![
            Release {
                is_latest: true,
                ..release("v3.8.1")
            },
            release("v3.9.0"),
        ];
        assert_eq!(select_latest(&releases).unwrap().tag_name, "v3.9.0");
    }

    #[test]
    fn test_unparseable_tags_skipped() {
        let releases = vec![release("nightly"), release("3.7"), release("v3.7.3")];
        assert_eq!(select_latest(&releases).unwrap().tag_name, "v3.7.3");
    }

    #[test]
    fn test_empty_is_none() {
        assert!(select_latest(&[]).is_none());
    }

    #[test]
    fn test_parse_tag() {
        assert_eq!(parse_tag("v3.7.3"), Some(Version::new(3, 7, 3)));
        assert_eq!(parse_tag("V3.7.3"), Some(Version::new(3, 7, 3)));
        assert_eq!(parse_tag("3.7.3"), Some(Version::new(3, 7, 3)));
        assert!(parse_tag("latest").is_none());
    }

    #[test]
    fn test_deserialize_github_response() {
        let json = r#"[
            {"tag_name": "v3.9.0", "draft": false, "prerelease": false, "name": "v3.9.0", "assets": []},
            {"tag_name": "v3.9.0-rc.1", "draft": false, "prerelease": true}
        ]"#;
        let releases: Vec<Release> = serde_json::from_str(json).unwrap();
        assert_eq!(releases.len(), 2);
        assert_eq!(releases[0].tag_name, "v3.9.0");
        assert!(!releases[0].is_latest);
        assert!(releases[1].prerelease);
    }
}
