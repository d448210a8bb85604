//! Release-metadata endpoint construction.

use crate::config::{NetworkConfig, ToolConfig};
use crate::error::{Result, SetupError};

/// Map a requested version to the release-metadata endpoint for it.
///
/// `"latest"` resolves to the releases-latest endpoint; anything else must be
/// a `v`-prefixed tag and resolves to the releases-by-tag endpoint. The tag is
/// passed through literally: a malformed but `v`-prefixed tag is accepted here
/// and only fails once the release index reports no matching release.
pub fn format_version_url(version: &str) -> Result<String> {
    if version == "latest" {
        return Ok(format!(
            "{}/repos/{}/releases/latest",
            NetworkConfig::GITHUB_API_BASE,
            ToolConfig::GITHUB_REPO
        ));
    }

    if !version.starts_with('v') {
        return Err(SetupError::InvalidVersionFormat {
            version: version.to_string(),
        });
    }

    Ok(format!(
        "{}/repos/{}/releases/tags/{}",
        NetworkConfig::GITHUB_API_BASE,
        ToolConfig::GITHUB_REPO,
        version
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_uses_releases_latest_endpoint() {
        assert_eq!(
            format_version_url("latest").unwrap(),
            "https://api.github.com/repos/surrealdb/surrealdb/releases/latest"
        );
    }

    #[test]
    fn test_tag_uses_releases_by_tag_endpoint() {
        assert_eq!(
            format_version_url("v2.3.3").unwrap(),
            "https://api.github.com/repos/surrealdb/surrealdb/releases/tags/v2.3.3"
        );
    }

    #[test]
    fn test_malformed_but_v_prefixed_tag_is_passed_through() {
        // Rejected upstream, not here.
        assert_eq!(
            format_version_url("v1.2.3.4.5").unwrap(),
            "https://api.github.com/repos/surrealdb/surrealdb/releases/tags/v1.2.3.4.5"
        );
    }

    #[test]
    fn test_unprefixed_versions_are_rejected() {
        for version in ["invalid", "2.3.1", ""] {
            let err = format_version_url(version).unwrap_err();
            assert!(matches!(err, SetupError::InvalidVersionFormat { .. }));
        }
    }
}
