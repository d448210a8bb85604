//! Release metadata types.

use crate::platform::Platform;
use serde::Deserialize;
use std::path::PathBuf;

/// A single downloadable file attached to a release.
#[derive(Debug, Clone, Deserialize)]
pub struct Asset {
    pub name: String,
    #[serde(rename = "browser_download_url")]
    pub download_url: String,
}

/// Release metadata returned by the release index.
///
/// Asset order is the upstream-provided order; selection depends on it.
#[derive(Debug, Clone, Deserialize)]
pub struct Release {
    pub tag_name: String,
    #[serde(default)]
    pub assets: Vec<Asset>,
}

impl Release {
    /// First asset, in upstream order, whose name carries both platform tokens.
    pub fn matching_asset(&self, platform: Platform) -> Option<&Asset> {
        self.assets.iter().find(|asset| {
            asset.name.contains(platform.os_token()) && asset.name.contains(platform.arch_token())
        })
    }
}

/// Terminal output of a successful installation.
#[derive(Debug, Clone)]
pub struct InstallResult {
    /// The resolved release tag, concrete even when `"latest"` was requested.
    pub version: String,
    /// Directory holding the installed tool, inside the tool cache.
    pub path: PathBuf,
    /// Whether the version was already present in the cache.
    pub cache_hit: bool,
}
