//! Installation orchestration.
//!
//! Ties the release index, the platform tokens, the download and extraction
//! steps, and the tool cache together into one installation flow. The
//! metadata fetch always runs, even for a version that turns out to be
//! cached, because `"latest"` can only be resolved against the index.

use crate::archive;
use crate::cache::ToolCache;
use crate::config::{ActionConfig, SetupConfig, ToolConfig};
use crate::error::{Result, SetupError};
use crate::models::InstallResult;
use crate::network::{fetch_release, resolve_retry_budget, Downloader, Transport};
use crate::outputs::RunnerOutputs;
use crate::platform::{Os, Platform};
use crate::version::format_version_url;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use uuid::Uuid;

/// Orchestrates one SurrealDB installation.
pub struct Installer<T, D> {
    config: SetupConfig,
    transport: T,
    downloader: D,
    /// Resolved lazily: cache hits never need platform tokens.
    platform: Option<Platform>,
    cache: ToolCache,
    outputs: RunnerOutputs,
}

impl<T: Transport, D: Downloader> Installer<T, D> {
    /// Create an installer that detects the platform it runs on.
    pub fn new(config: SetupConfig, transport: T, downloader: D) -> Self {
        let cache = ToolCache::new(&config.cache_dir);
        let outputs = RunnerOutputs::new(config.output_file.clone(), config.path_file.clone());
        Self {
            config,
            transport,
            downloader,
            platform: None,
            cache,
            outputs,
        }
    }

    /// Create an installer for an explicit platform.
    pub fn with_platform(
        config: SetupConfig,
        transport: T,
        downloader: D,
        platform: Platform,
    ) -> Self {
        let mut installer = Self::new(config, transport, downloader);
        installer.platform = Some(platform);
        installer
    }

    /// Resolve, retrieve, and install the requested version.
    pub async fn install(&self) -> Result<InstallResult> {
        info!("Installing SurrealDB...");

        let url = format_version_url(&self.config.version)?;

        let max_attempts = resolve_retry_budget(self.config.retry_count.as_deref());
        self.outputs
            .set_output(ActionConfig::RETRY_COUNT_OUTPUT, &max_attempts.to_string())?;

        let release = fetch_release(&self.transport, &url, max_attempts).await?;
        let version = release.tag_name.clone();
        debug!("Processing version tag: {version}");

        if let Some(cached) = self.cache.find(ToolConfig::TOOL_NAME, &version) {
            info!("Using cached SurrealDB version {version}");
            self.outputs.add_path(&cached)?;
            self.publish(&version, &cached, true)?;
            return Ok(InstallResult {
                version,
                path: cached,
                cache_hit: true,
            });
        }

        let platform = match self.platform {
            Some(platform) => platform,
            None => Platform::detect()?,
        };
        debug!("Installing SurrealDB for {platform}");

        let asset = release
            .matching_asset(platform)
            .ok_or_else(|| SetupError::NoMatchingAsset {
                version: version.clone(),
            })?;
        if asset.download_url.is_empty() {
            return Err(SetupError::NoDownloadUrl {
                version: version.clone(),
            });
        }

        let download_dir = self.scratch_dir();
        let archive_path = download_dir.join(&asset.name);
        self.downloader
            .download(&asset.download_url, &archive_path)
            .await?;

        let staged_dir = if platform.os == Os::Windows {
            // The Windows asset is the executable itself; no extraction.
            archive::rename_in_place(&archive_path, ToolConfig::WINDOWS_EXECUTABLE)?;
            download_dir
        } else {
            let extract_dir = self.scratch_dir();
            archive::extract_tar_gz(&archive_path, &extract_dir)?;
            std::fs::remove_file(&archive_path)
                .map_err(|e| SetupError::io_with_path(e, &archive_path))?;
            extract_dir
        };

        let cached = self
            .cache
            .save(&staged_dir, ToolConfig::TOOL_NAME, &version)?;

        debug!("Adding surrealdb directory \"{}\" to the path", cached.display());
        self.outputs.add_path(&cached)?;
        self.publish(&version, &cached, false)?;

        info!("Successfully installed SurrealDB version: {version}");
        Ok(InstallResult {
            version,
            path: cached,
            cache_hit: false,
        })
    }

    /// A fresh unique scratch directory under the runner temp root, so
    /// concurrent or repeated attempts never collide.
    fn scratch_dir(&self) -> PathBuf {
        self.config.temp_dir.join(Uuid::new_v4().to_string())
    }

    fn publish(&self, version: &str, path: &Path, cache_hit: bool) -> Result<()> {
        self.outputs
            .set_output(ActionConfig::VERSION_OUTPUT, version)?;
        self.outputs
            .set_output(ActionConfig::PATH_OUTPUT, &path.display().to_string())?;
        self.outputs.set_output(
            ActionConfig::CACHE_HIT_OUTPUT,
            if cache_hit { "true" } else { "false" },
        )?;
        Ok(())
    }
}
