//! Local tool cache keyed by `(tool, version)`.
//!
//! Mirrors the runner tool-cache layout: an entry is a directory at
//! `<root>/<tool>/<version>/` with an adjacent `<version>.complete` marker
//! written only after the contents are fully in place. A directory without
//! its marker is treated as absent.

use crate::error::{Result, SetupError};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Filesystem tool cache.
#[derive(Debug, Clone)]
pub struct ToolCache {
    root: PathBuf,
}

impl ToolCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Look up a previously saved installation.
    pub fn find(&self, tool: &str, version: &str) -> Option<PathBuf> {
        let dir = self.entry_dir(tool, version);
        if dir.is_dir() && self.marker_path(tool, version).is_file() {
            debug!("Tool cache hit for {tool} {version}");
            Some(dir)
        } else {
            None
        }
    }

    /// Move `source_dir` into the cache and mark the entry complete.
    ///
    /// Any unmarked directory left at the entry path by an earlier failed run
    /// is replaced; completed entries are never touched (callers probe with
    /// [`ToolCache::find`] first).
    pub fn save(&self, source_dir: &Path, tool: &str, version: &str) -> Result<PathBuf> {
        let dir = self.entry_dir(tool, version);
        if let Some(parent) = dir.parent() {
            std::fs::create_dir_all(parent).map_err(|e| SetupError::io_with_path(e, parent))?;
        }

        if dir.exists() {
            std::fs::remove_dir_all(&dir).map_err(|e| SetupError::io_with_path(e, &dir))?;
        }

        move_dir(source_dir, &dir)?;

        let marker = self.marker_path(tool, version);
        std::fs::write(&marker, b"").map_err(|e| SetupError::io_with_path(e, &marker))?;

        info!("Cached {tool} {version} at {}", dir.display());
        Ok(dir)
    }

    fn entry_dir(&self, tool: &str, version: &str) -> PathBuf {
        self.root.join(tool).join(version)
    }

    fn marker_path(&self, tool: &str, version: &str) -> PathBuf {
        self.root.join(tool).join(format!("{version}.complete"))
    }
}

/// Rename with a recursive-copy fallback for cross-device moves.
fn move_dir(source: &Path, dest: &Path) -> Result<()> {
    match std::fs::rename(source, dest) {
        Ok(()) => Ok(()),
        Err(rename_err) => {
            debug!("Rename failed, falling back to copy: {rename_err}");
            copy_dir_recursive(source, dest)?;
            if let Err(e) = std::fs::remove_dir_all(source) {
                warn!("Failed to remove source after copy: {e}");
            }
            Ok(())
        }
    }
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> Result<()> {
    std::fs::create_dir_all(dst).map_err(|e| SetupError::io_with_path(e, dst))?;

    for entry in std::fs::read_dir(src).map_err(|e| SetupError::io_with_path(e, src))? {
        let entry = entry.map_err(|e| SetupError::io_with_path(e, src))?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)
                .map_err(|e| SetupError::io_with_path(e, &src_path))?;
        }
    }

    Ok(())
}
