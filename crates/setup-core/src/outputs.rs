//! Output publication to the invoking workflow.
//!
//! The runner hands the action two files: one collecting `name=value`
//! outputs and one collecting PATH additions for later steps. Absent files
//! make publication a no-op so the library stays usable outside a runner.

use crate::error::{Result, SetupError};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Sink for workflow outputs and PATH additions.
#[derive(Debug, Clone, Default)]
pub struct RunnerOutputs {
    output_file: Option<PathBuf>,
    path_file: Option<PathBuf>,
}

impl RunnerOutputs {
    pub fn new(output_file: Option<PathBuf>, path_file: Option<PathBuf>) -> Self {
        Self {
            output_file,
            path_file,
        }
    }

    /// Publish a single `name=value` output.
    pub fn set_output(&self, name: &str, value: &str) -> Result<()> {
        let Some(path) = &self.output_file else {
            debug!("No output file configured, skipping output {name}={value}");
            return Ok(());
        };
        append_line(path, &format!("{name}={value}"))
    }

    /// Expose a directory on the executable search path of later steps.
    pub fn add_path(&self, dir: &Path) -> Result<()> {
        let Some(path) = &self.path_file else {
            debug!("No path file configured, skipping PATH addition {}", dir.display());
            return Ok(());
        };
        append_line(path, &dir.display().to_string())
    }
}

fn append_line(path: &Path, line: &str) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| SetupError::io_with_path(e, path))?;

    writeln!(file, "{line}").map_err(|e| SetupError::io_with_path(e, path))?;
    Ok(())
}
