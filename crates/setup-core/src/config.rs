//! Centralized configuration for the setup library.
//!
//! Fixed parameters live on unit structs with associated consts. Everything
//! that varies per invocation (requested version, retry budget input, runner
//! directories, output destinations) travels in [`SetupConfig`], which is
//! passed explicitly into the installer so tests never depend on ambient
//! environment state.

use std::path::PathBuf;
use std::time::Duration;

/// Identity of the tool being installed.
pub struct ToolConfig;

impl ToolConfig {
    pub const TOOL_NAME: &'static str = "surrealdb";
    pub const GITHUB_REPO: &'static str = "surrealdb/surrealdb";
    /// Canonical executable filename for a Windows release asset.
    pub const WINDOWS_EXECUTABLE: &'static str = "surreal.exe";
}

/// Network-related configuration.
pub struct NetworkConfig;

impl NetworkConfig {
    pub const GITHUB_API_BASE: &'static str = "https://api.github.com";
    pub const USER_AGENT: &'static str = "github-surrealdb-release";
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
    /// Retries permitted when the release index keeps rate-limiting us.
    pub const DEFAULT_RETRY_BUDGET: u32 = 3;
    /// Extra seconds added on top of every upstream-suggested wait.
    pub const RATE_LIMIT_PADDING_SECS: u64 = 5;
}

/// Input and output keys exchanged with the invoking workflow.
pub struct ActionConfig;

impl ActionConfig {
    pub const VERSION_INPUT: &'static str = "version";
    pub const RETRY_COUNT_INPUT: &'static str = "retry-count";

    pub const VERSION_OUTPUT: &'static str = "surrealdb-version";
    pub const PATH_OUTPUT: &'static str = "surrealdb-path";
    pub const CACHE_HIT_OUTPUT: &'static str = "cache-hit";
    pub const RETRY_COUNT_OUTPUT: &'static str = "retry-count";
}

/// Per-invocation configuration, captured at the edge of the system.
#[derive(Debug, Clone)]
pub struct SetupConfig {
    /// Requested version: `"latest"` or a `v`-prefixed tag.
    pub version: String,
    /// Raw `retry-count` input; resolved to a numeric budget by the fetcher.
    pub retry_count: Option<String>,
    /// Root for scratch downloads (the runner's temp directory).
    pub temp_dir: PathBuf,
    /// Root of the tool cache.
    pub cache_dir: PathBuf,
    /// File collecting `name=value` outputs, when the runner provides one.
    pub output_file: Option<PathBuf>,
    /// File collecting PATH additions, when the runner provides one.
    pub path_file: Option<PathBuf>,
}

impl SetupConfig {
    /// Build a config programmatically (used by tests and embedders).
    pub fn new(
        version: impl Into<String>,
        temp_dir: impl Into<PathBuf>,
        cache_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            version: version.into(),
            retry_count: None,
            temp_dir: temp_dir.into(),
            cache_dir: cache_dir.into(),
            output_file: None,
            path_file: None,
        }
    }

    /// Set the raw `retry-count` input.
    pub fn with_retry_count(mut self, raw: impl Into<String>) -> Self {
        self.retry_count = Some(raw.into());
        self
    }

    /// Set the workflow output file.
    pub fn with_output_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_file = Some(path.into());
        self
    }

    /// Set the workflow PATH file.
    pub fn with_path_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.path_file = Some(path.into());
        self
    }

    /// Capture the configuration a GitHub Actions runner provides through the
    /// environment: `INPUT_*` action inputs, `RUNNER_TEMP`/`RUNNER_TOOL_CACHE`
    /// directories, and the `GITHUB_OUTPUT`/`GITHUB_PATH` command files.
    ///
    /// An absent or empty `version` input defaults to `"latest"`.
    pub fn from_env() -> Self {
        let version = input_var(ActionConfig::VERSION_INPUT).unwrap_or_else(|| "latest".to_string());
        let retry_count = input_var(ActionConfig::RETRY_COUNT_INPUT);
        let temp_dir = env_path("RUNNER_TEMP").unwrap_or_else(std::env::temp_dir);
        let cache_dir = env_path("RUNNER_TOOL_CACHE").unwrap_or_else(|| temp_dir.join("tool-cache"));

        Self {
            version,
            retry_count,
            temp_dir,
            cache_dir,
            output_file: env_path("GITHUB_OUTPUT"),
            path_file: env_path("GITHUB_PATH"),
        }
    }
}

/// Read an action input the way the runner encodes it: `INPUT_` plus the
/// uppercased input name, spaces replaced with underscores.
fn input_var(name: &str) -> Option<String> {
    let key = format!("INPUT_{}", name.replace(' ', "_").to_uppercase());
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

fn env_path(name: &str) -> Option<PathBuf> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}
