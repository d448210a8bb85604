//! Headless library for installing SurrealDB release artifacts.
//!
//! Given a requested version (`"latest"` or a `v`-prefixed tag), this crate
//! resolves it against the GitHub release index, downloads the asset built
//! for the current platform, installs it into a local tool cache keyed by
//! `(tool, version)`, and publishes the install location to the invoking
//! workflow. Upstream rate limiting is tolerated with a bounded retry loop
//! honoring both the `retry-after` and `x-ratelimit-*` signaling conventions.
//!
//! # Example
//!
//! ```rust,ignore
//! use surrealdb_setup::{HttpDownloader, HttpTransport, Installer, SetupConfig};
//!
//! #[tokio::main]
//! async fn main() -> surrealdb_setup::Result<()> {
//!     let config = SetupConfig::from_env();
//!     let installer = Installer::new(config, HttpTransport::new()?, HttpDownloader::new()?);
//!     let result = installer.install().await?;
//!     println!("SurrealDB {} at {}", result.version, result.path.display());
//!     Ok(())
//! }
//! ```

pub mod archive;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod network;
pub mod outputs;
pub mod platform;
pub mod setup;
pub mod version;

// Re-export commonly used types
pub use cache::ToolCache;
pub use config::{ActionConfig, NetworkConfig, SetupConfig, ToolConfig};
pub use error::{Result, SetupError};
pub use models::{Asset, InstallResult, Release};
pub use network::{
    fetch_release, resolve_retry_budget, Downloader, HttpDownloader, HttpTransport, Transport,
    WireResponse,
};
pub use outputs::RunnerOutputs;
pub use platform::{Arch, Os, Platform};
pub use setup::Installer;
pub use version::format_version_url;
