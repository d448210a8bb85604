//! Network access to the release index and its assets.
//!
//! This module provides:
//! - A transport seam over HTTP GET requests
//! - The retry-aware release metadata fetcher
//! - Streaming asset downloads with atomic file placement

mod download;
mod fetch;
mod transport;

pub use download::{Downloader, HttpDownloader};
pub use fetch::{fetch_release, resolve_retry_budget};
pub use transport::{HttpTransport, Transport, WireResponse};
