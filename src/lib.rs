//! # a3s-images
//!
//! Image search and bulk download, backed by DuckDuckGo's image endpoint.
//!
//! This library turns a query into local JPEG files:
//!
//! - Session-token acquisition and paginated JSON result retrieval
//! - Optional shuffling and truncation of the result list
//! - Sequential or pooled concurrent downloads with per-job failure isolation
//! - Collision-free file naming and optional exact resizing
//!
//! ## Example
//!
//! ```rust,no_run
//! use a3s_images::{DownloadRequest, ImageSearch};
//!
//! #[tokio::main]
//! async fn main() -> a3s_images::Result<()> {
//!     let search = ImageSearch::duckduckgo()?;
//!
//!     let request = DownloadRequest::new("cats", "./cats")
//!         .with_max_results(10)
//!         .with_parallel(true)
//!         .with_target_resolution((256, 256));
//!     let count = search.download(&request).await?;
//!
//!     println!("Downloaded {} images", count);
//!     Ok(())
//! }
//! ```

mod coordinator;
mod downloader;
mod engine;
mod error;
mod query;
mod result;
mod search;

pub mod engines;
pub mod naming;
pub mod selector;

pub use coordinator::{default_concurrency, DownloadCoordinator, DownloadReport};
pub use downloader::{DownloadJob, DownloadOutcome, Downloader, DownloaderConfig, FailureKind};
pub use engine::{EngineConfig, ImageEngine};
pub use error::{ImageSearchError, Result};
pub use query::{DownloadRequest, Names, Resolution};
pub use result::{ImageResult, ResultKind, ResultPage};
pub use search::ImageSearch;
