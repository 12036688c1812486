//! Search-and-download orchestration.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::coordinator::{DownloadCoordinator, DownloadReport};
use crate::engines::DuckDuckGoImages;
use crate::{selector, Downloader, DownloadRequest, ImageEngine, ImageSearchError, Result, ResultKind};

/// Searches an image engine and downloads the selected results.
pub struct ImageSearch {
    engine: Arc<dyn ImageEngine>,
    downloader: Downloader,
}

impl ImageSearch {
    /// Creates an instance backed by `engine`, downloading with `downloader`.
    pub fn new<E: ImageEngine + 'static>(engine: E, downloader: Downloader) -> Self {
        Self {
            engine: Arc::new(engine),
            downloader,
        }
    }

    /// Creates an instance backed by DuckDuckGo with default settings.
    pub fn duckduckgo() -> Result<Self> {
        Ok(Self::new(DuckDuckGoImages::new()?, Downloader::new()?))
    }

    /// Returns the configured engine.
    pub fn engine(&self) -> &Arc<dyn ImageEngine> {
        &self.engine
    }

    /// Collects every full-size image URL for `query`.
    pub async fn image_urls(&self, query: &str) -> Vec<String> {
        self.engine.search(query, ResultKind::Image).await
    }

    /// Collects every thumbnail URL for `query`.
    pub async fn thumbnail_urls(&self, query: &str) -> Vec<String> {
        self.engine.search(query, ResultKind::Thumbnail).await
    }

    /// Searches, selects and downloads; returns the number of files written.
    pub async fn download(&self, request: &DownloadRequest) -> Result<usize> {
        Ok(self.download_with_report(request).await?.downloaded)
    }

    /// Like [`download`](Self::download), returning per-job outcomes.
    ///
    /// Search and download failures only shrink the count. The only error
    /// returned is a failure to create the target folder.
    pub async fn download_with_report(&self, request: &DownloadRequest) -> Result<DownloadReport> {
        if request.query.trim().is_empty() {
            return Err(ImageSearchError::InvalidQuery("Query cannot be empty".into()));
        }

        let urls = if self.engine.is_enabled() {
            self.engine.search(&request.query, request.result_kind()).await
        } else {
            warn!("Engine {} is disabled", self.engine.name());
            Vec::new()
        };
        debug!(
            "Engine {} returned {} urls for '{}'",
            self.engine.name(),
            urls.len(),
            request.query
        );

        let urls = selector::select(urls, request.shuffle, request.max_results);

        if request.reset_folder {
            remove_folder(&request.folder).await;
        }
        tokio::fs::create_dir_all(&request.folder).await?;

        let mut coordinator = DownloadCoordinator::new(self.downloader.clone());
        if let Some(concurrency) = request.concurrency {
            coordinator = coordinator.with_concurrency(concurrency);
        }

        Ok(coordinator
            .run(
                &urls,
                &request.folder,
                &request.names,
                request.target_resolution,
                request.parallel,
            )
            .await)
    }
}

/// Removes `folder` recursively; a missing folder or any error is ignored.
async fn remove_folder(folder: &Path) {
    if let Err(e) = tokio::fs::remove_dir_all(folder).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            debug!("Ignoring failure to remove {}: {}", folder.display(), e);
        }
    }
}
