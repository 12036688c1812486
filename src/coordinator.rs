//! Batch execution of download jobs, sequentially or on a bounded pool.

use std::num::NonZeroUsize;
use std::path::Path;
use std::time::Instant;

use futures::stream::{self, StreamExt};
use tracing::debug;

use crate::downloader::{DownloadJob, DownloadOutcome, Downloader, FailureKind};
use crate::naming::NameAllocator;
use crate::{Names, Resolution};

/// Returns the number of cores available to the process, at least 1.
pub fn default_concurrency() -> usize {
    std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}

/// Summary of one download batch.
#[derive(Debug, Clone, Default)]
pub struct DownloadReport {
    /// Number of jobs run.
    pub attempted: usize,
    /// Number of files written.
    pub downloaded: usize,
    /// Per-job outcomes, in submission order.
    pub outcomes: Vec<DownloadOutcome>,
    /// Wall time of the batch in milliseconds.
    pub duration_ms: u64,
}

impl DownloadReport {
    /// Builds a report from the outcomes of a batch.
    pub fn from_outcomes(outcomes: Vec<DownloadOutcome>) -> Self {
        let downloaded = outcomes.iter().filter(|o| o.is_success()).count();
        Self {
            attempted: outcomes.len(),
            downloaded,
            outcomes,
            duration_ms: 0,
        }
    }

    /// Sets the batch duration.
    pub fn set_duration(&mut self, duration_ms: u64) {
        self.duration_ms = duration_ms;
    }

    /// Number of jobs that did not produce a file.
    pub fn failed(&self) -> usize {
        self.attempted.saturating_sub(self.downloaded)
    }

    /// Iterates over failed jobs as `(url, kind)`.
    pub fn failures(&self) -> impl Iterator<Item = (&str, FailureKind)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.failure().map(|kind| (o.url(), kind)))
    }
}

/// Runs the downloader over a list of URLs.
pub struct DownloadCoordinator {
    downloader: Downloader,
    concurrency: usize,
}

impl DownloadCoordinator {
    /// Creates a coordinator whose pool width is the core count.
    pub fn new(downloader: Downloader) -> Self {
        Self {
            downloader,
            concurrency: default_concurrency(),
        }
    }

    /// Sets the pool width used in parallel mode.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Returns the pool width used in parallel mode.
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Returns the downloader that runs each job.
    pub fn downloader(&self) -> &Downloader {
        &self.downloader
    }

    /// Builds one job per URL with names allocated for the whole batch.
    pub async fn build_jobs(
        urls: &[String],
        folder: &Path,
        names: &Names,
        resolution: Option<Resolution>,
    ) -> Vec<DownloadJob> {
        let allocated = NameAllocator::allocate_all(folder, names, urls.len()).await;
        urls.iter()
            .zip(allocated)
            .map(|(url, name)| {
                DownloadJob::new(url.clone(), folder)
                    .with_name(name)
                    .with_resolution(resolution)
            })
            .collect()
    }

    /// Downloads every URL into `folder` and reports the outcomes.
    pub async fn run(
        &self,
        urls: &[String],
        folder: &Path,
        names: &Names,
        resolution: Option<Resolution>,
        parallel: bool,
    ) -> DownloadReport {
        let start = Instant::now();
        let jobs = Self::build_jobs(urls, folder, names, resolution).await;

        let outcomes = if parallel {
            self.run_parallel(jobs).await
        } else {
            self.run_sequential(jobs).await
        };

        let mut report = DownloadReport::from_outcomes(outcomes);
        report.set_duration(start.elapsed().as_millis() as u64);
        debug!(
            "Downloaded {}/{} images in {}ms",
            report.downloaded, report.attempted, report.duration_ms
        );
        report
    }

    async fn run_sequential(&self, jobs: Vec<DownloadJob>) -> Vec<DownloadOutcome> {
        let mut outcomes = Vec::with_capacity(jobs.len());
        for job in jobs {
            outcomes.push(self.downloader.execute(job).await);
        }
        outcomes
    }

    async fn run_parallel(&self, jobs: Vec<DownloadJob>) -> Vec<DownloadOutcome> {
        debug!(
            "Dispatching {} jobs across {} workers",
            jobs.len(),
            self.concurrency
        );
        stream::iter(jobs)
            .map(|job| self.downloader.execute(job))
            .buffered(self.concurrency)
            .collect::<Vec<_>>()
            .await
    }
}
