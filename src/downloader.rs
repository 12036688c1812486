//! Single image download: fetch, decode, optionally resize, write as JPEG.

use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::DynamicImage;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::engine::default_user_agent;
use crate::naming::{free_name, is_valid_name, output_path};
use crate::{ImageSearchError, Resolution, Result};

/// Configuration for image downloads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloaderConfig {
    /// Timeout for one image fetch, body included, in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Largest accepted response body in bytes.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: u64,
    /// JPEG quality (1-100) of written files.
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,
    /// User agent for image requests.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_timeout_ms() -> u64 {
    1000
}

fn default_max_bytes() -> u64 {
    20 * 1024 * 1024
}

fn default_jpeg_quality() -> u8 {
    75
}

impl Default for DownloaderConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            max_bytes: default_max_bytes(),
            jpeg_quality: default_jpeg_quality(),
            user_agent: default_user_agent(),
        }
    }
}

/// One image to download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadJob {
    /// Source URL.
    pub url: String,
    /// Folder the file is written to.
    pub folder: PathBuf,
    /// Base name of the file; generated when absent.
    pub name: Option<String>,
    /// Exact output dimensions, if the image should be resized.
    pub resolution: Option<Resolution>,
}

impl DownloadJob {
    /// Creates a job writing `url` into `folder` under a generated name.
    pub fn new(url: impl Into<String>, folder: impl Into<PathBuf>) -> Self {
        Self {
            url: url.into(),
            folder: folder.into(),
            name: None,
            resolution: None,
        }
    }

    /// Pins the base name of the output file. A name that is empty or
    /// contains a path separator is replaced by a generated one.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Resizes the image before writing it.
    pub fn with_resolution(mut self, resolution: Option<Resolution>) -> Self {
        self.resolution = resolution;
        self
    }
}

/// Why a download did not produce a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The fetch exceeded the download timeout.
    Timeout,
    /// Connection or transfer failure.
    Network,
    /// The server answered with a non-success status.
    Status(u16),
    /// The body exceeded the configured size limit.
    TooLarge,
    /// The body is not a decodable image, or could not be resized.
    Decode,
    /// Encoding or writing the output file failed.
    Write,
    /// The codec task panicked or was cancelled.
    Aborted,
}

impl From<reqwest::Error> for FailureKind {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FailureKind::Timeout
        } else {
            FailureKind::Network
        }
    }
}

/// Result of one download job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// The image was written to `path`.
    Saved { url: String, path: PathBuf },
    /// Nothing was written.
    Failed { url: String, kind: FailureKind },
}

impl DownloadOutcome {
    /// Returns whether the job produced a file.
    pub fn is_success(&self) -> bool {
        matches!(self, DownloadOutcome::Saved { .. })
    }

    /// Returns the source URL of the job.
    pub fn url(&self) -> &str {
        match self {
            DownloadOutcome::Saved { url, .. } | DownloadOutcome::Failed { url, .. } => url,
        }
    }

    /// Returns the written file, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            DownloadOutcome::Saved { path, .. } => Some(path),
            DownloadOutcome::Failed { .. } => None,
        }
    }

    /// Returns the failure category, if the job failed.
    pub fn failure(&self) -> Option<FailureKind> {
        match self {
            DownloadOutcome::Saved { .. } => None,
            DownloadOutcome::Failed { kind, .. } => Some(*kind),
        }
    }
}

/// Downloads single images.
///
/// Cloning is cheap; clones share the underlying connection pool.
#[derive(Clone)]
pub struct Downloader {
    config: DownloaderConfig,
    client: Client,
}

impl Downloader {
    /// Creates a downloader with default settings.
    pub fn new() -> Result<Self> {
        Self::with_config(DownloaderConfig::default())
    }

    /// Creates a downloader from custom configuration.
    pub fn with_config(config: DownloaderConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .build()?;
        Ok(Self::with_client(config, client))
    }

    /// Creates a downloader that sends its requests through `client`.
    pub fn with_client(config: DownloaderConfig, client: Client) -> Self {
        Self { config, client }
    }

    /// Returns the downloader configuration.
    pub fn config(&self) -> &DownloaderConfig {
        &self.config
    }

    /// Runs one job. Failures never propagate; they become
    /// [`DownloadOutcome::Failed`].
    pub async fn execute(&self, job: DownloadJob) -> DownloadOutcome {
        let name = match &job.name {
            Some(name) if is_valid_name(name) => name.clone(),
            _ => free_name(&job.folder).await,
        };
        let path = output_path(&job.folder, &name);

        match self.try_execute(&job, &path).await {
            Ok(()) => {
                debug!("Saved {} to {}", job.url, path.display());
                DownloadOutcome::Saved { url: job.url, path }
            }
            Err(kind) => {
                debug!("Download of {} failed: {:?}", job.url, kind);
                DownloadOutcome::Failed { url: job.url, kind }
            }
        }
    }

    async fn try_execute(&self, job: &DownloadJob, path: &Path) -> std::result::Result<(), FailureKind> {
        let bytes = self.fetch(&job.url).await?;

        let resolution = job.resolution;
        let quality = self.config.jpeg_quality;
        let path = path.to_path_buf();
        tokio::task::spawn_blocking(move || save_image(&bytes, resolution, quality, &path))
            .await
            .map_err(|_| FailureKind::Aborted)?
    }

    async fn fetch(&self, url: &str) -> std::result::Result<Vec<u8>, FailureKind> {
        let mut response = self
            .client
            .get(url)
            .timeout(Duration::from_millis(self.config.timeout_ms))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FailureKind::Status(status.as_u16()));
        }

        let limit = self.config.max_bytes;
        if response.content_length().is_some_and(|len| len > limit) {
            return Err(FailureKind::TooLarge);
        }

        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            if (body.len() + chunk.len()) as u64 > limit {
                return Err(FailureKind::TooLarge);
            }
            body.extend_from_slice(&chunk);
        }
        Ok(body)
    }
}

/// Decodes `bytes`, resizes when asked, and writes the result to `path`.
fn save_image(
    bytes: &[u8],
    resolution: Option<Resolution>,
    quality: u8,
    path: &Path,
) -> std::result::Result<(), FailureKind> {
    let image = image::load_from_memory(bytes).map_err(|_| FailureKind::Decode)?;
    let image = match resolution {
        Some(r) if r.width == 0 || r.height == 0 => return Err(FailureKind::Decode),
        Some(r) => image.resize_exact(r.width, r.height, FilterType::CatmullRom),
        None => image,
    };
    write_jpeg(&image, quality, path).map_err(|e| {
        debug!("Writing {} failed: {}", path.display(), e);
        FailureKind::Write
    })
}

/// Encodes into a temporary file next to `path` and renames it into place,
/// so a failed encode never leaves a truncated file behind.
fn write_jpeg(image: &DynamicImage, quality: u8, path: &Path) -> Result<()> {
    let folder = path.parent().unwrap_or_else(|| Path::new("."));
    let mut file = NamedTempFile::new_in(folder)?;
    {
        let mut writer = BufWriter::new(file.as_file_mut());
        let encoder = JpegEncoder::new_with_quality(&mut writer, quality);
        DynamicImage::ImageRgb8(image.to_rgb8()).write_with_encoder(encoder)?;
        writer.flush()?;
    }
    file.persist(path)
        .map_err(|e| ImageSearchError::Io(e.error))?;
    Ok(())
}
