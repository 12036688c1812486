//! Download request representation.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::ResultKind;

/// Exact output dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl From<(u32, u32)> for Resolution {
    fn from((width, height): (u32, u32)) -> Self {
        Self::new(width, height)
    }
}

/// How output files are named.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Names {
    /// Every file gets a generated identifier.
    #[default]
    Generated,
    /// Every file is written under the same name.
    Single(String),
    /// Names matched to URLs by position; URLs past the end of the list get
    /// generated identifiers.
    PerJob(Vec<String>),
}

impl Names {
    /// Returns the caller-supplied name for the URL at `index`, if any.
    pub fn for_index(&self, index: usize) -> Option<&str> {
        match self {
            Names::Generated => None,
            Names::Single(name) => Some(name.as_str()),
            Names::PerJob(names) => names.get(index).map(String::as_str),
        }
    }
}

/// A download request with all parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadRequest {
    /// The search terms.
    pub query: String,
    /// Target folder for the downloaded files.
    pub folder: PathBuf,
    /// Upper bound on the number of URLs downloaded.
    pub max_results: Option<usize>,
    /// Download thumbnails instead of full-size images.
    pub thumbnails: bool,
    /// Download on a worker pool instead of one at a time.
    pub parallel: bool,
    /// Shuffle the URLs before truncating to `max_results`.
    pub shuffle: bool,
    /// Delete and recreate the folder before downloading.
    pub reset_folder: bool,
    /// Naming policy for output files.
    pub names: Names,
    /// Resize every image to exactly these dimensions.
    pub target_resolution: Option<Resolution>,
    /// Worker pool width; defaults to the number of available cores.
    pub concurrency: Option<usize>,
}

impl DownloadRequest {
    /// Creates a new request for `query`, downloading into `folder`.
    pub fn new(query: impl Into<String>, folder: impl Into<PathBuf>) -> Self {
        Self {
            query: query.into(),
            folder: folder.into(),
            max_results: None,
            thumbnails: false,
            parallel: false,
            shuffle: false,
            reset_folder: false,
            names: Names::Generated,
            target_resolution: None,
            concurrency: None,
        }
    }

    /// Limits the number of downloaded URLs.
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = Some(max_results);
        self
    }

    /// Selects thumbnail URLs instead of full-size image URLs.
    pub fn with_thumbnails(mut self, thumbnails: bool) -> Self {
        self.thumbnails = thumbnails;
        self
    }

    /// Enables the worker pool.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Shuffles URLs before truncation.
    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    /// Clears the target folder before downloading.
    pub fn with_reset_folder(mut self, reset_folder: bool) -> Self {
        self.reset_folder = reset_folder;
        self
    }

    /// Sets the naming policy.
    pub fn with_names(mut self, names: Names) -> Self {
        self.names = names;
        self
    }

    /// Resizes every downloaded image.
    pub fn with_target_resolution(mut self, resolution: impl Into<Resolution>) -> Self {
        self.target_resolution = Some(resolution.into());
        self
    }

    /// Sets the worker pool width.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = Some(concurrency);
        self
    }

    /// Returns which URL field the request downloads.
    pub fn result_kind(&self) -> ResultKind {
        if self.thumbnails {
            ResultKind::Thumbnail
        } else {
            ResultKind::Image
        }
    }
}
