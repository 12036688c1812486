//! Image search result types.

use serde::{Deserialize, Serialize};

/// Which URL of a result entry to extract.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultKind {
    /// Full-size image URL.
    #[default]
    Image,
    /// Thumbnail URL.
    Thumbnail,
}

/// A single entry of an image results page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageResult {
    /// Full-size image URL.
    #[serde(default)]
    pub image: String,
    /// Thumbnail URL.
    #[serde(default)]
    pub thumbnail: String,
    /// Result title, when provided.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Page the image was found on, when provided.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Pixel width reported by the engine.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    /// Pixel height reported by the engine.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

impl ImageResult {
    /// Creates a result from an image URL and its thumbnail URL.
    pub fn new(image: impl Into<String>, thumbnail: impl Into<String>) -> Self {
        Self {
            image: image.into(),
            thumbnail: thumbnail.into(),
            ..Default::default()
        }
    }

    /// Returns the URL selected by `kind`, or `None` when it is missing.
    pub fn url_for(&self, kind: ResultKind) -> Option<&str> {
        let url = match kind {
            ResultKind::Image => &self.image,
            ResultKind::Thumbnail => &self.thumbnail,
        };
        if url.is_empty() {
            None
        } else {
            Some(url)
        }
    }
}

/// One page of the JSON results endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultPage {
    /// Entries on this page.
    #[serde(default)]
    pub results: Vec<ImageResult>,
    /// Relative continuation path; absent on the last page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
}

impl ResultPage {
    /// Extracts the URLs selected by `kind`, in page order.
    pub fn urls(&self, kind: ResultKind) -> impl Iterator<Item = String> + '_ {
        self.results
            .iter()
            .filter_map(move |result| result.url_for(kind))
            .map(str::to_string)
    }
}
