//! Error types for the image search library.

use thiserror::Error;

/// Result type alias for image search operations.
pub type Result<T> = std::result::Result<T, ImageSearchError>;

/// Errors that can occur while searching for or downloading images.
#[derive(Error, Debug)]
pub enum ImageSearchError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(reqwest::Error),

    /// Request timeout exceeded.
    #[error("Request timeout exceeded")]
    Timeout,

    /// Server answered with a non-success status.
    #[error("Unexpected HTTP status: {0}")]
    Status(u16),

    /// The landing page did not embed a session token.
    #[error("Session token not found in response")]
    TokenNotFound,

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// Invalid query.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// URL parsing error.
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Filesystem error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Image decoding or encoding error.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

impl From<reqwest::Error> for ImageSearchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Http(err)
        }
    }
}

impl From<serde_json::Error> for ImageSearchError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}
