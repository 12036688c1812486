//! Image search engine implementations.

mod duckduckgo;

pub use duckduckgo::{DuckDuckGoImages, SessionToken};
