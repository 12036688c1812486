//! Shuffle and truncation policy applied to result URLs.

use rand::seq::SliceRandom;
use rand::Rng;

/// Applies the selection policy using the thread-local RNG.
///
/// With `shuffle` the URLs are uniformly permuted first; with `max_results`
/// only that many leading URLs are kept.
pub fn select(urls: Vec<String>, shuffle: bool, max_results: Option<usize>) -> Vec<String> {
    select_with_rng(urls, shuffle, max_results, &mut rand::thread_rng())
}

/// Applies the selection policy with a caller-provided RNG.
pub fn select_with_rng<R: Rng + ?Sized>(
    mut urls: Vec<String>,
    shuffle: bool,
    max_results: Option<usize>,
    rng: &mut R,
) -> Vec<String> {
    if shuffle {
        urls.shuffle(rng);
    }
    if let Some(max) = max_results {
        urls.truncate(max);
    }
    urls
}
