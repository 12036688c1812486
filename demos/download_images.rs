//! Example: Download a handful of resized images in parallel.

use a3s_images::{DownloadRequest, ImageSearch};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing for debug output
    tracing_subscriber::fmt::init();

    let search = ImageSearch::duckduckgo()?;

    let request = DownloadRequest::new("rust crab", "./downloads/crabs")
        .with_max_results(10)
        .with_shuffle(true)
        .with_parallel(true)
        .with_reset_folder(true)
        .with_target_resolution((256, 256));

    println!("Downloading '{}' into {}", request.query, request.folder.display());
    println!();

    let report = search.download_with_report(&request).await?;

    println!(
        "Downloaded {}/{} images in {}ms",
        report.downloaded, report.attempted, report.duration_ms
    );
    for outcome in &report.outcomes {
        match outcome.path() {
            Some(path) => println!("  saved  {}", path.display()),
            None => println!("  failed {} ({:?})", outcome.url(), outcome.failure()),
        }
    }

    Ok(())
}
