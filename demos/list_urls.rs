//! Example: List image and thumbnail URLs without downloading anything.

use a3s_images::engines::DuckDuckGoImages;
use a3s_images::ResultKind;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let engine = DuckDuckGoImages::new()?;
    let query = "northern lights";

    let token = engine.fetch_token(query).await;
    if token.is_empty() {
        println!("No session token for '{}'", query);
        return Ok(());
    }

    let images = engine.fetch_results(query, &token, ResultKind::Image).await;
    let thumbnails = engine.fetch_results(query, &token, ResultKind::Thumbnail).await;

    println!("Found {} images and {} thumbnails", images.len(), thumbnails.len());
    println!();

    for (i, (image, thumbnail)) in images.iter().zip(&thumbnails).take(10).enumerate() {
        println!("{}. {}", i + 1, image);
        println!("   Thumbnail: {}", thumbnail);
    }

    Ok(())
}
