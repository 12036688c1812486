//! Local stand-in for the DuckDuckGo token, results and image endpoints.

#![allow(dead_code)]

use std::collections::HashMap;
use std::io::Cursor;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use image::{DynamicImage, ImageFormat, RgbImage};
use serde_json::json;
use tokio::net::TcpListener;

pub const TOKEN: &str = "4-31415926535897932384";

/// Behavior of the mock server.
#[derive(Clone)]
pub struct MockOptions {
    pub token_status: u16,
    pub token_body: String,
    pub token_delay_ms: u64,
    pub pages: usize,
    pub per_page: usize,
    /// Page index answered with 500.
    pub fail_page: Option<usize>,
    /// Page index answered with invalid JSON.
    pub malformed_page: Option<usize>,
    /// Image names (`full-P-I` / `thumb-P-I`) served as HTML instead.
    pub broken_images: Vec<String>,
}

impl Default for MockOptions {
    fn default() -> Self {
        Self {
            token_status: 200,
            token_body: format!(
                "<html><head><script>var x=1;vqd='{}';DDG.ready();</script></head></html>",
                TOKEN
            ),
            token_delay_ms: 0,
            pages: 1,
            per_page: 4,
            fail_page: None,
            malformed_page: None,
            broken_images: Vec::new(),
        }
    }
}

#[derive(Default)]
pub struct Hits {
    pub token: AtomicUsize,
    pub search: AtomicUsize,
    pub image: AtomicUsize,
    pub image_paths: Mutex<Vec<String>>,
}

struct AppState {
    options: MockOptions,
    base: String,
    hits: Arc<Hits>,
}

pub struct MockServer {
    pub addr: SocketAddr,
    pub hits: Arc<Hits>,
    _handle: tokio::task::JoinHandle<()>,
}

impl MockServer {
    pub fn base_url(&self) -> String {
        format!("http://{}/", self.addr)
    }

    pub fn image_url(&self, name: &str) -> String {
        format!("http://{}/img/{}", self.addr, name)
    }

    pub fn token_hits(&self) -> usize {
        self.hits.token.load(Ordering::SeqCst)
    }

    pub fn search_hits(&self) -> usize {
        self.hits.search.load(Ordering::SeqCst)
    }

    pub fn image_hits(&self) -> usize {
        self.hits.image.load(Ordering::SeqCst)
    }

    pub fn image_paths(&self) -> Vec<String> {
        self.hits.image_paths.lock().unwrap().clone()
    }
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let image = RgbImage::from_fn(width, height, |x, y| image::Rgb([x as u8, y as u8, 90]));
    let mut bytes = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(image)
        .write_to(&mut bytes, ImageFormat::Png)
        .unwrap();
    bytes.into_inner()
}

pub async fn start(options: MockOptions) -> MockServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let hits = Arc::new(Hits::default());

    let state = Arc::new(AppState {
        options,
        base: format!("http://{}", addr),
        hits: Arc::clone(&hits),
    });

    let app = Router::new()
        .route("/", post(token))
        .route("/i.js", get(results))
        .route("/img/:name", get(serve_image))
        .with_state(state);

    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockServer {
        addr,
        hits,
        _handle: handle,
    }
}

async fn token(State(state): State<Arc<AppState>>) -> Response {
    state.hits.token.fetch_add(1, Ordering::SeqCst);
    if state.options.token_delay_ms > 0 {
        tokio::time::sleep(Duration::from_millis(state.options.token_delay_ms)).await;
    }
    let status = StatusCode::from_u16(state.options.token_status).unwrap();
    (status, state.options.token_body.clone()).into_response()
}

async fn results(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    state.hits.search.fetch_add(1, Ordering::SeqCst);

    if params.get("vqd").map(String::as_str) != Some(TOKEN)
        || params.get("o").map(String::as_str) != Some("json")
    {
        return StatusCode::FORBIDDEN.into_response();
    }

    let page: usize = params
        .get("s")
        .and_then(|s| s.parse().ok())
        .unwrap_or(0);

    if state.options.fail_page == Some(page) {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    if state.options.malformed_page == Some(page) {
        return (StatusCode::OK, "{\"results\": [").into_response();
    }

    let results: Vec<_> = (0..state.options.per_page)
        .map(|i| {
            json!({
                "image": format!("{}/img/full-{}-{}", state.base, page, i),
                "thumbnail": format!("{}/img/thumb-{}-{}", state.base, page, i),
                "title": format!("Result {}-{}", page, i),
                "width": 64,
                "height": 48,
            })
        })
        .collect();

    let body = if page + 1 < state.options.pages {
        json!({ "results": results, "next": format!("i.js?q=x&s={}", page + 1) })
    } else {
        json!({ "results": results })
    };
    Json(body).into_response()
}

async fn serve_image(State(state): State<Arc<AppState>>, Path(name): Path<String>) -> Response {
    state.hits.image.fetch_add(1, Ordering::SeqCst);
    state.hits.image_paths.lock().unwrap().push(name.clone());

    if state.options.broken_images.contains(&name) || name.starts_with("html") {
        return (StatusCode::OK, "<html>not an image</html>").into_response();
    }
    if name.starts_with("missing") {
        return StatusCode::NOT_FOUND.into_response();
    }
    if name.starts_with("slow") {
        tokio::time::sleep(Duration::from_secs(3)).await;
    }
    if name.starts_with("big") {
        return (StatusCode::OK, png_bytes(512, 512)).into_response();
    }

    (
        StatusCode::OK,
        [("content-type", "image/png")],
        png_bytes(64, 48),
    )
        .into_response()
}
