//! HTTP handlers for the embedded client shell.
//!
//! The compiled browser bundle under `static/` is embedded into the binary. Known files are
//! served with a guessed MIME type; any other path gets `index.html` so client-side routes
//! resolve to the shell.

use axum::{
    http::{
        StatusCode, Uri,
        header::{CACHE_CONTROL, CONTENT_TYPE},
    },
    response::{IntoResponse, Response},
};
use rust_embed::RustEmbed;
use tracing::{debug, instrument};

#[derive(RustEmbed)]
#[folder = "static/"]
pub struct Assets;

const INDEX: &str = "index.html";

/// Bundler output under `assets/` carries content hashes in its file names
fn cache_control(path: &str) -> &'static str {
    if path.starts_with("assets/") {
        "public, max-age=31536000, immutable"
    } else {
        "no-cache"
    }
}

fn index_response() -> Response {
    match Assets::get(INDEX) {
        Some(index) => (
            [(CONTENT_TYPE, "text/html"), (CACHE_CONTROL, "no-cache")],
            index.data.into_owned(),
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Serve embedded static assets with SPA fallback
#[instrument]
pub async fn serve_embedded_asset(uri: Uri) -> Response {
    let path = uri.path().trim_start_matches('/');

    if path.is_empty() || path.ends_with('/') {
        return index_response();
    }

    match Assets::get(path) {
        Some(content) => {
            let mime = mime_guess::from_path(path).first_or_octet_stream();
            (
                [(CONTENT_TYPE, mime.as_ref()), (CACHE_CONTROL, cache_control(path))],
                content.data.into_owned(),
            )
                .into_response()
        }
        None => {
            debug!("Hitting SPA fallback for: {}", uri.path());
            index_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Router;
    use axum_test::TestServer;

    fn create_test_server() -> TestServer {
        TestServer::new(Router::new().fallback(serve_embedded_asset)).unwrap()
    }

    fn header<'a>(response: &'a axum_test::TestResponse, name: &str) -> Option<&'a str> {
        response.headers().get(name).map(|v| v.to_str().unwrap())
    }

    #[tokio::test]
    async fn test_serve_root_returns_index_html() {
        let server = create_test_server();

        let response = server.get("/").await;

        response.assert_status(StatusCode::OK);
        assert_eq!(header(&response, "content-type"), Some("text/html"));
        assert_eq!(header(&response, "cache-control"), Some("no-cache"));
        assert!(response.text().contains("<!doctype html>"));
    }

    #[tokio::test]
    async fn test_serve_favicon() {
        let server = create_test_server();

        let response = server.get("/favicon.svg").await;

        response.assert_status(StatusCode::OK);
        assert_eq!(header(&response, "content-type"), Some("image/svg+xml"));
        assert_eq!(header(&response, "cache-control"), Some("no-cache"));
    }

    #[tokio::test]
    async fn test_hashed_assets_have_immutable_cache() {
        let server = create_test_server();

        let response = server.get("/assets/app.js").await;

        response.assert_status(StatusCode::OK);
        assert_eq!(header(&response, "cache-control"), Some("public, max-age=31536000, immutable"));
        assert!(header(&response, "content-type").unwrap().contains("javascript"));
    }

    #[tokio::test]
    async fn test_spa_fallback_for_unknown_routes() {
        let server = create_test_server();

        for path in ["/customers/123/edit", "/dashboard/"] {
            let response = server.get(path).await;

            response.assert_status(StatusCode::OK);
            assert_eq!(header(&response, "content-type"), Some("text/html"));
            assert!(response.text().contains("<!doctype html>"));
        }
    }

    #[test]
    fn test_cache_control() {
        assert_eq!(cache_control("assets/app.css"), "public, max-age=31536000, immutable");
        assert_eq!(cache_control("index.html"), "no-cache");
        assert_eq!(cache_control("favicon.svg"), "no-cache");
    }
}
