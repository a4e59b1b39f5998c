//! Static file serving module
//!
//! Serves the game page and its sibling assets from the content root, with
//! MIME detection, conditional responses, and a not-found fallback.

use crate::config::ContentConfig;
use crate::handler::router::RequestContext;
use crate::http::{self, cache, mime};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::path::Path;
use tokio::fs;

/// Serve a request path from the content root
///
/// The root path maps to the configured index file; when that file does not
/// exist yet, an embedded placeholder page is returned instead. Any other
/// path is resolved against the content root, 404 when absent.
pub async fn serve(ctx: &RequestContext<'_>, content: &ContentConfig) -> Response<Full<Bytes>> {
    if ctx.path == "/" {
        return serve_index(ctx, content).await;
    }

    match load_from_root(&content.root, ctx.path).await {
        Some((data, content_type)) => build_file_response(&data, content_type, ctx),
        None => http::build_404_response(),
    }
}

/// Serve the index file, falling back to the embedded page
async fn serve_index(ctx: &RequestContext<'_>, content: &ContentConfig) -> Response<Full<Bytes>> {
    let index_path = Path::new(&content.root).join(&content.index);
    match fs::read(&index_path).await {
        Ok(data) => build_file_response(&data, mime::get_content_type(Some("html")), ctx),
        Err(_) => http::response::build_html_response(default_page(), ctx.is_head),
    }
}

/// Load a file from the content root, rejecting traversal outside it
pub async fn load_from_root(root: &str, path: &str) -> Option<(Vec<u8>, &'static str)> {
    // Remove leading slash and prevent directory traversal
    let clean_path = path.trim_start_matches('/').replace("..", "");
    let file_path = Path::new(root).join(&clean_path);

    let root_canonical = match Path::new(root).canonicalize() {
        Ok(p) => p,
        Err(e) => {
            logger::log_warning(&format!(
                "Content root not found or inaccessible '{root}': {e}"
            ));
            return None;
        }
    };

    // File not found is common (404), no need to log at warning level
    let Ok(file_canonical) = file_path.canonicalize() else {
        return None;
    };
    if !file_canonical.starts_with(&root_canonical) {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {path} -> {}",
            file_canonical.display()
        ));
        return None;
    }

    if file_canonical.is_dir() {
        return None;
    }

    let data = match fs::read(&file_canonical).await {
        Ok(c) => c,
        Err(e) => {
            logger::log_error(&format!(
                "Failed to read file '{}': {e}",
                file_canonical.display()
            ));
            return None;
        }
    };

    let content_type = mime::get_content_type(file_canonical.extension().and_then(|e| e.to_str()));
    Some((data, content_type))
}

/// Build a static file response with `ETag` support
fn build_file_response(
    data: &[u8],
    content_type: &str,
    ctx: &RequestContext<'_>,
) -> Response<Full<Bytes>> {
    let etag = cache::generate_etag(data);

    if cache::check_etag_match(ctx.if_none_match.as_deref(), &etag) {
        return http::build_304_response(&etag);
    }

    http::response::build_cached_response(
        Bytes::from(data.to_owned()),
        content_type,
        &etag,
        ctx.is_head,
    )
}

/// Embedded placeholder page served when no index file is deployed yet
fn default_page() -> String {
    String::from(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>Arcade Server</title>
    <style>
        body {
            font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, Arial, sans-serif;
            background: #1a1a2e;
            color: #eee;
            display: flex;
            align-items: center;
            justify-content: center;
            min-height: 100vh;
            margin: 0;
        }
        .container {
            text-align: center;
            padding: 40px;
            border: 1px solid #333;
            border-radius: 12px;
        }
        h1 { margin-bottom: 8px; }
        p { opacity: 0.8; }
        code {
            background: #16213e;
            padding: 2px 6px;
            border-radius: 4px;
        }
    </style>
</head>
<body>
    <div class="container">
        <h1>Arcade Server</h1>
        <p>The server is running, but no game page is deployed yet.</p>
        <p>Drop an <code>index.html</code> into the content root to serve your game.</p>
        <p>Highscores API: <code>GET /api/highscores</code> &middot; <code>POST /api/highscores</code></p>
    </div>
</body>
</html>"#,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    static COUNTER: AtomicU32 = AtomicU32::new(0);

    fn test_root() -> std::path::PathBuf {
        let id = COUNTER.fetch_add(1, Ordering::SeqCst);
        let root = std::env::temp_dir().join(format!(
            "arcade-content-test-{}-{id}",
            std::process::id()
        ));
        std::fs::create_dir_all(&root).expect("test root");
        root
    }

    #[tokio::test]
    async fn test_load_existing_file() {
        let root = test_root();
        std::fs::write(root.join("game.js"), b"console.log('hi');").expect("test file");

        let loaded = load_from_root(root.to_str().expect("utf-8 path"), "/game.js").await;
        let (data, content_type) = loaded.expect("file should load");
        assert_eq!(data, b"console.log('hi');");
        assert_eq!(content_type, "application/javascript");

        let _ = std::fs::remove_dir_all(&root);
    }

    #[tokio::test]
    async fn test_missing_file_is_none() {
        let root = test_root();
        assert!(load_from_root(root.to_str().expect("utf-8 path"), "/nope.html")
            .await
            .is_none());
        let _ = std::fs::remove_dir_all(&root);
    }

    #[tokio::test]
    async fn test_traversal_is_blocked() {
        let root = test_root();
        let result = load_from_root(root.to_str().expect("utf-8 path"), "/../etc/passwd").await;
        assert!(result.is_none());
        let _ = std::fs::remove_dir_all(&root);
    }

    #[tokio::test]
    async fn test_directory_is_none() {
        let root = test_root();
        std::fs::create_dir_all(root.join("assets")).expect("test dir");
        assert!(load_from_root(root.to_str().expect("utf-8 path"), "/assets")
            .await
            .is_none());
        let _ = std::fs::remove_dir_all(&root);
    }
}
