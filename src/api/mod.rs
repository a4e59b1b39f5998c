// API module entry
// Highscore API routing

mod handlers;
mod response;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Method, Request, Response};
use std::sync::Arc;

use crate::config::AppState;
use crate::logger;

/// API route handler
///
/// Dispatches `/api/*` requests based on request path and method
pub async fn handle_api_request(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Response<Full<Bytes>> {
    let path = req.uri().path().to_string();
    let method = req.method().clone();

    match (method, path.as_str()) {
        (Method::GET, "/api/highscores") => handlers::handle_list(&state).await,
        (Method::POST, "/api/highscores") => handlers::handle_submit(req, &state).await,
        (method, "/api/highscores") => {
            logger::log_api_request(method.as_str(), &path, 405);
            response::method_not_allowed()
        }
        (method, _) => {
            logger::log_api_request(method.as_str(), &path, 404);
            response::not_found()
        }
    }
}
