// Highscore API handlers module

use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper::{Request, Response, StatusCode};
use std::sync::Arc;

use super::response::{bad_request, internal_error, json_response};
use crate::config::AppState;
use crate::highscore::SubmitPayload;
use crate::logger;

/// List all highscores, ranked descending by score
pub async fn handle_list(state: &Arc<AppState>) -> Response<Full<Bytes>> {
    let records = state.store.list_ranked().await;
    logger::log_api_request("GET", "/api/highscores", 200);
    json_response(StatusCode::OK, &records)
}

/// Submit one score record
///
/// An empty body coerces to the all-defaults record. A body that is present
/// but not valid JSON, including a non-numeric score, is rejected with 400.
pub async fn handle_submit(
    req: Request<hyper::body::Incoming>,
    state: &Arc<AppState>,
) -> Response<Full<Bytes>> {
    let whole_body = match req.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(_) => {
            logger::log_api_request("POST", "/api/highscores", 400);
            return bad_request("Failed to read request body");
        }
    };

    let payload: SubmitPayload = if whole_body.is_empty() {
        SubmitPayload::default()
    } else {
        match serde_json::from_slice(&whole_body) {
            Ok(p) => p,
            Err(e) => {
                logger::log_api_request("POST", "/api/highscores", 400);
                return bad_request(&format!("Invalid JSON: {e}"));
            }
        }
    };

    match state.store.submit(payload).await {
        Ok(record) => {
            logger::log_api_request("POST", "/api/highscores", 200);
            logger::log_score_submitted(&record.name, record.score);
            json_response(StatusCode::OK, &serde_json::json!({ "ok": true }))
        }
        Err(e) => {
            logger::log_error(&format!("Failed to persist highscores: {e}"));
            logger::log_api_request("POST", "/api/highscores", 500);
            internal_error()
        }
    }
}
