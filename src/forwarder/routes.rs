//! POST /api/survey — inbound side of the forwarder.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{Value, json};
use tracing::{error, info};

use super::Forwarder;
use crate::error::ForwardError;

/// Message returned on every failed submission.
pub const FAILURE_MESSAGE: &str = "설문 제출 실패";

/// Relay the request body upstream. Upstream JSON comes back with 200;
/// anything else becomes the fixed failure body with 500.
async fn submit_survey(State(forwarder): State<Arc<Forwarder>>, body: Bytes) -> Response {
    let result = match serde_json::from_slice::<Value>(&body) {
        Ok(payload) => forwarder.forward(&payload).await,
        Err(e) => Err(ForwardError::InvalidBody(e)),
    };

    match result {
        Ok(data) => {
            info!("Survey submission relayed");
            (StatusCode::OK, Json(data)).into_response()
        }
        Err(ForwardError::UpstreamStatus { status }) => {
            error!(%status, "Upstream rejected survey submission");
            failure_response()
        }
        Err(e) => {
            error!(error = %e, "Survey submission failed");
            failure_response()
        }
    }
}

fn failure_response() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "success": false, "message": FAILURE_MESSAGE })),
    )
        .into_response()
}

/// Build the submission route.
pub fn submission_routes(forwarder: Arc<Forwarder>) -> Router {
    Router::new()
        .route("/api/survey", post(submit_survey))
        .with_state(forwarder)
}
