//! HTTP application assembly.

use std::sync::Arc;

use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use tower_http::cors::CorsLayer;

use crate::forwarder::{Forwarder, ForwardingDispatcher, submission_routes};
use crate::session::{SessionState, session_routes};
use crate::survey::{QuestionSet, question_routes};

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "pretotype-survey"
    }))
}

/// Build the full router: submission relay, question catalogue, WebSocket
/// sessions, and health.
pub fn app(questions: Arc<QuestionSet>, forwarder: Arc<Forwarder>) -> Router {
    let sessions = SessionState {
        questions: Arc::clone(&questions),
        dispatcher: Arc::new(ForwardingDispatcher::new(Arc::clone(&forwarder))),
    };

    Router::new()
        .route("/health", get(health))
        .merge(submission_routes(forwarder))
        .merge(question_routes(questions))
        .merge(session_routes(sessions))
        .layer(CorsLayer::permissive())
}
