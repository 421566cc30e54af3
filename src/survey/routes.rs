//! REST endpoint exposing the question catalogue.

use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use super::question::QuestionSet;

/// GET /api/survey/questions
///
/// Returns the ordered question set so a client can render each step.
async fn list_questions(State(questions): State<Arc<QuestionSet>>) -> impl IntoResponse {
    Json(questions.as_ref().clone())
}

/// Build the question catalogue route.
pub fn question_routes(questions: Arc<QuestionSet>) -> Router {
    Router::new()
        .route("/api/survey/questions", get(list_questions))
        .with_state(questions)
}
