//! WebSocket endpoint — each connection drives its own wizard.

use std::sync::Arc;

use axum::{
    Router,
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
    routing::get,
};
use tracing::{Instrument, debug, info, info_span, warn};
use uuid::Uuid;

use super::protocol::{ServerMessage, handle_text};
use crate::survey::{QuestionSet, SubmissionDispatcher, Wizard};

/// Axum handler state (cloneable). Holds only immutable, shared pieces;
/// per-session progress lives in the connection task.
#[derive(Clone)]
pub struct SessionState {
    pub questions: Arc<QuestionSet>,
    pub dispatcher: Arc<dyn SubmissionDispatcher>,
}

/// Build the router with the `/ws/survey` endpoint.
pub fn session_routes(state: SessionState) -> Router {
    Router::new()
        .route("/ws/survey", get(ws_survey_handler))
        .with_state(state)
}

async fn ws_survey_handler(
    ws: WebSocketUpgrade,
    State(state): State<SessionState>,
) -> impl IntoResponse {
    let session = Uuid::new_v4();
    ws.on_upgrade(move |socket| {
        handle_socket(socket, state).instrument(info_span!("survey_session", %session))
    })
}

async fn handle_socket(mut socket: WebSocket, state: SessionState) {
    info!("Survey session started");

    let mut wizard = Wizard::new(state.questions, state.dispatcher);

    // Initial screen on connect
    if send(&mut socket, &ServerMessage::Screen(wizard.screen()))
        .await
        .is_err()
    {
        warn!("Failed to send initial screen, client disconnected");
        return;
    }

    while let Some(result) = socket.recv().await {
        match result {
            Ok(Message::Text(text)) => {
                for reply in handle_text(&mut wizard, &text) {
                    if send(&mut socket, &reply).await.is_err() {
                        debug!("Client disconnected during send");
                        return;
                    }
                }
            }
            Ok(Message::Ping(data)) => {
                if socket.send(Message::Pong(data)).await.is_err() {
                    break;
                }
            }
            Ok(Message::Close(_)) => break,
            Err(e) => {
                warn!(error = %e, "WebSocket error");
                break;
            }
            _ => {}
        }
    }

    info!(position = %wizard.position(), "Survey session ended");
}

async fn send(socket: &mut WebSocket, msg: &ServerMessage) -> Result<(), axum::Error> {
    match serde_json::to_string(msg) {
        Ok(json) => socket.send(Message::Text(json.into())).await,
        Err(e) => {
            warn!(error = %e, "Failed to serialize server message");
            Ok(())
        }
    }
}
