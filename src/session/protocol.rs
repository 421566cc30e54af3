//! JSON protocol spoken on `/ws/survey`.

use serde::{Deserialize, Serialize};

use crate::error::WizardError;
use crate::survey::{Screen, Wizard};

/// Message from client → server.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    SetContact { value: String },
    ToggleOption { question_id: String, option_id: String },
    SetFreeText { question_id: String, text: String },
    Advance,
    Retreat,
    Snapshot,
}

/// Message from server → client.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    Screen(Screen),
    /// The action was refused; the wizard is unchanged.
    Rejected { reason: String },
    /// The client sent something that is not a protocol message.
    Error { message: String },
}

/// Apply one client action to the wizard.
pub fn apply(wizard: &mut Wizard, msg: ClientMessage) -> Result<(), WizardError> {
    match msg {
        ClientMessage::SetContact { value } => {
            wizard.set_contact(value);
            Ok(())
        }
        ClientMessage::ToggleOption {
            question_id,
            option_id,
        } => wizard.toggle_option(&question_id, &option_id).map(|_| ()),
        ClientMessage::SetFreeText { question_id, text } => {
            wizard.set_free_text(&question_id, text)
        }
        ClientMessage::Advance => wizard.advance().map(|_| ()),
        ClientMessage::Retreat => wizard.retreat().map(|_| ()),
        ClientMessage::Snapshot => Ok(()),
    }
}

/// Replies for one inbound text frame: a rejection or parse error if any,
/// always followed by the current screen.
pub fn handle_text(wizard: &mut Wizard, text: &str) -> Vec<ServerMessage> {
    let mut replies = Vec::with_capacity(2);
    match serde_json::from_str::<ClientMessage>(text) {
        Ok(msg) => {
            if let Err(e) = apply(wizard, msg) {
                replies.push(ServerMessage::Rejected {
                    reason: e.to_string(),
                });
            }
        }
        Err(e) => replies.push(ServerMessage::Error {
            message: format!("Invalid message: {e}"),
        }),
    }
    replies.push(ServerMessage::Screen(wizard.screen()));
    replies
}
