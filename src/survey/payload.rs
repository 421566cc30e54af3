//! The finished-survey payload sent to the collection service.

use serde::{Deserialize, Serialize};

use super::question::{Question, QuestionSet, ids};
use super::state::SurveyState;

/// Flattened answers, one string per fixed question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionPayload {
    pub email: String,
    pub reason_mindfulness: String,
    pub preferred_service_format: String,
    pub preferred_content_type: String,
}

impl SubmissionPayload {
    /// Assemble the payload from the final survey state.
    pub fn from_state(questions: &QuestionSet, state: &SurveyState) -> Self {
        let field = |question_id: &str| {
            questions
                .find(question_id)
                .map(|q| join_answer(q, state))
                .unwrap_or_default()
        };

        Self {
            email: state.contact.trim().to_string(),
            reason_mindfulness: field(ids::NEEDS),
            preferred_service_format: field(ids::FORMAT),
            preferred_content_type: field(ids::CONTENT),
        }
    }
}

/// Selected option ids in declared option order, joined with ", ".
/// Free text is not part of the payload.
fn join_answer(question: &Question, state: &SurveyState) -> String {
    let Some(answer) = state.answer(question.id) else {
        return String::new();
    };

    question
        .options
        .iter()
        .filter(|o| answer.selections.contains(o.id))
        .map(|o| o.id)
        .collect::<Vec<_>>()
        .join(", ")
}
