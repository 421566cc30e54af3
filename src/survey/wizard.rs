//! Wizard controller — gated transitions over the survey state.

use std::sync::{Arc, LazyLock};

use regex::Regex;
use serde::Serialize;

use super::payload::SubmissionPayload;
use super::question::{Question, QuestionSet};
use super::state::{Position, SurveyState};
use crate::error::WizardError;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_.%+-]+@[A-Za-z0-9_.-]+\.[A-Za-z]{2,}$").expect("valid email pattern")
});

/// Email-shaped check applied before leaving the intro screen.
/// Surrounding whitespace is ignored.
pub fn is_valid_email(value: &str) -> bool {
    EMAIL_PATTERN.is_match(value.trim())
}

/// Receives the finished payload. Implementations must not block: the
/// wizard reaches `Thanks` regardless of what happens to the submission.
pub trait SubmissionDispatcher: Send + Sync {
    fn dispatch(&self, payload: SubmissionPayload);
}

/// What a client needs to render the current screen.
#[derive(Debug, Clone, Serialize)]
pub struct Screen {
    pub position: Position,
    pub total_questions: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<Question>,
    /// Selected option ids of the current question, in option order.
    pub selected: Vec<String>,
    pub free_text: String,
    pub contact: String,
    pub can_advance: bool,
    pub can_retreat: bool,
}

/// Drives one respondent through the question set.
pub struct Wizard {
    questions: Arc<QuestionSet>,
    state: SurveyState,
    dispatcher: Arc<dyn SubmissionDispatcher>,
    submitted: bool,
}

impl Wizard {
    pub fn new(questions: Arc<QuestionSet>, dispatcher: Arc<dyn SubmissionDispatcher>) -> Self {
        Self {
            questions,
            state: SurveyState::default(),
            dispatcher,
            submitted: false,
        }
    }

    pub fn position(&self) -> Position {
        self.state.position
    }

    pub fn state(&self) -> &SurveyState {
        &self.state
    }

    pub fn questions(&self) -> &QuestionSet {
        &self.questions
    }

    /// Question shown on the current screen, if any.
    pub fn current_question(&self) -> Option<&Question> {
        self.state
            .position
            .question_index()
            .and_then(|i| self.questions.get(i))
    }

    /// Store the contact text as typed.
    pub fn set_contact(&mut self, value: impl Into<String>) {
        self.state.contact = value.into();
    }

    /// Flip membership of `option_id` in the selections for `question_id`.
    /// Returns whether the option is selected afterwards.
    pub fn toggle_option(&mut self, question_id: &str, option_id: &str) -> Result<bool, WizardError> {
        let question = self
            .questions
            .find(question_id)
            .ok_or_else(|| WizardError::UnknownQuestion {
                question_id: question_id.to_string(),
            })?;
        if question.option(option_id).is_none() {
            return Err(WizardError::UnknownOption {
                question_id: question_id.to_string(),
                option_id: option_id.to_string(),
            });
        }
        let max_select = question.max_select;

        let answer = self.state.answer_mut(question_id);
        if answer.selections.remove(option_id) {
            return Ok(false);
        }
        if let Some(max) = max_select {
            if answer.selections.len() >= max {
                return Err(WizardError::SelectionLimit {
                    question_id: question_id.to_string(),
                    max,
                });
            }
        }
        answer.selections.insert(option_id.to_string());
        Ok(true)
    }

    /// Overwrite the free-text answer for `question_id`.
    pub fn set_free_text(
        &mut self,
        question_id: &str,
        text: impl Into<String>,
    ) -> Result<(), WizardError> {
        let question = self
            .questions
            .find(question_id)
            .ok_or_else(|| WizardError::UnknownQuestion {
                question_id: question_id.to_string(),
            })?;
        if !question.allow_free_text {
            return Err(WizardError::FreeTextNotAllowed {
                question_id: question_id.to_string(),
            });
        }
        self.state.answer_mut(question_id).free_text = text.into();
        Ok(())
    }

    /// Check the forward gate without moving.
    pub fn check_advance(&self) -> Result<Position, WizardError> {
        match self.state.position {
            Position::Intro => {
                if is_valid_email(&self.state.contact) {
                    Ok(Position::Question(0))
                } else {
                    Err(WizardError::InvalidContact)
                }
            }
            Position::Question(i) => {
                if let Some(q) = self.questions.get(i) {
                    if q.required && !self.state.is_answered(q.id) {
                        return Err(WizardError::Unanswered {
                            question_id: q.id.to_string(),
                        });
                    }
                }
                if i < self.questions.last_index() {
                    Ok(Position::Question(i + 1))
                } else {
                    Ok(Position::Thanks)
                }
            }
            Position::Thanks => Err(WizardError::Finished),
        }
    }

    pub fn can_advance(&self) -> bool {
        self.check_advance().is_ok()
    }

    /// Move one step forward. Reaching `Thanks` builds the payload and hands
    /// it to the dispatcher, once per wizard.
    pub fn advance(&mut self) -> Result<Position, WizardError> {
        let next = self.check_advance()?;
        self.state.position = next;

        if next.is_terminal() && !self.submitted {
            self.submitted = true;
            let payload = SubmissionPayload::from_state(&self.questions, &self.state);
            tracing::info!(questions = self.questions.len(), "Survey complete, dispatching submission");
            self.dispatcher.dispatch(payload);
        }

        Ok(next)
    }

    /// Move one step back.
    pub fn retreat(&mut self) -> Result<Position, WizardError> {
        let prev = match self.state.position {
            Position::Question(0) => Position::Intro,
            Position::Question(i) => Position::Question(i - 1),
            Position::Intro => return Err(WizardError::AtStart),
            Position::Thanks => return Err(WizardError::Finished),
        };
        self.state.position = prev;
        Ok(prev)
    }

    /// Render-ready view of the current screen.
    pub fn screen(&self) -> Screen {
        let question = self.current_question().cloned();
        let (selected, free_text) = match &question {
            Some(q) => match self.state.answer(q.id) {
                Some(answer) => (
                    q.options
                        .iter()
                        .filter(|o| answer.selections.contains(o.id))
                        .map(|o| o.id.to_string())
                        .collect(),
                    answer.free_text.clone(),
                ),
                None => (Vec::new(), String::new()),
            },
            None => (Vec::new(), String::new()),
        };

        Screen {
            position: self.state.position,
            total_questions: self.questions.len(),
            question,
            selected,
            free_text,
            contact: self.state.contact.clone(),
            can_advance: self.can_advance(),
            can_retreat: matches!(self.state.position, Position::Question(_)),
        }
    }
}
