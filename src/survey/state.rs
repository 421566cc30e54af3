//! Survey progress state — where the respondent is and what they answered.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

/// Which screen the wizard is on.
///
/// Progresses linearly: Intro → Question(0) → … → Question(last) → Thanks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "screen", content = "index", rename_all = "snake_case")]
pub enum Position {
    Intro,
    Question(usize),
    Thanks,
}

impl Position {
    /// Whether this position is terminal (survey is done).
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Thanks)
    }

    /// Question index, if on a question screen.
    pub fn question_index(&self) -> Option<usize> {
        match self {
            Self::Question(i) => Some(*i),
            _ => None,
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::Intro
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Intro => write!(f, "intro"),
            Self::Question(i) => write!(f, "question[{i}]"),
            Self::Thanks => write!(f, "thanks"),
        }
    }
}

/// Everything the respondent entered for one question.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Answer {
    /// Selected option ids. Membership only; order is not tracked.
    pub selections: HashSet<String>,
    /// The "other" free-text answer.
    pub free_text: String,
}

impl Answer {
    /// At least one selection or some non-whitespace free text.
    pub fn is_answered(&self) -> bool {
        !self.selections.is_empty() || !self.free_text.trim().is_empty()
    }
}

/// In-memory survey progress for one session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SurveyState {
    pub position: Position,
    /// Raw contact text as typed. Validated only when leaving the intro.
    pub contact: String,
    /// Answers keyed by question id.
    pub answers: HashMap<String, Answer>,
}

impl SurveyState {
    /// Answer for a question, if anything was recorded.
    pub fn answer(&self, question_id: &str) -> Option<&Answer> {
        self.answers.get(question_id)
    }

    /// Answer for a question, created empty on first touch.
    pub fn answer_mut(&mut self, question_id: &str) -> &mut Answer {
        self.answers.entry(question_id.to_string()).or_default()
    }

    pub fn is_answered(&self, question_id: &str) -> bool {
        self.answer(question_id).is_some_and(Answer::is_answered)
    }
}
