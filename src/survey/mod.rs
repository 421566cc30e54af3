//! Survey wizard — the question set, per-session progress state, and the
//! controller that gates moving between screens.
//!
//! The wizard is synchronous and owns its state outright; front ends (the
//! WebSocket session in `session`) drive it one action at a time. When the
//! last question is passed, the assembled `SubmissionPayload` is handed to a
//! `SubmissionDispatcher` without waiting on the outcome.

pub mod payload;
pub mod question;
pub mod routes;
pub mod state;
pub mod wizard;

pub use payload::SubmissionPayload;
pub use question::{Question, QuestionSet, SurveyOption, mindfulness_questions};
pub use routes::question_routes;
pub use state::{Answer, Position, SurveyState};
pub use wizard::{Screen, SubmissionDispatcher, Wizard, is_valid_email};
