//! Error types for the survey service.

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Failures while relaying a submission to the upstream collection service.
#[derive(Debug, thiserror::Error)]
pub enum ForwardError {
    #[error("Upstream base URL is not configured")]
    NotConfigured,

    #[error("Upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Upstream responded with status {status}")]
    UpstreamStatus { status: reqwest::StatusCode },

    #[error("Invalid submission body: {0}")]
    InvalidBody(#[from] serde_json::Error),
}

/// A wizard action that was refused. The wizard state is left unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WizardError {
    #[error("Contact is not a valid email address")]
    InvalidContact,

    #[error("Question {question_id} requires an answer")]
    Unanswered { question_id: String },

    #[error("Unknown question: {question_id}")]
    UnknownQuestion { question_id: String },

    #[error("Unknown option {option_id} for question {question_id}")]
    UnknownOption {
        question_id: String,
        option_id: String,
    },

    #[error("Question {question_id} allows at most {max} selections")]
    SelectionLimit { question_id: String, max: usize },

    #[error("Question {question_id} does not accept free text")]
    FreeTextNotAllowed { question_id: String },

    #[error("Already at the start of the survey")]
    AtStart,

    #[error("Survey is already complete")]
    Finished,
}
