//! Error types shared by the quiz client.

use thiserror::Error;

use crate::controller::Phase;

/// Errors returned when a user action cannot be applied.
///
/// None of these are fatal. The controller leaves the session and the view
/// untouched when it returns one, except for `EmptyCareer` which also sets
/// the start-view notice.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("career name must not be empty")]
    EmptyCareer,
    #[error("the assessment has already started")]
    AlreadyStarted,
    #[error("a request is already in flight")]
    RequestInFlight,
    #[error("{action} is not available while {phase:?}")]
    Unavailable { action: &'static str, phase: Phase },
    #[error("no question is currently displayed")]
    NoQuestion,
    #[error("the assessment is finished")]
    Finished,
}

/// Errors emitted by `AssessmentService` implementations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ClientError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("assessment service responded with status {0}")]
    Status(reqwest::StatusCode),
    #[error("could not decode assessment service response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Errors emitted while resolving runtime settings.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}
