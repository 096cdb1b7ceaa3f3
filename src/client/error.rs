//! Move service error types.

use derive_more::{Display, Error};
use tracing::instrument;

/// Failed or rejected request to the move service, with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Service error: {} at {}:{}", message, file, line)]
pub struct ServiceError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ServiceError {
    /// Creates a new service error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

impl From<reqwest::Error> for ServiceError {
    #[track_caller]
    fn from(err: reqwest::Error) -> Self {
        Self::new(format!("HTTP error: {}", err))
    }
}
