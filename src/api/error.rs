//! Error type for command handlers and its status-code mapping.

use thiserror::Error;

use crate::error::CellarError;

#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("unknown command: {0}")]
    UnknownCommand(String),
    #[error("decode failed: {0}")]
    DecodeFailed(String),
    #[error("{command} requires {}", fields.join(", "))]
    MissingFields {
        command: String,
        fields: Vec<&'static str>,
    },
    #[error("not found: {0}")]
    NotFound(String),
    /// The request collides with the current cellar state.
    #[error("conflict: {0}")]
    Conflict(String),
    /// The request is well formed but not acceptable.
    #[error("rejected: {0}")]
    Rejected(String),
    #[error("cellar error: {0}")]
    Cellar(#[source] CellarError),
}

impl From<CellarError> for HandlerError {
    fn from(err: CellarError) -> Self {
        match err {
            CellarError::NotFound { .. } => HandlerError::NotFound(err.to_string()),
            CellarError::Conflict { .. }
            | CellarError::MultiplePlacement { .. }
            | CellarError::InvalidTransition { .. } => HandlerError::Conflict(err.to_string()),
            CellarError::OutOfBounds { .. }
            | CellarError::InvalidLocation(_)
            | CellarError::InvalidDimensions { .. }
            | CellarError::InvalidQuantity(_)
            | CellarError::ArchitectModeRequired(_) => HandlerError::Rejected(err.to_string()),
            CellarError::Store(_) | CellarError::Lock(_) => HandlerError::Cellar(err),
        }
    }
}

impl From<serde_json::Error> for HandlerError {
    fn from(err: serde_json::Error) -> Self {
        HandlerError::DecodeFailed(err.to_string())
    }
}

impl HandlerError {
    /// Map this error to an HTTP status code.
    pub fn status_code(&self) -> u16 {
        match self {
            HandlerError::UnknownCommand(_) => 404,
            HandlerError::DecodeFailed(_) => 400,
            HandlerError::MissingFields { .. } => 400,
            HandlerError::NotFound(_) => 404,
            HandlerError::Conflict(_) => 409,
            HandlerError::Rejected(_) => 422,
            HandlerError::Cellar(_) => 500,
        }
    }
}
