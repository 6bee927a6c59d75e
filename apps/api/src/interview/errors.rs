use thiserror::Error;
use uuid::Uuid;

use crate::interview::oracle::OracleError;
use crate::storage::StorageError;

/// Errors raised by the screening and interview engine.
///
/// Caller errors (`InvalidInput`, `InvalidState`, `InvalidConfig`) never
/// mutate session state. Oracle errors abort only the call that raised them.
#[derive(Debug, Error)]
pub enum InterviewError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Evaluation failed: {0}")]
    EvaluationFailed(#[source] OracleError),

    #[error("Session {0} not found")]
    SessionNotFound(Uuid),

    #[error("Storage failure: {0}")]
    StorageFailure(#[from] StorageError),
}

impl InterviewError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, InterviewError::EvaluationFailed(OracleError::Timeout(_)))
    }
}
