//! Error types for promptlab.
//!
//! Uses thiserror for derive macros and keeps messages user-actionable.
//! Module-level errors (history, execution, dispatch) convert into
//! [`PromptlabError`] so command handlers can propagate them with `?`.

use crate::execution::{DispatchError, ExecutionError};
use crate::exit_codes;
use crate::history::HistoryError;
use thiserror::Error;

/// Main error type for promptlab operations.
#[derive(Error, Debug)]
pub enum PromptlabError {
    /// User provided invalid arguments or the store is in an unexpected state.
    #[error("{0}")]
    UserError(String),

    /// A prompt or version id did not resolve.
    #[error("{0}")]
    NotFound(String),

    /// The execution endpoint failed. The message is shown verbatim.
    #[error("{0}")]
    ExecutionError(String),

    /// Reading or writing store files failed.
    #[error("Store operation failed: {0}")]
    StoreError(String),

    /// Lock could not be acquired.
    #[error("Lock acquisition failed: {0}")]
    LockError(String),
}

impl PromptlabError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            PromptlabError::UserError(_) => exit_codes::USER_ERROR,
            PromptlabError::NotFound(_) => exit_codes::USER_ERROR,
            PromptlabError::ExecutionError(_) => exit_codes::EXECUTION_FAILURE,
            PromptlabError::StoreError(_) => exit_codes::STORE_FAILURE,
            PromptlabError::LockError(_) => exit_codes::LOCK_FAILURE,
        }
    }

    /// Follow-up line shown under the error message, if any.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            PromptlabError::ExecutionError(_) => Some(EXECUTION_FALLBACK),
            _ => None,
        }
    }
}

/// Shown after every execution failure, below the endpoint's own message.
pub const EXECUTION_FALLBACK: &str =
    "Failed to get a response. Please check your API key and try again.";

impl From<HistoryError> for PromptlabError {
    fn from(err: HistoryError) -> Self {
        match err {
            HistoryError::NotFound { .. } => PromptlabError::NotFound(err.to_string()),
            HistoryError::Corrupt(_) => PromptlabError::StoreError(err.to_string()),
        }
    }
}

impl From<ExecutionError> for PromptlabError {
    fn from(err: ExecutionError) -> Self {
        PromptlabError::ExecutionError(err.to_string())
    }
}

impl From<DispatchError> for PromptlabError {
    fn from(err: DispatchError) -> Self {
        match err {
            DispatchError::AlreadyRunning(_) => PromptlabError::LockError(err.to_string()),
            DispatchError::Execution(inner) => inner.into(),
        }
    }
}

/// Result type alias for promptlab operations.
pub type Result<T> = std::result::Result<T, PromptlabError>;
