//! Execution error types

use thiserror::Error;

/// Errors that can occur while running a rendered prompt
#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error(
        "OpenAI API key not found. Set the {env_var} environment variable or run `promptlab config set-key <KEY>`."
    )]
    MissingApiKey { env_var: String },

    /// Endpoint-reported failure; `message` is what the endpoint said.
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors from [`super::Dispatcher::dispatch`]
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("a request for {0} is already in progress")]
    AlreadyRunning(String),

    #[error(transparent)]
    Execution(#[from] ExecutionError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_message_is_verbatim() {
        let err = ExecutionError::Api {
            status: 429,
            message: "You exceeded your current quota".to_string(),
        };
        assert_eq!(err.to_string(), "You exceeded your current quota");
    }

    #[test]
    fn test_missing_key_names_env_var() {
        let err = ExecutionError::MissingApiKey {
            env_var: "OPENAI_API_KEY".to_string(),
        };
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }

    #[test]
    fn test_dispatch_wraps_execution_transparently() {
        let err: DispatchError = ExecutionError::InvalidResponse("empty body".to_string()).into();
        assert_eq!(err.to_string(), "Invalid response: empty body");
    }
}
