//! Execution of rendered prompts against a language-model endpoint.
//!
//! - **ExecutionClient**: async request/response contract
//! - **OpenAiClient**: OpenAI-compatible chat completions over HTTP
//! - **Dispatcher**: allows one request in flight per render target
//!
//! Failures are returned to the caller unchanged. Nothing here retries, and
//! an issued request always runs to completion.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

mod error;
mod openai;

pub use error::{DispatchError, ExecutionError};
pub use openai::OpenAiClient;

/// A rendered prompt ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionRequest {
    pub rendered_prompt: String,
}

/// Text produced by the endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResponse {
    pub text: String,
}

/// Sends a rendered prompt to a model and returns its reply.
#[async_trait]
pub trait ExecutionClient: Send + Sync {
    async fn execute(&self, request: ExecutionRequest)
    -> Result<ExecutionResponse, ExecutionError>;
}

type InFlight = Arc<Mutex<HashSet<String>>>;

/// Front door to an [`ExecutionClient`] that rejects overlapping requests
/// for the same target.
#[derive(Clone)]
pub struct Dispatcher {
    client: Arc<dyn ExecutionClient>,
    in_flight: InFlight,
}

impl Dispatcher {
    pub fn new(client: Arc<dyn ExecutionClient>) -> Self {
        Self {
            client,
            in_flight: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// Whether a request for `target` is outstanding.
    pub fn is_in_flight(&self, target: &str) -> bool {
        self.in_flight
            .lock()
            .unwrap_or_else(|poison| poison.into_inner())
            .contains(target)
    }

    /// Send `rendered_prompt` on behalf of `target`.
    ///
    /// Returns [`DispatchError::AlreadyRunning`] without contacting the client
    /// if `target` already has a request outstanding.
    pub async fn dispatch(
        &self,
        target: &str,
        rendered_prompt: String,
    ) -> Result<ExecutionResponse, DispatchError> {
        let _guard = InFlightGuard::acquire(&self.in_flight, target)?;

        info!(%target, prompt_len = rendered_prompt.len(), "dispatch: sending request");
        let response = self
            .client
            .execute(ExecutionRequest { rendered_prompt })
            .await?;
        debug!(%target, text_len = response.text.len(), "dispatch: response received");

        Ok(response)
    }
}

/// Marks a target as in flight until dropped.
struct InFlightGuard {
    in_flight: InFlight,
    target: String,
}

impl InFlightGuard {
    fn acquire(in_flight: &InFlight, target: &str) -> Result<Self, DispatchError> {
        let mut set = in_flight
            .lock()
            .unwrap_or_else(|poison| poison.into_inner());
        if !set.insert(target.to_string()) {
            debug!(%target, "acquire: target busy");
            return Err(DispatchError::AlreadyRunning(target.to_string()));
        }
        Ok(Self {
            in_flight: Arc::clone(in_flight),
            target: target.to_string(),
        })
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.in_flight
            .lock()
            .unwrap_or_else(|poison| poison.into_inner())
            .remove(&self.target);
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::VecDeque;

    /// Scripted client for unit tests.
    ///
    /// Each call pops the next scripted outcome: `Ok(text)` becomes a response,
    /// `Err(message)` becomes an [`ExecutionError::Api`] with status 500.
    #[derive(Default)]
    pub struct MockExecutionClient {
        outcomes: Mutex<VecDeque<Result<String, String>>>,
        requests: Mutex<Vec<String>>,
    }

    impl MockExecutionClient {
        pub fn new(outcomes: Vec<Result<String, String>>) -> Self {
            Self {
                outcomes: Mutex::new(outcomes.into()),
                requests: Mutex::new(Vec::new()),
            }
        }

        /// Rendered prompts received so far.
        pub fn requests(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ExecutionClient for MockExecutionClient {
        async fn execute(
            &self,
            request: ExecutionRequest,
        ) -> Result<ExecutionResponse, ExecutionError> {
            self.requests.lock().unwrap().push(request.rendered_prompt);
            match self.outcomes.lock().unwrap().pop_front() {
                Some(Ok(text)) => Ok(ExecutionResponse { text }),
                Some(Err(message)) => Err(ExecutionError::Api {
                    status: 500,
                    message,
                }),
                None => Err(ExecutionError::InvalidResponse(
                    "No more mock responses".to_string(),
                )),
            }
        }
    }
}
