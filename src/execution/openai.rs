//! OpenAI API client implementation
//!
//! Sends the rendered prompt as a single user message to the Chat Completions
//! API. Errors are reported once; retrying is left to the user.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::{ExecutionClient, ExecutionError, ExecutionRequest, ExecutionResponse};
use crate::config::ResolvedExecution;

/// Text used when the endpoint answers without any choice.
pub const NO_RESPONSE_TEXT: &str = "No response received";

/// Fallback when the endpoint reports an error without a message.
const UNKNOWN_API_ERROR: &str = "Error calling OpenAI API";

/// OpenAI API client
pub struct OpenAiClient {
    model: String,
    api_key: String,
    base_url: String,
    temperature: f32,
    max_tokens: u32,
    http: Client,
}

impl OpenAiClient {
    /// Create a client from resolved execution settings.
    pub fn from_config(config: &ResolvedExecution) -> Result<Self, ExecutionError> {
        debug!(model = %config.model, base_url = %config.base_url, "from_config: called");
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            model: config.model.clone(),
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            http,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url)
    }

    /// Build the request body for the OpenAI API
    fn build_request_body(&self, request: &ExecutionRequest) -> serde_json::Value {
        serde_json::json!({
            "model": self.model,
            "messages": [
                {
                    "role": "user",
                    "content": request.rendered_prompt,
                }
            ],
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
        })
    }
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    #[serde(default)]
    choices: Vec<OpenAiChoice>,
    #[serde(default)]
    error: Option<OpenAiErrorBody>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAiMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// Interpret an HTTP status and body from the completions endpoint.
///
/// An `error.message` in the body wins over the status code, because the
/// endpoint reports most failures that way.
fn parse_response(status: u16, body: &str) -> Result<ExecutionResponse, ExecutionError> {
    let parsed: Result<OpenAiResponse, _> = serde_json::from_str(body);

    if let Ok(OpenAiResponse {
        error: Some(error), ..
    }) = &parsed
    {
        debug!(status, "parse_response: endpoint reported error");
        return Err(ExecutionError::Api {
            status,
            message: error
                .message
                .clone()
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| UNKNOWN_API_ERROR.to_string()),
        });
    }

    if !(200..300).contains(&status) {
        debug!(status, "parse_response: non-success status");
        return Err(ExecutionError::Api {
            status,
            message: format!("API error {}: {}", status, body.trim()),
        });
    }

    let parsed = parsed?;
    let text = parsed
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| NO_RESPONSE_TEXT.to_string());

    Ok(ExecutionResponse { text })
}

#[async_trait]
impl ExecutionClient for OpenAiClient {
    async fn execute(
        &self,
        request: ExecutionRequest,
    ) -> Result<ExecutionResponse, ExecutionError> {
        debug!(model = %self.model, "execute: called");
        let body = self.build_request_body(&request);

        let response = self
            .http
            .post(self.endpoint())
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status().as_u16();
        let text = response.text().await?;
        debug!(status, body_len = text.len(), "execute: response received");

        parse_response(status, &text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolved() -> ResolvedExecution {
        ResolvedExecution {
            base_url: "https://api.example.test/".to_string(),
            model: "gpt-4o-mini".to_string(),
            temperature: 0.7,
            max_tokens: 1000,
            timeout_seconds: 30,
            api_key: "sk-test".to_string(),
        }
    }

    #[test]
    fn test_request_body_shape() {
        let client = OpenAiClient::from_config(&resolved()).unwrap();
        let body = client.build_request_body(&ExecutionRequest {
            rendered_prompt: "Hello Ada".to_string(),
        });

        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "Hello Ada");
        assert_eq!(body["max_tokens"], 1000);
        assert!((body["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_endpoint_strips_trailing_slash() {
        let client = OpenAiClient::from_config(&resolved()).unwrap();
        assert_eq!(
            client.endpoint(),
            "https://api.example.test/v1/chat/completions"
        );
    }

    #[test]
    fn test_parse_success() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"A tale."}}]}"#;
        let response = parse_response(200, body).unwrap();
        assert_eq!(response.text, "A tale.");
    }

    #[test]
    fn test_parse_empty_choices() {
        let response = parse_response(200, r#"{"choices":[]}"#).unwrap();
        assert_eq!(response.text, NO_RESPONSE_TEXT);
    }

    #[test]
    fn test_parse_error_body_is_verbatim() {
        let body = r#"{"error":{"message":"Incorrect API key provided: sk-test.","type":"invalid_request_error"}}"#;
        let err = parse_response(401, body).unwrap_err();
        assert_eq!(err.to_string(), "Incorrect API key provided: sk-test.");
        assert!(matches!(err, ExecutionError::Api { status: 401, .. }));
    }

    #[test]
    fn test_parse_error_body_with_success_status() {
        let err = parse_response(200, r#"{"error":{}}"#).unwrap_err();
        assert_eq!(err.to_string(), UNKNOWN_API_ERROR);
    }

    #[test]
    fn test_parse_non_json_failure() {
        let err = parse_response(502, "Bad Gateway\n").unwrap_err();
        assert_eq!(err.to_string(), "API error 502: Bad Gateway");
    }

    #[test]
    fn test_parse_malformed_success() {
        let err = parse_response(200, "not json").unwrap_err();
        assert!(matches!(err, ExecutionError::Json(_)));
    }
}
