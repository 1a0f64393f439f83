//! LLM client — the single point of entry for all model calls in the pipeline.
//!
//! ARCHITECTURAL RULE: no agent may call the completion API directly. All
//! model interactions go through `ModelClient`, which wraps a pluggable
//! `CompletionBackend` (live Anthropic API, or a scripted stub in tests) with
//! bounded retries and JSON contract parsing.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 4096;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Model call failed after {attempts} attempts")]
    Exhausted { attempts: u32 },

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// Retry policy applied around each model call: bounded attempts with a
/// simple fixed delay between them.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_attempts: 3,
            delay: Duration::from_secs(1),
        }
    }
}

/// The completion seam. Agents depend on this trait so the whole pipeline
/// can run against a deterministic stub in tests.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Sends one prompt and returns the raw text completion.
    async fn complete(&self, prompt: &str, system: &str) -> Result<String, LlmError>;

    /// Identifier recorded in generated-document metadata.
    fn model_id(&self) -> &str;
}

// ────────────────────────────────────────────────────────────────────────────
// Anthropic backend
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<AnthropicMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<ContentBlock>,
    usage: Usage,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    input_tokens: u32,
    output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct AnthropicError {
    error: AnthropicErrorBody,
}

#[derive(Debug, Deserialize)]
struct AnthropicErrorBody {
    message: String,
}

/// Live Anthropic Messages API backend. Retries 429 and 5xx responses with
/// the configured fixed delay.
pub struct AnthropicBackend {
    client: Client,
    api_key: String,
    model: String,
    retry: RetryPolicy,
}

impl AnthropicBackend {
    pub fn new(
        api_key: String,
        model: String,
        timeout: Duration,
        retry: RetryPolicy,
    ) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            api_key,
            model,
            retry,
        })
    }
}

#[async_trait]
impl CompletionBackend for AnthropicBackend {
    async fn complete(&self, prompt: &str, system: &str) -> Result<String, LlmError> {
        let request_body = AnthropicRequest {
            model: &self.model,
            max_tokens: MAX_TOKENS,
            system,
            messages: vec![AnthropicMessage {
                role: "user",
                content: prompt,
            }],
        };

        let mut last_error: Option<LlmError> = None;

        for attempt in 0..self.retry.max_attempts {
            if attempt > 0 {
                warn!(
                    "model call attempt {} failed, retrying after {}ms",
                    attempt,
                    self.retry.delay.as_millis()
                );
                tokio::time::sleep(self.retry.delay).await;
            }

            let response = self
                .client
                .post(ANTHROPIC_API_URL)
                .header("x-api-key", &self.api_key)
                .header("anthropic-version", ANTHROPIC_VERSION)
                .header("content-type", "application/json")
                .json(&request_body)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(LlmError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("API returned {}: {}", status, body);
                last_error = Some(LlmError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<AnthropicError>(&body)
                    .map(|e| e.error.message)
                    .unwrap_or(body);
                return Err(LlmError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let parsed: AnthropicResponse = response.json().await?;

            debug!(
                "model call succeeded: input_tokens={}, output_tokens={}",
                parsed.usage.input_tokens, parsed.usage.output_tokens
            );

            let text = parsed
                .content
                .iter()
                .find(|b| b.block_type == "text")
                .and_then(|b| b.text.clone())
                .ok_or(LlmError::EmptyContent)?;

            return Ok(text);
        }

        Err(last_error.unwrap_or(LlmError::Exhausted {
            attempts: self.retry.max_attempts,
        }))
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}

// ────────────────────────────────────────────────────────────────────────────
// ModelClient — retrying JSON contract wrapper used by every agent
// ────────────────────────────────────────────────────────────────────────────

/// The single client handed to all agents. Adds parse-level retries on top of
/// the backend's transport-level retries: a completion that is not valid JSON
/// for the expected contract is re-requested up to the policy limit.
#[derive(Clone)]
pub struct ModelClient {
    backend: Arc<dyn CompletionBackend>,
    retry: RetryPolicy,
}

impl ModelClient {
    pub fn new(backend: Arc<dyn CompletionBackend>, retry: RetryPolicy) -> Self {
        Self { backend, retry }
    }

    pub fn model_id(&self) -> &str {
        self.backend.model_id()
    }

    /// Calls the model and deserializes the response as JSON, retrying on
    /// parse failures. The prompt must instruct the model to return JSON only.
    pub async fn call_json<T: DeserializeOwned>(
        &self,
        prompt: &str,
        system: &str,
    ) -> Result<T, LlmError> {
        let mut last_error: Option<LlmError> = None;

        for attempt in 0..self.retry.max_attempts {
            if attempt > 0 {
                warn!(
                    "unparseable model output on attempt {}, retrying after {}ms",
                    attempt,
                    self.retry.delay.as_millis()
                );
                tokio::time::sleep(self.retry.delay).await;
            }

            let text = match self.backend.complete(prompt, system).await {
                Ok(t) => t,
                Err(e) => return Err(e), // backend already retried transport errors
            };

            match serde_json::from_str(strip_json_fences(&text)) {
                Ok(value) => return Ok(value),
                Err(e) => {
                    debug!("contract parse failed: {e}");
                    last_error = Some(LlmError::Parse(e));
                }
            }
        }

        Err(last_error.unwrap_or(LlmError::Exhausted {
            attempts: self.retry.max_attempts,
        }))
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from model output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Test support
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
pub mod testing {
    //! Scripted backend shared by agent and workflow tests.

    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::{CompletionBackend, LlmError, ModelClient, RetryPolicy};

    /// Returns canned responses in order; counts every call it receives.
    pub struct ScriptedBackend {
        responses: Mutex<VecDeque<String>>,
        calls: AtomicU32,
    }

    impl ScriptedBackend {
        pub fn new(responses: Vec<&str>) -> Self {
            Self {
                responses: Mutex::new(responses.into_iter().map(String::from).collect()),
                calls: AtomicU32::new(0),
            }
        }

        pub fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl CompletionBackend for ScriptedBackend {
        async fn complete(&self, _prompt: &str, _system: &str) -> Result<String, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .ok_or(LlmError::EmptyContent)
        }

        fn model_id(&self) -> &str {
            "scripted-stub"
        }
    }

    /// Builds a `ModelClient` over a scripted backend with zero retry delay.
    pub fn scripted_client(backend: std::sync::Arc<ScriptedBackend>) -> ModelClient {
        ModelClient::new(
            backend,
            RetryPolicy {
                max_attempts: 1,
                delay: std::time::Duration::from_millis(0),
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "{\"key\": \"value\"}";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[tokio::test]
    async fn test_call_json_parses_fenced_output() {
        let backend = Arc::new(testing::ScriptedBackend::new(vec![
            "```json\n{\"answer\": 42}\n```",
        ]));
        let client = testing::scripted_client(backend.clone());

        #[derive(serde::Deserialize)]
        struct Out {
            answer: u32,
        }

        let out: Out = client.call_json("prompt", "system").await.unwrap();
        assert_eq!(out.answer, 42);
        assert_eq!(backend.calls(), 1);
    }

    #[tokio::test]
    async fn test_call_json_retries_on_unparseable_content() {
        let backend = Arc::new(testing::ScriptedBackend::new(vec![
            "not json at all",
            "{\"answer\": 7}",
        ]));
        let client = ModelClient::new(
            backend.clone(),
            RetryPolicy {
                max_attempts: 2,
                delay: Duration::from_millis(0),
            },
        );

        #[derive(serde::Deserialize)]
        struct Out {
            answer: u32,
        }

        let out: Out = client.call_json("prompt", "system").await.unwrap();
        assert_eq!(out.answer, 7);
        assert_eq!(backend.calls(), 2);
    }

    #[tokio::test]
    async fn test_call_json_gives_up_after_bounded_attempts() {
        let backend = Arc::new(testing::ScriptedBackend::new(vec![
            "garbage", "garbage", "garbage", "garbage",
        ]));
        let client = ModelClient::new(
            backend.clone(),
            RetryPolicy {
                max_attempts: 2,
                delay: Duration::from_millis(0),
            },
        );

        let result: Result<serde_json::Value, _> = client.call_json("prompt", "system").await;
        assert!(result.is_err());
        assert_eq!(backend.calls(), 2, "retries must stay within the policy");
    }
}
