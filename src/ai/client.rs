//! Chat-completion client for OpenRouter (OpenAI-compatible API).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::OUTBOUND_TIMEOUT;

/// Errors from a chat-completion call, all of them retryable.
#[derive(Error, Debug)]
pub enum ChatError {
    /// Couldn't reach the API or read its response.
    #[error("request failed: {0}")]
    Transport(String),

    /// The API answered with a non-success status (quota, bad model, ...).
    #[error("API returned {status}: {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body
        message: String,
    },

    /// The response had no message content.
    #[error("response contained no content")]
    EmptyResponse,
}

impl From<reqwest::Error> for ChatError {
    fn from(err: reqwest::Error) -> Self {
        ChatError::Transport(err.to_string())
    }
}

/// A chat-completion API: one prompt in, free-form text out.
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    /// Sends `prompt` as a single user message to `model`.
    async fn complete(&self, model: &str, prompt: &str) -> Result<String, ChatError>;
}

#[derive(Serialize, Debug)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    temperature: f32,
}

#[derive(Serialize, Debug)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize, Debug)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize, Debug)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize, Debug)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

impl ChatCompletionResponse {
    /// Text of the first choice; blank content counts as no content.
    fn into_content(self) -> Result<String, ChatError> {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(ChatError::EmptyResponse)
    }
}

/// Calls `POST {base_url}/chat/completions` with a bearer key.
#[derive(Clone, Debug)]
pub struct OpenRouterClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl OpenRouterClient {
    /// Builds a client for the given key and API base.
    pub fn new(api_key: &str, base_url: &str) -> Result<Self, ChatError> {
        let client = reqwest::Client::builder()
            .timeout(OUTBOUND_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl ChatCompletion for OpenRouterClient {
    async fn complete(&self, model: &str, prompt: &str) -> Result<String, ChatError> {
        let body = ChatCompletionRequest {
            model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: 0.7,
        };

        tracing::debug!(model = model, "Calling chat completion API");
        let resp = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(ChatError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: ChatCompletionResponse = resp.json().await?;
        parsed.into_content()
    }
}
