//! OpenAI-compatible chat-completions client (non-streaming).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{LlmClient, LlmError, Provider};
use crate::message::{ChatMessage, Message};

/// Request body for `POST /v1/chat/completions`.
#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Calls one [`Provider`] with bearer auth, a fixed temperature and a request timeout.
pub struct ChatCompletionsClient {
    client: Client,
    provider: Provider,
    temperature: f32,
}

impl ChatCompletionsClient {
    pub fn new(provider: Provider, timeout: Duration, temperature: f32) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            provider,
            temperature,
        })
    }

    pub fn provider(&self) -> &Provider {
        &self.provider
    }
}

#[async_trait]
impl LlmClient for ChatCompletionsClient {
    fn name(&self) -> &str {
        &self.provider.name
    }

    async fn complete(&self, messages: &[Message]) -> Result<String, LlmError> {
        let body = ChatCompletionRequest {
            model: &self.provider.model,
            messages: messages.iter().map(ChatMessage::from).collect(),
            temperature: self.temperature,
            stream: false,
        };
        tracing::debug!(
            provider = %self.provider.name,
            url = %self.provider.url,
            model = %self.provider.model,
            "sending chat completion"
        );
        let resp = self
            .client
            .post(&self.provider.url)
            .bearer_auth(&self.provider.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(LlmError::Status {
                status: status.as_u16(),
                body: if text.is_empty() { "no body".into() } else { text },
            });
        }

        let text = resp
            .text()
            .await
            .map_err(|e| LlmError::Transport(format!("response body: {}", e)))?;
        let parsed: ChatCompletionResponse = serde_json::from_str(&text)
            .map_err(|e| LlmError::MalformedResponse(format!("response json: {}", e)))?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| LlmError::MalformedResponse("no choices[0].message.content".into()))
    }
}
