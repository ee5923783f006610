//! Model invocation: the [`LlmClient`] trait, the chat-completions client, and the
//! [`ModelInvoker`] that walks an ordered provider list.
//!
//! The pipeline only needs "messages in, reply text out"; everything provider-specific
//! (URL, model, credential, timeout) is carried by [`Provider`] and [`LlmSettings`], built
//! once at startup and passed in by construction.

mod invoker;
mod mock;
mod openai;
mod settings;

pub use invoker::{Attempt, ModelInvoker, UpstreamError};
pub use mock::{MockLlm, MockReply};
pub use openai::ChatCompletionsClient;
pub use settings::{
    LlmSettings, SettingsError, DEFAULT_FALLBACK_MODEL, DEFAULT_FALLBACK_URL,
    DEFAULT_TEMPERATURE, DEFAULT_TIMEOUT_SECS,
};

use std::fmt;

use async_trait::async_trait;

use crate::message::Message;

/// One chat-completions endpoint.
#[derive(Clone, PartialEq, Eq)]
pub struct Provider {
    /// Label used in logs and errors (e.g. `primary`, `fallback`).
    pub name: String,
    /// Full chat-completions URL, e.g. `https://host/v1/chat/completions`.
    pub url: String,
    pub model: String,
    pub api_key: String,
}

impl fmt::Debug for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Provider")
            .field("name", &self.name)
            .field("url", &self.url)
            .field("model", &self.model)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// Failure of one call to one provider.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed completion response: {0}")]
    MalformedResponse(String),
}

/// Sends messages to a model and returns the reply text.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Provider label for logs.
    fn name(&self) -> &str;

    async fn complete(&self, messages: &[Message]) -> Result<String, LlmError>;
}
