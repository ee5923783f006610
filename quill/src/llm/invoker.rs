//! Model Invoker: tries providers in order and returns the first reply.

use std::fmt;
use std::sync::Arc;

use super::{ChatCompletionsClient, LlmClient, LlmError, LlmSettings};
use crate::message::Message;

/// One failed provider call.
#[derive(Debug)]
pub struct Attempt {
    pub provider: String,
    pub error: LlmError,
}

/// Every provider failed. Attempts are in call order.
#[derive(Debug)]
pub struct UpstreamError {
    pub attempts: Vec<Attempt>,
}

impl fmt::Display for UpstreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.attempts.is_empty() {
            return f.write_str("no model provider configured");
        }
        f.write_str("all model providers failed")?;
        for a in &self.attempts {
            write!(f, "; {}: {}", a.provider, a.error)?;
        }
        Ok(())
    }
}

impl std::error::Error for UpstreamError {}

/// Ordered list of model clients. Calls are sequential: a later client is tried only after
/// the previous one has failed.
#[derive(Clone)]
pub struct ModelInvoker {
    clients: Vec<Arc<dyn LlmClient>>,
}

impl ModelInvoker {
    pub fn new(clients: Vec<Arc<dyn LlmClient>>) -> Self {
        Self { clients }
    }

    /// One [`ChatCompletionsClient`] per configured provider, in order.
    pub fn from_settings(settings: &LlmSettings) -> Result<Self, LlmError> {
        let clients = settings
            .providers
            .iter()
            .map(|p| {
                ChatCompletionsClient::new(p.clone(), settings.timeout, settings.temperature)
                    .map(|c| Arc::new(c) as Arc<dyn LlmClient>)
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(clients))
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    pub async fn invoke(&self, messages: &[Message]) -> Result<String, UpstreamError> {
        let mut attempts = Vec::new();
        for client in &self.clients {
            match client.complete(messages).await {
                Ok(reply) => {
                    tracing::debug!(
                        provider = client.name(),
                        failed_before = attempts.len(),
                        reply_len = reply.len(),
                        "model replied"
                    );
                    return Ok(reply);
                }
                Err(error) => {
                    tracing::warn!(provider = client.name(), error = %error, "model call failed");
                    attempts.push(Attempt {
                        provider: client.name().to_string(),
                        error,
                    });
                }
            }
        }
        Err(UpstreamError { attempts })
    }
}
