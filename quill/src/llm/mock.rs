//! Scripted [`LlmClient`] for tests and dry runs.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use super::{LlmClient, LlmError};
use crate::message::Message;

/// One scripted outcome.
#[derive(Clone, Debug)]
pub enum MockReply {
    Text(String),
    /// Fails with an HTTP status error carrying this code.
    Status(u16),
    Transport(String),
}

/// Returns scripted replies in order; the last one repeats once the script runs out.
/// Counts calls and records the messages of the latest call.
pub struct MockLlm {
    name: String,
    script: Mutex<VecDeque<MockReply>>,
    last: Mutex<Option<MockReply>>,
    calls: AtomicUsize,
    last_messages: Mutex<Vec<Message>>,
}

impl MockLlm {
    pub fn scripted(name: impl Into<String>, replies: Vec<MockReply>) -> Self {
        Self {
            name: name.into(),
            script: Mutex::new(replies.into()),
            last: Mutex::new(None),
            calls: AtomicUsize::new(0),
            last_messages: Mutex::new(Vec::new()),
        }
    }

    /// Always replies with `text`.
    pub fn replying(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self::scripted(name, vec![MockReply::Text(text.into())])
    }

    /// Always fails with HTTP 503.
    pub fn failing(name: impl Into<String>) -> Self {
        Self::scripted(name, vec![MockReply::Status(503)])
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Messages passed to the most recent call.
    pub fn last_messages(&self) -> Vec<Message> {
        self.last_messages
            .lock()
            .map(|m| m.clone())
            .unwrap_or_default()
    }

    fn next_reply(&self) -> Option<MockReply> {
        let mut script = self.script.lock().ok()?;
        let mut last = self.last.lock().ok()?;
        if let Some(r) = script.pop_front() {
            *last = Some(r);
        }
        last.clone()
    }
}

#[async_trait]
impl LlmClient for MockLlm {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(&self, messages: &[Message]) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut m) = self.last_messages.lock() {
            *m = messages.to_vec();
        }
        match self.next_reply() {
            Some(MockReply::Text(t)) => Ok(t),
            Some(MockReply::Status(status)) => Err(LlmError::Status {
                status,
                body: "mock failure".into(),
            }),
            Some(MockReply::Transport(e)) => Err(LlmError::Transport(e)),
            None => Err(LlmError::MalformedResponse("mock has no scripted reply".into())),
        }
    }
}
