//! Role-tagged chat messages sent to the model.

use serde::Serialize;

/// One chat message. Only the two roles the pipeline sends are modelled.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Message {
    System(String),
    User(String),
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Message::System(content.into())
    }

    pub fn user(content: impl Into<String>) -> Self {
        Message::User(content.into())
    }

    /// Wire role name (`"system"` / `"user"`).
    pub fn role(&self) -> &'static str {
        match self {
            Message::System(_) => "system",
            Message::User(_) => "user",
        }
    }

    pub fn content(&self) -> &str {
        match self {
            Message::System(s) | Message::User(s) => s,
        }
    }
}

/// Chat-completions wire shape of a [`Message`].
#[derive(Debug, Serialize)]
pub struct ChatMessage<'a> {
    pub role: &'static str,
    pub content: &'a str,
}

impl<'a> From<&'a Message> for ChatMessage<'a> {
    fn from(m: &'a Message) -> Self {
        ChatMessage {
            role: m.role(),
            content: m.content(),
        }
    }
}
