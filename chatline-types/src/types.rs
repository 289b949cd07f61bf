//! Core message and request/response types.

use serde::{Deserialize, Serialize};

/// The role of a message participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// A human user.
    User,
    /// An AI assistant.
    Assistant,
}

impl Role {
    /// The wire name of this role (`"user"` or `"assistant"`).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// A message in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// The role of the message author.
    pub role: Role,
    /// The visible text of the message.
    pub content: String,
    /// Reasoning text streamed alongside the answer, kept separate from `content`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
}

impl ChatMessage {
    /// A user message with the given text.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            reasoning: None,
        }
    }

    /// An assistant message with the given text and no reasoning.
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            reasoning: None,
        }
    }

    /// Attach reasoning text. Empty reasoning is stored as `None`.
    #[must_use]
    pub fn with_reasoning(mut self, reasoning: impl Into<String>) -> Self {
        let reasoning = reasoning.into();
        self.reasoning = (!reasoning.is_empty()).then_some(reasoning);
        self
    }
}

/// A chat completion request.
///
/// Fields left at their defaults are filled in from the client configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatRequest {
    /// Model identifier. Empty means "use the client's default model".
    pub model: String,
    /// The conversation so far, oldest first.
    pub messages: Vec<ChatMessage>,
    /// Maximum tokens to generate.
    pub max_tokens: Option<u32>,
    /// Sampling temperature.
    pub temperature: Option<f64>,
}

impl ChatRequest {
    /// A request carrying the given history and default parameters.
    #[must_use]
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            ..Default::default()
        }
    }
}

/// A non-streaming chat completion response.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatResponse {
    /// Completion identifier, when the upstream provides one.
    pub id: Option<String>,
    /// Model that produced the reply, when reported.
    pub model: Option<String>,
    /// The assistant's reply.
    pub message: ChatMessage,
}
