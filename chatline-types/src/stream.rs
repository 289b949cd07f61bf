//! Streaming types for incremental chat responses.

use std::fmt;
use std::pin::Pin;

use futures::Stream;

use crate::types::{ChatMessage, Role};

/// Which accumulated field a [`Fragment`] extends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FragmentField {
    /// The visible answer (`delta.content`).
    Content,
    /// The reasoning trace (`delta.reasoning_content`).
    Reasoning,
}

/// One incremental piece of a streamed response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    /// The field that grew.
    pub field: FragmentField,
    /// The appended text.
    pub delta: String,
}

impl Fragment {
    /// A content fragment.
    #[must_use]
    pub fn content(delta: impl Into<String>) -> Self {
        Self {
            field: FragmentField::Content,
            delta: delta.into(),
        }
    }

    /// A reasoning fragment.
    #[must_use]
    pub fn reasoning(delta: impl Into<String>) -> Self {
        Self {
            field: FragmentField::Reasoning,
            delta: delta.into(),
        }
    }
}

/// The two text fields built up over one stream.
///
/// Both fields only ever grow by appending, in arrival order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccumulatedResponse {
    /// Concatenated `content` deltas.
    pub primary: String,
    /// Concatenated `reasoning_content` deltas.
    pub secondary: String,
}

impl AccumulatedResponse {
    /// Append a fragment to the field it names.
    pub fn apply(&mut self, fragment: &Fragment) {
        match fragment.field {
            FragmentField::Content => self.primary.push_str(&fragment.delta),
            FragmentField::Reasoning => self.secondary.push_str(&fragment.delta),
        }
    }

    /// Whether nothing has been accumulated yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.primary.is_empty() && self.secondary.is_empty()
    }

    /// Derive the assistant message for this response.
    ///
    /// Pure: calling it twice on the same accumulator yields equal messages.
    #[must_use]
    pub fn to_message(&self) -> ChatMessage {
        ChatMessage {
            role: Role::Assistant,
            content: self.primary.clone(),
            reasoning: (!self.secondary.is_empty()).then(|| self.secondary.clone()),
        }
    }
}

/// How a stream reached its terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// A `data: [DONE]` line was seen.
    Sentinel,
    /// The line source ran out without a sentinel.
    EndOfInput,
}

/// A content problem the assembler recovered from.
///
/// `line` is the 1-based index of the offending line in the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamIssue {
    /// A `data:` payload that is not valid JSON. The line was skipped.
    MalformedEvent {
        /// Line number.
        line: usize,
        /// Parser message.
        reason: String,
    },
    /// Valid JSON without `choices[0].delta`. Treated as an empty delta.
    MissingField {
        /// Line number.
        line: usize,
        /// The path that was missing.
        field: &'static str,
    },
    /// An `{"error": ...}` object delivered inside the stream.
    ErrorPayload {
        /// Line number.
        line: usize,
        /// The upstream message.
        message: String,
    },
}

impl fmt::Display for StreamIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedEvent { line, reason } => {
                write!(f, "line {line}: malformed event: {reason}")
            }
            Self::MissingField { line, field } => write!(f, "line {line}: missing {field}"),
            Self::ErrorPayload { line, message } => {
                write!(f, "line {line}: upstream error: {message}")
            }
        }
    }
}

/// The terminal result of assembling one stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assembled {
    /// The accumulated text. Authoritative once the stream has ended.
    pub response: AccumulatedResponse,
    /// How the stream ended.
    pub termination: Termination,
    /// Recovered problems, in input order.
    pub issues: Vec<StreamIssue>,
}

impl Assembled {
    /// Whether the input ended without a `[DONE]` sentinel.
    ///
    /// The response is still usable; it may just be incomplete.
    #[must_use]
    pub fn terminated_early(&self) -> bool {
        self.termination == Termination::EndOfInput
    }

    /// Derive the assistant message for this result.
    #[must_use]
    pub fn to_message(&self) -> ChatMessage {
        self.response.to_message()
    }
}

/// An event emitted by a streaming completion.
#[derive(Debug, Clone)]
pub enum StreamEvent {
    /// One content or reasoning delta.
    Fragment(Fragment),
    /// The transport failed after the response had started.
    ///
    /// Always followed by [`StreamEvent::Complete`] carrying the partial result.
    Error(String),
    /// The stream has ended. Always the last event.
    Complete(Assembled),
}

/// Handle to a streaming completion response.
///
/// Owns the underlying response body; dropping the handle releases the
/// connection.
pub struct StreamHandle {
    /// The stream of events. Consume with `StreamExt::next()`.
    pub receiver: Pin<Box<dyn Stream<Item = StreamEvent> + Send>>,
}

impl fmt::Debug for StreamHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamHandle").finish_non_exhaustive()
    }
}
