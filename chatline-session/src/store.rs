//! In-memory conversation store.

use chrono::{DateTime, Utc};

use chatline_types::{ChatMessage, StoreError};

/// Title shown for a conversation with no messages.
pub const UNTITLED: &str = "New Chat";

/// Characters of the first message used in a title.
const TITLE_CHARS: usize = 30;

/// A conversation and its messages, oldest first.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversation {
    /// Unique identifier, e.g. `chat_20250101_120000`.
    pub id: String,
    /// The conversation messages.
    pub messages: Vec<ChatMessage>,
    /// When the conversation was created.
    pub created_at: DateTime<Utc>,
    /// When a message was last appended.
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    /// An empty conversation created at `now`.
    #[must_use]
    pub fn new(id: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Sidebar title: the start of the first message, or [`UNTITLED`].
    #[must_use]
    pub fn title(&self) -> String {
        match self.messages.first() {
            None => UNTITLED.to_string(),
            Some(first) => {
                let mut title: String = first.content.chars().take(TITLE_CHARS).collect();
                title.push_str("...");
                title
            }
        }
    }

    /// Append a message.
    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
        self.updated_at = Utc::now();
    }

    /// Create a summary of this conversation (without messages).
    #[must_use]
    pub fn summary(&self) -> ConversationSummary {
        ConversationSummary {
            id: self.id.clone(),
            title: self.title(),
            created_at: self.created_at,
            updated_at: self.updated_at,
            message_count: self.messages.len(),
        }
    }
}

/// A lightweight summary of a conversation (without messages).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationSummary {
    /// Conversation identifier.
    pub id: String,
    /// Sidebar title.
    pub title: String,
    /// When the conversation was created.
    pub created_at: DateTime<Utc>,
    /// When a message was last appended.
    pub updated_at: DateTime<Utc>,
    /// Number of messages.
    pub message_count: usize,
}

/// Conversations keyed by id, in creation order, plus the current selection.
///
/// The store is a plain owned value. Whoever drives a turn borrows it
/// mutably for that turn; nothing is shared implicitly.
#[derive(Debug, Clone, Default)]
pub struct ConversationStore {
    conversations: Vec<Conversation>,
    current: Option<String>,
}

impl ConversationStore {
    /// An empty store with nothing selected.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new, empty conversation and make it current. Returns its id.
    pub fn create(&mut self) -> String {
        self.create_at(Utc::now())
    }

    /// Like [`create`](Self::create) with an explicit timestamp.
    ///
    /// Ids derive from the timestamp; a clash within the same second gets a
    /// numeric suffix.
    pub fn create_at(&mut self, now: DateTime<Utc>) -> String {
        let base = now.format("chat_%Y%m%d_%H%M%S").to_string();
        let mut id = base.clone();
        let mut n = 2;
        while self.position(&id).is_some() {
            id = format!("{base}_{n}");
            n += 1;
        }

        tracing::debug!(conversation = %id, "created conversation");
        self.conversations.push(Conversation::new(id.clone(), now));
        self.current = Some(id.clone());
        id
    }

    /// Make `id` the current conversation.
    pub fn select(&mut self, id: &str) -> Result<(), StoreError> {
        self.get(id)?;
        self.current = Some(id.to_string());
        Ok(())
    }

    /// Id of the current conversation, if any.
    #[must_use]
    pub fn current_id(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// The current conversation, if any.
    #[must_use]
    pub fn current(&self) -> Option<&Conversation> {
        self.current_id().and_then(|id| self.get(id).ok())
    }

    /// Look up a conversation.
    pub fn get(&self, id: &str) -> Result<&Conversation, StoreError> {
        self.position(id)
            .map(|i| &self.conversations[i])
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    /// Look up a conversation for modification.
    pub fn get_mut(&mut self, id: &str) -> Result<&mut Conversation, StoreError> {
        match self.position(id) {
            Some(i) => Ok(&mut self.conversations[i]),
            None => Err(StoreError::NotFound(id.to_string())),
        }
    }

    /// Remove a conversation. Clears the selection if it was current.
    pub fn remove(&mut self, id: &str) -> Result<Conversation, StoreError> {
        let i = self
            .position(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        if self.current.as_deref() == Some(id) {
            self.current = None;
        }
        Ok(self.conversations.remove(i))
    }

    /// Summaries of every conversation, in creation order.
    #[must_use]
    pub fn list(&self) -> Vec<ConversationSummary> {
        self.conversations.iter().map(Conversation::summary).collect()
    }

    /// Number of conversations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.conversations.len()
    }

    /// Whether the store holds no conversations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.conversations.is_empty()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.conversations.iter().position(|c| c.id == id)
    }
}
