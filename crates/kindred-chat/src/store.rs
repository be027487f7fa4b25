//! Append-only conversation history.

use kindred_core::types::Message;

use crate::error::ChatError;

/// Ordered, append-only message history for one conversation.
///
/// Insertion order is conversation order. Nothing is ever removed or
/// reordered; the reply engine only reads a bounded trailing window.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversationStore {
    messages: Vec<Message>,
}

impl ConversationStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store holding a single companion greeting.
    pub fn seeded(greeting: &str) -> Self {
        Self {
            messages: vec![Message::companion(greeting)],
        }
    }

    /// Wrap an already ordered sequence of messages.
    pub fn from_messages(messages: Vec<Message>) -> Self {
        Self { messages }
    }

    /// Add a message to the end of the history.
    ///
    /// User messages must carry non-blank content; companion messages are
    /// taken as-is.
    pub fn append(&mut self, message: Message) -> Result<(), ChatError> {
        if message.is_from_user() && message.content().trim().is_empty() {
            return Err(ChatError::EmptyMessage);
        }
        self.messages.push(message);
        Ok(())
    }

    /// The last `n` messages (or all of them when fewer), oldest first.
    pub fn recent_window(&self, n: usize) -> &[Message] {
        trailing_window(&self.messages, n)
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn into_messages(self) -> Vec<Message> {
        self.messages
    }
}

/// The last `n` entries of `messages`, oldest first.
///
/// Shared by [`ConversationStore::recent_window`] and the reply engine's
/// context scan so both read the same window.
pub fn trailing_window(messages: &[Message], n: usize) -> &[Message] {
    let start = messages.len().saturating_sub(n);
    &messages[start..]
}

// =============================================================================
// Tests
// =============================================================================
