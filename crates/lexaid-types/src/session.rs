use std::collections::VecDeque;
use serde::{Deserialize, Serialize};
use crate::message::Message;

/// A browser-profile-scoped session identity.
/// Created once, persisted, never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub created_at: String,
}

impl Session {
    pub fn new(id: String) -> Self {
        Self {
            id,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Default cap on the raw message log of one session.
pub const DEFAULT_TRANSCRIPT_CAPACITY: usize = 200;

fn default_capacity() -> usize {
    DEFAULT_TRANSCRIPT_CAPACITY
}

/// Ordered log of exchanged messages for one conversation.
///
/// Bounded: pushing past capacity evicts the oldest message. Insertion
/// order is the only ordering; messages are immutable once appended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    messages: VecDeque<Message>,
    #[serde(skip, default = "default_capacity")]
    capacity: usize,
}

impl Transcript {
    pub fn new(capacity: usize) -> Self {
        Self {
            messages: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    /// Append a message, evicting the oldest one when full.
    /// Returns the evicted message, if any.
    pub fn push(&mut self, message: Message) -> Option<Message> {
        let evicted = if self.messages.len() >= self.capacity {
            self.messages.pop_front()
        } else {
            None
        };
        self.messages.push_back(message);
        evicted
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.back()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Re-apply a configured capacity after deserialization, evicting
    /// oldest messages if the stored log exceeds it.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity.max(1);
        while self.messages.len() > self.capacity {
            self.messages.pop_front();
        }
        self
    }
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new(DEFAULT_TRANSCRIPT_CAPACITY)
    }
}

/// Summary of a conversation for the history list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationSummary {
    pub session_id: String,
    pub title: String,
    pub updated_at: String,
    pub message_count: usize,
}

/// How many conversation summaries the history list keeps.
pub const MAX_CONVERSATIONS: usize = 20;

/// Per-profile list of recent conversations, rotated to the most
/// recently updated [`MAX_CONVERSATIONS`] entries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistoryIndex {
    entries: Vec<ConversationSummary>,
}

impl HistoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record activity on a conversation: moves (or inserts) its summary
    /// at the front and drops anything past the rotation cap.
    pub fn touch(&mut self, summary: ConversationSummary) {
        self.entries.retain(|e| e.session_id != summary.session_id);
        self.entries.insert(0, summary);
        self.entries.truncate(MAX_CONVERSATIONS);
    }

    pub fn entries(&self) -> &[ConversationSummary] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
