use serde::{Deserialize, Serialize};

/// Role in a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A single message in a conversation.
/// Append-only: once constructed, a message is never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    /// RFC 3339 timestamp, synthesized at creation time
    pub timestamp: String,
}

impl Message {
    pub fn system(text: impl Into<String>) -> Self {
        Self::stamped(Role::System, text)
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::stamped(Role::User, text)
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::stamped(Role::Assistant, text)
    }

    /// Rebuild a message from persisted parts, keeping the stored timestamp.
    pub fn restored(role: Role, content: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: timestamp.into(),
        }
    }

    fn stamped(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            content: text.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
