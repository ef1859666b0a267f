use serde::{Deserialize, Serialize};
use crate::api::NewsItem;

/// Lifecycle of one stream-client connection attempt.
/// Rebuilt from scratch on every page load, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConnectionState {
    Connecting,
    Open,
    Closed,
    ReconnectScheduled,
}

/// One JSON-encoded push message delivered over the socket.
/// The wire shape is `{ "type": ..., ...payload }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamFrame {
    ChatMessage {
        session_id: String,
        content: String,
        timestamp: String,
    },
    NewsUpdate {
        item: NewsItem,
    },
}

/// Events emitted by the core controllers.
/// The UI drains these each frame for reactive updates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ClientEvent {
    /// The backend answered a chat send
    ChatReply { content: String, timestamp: String },

    /// A chat send failed; the message was not retried
    ChatFailed { message: String },

    /// A chat message arrived over the push stream
    ChatPushed { content: String, timestamp: String },

    /// A news item arrived over the push stream
    NewsArrived { item: NewsItem },

    /// The backend health flag changed
    ReachabilityChanged { reachable: bool },

    /// The stream client moved to a new connection state
    StreamState { state: ConnectionState },

    /// A non-fatal error to surface in the UI
    Error { message: String },
}
