//! Session/history manager — the durable record of a conversation.
//!
//! Owns the profile session identity, the capped message transcript, and
//! the rotated list of recent conversations. Persistence goes through the
//! storage port; a corrupt stored entry is cleared and replaced with empty
//! state rather than failing the page load.

use lexaid_types::{
    event::ClientEvent,
    message::{Message, Role},
    session::{ConversationSummary, HistoryIndex, Session, Transcript},
};
use crate::event_bus::EventBus;
use crate::keys;
use crate::ports::{BackendPort, StoragePort};

/// Shown when a chat send fails; the message is not retried automatically.
const SEND_FAILED_NOTICE: &str =
    "The assistant is unavailable right now. Please try sending your message again in a moment.";

fn generate_session_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

pub struct SessionManager {
    session: Session,
    transcript: Transcript,
    history: HistoryIndex,
    event_bus: EventBus,
}

impl SessionManager {
    /// Restore the persisted session or mint a fresh one.
    ///
    /// A storage failure is tolerated: the id lives in memory for this
    /// page load and regenerates on the next one.
    pub async fn restore_or_create(
        storage: &dyn StoragePort,
        event_bus: EventBus,
        transcript_capacity: usize,
    ) -> Self {
        let session = match Self::load_session(storage).await {
            Some(existing) => existing,
            None => {
                let fresh = Session::new(generate_session_id());
                match serde_json::to_vec(&fresh) {
                    Ok(bytes) => {
                        if let Err(e) = storage.set(keys::SESSION, &bytes).await {
                            log::warn!("Could not persist session id: {}", e);
                        }
                    }
                    Err(e) => log::warn!("Could not serialize session: {}", e),
                }
                fresh
            }
        };

        let transcript = Self::load_transcript(storage, &session.id, transcript_capacity).await;
        let history = Self::load_history(storage).await;

        log::info!(
            "Session {} restored ({} messages, {} conversations)",
            session.id,
            transcript.len(),
            history.len()
        );

        Self {
            session,
            transcript,
            history,
            event_bus,
        }
    }

    async fn load_session(storage: &dyn StoragePort) -> Option<Session> {
        match storage.get(keys::SESSION).await {
            Ok(Some(bytes)) => match serde_json::from_slice::<Session>(&bytes) {
                Ok(session) => Some(session),
                Err(e) => {
                    log::warn!("Corrupt session entry, resetting: {}", e);
                    let _ = storage.delete(keys::SESSION).await;
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                log::warn!("Storage unavailable while loading session: {}", e);
                None
            }
        }
    }

    /// Load the transcript for a session. Corrupt JSON clears the key and
    /// yields an empty transcript; this never fails the caller.
    pub async fn load_transcript(
        storage: &dyn StoragePort,
        session_id: &str,
        capacity: usize,
    ) -> Transcript {
        let key = keys::transcript(session_id);
        match storage.get(&key).await {
            Ok(Some(bytes)) => match serde_json::from_slice::<Transcript>(&bytes) {
                Ok(stored) => stored.with_capacity(capacity),
                Err(e) => {
                    log::warn!("Corrupt transcript for {}, resetting: {}", session_id, e);
                    let _ = storage.delete(&key).await;
                    Transcript::new(capacity)
                }
            },
            Ok(None) => Transcript::new(capacity),
            Err(e) => {
                log::warn!("Storage unavailable while loading transcript: {}", e);
                Transcript::new(capacity)
            }
        }
    }

    async fn load_history(storage: &dyn StoragePort) -> HistoryIndex {
        match storage.get(keys::HISTORY_INDEX).await {
            Ok(Some(bytes)) => match serde_json::from_slice::<HistoryIndex>(&bytes) {
                Ok(index) => index,
                Err(e) => {
                    log::warn!("Corrupt history index, resetting: {}", e);
                    let _ = storage.delete(keys::HISTORY_INDEX).await;
                    HistoryIndex::new()
                }
            },
            _ => HistoryIndex::new(),
        }
    }

    /// Append a message with a synthesized timestamp, persist, and let the
    /// UI re-render. No deduplication.
    pub async fn add_message(
        &mut self,
        storage: &dyn StoragePort,
        role: Role,
        content: impl Into<String>,
    ) {
        let message = match role {
            Role::User => Message::user(content),
            Role::Assistant => Message::assistant(content),
            Role::System => Message::system(content),
        };
        self.transcript.push(message);
        self.persist(storage).await;
    }

    /// Write the transcript and the rotated history index back to storage.
    pub async fn persist(&mut self, storage: &dyn StoragePort) {
        match serde_json::to_vec(&self.transcript) {
            Ok(bytes) => {
                let key = keys::transcript(&self.session.id);
                if let Err(e) = storage.set(&key, &bytes).await {
                    log::warn!("Could not persist transcript: {}", e);
                }
            }
            Err(e) => log::warn!("Could not serialize transcript: {}", e),
        }

        self.history.touch(ConversationSummary {
            session_id: self.session.id.clone(),
            title: self.title(),
            updated_at: chrono::Utc::now().to_rfc3339(),
            message_count: self.transcript.len(),
        });
        match serde_json::to_vec(&self.history) {
            Ok(bytes) => {
                if let Err(e) = storage.set(keys::HISTORY_INDEX, &bytes).await {
                    log::warn!("Could not persist history index: {}", e);
                }
            }
            Err(e) => log::warn!("Could not serialize history index: {}", e),
        }
    }

    /// Send one chat message: append locally, one backend round trip, then
    /// append the reply. A failed send surfaces a generic notice and is not
    /// retried; the error propagates so the caller can flip the
    /// reachability flag.
    pub async fn send_chat(
        &mut self,
        api: &dyn BackendPort,
        storage: &dyn StoragePort,
        text: &str,
    ) -> lexaid_types::Result<()> {
        self.add_message(storage, Role::User, text).await;

        match api.send_chat(&self.session.id, text).await {
            Ok(reply) => {
                log::debug!("Chat reply via {}", reply.response_type);
                self.add_message(storage, Role::Assistant, &reply.content).await;
                let timestamp = self
                    .transcript
                    .last()
                    .map(|m| m.timestamp.clone())
                    .unwrap_or_default();
                self.event_bus.emit(ClientEvent::ChatReply {
                    content: reply.content,
                    timestamp,
                });
                Ok(())
            }
            Err(e) => {
                log::warn!("Chat send failed: {}", e);
                self.event_bus.emit(ClientEvent::ChatFailed {
                    message: SEND_FAILED_NOTICE.to_string(),
                });
                Err(e)
            }
        }
    }

    /// Record a chat message that arrived over the push stream.
    pub async fn add_pushed_message(&mut self, storage: &dyn StoragePort, content: &str) {
        self.add_message(storage, Role::Assistant, content).await;
    }

    /// Fetch the server-side message log for this session.
    pub async fn fetch_remote_history(&self, api: &dyn BackendPort) -> Vec<Message> {
        match api.fetch_history(&self.session.id).await {
            Ok(messages) => messages,
            Err(e) => {
                log::warn!("Could not fetch remote history: {}", e);
                Vec::new()
            }
        }
    }

    /// When local storage held no messages (fresh profile or a cleared
    /// key), seed the transcript from the server-side log instead.
    pub async fn sync_remote_history(&mut self, api: &dyn BackendPort, storage: &dyn StoragePort) {
        if !self.transcript.is_empty() {
            return;
        }
        let remote = self.fetch_remote_history(api).await;
        if remote.is_empty() {
            return;
        }
        for message in remote {
            self.transcript.push(message);
        }
        self.persist(storage).await;
    }

    /// Fetch the conversation summary the backend keeps for this session.
    pub async fn fetch_summary(&self, api: &dyn BackendPort) -> Option<String> {
        match api.fetch_summary(&self.session.id).await {
            Ok(summary) => Some(summary),
            Err(e) => {
                log::warn!("Could not fetch conversation summary: {}", e);
                None
            }
        }
    }

    /// Conversation title for the history list: the first user message,
    /// truncated.
    fn title(&self) -> String {
        const TITLE_LEN: usize = 40;
        self.transcript
            .iter()
            .find(|m| m.role == Role::User)
            .map(|m| {
                let mut title: String = m.content.chars().take(TITLE_LEN).collect();
                if m.content.chars().count() > TITLE_LEN {
                    title.push('…');
                }
                title
            })
            .unwrap_or_else(|| "New conversation".to_string())
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn history(&self) -> &HistoryIndex {
        &self.history
    }
}
