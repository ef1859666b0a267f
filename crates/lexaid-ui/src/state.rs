//! UI-level state that drives rendering.
//!
//! A typed view-model: panels bind to named fields here and never reach
//! into the document or hold singletons. Controllers publish to the event
//! bus; the app drains it each frame into this state.

use std::collections::BTreeMap;

use lexaid_core::forms::BusyFlag;
use lexaid_types::{
    api::{
        builtin_templates, Appointment, DaySlots, DocumentAnalysis, DocumentTemplate, FaqEntry,
        GeneratedDocument, Lawyer, NewsItem,
    },
    event::{ClientEvent, ConnectionState},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Chat,
    Documents,
    Lawyers,
    News,
    Faq,
}

impl Tab {
    pub fn all() -> &'static [Tab] {
        &[Tab::Chat, Tab::Documents, Tab::Lawyers, Tab::News, Tab::Faq]
    }

    pub fn label(&self) -> &str {
        match self {
            Tab::Chat => "Chat",
            Tab::Documents => "Documents",
            Tab::Lawyers => "Find a Lawyer",
            Tab::News => "Legal News",
            Tab::Faq => "FAQ",
        }
    }
}

/// A chat entry for display
#[derive(Clone)]
pub struct ChatEntry {
    pub role: String,
    pub content: String,
    pub timestamp: String,
}

#[derive(Default)]
pub struct ChatView {
    pub entries: Vec<ChatEntry>,
    pub input_text: String,
    pub busy: BusyFlag,
    /// Inline banner after a failed send
    pub notice: Option<String>,
}

pub struct DocumentView {
    pub analyze_text: String,
    pub analyze_type: String,
    pub analysis: Option<DocumentAnalysis>,
    pub templates: Vec<DocumentTemplate>,
    pub selected_template: usize,
    pub field_values: BTreeMap<String, String>,
    pub generated: Option<GeneratedDocument>,
    pub monitor_id: String,
    pub monitor_confirmation: Option<String>,
    pub update_notes: Vec<String>,
    pub busy: BusyFlag,
    pub error: Option<String>,
}

impl Default for DocumentView {
    fn default() -> Self {
        Self {
            analyze_text: String::new(),
            analyze_type: "general".to_string(),
            analysis: None,
            templates: builtin_templates(),
            selected_template: 0,
            field_values: BTreeMap::new(),
            generated: None,
            monitor_id: String::new(),
            monitor_confirmation: None,
            update_notes: Vec::new(),
            busy: BusyFlag::new(),
            error: None,
        }
    }
}

impl DocumentView {
    pub fn selected_template(&self) -> Option<&DocumentTemplate> {
        self.templates.get(self.selected_template)
    }

    /// Switching templates starts from a blank form.
    pub fn select_template(&mut self, index: usize) {
        if index != self.selected_template {
            self.selected_template = index;
            self.field_values.clear();
            self.generated = None;
            self.error = None;
        }
    }
}

#[derive(Default)]
pub struct LawyerView {
    pub issue: String,
    pub jurisdiction: String,
    pub results: Vec<Lawyer>,
    pub selected_lawyer: Option<String>,
    pub slots: Vec<DaySlots>,
    pub booking_date: String,
    pub booking_time: String,
    pub booking_issue: String,
    pub confirmation: Option<Appointment>,
    pub busy: BusyFlag,
    pub error: Option<String>,
}

#[derive(Default)]
pub struct NewsView {
    pub items: Vec<NewsItem>,
    pub page: u32,
    pub total_pages: u32,
    pub subscribed_areas: String,
    pub subscription_confirmed: bool,
    pub busy: BusyFlag,
    pub error: Option<String>,
}

#[derive(Default)]
pub struct FaqView {
    pub query: String,
    pub results: Vec<FaqEntry>,
    pub categories: Vec<String>,
    pub selected_category: Option<String>,
    pub recent_searches: Vec<String>,
    pub busy: BusyFlag,
    pub error: Option<String>,
}

/// State visible to UI panels
pub struct UiState {
    pub active_tab: Tab,
    pub chat: ChatView,
    pub documents: DocumentView,
    pub lawyers: LawyerView,
    pub news: NewsView,
    pub faq: FaqView,
    /// Backend health flag
    pub reachable: bool,
    pub stream_state: ConnectionState,
    pub status_text: String,
    pub show_settings: bool,
}

impl UiState {
    pub fn new() -> Self {
        Self {
            active_tab: Tab::Chat,
            chat: ChatView::default(),
            documents: DocumentView::default(),
            lawyers: LawyerView::default(),
            news: NewsView::default(),
            faq: FaqView::default(),
            reachable: false,
            stream_state: ConnectionState::Closed,
            status_text: "Connecting…".to_string(),
            show_settings: false,
        }
    }

    /// Process events from the bus and update view state
    pub fn process_events(&mut self, events: Vec<ClientEvent>) {
        for event in events {
            match event {
                ClientEvent::ChatReply { content, timestamp } => {
                    self.chat.entries.push(ChatEntry {
                        role: "assistant".to_string(),
                        content,
                        timestamp,
                    });
                    self.chat.notice = None;
                }
                ClientEvent::ChatFailed { message } => {
                    self.chat.notice = Some(message);
                }
                ClientEvent::ChatPushed { content, timestamp } => {
                    self.chat.entries.push(ChatEntry {
                        role: "assistant".to_string(),
                        content,
                        timestamp,
                    });
                }
                ClientEvent::NewsArrived { item } => {
                    self.news.items.insert(0, item);
                }
                ClientEvent::ReachabilityChanged { reachable } => {
                    self.reachable = reachable;
                    self.status_text = if reachable {
                        "Online".to_string()
                    } else {
                        "Backend unreachable".to_string()
                    };
                }
                ClientEvent::StreamState { state } => {
                    self.stream_state = state;
                }
                ClientEvent::Error { message } => {
                    self.status_text = message;
                }
            }
        }
    }

    /// Echo a user message into the chat view before the round trip.
    pub fn push_user_message(&mut self, text: &str) {
        self.chat.entries.push(ChatEntry {
            role: "user".to_string(),
            content: text.to_string(),
            timestamp: String::new(),
        });
    }

    /// Seed the chat view from a restored transcript.
    pub fn load_transcript(&mut self, transcript: &lexaid_types::session::Transcript) {
        self.chat.entries = transcript
            .iter()
            .map(|m| ChatEntry {
                role: match m.role {
                    lexaid_types::message::Role::User => "user",
                    lexaid_types::message::Role::Assistant => "assistant",
                    lexaid_types::message::Role::System => "system",
                }
                .to_string(),
                content: m.content.clone(),
                timestamp: m.timestamp.clone(),
            })
            .collect();
    }

    pub fn stream_label(&self) -> &str {
        match self.stream_state {
            ConnectionState::Connecting => "connecting",
            ConnectionState::Open => "live",
            ConnectionState::Closed => "offline",
            ConnectionState::ReconnectScheduled => "reconnecting",
        }
    }
}

impl Default for UiState {
    fn default() -> Self {
        Self::new()
    }
}
