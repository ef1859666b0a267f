//! Port traits — the hexagonal architecture boundary.
//!
//! These traits are defined here in `lexaid-core` (pure Rust).
//! Implementations live in `lexaid-platform` (browser adapters).
//! The core never imports platform code; it only depends on these traits.

use std::collections::BTreeMap;
use async_trait::async_trait;
use lexaid_types::{
    Result,
    api::{
        Appointment, DaySlots, DocumentAnalysis, DocumentTemplate, FaqEntry, GeneratedDocument,
        Lawyer, NewsPage,
    },
    config::NewsSubscription,
    message::Message,
};

// ─── Backend Port ────────────────────────────────────────────

/// Reply to a chat send
#[derive(Debug, Clone)]
pub struct ChatReply {
    pub content: String,
    /// Backend processing mode, e.g. "vertex_ai" or "error_fallback"
    pub response_type: String,
}

#[derive(Debug, Clone)]
pub struct AnalyzeRequest {
    pub document_text: String,
    pub document_type: String,
    pub redact_pii: bool,
}

/// Body for `/api/document/generate`: the template key plus parameter
/// values keyed by field id.
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub template_key: String,
    pub parameters: BTreeMap<String, String>,
    pub jurisdiction: Option<String>,
}

#[derive(Debug, Clone)]
pub struct MonitorRequest {
    pub document_id: String,
    pub document_text: String,
    pub document_type: String,
    pub legal_areas: Vec<String>,
    pub jurisdiction: String,
}

#[derive(Debug, Clone)]
pub struct MatchRequest {
    pub legal_issue: String,
    pub jurisdiction: Option<String>,
    pub language: Option<String>,
}

#[derive(Debug, Clone)]
pub struct BookingRequest {
    pub lawyer_id: String,
    pub date: String,
    pub time: String,
    pub issue_description: String,
}

/// Everything the client asks of the REST backend.
/// One method per endpoint; each is a single request/response round trip.
#[async_trait(?Send)]
pub trait BackendPort {
    /// `GET /api/health` — Ok(()) when the backend answered
    async fn health(&self) -> Result<()>;

    async fn send_chat(&self, session_id: &str, message: &str) -> Result<ChatReply>;
    async fn fetch_history(&self, session_id: &str) -> Result<Vec<Message>>;
    async fn fetch_summary(&self, session_id: &str) -> Result<String>;

    async fn analyze_document(&self, req: AnalyzeRequest) -> Result<DocumentAnalysis>;
    async fn generate_document(&self, req: GenerateRequest) -> Result<GeneratedDocument>;
    async fn monitor_document(&self, req: MonitorRequest) -> Result<String>;
    async fn check_document_updates(&self, document_id: &str) -> Result<Vec<String>>;
    async fn fetch_templates(&self) -> Result<Vec<DocumentTemplate>>;

    async fn match_lawyers(&self, req: MatchRequest) -> Result<Vec<Lawyer>>;
    async fn fetch_slots(&self, lawyer_id: &str, days: u32) -> Result<Vec<DaySlots>>;
    async fn book_appointment(&self, req: BookingRequest) -> Result<Appointment>;
    async fn cancel_appointment(&self, appointment_id: &str) -> Result<()>;

    async fn fetch_news(&self, page: u32, category: Option<&str>) -> Result<NewsPage>;
    async fn subscribe_news(&self, sub: &NewsSubscription) -> Result<String>;

    async fn search_faq(&self, query: &str, category: Option<&str>) -> Result<Vec<FaqEntry>>;
    async fn fetch_faq_categories(&self) -> Result<Vec<String>>;
    async fn send_faq_feedback(&self, faq_id: &str, helpful: bool) -> Result<()>;
}

// ─── Storage Port ────────────────────────────────────────────

#[async_trait(?Send)]
pub trait StoragePort {
    /// Get a value by key
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Set a value
    async fn set(&self, key: &str, value: &[u8]) -> Result<()>;

    /// Delete a value
    async fn delete(&self, key: &str) -> Result<()>;

    /// List keys with a given prefix
    async fn list_keys(&self, prefix: &str) -> Result<Vec<String>>;

    /// Check if a key exists
    async fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.get(key).await?.is_some())
    }

    /// Name of this backend (for logging/debug)
    fn backend_name(&self) -> &str;
}

// ─── Notification Port ───────────────────────────────────────

/// Native notifications. Best-effort: implementations never block or
/// fail the caller.
pub trait NotifyPort {
    /// Whether the user has already granted notification permission
    fn permission_granted(&self) -> bool;

    fn notify(&self, title: &str, body: &str);
}
