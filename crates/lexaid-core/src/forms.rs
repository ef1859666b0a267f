//! Form/action controllers.
//!
//! Each operation is a stateless request/response cycle: validate the
//! required fields locally (no network call on failure), then issue
//! exactly one request. No retries, no queuing, no idempotency keys.
//! The in-flight toggle is a scoped guard cleared on every exit path.

use std::cell::Cell;
use std::collections::BTreeMap;
use std::rc::Rc;

use lexaid_types::{
    ClientError, Result,
    api::{
        Appointment, DaySlots, DocumentAnalysis, DocumentTemplate, FaqEntry, GeneratedDocument,
        Lawyer, NewsPage,
    },
    config::NewsSubscription,
};
use crate::keys;
use crate::ports::{
    AnalyzeRequest, BackendPort, BookingRequest, GenerateRequest, MatchRequest, MonitorRequest,
    StoragePort,
};

/// How many recent FAQ searches / feedback entries are kept.
const FAQ_HISTORY_LIMIT: usize = 20;

// ─── Busy flag ───────────────────────────────────────────────

/// Loading state of one submitting control. The UI disables the control
/// while the flag is held; the guard clears it on success and failure
/// alike.
#[derive(Clone, Default)]
pub struct BusyFlag(Rc<Cell<bool>>);

impl BusyFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        self.0.get()
    }

    /// Acquire the flag for the duration of one request.
    pub fn acquire(&self) -> BusyGuard {
        self.0.set(true);
        BusyGuard(self.0.clone())
    }
}

pub struct BusyGuard(Rc<Cell<bool>>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

// ─── Validation ──────────────────────────────────────────────

/// Reject empty or whitespace-only required fields before any network call.
pub fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ClientError::Validation {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Check every required template parameter, in declaration order.
pub fn validate_template_form(
    template: &DocumentTemplate,
    values: &BTreeMap<String, String>,
) -> Result<()> {
    for param in template.required_params() {
        match values.get(&param.name) {
            Some(v) if !v.trim().is_empty() => {}
            _ => {
                return Err(ClientError::Validation {
                    field: param.name.clone(),
                })
            }
        }
    }
    Ok(())
}

// ─── Document forms ──────────────────────────────────────────

pub async fn analyze_document(
    api: &dyn BackendPort,
    document_text: &str,
    document_type: &str,
    redact_pii: bool,
) -> Result<DocumentAnalysis> {
    require("document_text", document_text)?;
    api.analyze_document(AnalyzeRequest {
        document_text: document_text.to_string(),
        document_type: if document_type.trim().is_empty() {
            "general".to_string()
        } else {
            document_type.to_string()
        },
        redact_pii,
    })
    .await
}

/// Submit a generation form. The request body carries the template key
/// and the parameter values keyed by field id; blank optional fields are
/// left out.
pub async fn generate_document(
    api: &dyn BackendPort,
    template: &DocumentTemplate,
    values: &BTreeMap<String, String>,
    jurisdiction: Option<String>,
) -> Result<GeneratedDocument> {
    validate_template_form(template, values)?;

    let parameters: BTreeMap<String, String> = values
        .iter()
        .filter(|(_, v)| !v.trim().is_empty())
        .map(|(k, v)| (k.clone(), v.trim().to_string()))
        .collect();

    api.generate_document(GenerateRequest {
        template_key: template.key.clone(),
        parameters,
        jurisdiction,
    })
    .await
}

pub async fn monitor_document(
    api: &dyn BackendPort,
    document_id: &str,
    document_text: &str,
    document_type: &str,
    legal_areas: Vec<String>,
    jurisdiction: &str,
) -> Result<String> {
    require("document_id", document_id)?;
    require("document_text", document_text)?;
    require("document_type", document_type)?;
    api.monitor_document(MonitorRequest {
        document_id: document_id.to_string(),
        document_text: document_text.to_string(),
        document_type: document_type.to_string(),
        legal_areas,
        jurisdiction: jurisdiction.to_string(),
    })
    .await
}

pub async fn check_document_updates(
    api: &dyn BackendPort,
    document_id: &str,
) -> Result<Vec<String>> {
    require("document_id", document_id)?;
    api.check_document_updates(document_id).await
}

/// Refresh the template list from the backend, keeping the built-in set
/// when the request fails.
pub async fn refresh_templates(api: &dyn BackendPort) -> Vec<DocumentTemplate> {
    match api.fetch_templates().await {
        Ok(templates) if !templates.is_empty() => templates,
        Ok(_) => lexaid_types::api::builtin_templates(),
        Err(e) => {
            log::warn!("Could not fetch templates, using built-ins: {}", e);
            lexaid_types::api::builtin_templates()
        }
    }
}

// ─── Lawyer matching & appointments ──────────────────────────

pub async fn match_lawyers(
    api: &dyn BackendPort,
    legal_issue: &str,
    jurisdiction: Option<String>,
    language: Option<String>,
) -> Result<Vec<Lawyer>> {
    require("legal_issue", legal_issue)?;
    api.match_lawyers(MatchRequest {
        legal_issue: legal_issue.to_string(),
        jurisdiction,
        language,
    })
    .await
}

pub async fn fetch_slots(api: &dyn BackendPort, lawyer_id: &str, days: u32) -> Result<Vec<DaySlots>> {
    require("lawyer_id", lawyer_id)?;
    api.fetch_slots(lawyer_id, days).await
}

pub async fn book_appointment(
    api: &dyn BackendPort,
    lawyer_id: &str,
    date: &str,
    time: &str,
    issue_description: &str,
) -> Result<Appointment> {
    require("lawyer_id", lawyer_id)?;
    require("date", date)?;
    require("time", time)?;
    require("issue_description", issue_description)?;
    api.book_appointment(BookingRequest {
        lawyer_id: lawyer_id.to_string(),
        date: date.to_string(),
        time: time.to_string(),
        issue_description: issue_description.to_string(),
    })
    .await
}

pub async fn cancel_appointment(api: &dyn BackendPort, appointment_id: &str) -> Result<()> {
    require("appointment_id", appointment_id)?;
    api.cancel_appointment(appointment_id).await
}

// ─── News ────────────────────────────────────────────────────

pub async fn fetch_news_page(
    api: &dyn BackendPort,
    page: u32,
    category: Option<&str>,
) -> Result<NewsPage> {
    api.fetch_news(page, category).await
}

/// Subscribe to push updates and persist the filters locally so the
/// stream dispatcher can match incoming items against them.
pub async fn subscribe_news(
    api: &dyn BackendPort,
    storage: &dyn StoragePort,
    subscription: &NewsSubscription,
) -> Result<String> {
    if subscription.legal_areas.is_empty() {
        return Err(ClientError::Validation {
            field: "legal_areas".to_string(),
        });
    }
    let subscription_id = api.subscribe_news(subscription).await?;

    match serde_json::to_vec(subscription) {
        Ok(bytes) => {
            if let Err(e) = storage.set(keys::NEWS_SUBSCRIPTION, &bytes).await {
                log::warn!("Could not persist news subscription: {}", e);
            }
        }
        Err(e) => log::warn!("Could not serialize news subscription: {}", e),
    }
    Ok(subscription_id)
}

/// Load the persisted subscription filters; corrupt or missing entries
/// yield the inactive default.
pub async fn load_subscription(storage: &dyn StoragePort) -> NewsSubscription {
    match storage.get(keys::NEWS_SUBSCRIPTION).await {
        Ok(Some(bytes)) => match serde_json::from_slice(&bytes) {
            Ok(sub) => sub,
            Err(e) => {
                log::warn!("Corrupt news subscription, resetting: {}", e);
                let _ = storage.delete(keys::NEWS_SUBSCRIPTION).await;
                NewsSubscription::default()
            }
        },
        _ => NewsSubscription::default(),
    }
}

// ─── FAQ ─────────────────────────────────────────────────────

pub async fn search_faq(
    api: &dyn BackendPort,
    storage: &dyn StoragePort,
    query: &str,
    category: Option<&str>,
) -> Result<Vec<FaqEntry>> {
    require("query", query)?;
    let results = api.search_faq(query, category).await?;
    record_recent(storage, keys::FAQ_SEARCHES, query.trim()).await;
    Ok(results)
}

pub async fn fetch_faq_categories(api: &dyn BackendPort) -> Result<Vec<String>> {
    api.fetch_faq_categories().await
}

pub async fn send_faq_feedback(
    api: &dyn BackendPort,
    storage: &dyn StoragePort,
    faq_id: &str,
    helpful: bool,
) -> Result<()> {
    require("faq_id", faq_id)?;
    api.send_faq_feedback(faq_id, helpful).await?;
    let entry = format!("{}:{}", faq_id, if helpful { "up" } else { "down" });
    record_recent(storage, keys::FAQ_FEEDBACK, &entry).await;
    Ok(())
}

/// Load a rotated recent-entries list; corrupt data resets to empty.
pub async fn load_recent(storage: &dyn StoragePort, key: &str) -> Vec<String> {
    match storage.get(key).await {
        Ok(Some(bytes)) => match serde_json::from_slice(&bytes) {
            Ok(list) => list,
            Err(e) => {
                log::warn!("Corrupt recent list at {}, resetting: {}", key, e);
                let _ = storage.delete(key).await;
                Vec::new()
            }
        },
        _ => Vec::new(),
    }
}

async fn record_recent(storage: &dyn StoragePort, key: &str, entry: &str) {
    let mut list = load_recent(storage, key).await;
    list.retain(|e| e != entry);
    list.insert(0, entry.to_string());
    list.truncate(FAQ_HISTORY_LIMIT);

    match serde_json::to_vec(&list) {
        Ok(bytes) => {
            if let Err(e) = storage.set(key, &bytes).await {
                log::warn!("Could not persist recent list at {}: {}", key, e);
            }
        }
        Err(e) => log::warn!("Could not serialize recent list: {}", e),
    }
}
