//! REST backend adapter.
//!
//! Implements `BackendPort` over the browser `fetch()` API via gloo-net.
//! Each method is one request/response round trip; wire shapes live here
//! as private structs and never leak past the port boundary.

use std::collections::BTreeMap;

use async_trait::async_trait;
use gloo_net::http::{Request, Response};
use serde::Deserialize;
use serde_json::json;

use lexaid_core::ports::{
    AnalyzeRequest, BackendPort, BookingRequest, ChatReply, GenerateRequest, MatchRequest,
    MonitorRequest,
};
use lexaid_types::{
    ClientError, Result,
    api::{
        Appointment, DaySlots, DocumentAnalysis, DocumentTemplate, FaqEntry, GeneratedDocument,
        Lawyer, NewsPage, TemplateParam,
    },
    config::NewsSubscription,
    message::{Message, Role},
};

/// Backend client bound to one base URL (same-origin `/api` by default).
pub struct GlooBackend {
    base_url: String,
}

impl GlooBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { base_url }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get(&self, path: &str) -> Result<Response> {
        let response = Request::get(&self.url(path))
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;
        check_status(response).await
    }

    async fn post(&self, path: &str, body: &serde_json::Value) -> Result<Response> {
        let response = Request::post(&self.url(path))
            .header("Content-Type", "application/json")
            .json(body)
            .map_err(|e| ClientError::Network(e.to_string()))?
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;
        check_status(response).await
    }
}

async fn check_status(response: Response) -> Result<Response> {
    if response.ok() {
        return Ok(response);
    }
    let status = response.status();
    let message = response
        .text()
        .await
        .unwrap_or_else(|_| "unknown error".to_string());
    Err(ClientError::Backend { status, message })
}

async fn decode<T: for<'de> Deserialize<'de>>(response: Response) -> Result<T> {
    response
        .json::<T>()
        .await
        .map_err(|e| ClientError::Serialization(e.to_string()))
}

/// Some endpoints report failure inside a 200 body as
/// `{"status": "error", "message": ...}`.
fn reject_body_error(status: Option<&str>, message: Option<&str>) -> Result<()> {
    if status == Some("error") {
        return Err(ClientError::Backend {
            status: 200,
            message: message.unwrap_or("backend reported an error").to_string(),
        });
    }
    Ok(())
}

#[async_trait(?Send)]
impl BackendPort for GlooBackend {
    async fn health(&self) -> Result<()> {
        self.get("/health").await?;
        Ok(())
    }

    async fn send_chat(&self, session_id: &str, message: &str) -> Result<ChatReply> {
        let response = self
            .post("/chat", &json!({ "message": message, "session_id": session_id }))
            .await?;
        let wire: ChatWire = decode(response).await?;
        Ok(ChatReply {
            content: wire.response,
            response_type: wire.response_type.unwrap_or_else(|| "basic".to_string()),
        })
    }

    async fn fetch_history(&self, session_id: &str) -> Result<Vec<Message>> {
        let response = self.get(&format!("/history/{}", session_id)).await?;
        let wire: HistoryWire = decode(response).await?;
        Ok(wire
            .history
            .into_iter()
            .map(|entry| {
                // The backend labels assistant turns "bot"
                let role = match entry.role.as_str() {
                    "user" => Role::User,
                    "system" => Role::System,
                    _ => Role::Assistant,
                };
                Message::restored(role, entry.content, entry.timestamp)
            })
            .collect())
    }

    async fn fetch_summary(&self, session_id: &str) -> Result<String> {
        let response = self.get(&format!("/summary/{}", session_id)).await?;
        let wire: SummaryWire = decode(response).await?;
        Ok(wire.summary)
    }

    async fn analyze_document(&self, req: AnalyzeRequest) -> Result<DocumentAnalysis> {
        let response = self
            .post(
                "/document/analyze",
                &json!({
                    "document_text": req.document_text,
                    "document_type": req.document_type,
                    "redact_pii": req.redact_pii,
                }),
            )
            .await?;
        let wire: AnalyzeWire = decode(response).await?;
        reject_body_error(wire.status.as_deref(), wire.message.as_deref())?;
        Ok(DocumentAnalysis {
            analysis: wire.analysis.unwrap_or_default(),
            document_type: wire.document_type.unwrap_or(req.document_type),
            timestamp: wire.timestamp.unwrap_or_default(),
        })
    }

    async fn generate_document(&self, req: GenerateRequest) -> Result<GeneratedDocument> {
        let mut body = json!({
            "template_key": req.template_key,
            "parameters": req.parameters,
        });
        if let Some(jurisdiction) = &req.jurisdiction {
            body["jurisdiction"] = json!(jurisdiction);
        }
        let response = self.post("/document/generate", &body).await?;
        let wire: GenerateWire = decode(response).await?;
        reject_body_error(wire.status.as_deref(), wire.message.as_deref())?;
        Ok(GeneratedDocument {
            document_type: wire.document_type.unwrap_or(req.template_key),
            jurisdiction: wire.jurisdiction.unwrap_or_else(|| "US".to_string()),
            content: wire.content.unwrap_or_default(),
            timestamp: wire.timestamp.unwrap_or_default(),
        })
    }

    async fn monitor_document(&self, req: MonitorRequest) -> Result<String> {
        let response = self
            .post(
                "/document/monitor",
                &json!({
                    "document_id": req.document_id,
                    "document_text": req.document_text,
                    "document_type": req.document_type,
                    "legal_areas": req.legal_areas,
                    "jurisdiction": req.jurisdiction,
                }),
            )
            .await?;
        let wire: MonitorWire = decode(response).await?;
        reject_body_error(wire.status.as_deref(), wire.message.as_deref())?;
        Ok(wire.document_id.unwrap_or(req.document_id))
    }

    async fn check_document_updates(&self, document_id: &str) -> Result<Vec<String>> {
        let response = self
            .post("/document/update-check", &json!({ "document_id": document_id }))
            .await?;
        let wire: UpdateCheckWire = decode(response).await?;
        reject_body_error(wire.status.as_deref(), wire.message.as_deref())?;
        Ok(wire.updates)
    }

    async fn fetch_templates(&self) -> Result<Vec<DocumentTemplate>> {
        let response = self.get("/document/templates").await?;
        let wire: TemplatesWire = decode(response).await?;
        Ok(wire
            .templates
            .into_iter()
            .map(|(key, tpl)| DocumentTemplate {
                key,
                name: tpl.name,
                parameters: tpl.parameters,
            })
            .collect())
    }

    async fn match_lawyers(&self, req: MatchRequest) -> Result<Vec<Lawyer>> {
        let mut body = json!({ "legal_issue": req.legal_issue });
        if let Some(jurisdiction) = &req.jurisdiction {
            body["jurisdiction"] = json!(jurisdiction);
        }
        if let Some(language) = &req.language {
            body["language"] = json!(language);
        }
        let response = self.post("/lawyers/match", &body).await?;
        let wire: MatchWire = decode(response).await?;
        reject_body_error(wire.status.as_deref(), wire.message.as_deref())?;
        Ok(wire.lawyers)
    }

    async fn fetch_slots(&self, lawyer_id: &str, days: u32) -> Result<Vec<DaySlots>> {
        let response = self
            .get(&format!("/lawyers/{}/slots?days={}", lawyer_id, days))
            .await?;
        let wire: SlotsWire = decode(response).await?;
        reject_body_error(wire.status.as_deref(), wire.message.as_deref())?;
        // BTreeMap keeps the days in calendar order
        Ok(wire
            .available_slots
            .into_iter()
            .map(|(date, times)| DaySlots { date, times })
            .collect())
    }

    async fn book_appointment(&self, req: BookingRequest) -> Result<Appointment> {
        let response = self
            .post(
                "/appointments/book",
                &json!({
                    "lawyer_id": req.lawyer_id,
                    "appointment_date": req.date,
                    "appointment_time": req.time,
                    "issue_description": req.issue_description,
                }),
            )
            .await?;
        let wire: BookingWire = decode(response).await?;
        reject_body_error(wire.status.as_deref(), wire.message.as_deref())?;
        wire.appointment.ok_or_else(|| ClientError::Backend {
            status: 200,
            message: "booking confirmed without appointment details".to_string(),
        })
    }

    async fn cancel_appointment(&self, appointment_id: &str) -> Result<()> {
        let response = self
            .post("/appointments/cancel", &json!({ "appointment_id": appointment_id }))
            .await?;
        let wire: StatusWire = decode(response).await?;
        reject_body_error(wire.status.as_deref(), wire.message.as_deref())
    }

    async fn fetch_news(&self, page: u32, category: Option<&str>) -> Result<NewsPage> {
        let path = match category {
            Some(category) => format!("/news/list?page={}&category={}", page, category),
            None => format!("/news/list?page={}", page),
        };
        let response = self.get(&path).await?;
        decode(response).await
    }

    async fn subscribe_news(&self, sub: &NewsSubscription) -> Result<String> {
        let response = self
            .post(
                "/news/subscribe",
                &json!({
                    "legal_areas": sub.legal_areas,
                    "jurisdictions": sub.jurisdictions,
                }),
            )
            .await?;
        let wire: SubscribeWire = decode(response).await?;
        reject_body_error(wire.status.as_deref(), wire.message.as_deref())?;
        Ok(wire
            .subscription
            .map(|s| s.subscription_id)
            .unwrap_or_default())
    }

    async fn search_faq(&self, query: &str, category: Option<&str>) -> Result<Vec<FaqEntry>> {
        let mut body = json!({ "query": query });
        if let Some(category) = category {
            body["category"] = json!(category);
        }
        let response = self.post("/faq/search", &body).await?;
        let wire: FaqSearchWire = decode(response).await?;
        Ok(wire.results)
    }

    async fn fetch_faq_categories(&self) -> Result<Vec<String>> {
        let response = self.get("/faq/categories").await?;
        let wire: FaqCategoriesWire = decode(response).await?;
        Ok(wire.categories)
    }

    async fn send_faq_feedback(&self, faq_id: &str, helpful: bool) -> Result<()> {
        let response = self
            .post("/faq/feedback", &json!({ "faq_id": faq_id, "helpful": helpful }))
            .await?;
        let wire: StatusWire = decode(response).await?;
        reject_body_error(wire.status.as_deref(), wire.message.as_deref())
    }
}

// ─── Wire types ──────────────────────────────────────────────

#[derive(Deserialize)]
struct ChatWire {
    response: String,
    #[serde(default)]
    response_type: Option<String>,
}

#[derive(Deserialize)]
struct HistoryEntryWire {
    role: String,
    content: String,
    timestamp: String,
}

#[derive(Deserialize)]
struct HistoryWire {
    history: Vec<HistoryEntryWire>,
}

#[derive(Deserialize)]
struct SummaryWire {
    summary: String,
}

#[derive(Deserialize)]
struct AnalyzeWire {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    analysis: Option<String>,
    #[serde(default)]
    document_type: Option<String>,
    #[serde(default)]
    timestamp: Option<String>,
}

#[derive(Deserialize)]
struct GenerateWire {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    document_type: Option<String>,
    #[serde(default)]
    jurisdiction: Option<String>,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    timestamp: Option<String>,
}

#[derive(Deserialize)]
struct MonitorWire {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    document_id: Option<String>,
}

#[derive(Deserialize)]
struct UpdateCheckWire {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    updates: Vec<String>,
}

#[derive(Deserialize)]
struct TemplateWire {
    name: String,
    parameters: Vec<TemplateParam>,
}

#[derive(Deserialize)]
struct TemplatesWire {
    templates: BTreeMap<String, TemplateWire>,
}

#[derive(Deserialize)]
struct MatchWire {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    lawyers: Vec<Lawyer>,
}

#[derive(Deserialize)]
struct SlotsWire {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    available_slots: BTreeMap<String, Vec<String>>,
}

#[derive(Deserialize)]
struct BookingWire {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    appointment: Option<Appointment>,
}

#[derive(Deserialize)]
struct StatusWire {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Deserialize)]
struct SubscriptionWire {
    subscription_id: String,
}

#[derive(Deserialize)]
struct SubscribeWire {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    subscription: Option<SubscriptionWire>,
}

#[derive(Deserialize)]
struct FaqSearchWire {
    #[serde(default)]
    results: Vec<FaqEntry>,
}

#[derive(Deserialize)]
struct FaqCategoriesWire {
    #[serde(default)]
    categories: Vec<String>,
}
