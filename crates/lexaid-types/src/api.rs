//! Domain data carried between the backend and the UI.
//!
//! Field sets follow the backend's JSON bodies; everything here is
//! plain data with serde derives and no behaviour beyond small helpers.

use serde::{Deserialize, Serialize};

// ─── News ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImpactLevel {
    Low,
    Medium,
    High,
}

impl ImpactLevel {
    pub fn label(&self) -> &str {
        match self {
            ImpactLevel::Low => "Low",
            ImpactLevel::Medium => "Medium",
            ImpactLevel::High => "High",
        }
    }
}

/// One legal news/update item as delivered by the backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsItem {
    pub id: String,
    pub title: String,
    pub summary: String,
    pub source: String,
    pub url: String,
    pub date: String,
    /// Legal area key, e.g. "family_law"
    pub category: String,
    pub jurisdiction: String,
    pub impact: ImpactLevel,
}

/// One page of the news feed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsPage {
    pub items: Vec<NewsItem>,
    pub page: u32,
    pub total_pages: u32,
}

// ─── Lawyers & appointments ──────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lawyer {
    pub id: String,
    pub name: String,
    pub specialties: Vec<String>,
    pub experience_years: u32,
    pub languages: Vec<String>,
    pub jurisdictions: Vec<String>,
    pub rating: f32,
    pub match_score: u32,
}

/// Open 30-minute slots for one calendar day
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaySlots {
    /// ISO date, e.g. "2026-08-07"
    pub date: String,
    /// "HH:MM" start times
    pub times: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub appointment_id: String,
    pub lawyer_id: String,
    pub lawyer_name: String,
    #[serde(rename = "appointment_date")]
    pub date: String,
    #[serde(rename = "appointment_time")]
    pub time: String,
    pub status: String,
}

// ─── Document templates & results ────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateParam {
    pub name: String,
    pub required: bool,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentTemplate {
    pub key: String,
    pub name: String,
    pub parameters: Vec<TemplateParam>,
}

impl DocumentTemplate {
    pub fn required_params(&self) -> impl Iterator<Item = &TemplateParam> {
        self.parameters.iter().filter(|p| p.required)
    }
}

fn param(name: &str, required: bool, description: &str) -> TemplateParam {
    TemplateParam {
        name: name.to_string(),
        required,
        description: description.to_string(),
    }
}

/// The template set the backend ships by default. Used as a fallback
/// until the live list is fetched from `/api/document/templates`.
pub fn builtin_templates() -> Vec<DocumentTemplate> {
    vec![
        DocumentTemplate {
            key: "nda".to_string(),
            name: "Non-Disclosure Agreement".to_string(),
            parameters: vec![
                param("party_a", true, "Name of the disclosing party"),
                param("party_b", true, "Name of the receiving party"),
                param("purpose", true, "Purpose of disclosure"),
                param("term", true, "Duration of the agreement"),
                param("jurisdiction", false, "Governing jurisdiction"),
            ],
        },
        DocumentTemplate {
            key: "contract".to_string(),
            name: "Service Contract".to_string(),
            parameters: vec![
                param("party_a", true, "Service provider"),
                param("party_b", true, "Client"),
                param("services", true, "Description of services"),
                param("payment_terms", true, "Payment details"),
                param("term", true, "Duration of contract"),
                param("jurisdiction", false, "Governing jurisdiction"),
            ],
        },
        DocumentTemplate {
            key: "will".to_string(),
            name: "Last Will and Testament".to_string(),
            parameters: vec![
                param("testator_name", true, "Name of person making the will"),
                param("executor_name", true, "Name of executor"),
                param("beneficiaries", true, "List of beneficiaries"),
                param("assets", true, "List of assets to distribute"),
                param("jurisdiction", false, "Governing jurisdiction"),
            ],
        },
    ]
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentAnalysis {
    pub analysis: String,
    pub document_type: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedDocument {
    pub document_type: String,
    pub jurisdiction: String,
    pub content: String,
    pub timestamp: String,
}

// ─── FAQ ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaqEntry {
    pub id: String,
    pub question: String,
    pub answer: String,
    pub category: String,
}
