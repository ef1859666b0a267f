use serde::{Deserialize, Serialize};
use crate::api::NewsItem;
use crate::session::DEFAULT_TRANSCRIPT_CAPACITY;

/// Top-level client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    pub api: ApiConfig,
    pub health: HealthConfig,
    pub stream: StreamConfig,
    pub storage: StorageConfig,
    pub transcript_capacity: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            health: HealthConfig::default(),
            stream: StreamConfig::default(),
            storage: StorageConfig::default(),
            transcript_capacity: DEFAULT_TRANSCRIPT_CAPACITY,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL for REST endpoints; same-origin by default
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "/api".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthConfig {
    /// Minimum spacing between health requests
    pub interval_ms: u64,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self { interval_ms: 30_000 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamConfig {
    pub url: String,
    /// Fixed delay before each reconnect attempt; no backoff growth
    pub reconnect_delay_ms: u64,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            url: "/ws/updates".to_string(),
            reconnect_delay_ms: 5_000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub backend: StorageBackendType,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackendType::Auto,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageBackendType {
    /// Auto-detect best available backend
    Auto,
    Memory,
    LocalStorage,
}

// ─── Persisted user preferences ──────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Dark,
    Light,
}

impl Theme {
    pub fn all() -> &'static [Theme] {
        &[Theme::Dark, Theme::Light]
    }

    pub fn label(&self) -> &str {
        match self {
            Theme::Dark => "Dark",
            Theme::Light => "Light",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrivacyPrefs {
    /// Keep chat transcripts in browser storage
    pub store_history_locally: bool,
    /// Ask the backend to redact PII from analyzed documents
    pub redact_pii: bool,
}

impl Default for PrivacyPrefs {
    fn default() -> Self {
        Self {
            store_history_locally: true,
            redact_pii: false,
        }
    }
}

/// Profile-scoped preferences, persisted as one storage entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preferences {
    pub theme: Theme,
    /// ISO 639-1 language code
    pub language: String,
    pub jurisdiction: String,
    pub privacy: PrivacyPrefs,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            theme: Theme::Dark,
            language: "en".to_string(),
            jurisdiction: "US".to_string(),
            privacy: PrivacyPrefs::default(),
        }
    }
}

/// Active news subscription filters, persisted alongside preferences
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewsSubscription {
    /// Legal area keys, e.g. "family_law"
    pub legal_areas: Vec<String>,
    pub jurisdictions: Vec<String>,
}

impl NewsSubscription {
    pub fn is_active(&self) -> bool {
        !self.legal_areas.is_empty()
    }

    /// Whether an incoming item matches the subscribed filters.
    /// An empty jurisdiction list means "any jurisdiction".
    pub fn matches(&self, item: &NewsItem) -> bool {
        if !self.legal_areas.iter().any(|a| a == &item.category) {
            return false;
        }
        self.jurisdictions.is_empty()
            || self.jurisdictions.iter().any(|j| j == &item.jurisdiction)
    }
}
