//! WASM-target tests for lexaid-types.
//!
//! Mirrors the native unit tests but runs under wasm32-unknown-unknown
//! via `wasm-pack test --node`.

use wasm_bindgen_test::*;

use lexaid_types::api::*;
use lexaid_types::config::*;
use lexaid_types::error::*;
use lexaid_types::event::*;
use lexaid_types::message::*;
use lexaid_types::session::*;

fn sample_item() -> NewsItem {
    NewsItem {
        id: "EL001".to_string(),
        title: "New Paid Family Leave Laws".to_string(),
        summary: "Expanded benefits for workers.".to_string(),
        source: "Department of Labor".to_string(),
        url: "https://example.com/family-leave".to_string(),
        date: "2026-08-01T00:00:00Z".to_string(),
        category: "employment_law".to_string(),
        jurisdiction: "Federal".to_string(),
        impact: ImpactLevel::Medium,
    }
}

// ─── Message Tests ───────────────────────────────────────

#[wasm_bindgen_test]
fn message_user() {
    let msg = Message::user("Hello");
    assert_eq!(msg.role, Role::User);
    assert_eq!(msg.content, "Hello");
    assert!(!msg.timestamp.is_empty());
}

#[wasm_bindgen_test]
fn message_restored_keeps_timestamp() {
    let msg = Message::restored(Role::Assistant, "old", "2026-01-01T00:00:00Z");
    assert_eq!(msg.timestamp, "2026-01-01T00:00:00Z");
}

#[wasm_bindgen_test]
fn message_serialization_roundtrip() {
    let msg = Message::user("test input");
    let json = serde_json::to_string(&msg).unwrap();
    let deserialized: Message = serde_json::from_str(&json).unwrap();
    assert_eq!(deserialized.role, Role::User);
    assert_eq!(deserialized.content, "test input");
}

#[wasm_bindgen_test]
fn role_serialization() {
    assert_eq!(serde_json::to_string(&Role::User).unwrap(), r#""user""#);
    assert_eq!(serde_json::to_string(&Role::Assistant).unwrap(), r#""assistant""#);
    assert_eq!(serde_json::to_string(&Role::System).unwrap(), r#""system""#);
}

// ─── Session & Transcript Tests ──────────────────────────

#[wasm_bindgen_test]
fn session_new() {
    let session = Session::new("test-id".to_string());
    assert_eq!(session.id, "test-id");
    assert!(!session.created_at.is_empty());
}

#[wasm_bindgen_test]
fn transcript_eviction() {
    let mut t = Transcript::new(2);
    t.push(Message::user("a"));
    t.push(Message::user("b"));
    let evicted = t.push(Message::user("c")).expect("should evict");
    assert_eq!(evicted.content, "a");
    assert_eq!(t.len(), 2);
}

#[wasm_bindgen_test]
fn transcript_roundtrip() {
    let mut t = Transcript::new(10);
    t.push(Message::user("hello"));
    t.push(Message::assistant("hi"));
    let json = serde_json::to_string(&t).unwrap();
    let restored: Transcript = serde_json::from_str(&json).unwrap();
    assert_eq!(restored.len(), 2);
}

#[wasm_bindgen_test]
fn history_rotation() {
    let mut index = HistoryIndex::new();
    for i in 0..30 {
        index.touch(ConversationSummary {
            session_id: format!("s{}", i),
            title: "t".to_string(),
            updated_at: "2026-01-01T00:00:00Z".to_string(),
            message_count: 1,
        });
    }
    assert_eq!(index.len(), MAX_CONVERSATIONS);
}

// ─── Stream Frame Tests ──────────────────────────────────

#[wasm_bindgen_test]
fn stream_frame_tagged_decoding() {
    let json = r#"{"type":"chat_message","session_id":"s1","content":"hi","timestamp":"2026-01-01T00:00:00Z"}"#;
    let frame: StreamFrame = serde_json::from_str(json).unwrap();
    assert!(matches!(frame, StreamFrame::ChatMessage { .. }));
}

#[wasm_bindgen_test]
fn stream_frame_news_roundtrip() {
    let frame = StreamFrame::NewsUpdate { item: sample_item() };
    let json = serde_json::to_string(&frame).unwrap();
    assert!(json.contains(r#""type":"news_update""#));
    let back: StreamFrame = serde_json::from_str(&json).unwrap();
    assert!(matches!(back, StreamFrame::NewsUpdate { .. }));
}

#[wasm_bindgen_test]
fn connection_state_serialization() {
    let json = serde_json::to_string(&ConnectionState::ReconnectScheduled).unwrap();
    assert_eq!(json, r#""reconnect-scheduled""#);
}

// ─── Config Tests ────────────────────────────────────────

#[wasm_bindgen_test]
fn default_config() {
    let config = ClientConfig::default();
    assert_eq!(config.api.base_url, "/api");
    assert_eq!(config.health.interval_ms, 30_000);
    assert_eq!(config.stream.reconnect_delay_ms, 5_000);
}

#[wasm_bindgen_test]
fn subscription_matching() {
    let sub = NewsSubscription {
        legal_areas: vec!["employment_law".to_string()],
        jurisdictions: vec![],
    };
    assert!(sub.matches(&sample_item()));
}

#[wasm_bindgen_test]
fn nda_template_required_fields() {
    let templates = builtin_templates();
    let nda = templates.iter().find(|t| t.key == "nda").unwrap();
    let required: Vec<&str> = nda.required_params().map(|p| p.name.as_str()).collect();
    assert_eq!(required, vec!["party_a", "party_b", "purpose", "term"]);
}

// ─── Error Tests ─────────────────────────────────────────

#[wasm_bindgen_test]
fn error_display() {
    assert_eq!(
        ClientError::Network("timeout".to_string()).to_string(),
        "Network error: timeout"
    );
    assert_eq!(
        ClientError::Validation { field: "term".to_string() }.to_string(),
        "Missing required field: term"
    );
}

#[wasm_bindgen_test]
fn error_from_serde() {
    let serde_err = serde_json::from_str::<serde_json::Value>("{{bad}}").unwrap_err();
    let client_err: ClientError = serde_err.into();
    assert!(matches!(client_err, ClientError::Serialization(_)));
}
