//! WASM-target tests for lexaid-platform (Node.js runtime).
//!
//! Tests MemoryStorage under wasm32-unknown-unknown via
//! `wasm-pack test --node`.
//!
//! LocalStorage and WebSocket tests require a browser environment.

use wasm_bindgen_test::*;

use lexaid_core::ports::StoragePort;
use lexaid_platform::storage::MemoryStorage;

// ─── MemoryStorage Tests ─────────────────────────────────

#[wasm_bindgen_test]
fn memory_storage_backend_name() {
    let storage = MemoryStorage::new();
    assert_eq!(storage.backend_name(), "memory");
}

#[wasm_bindgen_test]
async fn memory_storage_get_missing() {
    let storage = MemoryStorage::new();
    let result = storage.get("nonexistent").await.unwrap();
    assert!(result.is_none());
}

#[wasm_bindgen_test]
async fn memory_storage_set_and_get() {
    let storage = MemoryStorage::new();
    storage.set("lexaid:session", b"abc").await.unwrap();
    let result = storage.get("lexaid:session").await.unwrap();
    assert_eq!(result, Some(b"abc".to_vec()));
}

#[wasm_bindgen_test]
async fn memory_storage_overwrite() {
    let storage = MemoryStorage::new();
    storage.set("key", b"v1").await.unwrap();
    storage.set("key", b"v2").await.unwrap();
    let result = storage.get("key").await.unwrap();
    assert_eq!(result, Some(b"v2".to_vec()));
}

#[wasm_bindgen_test]
async fn memory_storage_delete() {
    let storage = MemoryStorage::new();
    storage.set("key", b"val").await.unwrap();
    storage.delete("key").await.unwrap();
    assert!(storage.get("key").await.unwrap().is_none());
}

#[wasm_bindgen_test]
async fn memory_storage_exists() {
    let storage = MemoryStorage::new();
    assert!(!storage.exists("key").await.unwrap());
    storage.set("key", b"val").await.unwrap();
    assert!(storage.exists("key").await.unwrap());
}

#[wasm_bindgen_test]
async fn memory_storage_list_keys_by_prefix() {
    let storage = MemoryStorage::new();
    storage.set("lexaid:session", b"s").await.unwrap();
    storage.set("lexaid:transcript:s1", b"t").await.unwrap();
    storage.set("other:key", b"x").await.unwrap();

    let mut keys = storage.list_keys("lexaid:").await.unwrap();
    keys.sort();
    assert_eq!(keys, vec!["lexaid:session", "lexaid:transcript:s1"]);
}

// ─── Session round trip through the port ─────────────────

#[wasm_bindgen_test]
async fn transcript_round_trip_through_storage_port() {
    use lexaid_core::session::SessionManager;
    use lexaid_core::event_bus::EventBus;
    use lexaid_types::message::Role;

    let storage = MemoryStorage::new();
    let mut manager = SessionManager::restore_or_create(&storage, EventBus::new(), 200).await;
    manager.add_message(&storage, Role::User, "hello").await;
    manager.add_message(&storage, Role::Assistant, "hi").await;

    let reloaded =
        SessionManager::load_transcript(&storage, &manager.session().id, 200).await;
    assert_eq!(reloaded.len(), 2);
}
