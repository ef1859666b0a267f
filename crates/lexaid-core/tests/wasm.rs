//! WASM-target tests for lexaid-core.
//!
//! Covers the pure pieces (supervisor, bus, validation) under
//! wasm32-unknown-unknown via `wasm-pack test --node`.

use wasm_bindgen_test::*;

use std::collections::BTreeMap;

use lexaid_core::event_bus::EventBus;
use lexaid_core::forms::{validate_template_form, BusyFlag};
use lexaid_core::stream::{decode_frame, StreamSupervisor};
use lexaid_types::api::builtin_templates;
use lexaid_types::event::{ClientEvent, ConnectionState};
use lexaid_types::ClientError;

#[wasm_bindgen_test]
fn reconnect_directive_fixed_delay() {
    let bus = EventBus::new();
    let mut supervisor = StreamSupervisor::new(5_000);

    for _ in 0..10 {
        supervisor.on_connecting(&bus);
        assert_eq!(supervisor.on_closed(&bus), 5_000);
    }
    assert_eq!(supervisor.attempts(), 10);
    assert_eq!(supervisor.state(), ConnectionState::ReconnectScheduled);
}

#[wasm_bindgen_test]
fn decode_frame_rejects_malformed() {
    assert!(matches!(
        decode_frame("not json").unwrap_err(),
        ClientError::Serialization(_)
    ));
}

#[wasm_bindgen_test]
fn event_bus_drain() {
    let bus = EventBus::new();
    bus.emit(ClientEvent::ReachabilityChanged { reachable: true });
    assert!(bus.has_pending());
    assert_eq!(bus.drain().len(), 1);
    assert!(!bus.has_pending());
}

#[wasm_bindgen_test]
fn template_validation_names_missing_field() {
    let templates = builtin_templates();
    let nda = templates.iter().find(|t| t.key == "nda").unwrap();

    let mut values = BTreeMap::new();
    values.insert("party_a".to_string(), "Acme".to_string());

    let err = validate_template_form(nda, &values).unwrap_err();
    assert!(matches!(err, ClientError::Validation { field } if field == "party_b"));
}

#[wasm_bindgen_test]
fn busy_flag_scoped_clear() {
    let flag = BusyFlag::new();
    {
        let _guard = flag.acquire();
        assert!(flag.is_busy());
    }
    assert!(!flag.is_busy());
}
