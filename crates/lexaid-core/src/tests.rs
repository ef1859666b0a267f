#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::collections::{BTreeMap, HashMap};

    use async_trait::async_trait;

    use lexaid_types::{
        ClientError, Result,
        api::*,
        config::NewsSubscription,
        event::{ClientEvent, ConnectionState},
        message::{Message, Role},
    };
    use crate::event_bus::EventBus;
    use crate::forms;
    use crate::forms::BusyFlag;
    use crate::health::HealthMonitor;
    use crate::keys;
    use crate::ports::*;
    use crate::session::SessionManager;
    use crate::stream::{decode_frame, StreamSupervisor};

    // Simple single-threaded executor for async port tests.
    // Everything in these tests completes without real suspension.
    fn block_on<F: std::future::Future<Output = T>, T>(f: F) -> T {
        use std::sync::Arc;
        use std::task::{Context, Poll, Wake, Waker};

        struct NoopWaker;
        impl Wake for NoopWaker {
            fn wake(self: Arc<Self>) {}
        }

        let waker = Waker::from(Arc::new(NoopWaker));
        let mut cx = Context::from_waker(&waker);
        let mut f = std::pin::pin!(f);

        loop {
            match f.as_mut().poll(&mut cx) {
                Poll::Ready(val) => return val,
                Poll::Pending => std::thread::yield_now(),
            }
        }
    }

    // ─── Mocks ───────────────────────────────────────────────

    #[derive(Default)]
    struct MockBackend {
        health_calls: Cell<u32>,
        health_ok: Cell<bool>,
        chat_calls: Cell<u32>,
        chat_fails: Cell<bool>,
        generate_requests: RefCell<Vec<GenerateRequest>>,
        analyze_calls: Cell<u32>,
        faq_calls: Cell<u32>,
        subscribe_calls: Cell<u32>,
    }

    impl MockBackend {
        fn healthy() -> Self {
            let backend = Self::default();
            backend.health_ok.set(true);
            backend
        }
    }

    #[async_trait(?Send)]
    impl BackendPort for MockBackend {
        async fn health(&self) -> Result<()> {
            self.health_calls.set(self.health_calls.get() + 1);
            if self.health_ok.get() {
                Ok(())
            } else {
                Err(ClientError::Network("connection refused".to_string()))
            }
        }

        async fn send_chat(&self, _session_id: &str, message: &str) -> Result<ChatReply> {
            self.chat_calls.set(self.chat_calls.get() + 1);
            if self.chat_fails.get() {
                return Err(ClientError::Network("connection reset".to_string()));
            }
            Ok(ChatReply {
                content: format!("echo: {}", message),
                response_type: "basic".to_string(),
            })
        }

        async fn fetch_history(&self, _session_id: &str) -> Result<Vec<Message>> {
            Ok(vec![Message::restored(
                Role::User,
                "remote",
                "2026-08-01T00:00:00Z",
            )])
        }

        async fn fetch_summary(&self, _session_id: &str) -> Result<String> {
            Ok("summary".to_string())
        }

        async fn analyze_document(&self, req: AnalyzeRequest) -> Result<DocumentAnalysis> {
            self.analyze_calls.set(self.analyze_calls.get() + 1);
            Ok(DocumentAnalysis {
                analysis: "plain language summary".to_string(),
                document_type: req.document_type,
                timestamp: "2026-08-01T00:00:00Z".to_string(),
            })
        }

        async fn generate_document(&self, req: GenerateRequest) -> Result<GeneratedDocument> {
            let document_type = req.template_key.clone();
            let jurisdiction = req
                .jurisdiction
                .clone()
                .unwrap_or_else(|| "US".to_string());
            self.generate_requests.borrow_mut().push(req);
            Ok(GeneratedDocument {
                document_type,
                jurisdiction,
                content: "GENERATED".to_string(),
                timestamp: "2026-08-01T00:00:00Z".to_string(),
            })
        }

        async fn monitor_document(&self, req: MonitorRequest) -> Result<String> {
            Ok(req.document_id)
        }

        async fn check_document_updates(&self, _document_id: &str) -> Result<Vec<String>> {
            Ok(vec!["guideline change".to_string()])
        }

        async fn fetch_templates(&self) -> Result<Vec<DocumentTemplate>> {
            Ok(builtin_templates())
        }

        async fn match_lawyers(&self, req: MatchRequest) -> Result<Vec<Lawyer>> {
            Ok(vec![Lawyer {
                id: "lw1".to_string(),
                name: "Jane Doe".to_string(),
                specialties: vec![req.legal_issue],
                experience_years: 12,
                languages: vec!["English".to_string()],
                jurisdictions: vec!["All US States".to_string()],
                rating: 4.8,
                match_score: 91,
            }])
        }

        async fn fetch_slots(&self, _lawyer_id: &str, _days: u32) -> Result<Vec<DaySlots>> {
            Ok(vec![DaySlots {
                date: "2026-08-10".to_string(),
                times: vec!["09:00".to_string(), "09:30".to_string()],
            }])
        }

        async fn book_appointment(&self, req: BookingRequest) -> Result<Appointment> {
            Ok(Appointment {
                appointment_id: "ap1".to_string(),
                lawyer_id: req.lawyer_id,
                lawyer_name: "Jane Doe".to_string(),
                date: req.date,
                time: req.time,
                status: "confirmed".to_string(),
            })
        }

        async fn cancel_appointment(&self, _appointment_id: &str) -> Result<()> {
            Ok(())
        }

        async fn fetch_news(&self, page: u32, _category: Option<&str>) -> Result<NewsPage> {
            Ok(NewsPage {
                items: Vec::new(),
                page,
                total_pages: 1,
            })
        }

        async fn subscribe_news(&self, _sub: &NewsSubscription) -> Result<String> {
            self.subscribe_calls.set(self.subscribe_calls.get() + 1);
            Ok("sub-1".to_string())
        }

        async fn search_faq(&self, query: &str, _category: Option<&str>) -> Result<Vec<FaqEntry>> {
            self.faq_calls.set(self.faq_calls.get() + 1);
            Ok(vec![FaqEntry {
                id: "faq1".to_string(),
                question: query.to_string(),
                answer: "answer".to_string(),
                category: "general".to_string(),
            }])
        }

        async fn fetch_faq_categories(&self) -> Result<Vec<String>> {
            Ok(vec!["general".to_string()])
        }

        async fn send_faq_feedback(&self, _faq_id: &str, _helpful: bool) -> Result<()> {
            Ok(())
        }
    }

    struct MockStorage {
        data: RefCell<HashMap<String, Vec<u8>>>,
        fail_writes: Cell<bool>,
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                data: RefCell::new(HashMap::new()),
                fail_writes: Cell::new(false),
            }
        }

        fn put_raw(&self, key: &str, value: &str) {
            self.data
                .borrow_mut()
                .insert(key.to_string(), value.as_bytes().to_vec());
        }

        fn contains(&self, key: &str) -> bool {
            self.data.borrow().contains_key(key)
        }
    }

    #[async_trait(?Send)]
    impl StoragePort for MockStorage {
        async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
            Ok(self.data.borrow().get(key).cloned())
        }

        async fn set(&self, key: &str, value: &[u8]) -> Result<()> {
            if self.fail_writes.get() {
                return Err(ClientError::Storage("quota exceeded".to_string()));
            }
            self.data
                .borrow_mut()
                .insert(key.to_string(), value.to_vec());
            Ok(())
        }

        async fn delete(&self, key: &str) -> Result<()> {
            self.data.borrow_mut().remove(key);
            Ok(())
        }

        async fn list_keys(&self, prefix: &str) -> Result<Vec<String>> {
            Ok(self
                .data
                .borrow()
                .keys()
                .filter(|k| k.starts_with(prefix))
                .cloned()
                .collect())
        }

        fn backend_name(&self) -> &str {
            "mock"
        }
    }

    struct MockNotifier {
        granted: bool,
        sent: RefCell<Vec<(String, String)>>,
    }

    impl MockNotifier {
        fn new(granted: bool) -> Self {
            Self {
                granted,
                sent: RefCell::new(Vec::new()),
            }
        }
    }

    impl NotifyPort for MockNotifier {
        fn permission_granted(&self) -> bool {
            self.granted
        }

        fn notify(&self, title: &str, body: &str) {
            self.sent
                .borrow_mut()
                .push((title.to_string(), body.to_string()));
        }
    }

    fn news_frame(category: &str) -> String {
        format!(
            r#"{{"type":"news_update","item":{{"id":"N1","title":"Update","summary":"Something changed","source":"Court","url":"https://example.com","date":"2026-08-01T00:00:00Z","category":"{}","jurisdiction":"Federal","impact":"high"}}}}"#,
            category
        )
    }

    // ─── Session Manager Tests ───────────────────────────────

    #[test]
    fn test_session_id_generated_and_persisted() {
        let storage = MockStorage::new();
        let bus = EventBus::new();

        let manager = block_on(SessionManager::restore_or_create(&storage, bus, 200));
        assert!(!manager.session().id.is_empty());
        assert!(storage.contains(keys::SESSION));
    }

    #[test]
    fn test_session_id_stable_across_restores() {
        let storage = MockStorage::new();

        let first = block_on(SessionManager::restore_or_create(&storage, EventBus::new(), 200));
        let second = block_on(SessionManager::restore_or_create(&storage, EventBus::new(), 200));

        assert_eq!(first.session().id, second.session().id);
        assert_eq!(first.session().created_at, second.session().created_at);
    }

    #[test]
    fn test_session_survives_storage_write_failure() {
        let storage = MockStorage::new();
        storage.fail_writes.set(true);

        // Falls back to an in-memory id without failing the load
        let manager = block_on(SessionManager::restore_or_create(&storage, EventBus::new(), 200));
        assert!(!manager.session().id.is_empty());
        assert!(!storage.contains(keys::SESSION));
    }

    #[test]
    fn test_corrupt_session_entry_resets() {
        let storage = MockStorage::new();
        storage.put_raw(keys::SESSION, "{not valid json");

        let manager = block_on(SessionManager::restore_or_create(&storage, EventBus::new(), 200));
        assert!(!manager.session().id.is_empty());
        // A fresh session replaced the corrupted entry
        let stored = block_on(storage.get(keys::SESSION)).unwrap().unwrap();
        let parsed: lexaid_types::session::Session = serde_json::from_slice(&stored).unwrap();
        assert_eq!(parsed.id, manager.session().id);
    }

    #[test]
    fn test_transcript_persist_reload_preserves_order_and_timestamps() {
        let storage = MockStorage::new();
        let mut manager =
            block_on(SessionManager::restore_or_create(&storage, EventBus::new(), 200));

        block_on(manager.add_message(&storage, Role::User, "first"));
        block_on(manager.add_message(&storage, Role::Assistant, "second"));
        block_on(manager.add_message(&storage, Role::User, "third"));

        let stamps: Vec<String> = manager
            .transcript()
            .iter()
            .map(|m| m.timestamp.clone())
            .collect();

        let reloaded = block_on(SessionManager::load_transcript(
            &storage,
            &manager.session().id,
            200,
        ));

        let pairs: Vec<(Role, String)> = reloaded
            .iter()
            .map(|m| (m.role.clone(), m.content.clone()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                (Role::User, "first".to_string()),
                (Role::Assistant, "second".to_string()),
                (Role::User, "third".to_string()),
            ]
        );
        // Timestamps come from storage, not re-stamped on load
        let reloaded_stamps: Vec<String> =
            reloaded.iter().map(|m| m.timestamp.clone()).collect();
        assert_eq!(reloaded_stamps, stamps);
    }

    #[test]
    fn test_corrupt_transcript_resets_and_clears_key() {
        let storage = MockStorage::new();
        let key = keys::transcript("s1");
        storage.put_raw(&key, "{{definitely not json");

        let transcript = block_on(SessionManager::load_transcript(&storage, "s1", 200));
        assert!(transcript.is_empty());
        assert!(!storage.contains(&key));
    }

    #[test]
    fn test_transcript_eviction_through_manager() {
        let storage = MockStorage::new();
        let mut manager =
            block_on(SessionManager::restore_or_create(&storage, EventBus::new(), 3));

        for i in 0..5 {
            block_on(manager.add_message(&storage, Role::User, format!("m{}", i)));
        }
        assert_eq!(manager.transcript().len(), 3);
        let contents: Vec<&str> = manager
            .transcript()
            .iter()
            .map(|m| m.content.as_str())
            .collect();
        assert_eq!(contents, vec!["m2", "m3", "m4"]);
    }

    #[test]
    fn test_history_index_updated_on_message() {
        let storage = MockStorage::new();
        let mut manager =
            block_on(SessionManager::restore_or_create(&storage, EventBus::new(), 200));

        block_on(manager.add_message(&storage, Role::User, "I need help with a lease dispute"));

        assert_eq!(manager.history().len(), 1);
        let entry = &manager.history().entries()[0];
        assert_eq!(entry.session_id, manager.session().id);
        assert!(entry.title.starts_with("I need help"));
        assert_eq!(entry.message_count, 1);
        assert!(storage.contains(keys::HISTORY_INDEX));
    }

    #[test]
    fn test_send_chat_success_appends_reply() {
        let storage = MockStorage::new();
        let bus = EventBus::new();
        let backend = MockBackend::healthy();
        let mut manager =
            block_on(SessionManager::restore_or_create(&storage, bus.clone(), 200));

        block_on(manager.send_chat(&backend, &storage, "hello")).unwrap();

        assert_eq!(backend.chat_calls.get(), 1);
        assert_eq!(manager.transcript().len(), 2);
        assert_eq!(manager.transcript().last().unwrap().role, Role::Assistant);
        assert_eq!(manager.transcript().last().unwrap().content, "echo: hello");

        let events = bus.drain();
        assert!(events
            .iter()
            .any(|e| matches!(e, ClientEvent::ChatReply { .. })));
    }

    #[test]
    fn test_send_chat_failure_generic_notice_no_retry() {
        let storage = MockStorage::new();
        let bus = EventBus::new();
        let backend = MockBackend::healthy();
        backend.chat_fails.set(true);
        let mut health = HealthMonitor::new(30_000);
        let mut manager =
            block_on(SessionManager::restore_or_create(&storage, bus.clone(), 200));

        let outcome = block_on(manager.send_chat(&backend, &storage, "hello"));
        assert!(outcome.is_err());
        // The caller flips the flag on a failed send
        health.mark_unreachable(&bus);

        // Exactly one attempt — the failed message is not resent
        assert_eq!(backend.chat_calls.get(), 1);
        // Only the user message made it into the transcript
        assert_eq!(manager.transcript().len(), 1);
        assert_eq!(manager.transcript().last().unwrap().role, Role::User);
        assert!(!health.reachable());

        let events = bus.drain();
        let failed = events
            .iter()
            .find_map(|e| match e {
                ClientEvent::ChatFailed { message } => Some(message.clone()),
                _ => None,
            })
            .expect("Missing ChatFailed event");
        assert!(failed.contains("try sending your message again"));
    }

    #[test]
    fn test_sync_remote_history_seeds_empty_transcript() {
        let storage = MockStorage::new();
        let backend = MockBackend::healthy();
        let mut manager =
            block_on(SessionManager::restore_or_create(&storage, EventBus::new(), 200));

        block_on(manager.sync_remote_history(&backend, &storage));

        assert_eq!(manager.transcript().len(), 1);
        let seeded = manager.transcript().last().unwrap();
        assert_eq!(seeded.content, "remote");
        // Server timestamps survive the seed
        assert_eq!(seeded.timestamp, "2026-08-01T00:00:00Z");
    }

    #[test]
    fn test_sync_remote_history_noop_when_local_exists() {
        let storage = MockStorage::new();
        let backend = MockBackend::healthy();
        let mut manager =
            block_on(SessionManager::restore_or_create(&storage, EventBus::new(), 200));

        block_on(manager.add_message(&storage, Role::User, "local"));
        block_on(manager.sync_remote_history(&backend, &storage));

        assert_eq!(manager.transcript().len(), 1);
        assert_eq!(manager.transcript().last().unwrap().content, "local");
    }

    #[test]
    fn test_pushed_message_persisted() {
        let storage = MockStorage::new();
        let mut manager =
            block_on(SessionManager::restore_or_create(&storage, EventBus::new(), 200));

        block_on(manager.add_pushed_message(&storage, "live lawyer reply"));

        let reloaded = block_on(SessionManager::load_transcript(
            &storage,
            &manager.session().id,
            200,
        ));
        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded.last().unwrap().role, Role::Assistant);
        assert_eq!(reloaded.last().unwrap().content, "live lawyer reply");
    }

    #[test]
    fn test_fetch_summary() {
        let storage = MockStorage::new();
        let backend = MockBackend::healthy();
        let manager =
            block_on(SessionManager::restore_or_create(&storage, EventBus::new(), 200));

        let summary = block_on(manager.fetch_summary(&backend));
        assert_eq!(summary.as_deref(), Some("summary"));
    }

    #[test]
    fn test_check_updates_requires_document_id() {
        let backend = MockBackend::healthy();
        let err = block_on(forms::check_document_updates(&backend, " ")).unwrap_err();
        assert!(matches!(err, ClientError::Validation { field } if field == "document_id"));

        let updates = block_on(forms::check_document_updates(&backend, "doc-1")).unwrap();
        assert_eq!(updates, vec!["guideline change"]);
    }

    #[test]
    fn test_cancel_requires_appointment_id() {
        let backend = MockBackend::healthy();
        let err = block_on(forms::cancel_appointment(&backend, "")).unwrap_err();
        assert!(matches!(err, ClientError::Validation { field } if field == "appointment_id"));
        assert!(block_on(forms::cancel_appointment(&backend, "ap1")).is_ok());
    }

    // ─── Health Monitor Tests ────────────────────────────────

    #[test]
    fn test_health_poll_gated_by_interval() {
        let backend = MockBackend::healthy();
        let bus = EventBus::new();
        let mut monitor = HealthMonitor::new(30_000);

        assert!(block_on(monitor.poll(&backend, 0, &bus)));
        // 5 seconds later: inside the interval, no second request
        assert!(block_on(monitor.poll(&backend, 5_000, &bus)));
        assert_eq!(backend.health_calls.get(), 1);

        // Past the interval: a new request goes out
        block_on(monitor.poll(&backend, 30_000, &bus));
        assert_eq!(backend.health_calls.get(), 2);
    }

    #[test]
    fn test_health_error_marks_unreachable() {
        let backend = MockBackend::default(); // health_ok = false
        let bus = EventBus::new();
        let mut monitor = HealthMonitor::new(30_000);

        let reachable = block_on(monitor.poll(&backend, 0, &bus));
        assert!(!reachable);
        assert!(!monitor.reachable());
        // No event on false → false; the flag started out false
        assert!(bus.drain().is_empty());
    }

    #[test]
    fn test_health_transition_emits_event() {
        let backend = MockBackend::healthy();
        let bus = EventBus::new();
        let mut monitor = HealthMonitor::new(30_000);

        block_on(monitor.poll(&backend, 0, &bus));
        let events = bus.drain();
        assert!(events.iter().any(|e| matches!(
            e,
            ClientEvent::ReachabilityChanged { reachable: true }
        )));

        backend.health_ok.set(false);
        block_on(monitor.poll(&backend, 60_000, &bus));
        let events = bus.drain();
        assert!(events.iter().any(|e| matches!(
            e,
            ClientEvent::ReachabilityChanged { reachable: false }
        )));
    }

    #[test]
    fn test_mark_unreachable_emits_once() {
        let bus = EventBus::new();
        let mut monitor = HealthMonitor::new(30_000);

        monitor.mark_unreachable(&bus);
        monitor.mark_unreachable(&bus);
        // Flag was already false, so no duplicate events
        assert!(bus.drain().is_empty());
    }

    // ─── Stream Supervisor Tests ─────────────────────────────

    #[test]
    fn test_reconnect_directive_per_closure_no_ceiling() {
        let bus = EventBus::new();
        let mut supervisor = StreamSupervisor::new(5_000);

        for _ in 0..50 {
            supervisor.on_connecting(&bus);
            let delay = supervisor.on_closed(&bus);
            assert_eq!(delay, 5_000);
        }
        // One attempt per induced closure, delay fixed, retries unbounded
        assert_eq!(supervisor.attempts(), 50);
        assert_eq!(supervisor.state(), ConnectionState::ReconnectScheduled);
    }

    #[test]
    fn test_stream_state_transitions_emit_events() {
        let bus = EventBus::new();
        let mut supervisor = StreamSupervisor::new(5_000);

        supervisor.on_connecting(&bus);
        supervisor.on_open(&bus);
        supervisor.on_closed(&bus);

        let states: Vec<ConnectionState> = bus
            .drain()
            .into_iter()
            .filter_map(|e| match e {
                ClientEvent::StreamState { state } => Some(state),
                _ => None,
            })
            .collect();
        assert_eq!(
            states,
            vec![
                ConnectionState::Connecting,
                ConnectionState::Open,
                ConnectionState::Closed,
                ConnectionState::ReconnectScheduled,
            ]
        );
    }

    #[test]
    fn test_dispatch_chat_frame() {
        let bus = EventBus::new();
        let mut supervisor = StreamSupervisor::new(5_000);
        let notifier = MockNotifier::new(false);
        let sub = NewsSubscription::default();

        let frame = r#"{"type":"chat_message","session_id":"s1","content":"pushed","timestamp":"2026-08-01T00:00:00Z"}"#;
        supervisor.dispatch(frame, &bus, &sub, &notifier);

        let events = bus.drain();
        assert!(events
            .iter()
            .any(|e| matches!(e, ClientEvent::ChatPushed { content, .. } if content == "pushed")));
    }

    #[test]
    fn test_dispatch_news_frame() {
        let bus = EventBus::new();
        let mut supervisor = StreamSupervisor::new(5_000);
        let notifier = MockNotifier::new(false);
        let sub = NewsSubscription::default();

        supervisor.dispatch(&news_frame("family_law"), &bus, &sub, &notifier);

        let events = bus.drain();
        assert!(events
            .iter()
            .any(|e| matches!(e, ClientEvent::NewsArrived { item } if item.id == "N1")));
    }

    #[test]
    fn test_malformed_frame_dropped_not_dispatched() {
        let bus = EventBus::new();
        let mut supervisor = StreamSupervisor::new(5_000);
        let notifier = MockNotifier::new(true);
        let sub = NewsSubscription::default();

        supervisor.dispatch("{{{{ not json", &bus, &sub, &notifier);
        supervisor.dispatch(r#"{"type":"mystery"}"#, &bus, &sub, &notifier);

        assert_eq!(supervisor.dropped_frames(), 2);
        assert!(bus.drain().is_empty());
        assert!(notifier.sent.borrow().is_empty());
    }

    #[test]
    fn test_decode_frame_errors_are_serialization() {
        let err = decode_frame("not json").unwrap_err();
        assert!(matches!(err, ClientError::Serialization(_)));
    }

    #[test]
    fn test_notification_fires_for_matching_subscription() {
        let bus = EventBus::new();
        let mut supervisor = StreamSupervisor::new(5_000);
        let notifier = MockNotifier::new(true);
        let sub = NewsSubscription {
            legal_areas: vec!["family_law".to_string()],
            jurisdictions: vec![],
        };

        supervisor.dispatch(&news_frame("family_law"), &bus, &sub, &notifier);

        assert_eq!(notifier.sent.borrow().len(), 1);
        assert_eq!(notifier.sent.borrow()[0].0, "Update");
        // Dispatch still happened
        assert_eq!(bus.drain().len(), 1);
    }

    #[test]
    fn test_no_notification_without_permission() {
        let bus = EventBus::new();
        let mut supervisor = StreamSupervisor::new(5_000);
        let notifier = MockNotifier::new(false);
        let sub = NewsSubscription {
            legal_areas: vec!["family_law".to_string()],
            jurisdictions: vec![],
        };

        supervisor.dispatch(&news_frame("family_law"), &bus, &sub, &notifier);

        assert!(notifier.sent.borrow().is_empty());
        assert_eq!(bus.drain().len(), 1);
    }

    #[test]
    fn test_no_notification_for_unmatched_category() {
        let bus = EventBus::new();
        let mut supervisor = StreamSupervisor::new(5_000);
        let notifier = MockNotifier::new(true);
        let sub = NewsSubscription {
            legal_areas: vec!["tax_law".to_string()],
            jurisdictions: vec![],
        };

        supervisor.dispatch(&news_frame("family_law"), &bus, &sub, &notifier);

        assert!(notifier.sent.borrow().is_empty());
        assert_eq!(bus.drain().len(), 1);
    }

    // ─── Form Controller Tests ───────────────────────────────

    fn nda_template() -> DocumentTemplate {
        builtin_templates()
            .into_iter()
            .find(|t| t.key == "nda")
            .unwrap()
    }

    fn nda_values() -> BTreeMap<String, String> {
        let mut values = BTreeMap::new();
        values.insert("party_a".to_string(), "Acme Corp".to_string());
        values.insert("party_b".to_string(), "Jane Doe".to_string());
        values.insert("purpose".to_string(), "Product evaluation".to_string());
        values.insert("term".to_string(), "2 years".to_string());
        values
    }

    #[test]
    fn test_nda_generate_issues_exactly_one_request() {
        let backend = MockBackend::healthy();
        let template = nda_template();
        let values = nda_values();

        let result = block_on(forms::generate_document(
            &backend,
            &template,
            &values,
            Some("California".to_string()),
        ));
        assert!(result.is_ok());

        let requests = backend.generate_requests.borrow();
        assert_eq!(requests.len(), 1);
        let req = &requests[0];
        assert_eq!(req.template_key, "nda");
        assert_eq!(req.parameters.get("party_a").unwrap(), "Acme Corp");
        assert_eq!(req.parameters.get("party_b").unwrap(), "Jane Doe");
        assert_eq!(req.parameters.get("purpose").unwrap(), "Product evaluation");
        assert_eq!(req.parameters.get("term").unwrap(), "2 years");
        assert_eq!(req.jurisdiction.as_deref(), Some("California"));
    }

    #[test]
    fn test_nda_missing_field_issues_zero_requests() {
        let backend = MockBackend::healthy();
        let template = nda_template();

        for missing in ["party_a", "party_b", "purpose", "term"] {
            let mut values = nda_values();
            values.remove(missing);

            let err = block_on(forms::generate_document(&backend, &template, &values, None))
                .unwrap_err();
            match err {
                ClientError::Validation { field } => assert_eq!(field, missing),
                other => panic!("Expected validation error, got {}", other),
            }
        }
        assert!(backend.generate_requests.borrow().is_empty());
    }

    #[test]
    fn test_nda_blank_field_rejected() {
        let backend = MockBackend::healthy();
        let template = nda_template();
        let mut values = nda_values();
        values.insert("term".to_string(), "   ".to_string());

        let err =
            block_on(forms::generate_document(&backend, &template, &values, None)).unwrap_err();
        assert!(matches!(err, ClientError::Validation { field } if field == "term"));
        assert!(backend.generate_requests.borrow().is_empty());
    }

    #[test]
    fn test_generate_omits_blank_optional_fields() {
        let backend = MockBackend::healthy();
        let template = nda_template();
        let mut values = nda_values();
        values.insert("jurisdiction".to_string(), "".to_string());

        block_on(forms::generate_document(&backend, &template, &values, None)).unwrap();

        let requests = backend.generate_requests.borrow();
        assert!(!requests[0].parameters.contains_key("jurisdiction"));
    }

    #[test]
    fn test_analyze_requires_document_text() {
        let backend = MockBackend::healthy();
        let err = block_on(forms::analyze_document(&backend, "  ", "nda", false)).unwrap_err();
        assert!(matches!(err, ClientError::Validation { field } if field == "document_text"));
        assert_eq!(backend.analyze_calls.get(), 0);
    }

    #[test]
    fn test_analyze_defaults_document_type() {
        let backend = MockBackend::healthy();
        let analysis =
            block_on(forms::analyze_document(&backend, "Lease text", "", false)).unwrap();
        assert_eq!(analysis.document_type, "general");
        assert_eq!(backend.analyze_calls.get(), 1);
    }

    #[test]
    fn test_match_lawyers_requires_issue() {
        let backend = MockBackend::healthy();
        let err = block_on(forms::match_lawyers(&backend, "", None, None)).unwrap_err();
        assert!(matches!(err, ClientError::Validation { .. }));

        let lawyers =
            block_on(forms::match_lawyers(&backend, "custody dispute", None, None)).unwrap();
        assert_eq!(lawyers.len(), 1);
        assert_eq!(lawyers[0].name, "Jane Doe");
    }

    #[test]
    fn test_book_appointment_validates_all_fields() {
        let backend = MockBackend::healthy();
        let err = block_on(forms::book_appointment(&backend, "lw1", "2026-08-10", "", "issue"))
            .unwrap_err();
        assert!(matches!(err, ClientError::Validation { field } if field == "time"));

        let appt = block_on(forms::book_appointment(
            &backend,
            "lw1",
            "2026-08-10",
            "09:30",
            "Lease dispute",
        ))
        .unwrap();
        assert_eq!(appt.status, "confirmed");
    }

    #[test]
    fn test_busy_guard_clears_on_both_paths() {
        let flag = BusyFlag::new();

        {
            let _guard = flag.acquire();
            assert!(flag.is_busy());
        }
        assert!(!flag.is_busy());

        // Error path: the guard drops during unwind-free early return too
        let backend = MockBackend::healthy();
        let result: lexaid_types::Result<()> = block_on(async {
            let _guard = flag.acquire();
            forms::match_lawyers(&backend, "", None, None).await?;
            Ok(())
        });
        assert!(result.is_err());
        assert!(!flag.is_busy());
    }

    #[test]
    fn test_subscribe_news_persists_filters() {
        let backend = MockBackend::healthy();
        let storage = MockStorage::new();
        let sub = NewsSubscription {
            legal_areas: vec!["employment_law".to_string()],
            jurisdictions: vec!["Federal".to_string()],
        };

        let id = block_on(forms::subscribe_news(&backend, &storage, &sub)).unwrap();
        assert_eq!(id, "sub-1");
        assert_eq!(backend.subscribe_calls.get(), 1);

        let loaded = block_on(forms::load_subscription(&storage));
        assert_eq!(loaded.legal_areas, vec!["employment_law"]);
    }

    #[test]
    fn test_subscribe_news_requires_areas() {
        let backend = MockBackend::healthy();
        let storage = MockStorage::new();
        let err = block_on(forms::subscribe_news(
            &backend,
            &storage,
            &NewsSubscription::default(),
        ))
        .unwrap_err();
        assert!(matches!(err, ClientError::Validation { field } if field == "legal_areas"));
        assert_eq!(backend.subscribe_calls.get(), 0);
    }

    #[test]
    fn test_corrupt_subscription_resets() {
        let storage = MockStorage::new();
        storage.put_raw(keys::NEWS_SUBSCRIPTION, "][");

        let loaded = block_on(forms::load_subscription(&storage));
        assert!(!loaded.is_active());
        assert!(!storage.contains(keys::NEWS_SUBSCRIPTION));
    }

    #[test]
    fn test_faq_search_records_history() {
        let backend = MockBackend::healthy();
        let storage = MockStorage::new();

        block_on(forms::search_faq(&backend, &storage, "tenant rights", None)).unwrap();
        block_on(forms::search_faq(&backend, &storage, "security deposit", None)).unwrap();
        block_on(forms::search_faq(&backend, &storage, "tenant rights", None)).unwrap();

        let recent = block_on(forms::load_recent(&storage, keys::FAQ_SEARCHES));
        // Most recent first, deduplicated
        assert_eq!(recent, vec!["tenant rights", "security deposit"]);
    }

    #[test]
    fn test_faq_search_history_rotates() {
        let backend = MockBackend::healthy();
        let storage = MockStorage::new();

        for i in 0..25 {
            block_on(forms::search_faq(&backend, &storage, &format!("query {}", i), None))
                .unwrap();
        }
        let recent = block_on(forms::load_recent(&storage, keys::FAQ_SEARCHES));
        assert_eq!(recent.len(), 20);
        assert_eq!(recent[0], "query 24");
    }

    #[test]
    fn test_faq_empty_query_no_network_call() {
        let backend = MockBackend::healthy();
        let storage = MockStorage::new();

        let err = block_on(forms::search_faq(&backend, &storage, "   ", None)).unwrap_err();
        assert!(matches!(err, ClientError::Validation { field } if field == "query"));
        assert_eq!(backend.faq_calls.get(), 0);
    }

    #[test]
    fn test_faq_feedback_recorded() {
        let backend = MockBackend::healthy();
        let storage = MockStorage::new();

        block_on(forms::send_faq_feedback(&backend, &storage, "faq1", true)).unwrap();
        block_on(forms::send_faq_feedback(&backend, &storage, "faq2", false)).unwrap();

        let recent = block_on(forms::load_recent(&storage, keys::FAQ_FEEDBACK));
        assert_eq!(recent, vec!["faq2:down", "faq1:up"]);
    }

    #[test]
    fn test_refresh_templates_falls_back_to_builtins() {
        struct EmptyTemplates;

        #[async_trait(?Send)]
        impl BackendPort for EmptyTemplates {
            async fn health(&self) -> Result<()> {
                Err(ClientError::Network("down".to_string()))
            }
            async fn send_chat(&self, _: &str, _: &str) -> Result<ChatReply> {
                Err(ClientError::Network("down".to_string()))
            }
            async fn fetch_history(&self, _: &str) -> Result<Vec<Message>> {
                Ok(Vec::new())
            }
            async fn fetch_summary(&self, _: &str) -> Result<String> {
                Ok(String::new())
            }
            async fn analyze_document(&self, _: AnalyzeRequest) -> Result<DocumentAnalysis> {
                Err(ClientError::Network("down".to_string()))
            }
            async fn generate_document(&self, _: GenerateRequest) -> Result<GeneratedDocument> {
                Err(ClientError::Network("down".to_string()))
            }
            async fn monitor_document(&self, _: MonitorRequest) -> Result<String> {
                Err(ClientError::Network("down".to_string()))
            }
            async fn check_document_updates(&self, _: &str) -> Result<Vec<String>> {
                Ok(Vec::new())
            }
            async fn fetch_templates(&self) -> Result<Vec<DocumentTemplate>> {
                Ok(Vec::new())
            }
            async fn match_lawyers(&self, _: MatchRequest) -> Result<Vec<Lawyer>> {
                Ok(Vec::new())
            }
            async fn fetch_slots(&self, _: &str, _: u32) -> Result<Vec<DaySlots>> {
                Ok(Vec::new())
            }
            async fn book_appointment(&self, _: BookingRequest) -> Result<Appointment> {
                Err(ClientError::Network("down".to_string()))
            }
            async fn cancel_appointment(&self, _: &str) -> Result<()> {
                Ok(())
            }
            async fn fetch_news(&self, page: u32, _: Option<&str>) -> Result<NewsPage> {
                Ok(NewsPage {
                    items: Vec::new(),
                    page,
                    total_pages: 0,
                })
            }
            async fn subscribe_news(&self, _: &NewsSubscription) -> Result<String> {
                Err(ClientError::Network("down".to_string()))
            }
            async fn search_faq(&self, _: &str, _: Option<&str>) -> Result<Vec<FaqEntry>> {
                Ok(Vec::new())
            }
            async fn fetch_faq_categories(&self) -> Result<Vec<String>> {
                Ok(Vec::new())
            }
            async fn send_faq_feedback(&self, _: &str, _: bool) -> Result<()> {
                Ok(())
            }
        }

        let templates = block_on(forms::refresh_templates(&EmptyTemplates));
        assert_eq!(templates.len(), 3);
    }

    // ─── EventBus Tests ──────────────────────────────────────

    #[test]
    fn test_event_bus_emit_and_drain() {
        let bus = EventBus::new();
        bus.emit(ClientEvent::ReachabilityChanged { reachable: true });
        bus.emit(ClientEvent::ChatFailed {
            message: "oops".to_string(),
        });

        assert!(bus.has_pending());
        let events = bus.drain();
        assert_eq!(events.len(), 2);
        assert!(!bus.has_pending());
    }

    #[test]
    fn test_event_bus_clone_shares_state() {
        let bus1 = EventBus::new();
        let bus2 = bus1.clone();

        bus1.emit(ClientEvent::ReachabilityChanged { reachable: false });
        assert!(bus2.has_pending());
        assert_eq!(bus2.drain().len(), 1);
        assert!(!bus1.has_pending());
    }
}
