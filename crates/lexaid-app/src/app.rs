//! Main egui application — composes all panels and wires the controllers.
//!
//! This is the single composition root: storage, backend, event bus,
//! session manager, health monitor, and stream driver are constructed
//! here and handed to panels as explicit state. Async work runs via
//! `spawn_local` and lands either on the event bus or in a result slot
//! applied to the view on the next frame.

use std::cell::RefCell;
use std::rc::Rc;

use egui::{self, CentralPanel, RichText, SidePanel, TopBottomPanel};

use lexaid_core::event_bus::EventBus;
use lexaid_core::forms;
use lexaid_core::health::HealthMonitor;
use lexaid_core::keys;
use lexaid_core::ports::{NotifyPort, StoragePort};
use lexaid_core::session::SessionManager;
use lexaid_core::stream::StreamSupervisor;
use lexaid_platform::http::GlooBackend;
use lexaid_platform::notify::WebNotifier;
use lexaid_platform::storage::auto_detect_storage;
use lexaid_platform::stream::{spawn_stream_client, StreamHandle};
use lexaid_types::api::{
    Appointment, DaySlots, DocumentAnalysis, DocumentTemplate, FaqEntry, GeneratedDocument,
    Lawyer, NewsPage,
};
use lexaid_types::config::{ClientConfig, NewsSubscription, Preferences};
use lexaid_types::event::ClientEvent;
use lexaid_ui::panels::{
    chat::{self, ChatAction},
    documents::{self, DocumentAction},
    faq::{self, FaqAction},
    lawyers::{self, LawyerAction},
    news::{self, NewsAction},
    settings::{self, SaveFeedback, SettingsAction},
};
use lexaid_ui::state::{Tab, UiState};
use lexaid_ui::theme;

type Slot<T> = Rc<RefCell<Option<T>>>;

fn slot<T>() -> Slot<T> {
    Rc::new(RefCell::new(None))
}

fn now_ms() -> u64 {
    js_sys::Date::now() as u64
}

/// Build an absolute ws:// / wss:// URL from a same-origin path.
fn websocket_url(path: &str) -> String {
    if path.starts_with("ws://") || path.starts_with("wss://") {
        return path.to_string();
    }
    let location = match web_sys::window().map(|w| w.location()) {
        Some(location) => location,
        None => return path.to_string(),
    };
    let protocol = match location.protocol().as_deref() {
        Ok("https:") => "wss:",
        _ => "ws:",
    };
    let host = location.host().unwrap_or_default();
    format!("{}//{}{}", protocol, host, path)
}

/// Results of in-flight panel requests, applied to the view each frame.
struct Pending {
    analysis: Slot<lexaid_types::Result<DocumentAnalysis>>,
    generated: Slot<lexaid_types::Result<GeneratedDocument>>,
    monitor: Slot<lexaid_types::Result<String>>,
    templates: Slot<Vec<DocumentTemplate>>,
    lawyers: Slot<lexaid_types::Result<Vec<Lawyer>>>,
    slots: Slot<lexaid_types::Result<Vec<DaySlots>>>,
    booking: Slot<lexaid_types::Result<Appointment>>,
    news: Slot<lexaid_types::Result<NewsPage>>,
    subscribe: Slot<lexaid_types::Result<String>>,
    faq: Slot<lexaid_types::Result<Vec<FaqEntry>>>,
    faq_categories: Slot<Vec<String>>,
    recent_searches: Slot<Vec<String>>,
    summary: Slot<String>,
    update_notes: Slot<lexaid_types::Result<Vec<String>>>,
    cancel: Slot<lexaid_types::Result<()>>,
}

impl Pending {
    fn new() -> Self {
        Self {
            analysis: slot(),
            generated: slot(),
            monitor: slot(),
            templates: slot(),
            lawyers: slot(),
            slots: slot(),
            booking: slot(),
            news: slot(),
            subscribe: slot(),
            faq: slot(),
            faq_categories: slot(),
            recent_searches: slot(),
            summary: slot(),
            update_notes: slot(),
            cancel: slot(),
        }
    }
}

/// The main application state
pub struct LexAidApp {
    ui_state: UiState,
    config: ClientConfig,
    prefs: Preferences,
    event_bus: EventBus,
    storage: Rc<dyn StoragePort>,
    backend: Rc<GlooBackend>,
    manager: Rc<RefCell<Option<SessionManager>>>,
    manager_seeded: bool,
    health: Rc<RefCell<HealthMonitor>>,
    subscription: Rc<RefCell<NewsSubscription>>,
    stream_handle: StreamHandle,
    pending: Pending,
    prefs_slot: Slot<Preferences>,
    save_feedback: Option<SaveFeedback>,
    first_frame: bool,
}

impl LexAidApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let egui_ctx = cc.egui_ctx.clone();
        let config = ClientConfig::default();
        let event_bus = EventBus::new();
        let storage = auto_detect_storage();
        let backend = Rc::new(GlooBackend::new(config.api.base_url.clone()));
        let notifier: Rc<dyn NotifyPort> = Rc::new(WebNotifier);

        let health = Rc::new(RefCell::new(HealthMonitor::new(config.health.interval_ms)));
        let supervisor = Rc::new(RefCell::new(StreamSupervisor::new(
            config.stream.reconnect_delay_ms,
        )));
        let subscription = Rc::new(RefCell::new(NewsSubscription::default()));

        let manager = Rc::new(RefCell::new(None));
        Self::restore_session(
            storage.clone(),
            backend.clone(),
            manager.clone(),
            event_bus.clone(),
            config.transcript_capacity,
        );

        let prefs_slot = slot();
        Self::restore_preferences(storage.clone(), prefs_slot.clone());
        Self::restore_subscription(storage.clone(), subscription.clone());

        let stream_handle = spawn_stream_client(
            websocket_url(&config.stream.url),
            supervisor,
            event_bus.clone(),
            subscription.clone(),
            notifier,
        );

        let ui_state = UiState::new();
        let pending = Pending::new();

        let app = Self {
            ui_state,
            config,
            prefs: Preferences::default(),
            event_bus,
            storage,
            backend,
            manager,
            manager_seeded: false,
            health,
            subscription,
            stream_handle,
            pending,
            prefs_slot,
            save_feedback: None,
            first_frame: true,
        };

        // Initial data loads
        app.load_templates(&egui_ctx);
        app.load_faq_categories(&egui_ctx);
        app.load_recent_searches(&egui_ctx);
        app.dispatch_news_page(1, &egui_ctx);

        app
    }

    // ── Async restore helpers ────────────────────────────────

    fn restore_session(
        storage: Rc<dyn StoragePort>,
        backend: Rc<GlooBackend>,
        manager: Rc<RefCell<Option<SessionManager>>>,
        event_bus: EventBus,
        transcript_capacity: usize,
    ) {
        wasm_bindgen_futures::spawn_local(async move {
            let mut restored = SessionManager::restore_or_create(
                storage.as_ref(),
                event_bus,
                transcript_capacity,
            )
            .await;
            restored
                .sync_remote_history(backend.as_ref(), storage.as_ref())
                .await;
            *manager.borrow_mut() = Some(restored);
        });
    }

    fn restore_preferences(storage: Rc<dyn StoragePort>, prefs_slot: Slot<Preferences>) {
        wasm_bindgen_futures::spawn_local(async move {
            if let Ok(Some(bytes)) = storage.get(keys::PREFERENCES).await {
                match serde_json::from_slice::<Preferences>(&bytes) {
                    Ok(prefs) => {
                        *prefs_slot.borrow_mut() = Some(prefs);
                        log::info!("Preferences restored from storage");
                    }
                    Err(e) => {
                        log::warn!("Corrupt preferences, resetting: {}", e);
                        let _ = storage.delete(keys::PREFERENCES).await;
                    }
                }
            }
        });
    }

    fn restore_subscription(
        storage: Rc<dyn StoragePort>,
        subscription: Rc<RefCell<NewsSubscription>>,
    ) {
        wasm_bindgen_futures::spawn_local(async move {
            let restored = forms::load_subscription(storage.as_ref()).await;
            *subscription.borrow_mut() = restored;
        });
    }

    fn save_preferences(&self) {
        if let Ok(bytes) = serde_json::to_vec(&self.prefs) {
            let storage = self.storage.clone();
            wasm_bindgen_futures::spawn_local(async move {
                if let Err(e) = storage.set(keys::PREFERENCES, &bytes).await {
                    log::warn!("Could not persist preferences: {}", e);
                } else {
                    log::info!("Preferences saved to storage");
                }
            });
        }
    }

    fn rebuild_backend(&mut self) {
        self.backend = Rc::new(GlooBackend::new(self.config.api.base_url.clone()));
    }

    // ── Initial loads ────────────────────────────────────────

    fn load_templates(&self, ctx: &egui::Context) {
        let backend = self.backend.clone();
        let templates = self.pending.templates.clone();
        let ctx = ctx.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let fetched = forms::refresh_templates(backend.as_ref()).await;
            *templates.borrow_mut() = Some(fetched);
            ctx.request_repaint();
        });
    }

    fn load_faq_categories(&self, ctx: &egui::Context) {
        let backend = self.backend.clone();
        let categories = self.pending.faq_categories.clone();
        let ctx = ctx.clone();
        wasm_bindgen_futures::spawn_local(async move {
            match forms::fetch_faq_categories(backend.as_ref()).await {
                Ok(fetched) => {
                    *categories.borrow_mut() = Some(fetched);
                    ctx.request_repaint();
                }
                Err(e) => log::warn!("Could not fetch FAQ categories: {}", e),
            }
        });
    }

    fn load_recent_searches(&self, ctx: &egui::Context) {
        let storage = self.storage.clone();
        let recent_slot = self.pending.recent_searches.clone();
        let ctx = ctx.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let recent = forms::load_recent(storage.as_ref(), keys::FAQ_SEARCHES).await;
            if !recent.is_empty() {
                *recent_slot.borrow_mut() = Some(recent);
                ctx.request_repaint();
            }
        });
    }

    // ── Dispatchers ──────────────────────────────────────────

    fn dispatch_chat(&self, text: String, ctx: &egui::Context) {
        let manager = self.manager.clone();
        let backend = self.backend.clone();
        let storage = self.storage.clone();
        let health = self.health.clone();
        let event_bus = self.event_bus.clone();
        let busy = self.ui_state.chat.busy.clone();
        let ctx = ctx.clone();

        wasm_bindgen_futures::spawn_local(async move {
            let _guard = busy.acquire();
            let outcome = {
                let mut manager_ref = manager.borrow_mut();
                match manager_ref.as_mut() {
                    Some(m) => m.send_chat(backend.as_ref(), storage.as_ref(), &text).await,
                    None => {
                        // Session restore has not finished yet
                        event_bus.emit(ClientEvent::ChatFailed {
                            message: "Still loading your session — please try again in a moment."
                                .to_string(),
                        });
                        Ok(())
                    }
                }
            };
            if outcome.is_err() {
                // A poll in flight already owns the monitor and will
                // observe the outage itself
                if let Ok(mut h) = health.try_borrow_mut() {
                    h.mark_unreachable(&event_bus);
                }
            }
            ctx.request_repaint();
        });
    }

    fn dispatch_summary(&self, ctx: &egui::Context) {
        let manager = self.manager.clone();
        let backend = self.backend.clone();
        let result = self.pending.summary.clone();
        let busy = self.ui_state.chat.busy.clone();
        let ctx = ctx.clone();

        wasm_bindgen_futures::spawn_local(async move {
            let _guard = busy.acquire();
            let manager_ref = manager.borrow();
            if let Some(m) = manager_ref.as_ref() {
                if let Some(summary) = m.fetch_summary(backend.as_ref()).await {
                    *result.borrow_mut() = Some(summary);
                }
            }
            ctx.request_repaint();
        });
    }

    fn dispatch_analyze(&self, ctx: &egui::Context) {
        let backend = self.backend.clone();
        let result = self.pending.analysis.clone();
        let busy = self.ui_state.documents.busy.clone();
        let text = self.ui_state.documents.analyze_text.clone();
        let doc_type = self.ui_state.documents.analyze_type.clone();
        let redact_pii = self.prefs.privacy.redact_pii;
        let ctx = ctx.clone();

        wasm_bindgen_futures::spawn_local(async move {
            let _guard = busy.acquire();
            let outcome =
                forms::analyze_document(backend.as_ref(), &text, &doc_type, redact_pii).await;
            *result.borrow_mut() = Some(outcome);
            ctx.request_repaint();
        });
    }

    fn dispatch_generate(&self, ctx: &egui::Context) {
        let template = match self.ui_state.documents.selected_template() {
            Some(template) => template.clone(),
            None => return,
        };
        let backend = self.backend.clone();
        let result = self.pending.generated.clone();
        let busy = self.ui_state.documents.busy.clone();
        let values = self.ui_state.documents.field_values.clone();
        let jurisdiction = Some(self.prefs.jurisdiction.clone());
        let ctx = ctx.clone();

        wasm_bindgen_futures::spawn_local(async move {
            let _guard = busy.acquire();
            let outcome =
                forms::generate_document(backend.as_ref(), &template, &values, jurisdiction).await;
            *result.borrow_mut() = Some(outcome);
            ctx.request_repaint();
        });
    }

    fn dispatch_monitor(&self, ctx: &egui::Context) {
        let backend = self.backend.clone();
        let result = self.pending.monitor.clone();
        let busy = self.ui_state.documents.busy.clone();
        let document_id = self.ui_state.documents.monitor_id.clone();
        let document_text = self.ui_state.documents.analyze_text.clone();
        let document_type = self.ui_state.documents.analyze_type.clone();
        let jurisdiction = self.prefs.jurisdiction.clone();
        let ctx = ctx.clone();

        wasm_bindgen_futures::spawn_local(async move {
            let _guard = busy.acquire();
            let outcome = forms::monitor_document(
                backend.as_ref(),
                &document_id,
                &document_text,
                &document_type,
                Vec::new(),
                &jurisdiction,
            )
            .await;
            *result.borrow_mut() = Some(outcome);
            ctx.request_repaint();
        });
    }

    fn dispatch_update_check(&self, ctx: &egui::Context) {
        let backend = self.backend.clone();
        let result = self.pending.update_notes.clone();
        let busy = self.ui_state.documents.busy.clone();
        let document_id = self.ui_state.documents.monitor_id.clone();
        let ctx = ctx.clone();

        wasm_bindgen_futures::spawn_local(async move {
            let _guard = busy.acquire();
            let outcome = forms::check_document_updates(backend.as_ref(), &document_id).await;
            *result.borrow_mut() = Some(outcome);
            ctx.request_repaint();
        });
    }

    fn dispatch_match(&self, ctx: &egui::Context) {
        let backend = self.backend.clone();
        let result = self.pending.lawyers.clone();
        let busy = self.ui_state.lawyers.busy.clone();
        let issue = self.ui_state.lawyers.issue.clone();
        let jurisdiction = match self.ui_state.lawyers.jurisdiction.trim() {
            "" => None,
            j => Some(j.to_string()),
        };
        let language = Some(self.prefs.language.clone());
        let ctx = ctx.clone();

        wasm_bindgen_futures::spawn_local(async move {
            let _guard = busy.acquire();
            let outcome =
                forms::match_lawyers(backend.as_ref(), &issue, jurisdiction, language).await;
            *result.borrow_mut() = Some(outcome);
            ctx.request_repaint();
        });
    }

    fn dispatch_slots(&self, lawyer_id: String, ctx: &egui::Context) {
        let backend = self.backend.clone();
        let result = self.pending.slots.clone();
        let busy = self.ui_state.lawyers.busy.clone();
        let ctx = ctx.clone();

        wasm_bindgen_futures::spawn_local(async move {
            let _guard = busy.acquire();
            let outcome = forms::fetch_slots(backend.as_ref(), &lawyer_id, 7).await;
            *result.borrow_mut() = Some(outcome);
            ctx.request_repaint();
        });
    }

    fn dispatch_book(&self, ctx: &egui::Context) {
        let backend = self.backend.clone();
        let result = self.pending.booking.clone();
        let busy = self.ui_state.lawyers.busy.clone();
        let lawyer_id = self
            .ui_state
            .lawyers
            .selected_lawyer
            .clone()
            .unwrap_or_default();
        let date = self.ui_state.lawyers.booking_date.clone();
        let time = self.ui_state.lawyers.booking_time.clone();
        let issue = self.ui_state.lawyers.booking_issue.clone();
        let ctx = ctx.clone();

        wasm_bindgen_futures::spawn_local(async move {
            let _guard = busy.acquire();
            let outcome =
                forms::book_appointment(backend.as_ref(), &lawyer_id, &date, &time, &issue).await;
            *result.borrow_mut() = Some(outcome);
            ctx.request_repaint();
        });
    }

    fn dispatch_cancel_booking(&self, ctx: &egui::Context) {
        let appointment_id = match &self.ui_state.lawyers.confirmation {
            Some(confirmation) => confirmation.appointment_id.clone(),
            None => return,
        };
        let backend = self.backend.clone();
        let result = self.pending.cancel.clone();
        let busy = self.ui_state.lawyers.busy.clone();
        let ctx = ctx.clone();

        wasm_bindgen_futures::spawn_local(async move {
            let _guard = busy.acquire();
            let outcome = forms::cancel_appointment(backend.as_ref(), &appointment_id).await;
            *result.borrow_mut() = Some(outcome);
            ctx.request_repaint();
        });
    }

    fn dispatch_news_page(&self, page: u32, ctx: &egui::Context) {
        let backend = self.backend.clone();
        let result = self.pending.news.clone();
        let busy = self.ui_state.news.busy.clone();
        let ctx = ctx.clone();

        wasm_bindgen_futures::spawn_local(async move {
            let _guard = busy.acquire();
            let outcome = forms::fetch_news_page(backend.as_ref(), page, None).await;
            *result.borrow_mut() = Some(outcome);
            ctx.request_repaint();
        });
    }

    fn dispatch_subscribe(&self, ctx: &egui::Context) {
        let backend = self.backend.clone();
        let storage = self.storage.clone();
        let result = self.pending.subscribe.clone();
        let busy = self.ui_state.news.busy.clone();
        let subscription_cell = self.subscription.clone();
        let jurisdiction = self.prefs.jurisdiction.clone();
        let requested = NewsSubscription {
            legal_areas: self
                .ui_state
                .news
                .subscribed_areas
                .split(',')
                .map(|a| a.trim().to_string())
                .filter(|a| !a.is_empty())
                .collect(),
            jurisdictions: vec![jurisdiction],
        };
        let ctx = ctx.clone();

        wasm_bindgen_futures::spawn_local(async move {
            let _guard = busy.acquire();
            let outcome = forms::subscribe_news(backend.as_ref(), storage.as_ref(), &requested).await;
            if outcome.is_ok() {
                *subscription_cell.borrow_mut() = requested;
            }
            *result.borrow_mut() = Some(outcome);
            ctx.request_repaint();
        });
    }

    fn dispatch_faq_search(&self, ctx: &egui::Context) {
        let backend = self.backend.clone();
        let storage = self.storage.clone();
        let result = self.pending.faq.clone();
        let recent_slot = self.pending.recent_searches.clone();
        let busy = self.ui_state.faq.busy.clone();
        let query = self.ui_state.faq.query.clone();
        let category = self.ui_state.faq.selected_category.clone();
        let ctx = ctx.clone();

        wasm_bindgen_futures::spawn_local(async move {
            let _guard = busy.acquire();
            let outcome =
                forms::search_faq(backend.as_ref(), storage.as_ref(), &query, category.as_deref())
                    .await;
            if outcome.is_ok() {
                let recent = forms::load_recent(storage.as_ref(), keys::FAQ_SEARCHES).await;
                *recent_slot.borrow_mut() = Some(recent);
            }
            *result.borrow_mut() = Some(outcome);
            ctx.request_repaint();
        });
    }

    fn dispatch_faq_feedback(&self, faq_id: String, helpful: bool) {
        let backend = self.backend.clone();
        let storage = self.storage.clone();

        wasm_bindgen_futures::spawn_local(async move {
            if let Err(e) =
                forms::send_faq_feedback(backend.as_ref(), storage.as_ref(), &faq_id, helpful).await
            {
                log::warn!("FAQ feedback failed: {}", e);
            }
        });
    }

    // ── Frame bookkeeping ────────────────────────────────────

    fn poll_health(&self, ctx: &egui::Context) {
        let now = now_ms();
        let due = self
            .health
            .try_borrow()
            .map(|h| h.is_due(now))
            .unwrap_or(false);
        if !due {
            return;
        }
        let health = self.health.clone();
        let backend = self.backend.clone();
        let event_bus = self.event_bus.clone();
        let ctx = ctx.clone();

        wasm_bindgen_futures::spawn_local(async move {
            // A send in flight holds the monitor; skip this round
            if let Ok(mut h) = health.try_borrow_mut() {
                h.poll(backend.as_ref(), now, &event_bus).await;
            }
            ctx.request_repaint();
        });
    }

    /// Pushed chat messages also belong in the durable transcript.
    /// Best-effort: skipped when a send currently owns the manager.
    fn persist_pushed_message(&self, content: String) {
        let manager = self.manager.clone();
        let storage = self.storage.clone();
        wasm_bindgen_futures::spawn_local(async move {
            if let Ok(mut manager_ref) = manager.try_borrow_mut() {
                if let Some(m) = manager_ref.as_mut() {
                    m.add_pushed_message(storage.as_ref(), &content).await;
                }
            }
        });
    }

    fn seed_from_manager(&mut self) {
        if self.manager_seeded {
            return;
        }
        if let Ok(manager_ref) = self.manager.try_borrow() {
            if let Some(manager) = manager_ref.as_ref() {
                self.ui_state.load_transcript(manager.transcript());
                self.manager_seeded = true;
            }
        }
    }

    fn apply_restored_preferences(&mut self, ctx: &egui::Context) {
        if let Some(prefs) = self.prefs_slot.borrow_mut().take() {
            self.prefs = prefs;
            theme::apply_theme(ctx, &self.prefs.theme);
        }
    }

    fn apply_pending(&mut self) {
        if let Some(result) = self.pending.analysis.borrow_mut().take() {
            match result {
                Ok(analysis) => {
                    self.ui_state.documents.analysis = Some(analysis);
                    self.ui_state.documents.error = None;
                }
                Err(e) => self.ui_state.documents.error = Some(e.to_string()),
            }
        }

        if let Some(result) = self.pending.generated.borrow_mut().take() {
            match result {
                Ok(generated) => {
                    self.ui_state.documents.generated = Some(generated);
                    self.ui_state.documents.error = None;
                }
                Err(e) => self.ui_state.documents.error = Some(e.to_string()),
            }
        }

        if let Some(result) = self.pending.monitor.borrow_mut().take() {
            match result {
                Ok(document_id) => {
                    self.ui_state.documents.monitor_confirmation =
                        Some(format!("Monitoring registered for {}", document_id));
                    self.ui_state.documents.error = None;
                }
                Err(e) => self.ui_state.documents.error = Some(e.to_string()),
            }
        }

        if let Some(templates) = self.pending.templates.borrow_mut().take() {
            if !templates.is_empty() {
                self.ui_state.documents.templates = templates;
                if self.ui_state.documents.selected_template
                    >= self.ui_state.documents.templates.len()
                {
                    self.ui_state.documents.select_template(0);
                }
            }
        }

        if let Some(result) = self.pending.lawyers.borrow_mut().take() {
            match result {
                Ok(lawyers) => {
                    self.ui_state.lawyers.results = lawyers;
                    self.ui_state.lawyers.error = None;
                }
                Err(e) => self.ui_state.lawyers.error = Some(e.to_string()),
            }
        }

        if let Some(result) = self.pending.slots.borrow_mut().take() {
            match result {
                Ok(slots) => {
                    self.ui_state.lawyers.slots = slots;
                    self.ui_state.lawyers.error = None;
                }
                Err(e) => self.ui_state.lawyers.error = Some(e.to_string()),
            }
        }

        if let Some(result) = self.pending.booking.borrow_mut().take() {
            match result {
                Ok(appointment) => {
                    self.ui_state.lawyers.confirmation = Some(appointment);
                    self.ui_state.lawyers.error = None;
                }
                Err(e) => self.ui_state.lawyers.error = Some(e.to_string()),
            }
        }

        if let Some(result) = self.pending.news.borrow_mut().take() {
            match result {
                Ok(page) => {
                    self.ui_state.news.items = page.items;
                    self.ui_state.news.page = page.page;
                    self.ui_state.news.total_pages = page.total_pages;
                    self.ui_state.news.error = None;
                }
                Err(e) => self.ui_state.news.error = Some(e.to_string()),
            }
        }

        if let Some(result) = self.pending.subscribe.borrow_mut().take() {
            match result {
                Ok(_) => {
                    self.ui_state.news.subscription_confirmed = true;
                    self.ui_state.news.error = None;
                }
                Err(e) => self.ui_state.news.error = Some(e.to_string()),
            }
        }

        if let Some(result) = self.pending.faq.borrow_mut().take() {
            match result {
                Ok(results) => {
                    self.ui_state.faq.results = results;
                    self.ui_state.faq.error = None;
                }
                Err(e) => self.ui_state.faq.error = Some(e.to_string()),
            }
        }

        if let Some(categories) = self.pending.faq_categories.borrow_mut().take() {
            self.ui_state.faq.categories = categories;
        }

        if let Some(recent) = self.pending.recent_searches.borrow_mut().take() {
            self.ui_state.faq.recent_searches = recent;
        }

        if let Some(summary) = self.pending.summary.borrow_mut().take() {
            self.ui_state.chat.entries.push(lexaid_ui::state::ChatEntry {
                role: "system".to_string(),
                content: format!("Conversation summary: {}", summary),
                timestamp: String::new(),
            });
        }

        if let Some(result) = self.pending.update_notes.borrow_mut().take() {
            match result {
                Ok(notes) => {
                    self.ui_state.documents.update_notes = notes;
                    self.ui_state.documents.error = None;
                }
                Err(e) => self.ui_state.documents.error = Some(e.to_string()),
            }
        }

        if let Some(result) = self.pending.cancel.borrow_mut().take() {
            match result {
                Ok(()) => {
                    self.ui_state.lawyers.confirmation = None;
                    self.ui_state.lawyers.error = None;
                }
                Err(e) => self.ui_state.lawyers.error = Some(e.to_string()),
            }
        }
    }
}

impl eframe::App for LexAidApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.first_frame {
            theme::apply_theme(ctx, &self.prefs.theme);
            self.first_frame = false;
        }

        self.apply_restored_preferences(ctx);
        self.seed_from_manager();
        self.apply_pending();
        self.poll_health(ctx);

        // Drain controller events into the view-model
        let events = self.event_bus.drain();
        if !events.is_empty() {
            for event in &events {
                if let ClientEvent::ChatPushed { content, .. } = event {
                    self.persist_pushed_message(content.clone());
                }
            }
            self.ui_state.process_events(events);
            ctx.request_repaint();
        }

        // ── Top bar ──────────────────────────────────────────
        TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(
                    RichText::new("LexAid")
                        .strong()
                        .color(theme::ACCENT)
                        .size(16.0),
                );
                ui.separator();
                for tab in Tab::all() {
                    if ui
                        .selectable_label(self.ui_state.active_tab == *tab, tab.label())
                        .clicked()
                    {
                        self.ui_state.active_tab = *tab;
                    }
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui
                        .selectable_label(self.ui_state.show_settings, "Settings")
                        .clicked()
                    {
                        self.ui_state.show_settings = !self.ui_state.show_settings;
                    }
                    ui.label(
                        RichText::new(format!("stream: {}", self.ui_state.stream_label()))
                            .color(theme::TEXT_SECONDARY)
                            .small(),
                    );
                });
            });
        });

        // ── Settings side panel ──────────────────────────────
        if self.ui_state.show_settings {
            SidePanel::right("settings_panel")
                .min_width(280.0)
                .max_width(350.0)
                .show(ctx, |ui| {
                    match settings::settings_panel(
                        ui,
                        &mut self.prefs,
                        &mut self.config,
                        self.save_feedback.as_ref(),
                    ) {
                        SettingsAction::Changed => {
                            theme::apply_theme(ctx, &self.prefs.theme);
                            self.rebuild_backend();
                        }
                        SettingsAction::SaveClicked => {
                            theme::apply_theme(ctx, &self.prefs.theme);
                            self.rebuild_backend();
                            self.save_preferences();
                            self.save_feedback = Some(SaveFeedback {
                                message: "Saved".to_string(),
                                success: true,
                            });
                        }
                        SettingsAction::None => {}
                    }
                });
        }

        // ── Main content ─────────────────────────────────────
        CentralPanel::default().show(ctx, |ui| match self.ui_state.active_tab {
            Tab::Chat => {
                if let Some(action) = chat::chat_panel(ui, &mut self.ui_state) {
                    match action {
                        ChatAction::Send(message) => self.dispatch_chat(message, ctx),
                        ChatAction::Summarize => self.dispatch_summary(ctx),
                    }
                }
            }
            Tab::Documents => {
                if let Some(action) = documents::documents_panel(ui, &mut self.ui_state) {
                    match action {
                        DocumentAction::Analyze => self.dispatch_analyze(ctx),
                        DocumentAction::Generate => self.dispatch_generate(ctx),
                        DocumentAction::Monitor => self.dispatch_monitor(ctx),
                        DocumentAction::CheckUpdates => self.dispatch_update_check(ctx),
                    }
                }
            }
            Tab::Lawyers => {
                if let Some(action) = lawyers::lawyers_panel(ui, &mut self.ui_state) {
                    match action {
                        LawyerAction::Match => self.dispatch_match(ctx),
                        LawyerAction::LoadSlots(lawyer_id) => self.dispatch_slots(lawyer_id, ctx),
                        LawyerAction::Book => self.dispatch_book(ctx),
                        LawyerAction::CancelBooking => self.dispatch_cancel_booking(ctx),
                    }
                }
            }
            Tab::News => {
                if let Some(action) = news::news_panel(ui, &mut self.ui_state) {
                    match action {
                        NewsAction::LoadPage(page) => self.dispatch_news_page(page, ctx),
                        NewsAction::Subscribe => self.dispatch_subscribe(ctx),
                    }
                }
            }
            Tab::Faq => {
                if let Some(action) = faq::faq_panel(ui, &mut self.ui_state) {
                    match action {
                        FaqAction::Search => self.dispatch_faq_search(ctx),
                        FaqAction::Feedback { faq_id, helpful } => {
                            self.dispatch_faq_feedback(faq_id, helpful)
                        }
                    }
                }
            }
        });
    }
}

impl Drop for LexAidApp {
    fn drop(&mut self) {
        self.stream_handle.stop();
    }
}
