//! Backend availability polling.
//!
//! Wraps the health endpoint behind an interval gate: no matter how often
//! `poll` is called, at most one request goes out per configured interval.
//! Callers inject the current time so the gate stays pure and testable.

use lexaid_types::event::ClientEvent;
use crate::event_bus::EventBus;
use crate::ports::BackendPort;

pub struct HealthMonitor {
    interval_ms: u64,
    last_checked_at: Option<u64>,
    reachable: bool,
}

impl HealthMonitor {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            last_checked_at: None,
            reachable: false,
        }
    }

    /// True when the backend health endpoint last answered successfully.
    pub fn reachable(&self) -> bool {
        self.reachable
    }

    /// Whether enough time has passed for another request.
    pub fn is_due(&self, now_ms: u64) -> bool {
        match self.last_checked_at {
            None => true,
            Some(at) => now_ms.saturating_sub(at) >= self.interval_ms,
        }
    }

    /// Poll the health endpoint if due. A network error marks the backend
    /// unreachable instead of propagating. Returns the current flag.
    pub async fn poll(&mut self, api: &dyn BackendPort, now_ms: u64, bus: &EventBus) -> bool {
        if !self.is_due(now_ms) {
            return self.reachable;
        }
        self.last_checked_at = Some(now_ms);

        let ok = match api.health().await {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Health check failed: {}", e);
                false
            }
        };
        self.set_reachable(ok, bus);
        self.reachable
    }

    /// Flip the flag after a failed send without waiting for the next poll.
    pub fn mark_unreachable(&mut self, bus: &EventBus) {
        self.set_reachable(false, bus);
    }

    fn set_reachable(&mut self, ok: bool, bus: &EventBus) {
        if self.reachable != ok {
            self.reachable = ok;
            bus.emit(ClientEvent::ReachabilityChanged { reachable: ok });
        }
    }
}
