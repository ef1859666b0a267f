//! Reconnecting stream supervisor.
//!
//! The platform driver owns the socket; this type owns the state machine
//! and frame dispatch. On close the supervisor hands back the fixed
//! reconnect delay — there is no backoff growth and no retry ceiling, so
//! the driver redials forever. The driver never opens a second socket
//! before the previous one reported closed.

use lexaid_types::{
    Result,
    config::NewsSubscription,
    event::{ClientEvent, ConnectionState, StreamFrame},
};
use crate::event_bus::EventBus;
use crate::ports::NotifyPort;

/// Decode one inbound text frame.
/// Malformed frames yield an error the dispatcher drops and logs.
pub fn decode_frame(text: &str) -> Result<StreamFrame> {
    serde_json::from_str(text).map_err(Into::into)
}

pub struct StreamSupervisor {
    state: ConnectionState,
    reconnect_delay_ms: u64,
    attempts: u64,
    dropped_frames: u64,
}

impl StreamSupervisor {
    pub fn new(reconnect_delay_ms: u64) -> Self {
        Self {
            state: ConnectionState::Closed,
            reconnect_delay_ms,
            attempts: 0,
            dropped_frames: 0,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Connection attempts so far, including the first dial.
    pub fn attempts(&self) -> u64 {
        self.attempts
    }

    /// Malformed frames dropped since page load.
    pub fn dropped_frames(&self) -> u64 {
        self.dropped_frames
    }

    /// The driver is dialing.
    pub fn on_connecting(&mut self, bus: &EventBus) {
        self.attempts += 1;
        self.transition(ConnectionState::Connecting, bus);
    }

    /// The socket opened.
    pub fn on_open(&mut self, bus: &EventBus) {
        self.transition(ConnectionState::Open, bus);
    }

    /// The socket closed (or failed to open). Returns the delay in
    /// milliseconds the driver must sleep before the next dial.
    pub fn on_closed(&mut self, bus: &EventBus) -> u64 {
        self.transition(ConnectionState::Closed, bus);
        self.transition(ConnectionState::ReconnectScheduled, bus);
        self.reconnect_delay_ms
    }

    /// Handle one inbound text frame: decode, dispatch to the bus, and
    /// fire a best-effort notification for subscribed news. A malformed
    /// frame is dropped and logged; it never faults the receive loop.
    pub fn dispatch(
        &mut self,
        text: &str,
        bus: &EventBus,
        subscription: &NewsSubscription,
        notifier: &dyn NotifyPort,
    ) {
        match decode_frame(text) {
            Ok(StreamFrame::ChatMessage { content, timestamp, .. }) => {
                bus.emit(ClientEvent::ChatPushed { content, timestamp });
            }
            Ok(StreamFrame::NewsUpdate { item }) => {
                if subscription.is_active()
                    && subscription.matches(&item)
                    && notifier.permission_granted()
                {
                    notifier.notify(&item.title, &item.summary);
                }
                bus.emit(ClientEvent::NewsArrived { item });
            }
            Err(e) => {
                self.dropped_frames += 1;
                log::warn!("Dropping malformed stream frame: {}", e);
            }
        }
    }

    fn transition(&mut self, state: ConnectionState, bus: &EventBus) {
        if self.state != state {
            self.state = state;
            bus.emit(ClientEvent::StreamState { state });
        }
    }
}
