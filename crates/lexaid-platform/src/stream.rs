//! WebSocket driver for the reconnecting stream client.
//!
//! One spawned task owns the socket for its whole lifetime: it dials,
//! pumps inbound frames into the supervisor, and on closure sleeps the
//! supervisor's fixed delay before dialing again — forever. Because the
//! loop only dials after the previous socket ended, there is never a
//! second live connection.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use futures::StreamExt;
use gloo_net::websocket::{futures::WebSocket, Message as WsMessage};
use gloo_timers::future::TimeoutFuture;

use lexaid_core::event_bus::EventBus;
use lexaid_core::ports::NotifyPort;
use lexaid_core::stream::StreamSupervisor;
use lexaid_types::config::NewsSubscription;

/// Handle for shutting the driver down (page teardown, tests).
pub struct StreamHandle {
    stop: Rc<Cell<bool>>,
}

impl StreamHandle {
    pub fn stop(&self) {
        self.stop.set(true);
    }
}

/// Spawn the socket-owning task. The subscription cell is shared with the
/// settings panel so filter changes apply to the next frame immediately.
pub fn spawn_stream_client(
    url: String,
    supervisor: Rc<RefCell<StreamSupervisor>>,
    event_bus: EventBus,
    subscription: Rc<RefCell<NewsSubscription>>,
    notifier: Rc<dyn NotifyPort>,
) -> StreamHandle {
    let stop = Rc::new(Cell::new(false));
    let stop_flag = stop.clone();

    wasm_bindgen_futures::spawn_local(async move {
        loop {
            if stop_flag.get() {
                break;
            }

            supervisor.borrow_mut().on_connecting(&event_bus);

            match WebSocket::open(&url) {
                Ok(mut socket) => {
                    supervisor.borrow_mut().on_open(&event_bus);

                    while let Some(frame) = socket.next().await {
                        if stop_flag.get() {
                            break;
                        }
                        match frame {
                            Ok(WsMessage::Text(text)) => {
                                supervisor.borrow_mut().dispatch(
                                    &text,
                                    &event_bus,
                                    &subscription.borrow(),
                                    notifier.as_ref(),
                                );
                            }
                            Ok(WsMessage::Bytes(_)) => {
                                log::warn!("Ignoring binary stream frame");
                            }
                            Err(e) => {
                                log::warn!("Stream read error: {:?}", e);
                                break;
                            }
                        }
                    }
                }
                Err(e) => {
                    log::warn!("Stream dial failed: {:?}", e);
                }
            }

            if stop_flag.get() {
                break;
            }
            let delay_ms = supervisor.borrow_mut().on_closed(&event_bus);
            TimeoutFuture::new(delay_ms as u32).await;
        }
        log::info!("Stream client stopped");
    });

    StreamHandle { stop }
}
