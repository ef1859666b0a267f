//! Native notification adapter over web-sys.
//!
//! Best-effort only: the client never requests permission itself and a
//! failed notification is logged and swallowed.

use lexaid_core::ports::NotifyPort;
use web_sys::{Notification, NotificationOptions, NotificationPermission};

pub struct WebNotifier;

impl NotifyPort for WebNotifier {
    fn permission_granted(&self) -> bool {
        Notification::permission() == NotificationPermission::Granted
    }

    fn notify(&self, title: &str, body: &str) {
        let options = NotificationOptions::new();
        options.set_body(body);
        if let Err(e) = Notification::new_with_options(title, &options) {
            log::warn!("Notification failed: {:?}", e);
        }
    }
}
