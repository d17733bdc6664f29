use std::time::Duration;

use tracing::{info, warn};
use rc_core::ports::NotifierPort;
use rc_core::{Notification, Severity};

/// Emits notifications as log events on the `rollcall::notify` target.
///
/// Display duration is attached as a field so a front end subscribed to the
/// target can dismiss the message on time.
pub struct TracingNotifier {
    duration: Duration,
}

impl TracingNotifier {
    pub fn new(duration: Duration) -> Self {
        Self { duration }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }
}

impl NotifierPort for TracingNotifier {
    fn notify(&self, notification: Notification) {
        let display_ms = self.duration.as_millis() as u64;
        match notification.severity() {
            Severity::Info => {
                info!(target: "rollcall::notify", display_ms, "{}", notification)
            }
            Severity::Error => {
                warn!(target: "rollcall::notify", display_ms, "{}", notification)
            }
        }
    }
}
