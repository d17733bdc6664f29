use crate::notification::Notification;

/// Surfaces transient, auto-dismissing messages to the user.
///
/// Fire-and-forget: the core never waits for a notification to be shown.
pub trait NotifierPort: Send + Sync {
    fn notify(&self, notification: Notification);
}
