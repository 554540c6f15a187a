//! User-facing notification delivery
//!
//! Every submission ends in exactly one [`Notification`], handed to the
//! injected [`Notifier`]. How it reaches the user (a desktop toast, a browser
//! notification, a log line) is up to the embedder.

use tokio::sync::broadcast;

use crate::types::Notification;

/// Sink for end-of-submission notifications
pub trait Notifier: Send + Sync {
    /// Deliver one notification; must not block
    fn notify(&self, notification: Notification);
}

/// Fans notifications out to any number of subscribers
///
/// Sending with no subscribers is not an error; the notification is dropped.
#[derive(Clone, Debug)]
pub struct BroadcastNotifier {
    tx: broadcast::Sender<Notification>,
}

impl BroadcastNotifier {
    /// Create a notifier buffering up to `capacity` undelivered notifications
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Subscribe to notifications sent after this call
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.tx.subscribe()
    }
}

impl Default for BroadcastNotifier {
    fn default() -> Self {
        Self::new(16)
    }
}

impl Notifier for BroadcastNotifier {
    fn notify(&self, notification: Notification) {
        self.tx.send(notification).ok();
    }
}

/// Writes notifications to the log
#[derive(Clone, Copy, Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: Notification) {
        tracing::info!(title = %notification.title, "{}", notification.message);
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn broadcast_reaches_every_subscriber() {
        let notifier = BroadcastNotifier::new(4);
        let mut first = notifier.subscribe();
        let mut second = notifier.subscribe();

        notifier.notify(Notification::new("Task sent successfully!"));

        for rx in [&mut first, &mut second] {
            let received = rx.recv().await.unwrap();
            assert_eq!(received.title, "SynoSend");
            assert_eq!(received.message, "Task sent successfully!");
        }
    }

    #[test]
    fn broadcast_without_subscribers_is_silent() {
        let notifier = BroadcastNotifier::default();
        notifier.notify(Notification::new("nobody listening"));
    }

    #[test]
    fn log_notifier_accepts_notifications() {
        LogNotifier.notify(Notification::new("logged"));
    }
}
