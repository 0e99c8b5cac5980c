//! Change notification hub.
//!
//! Every write through a [`super::StoreAccessor`] publishes a
//! [`ChangeEvent`] here. All accessor clones over one backend share one hub,
//! so listeners in the writing context and in sibling contexts receive the
//! same event stream; the view layer's polling fallback covers anything a
//! listener misses.

use tokio::sync::broadcast;

/// Room for a burst of commits (a `save(All)` writes five keys at once)
/// before slow receivers start lagging. A lagged receiver just reloads.
const CHANNEL_CAPACITY: usize = 64;

/// A single store mutation: the key that changed. Consumers re-read full
/// snapshots rather than applying deltas, so no value travels with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub key: String,
}

/// Broadcast hub shared by all accessor clones over one backend.
#[derive(Clone)]
pub struct ChangeNotifier {
    tx: broadcast::Sender<ChangeEvent>,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    /// Publish a change. Delivery is at-least-once for receivers that are
    /// alive now; nobody listening is fine (the write already happened).
    pub fn publish(&self, key: &str) {
        let _ = self.tx.send(ChangeEvent {
            key: key.to_string(),
        });
    }

    /// Subscribe to changes from this point on. Events published before the
    /// subscription are not replayed; new listeners load current state on
    /// mount instead.
    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.tx.subscribe()
    }

    /// Number of live receivers, used by tests.
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for ChangeNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fan_out_to_all_receivers() {
        let notifier = ChangeNotifier::new();
        let mut rx1 = notifier.subscribe();
        let mut rx2 = notifier.subscribe();

        notifier.publish("rcl_week");

        assert_eq!(rx1.recv().await.unwrap().key, "rcl_week");
        assert_eq!(rx2.recv().await.unwrap().key, "rcl_week");
    }

    #[tokio::test]
    async fn test_publish_without_receivers_is_fine() {
        let notifier = ChangeNotifier::new();
        notifier.publish("rcl_schedule");
        assert_eq!(notifier.receiver_count(), 0);
    }

    #[tokio::test]
    async fn test_late_subscriber_sees_only_new_events() {
        let notifier = ChangeNotifier::new();
        notifier.publish("rcl_week");

        let mut rx = notifier.subscribe();
        notifier.publish("rcl_rules");

        assert_eq!(rx.recv().await.unwrap().key, "rcl_rules");
    }
}
