//! In-process change hub.

use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use super::{ChangeEvent, ChangeFeed, ChangeKind, Subscription, SubscriptionRegistry};

const DEFAULT_CAPACITY: usize = 64;

/// Per-subscription buffer. One pending event already forces a refetch, so
/// a tiny buffer that drops overflow loses nothing observable.
const SUBSCRIBER_BUFFER: usize = 1;

/// Change feed that fans published events out to table subscribers.
#[derive(Debug, Clone)]
pub struct BroadcastChangeFeed {
    sender: broadcast::Sender<ChangeEvent>,
    registry: SubscriptionRegistry,
}

impl Default for BroadcastChangeFeed {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl BroadcastChangeFeed {
    /// Creates a hub buffering up to `capacity` undelivered events.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _receiver) = broadcast::channel(capacity.max(1));
        Self {
            sender,
            registry: SubscriptionRegistry::default(),
        }
    }

    /// Publishes an event to every subscriber of its table.
    ///
    /// Returns the number of subscriptions (across all tables) that saw it.
    pub fn publish(&self, event: ChangeEvent) -> usize {
        tracing::debug!(table = %event.table, kind = ?event.kind, "publishing change event");
        self.sender.send(event).unwrap_or(0)
    }
}

impl ChangeFeed for BroadcastChangeFeed {
    fn subscribe(&self, table: &str) -> Subscription {
        let mut upstream = self.sender.subscribe();
        let (events, receiver) = mpsc::channel(SUBSCRIBER_BUFFER);
        let wanted = table.to_owned();

        let worker = tokio::spawn(async move {
            loop {
                let event = match upstream.recv().await {
                    Ok(event) if event.table == wanted => event,
                    Ok(_) => continue,
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::debug!(table = %wanted, skipped, "change subscriber lagged");
                        ChangeEvent::new(wanted.clone(), ChangeKind::Unknown)
                    }
                    Err(RecvError::Closed) => break,
                };
                match events.try_send(event) {
                    Ok(()) | Err(TrySendError::Full(_)) => {}
                    Err(TrySendError::Closed(_)) => break,
                }
            }
        });

        Subscription::new(table, receiver, worker, &self.registry)
    }

    fn active_subscriptions(&self) -> usize {
        self.registry.active()
    }
}
