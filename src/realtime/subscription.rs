//! Scoped subscription handle.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::ChangeEvent;

/// Counts live subscriptions for one feed.
#[derive(Debug, Clone, Default)]
pub struct SubscriptionRegistry {
    active: Arc<AtomicUsize>,
}

impl SubscriptionRegistry {
    /// Number of subscriptions not yet dropped.
    #[must_use]
    pub fn active(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    fn register(&self) -> Registration {
        self.active.fetch_add(1, Ordering::SeqCst);
        Registration {
            active: Arc::clone(&self.active),
        }
    }
}

#[derive(Debug)]
struct Registration {
    active: Arc<AtomicUsize>,
}

impl Drop for Registration {
    fn drop(&mut self) {
        self.active.fetch_sub(1, Ordering::SeqCst);
    }
}

/// A live subscription to one table's change events.
///
/// Dropping the subscription aborts its worker and deregisters it.
#[derive(Debug)]
pub struct Subscription {
    table: String,
    events: mpsc::Receiver<ChangeEvent>,
    worker: JoinHandle<()>,
    _registration: Registration,
}

impl Subscription {
    pub(super) fn new(
        table: &str,
        events: mpsc::Receiver<ChangeEvent>,
        worker: JoinHandle<()>,
        registry: &SubscriptionRegistry,
    ) -> Self {
        Self {
            table: table.to_owned(),
            events,
            worker,
            _registration: registry.register(),
        }
    }

    /// Waits for the next change event.
    ///
    /// Returns `None` once the feed side has shut down.
    pub async fn next(&mut self) -> Option<ChangeEvent> {
        self.events.recv().await
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.worker.abort();
        tracing::debug!(table = %self.table, "change subscription released");
    }
}
