//! Change feed that polls the record store.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::time::MissedTickBehavior;

use super::{ChangeEvent, ChangeFeed, ChangeKind, Subscription, SubscriptionRegistry};
use crate::store::{OrderBy, RecordStore, StoreQuery};

/// Change feed that re-reads a whole table every `interval` and reports a
/// change whenever the table's fingerprint moves.
///
/// The first poll only records a baseline. Failed polls are logged and
/// skipped; they neither emit an event nor reset the baseline.
#[derive(Clone)]
pub struct PollingChangeFeed {
    store: Arc<dyn RecordStore>,
    interval: Duration,
    registry: SubscriptionRegistry,
}

impl std::fmt::Debug for PollingChangeFeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PollingChangeFeed")
            .field("interval", &self.interval)
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

impl PollingChangeFeed {
    /// Creates a feed polling `store` every `interval`.
    #[must_use]
    pub fn new(store: Arc<dyn RecordStore>, interval: Duration) -> Self {
        Self {
            store,
            interval,
            registry: SubscriptionRegistry::default(),
        }
    }
}

impl ChangeFeed for PollingChangeFeed {
    fn subscribe(&self, table: &str) -> Subscription {
        let (events, receiver) = mpsc::channel(1);
        let store = Arc::clone(&self.store);
        let interval = self.interval;
        let watched = table.to_owned();

        let worker = tokio::spawn(async move {
            let query = StoreQuery::table(watched.clone()).order_by(OrderBy::ascending("id"));
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            let mut baseline: Option<u64> = None;

            loop {
                ticker.tick().await;
                let rows = match store.query(&query).await {
                    Ok(rows) => rows,
                    Err(error) => {
                        tracing::warn!(table = %watched, %error, "change poll failed");
                        continue;
                    }
                };
                let current = fingerprint(&rows);
                let changed = baseline.is_some_and(|previous| previous != current);
                baseline = Some(current);
                if !changed {
                    continue;
                }
                match events.try_send(ChangeEvent::new(watched.clone(), ChangeKind::Unknown)) {
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

fn fingerprint(rows: &[Value]) -> u64 {
    let mut hasher = DefaultHasher::new();
    rows.len().hash(&mut hasher);
    for row in rows {
        row.to_string().hash(&mut hasher);
    }
    hasher.finish()
}
