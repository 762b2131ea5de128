//! Table change notifications.
//!
//! A [`ChangeFeed`] hands out one [`Subscription`] per interested listing.
//! Events carry no row detail: consumers only learn that a table may have
//! changed and refetch. Each subscription owns a background worker that is
//! aborted when the subscription drops, so releasing a subscription is the
//! same as letting it go out of scope.
//!
//! Two feeds are provided:
//!
//! - [`BroadcastChangeFeed`]: an in-process hub fed by whoever calls
//!   [`BroadcastChangeFeed::publish`] (the database webhook route does).
//! - [`PollingChangeFeed`]: fingerprints the table through a
//!   [`RecordStore`](crate::store::RecordStore) on a fixed interval.

mod broadcast;
mod polling;
mod subscription;

pub use broadcast::BroadcastChangeFeed;
pub use polling::PollingChangeFeed;
pub use subscription::{Subscription, SubscriptionRegistry};

use serde::{Deserialize, Serialize};

/// Kind of change reported for a table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeKind {
    /// A row was inserted.
    Insert,
    /// A row was updated.
    Update,
    /// A row was deleted.
    Delete,
    /// Something changed but the source did not say what.
    #[default]
    #[serde(other)]
    Unknown,
}

/// A "table changed" signal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEvent {
    /// Table that changed.
    pub table: String,
    /// What happened, if known.
    pub kind: ChangeKind,
}

impl ChangeEvent {
    /// Creates an event for `table`.
    #[must_use]
    pub fn new(table: impl Into<String>, kind: ChangeKind) -> Self {
        Self {
            table: table.into(),
            kind,
        }
    }
}

/// Source of per-table change subscriptions.
///
/// Subscribing spawns a worker task, so it must be called from within a
/// Tokio runtime.
pub trait ChangeFeed: Send + Sync {
    /// Subscribes to changes on `table`.
    fn subscribe(&self, table: &str) -> Subscription;

    /// Number of subscriptions currently alive.
    fn active_subscriptions(&self) -> usize;
}
