//! Async owner of one mounted listing.
//!
//! [`mount`] spawns a controller task that owns a [`ListingView`] and
//! processes one message at a time: filter changes, refresh requests, table
//! change notifications, and fetch completions. Fetches run as child tasks
//! in a [`JoinSet`] and report back with their generation, so completions
//! may arrive in any order without racing on the view.
//!
//! The controller holds the listing's change [`Subscription`] for as long
//! as it runs. Stopping the controller, whether through
//! [`ListingHandle::unmount`], by dropping the handle, or by the task
//! ending, drops the subscription with it.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::{self, JoinError, JoinHandle, JoinSet};

use super::config::ListingConfig;
use super::fetch::fetch_records;
use super::filters::FilterSelection;
use super::view::{FetchOutcome, FetchTicket, ListingSnapshot, ListingView};
use crate::catalog::Record;
use crate::realtime::{ChangeEvent, ChangeFeed, Subscription};
use crate::store::{RecordStore, StoreError};
use crate::telemetry::{NoopTelemetrySink, TelemetryEvent, TelemetrySink};

/// Default bound on a single fetch.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Runtime knobs for a mounted listing.
#[derive(Clone)]
pub struct ListingOptions {
    /// Bound on each fetch; exceeding it puts the listing in its error
    /// state.
    pub fetch_timeout: Duration,
    /// Destination for fetch telemetry.
    pub telemetry: Arc<dyn TelemetrySink>,
}

impl Default for ListingOptions {
    fn default() -> Self {
        Self {
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            telemetry: Arc::new(NoopTelemetrySink),
        }
    }
}

impl std::fmt::Debug for ListingOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListingOptions")
            .field("fetch_timeout", &self.fetch_timeout)
            .finish_non_exhaustive()
    }
}

#[derive(Debug)]
enum Command {
    ApplyFilters(FilterSelection),
    Refresh,
}

type Completion<R> = (u64, Result<Vec<R>, StoreError>);

/// Handle to a mounted listing.
///
/// Dropping the handle stops the controller.
#[derive(Debug)]
pub struct ListingHandle<R> {
    commands: mpsc::UnboundedSender<Command>,
    snapshots: watch::Receiver<ListingSnapshot<R>>,
    task: Option<JoinHandle<()>>,
}

/// Mounts a listing and starts its first fetch.
///
/// When the listing is configured for live updates and a `feed` is given,
/// one subscription to the listing's table is taken here and held until the
/// controller stops. Must be called from within a Tokio runtime.
pub fn mount<R: Record>(
    config: ListingConfig,
    store: Arc<dyn RecordStore>,
    feed: Option<&dyn ChangeFeed>,
    initial: &FilterSelection,
    options: ListingOptions,
) -> ListingHandle<R> {
    let subscription = feed
        .filter(|_| config.live_updates)
        .map(|changes| changes.subscribe(config.table));
    let view = ListingView::new(config, initial);
    let (snapshot_tx, snapshot_rx) = watch::channel(view.snapshot());
    let (command_tx, command_rx) = mpsc::unbounded_channel();

    let controller = Controller {
        view,
        store,
        options,
        snapshots: snapshot_tx,
        fetches: JoinSet::new(),
        in_flight: HashMap::new(),
    };
    let task = tokio::spawn(controller.run(command_rx, subscription));

    ListingHandle {
        commands: command_tx,
        snapshots: snapshot_rx,
        task: Some(task),
    }
}

impl<R: Clone> ListingHandle<R> {
    /// Replaces the filters and refetches.
    ///
    /// Returns `false` when the controller has already stopped.
    pub fn apply_filters(&self, requested: FilterSelection) -> bool {
        self.commands.send(Command::ApplyFilters(requested)).is_ok()
    }

    /// Refetches with the current filters.
    ///
    /// Returns `false` when the controller has already stopped.
    pub fn refresh(&self) -> bool {
        self.commands.send(Command::Refresh).is_ok()
    }

    /// Receiver that observes every published snapshot.
    #[must_use]
    pub fn snapshots(&self) -> watch::Receiver<ListingSnapshot<R>> {
        self.snapshots.clone()
    }

    /// Latest published snapshot.
    #[must_use]
    pub fn current(&self) -> ListingSnapshot<R> {
        self.snapshots.borrow().clone()
    }

    /// Stops the controller and waits for it to release its resources.
    pub async fn unmount(mut self) {
        let task = self.task.take();
        drop(self);
        if let Some(running) = task {
            if let Err(error) = running.await {
                if !error.is_cancelled() {
                    tracing::warn!(%error, "listing controller ended abnormally");
                }
            }
        }
    }
}

impl<R> Drop for ListingHandle<R> {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

struct Controller<R> {
    view: ListingView<R>,
    store: Arc<dyn RecordStore>,
    options: ListingOptions,
    snapshots: watch::Sender<ListingSnapshot<R>>,
    fetches: JoinSet<Completion<R>>,
    in_flight: HashMap<task::Id, u64>,
}

impl<R: Record> Controller<R> {
    async fn run(
        mut self,
        mut commands: mpsc::UnboundedReceiver<Command>,
        mut subscription: Option<Subscription>,
    ) {
        let initial = self.view.refresh();
        self.start(initial);

        loop {
            tokio::select! {
                command = commands.recv() => {
                    let Some(received) = command else {
                        break;
                    };
                    let ticket = match received {
                        Command::ApplyFilters(requested) => self.view.apply_filters(&requested),
                        Command::Refresh => self.view.refresh(),
                    };
                    self.start(ticket);
                }
                Some(joined) = self.fetches.join_next_with_id(), if !self.fetches.is_empty() => {
                    match joined {
                        Ok((id, (generation, result))) => {
                            self.in_flight.remove(&id);
                            self.finish(generation, result);
                        }
                        Err(error) => self.abandon(&error),
                    }
                }
                change = next_change(subscription.as_mut()) => {
                    if let Some(event) = change {
                        tracing::debug!(
                            listing = self.view.config().name,
                            kind = ?event.kind,
                            "table changed, refetching"
                        );
                        let ticket = self.view.refresh();
                        self.start(ticket);
                    } else {
                        tracing::debug!(
                            listing = self.view.config().name,
                            "change feed closed"
                        );
                        subscription = None;
                    }
                }
            }
        }

        tracing::debug!(listing = self.view.config().name, "listing unmounted");
    }

    fn start(&mut self, ticket: FetchTicket) {
        tracing::debug!(
            listing = self.view.config().name,
            generation = ticket.generation,
            "issuing listing fetch"
        );
        let store = Arc::clone(&self.store);
        let timeout = self.options.fetch_timeout;
        let generation = ticket.generation;
        let spawned = self.fetches.spawn(async move {
            let result = fetch_records::<R>(store.as_ref(), &ticket.query, timeout).await;
            (ticket.generation, result)
        });
        self.in_flight.insert(spawned.id(), generation);
        self.publish();
    }

    /// Settles the generation of a fetch task that panicked or was cancelled.
    fn abandon(&mut self, error: &JoinError) {
        let Some(generation) = self.in_flight.remove(&error.id()) else {
            tracing::warn!(%error, "untracked listing fetch task failed");
            return;
        };
        self.finish(
            generation,
            Err(StoreError::Network {
                message: format!("fetch task ended abnormally: {error}"),
            }),
        );
    }

    fn finish(&mut self, generation: u64, result: Result<Vec<R>, StoreError>) {
        let listing = self.view.config().name.to_owned();
        let event = match &result {
            Ok(records) => TelemetryEvent::ListingFetched {
                listing: listing.clone(),
                generation,
                records: records.len(),
            },
            Err(error) => TelemetryEvent::ListingFetchFailed {
                listing: listing.clone(),
                generation,
                message: error.to_string(),
            },
        };

        match self.view.complete(generation, result) {
            FetchOutcome::Applied => {
                if let TelemetryEvent::ListingFetchFailed { message, .. } = &event {
                    tracing::error!(%listing, generation, error = %message, "listing fetch failed");
                }
                self.options.telemetry.record(event);
                self.publish();
            }
            FetchOutcome::Superseded => {
                let latest = self.view.generation();
                tracing::debug!(%listing, generation, latest, "discarding superseded fetch");
                self.options
                    .telemetry
                    .record(TelemetryEvent::ListingFetchDiscarded {
                        listing,
                        generation,
                        latest,
                    });
            }
        }
    }

    fn publish(&self) {
        self.snapshots.send_replace(self.view.snapshot());
    }
}

async fn next_change(subscription: Option<&mut Subscription>) -> Option<ChangeEvent> {
    match subscription {
        Some(active) => active.next().await,
        None => std::future::pending().await,
    }
}
