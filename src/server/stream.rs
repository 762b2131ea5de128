//! Live listing stream.
//!
//! Each connection mounts its own listing controller and forwards every
//! published snapshot as a `snapshot` event carrying the listing page JSON.
//! The controller handle lives inside the response stream, so a client
//! disconnect drops the stream, stops the controller, and releases its
//! change subscription.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use futures_util::stream::{self, BoxStream};
use futures_util::StreamExt as _;
use tokio_stream::wrappers::WatchStream;

use super::AppState;
use super::error::ApiError;
use super::routes::parse_kind;
use crate::catalog::{ClassWorkshop, Record, ResearchProject, ScienceHub};
use crate::listing::{FilterSelection, ListingConfig, ListingKind, ListingPage, mount};
use crate::realtime::ChangeFeed;

type EventStream = BoxStream<'static, Result<Event, axum::Error>>;

const SNAPSHOT_EVENT: &str = "snapshot";

pub(super) async fn listing_stream(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Query(params): Query<BTreeMap<String, String>>,
) -> Result<Sse<EventStream>, ApiError> {
    let listing_kind = parse_kind(&kind)?;
    let requested: FilterSelection = params.into_iter().collect();
    let config = listing_kind.config();
    tracing::debug!(listing = config.name, "listing stream opened");

    let events = match listing_kind {
        ListingKind::Projects => snapshot_events::<ResearchProject>(&state, config, &requested),
        ListingKind::Hubs => snapshot_events::<ScienceHub>(&state, config, &requested),
        ListingKind::Classes => snapshot_events::<ClassWorkshop>(&state, config, &requested),
    };
    Ok(Sse::new(events).keep_alive(KeepAlive::default()))
}

fn snapshot_events<R: Record>(
    state: &AppState,
    config: ListingConfig,
    requested: &FilterSelection,
) -> EventStream {
    let feed: &dyn ChangeFeed = state.changes.as_ref();
    let handle = mount::<R>(
        config.clone(),
        Arc::clone(&state.store),
        Some(feed),
        requested,
        state.listing_options.clone(),
    );
    let updates = WatchStream::new(handle.snapshots());

    stream::unfold(
        (handle, updates, config),
        |(handle, mut updates, listing)| async move {
            let snapshot = updates.next().await?;
            let page = ListingPage::from_snapshot(&listing, &snapshot);
            let event = Event::default().event(SNAPSHOT_EVENT).json_data(&page);
            Some((event, (handle, updates, listing)))
        },
    )
    .boxed()
}
