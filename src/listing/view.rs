//! Listing state machine.
//!
//! [`ListingView`] holds one listing's filters, records, and load state and
//! decides which fetch results may be shown. It performs no I/O: callers
//! run the [`FetchTicket`]s it issues and hand the results back through
//! [`ListingView::complete`]. Every ticket carries a generation number and
//! only a completion for the most recently issued generation is applied.
//! Anything older is dropped on arrival, so a slow response to an earlier
//! filter choice can never overwrite, or briefly replace, a newer one.

use serde::Serialize;

use super::config::ListingConfig;
use super::filters::FilterSelection;
use crate::store::{StoreError, StoreQuery};

/// Where a listing is in its fetch cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadState {
    /// A fetch is in flight.
    Loading,
    /// The latest fetch succeeded.
    Ready,
    /// The latest fetch failed.
    Error,
}

/// A fetch the caller must run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    /// Generation to report back with the result.
    pub generation: u64,
    /// Query to send to the store.
    pub query: StoreQuery,
}

/// What [`ListingView::complete`] did with a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The result belonged to the latest fetch and is now shown.
    Applied,
    /// A newer fetch had been issued; the result was dropped.
    Superseded,
}

/// One listing's state.
#[derive(Debug, Clone)]
pub struct ListingView<R> {
    config: ListingConfig,
    filters: FilterSelection,
    records: Vec<R>,
    state: LoadState,
    error: Option<StoreError>,
    generation: u64,
}

impl<R: Clone> ListingView<R> {
    /// Creates a view with `initial` filters and nothing fetched yet.
    #[must_use]
    pub fn new(config: ListingConfig, initial: &FilterSelection) -> Self {
        let filters = config.resolve(initial);
        Self {
            config,
            filters,
            records: Vec::new(),
            state: LoadState::Loading,
            error: None,
            generation: 0,
        }
    }

    /// Replaces the active filters and issues a fetch for them.
    pub fn apply_filters(&mut self, requested: &FilterSelection) -> FetchTicket {
        self.filters = self.config.resolve(requested);
        self.issue()
    }

    /// Issues a fetch with the current filters.
    pub fn refresh(&mut self) -> FetchTicket {
        self.issue()
    }

    fn issue(&mut self) -> FetchTicket {
        self.generation = self.generation.saturating_add(1);
        self.state = LoadState::Loading;
        FetchTicket {
            generation: self.generation,
            query: self.config.query_for(&self.filters),
        }
    }

    /// Hands back the result of the fetch issued as `generation`.
    ///
    /// A success replaces the whole record set; a failure clears it so that
    /// stale rows are never shown next to an error.
    pub fn complete(
        &mut self,
        generation: u64,
        result: Result<Vec<R>, StoreError>,
    ) -> FetchOutcome {
        if generation != self.generation {
            return FetchOutcome::Superseded;
        }
        match result {
            Ok(records) => {
                self.records = records;
                self.error = None;
                self.state = LoadState::Ready;
            }
            Err(error) => {
                self.records.clear();
                self.error = Some(error);
                self.state = LoadState::Error;
            }
        }
        FetchOutcome::Applied
    }

    /// Current load state.
    #[must_use]
    pub const fn state(&self) -> LoadState {
        self.state
    }

    /// Generation of the most recently issued fetch.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Active, normalised filters.
    #[must_use]
    pub const fn filters(&self) -> &FilterSelection {
        &self.filters
    }

    /// Listing configuration.
    #[must_use]
    pub const fn config(&self) -> &ListingConfig {
        &self.config
    }

    /// Records to display. Empty unless the view is [`LoadState::Ready`].
    #[must_use]
    pub fn records(&self) -> &[R] {
        match self.state {
            LoadState::Ready => &self.records,
            LoadState::Loading | LoadState::Error => &[],
        }
    }

    /// Copies the displayable state.
    #[must_use]
    pub fn snapshot(&self) -> ListingSnapshot<R> {
        ListingSnapshot {
            listing: self.config.name,
            generation: self.generation,
            state: self.state,
            filters: self.filters.clone(),
            records: self.records().to_vec(),
            error: self.error.clone().filter(|_| self.state == LoadState::Error),
        }
    }
}

/// Point-in-time copy of a [`ListingView`].
#[derive(Debug, Clone, PartialEq)]
pub struct ListingSnapshot<R> {
    /// Listing name.
    pub listing: &'static str,
    /// Generation of the most recently issued fetch.
    pub generation: u64,
    /// Load state.
    pub state: LoadState,
    /// Active filters.
    pub filters: FilterSelection,
    /// Records to display.
    pub records: Vec<R>,
    /// Failure behind an error state.
    pub error: Option<StoreError>,
}

impl<R> ListingSnapshot<R> {
    /// `true` for a successful fetch that matched nothing, which is shown
    /// as "no results" rather than as an error.
    #[must_use]
    pub fn is_empty_result(&self) -> bool {
        self.state == LoadState::Ready && self.records.is_empty()
    }
}
