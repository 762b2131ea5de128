//! Running fetches against a [`RecordStore`].

use std::time::Duration;

use serde_json::Value;

use super::config::ListingConfig;
use super::filters::FilterSelection;
use super::view::{ListingSnapshot, ListingView};
use crate::catalog::Record;
use crate::store::{RecordStore, StoreError, StoreQuery};

/// Runs `query` and decodes every row as `R`.
///
/// A store that does not answer within `timeout` yields
/// [`StoreError::Timeout`]; any row that does not decode fails the whole
/// fetch with [`StoreError::Decode`].
///
/// # Errors
///
/// Returns the store's error, a timeout, or a decode failure.
pub async fn fetch_records<R: Record>(
    store: &dyn RecordStore,
    query: &StoreQuery,
    timeout: Duration,
) -> Result<Vec<R>, StoreError> {
    let rows = tokio::time::timeout(timeout, store.query(query))
        .await
        .map_err(|_elapsed| StoreError::Timeout {
            seconds: timeout.as_secs(),
        })??;
    decode_rows(&query.table, rows)
}

fn decode_rows<R: Record>(table: &str, rows: Vec<Value>) -> Result<Vec<R>, StoreError> {
    rows.into_iter()
        .map(|row| {
            serde_json::from_value(row).map_err(|error| StoreError::Decode {
                message: format!("{table} row: {error}"),
            })
        })
        .collect()
}

/// Fetches one listing page without mounting a controller.
///
/// Used for single-shot requests where no live refresh is wanted.
pub async fn load_once<R: Record>(
    config: ListingConfig,
    store: &dyn RecordStore,
    requested: &FilterSelection,
    timeout: Duration,
) -> ListingSnapshot<R> {
    let mut view = ListingView::new(config, requested);
    let ticket = view.refresh();
    let result = fetch_records(store, &ticket.query, timeout).await;
    if let Err(error) = &result {
        tracing::warn!(listing = view.config().name, %error, "listing fetch failed");
    }
    view.complete(ticket.generation, result);
    view.snapshot()
}
