//! One-shot listing output.

use beam_site::{
    BeamConfig, ClassWorkshop, ListingConfig, ListingKind, ListingPage, Record, RecordStore,
    ResearchProject, ScienceHub, SiteError, StoreError, load_once,
};

use super::output::write_listing;
use super::{build_store, load_template};

/// Fetches the configured listing once and prints it.
///
/// The page is printed even when the fetch failed, so the error state is
/// visible; the failure is then returned so the process exits non-zero.
///
/// # Errors
///
/// Returns [`SiteError::Configuration`] for missing settings,
/// [`SiteError::Store`] when the fetch fails, and render or I/O errors from
/// printing.
pub async fn run(config: &BeamConfig) -> Result<(), SiteError> {
    let kind = config.require_listing()?;
    let store = build_store(config)?;
    let template = load_template(config)?;
    let listing = kind.config();

    let (page, failure) = match kind {
        ListingKind::Projects => {
            fetch_page::<ResearchProject>(config, &listing, store.as_ref()).await
        }
        ListingKind::Hubs => fetch_page::<ScienceHub>(config, &listing, store.as_ref()).await,
        ListingKind::Classes => {
            fetch_page::<ClassWorkshop>(config, &listing, store.as_ref()).await
        }
    };

    write_listing(&page, template.as_deref())?;
    failure.map_or(Ok(()), |error| Err(SiteError::Store(error)))
}

async fn fetch_page<R: Record>(
    config: &BeamConfig,
    listing: &ListingConfig,
    store: &dyn RecordStore,
) -> (ListingPage, Option<StoreError>) {
    let snapshot = load_once::<R>(
        listing.clone(),
        store,
        &config.requested_filters(),
        config.fetch_timeout(),
    )
    .await;
    let page = ListingPage::from_snapshot(listing, &snapshot);
    (page, snapshot.error)
}
