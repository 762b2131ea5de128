//! Watch mode: reprint a listing whenever its table changes.

use std::io;
use std::sync::Arc;

use beam_site::{
    BeamConfig, ChangeFeed, ClassWorkshop, ListingConfig, ListingKind, ListingOptions, ListingPage,
    LoadState, PollingChangeFeed, Record, RecordStore, ResearchProject, ScienceHub, SiteError,
    StderrJsonlTelemetrySink, mount,
};

use super::output::{write_divider, write_listing_to};
use super::{build_store, load_template};

/// Mounts the configured listing and prints every settled snapshot until
/// Ctrl-C.
///
/// Change detection polls the record store every `poll_interval_secs`.
/// Watching always subscribes, including for listings that are not live on
/// the site.
///
/// # Errors
///
/// Returns [`SiteError::Configuration`] for missing settings and render or
/// I/O errors from printing.
pub async fn run(config: &BeamConfig) -> Result<(), SiteError> {
    let kind = config.require_listing()?;
    let store = build_store(config)?;
    let template = load_template(config)?;
    let mut listing = kind.config();
    listing.live_updates = true;

    match kind {
        ListingKind::Projects => {
            watch_listing::<ResearchProject>(config, &listing, store, template.as_deref()).await
        }
        ListingKind::Hubs => {
            watch_listing::<ScienceHub>(config, &listing, store, template.as_deref()).await
        }
        ListingKind::Classes => {
            watch_listing::<ClassWorkshop>(config, &listing, store, template.as_deref()).await
        }
    }
}

async fn watch_listing<R: Record>(
    config: &BeamConfig,
    listing: &ListingConfig,
    store: Arc<dyn RecordStore>,
    template: Option<&str>,
) -> Result<(), SiteError> {
    let feed = PollingChangeFeed::new(Arc::clone(&store), config.poll_interval());
    let options = ListingOptions {
        fetch_timeout: config.fetch_timeout(),
        telemetry: Arc::new(StderrJsonlTelemetrySink),
    };
    let changes: &dyn ChangeFeed = &feed;
    let handle = mount::<R>(
        listing.clone(),
        store,
        Some(changes),
        &config.requested_filters(),
        options,
    );
    let mut snapshots = handle.snapshots();
    let mut printed: Option<u64> = None;

    let outcome = loop {
        let snapshot = snapshots.borrow_and_update().clone();
        if snapshot.state != LoadState::Loading && printed != Some(snapshot.generation) {
            let page = ListingPage::from_snapshot(listing, &snapshot);
            if let Err(error) = print_page(&page, printed.is_some(), template) {
                break Err(error);
            }
            printed = Some(snapshot.generation);
        }

        tokio::select! {
            changed = snapshots.changed() => {
                if changed.is_err() {
                    tracing::warn!(listing = listing.name, "listing controller stopped");
                    break Ok(());
                }
            }
            signal = tokio::signal::ctrl_c() => {
                if let Err(error) = signal {
                    tracing::warn!(%error, "failed to listen for Ctrl-C");
                }
                break Ok(());
            }
        }
    };

    handle.unmount().await;
    outcome
}

fn print_page(page: &ListingPage, divider: bool, template: Option<&str>) -> Result<(), SiteError> {
    let mut stdout = io::stdout().lock();
    if divider {
        write_divider(&mut stdout, page.generation)?;
    }
    write_listing_to(&mut stdout, page, template)
}
