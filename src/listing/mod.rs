//! Filtered listing views.
//!
//! One generic listing, configured three times (projects, hubs, classes).
//! A listing fetches a table through a [`RecordStore`](crate::store::RecordStore)
//! with an AND of equality filters, tracks whether it is loading, ready, or
//! failed, and never lets a superseded fetch reach the screen.
//!
//! - [`ListingConfig`] and the [`instances`] describe each listing.
//! - [`ListingView`] is the synchronous state machine.
//! - [`mount`] runs a view inside a controller task with change-feed
//!   refresh.
//! - [`ListingPage`] is the display model handed to templates and JSON
//!   clients.

mod config;
mod controller;
mod fetch;
mod filters;
pub mod instances;
mod page;
mod view;

pub use config::ListingConfig;
pub use controller::{DEFAULT_FETCH_TIMEOUT, ListingHandle, ListingOptions, mount};
pub use fetch::{fetch_records, load_once};
pub use filters::{ALL, FilterField, FilterSelection};
pub use instances::{ListingKind, UnknownListing};
pub use page::{FilterOption, FilterView, ListingPage};
pub use view::{FetchOutcome, FetchTicket, ListingSnapshot, ListingView, LoadState};
