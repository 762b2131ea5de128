//! Backend for the BEAM Science community site.
//!
//! The site lists research projects, science hubs, and classes from a hosted
//! record store, keeps listings fresh when their tables change, and opens
//! donation checkout sessions with a payment processor.
//!
//! - [`catalog`]: entity records and their display cards
//! - [`listing`]: filtered listing state, fetch ordering, and mounted
//!   controllers
//! - [`store`]: the read-only record store seam and its PostgREST client
//! - [`realtime`]: table change subscriptions
//! - [`checkout`]: donation validation and payment sessions
//! - [`server`]: the HTTP surface
//! - [`render`]: terminal rendering of listing pages

pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod listing;
pub mod money;
pub mod realtime;
pub mod render;
pub mod server;
pub mod store;
pub mod telemetry;

pub use catalog::{Card, ClassWorkshop, Record, ResearchProject, ScienceHub};
pub use checkout::{
    CheckoutError, CheckoutService, DonationRequest, PaymentError, PaymentGateway, StripeGateway,
    StripeGatewayConfig,
};
pub use config::{BeamConfig, OperationMode};
pub use error::SiteError;
pub use listing::{
    FilterSelection, ListingConfig, ListingHandle, ListingKind, ListingOptions, ListingPage,
    LoadState, load_once, mount,
};
pub use realtime::{BroadcastChangeFeed, ChangeEvent, ChangeFeed, ChangeKind, PollingChangeFeed};
pub use render::{render_page, write_page};
pub use server::{AppState, router, serve};
pub use store::{PostgrestStore, PostgrestStoreConfig, RecordStore, StoreError, StoreQuery};
pub use telemetry::{
    LogFormat, NoopTelemetrySink, StderrJsonlTelemetrySink, TelemetryEvent, TelemetrySink,
    TracingTelemetrySink, init_tracing,
};
