//! HTTP surface of the site backend.
//!
//! Routes:
//!
//! - `POST /api/create-checkout-session`: opens a donation checkout.
//! - `GET /api/donation-items`: the suggested presets.
//! - `GET /api/listings/{kind}`: one listing page as JSON.
//! - `GET /api/listings/{kind}/stream`: live listing snapshots as
//!   server-sent events.
//! - `POST /api/changes`: database webhook that feeds the change hub.
//! - `GET /health`: liveness.

mod error;
mod routes;
mod stream;

pub use error::ApiError;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::checkout::CheckoutService;
use crate::error::SiteError;
use crate::listing::ListingOptions;
use crate::realtime::BroadcastChangeFeed;
use crate::store::RecordStore;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn RecordStore>,
    checkout: CheckoutService,
    changes: Arc<BroadcastChangeFeed>,
    listing_options: ListingOptions,
    public_origin: String,
    webhook_secret: Option<String>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("public_origin", &self.public_origin)
            .field("listing_options", &self.listing_options)
            .field("webhook_secret", &self.webhook_secret.as_ref().map(|_| "***"))
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Creates state with a fresh change hub and default listing options.
    ///
    /// `public_origin` is used for checkout redirects when a request carries
    /// no `Origin` header.
    #[must_use]
    pub fn new(
        store: Arc<dyn RecordStore>,
        checkout: CheckoutService,
        public_origin: impl Into<String>,
    ) -> Self {
        Self {
            store,
            checkout,
            changes: Arc::new(BroadcastChangeFeed::default()),
            listing_options: ListingOptions::default(),
            public_origin: public_origin.into(),
            webhook_secret: None,
        }
    }

    /// Uses `changes` as the change hub.
    #[must_use]
    pub fn with_changes(mut self, changes: Arc<BroadcastChangeFeed>) -> Self {
        self.changes = changes;
        self
    }

    /// Uses `options` for listing fetches and mounts.
    #[must_use]
    pub fn with_listing_options(mut self, options: ListingOptions) -> Self {
        self.listing_options = options;
        self
    }

    /// Requires webhook calls to present `secret` in `x-webhook-secret`.
    #[must_use]
    pub fn with_webhook_secret(mut self, secret: Option<String>) -> Self {
        self.webhook_secret = secret.filter(|value| !value.is_empty());
        self
    }

    /// Whether `POST /api/changes` demands a shared secret.
    #[must_use]
    pub const fn requires_webhook_secret(&self) -> bool {
        self.webhook_secret.is_some()
    }

    /// The change hub fed by the webhook route.
    #[must_use]
    pub fn changes(&self) -> &Arc<BroadcastChangeFeed> {
        &self.changes
    }
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .route("/api/donation-items", get(routes::donation_items))
        .route(
            "/api/create-checkout-session",
            post(routes::create_checkout_session),
        )
        .route("/api/listings/:kind", get(routes::listing))
        .route("/api/listings/:kind/stream", get(stream::listing_stream))
        .route("/api/changes", post(routes::table_changed))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serves the router on `addr` until Ctrl-C.
///
/// # Errors
///
/// Returns [`SiteError::Server`] when the address cannot be bound or the
/// server stops with an error.
pub async fn serve(addr: SocketAddr, state: AppState) -> Result<(), SiteError> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|error| SiteError::Server {
            message: format!("failed to bind {addr}: {error}"),
        })?;
    let local = listener.local_addr().unwrap_or(addr);
    tracing::info!(%local, "listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|error| SiteError::Server {
            message: error.to_string(),
        })
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::warn!(%error, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}

#[cfg(test)]
mod tests;
