//! Server mode.

use std::sync::Arc;

use beam_site::{
    AppState, BeamConfig, CheckoutService, ListingOptions, SiteError, StripeGateway,
    StripeGatewayConfig, TelemetrySink, TracingTelemetrySink, serve,
};

use super::build_store;

/// Builds the application state from configuration and serves until
/// Ctrl-C.
///
/// # Errors
///
/// Returns [`SiteError::Configuration`] for missing or malformed settings,
/// [`SiteError::Payment`] when the payment client cannot be built, and
/// [`SiteError::Server`] when the server fails.
pub async fn run(config: &BeamConfig) -> Result<(), SiteError> {
    let addr = config.resolve_bind_addr()?;
    let store = build_store(config)?;
    let gateway_config = StripeGatewayConfig::new(config.resolve_payment_key()?)
        .with_api_base(config.payment_api_base.clone());
    let gateway = StripeGateway::new(&gateway_config)?;

    let telemetry: Arc<dyn TelemetrySink> = Arc::new(TracingTelemetrySink);
    let checkout = CheckoutService::new(Arc::new(gateway)).with_telemetry(Arc::clone(&telemetry));
    let options = ListingOptions {
        fetch_timeout: config.fetch_timeout(),
        telemetry,
    };
    let state = AppState::new(store, checkout, config.public_origin.clone())
        .with_listing_options(options)
        .with_webhook_secret(config.webhook_secret.clone());
    if !state.requires_webhook_secret() {
        tracing::warn!(
            "no webhook secret configured; anyone can POST /api/changes and force listing refetches"
        );
    }

    serve(addr, state).await
}
