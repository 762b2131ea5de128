//! Stripe implementation of [`PaymentGateway`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use super::error::{PaymentError, extract_payment_message};
use super::gateway::{CheckoutSession, CheckoutSessionRequest, PaymentGateway};

/// Public Stripe API root.
pub const DEFAULT_STRIPE_API_BASE: &str = "https://api.stripe.com";

const DEFAULT_TIMEOUT_SECS: u64 = 20;
const SESSIONS_PATH: &str = "v1/checkout/sessions";
const API_VERSION_HEADER: &str = "Stripe-Version";
const API_VERSION: &str = "2023-10-16";

/// Connection settings for [`StripeGateway`].
#[derive(Clone, PartialEq, Eq)]
pub struct StripeGatewayConfig {
    /// Secret API key.
    pub secret_key: String,
    /// API root, overridable for tests and proxies.
    pub api_base: String,
    /// HTTP timeout applied to every request.
    pub timeout: Duration,
}

impl std::fmt::Debug for StripeGatewayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StripeGatewayConfig")
            .field("secret_key", &"<redacted>")
            .field("api_base", &self.api_base)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl StripeGatewayConfig {
    /// Configuration for the public Stripe API.
    #[must_use]
    pub fn new(secret_key: impl Into<String>) -> Self {
        Self {
            secret_key: secret_key.into(),
            api_base: DEFAULT_STRIPE_API_BASE.to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Points the gateway at another API root.
    #[must_use]
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }
}

/// Opens Stripe Checkout sessions over the REST API.
#[derive(Clone)]
pub struct StripeGateway {
    client: Client,
    endpoint: Url,
    secret_key: String,
}

impl std::fmt::Debug for StripeGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StripeGateway")
            .field("endpoint", &self.endpoint.as_str())
            .finish_non_exhaustive()
    }
}

impl StripeGateway {
    /// Builds a gateway.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentError::Configuration`] for an empty key, an invalid
    /// API root, or an HTTP client that cannot be built.
    pub fn new(config: &StripeGatewayConfig) -> Result<Self, PaymentError> {
        if config.secret_key.trim().is_empty() {
            return Err(PaymentError::Configuration {
                message: "payment secret key is empty".to_owned(),
            });
        }
        let mut base = Url::parse(&config.api_base).map_err(|error| PaymentError::Configuration {
            message: format!("payment API base '{}' is invalid: {error}", config.api_base),
        })?;
        if !base.path().ends_with('/') {
            let with_slash = format!("{}/", base.path());
            base.set_path(&with_slash);
        }
        let endpoint = base
            .join(SESSIONS_PATH)
            .map_err(|error| PaymentError::Configuration {
                message: format!("payment API base cannot hold the sessions path: {error}"),
            })?;
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|error| PaymentError::Configuration {
                message: format!("failed to configure payment HTTP client: {error}"),
            })?;

        Ok(Self {
            client,
            endpoint,
            secret_key: config.secret_key.clone(),
        })
    }
}

/// Flattens a session request into Stripe's bracketed form fields.
fn session_form(request: &CheckoutSessionRequest) -> Vec<(String, String)> {
    let mut form = vec![
        ("payment_method_types[0]".to_owned(), "card".to_owned()),
        (
            "line_items[0][price_data][currency]".to_owned(),
            request.currency.clone(),
        ),
        (
            "line_items[0][price_data][product_data][name]".to_owned(),
            request.product_name.clone(),
        ),
        (
            "line_items[0][price_data][product_data][description]".to_owned(),
            request.product_description.clone(),
        ),
        (
            "line_items[0][price_data][unit_amount]".to_owned(),
            request.amount_cents.to_string(),
        ),
        ("line_items[0][quantity]".to_owned(), "1".to_owned()),
        ("mode".to_owned(), "payment".to_owned()),
        ("success_url".to_owned(), request.success_url.clone()),
        ("cancel_url".to_owned(), request.cancel_url.clone()),
    ];
    let metadata = [
        ("donationType", &request.metadata.donation_type),
        ("donorName", &request.metadata.donor_name),
        ("donorEmail", &request.metadata.donor_email),
    ];
    form.extend(metadata.into_iter().filter_map(|(key, value)| {
        value
            .as_ref()
            .map(|text| (format!("metadata[{key}]"), text.clone()))
    }));
    form
}

#[async_trait]
impl PaymentGateway for StripeGateway {
    async fn create_session(
        &self,
        request: &CheckoutSessionRequest,
    ) -> Result<CheckoutSession, PaymentError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(&self.secret_key)
            .header(API_VERSION_HEADER, API_VERSION)
            .form(&session_form(request))
            .send()
            .await
            .map_err(|error| PaymentError::Network {
                message: format!("creating checkout session failed: {error}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PaymentError::Api {
                status: status.as_u16(),
                message: extract_payment_message(&body)
                    .unwrap_or_else(|| "unknown error".to_owned()),
            });
        }

        response
            .json::<CheckoutSession>()
            .await
            .map_err(|error| PaymentError::Decode {
                message: format!("checkout session response: {error}"),
            })
    }
}
