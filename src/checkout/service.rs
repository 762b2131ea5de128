//! Donation checkout use case.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::error::CheckoutError;
use super::gateway::{CheckoutSession, CheckoutSessionRequest, DonationMetadata, PaymentGateway};
use crate::money::to_minor_units;
use crate::telemetry::{NoopTelemetrySink, TelemetryEvent, TelemetrySink};

/// Largest single charge the processor accepts, in cents.
pub const MAX_AMOUNT_CENTS: i64 = 99_999_999;

const INVALID_AMOUNT: &str = "Invalid amount";
const PRODUCT_NAME_PREFIX: &str = "BEAM Science Donation";
const PRODUCT_DESCRIPTION: &str = "Supporting scientific research and education";
const FALLBACK_DONATION_TYPE: &str = "general";

/// Body of `POST /api/create-checkout-session`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationRequest {
    /// Amount in dollars.
    #[serde(default)]
    pub amount: Option<f64>,
    /// Preset or purpose, e.g. `stipend`.
    #[serde(default)]
    pub donation_type: Option<String>,
    /// Donor's name.
    #[serde(default)]
    pub donor_name: Option<String>,
    /// Donor's email.
    #[serde(default)]
    pub donor_email: Option<String>,
}

/// Checks a dollar amount and converts it to cents.
///
/// ```
/// use beam_site::checkout::validate_amount;
///
/// assert_eq!(validate_amount(Some(19.999)), Ok(2000));
/// assert!(validate_amount(Some(0.0)).is_err());
/// assert!(validate_amount(None).is_err());
/// ```
///
/// # Errors
///
/// Returns [`CheckoutError::Validation`] when the amount is missing, not a
/// positive finite number, rounds to zero cents, or exceeds
/// [`MAX_AMOUNT_CENTS`].
pub fn validate_amount(amount: Option<f64>) -> Result<i64, CheckoutError> {
    let invalid = || CheckoutError::Validation {
        message: INVALID_AMOUNT.to_owned(),
    };
    let dollars = amount.filter(|value| value.is_finite() && *value > 0.0).ok_or_else(invalid)?;
    let cents = to_minor_units(dollars).filter(|cents| *cents > 0).ok_or_else(invalid)?;
    if cents > MAX_AMOUNT_CENTS {
        return Err(CheckoutError::Validation {
            message: "Amount exceeds the maximum donation".to_owned(),
        });
    }
    Ok(cents)
}

/// Opens checkout sessions for donations.
#[derive(Clone)]
pub struct CheckoutService {
    gateway: Arc<dyn PaymentGateway>,
    telemetry: Arc<dyn TelemetrySink>,
}

impl std::fmt::Debug for CheckoutService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckoutService").finish_non_exhaustive()
    }
}

impl CheckoutService {
    /// Creates a service using `gateway`.
    #[must_use]
    pub fn new(gateway: Arc<dyn PaymentGateway>) -> Self {
        Self {
            gateway,
            telemetry: Arc::new(NoopTelemetrySink),
        }
    }

    /// Sends session telemetry to `telemetry`.
    #[must_use]
    pub fn with_telemetry(mut self, telemetry: Arc<dyn TelemetrySink>) -> Self {
        self.telemetry = telemetry;
        self
    }

    /// Validates `request` and opens a one-item payment session.
    ///
    /// Redirect URLs are built from `origin`. The processor is not contacted
    /// when validation fails.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::Validation`] for a bad amount and
    /// [`CheckoutError::Upstream`] when the processor fails; the latter is
    /// logged here.
    pub async fn create_checkout_session(
        &self,
        request: &DonationRequest,
        origin: &str,
    ) -> Result<CheckoutSession, CheckoutError> {
        let amount_cents = validate_amount(request.amount)?;
        let session_request = build_session_request(request, amount_cents, origin);

        let session = self
            .gateway
            .create_session(&session_request)
            .await
            .map_err(|error| {
                tracing::error!(%error, amount_cents, "error creating checkout session");
                CheckoutError::from(error)
            })?;

        tracing::info!(session_id = %session.id, amount_cents, "checkout session created");
        self.telemetry
            .record(TelemetryEvent::CheckoutSessionCreated {
                donation_type: donation_type(request).to_owned(),
                amount_cents,
            });
        Ok(session)
    }
}

fn donation_type(request: &DonationRequest) -> &str {
    request
        .donation_type
        .as_deref()
        .map(str::trim)
        .filter(|kind| !kind.is_empty())
        .unwrap_or(FALLBACK_DONATION_TYPE)
}

fn build_session_request(
    request: &DonationRequest,
    amount_cents: i64,
    origin: &str,
) -> CheckoutSessionRequest {
    let base = origin.trim_end_matches('/');
    CheckoutSessionRequest {
        amount_cents,
        currency: "usd".to_owned(),
        product_name: format!("{PRODUCT_NAME_PREFIX} - {}", donation_type(request)),
        product_description: PRODUCT_DESCRIPTION.to_owned(),
        success_url: format!("{base}/donate?success=true&session_id={{CHECKOUT_SESSION_ID}}"),
        cancel_url: format!("{base}/donate?canceled=true"),
        metadata: DonationMetadata {
            donation_type: request.donation_type.clone(),
            donor_name: request.donor_name.clone(),
            donor_email: request.donor_email.clone(),
        },
    }
}
