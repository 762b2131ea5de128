//! Payment processor seam.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::error::PaymentError;

/// Donor details attached to a session as processor metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationMetadata {
    /// Which preset or purpose the donation is for.
    pub donation_type: Option<String>,
    /// Donor's name as entered.
    pub donor_name: Option<String>,
    /// Donor's email as entered.
    pub donor_email: Option<String>,
}

/// Everything the processor needs to open a one-item payment session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSessionRequest {
    /// Charge in minor units.
    pub amount_cents: i64,
    /// ISO currency code, lower case.
    pub currency: String,
    /// Line item name.
    pub product_name: String,
    /// Line item description.
    pub product_description: String,
    /// Where the processor sends the donor after paying.
    pub success_url: String,
    /// Where the processor sends the donor after cancelling.
    pub cancel_url: String,
    /// Donor details.
    pub metadata: DonationMetadata,
}

/// A session opened by the processor.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CheckoutSession {
    /// Processor session identifier.
    pub id: String,
    /// Hosted payment page, when the processor returns one.
    #[serde(default)]
    pub url: Option<String>,
}

/// Opens payment sessions with a processor.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Creates a session for `request`.
    async fn create_session(
        &self,
        request: &CheckoutSessionRequest,
    ) -> Result<CheckoutSession, PaymentError>;
}
