//! Donation checkout.
//!
//! A donation arrives as a dollar amount plus donor details. The amount is
//! validated and converted to cents before anything leaves the process; a
//! rejected amount never reaches the payment processor. The processor sits
//! behind [`PaymentGateway`], with [`StripeGateway`] as the production
//! implementation.

mod donation_items;
mod error;
mod gateway;
mod service;
mod stripe;

pub use donation_items::{DONATION_ITEMS, DonationItem, DonationType};
pub use error::{CheckoutError, PaymentError};
pub use gateway::{CheckoutSession, CheckoutSessionRequest, DonationMetadata, PaymentGateway};
pub use service::{CheckoutService, DonationRequest, MAX_AMOUNT_CENTS, validate_amount};
pub use stripe::{DEFAULT_STRIPE_API_BASE, StripeGateway, StripeGatewayConfig};

#[cfg(test)]
pub use gateway::MockPaymentGateway;
