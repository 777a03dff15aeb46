// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Payment authorization port.
//!
//! Card capture happens in the payment provider's own widget. The
//! registration flow only hands over the resulting token and an amount
//! and needs a yes or no back.

use thiserror::Error;
use tracing::{info, warn};

/// Token prefix the mock authorizer always declines.
pub const DECLINED_TOKEN_PREFIX: &str = "tok_decline";

/// Token prefix for which the mock authorizer behaves as if the payment
/// service were down.
pub const UNAVAILABLE_TOKEN_PREFIX: &str = "tok_unavailable";

/// A charge to authorize.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChargeRequest {
    pub amount_cents: i64,
    pub currency: String,
    pub payment_token: String,
    pub description: String,
    pub receipt_email: Option<String>,
}

/// The payment service's answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentOutcome {
    pub approved: bool,
    pub error_message: Option<String>,
    /// Set when approved.
    pub payment_reference: Option<String>,
}

impl PaymentOutcome {
    /// An approval carrying the provider's reference.
    #[must_use]
    pub fn approved(payment_reference: impl Into<String>) -> Self {
        Self {
            approved: true,
            error_message: None,
            payment_reference: Some(payment_reference.into()),
        }
    }

    /// A decline with the provider's reason.
    #[must_use]
    pub fn declined(error_message: impl Into<String>) -> Self {
        Self {
            approved: false,
            error_message: Some(error_message.into()),
            payment_reference: None,
        }
    }
}

/// Failures to reach a decision at all. Declines are not errors.
#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("Payment service unavailable: {0}")]
    Unavailable(String),
    #[error("Invalid charge amount: {0} cents")]
    InvalidAmount(i64),
    #[error("Payment token is empty")]
    MissingToken,
}

/// Authorizes card charges.
pub trait PaymentAuthorizer {
    /// Asks the payment service to authorize a charge.
    ///
    /// # Errors
    ///
    /// Returns an error if no decision could be obtained.
    fn authorize(&mut self, request: &ChargeRequest) -> Result<PaymentOutcome, PaymentError>;
}

/// In-process authorizer for development and tests.
///
/// Approves every token except those starting with `tok_decline`, which
/// are declined, and `tok_unavailable`, which fail as if the service could
/// not be reached.
#[derive(Debug, Default)]
pub struct MockPaymentAuthorizer {
    charges: Vec<ChargeRequest>,
}

impl MockPaymentAuthorizer {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            charges: Vec::new(),
        }
    }

    /// Returns every charge submitted so far, approved or not.
    #[must_use]
    pub fn charges(&self) -> &[ChargeRequest] {
        &self.charges
    }
}

impl PaymentAuthorizer for MockPaymentAuthorizer {
    fn authorize(&mut self, request: &ChargeRequest) -> Result<PaymentOutcome, PaymentError> {
        if request.payment_token.trim().is_empty() {
            return Err(PaymentError::MissingToken);
        }
        if request.amount_cents < 0 {
            return Err(PaymentError::InvalidAmount(request.amount_cents));
        }
        if request.payment_token.starts_with(UNAVAILABLE_TOKEN_PREFIX) {
            warn!(amount_cents = request.amount_cents, "Mock payment service unavailable");
            return Err(PaymentError::Unavailable(String::from(
                "mock payment service is offline",
            )));
        }
        self.charges.push(request.clone());

        if request.payment_token.starts_with(DECLINED_TOKEN_PREFIX) {
            warn!(amount_cents = request.amount_cents, "Mock payment declined");
            return Ok(PaymentOutcome::declined("Your card was declined."));
        }

        let payment_reference: String = format!("pay_mock_{:016x}", rand::random::<u64>());
        info!(
            amount_cents = request.amount_cents,
            %payment_reference,
            "Mock payment approved"
        );
        Ok(PaymentOutcome::approved(payment_reference))
    }
}
