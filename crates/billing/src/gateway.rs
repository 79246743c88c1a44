//! Payment gateway capability.

use async_trait::async_trait;
use thiserror::Error;

use billrun_core::Invoice;

/// Gateway operation error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// The charge attempt could not complete (timeout, connection loss,
    /// provider outage). Distinct from a decline, which is a successful
    /// `charge` call returning `false`.
    #[error("network failure talking to the payment provider: {0}")]
    Network(String),
}

impl GatewayError {
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }
}

/// The external payment provider.
///
/// `charge` attempts to collect the invoice's amount from the customer's
/// account:
///
/// - `Ok(true)` — the account was charged.
/// - `Ok(false)` — the provider declined (e.g. insufficient funds).
/// - `Err(Network)` — the attempt did not complete; the decision layer
///   propagates this rather than guessing at the outcome.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn charge(&self, invoice: &Invoice) -> Result<bool, GatewayError>;
}
