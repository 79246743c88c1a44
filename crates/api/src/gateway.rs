//! Development payment gateway.

use async_trait::async_trait;
use rand::Rng;
use tracing::debug;

use billrun_billing::{GatewayError, PaymentGateway};
use billrun_core::Invoice;

/// Stand-in for the real payment provider.
///
/// Rolls dice per charge attempt: first whether the provider is reachable
/// at all, then whether the charge is accepted. Ratios are clamped to
/// `[0, 1]`; `new(1.0, 0.0)` gives a provider that always accepts.
pub struct DevPaymentGateway {
    success_ratio: f64,
    network_failure_ratio: f64,
}

impl DevPaymentGateway {
    pub fn new(success_ratio: f64, network_failure_ratio: f64) -> Self {
        Self {
            success_ratio: success_ratio.clamp(0.0, 1.0),
            network_failure_ratio: network_failure_ratio.clamp(0.0, 1.0),
        }
    }
}

#[async_trait]
impl PaymentGateway for DevPaymentGateway {
    async fn charge(&self, invoice: &Invoice) -> Result<bool, GatewayError> {
        let mut rng = rand::thread_rng();
        if rng.r#gen::<f64>() < self.network_failure_ratio {
            return Err(GatewayError::network("simulated provider outage"));
        }
        let accepted = rng.gen_bool(self.success_ratio);
        debug!(invoice_id = %invoice.id, accepted, "dev gateway charge attempt");
        Ok(accepted)
    }
}
