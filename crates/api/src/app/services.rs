//! Application service wiring.

use std::sync::Arc;

use billrun_billing::{BillingError, BillingOutcome, BillingService, InvoiceStore, RunReport, StoreError};
use billrun_core::{Customer, CustomerId, Invoice, InvoiceId};
use billrun_data::{InMemoryInvoiceStore, PostgresInvoiceStore};

use crate::gateway::DevPaymentGateway;

/// Concrete service graph, one variant per store backend.
///
/// Handlers talk to this enum instead of generics so the router stays free
/// of type parameters; the variant is chosen once at startup from config.
pub enum AppServices {
    InMemory {
        store: Arc<InMemoryInvoiceStore>,
        billing: Arc<BillingService<InMemoryInvoiceStore, DevPaymentGateway>>,
    },
    Postgres {
        store: Arc<PostgresInvoiceStore>,
        billing: Arc<BillingService<PostgresInvoiceStore, DevPaymentGateway>>,
    },
}

impl AppServices {
    pub fn in_memory(store: Arc<InMemoryInvoiceStore>, gateway: Arc<DevPaymentGateway>) -> Self {
        let billing = Arc::new(BillingService::new(Arc::clone(&store), gateway));
        Self::InMemory { store, billing }
    }

    pub fn postgres(store: Arc<PostgresInvoiceStore>, gateway: Arc<DevPaymentGateway>) -> Self {
        let billing = Arc::new(BillingService::new(Arc::clone(&store), gateway));
        Self::Postgres { store, billing }
    }

    pub async fn invoice(&self, id: InvoiceId) -> Result<Option<Invoice>, StoreError> {
        match self {
            Self::InMemory { store, .. } => store.fetch_invoice(id).await,
            Self::Postgres { store, .. } => store.fetch_invoice(id).await,
        }
    }

    pub async fn invoices(&self) -> Result<Vec<Invoice>, StoreError> {
        match self {
            Self::InMemory { store, .. } => store.fetch_invoices().await,
            Self::Postgres { store, .. } => store.fetch_invoices().await,
        }
    }

    pub async fn customer(&self, id: CustomerId) -> Result<Option<Customer>, StoreError> {
        match self {
            Self::InMemory { store, .. } => store.fetch_customer(id).await,
            Self::Postgres { store, .. } => store.fetch_customer(id).await,
        }
    }

    pub async fn customers(&self) -> Result<Vec<Customer>, StoreError> {
        match self {
            Self::InMemory { store, .. } => Ok(store.customers()),
            Self::Postgres { store, .. } => store.customers().await,
        }
    }

    /// Single-invoice billing decision; strict, all failures surface.
    pub async fn decide(&self, id: InvoiceId) -> Result<BillingOutcome, BillingError> {
        match self {
            Self::InMemory { billing, .. } => billing.decide(id).await,
            Self::Postgres { billing, .. } => billing.decide(id).await,
        }
    }

    /// Run a whole billing pass; infallible by contract.
    pub async fn run_all(&self) -> RunReport {
        match self {
            Self::InMemory { billing, .. } => billing.run_all().await,
            Self::Postgres { billing, .. } => billing.run_all().await,
        }
    }
}
