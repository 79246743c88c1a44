//! Invoice store capability.

use async_trait::async_trait;
use thiserror::Error;

use billrun_core::{Customer, CustomerId, Invoice, InvoiceId};

/// Store operation error.
///
/// These are **infrastructure** failures. "Record does not exist" is not an
/// error at this layer — lookups return `Ok(None)` for that, and the
/// decision layer turns absence into its own terminal error kinds.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The backend could not serve the request (connection, query, pool).
    #[error("store backend failure: {0}")]
    Backend(String),

    /// A persisted record failed domain parsing (bad currency/status data).
    #[error("corrupt record: {0}")]
    Corrupt(String),
}

impl StoreError {
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }

    pub fn corrupt(msg: impl Into<String>) -> Self {
        Self::Corrupt(msg.into())
    }
}

/// Read access to invoices and customers.
///
/// The billing core only ever reads: lookups by id (absent signaled as
/// `None`, distinct from backend failure) and the eligible set for a
/// billing pass. Writes, ordering, and de-duplication are the store
/// owner's responsibility.
#[async_trait]
pub trait InvoiceStore: Send + Sync {
    /// Look up a single invoice. `Ok(None)` when the id does not exist.
    async fn fetch_invoice(&self, id: InvoiceId) -> Result<Option<Invoice>, StoreError>;

    /// Look up a single customer. `Ok(None)` when the id does not exist.
    async fn fetch_customer(&self, id: CustomerId) -> Result<Option<Customer>, StoreError>;

    /// The full set of invoices eligible for a billing pass, in store
    /// order. The core takes the sequence as-is.
    async fn fetch_invoices(&self) -> Result<Vec<Invoice>, StoreError>;
}
