//! `billrun-billing` — the billing decision core.
//!
//! Two entry points, both on [`BillingService`]:
//!
//! - [`BillingService::decide`]: validate a single invoice and decide
//!   whether it gets charged. Strict — every failure kind propagates to the
//!   caller.
//! - [`BillingService::run_all`]: one billing pass over the eligible set.
//!   Never fails — every per-invoice error is caught, logged, and recorded
//!   on the returned [`RunReport`].
//!
//! Storage and the payment provider are capability traits ([`InvoiceStore`],
//! [`PaymentGateway`]) so backends and test doubles substitute freely.

pub mod gateway;
pub mod service;
pub mod store;

pub use gateway::{GatewayError, PaymentGateway};
pub use service::{BillingError, BillingOutcome, BillingService, InvoiceReport, RunReport};
pub use store::{InvoiceStore, StoreError};
