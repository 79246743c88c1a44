//! `billrun-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! strongly-typed identifiers, money, and the invoice/customer read models the
//! billing core operates on.

pub mod customer;
pub mod entity;
pub mod error;
pub mod id;
pub mod invoice;
pub mod money;
pub mod value_object;

pub use customer::Customer;
pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{CustomerId, InvoiceId};
pub use invoice::{Invoice, InvoiceStatus};
pub use money::{Currency, Money};
pub use value_object::ValueObject;
