//! `billrun-data` — invoice store backends.
//!
//! Two implementations of the billing core's `InvoiceStore` capability:
//! an in-memory table store (tests, dev, demo data) and a Postgres-backed
//! store (`sqlx`).

pub mod in_memory;
pub mod postgres;

pub use in_memory::InMemoryInvoiceStore;
pub use postgres::PostgresInvoiceStore;
