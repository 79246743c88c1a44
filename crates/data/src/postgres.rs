//! Postgres-backed invoice store.
//!
//! Plain read-through store over two tables (`invoices`, `customers`), see
//! `migrations/001_init.sql` for the schema. Amounts are `NUMERIC` columns
//! read as decimals; currency and status are text columns parsed through
//! the domain types, so a bad row surfaces as `StoreError::Corrupt` instead
//! of a silently wrong decision.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::instrument;

use billrun_billing::{InvoiceStore, StoreError};
use billrun_core::{Currency, Customer, CustomerId, Invoice, InvoiceId, InvoiceStatus, Money};

/// Invoice store persisted in PostgreSQL.
///
/// Thread safe: the sqlx pool handles connection management, and every
/// operation is a single read query.
#[derive(Debug, Clone)]
pub struct PostgresInvoiceStore {
    pool: PgPool,
}

impl PostgresInvoiceStore {
    /// Wrap an existing connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect to the given database URL.
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let pool = PgPool::connect(url).await.map_err(backend_error)?;
        Ok(Self { pool })
    }

    /// All customers, in id order. Serves the HTTP read surface.
    #[instrument(skip(self))]
    pub async fn customers(&self) -> Result<Vec<Customer>, StoreError> {
        let rows = sqlx::query("SELECT id, currency FROM customers ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(backend_error)?;
        rows.iter().map(customer_from_row).collect()
    }
}

#[async_trait]
impl InvoiceStore for PostgresInvoiceStore {
    #[instrument(skip(self), fields(invoice_id = %id))]
    async fn fetch_invoice(&self, id: InvoiceId) -> Result<Option<Invoice>, StoreError> {
        let row = sqlx::query(
            "SELECT id, customer_id, amount, currency, status FROM invoices WHERE id = $1",
        )
        .bind(id.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(backend_error)?;
        row.as_ref().map(invoice_from_row).transpose()
    }

    #[instrument(skip(self), fields(customer_id = %id))]
    async fn fetch_customer(&self, id: CustomerId) -> Result<Option<Customer>, StoreError> {
        let row = sqlx::query("SELECT id, currency FROM customers WHERE id = $1")
            .bind(id.value())
            .fetch_optional(&self.pool)
            .await
            .map_err(backend_error)?;
        row.as_ref().map(customer_from_row).transpose()
    }

    #[instrument(skip(self))]
    async fn fetch_invoices(&self) -> Result<Vec<Invoice>, StoreError> {
        let rows = sqlx::query(
            "SELECT id, customer_id, amount, currency, status FROM invoices ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(backend_error)?;
        rows.iter().map(invoice_from_row).collect()
    }
}

fn backend_error(err: sqlx::Error) -> StoreError {
    StoreError::backend(err.to_string())
}

fn invoice_from_row(row: &PgRow) -> Result<Invoice, StoreError> {
    let id: i64 = row.try_get("id").map_err(backend_error)?;
    let customer_id: i64 = row.try_get("customer_id").map_err(backend_error)?;
    let amount: rust_decimal::Decimal = row.try_get("amount").map_err(backend_error)?;
    let currency: String = row.try_get("currency").map_err(backend_error)?;
    let status: String = row.try_get("status").map_err(backend_error)?;

    let currency = currency
        .parse::<Currency>()
        .map_err(|e| StoreError::corrupt(format!("invoice {id}: {e}")))?;
    let status = status
        .parse::<InvoiceStatus>()
        .map_err(|e| StoreError::corrupt(format!("invoice {id}: {e}")))?;

    Ok(Invoice::new(
        InvoiceId::new(id),
        CustomerId::new(customer_id),
        Money::new(amount, currency),
        status,
    ))
}

fn customer_from_row(row: &PgRow) -> Result<Customer, StoreError> {
    let id: i64 = row.try_get("id").map_err(backend_error)?;
    let currency: String = row.try_get("currency").map_err(backend_error)?;

    let currency = currency
        .parse::<Currency>()
        .map_err(|e| StoreError::corrupt(format!("customer {id}: {e}")))?;

    Ok(Customer::new(CustomerId::new(id), currency))
}
