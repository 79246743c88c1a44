//! In-memory invoice store.

use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;
use rand::Rng;
use rust_decimal::Decimal;
use tracing::info;

use billrun_billing::{InvoiceStore, StoreError};
use billrun_core::{Currency, Customer, CustomerId, Invoice, InvoiceId, InvoiceStatus, Money};

#[derive(Default)]
struct Tables {
    invoices: BTreeMap<InvoiceId, Invoice>,
    customers: BTreeMap<CustomerId, Customer>,
}

/// Table store held entirely in memory.
///
/// Used for tests and local development. BTreeMaps keep iteration in id
/// order, so the eligible set a billing pass sees is deterministic.
#[derive(Default)]
pub struct InMemoryInvoiceStore {
    inner: RwLock<Tables>,
}

impl InMemoryInvoiceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_customer(&self, customer: Customer) {
        self.inner
            .write()
            .unwrap()
            .customers
            .insert(customer.id, customer);
    }

    pub fn insert_invoice(&self, invoice: Invoice) {
        self.inner
            .write()
            .unwrap()
            .invoices
            .insert(invoice.id, invoice);
    }

    /// All customers, in id order. Serves the HTTP read surface; the
    /// billing core itself only ever looks customers up by id.
    pub fn customers(&self) -> Vec<Customer> {
        self.inner
            .read()
            .unwrap()
            .customers
            .values()
            .cloned()
            .collect()
    }

    /// Populate a workable local dataset: `customer_count` customers with a
    /// random account currency, each owning `invoices_per_customer`
    /// invoices of which the first is still pending.
    pub fn seed_demo_data(&self, customer_count: i64, invoices_per_customer: i64) {
        let mut rng = rand::thread_rng();
        let mut next_invoice_id = 1;
        for customer_n in 1..=customer_count {
            let currency = Currency::ALL[rng.gen_range(0..Currency::ALL.len())];
            let customer = Customer::new(CustomerId::new(customer_n), currency);
            self.insert_customer(customer.clone());

            for invoice_n in 0..invoices_per_customer {
                let amount = Decimal::new(rng.gen_range(100..1_000_000), 2);
                let status = if invoice_n == 0 {
                    InvoiceStatus::Pending
                } else {
                    InvoiceStatus::Paid
                };
                self.insert_invoice(Invoice::new(
                    InvoiceId::new(next_invoice_id),
                    customer.id,
                    Money::new(amount, currency),
                    status,
                ));
                next_invoice_id += 1;
            }
        }
        info!(
            customers = customer_count,
            invoices = next_invoice_id - 1,
            "seeded in-memory store with demo data"
        );
    }
}

#[async_trait]
impl InvoiceStore for InMemoryInvoiceStore {
    async fn fetch_invoice(&self, id: InvoiceId) -> Result<Option<Invoice>, StoreError> {
        Ok(self.inner.read().unwrap().invoices.get(&id).cloned())
    }

    async fn fetch_customer(&self, id: CustomerId) -> Result<Option<Customer>, StoreError> {
        Ok(self.inner.read().unwrap().customers.get(&id).cloned())
    }

    async fn fetch_invoices(&self) -> Result<Vec<Invoice>, StoreError> {
        Ok(self
            .inner
            .read()
            .unwrap()
            .invoices
            .values()
            .cloned()
            .collect())
    }
}
