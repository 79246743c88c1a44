//! Billing decision and batch runner.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use billrun_core::{CustomerId, InvoiceId};

use crate::gateway::{GatewayError, PaymentGateway};
use crate::store::{InvoiceStore, StoreError};

/// What happened to a single invoice, once the decision succeeded.
///
/// Transient value: outcomes are reported, not persisted.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BillingOutcome {
    /// The charge succeeded, or the invoice was already paid.
    Charged,
    /// The provider declined the charge.
    NotCharged,
}

/// Terminal failure of a single invoice's billing decision.
///
/// None of these are retried within a pass; the batch runner records them
/// and moves on.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BillingError {
    #[error("invoice {0} not found")]
    InvoiceNotFound(InvoiceId),

    #[error("customer {0} not found")]
    CustomerNotFound(CustomerId),

    #[error("currency mismatch between invoice {invoice_id} and customer {customer_id}")]
    CurrencyMismatch {
        invoice_id: InvoiceId,
        customer_id: CustomerId,
    },

    #[error("network failure while charging: {0}")]
    Network(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<GatewayError> for BillingError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::Network(msg) => Self::Network(msg),
        }
    }
}

/// Per-invoice entry of a billing pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceReport {
    pub invoice_id: InvoiceId,
    pub result: Result<BillingOutcome, BillingError>,
}

/// Result of one whole billing pass.
///
/// The pass itself is infallible: even a failure to list the eligible set
/// lands here (`aborted`) instead of propagating.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub entries: Vec<InvoiceReport>,
    /// Set when the eligible set could not be fetched at all.
    pub aborted: Option<StoreError>,
}

impl RunReport {
    pub fn charged(&self) -> usize {
        self.count(|r| matches!(r, Ok(BillingOutcome::Charged)))
    }

    pub fn not_charged(&self) -> usize {
        self.count(|r| matches!(r, Ok(BillingOutcome::NotCharged)))
    }

    pub fn failed(&self) -> usize {
        self.count(|r| r.is_err())
    }

    fn count(&self, pred: impl Fn(&Result<BillingOutcome, BillingError>) -> bool) -> usize {
        self.entries.iter().filter(|e| pred(&e.result)).count()
    }
}

/// Charges pending invoices against the payment provider.
///
/// Generic over its two collaborators so tests and alternative backends can
/// substitute doubles.
pub struct BillingService<S, P>
where
    S: InvoiceStore,
    P: PaymentGateway,
{
    store: Arc<S>,
    gateway: Arc<P>,
}

impl<S, P> BillingService<S, P>
where
    S: InvoiceStore,
    P: PaymentGateway,
{
    pub fn new(store: Arc<S>, gateway: Arc<P>) -> Self {
        Self { store, gateway }
    }

    /// Decide whether the invoice gets charged, and charge it if so.
    ///
    /// Validation order is fixed: invoice lookup, customer lookup, currency
    /// check, paid short-circuit, gateway charge. The currency check runs
    /// before the status is even considered — a mis-denominated invoice is
    /// broken data whether or not it was settled.
    ///
    /// Strict by design: every failure kind propagates. No writes happen
    /// here; a successful charge does not flip the invoice to paid (the
    /// store owns status transitions).
    pub async fn decide(&self, invoice_id: InvoiceId) -> Result<BillingOutcome, BillingError> {
        let invoice = self
            .store
            .fetch_invoice(invoice_id)
            .await?
            .ok_or(BillingError::InvoiceNotFound(invoice_id))?;

        let customer = self
            .store
            .fetch_customer(invoice.customer_id)
            .await?
            .ok_or(BillingError::CustomerNotFound(invoice.customer_id))?;

        if invoice.amount.currency != customer.currency {
            return Err(BillingError::CurrencyMismatch {
                invoice_id: invoice.id,
                customer_id: customer.id,
            });
        }

        if invoice.is_paid() {
            // Idempotent short-circuit: re-billing a settled invoice is a
            // no-op success, and the provider is never contacted.
            return Ok(BillingOutcome::Charged);
        }

        if self.gateway.charge(&invoice).await? {
            Ok(BillingOutcome::Charged)
        } else {
            Ok(BillingOutcome::NotCharged)
        }
    }

    /// Run one billing pass over the eligible set.
    ///
    /// Total isolation per invoice: a failure is logged and recorded on the
    /// report, and the pass continues with the next invoice. This method
    /// never returns an error and nothing an individual invoice does can
    /// abort it.
    pub async fn run_all(&self) -> RunReport {
        let run_id = Uuid::now_v7();
        let started_at = Utc::now();
        info!(%run_id, "billing pass started");

        let invoices = match self.store.fetch_invoices().await {
            Ok(invoices) => invoices,
            Err(err) => {
                error!(%run_id, error = %err, "billing pass could not list invoices");
                return RunReport {
                    run_id,
                    started_at,
                    finished_at: Utc::now(),
                    entries: Vec::new(),
                    aborted: Some(err),
                };
            }
        };

        let mut entries = Vec::with_capacity(invoices.len());
        for invoice in &invoices {
            let invoice_id = invoice.id;
            let result = self.decide(invoice_id).await;
            match &result {
                Ok(BillingOutcome::Charged) => {
                    info!(%run_id, %invoice_id, "invoice charged");
                }
                Ok(BillingOutcome::NotCharged) => {
                    info!(%run_id, %invoice_id, "charge declined");
                }
                Err(err) => {
                    warn!(%run_id, %invoice_id, error = %err, "billing failed for invoice");
                }
            }
            entries.push(InvoiceReport { invoice_id, result });
        }

        let report = RunReport {
            run_id,
            started_at,
            finished_at: Utc::now(),
            entries,
            aborted: None,
        };
        info!(
            %run_id,
            charged = report.charged(),
            not_charged = report.not_charged(),
            failed = report.failed(),
            "billing pass finished"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use rust_decimal_macros::dec;

    use billrun_core::{Currency, Customer, Invoice, InvoiceStatus, Money};

    use super::*;

    /// Deterministic store over fixed tables; the eligible set is listed
    /// explicitly so tests control exactly what a pass sees.
    struct FixtureStore {
        invoices: BTreeMap<InvoiceId, Invoice>,
        customers: BTreeMap<CustomerId, Customer>,
        eligible: Vec<InvoiceId>,
    }

    #[async_trait]
    impl InvoiceStore for FixtureStore {
        async fn fetch_invoice(&self, id: InvoiceId) -> Result<Option<Invoice>, StoreError> {
            Ok(self.invoices.get(&id).cloned())
        }

        async fn fetch_customer(&self, id: CustomerId) -> Result<Option<Customer>, StoreError> {
            Ok(self.customers.get(&id).cloned())
        }

        async fn fetch_invoices(&self) -> Result<Vec<Invoice>, StoreError> {
            Ok(self
                .eligible
                .iter()
                .filter_map(|id| self.invoices.get(id).cloned())
                .collect())
        }
    }

    /// Store whose backend is down.
    struct BrokenStore;

    #[async_trait]
    impl InvoiceStore for BrokenStore {
        async fn fetch_invoice(&self, _id: InvoiceId) -> Result<Option<Invoice>, StoreError> {
            Err(StoreError::backend("connection refused"))
        }

        async fn fetch_customer(&self, _id: CustomerId) -> Result<Option<Customer>, StoreError> {
            Err(StoreError::backend("connection refused"))
        }

        async fn fetch_invoices(&self) -> Result<Vec<Invoice>, StoreError> {
            Err(StoreError::backend("connection refused"))
        }
    }

    /// Counts charge attempts; declines invoice 3, charges everything else.
    struct CountingGateway {
        calls: AtomicUsize,
    }

    impl CountingGateway {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl PaymentGateway for CountingGateway {
        async fn charge(&self, invoice: &Invoice) -> Result<bool, GatewayError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(invoice.id != InvoiceId::new(3))
        }
    }

    /// Gateway that cannot reach the provider at all.
    struct UnreachableGateway;

    #[async_trait]
    impl PaymentGateway for UnreachableGateway {
        async fn charge(&self, _invoice: &Invoice) -> Result<bool, GatewayError> {
            Err(GatewayError::network("provider timed out"))
        }
    }

    fn invoice(id: i64, customer: i64, currency: Currency, status: InvoiceStatus) -> Invoice {
        Invoice::new(
            InvoiceId::new(id),
            CustomerId::new(customer),
            Money::new(dec!(1000), currency),
            status,
        )
    }

    /// The standard table: invoice 1 paid, 2 chargeable, 3 declined,
    /// 4 mis-denominated, 5 orphaned (customer 55 does not exist).
    fn fixture_store() -> FixtureStore {
        let invoices = [
            invoice(1, 11, Currency::EUR, InvoiceStatus::Paid),
            invoice(2, 22, Currency::EUR, InvoiceStatus::Pending),
            invoice(3, 33, Currency::EUR, InvoiceStatus::Pending),
            invoice(4, 44, Currency::EUR, InvoiceStatus::Pending),
            invoice(5, 55, Currency::EUR, InvoiceStatus::Pending),
        ];
        let customers = [
            Customer::new(CustomerId::new(11), Currency::EUR),
            Customer::new(CustomerId::new(22), Currency::EUR),
            Customer::new(CustomerId::new(33), Currency::EUR),
            Customer::new(CustomerId::new(44), Currency::DKK),
        ];
        FixtureStore {
            invoices: invoices.into_iter().map(|i| (i.id, i)).collect(),
            customers: customers.into_iter().map(|c| (c.id, c)).collect(),
            eligible: [1, 2, 3, 4].into_iter().map(InvoiceId::new).collect(),
        }
    }

    fn fixture_service() -> BillingService<FixtureStore, CountingGateway> {
        BillingService::new(Arc::new(fixture_store()), Arc::new(CountingGateway::new()))
    }

    #[tokio::test]
    async fn missing_invoice_fails_with_invoice_not_found() {
        let service = fixture_service();
        assert_eq!(
            service.decide(InvoiceId::new(404)).await,
            Err(BillingError::InvoiceNotFound(InvoiceId::new(404)))
        );
    }

    #[tokio::test]
    async fn missing_customer_fails_with_customer_not_found() {
        let service = fixture_service();
        assert_eq!(
            service.decide(InvoiceId::new(5)).await,
            Err(BillingError::CustomerNotFound(CustomerId::new(55)))
        );
    }

    #[tokio::test]
    async fn paid_invoice_is_charged_without_contacting_the_gateway() {
        let gateway = Arc::new(CountingGateway::new());
        let service = BillingService::new(Arc::new(fixture_store()), Arc::clone(&gateway));

        assert_eq!(
            service.decide(InvoiceId::new(1)).await,
            Ok(BillingOutcome::Charged)
        );
        assert_eq!(gateway.calls(), 0);
    }

    #[tokio::test]
    async fn pending_invoice_is_charged_when_the_provider_accepts() {
        let service = fixture_service();
        assert_eq!(
            service.decide(InvoiceId::new(2)).await,
            Ok(BillingOutcome::Charged)
        );
    }

    #[tokio::test]
    async fn pending_invoice_is_not_charged_when_the_provider_declines() {
        let service = fixture_service();
        assert_eq!(
            service.decide(InvoiceId::new(3)).await,
            Ok(BillingOutcome::NotCharged)
        );
    }

    #[tokio::test]
    async fn mismatched_currency_fails_before_any_charge_attempt() {
        let gateway = Arc::new(CountingGateway::new());
        let service = BillingService::new(Arc::new(fixture_store()), Arc::clone(&gateway));

        assert_eq!(
            service.decide(InvoiceId::new(4)).await,
            Err(BillingError::CurrencyMismatch {
                invoice_id: InvoiceId::new(4),
                customer_id: CustomerId::new(44),
            })
        );
        assert_eq!(gateway.calls(), 0);
    }

    #[tokio::test]
    async fn currency_is_validated_even_for_paid_invoices() {
        let mut store = fixture_store();
        store.invoices.insert(
            InvoiceId::new(6),
            invoice(6, 44, Currency::EUR, InvoiceStatus::Paid),
        );
        let service = BillingService::new(Arc::new(store), Arc::new(CountingGateway::new()));

        assert_eq!(
            service.decide(InvoiceId::new(6)).await,
            Err(BillingError::CurrencyMismatch {
                invoice_id: InvoiceId::new(6),
                customer_id: CustomerId::new(44),
            })
        );
    }

    #[tokio::test]
    async fn network_failure_propagates_from_decide() {
        let service =
            BillingService::new(Arc::new(fixture_store()), Arc::new(UnreachableGateway));
        assert_eq!(
            service.decide(InvoiceId::new(2)).await,
            Err(BillingError::Network("provider timed out".to_string()))
        );
    }

    #[tokio::test]
    async fn store_failure_propagates_from_decide() {
        let service = BillingService::new(Arc::new(BrokenStore), Arc::new(CountingGateway::new()));
        assert_eq!(
            service.decide(InvoiceId::new(1)).await,
            Err(BillingError::Store(StoreError::backend("connection refused")))
        );
    }

    #[tokio::test]
    async fn run_all_reports_every_eligible_invoice() {
        let service = fixture_service();
        let report = service.run_all().await;

        assert!(report.aborted.is_none());
        assert_eq!(report.entries.len(), 4);
        assert_eq!(
            report.entries[0],
            InvoiceReport {
                invoice_id: InvoiceId::new(1),
                result: Ok(BillingOutcome::Charged),
            }
        );
        assert_eq!(report.entries[1].result, Ok(BillingOutcome::Charged));
        assert_eq!(report.entries[2].result, Ok(BillingOutcome::NotCharged));
        assert_eq!(
            report.entries[3].result,
            Err(BillingError::CurrencyMismatch {
                invoice_id: InvoiceId::new(4),
                customer_id: CustomerId::new(44),
            })
        );
        assert_eq!(report.charged(), 2);
        assert_eq!(report.not_charged(), 1);
        assert_eq!(report.failed(), 1);
    }

    #[tokio::test]
    async fn run_all_continues_past_every_failure_kind() {
        let mut store = fixture_store();
        store.eligible = [4, 5, 2].into_iter().map(InvoiceId::new).collect();
        let service = BillingService::new(Arc::new(store), Arc::new(UnreachableGateway));

        let report = service.run_all().await;

        assert_eq!(report.entries.len(), 3);
        assert!(matches!(
            report.entries[0].result,
            Err(BillingError::CurrencyMismatch { .. })
        ));
        assert!(matches!(
            report.entries[1].result,
            Err(BillingError::CustomerNotFound(_))
        ));
        assert!(matches!(
            report.entries[2].result,
            Err(BillingError::Network(_))
        ));
        assert_eq!(report.failed(), 3);
    }

    #[tokio::test]
    async fn run_all_survives_a_listing_failure() {
        let service = BillingService::new(Arc::new(BrokenStore), Arc::new(CountingGateway::new()));
        let report = service.run_all().await;

        assert!(report.entries.is_empty());
        assert_eq!(
            report.aborted,
            Some(StoreError::backend("connection refused"))
        );
    }

    #[tokio::test]
    async fn eligible_set_order_is_preserved() {
        let mut store = fixture_store();
        store.eligible = [3, 1, 2].into_iter().map(InvoiceId::new).collect();
        let service = BillingService::new(Arc::new(store), Arc::new(CountingGateway::new()));

        let report = service.run_all().await;
        let ids: Vec<i64> = report
            .entries
            .iter()
            .map(|e| e.invoice_id.value())
            .collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    mod properties {
        use proptest::prelude::*;

        use super::*;

        fn any_currency() -> impl Strategy<Value = Currency> {
            prop_oneof![
                Just(Currency::EUR),
                Just(Currency::USD),
                Just(Currency::DKK),
                Just(Currency::SEK),
                Just(Currency::GBP),
            ]
        }

        fn any_status() -> impl Strategy<Value = InvoiceStatus> {
            prop_oneof![Just(InvoiceStatus::Pending), Just(InvoiceStatus::Paid)]
        }

        /// Gateway with a fixed answer, for exercising the decision table.
        struct ConstGateway(bool);

        #[async_trait]
        impl PaymentGateway for ConstGateway {
            async fn charge(&self, _invoice: &Invoice) -> Result<bool, GatewayError> {
                Ok(self.0)
            }
        }

        proptest! {
            /// The decision table holds for every combination of status,
            /// currencies, and provider answer: mismatch always wins, then
            /// the paid short-circuit, then the provider's verdict.
            #[test]
            fn decision_table_holds(
                status in any_status(),
                invoice_currency in any_currency(),
                customer_currency in any_currency(),
                provider_accepts in any::<bool>(),
            ) {
                let store = FixtureStore {
                    invoices: [(
                        InvoiceId::new(1),
                        Invoice::new(
                            InvoiceId::new(1),
                            CustomerId::new(11),
                            Money::new(dec!(99.95), invoice_currency),
                            status,
                        ),
                    )]
                    .into_iter()
                    .collect(),
                    customers: [(
                        CustomerId::new(11),
                        Customer::new(CustomerId::new(11), customer_currency),
                    )]
                    .into_iter()
                    .collect(),
                    eligible: vec![InvoiceId::new(1)],
                };
                let service =
                    BillingService::new(Arc::new(store), Arc::new(ConstGateway(provider_accepts)));

                let runtime = tokio::runtime::Builder::new_current_thread()
                    .build()
                    .unwrap();
                let result = runtime.block_on(service.decide(InvoiceId::new(1)));

                let expected = if invoice_currency != customer_currency {
                    Err(BillingError::CurrencyMismatch {
                        invoice_id: InvoiceId::new(1),
                        customer_id: CustomerId::new(11),
                    })
                } else if status == InvoiceStatus::Paid || provider_accepts {
                    Ok(BillingOutcome::Charged)
                } else {
                    Ok(BillingOutcome::NotCharged)
                };
                prop_assert_eq!(result, expected);
            }
        }
    }
}
