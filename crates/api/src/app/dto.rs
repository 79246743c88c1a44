//! Request/response DTOs and mapping to/from domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use billrun_billing::{BillingOutcome, InvoiceReport, RunReport};
use billrun_core::{Customer, Invoice};

#[derive(Debug, Serialize)]
pub struct InvoiceDto {
    pub id: i64,
    pub customer_id: i64,
    pub amount: Decimal,
    pub currency: String,
    pub status: String,
}

impl From<&Invoice> for InvoiceDto {
    fn from(invoice: &Invoice) -> Self {
        Self {
            id: invoice.id.value(),
            customer_id: invoice.customer_id.value(),
            amount: invoice.amount.amount,
            currency: invoice.amount.currency.code().to_string(),
            status: invoice.status.as_str().to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CustomerDto {
    pub id: i64,
    pub currency: String,
}

impl From<&Customer> for CustomerDto {
    fn from(customer: &Customer) -> Self {
        Self {
            id: customer.id.value(),
            currency: customer.currency.code().to_string(),
        }
    }
}

pub fn outcome_str(outcome: BillingOutcome) -> &'static str {
    match outcome {
        BillingOutcome::Charged => "charged",
        BillingOutcome::NotCharged => "not_charged",
    }
}

/// Result of charging one invoice via the API.
#[derive(Debug, Serialize)]
pub struct ChargeResponseDto {
    pub invoice_id: i64,
    pub outcome: &'static str,
}

/// One entry of a billing pass: either an outcome or an error message,
/// never both.
#[derive(Debug, Serialize)]
pub struct RunEntryDto {
    pub invoice_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<&InvoiceReport> for RunEntryDto {
    fn from(entry: &InvoiceReport) -> Self {
        match &entry.result {
            Ok(outcome) => Self {
                invoice_id: entry.invoice_id.value(),
                outcome: Some(outcome_str(*outcome)),
                error: None,
            },
            Err(err) => Self {
                invoice_id: entry.invoice_id.value(),
                outcome: None,
                error: Some(err.to_string()),
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RunReportDto {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub charged: usize,
    pub not_charged: usize,
    pub failed: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aborted: Option<String>,
    pub entries: Vec<RunEntryDto>,
}

impl From<&RunReport> for RunReportDto {
    fn from(report: &RunReport) -> Self {
        Self {
            run_id: report.run_id.to_string(),
            started_at: report.started_at,
            finished_at: report.finished_at,
            charged: report.charged(),
            not_charged: report.not_charged(),
            failed: report.failed(),
            aborted: report.aborted.as_ref().map(|e| e.to_string()),
            entries: report.entries.iter().map(RunEntryDto::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    use billrun_billing::BillingError;
    use billrun_core::{Currency, CustomerId, InvoiceId, InvoiceStatus, Money};

    use super::*;

    #[test]
    fn invoice_dto_uses_wire_forms() {
        let invoice = Invoice::new(
            InvoiceId::new(2),
            CustomerId::new(22),
            Money::new(dec!(1000), Currency::EUR),
            InvoiceStatus::Pending,
        );
        let dto = InvoiceDto::from(&invoice);
        assert_eq!(dto.currency, "EUR");
        assert_eq!(dto.status, "PENDING");
        assert_eq!(dto.customer_id, 22);
    }

    #[test]
    fn run_entry_carries_outcome_or_error() {
        let ok = InvoiceReport {
            invoice_id: InvoiceId::new(1),
            result: Ok(BillingOutcome::Charged),
        };
        let dto = RunEntryDto::from(&ok);
        assert_eq!(dto.outcome, Some("charged"));
        assert!(dto.error.is_none());

        let failed = InvoiceReport {
            invoice_id: InvoiceId::new(404),
            result: Err(BillingError::InvoiceNotFound(InvoiceId::new(404))),
        };
        let dto = RunEntryDto::from(&failed);
        assert!(dto.outcome.is_none());
        assert_eq!(dto.error.as_deref(), Some("invoice 404 not found"));
    }

    #[test]
    fn run_report_dto_counts_match_entries() {
        let now = Utc::now();
        let report = RunReport {
            run_id: Uuid::now_v7(),
            started_at: now,
            finished_at: now,
            entries: vec![
                InvoiceReport {
                    invoice_id: InvoiceId::new(1),
                    result: Ok(BillingOutcome::Charged),
                },
                InvoiceReport {
                    invoice_id: InvoiceId::new(3),
                    result: Ok(BillingOutcome::NotCharged),
                },
            ],
            aborted: None,
        };
        let dto = RunReportDto::from(&report);
        assert_eq!(dto.charged, 1);
        assert_eq!(dto.not_charged, 1);
        assert_eq!(dto.failed, 0);
        assert_eq!(dto.entries.len(), 2);
    }
}
