//! Invoice read model.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::error::DomainError;
use crate::id::{CustomerId, InvoiceId};
use crate::money::Money;

/// Invoice lifecycle status.
///
/// The billing core only distinguishes "still owed" from "settled"; richer
/// lifecycles (void, written-off, ...) belong to whoever owns invoice
/// creation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum InvoiceStatus {
    Pending,
    Paid,
}

impl InvoiceStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Paid => "PAID",
        }
    }
}

impl core::fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InvoiceStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "PAID" => Ok(Self::Paid),
            other => Err(DomainError::unknown_status(other)),
        }
    }
}

/// A billable unit: an amount a specific customer owes.
///
/// The billing core treats invoices as read-only records supplied by the
/// store; creating and mutating them is the store owner's business.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: InvoiceId,
    pub customer_id: CustomerId,
    pub amount: Money,
    pub status: InvoiceStatus,
}

impl Invoice {
    pub fn new(id: InvoiceId, customer_id: CustomerId, amount: Money, status: InvoiceStatus) -> Self {
        Self {
            id,
            customer_id,
            amount,
            status,
        }
    }

    pub fn is_paid(&self) -> bool {
        self.status == InvoiceStatus::Paid
    }
}

impl Entity for Invoice {
    type Id = InvoiceId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
