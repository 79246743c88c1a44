//! Customer read model.

use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::id::CustomerId;
use crate::money::Currency;

/// The payer an invoice belongs to.
///
/// A customer's account is denominated in exactly one currency; invoices in
/// any other currency are invalid for that customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub currency: Currency,
}

impl Customer {
    pub fn new(id: CustomerId, currency: Currency) -> Self {
        Self { id, currency }
    }
}

impl Entity for Customer {
    type Id = CustomerId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
