//! Money and currency value objects.

use core::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::value_object::ValueObject;

/// Currencies invoices can be denominated in.
///
/// Closed set: the billing core never converts between currencies, it only
/// compares them, so adding a currency is a domain decision, not a config
/// value.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    EUR,
    USD,
    DKK,
    SEK,
    GBP,
}

impl Currency {
    pub const fn code(&self) -> &'static str {
        match self {
            Self::EUR => "EUR",
            Self::USD => "USD",
            Self::DKK => "DKK",
            Self::SEK => "SEK",
            Self::GBP => "GBP",
        }
    }

    /// All supported currencies, in no particular order.
    pub const ALL: [Currency; 5] = [
        Self::EUR,
        Self::USD,
        Self::DKK,
        Self::SEK,
        Self::GBP,
    ];
}

impl core::fmt::Display for Currency {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "EUR" => Ok(Self::EUR),
            "USD" => Ok(Self::USD),
            "DKK" => Ok(Self::DKK),
            "SEK" => Ok(Self::SEK),
            "GBP" => Ok(Self::GBP),
            other => Err(DomainError::unknown_currency(other)),
        }
    }
}

/// A decimal amount in a specific currency.
///
/// Compared by value. The billing core never does arithmetic on the amount;
/// it only checks the currency and hands the money to the payment gateway.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    pub amount: Decimal,
    pub currency: Currency,
}

impl Money {
    pub const fn new(amount: Decimal, currency: Currency) -> Self {
        Self { amount, currency }
    }
}

impl ValueObject for Money {}
