//! Strongly-typed identifiers used across the domain.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Identifier of an invoice.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvoiceId(i64);

/// Identifier of a customer (the payer an invoice belongs to).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerId(i64);

macro_rules! impl_i64_newtype {
    ($t:ty, $name:literal) => {
        impl $t {
            /// Wrap a raw integer identifier.
            ///
            /// Identifiers are assigned by the store; the domain never
            /// invents them.
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            pub const fn value(&self) -> i64 {
                self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<i64> for $t {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl From<$t> for i64 {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.parse::<i64>()
                    .map(Self)
                    .map_err(|_| DomainError::invalid_id(format!("{} id: {s:?}", $name)))
            }
        }
    };
}

impl_i64_newtype!(InvoiceId, "invoice");
impl_i64_newtype!(CustomerId, "customer");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_and_parse_round_trip() {
        let id = InvoiceId::new(404);
        assert_eq!(id.to_string(), "404");
        assert_eq!("404".parse::<InvoiceId>().unwrap(), id);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(matches!(
            "not-a-number".parse::<CustomerId>(),
            Err(DomainError::InvalidId(_))
        ));
    }

    #[test]
    fn serde_is_transparent() {
        let json = serde_json::to_string(&CustomerId::new(11)).unwrap();
        assert_eq!(json, "11");
    }
}
