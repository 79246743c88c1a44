//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic parse/validation failures of domain
/// values. Billing-decision failures and infrastructure concerns live in the
/// layers that own them.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A currency code did not name a supported currency.
    #[error("unknown currency code: {0}")]
    UnknownCurrency(String),

    /// An invoice status string did not name a known status.
    #[error("unknown invoice status: {0}")]
    UnknownStatus(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl DomainError {
    pub fn unknown_currency(code: impl Into<String>) -> Self {
        Self::UnknownCurrency(code.into())
    }

    pub fn unknown_status(status: impl Into<String>) -> Self {
        Self::UnknownStatus(status.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }
}
