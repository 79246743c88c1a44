//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value** — they have no
/// identity of their own. `Money { 100.00, EUR }` equals any other
/// `Money { 100.00, EUR }`; there is no "which one" to ask about.
///
/// The trait requires `Clone + PartialEq + Debug` so values can be copied
/// around, compared in assertions, and logged.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
