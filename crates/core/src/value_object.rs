//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. Per-request
/// policy snapshots and settings implement this: once built they are only
/// read, so they can be shared across concurrent evaluations without locks.
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq, Eq)]
/// struct Window {
///     valid_days: u32,
///     warning_days: u32,
/// }
///
/// impl ValueObject for Window {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
