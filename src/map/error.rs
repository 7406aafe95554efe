//! Error types for the map contract.
//!
//! This module provides the single error type the contract defines:
//! [`UnsupportedOperationError`], raised by a backend that intentionally
//! declines to implement an optional operation. Missing keys are never
//! errors; lookups and removals report absence as `None`.

/// Represents an operation a map backend intentionally does not implement.
///
/// This error signals "this capability is not provided by this backend",
/// not a runtime fault. It is currently raised only by
/// [`OrderedTreeMap`](crate::map::OrderedTreeMap), whose `remove` variants
/// are outside the minimum contract.
///
/// # Examples
///
/// ```rust
/// use duomap::map::UnsupportedOperationError;
///
/// let error = UnsupportedOperationError::new("OrderedTreeMap", "remove");
/// assert_eq!(
///     format!("{}", error),
///     "OrderedTreeMap::remove: operation not supported by this backend"
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnsupportedOperationError {
    /// The name of the backend that rejected the operation.
    pub backend_name: &'static str,
    /// The name of the rejected operation.
    pub operation_name: &'static str,
}

impl UnsupportedOperationError {
    /// Creates a new error for the given backend and operation.
    #[inline]
    #[must_use]
    pub const fn new(backend_name: &'static str, operation_name: &'static str) -> Self {
        Self {
            backend_name,
            operation_name,
        }
    }
}

impl std::fmt::Display for UnsupportedOperationError {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            formatter,
            "{}::{}: operation not supported by this backend",
            self.backend_name, self.operation_name
        )
    }
}

impl std::error::Error for UnsupportedOperationError {}
