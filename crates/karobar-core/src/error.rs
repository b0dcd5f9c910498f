//! # Error Types
//!
//! Domain-specific error types for karobar-core.
//!
//! ## Error Hierarchy
//! ```text
//! karobar-core errors (this file)
//! ├── CoreError        - General domain errors
//! └── ValidationError  - Ledger-entry validation failures
//!
//! karobar-db errors (separate crate)
//! └── DbError          - Database operation failures
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (product name, employee id, etc.)
//! 3. Errors are enum variants, never String
//!
//! Note that a line item pointing at a *deleted* product or reward is not an
//! error anywhere in this crate: such references degrade to a zero-cost,
//! zero-profit contribution and the cached name is displayed instead (see
//! [`crate::units`]).

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Ledger entry cannot be found.
    #[error("Ledger entry not found: {0}")]
    EntryNotFound(String),

    /// Employee cannot be found.
    #[error("Employee not found: {0}")]
    EmployeeNotFound(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Ledger-entry validation errors.
///
/// These are surfaced immediately on submission and block persistence:
/// no partial write ever happens for an invalid entry.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Entry has no sold, damaged, or reward line items at all.
    #[error("Ledger entry must contain at least one line item")]
    NoLineItems,

    /// Numeric value must not be negative.
    #[error("{field} must not be negative")]
    MustBeNonNegative { field: String },

    /// Returned quantity exceeds the counted (summary) quantity.
    ///
    /// quantity_sold = summary_quantity - quantity_returned must stay >= 0.
    #[error("returned quantity {returned} exceeds counted quantity {counted} for {product}")]
    ReturnedExceedsCounted {
        product: String,
        counted: f64,
        returned: f64,
    },

    /// Invalid format (e.g., invalid UUID).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

/// Convenience type alias for validation results.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ValidationError::ReturnedExceedsCounted {
            product: "Lux Soap".to_string(),
            counted: 3.0,
            returned: 5.0,
        };
        assert_eq!(
            err.to_string(),
            "returned quantity 5 exceeds counted quantity 3 for Lux Soap"
        );
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::NoLineItems;
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
