//! # Error Types
//!
//! Domain-specific error types for folio-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  folio-core errors (this file)                                         │
//! │  ├── CoreError        - General domain errors                          │
//! │  └── ValidationError  - Form input validation failures                 │
//! │                                                                         │
//! │  folio-db errors (separate crate)                                      │
//! │  ├── DbError          - Storage operation failures                     │
//! │  └── ServiceError     - What callers of DocumentService see            │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ServiceError → Frontend           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The financial calculator itself has no error type: it never fails.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A document type name outside invoice/quotation/receipt.
    #[error("Unknown document type: {0}")]
    UnknownDocumentType(String),

    /// A status name outside draft/sent/paid/overdue.
    #[error("Unknown document status: {0}")]
    UnknownStatus(String),

    /// A document number that is not `PREFIX-NNNN`.
    #[error("Invalid document number '{0}': expected PREFIX-NNNN")]
    InvalidDocumentNumber(String),

    /// Email recipient address is unusable.
    ///
    /// ## When This Occurs
    /// - Address is empty
    /// - Address has no `@`
    #[error("Invalid recipient email address: '{0}'")]
    InvalidRecipient(String),

    /// The document being sent is not the kind the caller asked for.
    #[error("Document type mismatch: expected {expected}, but document is {actual}")]
    DocumentTypeMismatch { expected: String, actual: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when form input doesn't meet requirements.
/// The calculator never raises them; they come from [`crate::validation`].
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange {
        field: String,
        min: String,
        max: String,
    },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Invalid format (e.g., invalid UUID, invalid email).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// A date that must not precede another.
    #[error("{field} cannot be before {other}")]
    DateOrder { field: String, other: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
