//! # folio-core: Pure Business Logic for Folio
//!
//! This crate is the **heart** of Folio, a manager for invoices, quotations
//! and receipts. It contains all business logic as pure functions with zero
//! I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Folio Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Web Frontend (form UI)                       │   │
//! │  │    Document Form ──► Preview ──► PDF ──► Send Email             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ DocumentDraft                          │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ folio-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │  totals   │  │ numbering │  │ validation│  │   │
//! │  │   │ Document  │  │  Totals   │  │ INV-0001  │  │   rules   │  │   │
//! │  │   │ LineItem  │  │ breakdown │  │ QUO-0001  │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    folio-db (Storage Layer)                     │   │
//! │  │        DocumentRepository, SQLite, DocumentService              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Document, LineItem, CompanyInfo, etc.)
//! - [`money`] - Money and Percentage over exact decimals, currency display
//! - [`totals`] - The financial calculator
//! - [`numbering`] - `INV-0001` style document numbers
//! - [`document`] - Draft → saved document lifecycle
//! - [`validation`] - Form-layer validation rules
//! - [`dispatch`] - Email request composition
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Exact Money**: Amounts are decimals, rounded only for display
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use folio_core::totals::{compute_totals, ItemAmounts};
//! use folio_core::{Money, Percentage};
//! use rust_decimal::Decimal;
//!
//! let items = [ItemAmounts::new(Decimal::from(2), Money::from(100))];
//! let totals = compute_totals(&items, Percentage::from(Decimal::new(165, 1)), Percentage::zero());
//!
//! assert_eq!(totals.subtotal, Money::from(200));
//! assert_eq!(totals.tax_amount, Money::from(33));
//! assert_eq!(totals.total, Money::from(233));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod dispatch;
pub mod document;
pub mod error;
pub mod money;
pub mod numbering;
pub mod totals;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use document::DocumentDraft;
pub use error::{CoreError, ValidationError};
pub use money::{CurrencyFormat, Money, Percentage};
pub use numbering::{next_document_number, DocumentNumber};
pub use totals::{compute_totals, Totals};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Tax rate pre-filled on new documents, in percent (VAT 16.5%).
pub const DEFAULT_TAX_RATE_PERCENT: &str = "16.5";

/// ISO 4217 code used for display when nothing else is configured.
pub const DEFAULT_CURRENCY_CODE: &str = "MWK";

/// Business name printed on documents when no company profile is saved.
pub const DEFAULT_BUSINESS_NAME: &str = "KETHU GROUPS";

/// Minimum digits in the sequence part of a document number.
pub const DOCUMENT_NUMBER_WIDTH: usize = 4;
