//! # Domain Types
//!
//! Core domain types used throughout Folio.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Document     │   │    LineItem     │   │   CompanyInfo   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  name           │       │
//! │  │  document_number│◄──│  quantity       │   │  address        │       │
//! │  │  customer       │   │  unit_price     │   │  phone, email   │       │
//! │  │  totals         │   │  total          │   │  tax_id         │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐                             │
//! │  │  DocumentType   │   │ DocumentStatus  │                             │
//! │  │  ─────────────  │   │  ─────────────  │                             │
//! │  │  Invoice   INV  │   │  Draft          │                             │
//! │  │  Quotation QUO  │   │  Sent           │                             │
//! │  │  Receipt   REC  │   │  Paid, Overdue  │                             │
//! │  └─────────────────┘   └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every document has:
//! - `id`: UUID v4 - immutable, used for storage lookups
//! - `document_number`: human-readable (`INV-0001`), printed on the document

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::CoreError;
use crate::money::{Money, Percentage};
use crate::DEFAULT_BUSINESS_NAME;

// =============================================================================
// Document Type
// =============================================================================

/// The kind of business document. Closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    Invoice,
    Quotation,
    Receipt,
}

impl DocumentType {
    /// All document types, in display order.
    pub const ALL: [DocumentType; 3] = [
        DocumentType::Invoice,
        DocumentType::Quotation,
        DocumentType::Receipt,
    ];

    /// Prefix of the human-readable number (`INV`, `QUO`, `REC`).
    pub const fn prefix(&self) -> &'static str {
        match self {
            DocumentType::Invoice => "INV",
            DocumentType::Quotation => "QUO",
            DocumentType::Receipt => "REC",
        }
    }

    /// Looks up the type owning a number prefix.
    pub fn from_prefix(prefix: &str) -> Option<Self> {
        DocumentType::ALL.into_iter().find(|t| t.prefix() == prefix)
    }

    /// Lowercase wire name (`invoice`).
    pub const fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Invoice => "invoice",
            DocumentType::Quotation => "quotation",
            DocumentType::Receipt => "receipt",
        }
    }

    /// Capitalised label (`Invoice`).
    pub const fn label(&self) -> &'static str {
        match self {
            DocumentType::Invoice => "Invoice",
            DocumentType::Quotation => "Quotation",
            DocumentType::Receipt => "Receipt",
        }
    }

    /// Heading printed at the top of the page (`INVOICE`).
    pub const fn title(&self) -> &'static str {
        match self {
            DocumentType::Invoice => "INVOICE",
            DocumentType::Quotation => "QUOTATION",
            DocumentType::Receipt => "RECEIPT",
        }
    }

    /// Caption next to the document number (`Invoice no`).
    pub fn number_label(&self) -> String {
        format!("{} no", self.label())
    }

    /// Caption above the customer block (`Invoice to`).
    pub fn recipient_label(&self) -> String {
        format!("{} to", self.label())
    }

    /// Only invoices carry a due date on the form.
    pub const fn has_due_date(&self) -> bool {
        matches!(self, DocumentType::Invoice)
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "invoice" => Ok(DocumentType::Invoice),
            "quotation" => Ok(DocumentType::Quotation),
            "receipt" => Ok(DocumentType::Receipt),
            other => Err(CoreError::UnknownDocumentType(other.to_string())),
        }
    }
}

// =============================================================================
// Document Status
// =============================================================================

/// Where a document is in its life.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    /// Being prepared; every new document starts here.
    #[default]
    Draft,
    /// Delivered to the customer.
    Sent,
    /// Settled.
    Paid,
    /// Past its due date and unpaid.
    Overdue,
}

impl DocumentStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            DocumentStatus::Draft => "draft",
            DocumentStatus::Sent => "sent",
            DocumentStatus::Paid => "paid",
            DocumentStatus::Overdue => "overdue",
        }
    }
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "draft" => Ok(DocumentStatus::Draft),
            "sent" => Ok(DocumentStatus::Sent),
            "paid" => Ok(DocumentStatus::Paid),
            "overdue" => Ok(DocumentStatus::Overdue),
            other => Err(CoreError::UnknownStatus(other.to_string())),
        }
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// One priced entry within a document.
///
/// `total` is a cached `quantity × unit_price`. Anything that edits
/// quantity or price must call [`LineItem::recompute`]; readers that cannot
/// be sure should use [`LineItem::line_total`] instead of `total`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Unique within the owning document.
    pub id: String,

    /// Free-text description.
    pub description: String,

    /// Quantity (non-negative on valid input).
    #[ts(as = "String")]
    pub quantity: Decimal,

    /// Price per unit.
    #[ts(as = "String")]
    pub unit_price: Money,

    /// Cached line total.
    #[ts(as = "String")]
    pub total: Money,
}

impl LineItem {
    /// Creates a line item with a fresh id and a computed total.
    pub fn new(description: impl Into<String>, quantity: Decimal, unit_price: Money) -> Self {
        LineItem {
            id: uuid::Uuid::new_v4().to_string(),
            description: description.into(),
            quantity,
            unit_price,
            total: unit_price.times(quantity),
        }
    }

    /// `quantity × unit_price`, ignoring the cached total.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price.times(self.quantity)
    }

    /// Refreshes the cached total.
    pub fn recompute(&mut self) {
        self.total = self.line_total();
    }

    /// Whether the cached total matches quantity × unit price.
    pub fn is_consistent(&self) -> bool {
        self.total == self.line_total()
    }
}

// =============================================================================
// Customer
// =============================================================================

/// Who the document is addressed to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub name: String,
    pub address: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl Customer {
    /// Customer with only a name.
    pub fn named(name: impl Into<String>) -> Self {
        Customer {
            name: name.into(),
            ..Customer::default()
        }
    }
}

// =============================================================================
// Document
// =============================================================================

/// An invoice, quotation or receipt.
///
/// The monetary fields (`subtotal`, `tax_amount`, `total`) are always
/// derivable from `items`, `tax_rate` and `discount`; see
/// [`Document::recompute`] and [`Document::is_consistent`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,

    #[serde(rename = "type")]
    pub doc_type: DocumentType,

    pub document_number: String,

    #[ts(as = "String")]
    pub date: NaiveDate,

    #[ts(as = "Option<String>")]
    pub due_date: Option<NaiveDate>,

    pub customer: Customer,

    pub items: Vec<LineItem>,

    #[ts(as = "String")]
    pub subtotal: Money,

    #[ts(as = "String")]
    pub tax_rate: Percentage,

    #[ts(as = "String")]
    pub tax_amount: Money,

    /// Discount in percent of the subtotal.
    #[ts(as = "String")]
    pub discount: Percentage,

    #[ts(as = "String")]
    pub total: Money,

    pub notes: Option<String>,

    pub status: DocumentStatus,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Company Info
// =============================================================================

/// The business issuing documents.
///
/// Passed explicitly to whatever prints or emails a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CompanyInfo {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub tax_id: Option<String>,
}

impl Default for CompanyInfo {
    fn default() -> Self {
        CompanyInfo {
            name: DEFAULT_BUSINESS_NAME.to_string(),
            address: String::new(),
            phone: String::new(),
            email: String::new(),
            tax_id: None,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_document_type_labels() {
        assert_eq!(DocumentType::Invoice.prefix(), "INV");
        assert_eq!(DocumentType::Quotation.prefix(), "QUO");
        assert_eq!(DocumentType::Receipt.prefix(), "REC");

        assert_eq!(DocumentType::Quotation.title(), "QUOTATION");
        assert_eq!(DocumentType::Receipt.number_label(), "Receipt no");
        assert_eq!(DocumentType::Invoice.recipient_label(), "Invoice to");
    }

    #[test]
    fn test_document_type_round_trips_through_str() {
        for t in DocumentType::ALL {
            assert_eq!(t.as_str().parse::<DocumentType>().unwrap(), t);
            assert_eq!(DocumentType::from_prefix(t.prefix()), Some(t));
        }
        assert!("credit-note".parse::<DocumentType>().is_err());
    }

    #[test]
    fn test_status_default_is_draft() {
        assert_eq!(DocumentStatus::default(), DocumentStatus::Draft);
        assert_eq!("Paid".parse::<DocumentStatus>().unwrap(), DocumentStatus::Paid);
    }

    #[test]
    fn test_line_item_recompute() {
        let mut item = LineItem::new("Consulting", dec!(3), Money::from(50));
        assert_eq!(item.total, Money::from(150));

        item.quantity = dec!(4);
        assert!(!item.is_consistent());
        assert_eq!(item.line_total(), Money::from(200));

        item.recompute();
        assert!(item.is_consistent());
        assert_eq!(item.total, Money::from(200));
    }

    #[test]
    fn test_document_type_serializes_lowercase() {
        let json = serde_json::to_string(&DocumentType::Quotation).unwrap();
        assert_eq!(json, "\"quotation\"");
    }

    #[test]
    fn test_company_default_name() {
        assert_eq!(CompanyInfo::default().name, "KETHU GROUPS");
    }
}
