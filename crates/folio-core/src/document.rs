//! # Document Lifecycle
//!
//! Turning form input into a saved [`Document`], and keeping its money
//! fields honest across edits.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  DocumentDraft (form) ──► Document::create() ──► status: Draft          │
//! │                                 │                                       │
//! │                                 ▼                                       │
//! │  DocumentDraft (edit) ──► Document::replace_with()                      │
//! │                           (whole record replaced, totals recomputed)    │
//! │                                 │                                       │
//! │                                 ▼                                       │
//! │                        with_status(Sent / Paid / Overdue)               │
//! │                                 │                                       │
//! │                                 ▼                                       │
//! │                          delete (in the repository, final)              │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! There are no field-level patches. Every save goes through
//! [`Document::recompute`].

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use ts_rs::TS;

use crate::money::{Money, Percentage};
use crate::totals::{self, TotalsBreakdown};
use crate::types::{Customer, Document, DocumentStatus, DocumentType, LineItem};
use crate::DEFAULT_TAX_RATE_PERCENT;

// =============================================================================
// Draft
// =============================================================================

/// What the document form submits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DocumentDraft {
    #[serde(rename = "type")]
    pub doc_type: DocumentType,

    /// Explicit number typed by the user; generated when `None`.
    pub document_number: Option<String>,

    #[ts(as = "String")]
    pub date: NaiveDate,

    #[ts(as = "Option<String>")]
    pub due_date: Option<NaiveDate>,

    pub customer: Customer,

    pub items: Vec<LineItem>,

    #[ts(as = "String")]
    pub tax_rate: Percentage,

    #[ts(as = "String")]
    pub discount: Percentage,

    pub notes: Option<String>,
}

impl DocumentDraft {
    /// Empty draft with the form defaults: default VAT, no discount.
    pub fn new(doc_type: DocumentType, date: NaiveDate, customer: Customer) -> Self {
        DocumentDraft {
            doc_type,
            document_number: None,
            date,
            due_date: None,
            customer,
            items: Vec::new(),
            tax_rate: default_tax_rate(),
            discount: Percentage::zero(),
            notes: None,
        }
    }

    /// Appends a line item.
    pub fn with_item(mut self, description: impl Into<String>, quantity: Decimal, unit_price: Money) -> Self {
        self.items.push(LineItem::new(description, quantity, unit_price));
        self
    }

    pub fn with_tax_rate(mut self, tax_rate: Percentage) -> Self {
        self.tax_rate = tax_rate;
        self
    }

    pub fn with_discount(mut self, discount: Percentage) -> Self {
        self.discount = discount;
        self
    }

    pub fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn with_number(mut self, number: impl Into<String>) -> Self {
        self.document_number = Some(number.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Live totals for the form, before anything is saved.
    pub fn preview(&self) -> TotalsBreakdown {
        totals::breakdown(&self.items, self.tax_rate, self.discount)
    }
}

/// The VAT rate new drafts start with.
pub fn default_tax_rate() -> Percentage {
    Percentage::from_str(DEFAULT_TAX_RATE_PERCENT).unwrap_or_default()
}

/// Empty strings from the form mean "not given".
fn non_empty(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    })
}

fn tidy_customer(customer: Customer) -> Customer {
    Customer {
        name: customer.name.trim().to_string(),
        address: non_empty(customer.address),
        email: non_empty(customer.email),
        phone: non_empty(customer.phone),
    }
}

// =============================================================================
// Document
// =============================================================================

impl Document {
    /// Builds a new draft-status document from form input.
    ///
    /// `document_number` is used unless the draft carries its own.
    pub fn create(
        id: impl Into<String>,
        document_number: impl Into<String>,
        draft: DocumentDraft,
        now: DateTime<Utc>,
    ) -> Self {
        let number = non_empty(draft.document_number.clone()).unwrap_or_else(|| document_number.into());

        let mut document = Document {
            id: id.into(),
            doc_type: draft.doc_type,
            document_number: number,
            date: draft.date,
            due_date: draft.due_date,
            customer: tidy_customer(draft.customer),
            items: draft.items,
            subtotal: Money::zero(),
            tax_rate: draft.tax_rate,
            tax_amount: Money::zero(),
            discount: draft.discount,
            total: Money::zero(),
            notes: non_empty(draft.notes),
            status: DocumentStatus::Draft,
            created_at: now,
            updated_at: now,
        };
        document.recompute();
        document
    }

    /// Replaces the whole document with an edited draft.
    ///
    /// Keeps identity (`id`, type, `created_at`) and status. The number is
    /// kept unless the draft supplies a new one.
    pub fn replace_with(&self, draft: DocumentDraft, now: DateTime<Utc>) -> Self {
        let mut next = Document::create(self.id.clone(), self.document_number.clone(), draft, now);
        next.doc_type = self.doc_type;
        next.status = self.status;
        next.created_at = self.created_at;
        next
    }

    /// Same document with a new status.
    pub fn with_status(&self, status: DocumentStatus, now: DateTime<Utc>) -> Self {
        let mut next = self.clone();
        next.status = status;
        next.updated_at = now;
        next.recompute();
        next
    }

    /// Recomputes every line total and the document totals.
    pub fn recompute(&mut self) {
        for item in &mut self.items {
            item.recompute();
        }
        let totals = totals::compute_totals(&self.items, self.tax_rate, self.discount);
        self.subtotal = totals.subtotal;
        self.tax_amount = totals.tax_amount;
        self.total = totals.total;
    }

    /// Whether the stored money fields match their derivation.
    pub fn is_consistent(&self) -> bool {
        let totals = totals::compute_totals(&self.items, self.tax_rate, self.discount);
        self.items.iter().all(LineItem::is_consistent)
            && self.subtotal == totals.subtotal
            && self.tax_amount == totals.tax_amount
            && self.total == totals.total
    }

    /// `subtotal × discount / 100`, for display.
    pub fn discount_amount(&self) -> Money {
        totals::discount_amount(self.subtotal, self.discount)
    }

    /// All intermediate figures, for the totals block of a rendered page.
    pub fn breakdown(&self) -> TotalsBreakdown {
        totals::breakdown(&self.items, self.tax_rate, self.discount)
    }

    /// Turns the saved document back into an editable draft.
    pub fn to_draft(&self) -> DocumentDraft {
        DocumentDraft {
            doc_type: self.doc_type,
            document_number: Some(self.document_number.clone()),
            date: self.date,
            due_date: self.due_date,
            customer: self.customer.clone(),
            items: self.items.clone(),
            tax_rate: self.tax_rate,
            discount: self.discount,
            notes: self.notes.clone(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
