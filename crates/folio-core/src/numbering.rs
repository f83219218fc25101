//! # Document Numbering
//!
//! Human-readable, per-type sequential numbers: `INV-0001`, `QUO-0042`.
//!
//! ```text
//! next_document_number(Invoice, 0)  → "INV-0001"
//! next_document_number(Invoice, 9)  → "INV-0010"
//! next_document_number(Receipt, 9999) → "REC-10000"   (width is a minimum)
//! ```
//!
//! These functions trust the count they are given and do no uniqueness
//! check. `folio-db` feeds them from a persisted per-type counter, so a
//! deleted document's number is never handed out again.

use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;
use crate::types::DocumentType;
use crate::DOCUMENT_NUMBER_WIDTH;

/// A parsed `PREFIX-NNNN` document number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocumentNumber {
    pub doc_type: DocumentType,
    pub sequence: u64,
}

impl DocumentNumber {
    pub const fn new(doc_type: DocumentType, sequence: u64) -> Self {
        DocumentNumber { doc_type, sequence }
    }
}

impl fmt::Display for DocumentNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{:0width$}",
            self.doc_type.prefix(),
            self.sequence,
            width = DOCUMENT_NUMBER_WIDTH
        )
    }
}

impl FromStr for DocumentNumber {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CoreError::InvalidDocumentNumber(s.to_string());

        let (prefix, digits) = s.trim().split_once('-').ok_or_else(invalid)?;
        let doc_type = DocumentType::from_prefix(prefix).ok_or_else(invalid)?;

        if digits.len() < DOCUMENT_NUMBER_WIDTH || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let sequence = digits.parse::<u64>().map_err(|_| invalid())?;

        Ok(DocumentNumber { doc_type, sequence })
    }
}

/// Number for the next document of `doc_type`, given how many already exist.
///
/// The sequence is `existing_count + 1`, zero-padded to at least four digits.
///
/// ## Example
/// ```rust
/// use folio_core::{next_document_number, DocumentType};
///
/// assert_eq!(next_document_number(DocumentType::Invoice, 0), "INV-0001");
/// assert_eq!(next_document_number(DocumentType::Quotation, 41), "QUO-0042");
/// ```
pub fn next_document_number(doc_type: DocumentType, existing_count: u64) -> String {
    DocumentNumber::new(doc_type, existing_count.saturating_add(1)).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_invoice() {
        assert_eq!(next_document_number(DocumentType::Invoice, 0), "INV-0001");
        assert_eq!(next_document_number(DocumentType::Invoice, 9), "INV-0010");
    }

    #[test]
    fn test_prefix_per_type() {
        assert_eq!(next_document_number(DocumentType::Quotation, 0), "QUO-0001");
        assert_eq!(next_document_number(DocumentType::Receipt, 122), "REC-0123");
    }

    #[test]
    fn test_width_is_a_minimum() {
        assert_eq!(next_document_number(DocumentType::Receipt, 9999), "REC-10000");
    }

    #[test]
    fn test_parse() {
        let n: DocumentNumber = "QUO-0042".parse().unwrap();
        assert_eq!(n, DocumentNumber::new(DocumentType::Quotation, 42));
        assert_eq!(n.to_string(), "QUO-0042");

        let big: DocumentNumber = "INV-12345".parse().unwrap();
        assert_eq!(big.sequence, 12345);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in ["", "INV", "INV-", "INV-12", "XYZ-0001", "INV-00a1", "inv-0001", "INV0001"] {
            assert!(bad.parse::<DocumentNumber>().is_err(), "accepted {bad:?}");
        }
    }
}
