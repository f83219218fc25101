//! # Validation Module
//!
//! Form-layer validation for document drafts.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Frontend form                                                │
//! │  ├── required fields, input types                                      │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: DocumentService::create / update                             │
//! │  └── THIS MODULE: validate_draft                                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Calculator (totals.rs)                                       │
//! │  └── NO validation - accepts any number and passes it through          │
//! │                                                                         │
//! │  Layer 4: Database (SQLite)                                            │
//! │  ├── NOT NULL constraints                                              │
//! │  └── UNIQUE (doc_type, document_number)                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use folio_core::validation::{validate_email, validate_percentage};
//! use folio_core::Percentage;
//!
//! assert!(validate_email("billing@example.com").is_ok());
//! assert!(validate_percentage("discount", Percentage::from(150)).is_err());
//! ```

use rust_decimal::Decimal;

use crate::document::DocumentDraft;
use crate::error::ValidationError;
use crate::money::{Money, Percentage};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

const MAX_NAME_LEN: usize = 200;
const MAX_DOCUMENT_NUMBER_LEN: usize = 50;

// =============================================================================
// String Validators
// =============================================================================

/// Validates the customer name.
///
/// ## Rules
/// - Must not be empty
/// - At most 200 characters
pub fn validate_customer_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "customer name".to_string(),
        });
    }

    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "customer name".to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates an email address.
///
/// ## Rules
/// - Must contain `@` with something on both sides
/// - No whitespace inside
///
/// This is the same loose check the send-email dialog applies; the mail
/// provider does the real verification.
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();

    if email.is_empty() {
        return Err(ValidationError::Required {
            field: "email".to_string(),
        });
    }

    let well_formed = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.is_empty() && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };

    if !well_formed {
        return Err(ValidationError::InvalidFormat {
            field: "email".to_string(),
            reason: "must look like name@domain".to_string(),
        });
    }

    Ok(())
}

/// Validates a document number typed by the user.
///
/// Free text is allowed (users may follow their own scheme), but it must
/// not be blank or absurdly long.
pub fn validate_document_number(number: &str) -> ValidationResult<()> {
    let number = number.trim();

    if number.is_empty() {
        return Err(ValidationError::Required {
            field: "document number".to_string(),
        });
    }

    if number.len() > MAX_DOCUMENT_NUMBER_LEN {
        return Err(ValidationError::TooLong {
            field: "document number".to_string(),
            max: MAX_DOCUMENT_NUMBER_LEN,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line item quantity. Zero is allowed.
pub fn validate_quantity(quantity: Decimal) -> ValidationResult<()> {
    if quantity.is_sign_negative() && !quantity.is_zero() {
        return Err(ValidationError::MustNotBeNegative {
            field: "quantity".to_string(),
        });
    }
    Ok(())
}

/// Validates a unit price. Zero is allowed (free items).
///
/// ## Example
/// ```rust
/// use folio_core::validation::validate_unit_price;
/// use folio_core::Money;
///
/// assert!(validate_unit_price(Money::from(1099)).is_ok());
/// assert!(validate_unit_price(Money::zero()).is_ok());
/// assert!(validate_unit_price(Money::from(-1)).is_err());
/// ```
pub fn validate_unit_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::MustNotBeNegative {
            field: "unit price".to_string(),
        });
    }
    Ok(())
}

/// Validates a tax rate or discount: 0 to 100 inclusive.
pub fn validate_percentage(field: &str, rate: Percentage) -> ValidationResult<()> {
    let value = rate.value();
    if value < Decimal::ZERO || value > Decimal::ONE_HUNDRED {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: "0".to_string(),
            max: "100".to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Draft Validator
// =============================================================================

/// Validates everything the document form submits.
///
/// Returns the first problem found, in form order.
pub fn validate_draft(draft: &DocumentDraft) -> ValidationResult<()> {
    // A blank number means "not given"; the counter supplies one.
    if let Some(number) = draft.document_number.as_deref() {
        if !number.trim().is_empty() {
            validate_document_number(number)?;
        }
    }

    if let Some(due) = draft.due_date {
        if due < draft.date {
            return Err(ValidationError::DateOrder {
                field: "due date".to_string(),
                other: "document date".to_string(),
            });
        }
    }

    validate_customer_name(&draft.customer.name)?;

    if let Some(email) = draft.customer.email.as_deref() {
        if !email.trim().is_empty() {
            validate_email(email)?;
        }
    }

    if draft.items.is_empty() {
        return Err(ValidationError::Required {
            field: "line items".to_string(),
        });
    }

    for item in &draft.items {
        validate_quantity(item.quantity)?;
        validate_unit_price(item.unit_price)?;
    }

    validate_percentage("tax rate", draft.tax_rate)?;
    validate_percentage("discount", draft.discount)?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Customer, DocumentType};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn draft() -> DocumentDraft {
        DocumentDraft::new(
            DocumentType::Invoice,
            NaiveDate::from_ymd_opt(2024, 5, 10).unwrap(),
            Customer::named("Acme Ltd"),
        )
        .with_item("Widget", dec!(2), Money::from(100))
    }

    #[test]
    fn test_validate_customer_name() {
        assert!(validate_customer_name("Acme Ltd").is_ok());
        assert!(validate_customer_name("").is_err());
        assert!(validate_customer_name("   ").is_err());
        assert!(validate_customer_name(&"A".repeat(201)).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("a@b").is_ok());
        assert!(validate_email(" billing@example.com ").is_ok());

        assert!(validate_email("").is_err());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("name@").is_err());
        assert!(validate_email("a b@example.com").is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(dec!(0)).is_ok());
        assert!(validate_quantity(dec!(2.5)).is_ok());
        assert!(validate_quantity(dec!(-1)).is_err());
    }

    #[test]
    fn test_validate_percentage_bounds() {
        assert!(validate_percentage("tax rate", Percentage::zero()).is_ok());
        assert!(validate_percentage("tax rate", Percentage::from(dec!(16.5))).is_ok());
        assert!(validate_percentage("discount", Percentage::from(100)).is_ok());

        assert_eq!(
            validate_percentage("discount", Percentage::from(dec!(100.01))),
            Err(ValidationError::OutOfRange {
                field: "discount".to_string(),
                min: "0".to_string(),
                max: "100".to_string(),
            })
        );
        assert!(validate_percentage("tax rate", Percentage::from(-1)).is_err());
    }

    #[test]
    fn test_validate_draft_ok() {
        assert!(validate_draft(&draft()).is_ok());
    }

    #[test]
    fn test_validate_draft_requires_items() {
        let mut d = draft();
        d.items.clear();
        assert!(matches!(
            validate_draft(&d),
            Err(ValidationError::Required { field }) if field == "line items"
        ));
    }

    #[test]
    fn test_validate_draft_rejects_negative_item() {
        let d = draft().with_item("Refund", dec!(-1), Money::from(10));
        assert!(matches!(
            validate_draft(&d),
            Err(ValidationError::MustNotBeNegative { .. })
        ));
    }

    #[test]
    fn test_validate_draft_due_date_order() {
        let d = draft().with_due_date(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
        assert!(matches!(validate_draft(&d), Err(ValidationError::DateOrder { .. })));

        let same_day = draft().with_due_date(NaiveDate::from_ymd_opt(2024, 5, 10).unwrap());
        assert!(validate_draft(&same_day).is_ok());
    }

    #[test]
    fn test_validate_draft_email_is_optional() {
        let mut d = draft();
        d.customer.email = Some(String::new());
        assert!(validate_draft(&d).is_ok());

        d.customer.email = Some("nope".to_string());
        assert!(validate_draft(&d).is_err());
    }

    #[test]
    fn test_validate_draft_rejects_big_discount() {
        let d = draft().with_discount(Percentage::from(150));
        assert!(validate_draft(&d).is_err());
    }

    #[test]
    fn test_validate_draft_blank_number_is_not_given() {
        assert!(validate_draft(&draft().with_number("   ")).is_ok());
        assert!(validate_draft(&draft().with_number("")).is_ok());
        assert!(validate_document_number("  ").is_err());

        let long = draft().with_number("X".repeat(MAX_DOCUMENT_NUMBER_LEN + 1));
        assert!(matches!(
            validate_draft(&long),
            Err(ValidationError::TooLong { .. })
        ));
    }
}
