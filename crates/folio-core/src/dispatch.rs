//! # Email Dispatch
//!
//! Builds the parameter set handed to the mail template when a document is
//! sent to a customer. Delivery itself belongs to the caller; this module
//! only decides what the message says.
//!
//! ```text
//! Document + recipient + link ──► EmailRequest::compose ──► mail template
//!                                  ├── recipient checks
//!                                  ├── subject "Invoice - INV-0001"
//!                                  └── formatted total "MWK 366.98"
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::CurrencyFormat;
use crate::types::{CompanyInfo, Document, DocumentType};

/// Greeting used when neither the caller nor the document names the customer.
pub const FALLBACK_RECIPIENT_NAME: &str = "Valued Customer";

/// Template parameters for one outgoing document email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct EmailRequest {
    pub to_email: String,
    pub to_name: String,
    pub from_name: String,
    pub from_email: String,
    pub subject: String,
    pub message: String,
    /// Where the rendered PDF can be downloaded.
    pub document_url: String,
    pub document_number: String,
    /// Lowercase type name (`invoice`).
    pub document_type: String,
    /// Total already formatted for display.
    pub total_amount: String,
    /// Issue date, `YYYY-MM-DD`.
    pub document_date: String,
}

impl EmailRequest {
    /// Composes the email for `document`.
    ///
    /// ## Errors
    /// - [`CoreError::InvalidRecipient`] if the address has no `@`
    pub fn compose(
        document: &Document,
        recipient_email: &str,
        recipient_name: Option<&str>,
        document_url: &str,
        company: &CompanyInfo,
        currency: &CurrencyFormat,
    ) -> CoreResult<Self> {
        let to_email = recipient_email.trim();
        if to_email.is_empty() || !to_email.contains('@') {
            return Err(CoreError::InvalidRecipient(recipient_email.to_string()));
        }

        let to_name = [recipient_name, Some(document.customer.name.as_str())]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|n| !n.is_empty())
            .unwrap_or(FALLBACK_RECIPIENT_NAME)
            .to_string();

        let doc_type = document.doc_type;
        let number = &document.document_number;

        Ok(EmailRequest {
            to_email: to_email.to_string(),
            to_name,
            from_name: company.name.clone(),
            from_email: company.email.clone(),
            subject: format!("{} - {}", doc_type.label(), number),
            message: format!("Please find your {} {} attached.", doc_type.as_str(), number),
            document_url: document_url.to_string(),
            document_number: number.clone(),
            document_type: doc_type.as_str().to_string(),
            total_amount: currency.format(document.total),
            document_date: document.date.format("%Y-%m-%d").to_string(),
        })
    }

    /// Like [`EmailRequest::compose`], but first checks the document is of
    /// the type the caller is sending.
    ///
    /// ## Errors
    /// - [`CoreError::DocumentTypeMismatch`] if `expected` differs
    /// - anything [`EmailRequest::compose`] returns
    pub fn compose_for(
        expected: DocumentType,
        document: &Document,
        recipient_email: &str,
        recipient_name: Option<&str>,
        document_url: &str,
        company: &CompanyInfo,
        currency: &CurrencyFormat,
    ) -> CoreResult<Self> {
        if document.doc_type != expected {
            return Err(CoreError::DocumentTypeMismatch {
                expected: expected.as_str().to_string(),
                actual: document.doc_type.as_str().to_string(),
            });
        }
        Self::compose(
            document,
            recipient_email,
            recipient_name,
            document_url,
            company,
            currency,
        )
    }
}
