//! # Document Service
//!
//! The operations the document form and list screens call. Each one goes
//! through the same steps:
//!
//! ```text
//! DocumentDraft
//!     │
//!     ├── validate_draft            → ServiceError::Validation
//!     ├── next_sequence (new only)  → "INV-0007", skipping numbers in use
//!     ├── Document::create / replace_with (totals recomputed)
//!     └── repository.save           → ServiceError::Storage
//! ```
//!
//! Stored totals are always the calculator's output for the stored items,
//! so a document read back from any repository is consistent.

use chrono::Utc;
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use folio_core::dispatch::EmailRequest;
use folio_core::validation::validate_draft;
use folio_core::{
    CompanyInfo, CoreError, CurrencyFormat, Document, DocumentDraft, DocumentNumber,
    DocumentStatus, DocumentType, ValidationError,
};

use crate::error::DbError;
use crate::repository::DocumentRepository;

// =============================================================================
// Errors
// =============================================================================

/// Errors returned by [`DocumentService`].
#[derive(Debug, Error)]
pub enum ServiceError {
    /// No document with this id.
    #[error("Document not found: {0}")]
    NotFound(String),

    /// Form input rejected before anything was stored.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The email request could not be built.
    #[error("{0}")]
    Dispatch(#[from] CoreError),

    /// The repository failed.
    #[error("Storage error: {0}")]
    Storage(#[from] DbError),
}

impl ServiceError {
    /// Machine-readable code for the frontend.
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::NotFound(_) => "NOT_FOUND",
            ServiceError::Validation(_) => "VALIDATION_ERROR",
            ServiceError::Dispatch(_) => "INVALID_REQUEST",
            ServiceError::Storage(DbError::UniqueViolation { .. }) => "DUPLICATE",
            ServiceError::Storage(_) => "STORAGE_ERROR",
        }
    }
}

/// Result type for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

// =============================================================================
// Service
// =============================================================================

/// Document lifecycle on top of any [`DocumentRepository`].
#[derive(Debug, Clone)]
pub struct DocumentService<R> {
    repo: R,
}

impl<R: DocumentRepository> DocumentService<R> {
    pub fn new(repo: R) -> Self {
        DocumentService { repo }
    }

    /// The underlying repository.
    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Creates a document from form input.
    ///
    /// The number comes from the per-type counter unless the draft carries
    /// one. Validation runs first, so a rejected draft never consumes a
    /// number.
    ///
    /// A generated number that is already taken (typed by hand earlier, or
    /// saved outside the service) is skipped and the next one tried. A typed
    /// number in this type's own format moves the counter past it.
    pub async fn create(&self, draft: DocumentDraft) -> ServiceResult<Document> {
        validate_draft(&draft)?;

        let doc_type = draft.doc_type;
        let typed = draft
            .document_number
            .as_deref()
            .map(str::trim)
            .filter(|number| !number.is_empty())
            .map(str::to_string);

        let document = match typed {
            Some(number) => {
                let document =
                    Document::create(Uuid::new_v4().to_string(), number, draft, Utc::now());
                self.repo.save(&document).await?;
                self.reserve_typed_number(&document).await?;
                document
            }
            None => {
                let sequence = self.repo.next_sequence(doc_type).await?;
                let number = DocumentNumber::new(doc_type, sequence).to_string();
                let mut document =
                    Document::create(Uuid::new_v4().to_string(), number, draft, Utc::now());
                self.save_with_free_number(&mut document).await?;
                document
            }
        };

        info!(
            id = %document.id,
            number = %document.document_number,
            total = %document.total,
            items = document.items.len(),
            "Document created"
        );
        Ok(document)
    }

    /// Saves a new document, drawing further counter values while its
    /// generated number collides with a stored one.
    async fn save_with_free_number(&self, document: &mut Document) -> ServiceResult<()> {
        loop {
            let saved = self.repo.save(document).await;
            match saved {
                Ok(()) => return Ok(()),
                Err(DbError::UniqueViolation { field, .. }) if field.contains("document_number") => {
                    let sequence = self.repo.next_sequence(document.doc_type).await?;
                    let number = DocumentNumber::new(document.doc_type, sequence).to_string();
                    warn!(
                        taken = %document.document_number,
                        next = %number,
                        "Generated document number already in use"
                    );
                    document.document_number = number;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    async fn reserve_typed_number(&self, document: &Document) -> ServiceResult<()> {
        match document.document_number.parse::<DocumentNumber>() {
            Ok(number) if number.doc_type == document.doc_type => {
                self.repo
                    .reserve_sequence(number.doc_type, number.sequence)
                    .await?;
            }
            _ => {}
        }
        Ok(())
    }

    /// Replaces a document's content with an edited draft.
    ///
    /// Id, type, status and creation time are kept.
    pub async fn update(&self, id: &str, draft: DocumentDraft) -> ServiceResult<Document> {
        let existing = self.get(id).await?;
        validate_draft(&draft)?;

        if draft.doc_type != existing.doc_type {
            warn!(
                id = %id,
                kept = %existing.doc_type,
                requested = %draft.doc_type,
                "Ignoring document type change on update"
            );
        }

        let document = existing.replace_with(draft, Utc::now());
        self.repo.save(&document).await?;

        info!(id = %id, total = %document.total, "Document updated");
        Ok(document)
    }

    /// Moves a document to another status.
    pub async fn set_status(&self, id: &str, status: DocumentStatus) -> ServiceResult<Document> {
        let existing = self.get(id).await?;
        let document = existing.with_status(status, Utc::now());
        self.repo.save(&document).await?;

        info!(id = %id, from = %existing.status, to = %status, "Document status changed");
        Ok(document)
    }

    /// Fetches a document.
    pub async fn get(&self, id: &str) -> ServiceResult<Document> {
        self.repo
            .get(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(id.to_string()))
    }

    /// All documents, newest first.
    pub async fn list(&self) -> ServiceResult<Vec<Document>> {
        Ok(self.repo.list().await?)
    }

    /// Documents of one type, newest first.
    pub async fn list_by_type(&self, doc_type: DocumentType) -> ServiceResult<Vec<Document>> {
        Ok(self.repo.list_by_type(doc_type).await?)
    }

    /// Deletes a document. Deleting a missing id succeeds.
    pub async fn delete(&self, id: &str) -> ServiceResult<()> {
        self.repo.delete(id).await?;
        debug!(id = %id, "Document deleted");
        Ok(())
    }

    /// Builds the email for sending a stored document.
    pub async fn email_request(
        &self,
        id: &str,
        recipient_email: &str,
        document_url: &str,
        company: &CompanyInfo,
        currency: &CurrencyFormat,
    ) -> ServiceResult<EmailRequest> {
        let document = self.get(id).await?;
        let request = EmailRequest::compose(
            &document,
            recipient_email,
            None,
            document_url,
            company,
            currency,
        )?;

        debug!(id = %id, to = %request.to_email, "Email request composed");
        Ok(request)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
