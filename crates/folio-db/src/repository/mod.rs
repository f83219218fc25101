//! # Repository Module
//!
//! Storage abstraction for documents, with SQLite and in-memory backends.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Document Storage                                     │
//! │                                                                         │
//! │  DocumentService<R>                                                    │
//! │       │                                                                 │
//! │       │  repo.next_sequence(Invoice) → 7 → "INV-0007"                  │
//! │       │  repo.save(&document)                                          │
//! │       ▼                                                                 │
//! │  dyn DocumentRepository                                                │
//! │  ├── SqliteDocumentRepository   (document.rs, production)              │
//! │  └── InMemoryDocumentRepository (memory.rs, tests and demos)           │
//! │                                                                         │
//! │  Both backends:                                                         │
//! │  • return documents exactly as saved                                   │
//! │  • list newest `created_at` first                                      │
//! │  • never hand out the same sequence value twice per type               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`DocumentRepository`] - The document storage contract
//! - [`document::SqliteDocumentRepository`] - SQLite implementation
//! - [`memory::InMemoryDocumentRepository`] - In-process implementation
//! - [`company::CompanyRepository`] - The company profile row

pub mod company;
pub mod document;
pub mod memory;

use async_trait::async_trait;
use folio_core::{Document, DocumentType};

use crate::error::DbResult;

/// Storage contract for documents.
///
/// Documents are stored whole: `save` replaces the header and every line
/// item in one step.
#[async_trait]
pub trait DocumentRepository: Send + Sync {
    /// Fetches a document by id.
    async fn get(&self, id: &str) -> DbResult<Option<Document>>;

    /// All documents, newest `created_at` first.
    async fn list(&self) -> DbResult<Vec<Document>>;

    /// Documents of one type, newest `created_at` first.
    async fn list_by_type(&self, doc_type: DocumentType) -> DbResult<Vec<Document>>;

    /// Number of stored documents of one type.
    async fn count_by_type(&self, doc_type: DocumentType) -> DbResult<u64>;

    /// Inserts a new document or fully replaces the one with the same id.
    ///
    /// Fails with [`crate::DbError::UniqueViolation`] if another document
    /// of the same type already uses the number.
    async fn save(&self, document: &Document) -> DbResult<()>;

    /// Removes a document. Removing an id that does not exist is not an error.
    async fn delete(&self, id: &str) -> DbResult<()>;

    /// Advances and returns the per-type counter. The first call yields 1.
    ///
    /// Values are never reused, even after deletes.
    async fn next_sequence(&self, doc_type: DocumentType) -> DbResult<u64>;

    /// Moves the per-type counter up to at least `sequence`.
    ///
    /// Used when a document was stored under a number the counter did not
    /// hand out. A lower value leaves the counter unchanged.
    async fn reserve_sequence(&self, doc_type: DocumentType, sequence: u64) -> DbResult<()>;
}
