//! # folio-db: Storage Layer for Folio
//!
//! Persistence for invoices, quotations and receipts, plus the service
//! that ties form input, numbering and storage together.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Folio Data Flow                                │
//! │                                                                         │
//! │  Web form (DocumentDraft)                                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     folio-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │DocumentService│───►│  Repositories │───►│   Database   │  │   │
//! │  │   │ (service.rs)  │    │ SQLite/Memory │    │  (pool.rs)   │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ validate      │    │ documents     │    │ SqlitePool   │  │   │
//! │  │   │ number        │    │ sequences     │    │ migrations   │  │   │
//! │  │   │ recompute     │    │ company       │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │   $FOLIO_DB_PATH (default ./folio.db)                          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository trait and implementations
//! - [`service`] - Document lifecycle operations
//! - [`config`] - Environment configuration
//!
//! ## Usage
//!
//! ```rust,ignore
//! use folio_db::{Database, DbConfig, DocumentService};
//!
//! let db = Database::new(DbConfig::new("./folio.db")).await?;
//! let service = DocumentService::new(db.documents());
//!
//! let invoice = service.create(draft).await?;
//! assert_eq!(invoice.document_number, "INV-0001");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod service;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{AppConfig, ConfigError};
pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use service::{DocumentService, ServiceError, ServiceResult};

// Repository re-exports for convenience
pub use repository::company::CompanyRepository;
pub use repository::document::SqliteDocumentRepository;
pub use repository::memory::InMemoryDocumentRepository;
pub use repository::DocumentRepository;
