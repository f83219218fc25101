//! # Database Pool Management
//!
//! Opening the SQLite file that backs the document store.
//!
//! ## Startup
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Opening the document store                         │
//! │                                                                         │
//! │  AppConfig::from_env().db_config()   or   DbConfig::in_memory()        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Database::new(config).await                                           │
//! │  ├── open / create the file (WAL, foreign keys on)                     │
//! │  └── apply migrations/sqlite (documents, items, sequences, company)    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  db.documents() / db.company() ← handles sharing one pool              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  db.close().await on shutdown                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## WAL Mode
//! The list screen keeps reading while a document is being saved, so the
//! file runs in WAL mode.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::company::CompanyRepository;
use crate::repository::document::SqliteDocumentRepository;

const MEMORY_PATH: &str = ":memory:";

// =============================================================================
// Configuration
// =============================================================================

/// Where the document store lives and how many connections it may hold.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Path to the SQLite database file, or `:memory:`.
    pub database_path: PathBuf,

    /// Maximum number of pooled connections.
    pub max_connections: u32,

    /// How long to wait for a free connection.
    pub acquire_timeout: Duration,
}

impl DbConfig {
    /// A file-backed store. The file is created on first open.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 5,
            acquire_timeout: Duration::from_secs(30),
        }
    }

    /// A private store that disappears with the pool (tests, demos).
    pub fn in_memory() -> Self {
        DbConfig {
            database_path: PathBuf::from(MEMORY_PATH),
            // Each connection to :memory: is its own database.
            max_connections: 1,
            acquire_timeout: Duration::from_secs(5),
        }
    }

    fn is_in_memory(&self) -> bool {
        self.database_path.as_os_str() == MEMORY_PATH
    }
}

// =============================================================================
// Database
// =============================================================================

/// Open document store. Clones share one pool.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens the store and brings its schema up to date.
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(path = %config.database_path.display(), "Opening document store");

        let url = format!("sqlite://{}?mode=rwc", config.database_path.display());
        let options = SqliteConnectOptions::from_str(&url)
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            // Line items cascade with their document.
            .foreign_keys(true)
            .create_if_missing(true);

        let mut pool_options = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(1)
            .acquire_timeout(config.acquire_timeout);

        // Recycling the only connection would drop an in-memory store.
        if config.is_in_memory() {
            pool_options = pool_options.idle_timeout(None).max_lifetime(None);
        }

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;
        debug!(max_connections = config.max_connections, "Pool ready");

        migrations::run_migrations(&pool).await?;

        Ok(Database { pool })
    }

    /// The SQLite-backed document repository.
    pub fn documents(&self) -> SqliteDocumentRepository {
        SqliteDocumentRepository::new(self.pool.clone())
    }

    /// The company profile repository.
    pub fn company(&self) -> CompanyRepository {
        CompanyRepository::new(self.pool.clone())
    }

    /// Closes the pool. Repository calls made afterwards fail.
    pub async fn close(&self) {
        info!("Closing document store");
        self.pool.close().await;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::DocumentRepository;
    use folio_core::{CompanyInfo, DocumentType};

    #[tokio::test]
    async fn test_in_memory_store_has_schema() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let documents = db.documents();

        assert!(documents.list().await.unwrap().is_empty());
        assert_eq!(documents.next_sequence(DocumentType::Invoice).await.unwrap(), 1);
        assert_eq!(db.company().get().await.unwrap(), CompanyInfo::default());
    }

    #[tokio::test]
    async fn test_in_memory_stores_are_isolated() {
        let a = Database::new(DbConfig::in_memory()).await.unwrap();
        let b = Database::new(DbConfig::in_memory()).await.unwrap();

        a.documents().next_sequence(DocumentType::Receipt).await.unwrap();
        assert_eq!(b.documents().next_sequence(DocumentType::Receipt).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_closed_store_rejects_calls() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let documents = db.documents();
        db.close().await;

        assert!(documents.list().await.is_err());
    }

    #[test]
    fn test_config_defaults() {
        let file = DbConfig::new("/tmp/folio.db");
        assert_eq!(file.database_path, PathBuf::from("/tmp/folio.db"));
        assert_eq!(file.max_connections, 5);
        assert!(!file.is_in_memory());

        let memory = DbConfig::in_memory();
        assert_eq!(memory.max_connections, 1);
        assert!(memory.is_in_memory());
    }
}
