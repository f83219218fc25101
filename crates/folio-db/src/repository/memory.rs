//! # In-Memory Document Repository
//!
//! Keeps documents in a map behind a tokio `RwLock`. Used by tests and by
//! anything that wants the service without a database file. Clones share
//! the same storage.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::DocumentRepository;
use folio_core::{Document, DocumentType};

#[derive(Debug, Default)]
struct Store {
    documents: HashMap<String, Document>,
    sequences: HashMap<DocumentType, u64>,
}

/// [`DocumentRepository`] held entirely in process memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDocumentRepository {
    store: Arc<RwLock<Store>>,
}

impl InMemoryDocumentRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

fn newest_first(mut documents: Vec<Document>) -> Vec<Document> {
    documents.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    });
    documents
}

#[async_trait]
impl DocumentRepository for InMemoryDocumentRepository {
    async fn get(&self, id: &str) -> DbResult<Option<Document>> {
        Ok(self.store.read().await.documents.get(id).cloned())
    }

    async fn list(&self) -> DbResult<Vec<Document>> {
        let store = self.store.read().await;
        Ok(newest_first(store.documents.values().cloned().collect()))
    }

    async fn list_by_type(&self, doc_type: DocumentType) -> DbResult<Vec<Document>> {
        let store = self.store.read().await;
        Ok(newest_first(
            store
                .documents
                .values()
                .filter(|d| d.doc_type == doc_type)
                .cloned()
                .collect(),
        ))
    }

    async fn count_by_type(&self, doc_type: DocumentType) -> DbResult<u64> {
        let store = self.store.read().await;
        Ok(store
            .documents
            .values()
            .filter(|d| d.doc_type == doc_type)
            .count() as u64)
    }

    async fn save(&self, document: &Document) -> DbResult<()> {
        let mut store = self.store.write().await;

        let taken = store.documents.values().any(|other| {
            other.id != document.id
                && other.doc_type == document.doc_type
                && other.document_number == document.document_number
        });
        if taken {
            return Err(DbError::duplicate(
                "document_number",
                document.document_number.clone(),
            ));
        }

        debug!(id = %document.id, number = %document.document_number, "Saving document");
        store.documents.insert(document.id.clone(), document.clone());
        Ok(())
    }

    async fn delete(&self, id: &str) -> DbResult<()> {
        self.store.write().await.documents.remove(id);
        Ok(())
    }

    async fn next_sequence(&self, doc_type: DocumentType) -> DbResult<u64> {
        let mut store = self.store.write().await;
        let counter = store.sequences.entry(doc_type).or_insert(0);
        *counter = counter.saturating_add(1);
        Ok(*counter)
    }

    async fn reserve_sequence(&self, doc_type: DocumentType, sequence: u64) -> DbResult<()> {
        let mut store = self.store.write().await;
        let counter = store.sequences.entry(doc_type).or_insert(0);
        *counter = (*counter).max(sequence);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};
    use folio_core::{Customer, DocumentDraft, Money};
    use rust_decimal_macros::dec;

    fn document(id: &str, doc_type: DocumentType, number: &str, hour: u32) -> Document {
        let draft = DocumentDraft::new(
            doc_type,
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            Customer::named("Acme Ltd"),
        )
        .with_item("Widget", dec!(1), Money::from(10));
        let now = Utc.with_ymd_and_hms(2024, 6, 1, hour, 0, 0).unwrap();
        Document::create(id, number, draft, now)
    }

    #[tokio::test]
    async fn test_save_get_delete() {
        let repo = InMemoryDocumentRepository::new();
        let doc = document("a", DocumentType::Invoice, "INV-0001", 8);

        repo.save(&doc).await.unwrap();
        assert_eq!(repo.get("a").await.unwrap(), Some(doc));

        repo.delete("a").await.unwrap();
        repo.delete("a").await.unwrap();
        assert_eq!(repo.get("a").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_listing_order_and_filter() {
        let repo = InMemoryDocumentRepository::new();
        repo.save(&document("a", DocumentType::Invoice, "INV-0001", 8)).await.unwrap();
        repo.save(&document("b", DocumentType::Receipt, "REC-0001", 10)).await.unwrap();
        repo.save(&document("c", DocumentType::Invoice, "INV-0002", 9)).await.unwrap();

        let ids: Vec<String> = repo.list().await.unwrap().into_iter().map(|d| d.id).collect();
        assert_eq!(ids, ["b", "c", "a"]);

        let invoices = repo.list_by_type(DocumentType::Invoice).await.unwrap();
        assert_eq!(invoices.len(), 2);
        assert_eq!(repo.count_by_type(DocumentType::Invoice).await.unwrap(), 2);
        assert_eq!(repo.count_by_type(DocumentType::Quotation).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_duplicate_number() {
        let repo = InMemoryDocumentRepository::new();
        repo.save(&document("a", DocumentType::Invoice, "INV-0001", 8)).await.unwrap();

        // Re-saving the same document is a replace, not a duplicate.
        repo.save(&document("a", DocumentType::Invoice, "INV-0001", 8)).await.unwrap();

        assert!(matches!(
            repo.save(&document("b", DocumentType::Invoice, "INV-0001", 9)).await,
            Err(DbError::UniqueViolation { .. })
        ));
    }

    #[tokio::test]
    async fn test_clones_share_storage() {
        let repo = InMemoryDocumentRepository::new();
        let other = repo.clone();

        assert_eq!(repo.next_sequence(DocumentType::Invoice).await.unwrap(), 1);
        assert_eq!(other.next_sequence(DocumentType::Invoice).await.unwrap(), 2);
        assert_eq!(other.next_sequence(DocumentType::Quotation).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_reserve_sequence_only_moves_forward() {
        let repo = InMemoryDocumentRepository::new();

        repo.reserve_sequence(DocumentType::Invoice, 5).await.unwrap();
        repo.reserve_sequence(DocumentType::Invoice, 3).await.unwrap();
        assert_eq!(repo.next_sequence(DocumentType::Invoice).await.unwrap(), 6);
        assert_eq!(repo.next_sequence(DocumentType::Receipt).await.unwrap(), 1);
    }
}
