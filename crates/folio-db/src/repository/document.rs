//! # SQLite Document Repository
//!
//! Documents live in two tables: the header in `documents` and the line
//! items in `document_items`, ordered by `position`.
//!
//! ## Save = Replace
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  save(document)            (one transaction)                            │
//! │                                                                         │
//! │  1. UPSERT documents row by id                                         │
//! │     └── UNIQUE (doc_type, document_number) → DbError::UniqueViolation  │
//! │  2. DELETE document_items WHERE document_id = id                       │
//! │  3. INSERT each item with its position                                 │
//! │  4. COMMIT                                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Amounts are stored as decimal TEXT and parsed back on read; a value that
//! no longer parses surfaces as [`DbError::InvalidData`].

use std::collections::HashMap;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::repository::DocumentRepository;
use folio_core::{Customer, Document, DocumentStatus, DocumentType, LineItem};

const SELECT_DOCUMENT: &str = r#"
    SELECT
        id, doc_type, document_number, date, due_date,
        customer_name, customer_address, customer_email, customer_phone,
        subtotal, tax_rate, tax_amount, discount, total,
        notes, status, created_at, updated_at
    FROM documents
"#;

const SELECT_ITEMS: &str = r#"
    SELECT i.document_id, i.item_id, i.description, i.quantity, i.unit_price, i.total
    FROM document_items i
"#;

// =============================================================================
// Row Records
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct DocumentRecord {
    id: String,
    doc_type: DocumentType,
    document_number: String,
    date: NaiveDate,
    due_date: Option<NaiveDate>,
    customer_name: String,
    customer_address: Option<String>,
    customer_email: Option<String>,
    customer_phone: Option<String>,
    subtotal: String,
    tax_rate: String,
    tax_amount: String,
    discount: String,
    total: String,
    notes: Option<String>,
    status: DocumentStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
struct ItemRecord {
    document_id: String,
    item_id: String,
    description: String,
    quantity: String,
    unit_price: String,
    total: String,
}

fn parse_column<T: FromStr>(field: &str, value: &str) -> DbResult<T> {
    value
        .parse::<T>()
        .map_err(|_| DbError::invalid_data(field, value))
}

impl ItemRecord {
    fn into_item(self) -> DbResult<LineItem> {
        Ok(LineItem {
            id: self.item_id,
            quantity: parse_column("quantity", &self.quantity)?,
            unit_price: parse_column("unit_price", &self.unit_price)?,
            total: parse_column("item total", &self.total)?,
            description: self.description,
        })
    }
}

impl DocumentRecord {
    fn into_document(self, items: Vec<LineItem>) -> DbResult<Document> {
        Ok(Document {
            subtotal: parse_column("subtotal", &self.subtotal)?,
            tax_rate: parse_column("tax_rate", &self.tax_rate)?,
            tax_amount: parse_column("tax_amount", &self.tax_amount)?,
            discount: parse_column("discount", &self.discount)?,
            total: parse_column("total", &self.total)?,
            id: self.id,
            doc_type: self.doc_type,
            document_number: self.document_number,
            date: self.date,
            due_date: self.due_date,
            customer: Customer {
                name: self.customer_name,
                address: self.customer_address,
                email: self.customer_email,
                phone: self.customer_phone,
            },
            items,
            notes: self.notes,
            status: self.status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

// =============================================================================
// Repository
// =============================================================================

/// SQLite-backed [`DocumentRepository`].
#[derive(Debug, Clone)]
pub struct SqliteDocumentRepository {
    pool: SqlitePool,
}

impl SqliteDocumentRepository {
    /// Creates a new SqliteDocumentRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SqliteDocumentRepository { pool }
    }

    /// Attaches items to their headers, preserving header order.
    fn assemble(records: Vec<DocumentRecord>, items: Vec<ItemRecord>) -> DbResult<Vec<Document>> {
        let mut by_document: HashMap<String, Vec<LineItem>> = HashMap::new();
        for item in items {
            let document_id = item.document_id.clone();
            by_document
                .entry(document_id)
                .or_default()
                .push(item.into_item()?);
        }

        records
            .into_iter()
            .map(|record| {
                let items = by_document.remove(&record.id).unwrap_or_default();
                record.into_document(items)
            })
            .collect()
    }
}

#[async_trait]
impl DocumentRepository for SqliteDocumentRepository {
    async fn get(&self, id: &str) -> DbResult<Option<Document>> {
        let sql = format!("{SELECT_DOCUMENT} WHERE id = ?1");
        let record: Option<DocumentRecord> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        let Some(record) = record else {
            return Ok(None);
        };

        let sql = format!("{SELECT_ITEMS} WHERE i.document_id = ?1 ORDER BY i.position");
        let items: Vec<ItemRecord> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_all(&self.pool)
            .await?;

        let items = items
            .into_iter()
            .map(ItemRecord::into_item)
            .collect::<DbResult<Vec<_>>>()?;

        record.into_document(items).map(Some)
    }

    async fn list(&self) -> DbResult<Vec<Document>> {
        let sql = format!("{SELECT_DOCUMENT} ORDER BY created_at DESC, id DESC");
        let records: Vec<DocumentRecord> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;

        let sql = format!("{SELECT_ITEMS} ORDER BY i.document_id, i.position");
        let items: Vec<ItemRecord> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;

        Self::assemble(records, items)
    }

    async fn list_by_type(&self, doc_type: DocumentType) -> DbResult<Vec<Document>> {
        let sql = format!("{SELECT_DOCUMENT} WHERE doc_type = ?1 ORDER BY created_at DESC, id DESC");
        let records: Vec<DocumentRecord> = sqlx::query_as(&sql)
            .bind(doc_type)
            .fetch_all(&self.pool)
            .await?;

        let sql = format!(
            "{SELECT_ITEMS} JOIN documents d ON d.id = i.document_id \
             WHERE d.doc_type = ?1 ORDER BY i.document_id, i.position"
        );
        let items: Vec<ItemRecord> = sqlx::query_as(&sql)
            .bind(doc_type)
            .fetch_all(&self.pool)
            .await?;

        Self::assemble(records, items)
    }

    async fn count_by_type(&self, doc_type: DocumentType) -> DbResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM documents WHERE doc_type = ?1")
            .bind(doc_type)
            .fetch_one(&self.pool)
            .await?;

        Ok(count.max(0) as u64)
    }

    async fn save(&self, document: &Document) -> DbResult<()> {
        debug!(
            id = %document.id,
            number = %document.document_number,
            items = document.items.len(),
            "Saving document"
        );

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO documents (
                id, doc_type, document_number, date, due_date,
                customer_name, customer_address, customer_email, customer_phone,
                subtotal, tax_rate, tax_amount, discount, total,
                notes, status, created_at, updated_at
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5,
                ?6, ?7, ?8, ?9,
                ?10, ?11, ?12, ?13, ?14,
                ?15, ?16, ?17, ?18
            )
            ON CONFLICT (id) DO UPDATE SET
                doc_type = excluded.doc_type,
                document_number = excluded.document_number,
                date = excluded.date,
                due_date = excluded.due_date,
                customer_name = excluded.customer_name,
                customer_address = excluded.customer_address,
                customer_email = excluded.customer_email,
                customer_phone = excluded.customer_phone,
                subtotal = excluded.subtotal,
                tax_rate = excluded.tax_rate,
                tax_amount = excluded.tax_amount,
                discount = excluded.discount,
                total = excluded.total,
                notes = excluded.notes,
                status = excluded.status,
                created_at = excluded.created_at,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&document.id)
        .bind(document.doc_type)
        .bind(&document.document_number)
        .bind(document.date)
        .bind(document.due_date)
        .bind(&document.customer.name)
        .bind(&document.customer.address)
        .bind(&document.customer.email)
        .bind(&document.customer.phone)
        .bind(document.subtotal.amount().to_string())
        .bind(document.tax_rate.value().to_string())
        .bind(document.tax_amount.amount().to_string())
        .bind(document.discount.value().to_string())
        .bind(document.total.amount().to_string())
        .bind(&document.notes)
        .bind(document.status)
        .bind(document.created_at)
        .bind(document.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { field, .. } => {
                DbError::duplicate(field, document.document_number.clone())
            }
            other => other,
        })?;

        sqlx::query("DELETE FROM document_items WHERE document_id = ?1")
            .bind(&document.id)
            .execute(&mut *tx)
            .await?;

        for (position, item) in document.items.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO document_items (
                    document_id, position, item_id, description,
                    quantity, unit_price, total
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
            )
            .bind(&document.id)
            .bind(position as i64)
            .bind(&item.id)
            .bind(&item.description)
            .bind(item.quantity.to_string())
            .bind(item.unit_price.amount().to_string())
            .bind(item.total.amount().to_string())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(())
    }

    async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM documents WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        debug!(id = %id, removed = result.rows_affected(), "Deleted document");
        Ok(())
    }

    async fn next_sequence(&self, doc_type: DocumentType) -> DbResult<u64> {
        // Single statement so two concurrent callers can never read the same value.
        let value: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO document_sequences (doc_type, last_value) VALUES (?1, 1)
            ON CONFLICT (doc_type) DO UPDATE SET last_value = last_value + 1
            RETURNING last_value
            "#,
        )
        .bind(doc_type)
        .fetch_one(&self.pool)
        .await?;

        let value = u64::try_from(value)
            .map_err(|_| DbError::invalid_data("document sequence", value.to_string()))?;

        info!(doc_type = %doc_type, sequence = value, "Allocated document sequence");
        Ok(value)
    }

    async fn reserve_sequence(&self, doc_type: DocumentType, sequence: u64) -> DbResult<()> {
        let value = i64::try_from(sequence)
            .map_err(|_| DbError::invalid_data("document sequence", sequence.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO document_sequences (doc_type, last_value) VALUES (?1, ?2)
            ON CONFLICT (doc_type) DO UPDATE SET last_value = MAX(last_value, excluded.last_value)
            "#,
        )
        .bind(doc_type)
        .bind(value)
        .execute(&self.pool)
        .await?;

        debug!(doc_type = %doc_type, sequence, "Reserved document sequence");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::TimeZone;
    use folio_core::{DocumentDraft, Money, Percentage};
    use rust_decimal_macros::dec;

    async fn repo() -> SqliteDocumentRepository {
        Database::new(DbConfig::in_memory()).await.unwrap().documents()
    }

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, hour, 0, 0).unwrap()
    }

    fn document(id: &str, doc_type: DocumentType, number: &str, hour: u32) -> Document {
        let draft = DocumentDraft::new(
            doc_type,
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            Customer {
                name: "Acme Ltd".to_string(),
                address: Some("Area 47, Lilongwe".to_string()),
                email: Some("buyer@acme.example".to_string()),
                phone: None,
            },
        )
        .with_item("Widget", dec!(2), Money::from(dec!(12.50)))
        .with_item("Gadget", dec!(1.5), Money::from(100))
        .with_tax_rate(Percentage::from(dec!(16.5)))
        .with_discount(Percentage::from(5))
        .with_notes("Thank you");

        Document::create(id, number, draft, at(hour))
    }

    #[tokio::test]
    async fn test_save_and_get_round_trip() {
        let repo = repo().await;
        let doc = document("d1", DocumentType::Invoice, "INV-0001", 9);

        repo.save(&doc).await.unwrap();
        let loaded = repo.get("d1").await.unwrap().unwrap();

        assert_eq!(loaded, doc);
        assert_eq!(loaded.items[0].description, "Widget");
        assert_eq!(loaded.items[1].description, "Gadget");
        assert!(loaded.is_consistent());
    }

    #[tokio::test]
    async fn test_get_missing_is_none() {
        let repo = repo().await;
        assert!(repo.get("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_replaces_items() {
        let repo = repo().await;
        let mut doc = document("d1", DocumentType::Invoice, "INV-0001", 9);
        repo.save(&doc).await.unwrap();

        doc.items.truncate(1);
        doc.recompute();
        repo.save(&doc).await.unwrap();

        let loaded = repo.get("d1").await.unwrap().unwrap();
        assert_eq!(loaded.items.len(), 1);
        assert_eq!(loaded.subtotal, Money::from(25));
        assert_eq!(repo.count_by_type(DocumentType::Invoice).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let repo = repo().await;
        repo.save(&document("a", DocumentType::Invoice, "INV-0001", 8)).await.unwrap();
        repo.save(&document("b", DocumentType::Quotation, "QUO-0001", 10)).await.unwrap();
        repo.save(&document("c", DocumentType::Invoice, "INV-0002", 9)).await.unwrap();

        let ids: Vec<String> = repo.list().await.unwrap().into_iter().map(|d| d.id).collect();
        assert_eq!(ids, ["b", "c", "a"]);

        let invoices = repo.list_by_type(DocumentType::Invoice).await.unwrap();
        let ids: Vec<&str> = invoices.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, ["c", "a"]);
        assert!(invoices.iter().all(|d| d.items.len() == 2));

        assert_eq!(repo.count_by_type(DocumentType::Receipt).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_duplicate_number_rejected_per_type() {
        let repo = repo().await;
        repo.save(&document("a", DocumentType::Invoice, "INV-0001", 8)).await.unwrap();

        let err = repo
            .save(&document("b", DocumentType::Invoice, "INV-0001", 9))
            .await
            .unwrap_err();
        match err {
            DbError::UniqueViolation { value, .. } => assert_eq!(value, "INV-0001"),
            other => panic!("unexpected error: {other}"),
        }

        // Same text under another type is fine.
        repo.save(&document("c", DocumentType::Receipt, "INV-0001", 9)).await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_is_unconditional() {
        let repo = repo().await;
        repo.save(&document("a", DocumentType::Invoice, "INV-0001", 8)).await.unwrap();

        repo.delete("a").await.unwrap();
        repo.delete("a").await.unwrap();
        repo.delete("never-existed").await.unwrap();

        assert!(repo.get("a").await.unwrap().is_none());

        let orphans: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM document_items")
            .fetch_one(&repo.pool)
            .await
            .unwrap();
        assert_eq!(orphans, 0);
    }

    #[tokio::test]
    async fn test_sequence_is_monotonic_per_type() {
        let repo = repo().await;

        assert_eq!(repo.next_sequence(DocumentType::Invoice).await.unwrap(), 1);
        assert_eq!(repo.next_sequence(DocumentType::Invoice).await.unwrap(), 2);
        assert_eq!(repo.next_sequence(DocumentType::Receipt).await.unwrap(), 1);
        assert_eq!(repo.next_sequence(DocumentType::Invoice).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_reserve_sequence_only_moves_forward() {
        let repo = repo().await;

        repo.reserve_sequence(DocumentType::Invoice, 4).await.unwrap();
        repo.reserve_sequence(DocumentType::Invoice, 2).await.unwrap();
        assert_eq!(repo.next_sequence(DocumentType::Invoice).await.unwrap(), 5);

        repo.next_sequence(DocumentType::Quotation).await.unwrap();
        repo.reserve_sequence(DocumentType::Quotation, 1).await.unwrap();
        assert_eq!(repo.next_sequence(DocumentType::Quotation).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_unparseable_amount_is_invalid_data() {
        let repo = repo().await;
        repo.save(&document("a", DocumentType::Invoice, "INV-0001", 8)).await.unwrap();

        sqlx::query("UPDATE documents SET total = 'lots' WHERE id = 'a'")
            .execute(&repo.pool)
            .await
            .unwrap();

        assert!(matches!(
            repo.get("a").await,
            Err(DbError::InvalidData { .. })
        ));
    }
}
