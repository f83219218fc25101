//! # Company Repository
//!
//! The single company profile row printed on every document.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use folio_core::CompanyInfo;

#[derive(Debug, sqlx::FromRow)]
struct CompanyRecord {
    name: String,
    address: String,
    phone: String,
    email: String,
    tax_id: Option<String>,
}

impl From<CompanyRecord> for CompanyInfo {
    fn from(record: CompanyRecord) -> Self {
        CompanyInfo {
            name: record.name,
            address: record.address,
            phone: record.phone,
            email: record.email,
            tax_id: record.tax_id,
        }
    }
}

/// Repository for the company profile.
#[derive(Debug, Clone)]
pub struct CompanyRepository {
    pool: SqlitePool,
}

impl CompanyRepository {
    /// Creates a new CompanyRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CompanyRepository { pool }
    }

    /// The saved profile, or [`CompanyInfo::default`] if none was saved yet.
    pub async fn get(&self) -> DbResult<CompanyInfo> {
        let record: Option<CompanyRecord> = sqlx::query_as(
            "SELECT name, address, phone, email, tax_id FROM company_info WHERE id = 1",
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(record.map(CompanyInfo::from).unwrap_or_default())
    }

    /// Saves the profile, replacing any previous one.
    pub async fn save(&self, info: &CompanyInfo) -> DbResult<()> {
        debug!(name = %info.name, "Saving company profile");

        sqlx::query(
            r#"
            INSERT INTO company_info (id, name, address, phone, email, tax_id, updated_at)
            VALUES (1, ?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT (id) DO UPDATE SET
                name = excluded.name,
                address = excluded.address,
                phone = excluded.phone,
                email = excluded.email,
                tax_id = excluded.tax_id,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&info.name)
        .bind(&info.address)
        .bind(&info.phone)
        .bind(&info.email)
        .bind(&info.tax_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use folio_core::DEFAULT_BUSINESS_NAME;

    #[tokio::test]
    async fn test_defaults_when_unset() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let info = db.company().get().await.unwrap();

        assert_eq!(info.name, DEFAULT_BUSINESS_NAME);
        assert_eq!(info, CompanyInfo::default());
    }

    #[tokio::test]
    async fn test_save_replaces_profile() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.company();

        let mut info = CompanyInfo {
            name: "Kethu Groups".to_string(),
            address: "P.O. Box 1, Blantyre".to_string(),
            phone: "+265 1 000 000".to_string(),
            email: "accounts@kethu.example".to_string(),
            tax_id: Some("TPIN-123".to_string()),
        };
        repo.save(&info).await.unwrap();
        assert_eq!(repo.get().await.unwrap(), info);

        info.tax_id = None;
        repo.save(&info).await.unwrap();
        assert_eq!(repo.get().await.unwrap(), info);
    }
}
