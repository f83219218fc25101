//! # Seed Data Generator
//!
//! Populates the database with sample invoices, quotations and receipts
//! for development.
//!
//! ## Usage
//! ```bash
//! # Generate 30 documents (default) into $FOLIO_DB_PATH or ./folio.db
//! cargo run -p folio-db --bin seed
//!
//! # Generate custom amount
//! cargo run -p folio-db --bin seed -- --count 200
//!
//! # Specify database path
//! cargo run -p folio-db --bin seed -- --db ./data/folio.db
//! ```
//!
//! Each document gets:
//! - A customer from a fixed list
//! - 1 to 4 line items with fractional quantities now and then
//! - The configured tax rate, and a discount on every fifth document
//! - A status spread across draft/sent/paid/overdue

use std::env;

use chrono::{Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use folio_core::{
    Customer, DocumentDraft, DocumentStatus, DocumentType, Money, Percentage,
};
use folio_db::{AppConfig, Database, DocumentService};

/// Sample customers: (name, address, email)
const CUSTOMERS: &[(&str, &str, &str)] = &[
    ("Acme Ltd", "Area 47, Lilongwe", "accounts@acme.example"),
    ("Blantyre Hardware", "Ginnery Corner, Blantyre", "orders@bhw.example"),
    ("Lake Shore Lodge", "Senga Bay, Salima", "frontdesk@lakeshore.example"),
    ("Mzuzu Agro Supplies", "Katoto, Mzuzu", "buy@mzuzuagro.example"),
    ("Zomba Print House", "Old Town, Zomba", "hello@zombaprint.example"),
];

/// Sample services/products: (description, unit price in whole MWK)
const CATALOGUE: &[(&str, i64)] = &[
    ("Website maintenance (monthly)", 85_000),
    ("Laptop repair", 45_000),
    ("A4 paper ream", 6_500),
    ("Network cabling per metre", 1_200),
    ("Consulting hour", 25_000),
    ("Printer toner", 38_000),
    ("Delivery", 7_500),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let args: Vec<String> = env::args().collect();
    let mut config = AppConfig::from_env()?;
    let mut count: usize = 30;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(30);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    config.db_path = args[i + 1].clone().into();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Folio Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of documents to generate (default: 30)");
                println!("  -d, --db <PATH>    Database file path (default: $FOLIO_DB_PATH or ./folio.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            other => warn!(arg = %other, "Ignoring unknown argument"),
        }
        i += 1;
    }

    info!(path = %config.db_path.display(), count, "Seeding database");

    let db = Database::new(config.db_config()).await?;
    let service = DocumentService::new(db.documents());

    let existing = service.list().await?.len();
    if existing > 0 {
        warn!(existing, "Database already has documents, skipping seed");
        db.close().await;
        return Ok(());
    }

    db.company().save(&config.default_company()).await?;

    let start = std::time::Instant::now();
    let today = Utc::now().date_naive();
    let mut generated = 0;

    for seed in 0..count {
        let draft = sample_draft(seed, today, config.default_tax_rate);
        let document = match service.create(draft).await {
            Ok(document) => document,
            Err(e) => {
                warn!(seed, error = %e, "Failed to create document");
                continue;
            }
        };

        let status = match seed % 4 {
            0 => DocumentStatus::Draft,
            1 => DocumentStatus::Sent,
            2 => DocumentStatus::Paid,
            _ => DocumentStatus::Overdue,
        };
        if status != DocumentStatus::Draft {
            service.set_status(&document.id, status).await?;
        }

        generated += 1;
    }

    let elapsed = start.elapsed();
    info!(generated, ?elapsed, "Seed complete");

    for doc_type in DocumentType::ALL {
        let documents = service.list_by_type(doc_type).await?;
        let total: Money = documents.iter().map(|d| d.total).sum();
        info!(
            doc_type = %doc_type,
            count = documents.len(),
            total = %config.currency.format(total),
            "Summary"
        );
    }

    db.close().await;
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,folio=debug,sqlx=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Builds one deterministic sample draft.
fn sample_draft(seed: usize, today: NaiveDate, tax_rate: Percentage) -> DocumentDraft {
    let doc_type = DocumentType::ALL[seed % DocumentType::ALL.len()];
    let (name, address, email) = CUSTOMERS[seed % CUSTOMERS.len()];
    let date = today - Duration::days((seed % 60) as i64);

    let customer = Customer {
        name: name.to_string(),
        address: Some(address.to_string()),
        email: Some(email.to_string()),
        phone: None,
    };

    let mut draft = DocumentDraft::new(doc_type, date, customer).with_tax_rate(tax_rate);

    let item_count = 1 + seed % 4;
    for n in 0..item_count {
        let (description, price) = CATALOGUE[(seed * 3 + n) % CATALOGUE.len()];
        // Every seventh line uses a half quantity (metres, hours).
        let quantity = if (seed + n) % 7 == 0 {
            Decimal::new(15, 1)
        } else {
            Decimal::from(1 + (seed + n) % 5)
        };
        draft = draft.with_item(description, quantity, Money::from(price));
    }

    if seed % 5 == 0 {
        draft = draft.with_discount(Percentage::from(10));
    }

    if doc_type.has_due_date() {
        draft = draft.with_due_date(date + Duration::days(30));
    }

    draft
}
