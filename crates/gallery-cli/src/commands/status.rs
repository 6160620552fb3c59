//! Catalog status command.

use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use gallery_core::error::AppError;
use gallery_database::{CatalogCounts, PgCatalogStore};

#[derive(Debug, Serialize, Tabled)]
struct CountRow {
    #[tabled(rename = "Table")]
    table: &'static str,
    #[tabled(rename = "Rows")]
    rows: u64,
}

fn rows(counts: &CatalogCounts) -> Vec<CountRow> {
    [
        ("folders", counts.folders),
        ("event folders", counts.event_folders),
        ("images", counts.images),
        ("packages", counts.packages),
        ("addons", counts.addons),
        ("faq categories", counts.faq_categories),
        ("faqs", counts.faqs),
        ("testimonials", counts.testimonials),
    ]
    .into_iter()
    .map(|(table, rows)| CountRow { table, rows })
    .collect()
}

/// Print row counts for every catalog table
pub async fn execute(env: &str, format: OutputFormat) -> Result<(), AppError> {
    let config = super::load_config(env)?;
    let pool = super::create_db_pool(&config).await?;

    let counts = PgCatalogStore::new(pool.pool().clone()).counts().await;
    pool.close().await;

    output::print_list(&rows(&counts?), format);
    Ok(())
}
