//! Testimonials importer.

use std::sync::Arc;

use serde_json::Value;
use tracing::info;

use gallery_core::config::ImporterConfig;
use gallery_core::error::AppError;
use gallery_core::result::AppResult;
use gallery_core::traits::DocumentStore;
use gallery_database::store::ContentCatalog;
use gallery_entity::testimonial::{NewTestimonial, Testimonial};

use super::fields::text;
use super::{DocumentSource, ImportReport, Validator, missing_fields};

/// Replaces the testimonials table from a JSON array document.
#[derive(Debug, Clone)]
pub struct TestimonialImporter {
    documents: Arc<dyn DocumentStore>,
    catalog: Arc<dyn ContentCatalog>,
    source: DocumentSource,
    strict: bool,
}

impl TestimonialImporter {
    /// Creates a new testimonials importer.
    pub fn new(
        documents: Arc<dyn DocumentStore>,
        catalog: Arc<dyn ContentCatalog>,
        bucket: Option<String>,
        config: &ImporterConfig,
    ) -> Self {
        Self {
            documents,
            catalog,
            source: DocumentSource {
                bucket,
                file: config.file.clone(),
            },
            strict: config.strict,
        }
    }

    /// Import and return a report.
    pub async fn import(&self) -> AppResult<ImportReport> {
        let (rows, skipped) = self.import_rows().await?;
        Ok(ImportReport {
            document: self.source.file.clone(),
            written: rows.len(),
            skipped,
            failed: 0,
        })
    }

    /// Import and return the inserted rows with the number of skipped
    /// records.
    pub async fn import_rows(&self) -> AppResult<(Vec<Testimonial>, usize)> {
        let document = self.source.fetch(self.documents.as_ref()).await?;
        let (rows, skipped) = parse(&document, &self.source.file, self.strict)?;

        let inserted = self.catalog.replace_testimonials(&rows).await?;
        info!(
            document = %self.source.file,
            inserted = inserted.len(),
            skipped,
            "Testimonials imported"
        );
        Ok((inserted, skipped))
    }
}

const REQUIRED: [&str; 5] = ["heading", "details", "name", "occasion", "date"];

/// Validate a testimonials document.
pub fn parse(document: &Value, file: &str, strict: bool) -> AppResult<(Vec<NewTestimonial>, usize)> {
    let records = document.as_array().ok_or_else(|| {
        AppError::malformed(format!("{file}: expected a JSON array of testimonials"))
    })?;

    let mut validator = Validator::new(file, strict);
    let mut rows = Vec::with_capacity(records.len());

    for (index, record) in records.iter().enumerate() {
        let label = format!("record {index}");
        let Some(record) = record.as_object() else {
            validator.reject(&label, "is not an object")?;
            continue;
        };

        let values = REQUIRED.map(|key| text(record, key));
        let missing: Vec<&str> = REQUIRED
            .iter()
            .zip(&values)
            .filter(|(_, value)| value.is_none())
            .map(|(key, _)| *key)
            .collect();
        let [Some(heading), Some(details), Some(name), Some(occasion), Some(date)] = values else {
            validator.reject(&label, &missing_fields(&missing))?;
            continue;
        };

        rows.push(NewTestimonial {
            heading,
            details,
            name,
            occasion,
            date,
            image_url: text(record, "image_url"),
        });
    }

    Ok((rows, validator.skipped()))
}
