//! JSON document importers.
//!
//! Each importer downloads one document from the configured bucket,
//! validates every record, then hands the validated set to a single
//! replace call on the catalog store.

pub mod faqs;
pub mod fields;
pub mod packages;
pub mod testimonials;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use gallery_core::error::AppError;
use gallery_core::result::AppResult;
use gallery_core::traits::DocumentStore;

pub use faqs::FaqImporter;
pub use packages::PackageImporter;
pub use testimonials::TestimonialImporter;

/// Outcome of one document import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportReport {
    /// Object name the records were read from.
    pub document: String,
    /// Rows written to the catalog.
    pub written: usize,
    /// Records left out because they failed validation.
    pub skipped: usize,
    /// Valid records whose insert failed.
    pub failed: usize,
}

/// Where an importer reads its document from.
#[derive(Debug, Clone)]
pub struct DocumentSource {
    /// Bucket name; `None` when unconfigured.
    pub bucket: Option<String>,
    /// Object name inside the bucket.
    pub file: String,
}

impl DocumentSource {
    /// Download the document and parse it as JSON.
    pub async fn fetch(&self, documents: &dyn DocumentStore) -> AppResult<Value> {
        let bucket = self.bucket.as_deref().ok_or_else(|| {
            AppError::configuration(format!(
                "No storage bucket configured for '{}' (documents.bucket)",
                self.file
            ))
        })?;

        let bytes = documents.download(bucket, &self.file).await?;
        debug!(bucket, file = %self.file, size = bytes.len(), "Downloaded document");

        let value: Value = serde_json::from_slice(&bytes)?;
        Ok(value)
    }
}

/// Tracks records rejected by validation under a strictness flag.
#[derive(Debug)]
pub(crate) struct Validator<'a> {
    document: &'a str,
    strict: bool,
    skipped: usize,
}

impl<'a> Validator<'a> {
    pub(crate) fn new(document: &'a str, strict: bool) -> Self {
        Self {
            document,
            strict,
            skipped: 0,
        }
    }

    /// Reject a record. Strict mode turns this into an error; lenient mode
    /// logs it and counts it as skipped.
    pub(crate) fn reject(&mut self, record: &str, reason: &str) -> AppResult<()> {
        self.check_strict(record, reason)?;
        warn!(document = self.document, record, reason, "Skipping invalid record");
        self.skipped += 1;
        Ok(())
    }

    /// Reject a nested entry whose parent record is kept. Lenient mode
    /// skips it silently apart from a debug event.
    pub(crate) fn drop_entry(&mut self, record: &str, reason: &str) -> AppResult<()> {
        self.check_strict(record, reason)?;
        debug!(document = self.document, record, reason, "Dropping incomplete entry");
        self.skipped += 1;
        Ok(())
    }

    fn check_strict(&self, record: &str, reason: &str) -> AppResult<()> {
        if self.strict {
            return Err(AppError::validation(format!(
                "{}: {record} {reason}",
                self.document
            )));
        }
        Ok(())
    }

    pub(crate) fn skipped(&self) -> usize {
        self.skipped
    }
}

/// Format a list of missing field names.
pub(crate) fn missing_fields(fields: &[&str]) -> String {
    format!("is missing {}", fields.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use gallery_core::error::ErrorKind;

    #[test]
    fn test_dropped_entries_count_as_skipped() {
        let mut validator = Validator::new("faq.json", false);
        validator.drop_entry("category 0 faq 1", "is missing answer").unwrap();
        validator.reject("category 2", "is missing name").unwrap();
        assert_eq!(validator.skipped(), 2);
    }

    #[test]
    fn test_strict_drop_entry_is_validation_error() {
        let mut validator = Validator::new("faq.json", true);
        let err = validator
            .drop_entry("category 0 faq 1", "is missing answer")
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(err.message, "faq.json: category 0 faq 1 is missing answer");
        assert_eq!(validator.skipped(), 0);
    }
}
