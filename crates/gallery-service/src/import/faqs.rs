//! FAQ importer.

use std::sync::Arc;

use serde_json::Value;
use tracing::info;

use gallery_core::config::ImporterConfig;
use gallery_core::error::AppError;
use gallery_core::result::AppResult;
use gallery_core::traits::DocumentStore;
use gallery_database::store::ContentCatalog;
use gallery_entity::faq::{NewFaq, NewFaqCategory};

use super::fields::{optional_array, text};
use super::{DocumentSource, ImportReport, Validator, missing_fields};

/// Replaces FAQ categories and entries from a `{ categories }` document.
#[derive(Debug, Clone)]
pub struct FaqImporter {
    documents: Arc<dyn DocumentStore>,
    catalog: Arc<dyn ContentCatalog>,
    source: DocumentSource,
    strict: bool,
}

impl FaqImporter {
    /// Creates a new FAQ importer.
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

    /// Import FAQ categories and their entries.
    pub async fn import(&self) -> AppResult<ImportReport> {
        let document = self.source.fetch(self.documents.as_ref()).await?;
        let (categories, skipped) = parse(&document, &self.source.file, self.strict)?;

        let outcome = self.catalog.replace_faqs(&categories).await?;
        info!(
            document = %self.source.file,
            categories = outcome.categories.len(),
            faqs = outcome.faqs.len(),
            skipped,
            failed = outcome.failed,
            "FAQs imported"
        );

        Ok(ImportReport {
            document: self.source.file.clone(),
            written: outcome.categories.len() + outcome.faqs.len(),
            skipped,
            failed: outcome.failed,
        })
    }
}

/// Validate an FAQ document.
pub fn parse(document: &Value, file: &str, strict: bool) -> AppResult<(Vec<NewFaqCategory>, usize)> {
    let categories = document
        .as_object()
        .and_then(|root| root.get("categories"))
        .and_then(Value::as_array)
        .ok_or_else(|| AppError::malformed(format!("{file}: 'categories' must be an array")))?;

    let mut validator = Validator::new(file, strict);
    let mut parsed = Vec::with_capacity(categories.len());

    for (index, record) in categories.iter().enumerate() {
        let label = format!("category {index}");
        let Some(record) = record.as_object() else {
            validator.reject(&label, "is not an object")?;
            continue;
        };
        let Some(name) = text(record, "name") else {
            validator.reject(&label, &missing_fields(&["name"]))?;
            continue;
        };
        let entries = match optional_array(record, "faqs") {
            Some(entries) => entries,
            None => {
                validator.reject(&label, "has a non-array 'faqs' field")?;
                continue;
            }
        };

        let mut faqs = Vec::with_capacity(entries.len());
        for (faq_index, entry) in entries.iter().enumerate() {
            let entry_label = format!("category {index} faq {faq_index}");
            let Some(entry) = entry.as_object() else {
                validator.drop_entry(&entry_label, "is not an object")?;
                continue;
            };
            let question = text(entry, "question");
            let answer = text(entry, "answer");
            let missing: Vec<&str> = [("question", question.is_none()), ("answer", answer.is_none())]
                .into_iter()
                .filter(|(_, absent)| *absent)
                .map(|(key, _)| key)
                .collect();
            let (Some(question), Some(answer)) = (question, answer) else {
                validator.drop_entry(&entry_label, &missing_fields(&missing))?;
                continue;
            };
            faqs.push(NewFaq { question, answer });
        }

        parsed.push(NewFaqCategory { name, faqs });
    }

    Ok((parsed, validator.skipped()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use gallery_core::error::ErrorKind;
    use serde_json::json;

    #[test]
    fn test_incomplete_entry_is_skipped() {
        let doc = json!({
            "categories": [{
                "name": "Booking",
                "faqs": [
                    { "question": "Q1", "answer": "A1" },
                    { "question": "Q2" }
                ]
            }]
        });
        let (categories, skipped) = parse(&doc, "faq.json", false).unwrap();

        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].faqs.len(), 1);
        assert_eq!(categories[0].faqs[0].question, "Q1");
        assert_eq!(skipped, 1);
    }

    #[test]
    fn test_nameless_category_is_skipped() {
        let doc = json!({ "categories": [{ "faqs": [] }, { "name": "Pricing" }] });
        let (categories, skipped) = parse(&doc, "faq.json", false).unwrap();
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].name, "Pricing");
        assert!(categories[0].faqs.is_empty());
        assert_eq!(skipped, 1);
    }

    #[test]
    fn test_strict_mode_aborts() {
        let doc = json!({ "categories": [{ "name": "Booking", "faqs": [{ "answer": "A" }] }] });
        let err = parse(&doc, "faq.json", true).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert!(err.message.contains("question"));
    }

    #[test]
    fn test_missing_categories_is_malformed() {
        let err = parse(&json!([]), "faq.json", false).unwrap_err();
        assert_eq!(err.kind, ErrorKind::MalformedDocument);
    }
}
