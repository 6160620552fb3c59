//! Packages and addons importer.

use std::sync::Arc;

use serde_json::Value;
use tracing::info;

use gallery_core::config::ImporterConfig;
use gallery_core::error::AppError;
use gallery_core::result::AppResult;
use gallery_core::traits::DocumentStore;
use gallery_database::store::ContentCatalog;
use gallery_entity::package::{NewAddon, NewPackage};

use super::fields::{optional_array, price, text, text_any, text_or_lines};
use super::{DocumentSource, ImportReport, Validator, missing_fields};

const PRICE_KEYS: [&str; 3] = ["priceAUD", "price_aud", "price"];

/// Validated contents of a packages document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PackageDocument {
    /// Packages to insert.
    pub packages: Vec<NewPackage>,
    /// Standalone addons to insert.
    pub addons: Vec<NewAddon>,
    /// Records rejected by validation.
    pub skipped: usize,
}

/// Replaces packages and addons from a `{ packages, addons }` document.
#[derive(Debug, Clone)]
pub struct PackageImporter {
    documents: Arc<dyn DocumentStore>,
    catalog: Arc<dyn ContentCatalog>,
    source: DocumentSource,
    strict: bool,
}

impl PackageImporter {
    /// Creates a new packages importer.
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

    /// Import packages and addons.
    pub async fn import(&self) -> AppResult<ImportReport> {
        let document = self.source.fetch(self.documents.as_ref()).await?;
        let parsed = parse(&document, &self.source.file, self.strict)?;

        let outcome = self
            .catalog
            .replace_packages(&parsed.packages, &parsed.addons)
            .await?;
        info!(
            document = %self.source.file,
            packages = outcome.packages.len(),
            addons = outcome.addons.len(),
            skipped = parsed.skipped,
            failed = outcome.failed,
            "Packages imported"
        );

        Ok(ImportReport {
            document: self.source.file.clone(),
            written: outcome.packages.len() + outcome.addons.len(),
            skipped: parsed.skipped,
            failed: outcome.failed,
        })
    }
}

/// Validate a packages document.
pub fn parse(document: &Value, file: &str, strict: bool) -> AppResult<PackageDocument> {
    let root = document
        .as_object()
        .ok_or_else(|| AppError::malformed(format!("{file}: expected a JSON object")))?;
    let packages = root
        .get("packages")
        .and_then(Value::as_array)
        .ok_or_else(|| AppError::malformed(format!("{file}: 'packages' must be an array")))?;
    let addons = optional_array(root, "addons")
        .ok_or_else(|| AppError::malformed(format!("{file}: 'addons' must be an array")))?;

    let mut validator = Validator::new(file, strict);
    let mut parsed = PackageDocument::default();

    for (index, record) in packages.iter().enumerate() {
        let label = format!("package {index}");
        let Some(record) = record.as_object() else {
            validator.reject(&label, "is not an object")?;
            continue;
        };
        let Some(name) = text(record, "name") else {
            validator.reject(&label, &missing_fields(&["name"]))?;
            continue;
        };

        parsed.packages.push(NewPackage {
            name,
            ideal_for: text_any(record, &["idealFor", "ideal_for"]),
            includes: text_or_lines(record, "includes"),
            price_aud: price(record, &PRICE_KEYS),
            image: text(record, "image"),
        });
    }

    for (index, record) in addons.iter().enumerate() {
        let label = format!("addon {index}");
        let Some(record) = record.as_object() else {
            validator.reject(&label, "is not an object")?;
            continue;
        };
        let Some(name) = text(record, "name") else {
            validator.reject(&label, &missing_fields(&["name"]))?;
            continue;
        };

        parsed.addons.push(NewAddon {
            name,
            price_aud: price(record, &PRICE_KEYS),
            unit: text(record, "unit"),
            delivery: text(record, "delivery"),
            package_id: None,
        });
    }

    parsed.skipped = validator.skipped();
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gallery_core::error::ErrorKind;
    use serde_json::json;

    #[test]
    fn test_nameless_package_is_skipped() {
        let doc = json!({
            "packages": [{ "name": "Gold" }, { "ideal_for": "x" }],
            "addons": [{ "name": "Extra hour", "priceAUD": 100 }]
        });
        let parsed = parse(&doc, "packages.json", false).unwrap();

        assert_eq!(parsed.packages.len(), 1);
        assert_eq!(parsed.packages[0].name, "Gold");
        assert_eq!(parsed.skipped, 1);
        assert_eq!(parsed.addons.len(), 1);
        assert_eq!(parsed.addons[0].price_aud, Some(100.0));
        assert!(parsed.addons[0].package_id.is_none());
    }

    #[test]
    fn test_field_aliases() {
        let doc = json!({
            "packages": [{
                "name": "Silver",
                "idealFor": "Small weddings",
                "includes": ["4 hours", "Online gallery"],
                "price": "1499.00",
                "image": "silver.jpg"
            }]
        });
        let parsed = parse(&doc, "packages.json", false).unwrap();
        let package = &parsed.packages[0];

        assert_eq!(package.ideal_for.as_deref(), Some("Small weddings"));
        assert_eq!(package.includes.as_deref(), Some("4 hours\nOnline gallery"));
        assert_eq!(package.price_aud, Some(1499.0));
        assert!(parsed.addons.is_empty());
    }

    #[test]
    fn test_strict_mode_rejects_nameless_addon() {
        let doc = json!({ "packages": [], "addons": [{ "priceAUD": 50 }] });
        let err = parse(&doc, "packages.json", true).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert!(err.message.contains("addon 0"));
    }

    #[test]
    fn test_shape_errors() {
        let missing = parse(&json!({ "addons": [] }), "p.json", false).unwrap_err();
        assert_eq!(missing.kind, ErrorKind::MalformedDocument);

        let bad_addons =
            parse(&json!({ "packages": [], "addons": "none" }), "p.json", false).unwrap_err();
        assert_eq!(bad_addons.kind, ErrorKind::MalformedDocument);

        let null_addons = parse(&json!({ "packages": [], "addons": null }), "p.json", false);
        assert!(null_addons.unwrap().addons.is_empty());
    }
}
