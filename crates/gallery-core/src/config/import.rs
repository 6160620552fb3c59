//! Document importer configuration.

use serde::{Deserialize, Deserializer, Serialize};

/// Per-importer settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImporterConfig {
    /// Object name of the JSON document inside the bucket.
    pub file: String,
    /// Abort the whole import on the first malformed record instead of
    /// skipping it.
    pub strict: bool,
}

/// Settings for the three document importers.
///
/// Testimonials are strict by default; packages and FAQs skip malformed
/// records. A section that sets only one key keeps the importer's default
/// for the other.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportConfig {
    /// Testimonials importer.
    #[serde(default = "default_testimonials", deserialize_with = "testimonials")]
    pub testimonials: ImporterConfig,
    /// Packages and addons importer.
    #[serde(default = "default_packages", deserialize_with = "packages")]
    pub packages: ImporterConfig,
    /// FAQ importer.
    #[serde(default = "default_faqs", deserialize_with = "faqs")]
    pub faqs: ImporterConfig,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            testimonials: default_testimonials(),
            packages: default_packages(),
            faqs: default_faqs(),
        }
    }
}

#[derive(Deserialize)]
struct ImporterOverride {
    file: Option<String>,
    strict: Option<bool>,
}

impl ImporterOverride {
    fn over(self, base: ImporterConfig) -> ImporterConfig {
        ImporterConfig {
            file: self.file.unwrap_or(base.file),
            strict: self.strict.unwrap_or(base.strict),
        }
    }
}

fn testimonials<'de, D: Deserializer<'de>>(d: D) -> Result<ImporterConfig, D::Error> {
    Ok(ImporterOverride::deserialize(d)?.over(default_testimonials()))
}

fn packages<'de, D: Deserializer<'de>>(d: D) -> Result<ImporterConfig, D::Error> {
    Ok(ImporterOverride::deserialize(d)?.over(default_packages()))
}

fn faqs<'de, D: Deserializer<'de>>(d: D) -> Result<ImporterConfig, D::Error> {
    Ok(ImporterOverride::deserialize(d)?.over(default_faqs()))
}

fn default_testimonials() -> ImporterConfig {
    ImporterConfig {
        file: "testimonials.json".to_string(),
        strict: true,
    }
}

fn default_packages() -> ImporterConfig {
    ImporterConfig {
        file: "packages.json".to_string(),
        strict: false,
    }
}

fn default_faqs() -> ImporterConfig {
    ImporterConfig {
        file: "faq.json".to_string(),
        strict: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_section_keeps_importer_defaults() {
        let cfg: ImportConfig = serde_json::from_value(serde_json::json!({
            "faqs": { "strict": true },
            "testimonials": { "file": "reviews.json" }
        }))
        .unwrap();

        assert_eq!(cfg.faqs, ImporterConfig { file: "faq.json".to_string(), strict: true });
        assert_eq!(cfg.testimonials.file, "reviews.json");
        assert!(cfg.testimonials.strict);
        assert_eq!(cfg.packages, default_packages());
    }

    #[test]
    fn test_full_section_overrides_both_keys() {
        let cfg: ImportConfig = serde_json::from_value(serde_json::json!({
            "packages": { "file": "p.json", "strict": true }
        }))
        .unwrap();
        assert_eq!(cfg.packages, ImporterConfig { file: "p.json".to_string(), strict: true });
    }
}
