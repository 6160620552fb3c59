//! Supabase storage provider.
//!
//! Objects are fetched with an authenticated `GET` against the storage REST
//! endpoint: `{url}/storage/v1/object/{bucket}/{name}`.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{StatusCode, Url};
use tracing::debug;

use gallery_core::config::documents::SupabaseConfig;
use gallery_core::error::{AppError, ErrorKind};
use gallery_core::result::AppResult;
use gallery_core::traits::DocumentStore;

/// Supabase storage document store.
#[derive(Debug, Clone)]
pub struct SupabaseDocumentStore {
    base_url: Url,
    service_key: String,
    client: reqwest::Client,
}

impl SupabaseDocumentStore {
    /// Create a client for the given project settings.
    pub fn new(config: &SupabaseConfig, timeout: Duration) -> AppResult<Self> {
        if config.url.trim().is_empty() {
            return Err(AppError::configuration("Supabase URL is not configured"));
        }
        if config.service_key.trim().is_empty() {
            return Err(AppError::configuration(
                "Supabase service role key is not configured",
            ));
        }

        let base_url = Url::parse(config.url.trim()).map_err(|e| {
            AppError::with_source(ErrorKind::Configuration, "Invalid Supabase URL", e)
        })?;
        if base_url.cannot_be_a_base() {
            return Err(AppError::configuration(format!(
                "Supabase URL '{}' cannot be used as a base URL",
                config.url
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                AppError::with_source(ErrorKind::Configuration, "Failed to build HTTP client", e)
            })?;

        Ok(Self {
            base_url,
            service_key: config.service_key.clone(),
            client,
        })
    }

    /// Build the object URL, percent-encoding each path segment.
    pub fn object_url(&self, bucket: &str, name: &str) -> AppResult<Url> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| AppError::configuration("Supabase URL cannot be a base"))?;
            segments
                .pop_if_empty()
                .extend(["storage", "v1", "object", bucket])
                .extend(name.split('/').filter(|s| !s.is_empty()));
        }
        Ok(url)
    }
}

/// Map a non-success storage response to an error.
///
/// Supabase reports a missing object either as a plain 404 or as a 400
/// whose JSON body carries `"statusCode": "404"`.
pub(crate) fn status_error(status: StatusCode, body: &str, bucket: &str, name: &str) -> AppError {
    let body_says_missing = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("statusCode").map(|code| match code {
                serde_json::Value::String(s) => s == "404",
                serde_json::Value::Number(n) => n.as_u64() == Some(404),
                _ => false,
            })
        })
        .unwrap_or(false);

    match status {
        StatusCode::NOT_FOUND => AppError::not_found(format!("Object '{bucket}/{name}' not found")),
        StatusCode::BAD_REQUEST if body_says_missing => {
            AppError::not_found(format!("Object '{bucket}/{name}' not found"))
        }
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => AppError::access_denied(format!(
            "Access to '{bucket}/{name}' denied ({status})"
        )),
        _ => AppError::external(format!(
            "Downloading '{bucket}/{name}' failed with {status}"
        )),
    }
}

#[async_trait]
impl DocumentStore for SupabaseDocumentStore {
    fn provider_type(&self) -> &str {
        "supabase"
    }

    async fn download(&self, bucket: &str, name: &str) -> AppResult<Bytes> {
        let url = self.object_url(bucket, name)?;
        debug!(%url, "Downloading document");

        let response = self
            .client
            .get(url)
            .bearer_auth(&self.service_key)
            .header("apikey", &self.service_key)
            .send()
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::ExternalService,
                    format!("Request for '{bucket}/{name}' failed"),
                    e,
                )
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, &body, bucket, name));
        }

        response.bytes().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::ExternalService,
                format!("Reading '{bucket}/{name}' failed"),
                e,
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(url: &str) -> SupabaseDocumentStore {
        SupabaseDocumentStore::new(
            &SupabaseConfig {
                url: url.to_string(),
                service_key: "service-key".to_string(),
            },
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn test_object_url_encodes_segments() {
        let url = store("https://proj.supabase.co/")
            .object_url("content", "docs/faq list.json")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://proj.supabase.co/storage/v1/object/content/docs/faq%20list.json"
        );
    }

    #[test]
    fn test_missing_credentials_are_configuration_errors() {
        let err = SupabaseDocumentStore::new(&SupabaseConfig::default(), Duration::from_secs(5))
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
    }

    #[test]
    fn test_status_mapping() {
        let missing = status_error(StatusCode::NOT_FOUND, "", "b", "n");
        assert_eq!(missing.kind, ErrorKind::NotFound);

        let missing_400 = status_error(
            StatusCode::BAD_REQUEST,
            r#"{"statusCode":"404","error":"not_found","message":"Object not found"}"#,
            "b",
            "n",
        );
        assert_eq!(missing_400.kind, ErrorKind::NotFound);

        let denied = status_error(StatusCode::FORBIDDEN, "", "b", "n");
        assert_eq!(denied.kind, ErrorKind::AccessDenied);

        let other = status_error(StatusCode::BAD_GATEWAY, "", "b", "n");
        assert_eq!(other.kind, ErrorKind::ExternalService);
    }
}
