//! Cloudinary namespace client.
//!
//! Sub-folders come from the Admin API (`GET /{cloud}/folders/{path}`) and
//! assets from the Search API (`POST /{cloud}/resources/search`), both with
//! HTTP basic auth using the API key and secret.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Response, StatusCode, Url};
use serde::{Deserialize, Serialize};
use tracing::debug;

use gallery_core::config::MediaConfig;
use gallery_core::error::{AppError, ErrorKind};
use gallery_core::result::AppResult;
use gallery_core::traits::{Asset, AssetPage, NamespaceClient};

const SUBFOLDER_PAGE_SIZE: u32 = 500;

/// Cloudinary Admin/Search API client.
#[derive(Debug, Clone)]
pub struct CloudinaryClient {
    cloud_url: Url,
    api_key: String,
    api_secret: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct FoldersResponse {
    #[serde(default)]
    folders: Vec<FolderEntry>,
    #[serde(default)]
    next_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FolderEntry {
    path: String,
}

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    expression: String,
    with_field: [&'static str; 1],
    max_results: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    next_cursor: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    resources: Vec<SearchResource>,
    #[serde(default)]
    next_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchResource {
    asset_id: String,
    #[serde(default)]
    public_id: Option<String>,
    #[serde(default)]
    filename: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    format: Option<String>,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default)]
    secure_url: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    context: Option<serde_json::Value>,
}

impl CloudinaryClient {
    /// Create a client from the media configuration.
    pub fn new(config: &MediaConfig) -> AppResult<Self> {
        for (value, name) in [
            (&config.cloud_name, "cloud name"),
            (&config.api_key, "API key"),
            (&config.api_secret, "API secret"),
        ] {
            if value.trim().is_empty() {
                return Err(AppError::configuration(format!(
                    "Cloudinary {name} is not configured"
                )));
            }
        }

        let mut cloud_url = Url::parse(config.base_url.trim()).map_err(|e| {
            AppError::with_source(ErrorKind::Configuration, "Invalid Cloudinary base URL", e)
        })?;
        cloud_url
            .path_segments_mut()
            .map_err(|_| AppError::configuration("Cloudinary base URL cannot be a base"))?
            .pop_if_empty()
            .push(config.cloud_name.trim());

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::with_source(ErrorKind::Configuration, "Failed to build HTTP client", e)
            })?;

        Ok(Self {
            cloud_url,
            api_key: config.api_key.clone(),
            api_secret: config.api_secret.clone(),
            client,
        })
    }

    /// URL of the Admin API folder listing for `path`.
    pub fn folders_url(&self, path: &str, cursor: Option<&str>) -> Url {
        let mut url = self.cloud_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .push("folders")
                .extend(path.split('/').filter(|s| !s.is_empty()));
        }
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("max_results", &SUBFOLDER_PAGE_SIZE.to_string());
            if let Some(cursor) = cursor {
                query.append_pair("next_cursor", cursor);
            }
        }
        url
    }

    /// URL of the Search API.
    pub fn search_url(&self) -> Url {
        let mut url = self.cloud_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.extend(["resources", "search"]);
        }
        url
    }
}

/// Turn a non-success response into an error.
async fn check_status(response: Response, what: &str) -> AppResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(match status {
        StatusCode::NOT_FOUND => AppError::not_found(format!("{what}: not found")),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            AppError::access_denied(format!("{what}: access denied ({status})"))
        }
        _ => AppError::external(format!("{what}: {status} {}", body.trim())),
    })
}

/// Build the Search API expression matching assets directly in `path`.
pub fn folder_expression(path: &str) -> String {
    format!("folder:\"{}\"", path.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Flatten a resource context into string pairs.
///
/// The Search API returns context as a flat object while the Admin API
/// nests it under `custom`; both shapes are accepted.
fn flatten_context(value: Option<serde_json::Value>) -> HashMap<String, String> {
    let object = match value {
        Some(serde_json::Value::Object(mut map)) => match map.remove("custom") {
            Some(serde_json::Value::Object(custom)) => custom,
            Some(other) => {
                map.insert("custom".to_string(), other);
                map
            }
            None => map,
        },
        _ => return HashMap::new(),
    };

    object
        .into_iter()
        .filter_map(|(key, value)| match value {
            serde_json::Value::String(s) => Some((key, s)),
            serde_json::Value::Null => None,
            other => Some((key, other.to_string())),
        })
        .collect()
}

fn into_asset(resource: SearchResource) -> Asset {
    let filename = resource
        .filename
        .or_else(|| {
            resource
                .public_id
                .as_deref()
                .and_then(|id| id.rsplit('/').next())
                .map(str::to_string)
        })
        .unwrap_or_else(|| resource.asset_id.clone());
    let created_at = resource
        .created_at
        .as_deref()
        .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
        .map(|dt| dt.with_timezone(&Utc));

    Asset {
        asset_id: resource.asset_id,
        filename,
        display_name: resource.display_name,
        format: resource.format,
        created_at,
        url: resource.secure_url.or(resource.url).unwrap_or_default(),
        context: flatten_context(resource.context),
    }
}

#[async_trait]
impl NamespaceClient for CloudinaryClient {
    fn provider_type(&self) -> &str {
        "cloudinary"
    }

    async fn list_subfolders(&self, path: &str) -> AppResult<Vec<String>> {
        let mut paths = Vec::new();
        let mut cursor: Option<String> = None;
        loop {
            let url = self.folders_url(path, cursor.as_deref());
            let response = self
                .client
                .get(url)
                .basic_auth(&self.api_key, Some(&self.api_secret))
                .send()
                .await
                .map_err(|e| {
                    AppError::with_source(
                        ErrorKind::ExternalService,
                        format!("Listing sub-folders of '{path}' failed"),
                        e,
                    )
                })?;
            let response =
                check_status(response, &format!("Listing sub-folders of '{path}'")).await?;
            let page: FoldersResponse = response.json().await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::ExternalService,
                    format!("Invalid folder listing for '{path}'"),
                    e,
                )
            })?;

            paths.extend(page.folders.into_iter().map(|f| f.path));
            match page.next_cursor.filter(|c| !c.is_empty()) {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }
        debug!(path, count = paths.len(), "Listed sub-folders");
        Ok(paths)
    }

    async fn list_assets(
        &self,
        path: &str,
        cursor: Option<&str>,
        page_size: u32,
    ) -> AppResult<AssetPage> {
        let request = SearchRequest {
            expression: folder_expression(path),
            with_field: ["context"],
            max_results: page_size,
            next_cursor: cursor.filter(|c| !c.is_empty()),
        };

        let response = self
            .client
            .post(self.search_url())
            .basic_auth(&self.api_key, Some(&self.api_secret))
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::ExternalService,
                    format!("Searching assets in '{path}' failed"),
                    e,
                )
            })?;
        let response = check_status(response, &format!("Searching assets in '{path}'")).await?;
        let body: SearchResponse = response.json().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::ExternalService,
                format!("Invalid search response for '{path}'"),
                e,
            )
        })?;

        Ok(AssetPage {
            assets: body.resources.into_iter().map(into_asset).collect(),
            next_cursor: body.next_cursor.filter(|c| !c.is_empty()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> CloudinaryClient {
        CloudinaryClient::new(&MediaConfig {
            cloud_name: "demo".to_string(),
            api_key: "key".to_string(),
            api_secret: "secret".to_string(),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_urls() {
        let client = client();
        assert_eq!(
            client.folders_url("Events/Summer 2024", None).as_str(),
            "https://api.cloudinary.com/v1_1/demo/folders/Events/Summer%202024?max_results=500"
        );
        assert_eq!(
            client.search_url().as_str(),
            "https://api.cloudinary.com/v1_1/demo/resources/search"
        );
    }

    #[test]
    fn test_missing_credentials() {
        let err = CloudinaryClient::new(&MediaConfig::default()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
    }

    #[test]
    fn test_folder_expression_escapes_quotes() {
        assert_eq!(folder_expression("Events/2024"), "folder:\"Events/2024\"");
        assert_eq!(folder_expression("a\"b"), "folder:\"a\\\"b\"");
    }

    #[test]
    fn test_search_resource_mapping() {
        let body = serde_json::json!({
            "resources": [{
                "asset_id": "abc",
                "public_id": "Events/2024/cover_x",
                "display_name": "cover_x",
                "format": "jpg",
                "created_at": "2024-05-01T10:00:00Z",
                "secure_url": "https://res.cloudinary.com/demo/cover_x.jpg",
                "context": { "custom": { "event_name": "Reunion", "event_date": "2024-05-01" } }
            }],
            "next_cursor": ""
        });
        let parsed: SearchResponse = serde_json::from_value(body).unwrap();
        let asset = into_asset(parsed.resources.into_iter().next().unwrap());

        assert_eq!(asset.filename, "cover_x");
        assert_eq!(asset.context_value("event_name"), Some("Reunion"));
        assert_eq!(asset.url, "https://res.cloudinary.com/demo/cover_x.jpg");
        assert!(asset.created_at.is_some());
    }

    #[test]
    fn test_flat_context() {
        let context = flatten_context(Some(serde_json::json!({ "event_date": "2024-05-01" })));
        assert_eq!(context.get("event_date").map(String::as_str), Some("2024-05-01"));
    }
}
