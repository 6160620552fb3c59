//! S3-compatible document store (requires the `s3` feature).

use std::time::Duration;

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_config::timeout::TimeoutConfig;
use aws_sdk_s3::Client;
use aws_sdk_s3::config::{Credentials, Region};
use bytes::Bytes;

use gallery_core::config::S3Config;
use gallery_core::error::{AppError, ErrorKind};
use gallery_core::result::AppResult;
use gallery_core::traits::DocumentStore;

/// S3-compatible document store.
#[derive(Debug, Clone)]
pub struct S3DocumentStore {
    client: Client,
}

impl S3DocumentStore {
    /// Create a new S3 document store.
    ///
    /// Static credentials are used when both keys are set; otherwise the
    /// default AWS credential chain applies. A non-empty endpoint switches
    /// to path-style addressing for MinIO and Supabase S3.
    pub async fn new(config: &S3Config, timeout: Duration) -> AppResult<Self> {
        tracing::info!(
            endpoint = %config.endpoint,
            region = %config.region,
            "Initializing S3 document store"
        );

        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .timeout_config(
                TimeoutConfig::builder()
                    .operation_timeout(timeout)
                    .build(),
            );
        if !config.access_key.is_empty() && !config.secret_key.is_empty() {
            loader = loader.credentials_provider(Credentials::new(
                config.access_key.clone(),
                config.secret_key.clone(),
                None,
                None,
                "gallery-config",
            ));
        }
        if !config.endpoint.is_empty() {
            loader = loader.endpoint_url(config.endpoint.clone());
        }
        let shared = loader.load().await;

        let s3_config = aws_sdk_s3::config::Builder::from(&shared)
            .force_path_style(!config.endpoint.is_empty())
            .build();

        Ok(Self {
            client: Client::from_conf(s3_config),
        })
    }
}

#[async_trait]
impl DocumentStore for S3DocumentStore {
    fn provider_type(&self) -> &str {
        "s3"
    }

    async fn download(&self, bucket: &str, name: &str) -> AppResult<Bytes> {
        let output = self
            .client
            .get_object()
            .bucket(bucket)
            .key(name)
            .send()
            .await
            .map_err(|e| {
                let missing = e
                    .as_service_error()
                    .is_some_and(|service| service.is_no_such_key());
                let status = e.raw_response().map(|r| r.status().as_u16());
                match (missing, status) {
                    (true, _) | (_, Some(404)) => {
                        AppError::not_found(format!("Object '{bucket}/{name}' not found"))
                    }
                    (_, Some(401 | 403)) => {
                        AppError::access_denied(format!("Access to '{bucket}/{name}' denied"))
                    }
                    _ => AppError::with_source(
                        ErrorKind::ExternalService,
                        format!("GetObject '{bucket}/{name}' failed"),
                        e,
                    ),
                }
            })?;

        let data = output.body.collect().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::ExternalService,
                format!("Reading '{bucket}/{name}' failed"),
                e,
            )
        })?;
        Ok(data.into_bytes())
    }
}
