//! Document store trait for the object storage holding catalog JSON.

use async_trait::async_trait;
use bytes::Bytes;

use crate::result::AppResult;

/// Read access to named blobs in object storage buckets.
///
/// Implementations map a missing object to `ErrorKind::NotFound`, a
/// rejected credential to `ErrorKind::AccessDenied`, and every other
/// failure to `ErrorKind::ExternalService`.
#[async_trait]
pub trait DocumentStore: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g. "supabase", "s3").
    fn provider_type(&self) -> &str;

    /// Download the object `name` from `bucket`.
    async fn download(&self, bucket: &str, name: &str) -> AppResult<Bytes>;
}
