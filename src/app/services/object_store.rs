use async_trait::async_trait;

use super::ServiceError;

/// Text uploads to object storage.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Uploads `text` to `bucket/key`, returning the object URI.
    async fn upload_text(&self, bucket: &str, key: &str, text: &str) -> Result<String, ServiceError>;
}

/// Stub that uploads nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct DryRunObjectStore;

#[async_trait]
impl ObjectStore for DryRunObjectStore {
    async fn upload_text(&self, bucket: &str, key: &str, _text: &str) -> Result<String, ServiceError> {
        Ok(format!("s3://{bucket}/{key} (DRY-RUN)"))
    }
}
