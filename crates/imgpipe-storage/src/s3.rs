use crate::traits::{Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use http::Method;
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::path::Path;
use object_store::signer::Signer;
use object_store::Error as ObjectStoreError;
use object_store::{
    Attribute, Attributes, ObjectStore, ObjectStoreExt, PutOptions, PutPayload,
    Result as ObjectResult,
};
use std::time::Duration;

/// S3 storage implementation
#[derive(Clone)]
pub struct S3Storage {
    store: AmazonS3,
    bucket: String,
}

impl S3Storage {
    /// Create a new S3Storage instance
    ///
    /// # Arguments
    /// * `bucket` - S3 bucket name
    /// * `region` - AWS region (or region identifier for S3-compatible providers)
    /// * `endpoint_url` - Optional custom endpoint URL for S3-compatible providers
    ///   (e.g., "http://localhost:9000" for MinIO)
    pub fn new(bucket: String, region: String, endpoint_url: Option<String>) -> StorageResult<Self> {
        // Credentials come from the environment (Lambda role, profile, or static keys).
        let mut builder = AmazonS3Builder::from_env()
            .with_region(region)
            .with_bucket_name(bucket.clone());

        if let Some(endpoint) = endpoint_url {
            let allow_http = endpoint.starts_with("http://");
            builder = builder.with_endpoint(endpoint).with_allow_http(allow_http);
        }

        let store = builder
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        Ok(S3Storage { store, bucket })
    }

    /// Map an object_store failure on a write into the storage taxonomy.
    ///
    /// A 404 on a PUT can only mean the bucket itself is missing.
    fn classify_write_error(bucket: &str, key: &str, err: ObjectStoreError) -> StorageError {
        match err {
            ObjectStoreError::NotFound { .. } => StorageError::BucketNotFound(bucket.to_string()),
            ObjectStoreError::PermissionDenied { .. } | ObjectStoreError::Unauthenticated { .. } => {
                StorageError::AccessDenied(format!("{}/{}", bucket, key))
            }
            other => {
                let message = other.to_string();
                if message.contains("NoSuchBucket") {
                    StorageError::BucketNotFound(bucket.to_string())
                } else if message.contains("AccessDenied") || message.contains("403") {
                    StorageError::AccessDenied(format!("{}/{}", bucket, key))
                } else {
                    StorageError::UploadFailed(message)
                }
            }
        }
    }
}

#[async_trait]
impl Storage for S3Storage {
    async fn put(&self, storage_key: &str, data: Bytes, content_type: &str) -> StorageResult<()> {
        let size = data.len() as u64;
        let location = Path::from(storage_key.to_string());
        let start = std::time::Instant::now();

        let mut attributes = Attributes::new();
        attributes.insert(Attribute::ContentType, content_type.to_string().into());
        let options = PutOptions {
            attributes,
            ..Default::default()
        };

        let result: ObjectResult<_> = self
            .store
            .put_opts(&location, PutPayload::from(data), options)
            .await;

        result.map_err(|e| {
            tracing::error!(
                error = %e,
                bucket = %self.bucket,
                key = %storage_key,
                size_bytes = size,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "S3 put failed"
            );
            Self::classify_write_error(&self.bucket, storage_key, e)
        })?;

        tracing::info!(
            bucket = %self.bucket,
            key = %storage_key,
            content_type = %content_type,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 put successful"
        );

        Ok(())
    }

    async fn get(&self, storage_key: &str) -> StorageResult<Bytes> {
        let start = std::time::Instant::now();
        let location = Path::from(storage_key.to_string());

        let result: ObjectResult<_> = self.store.get(&location).await;

        let result = result.map_err(|e| match e {
            ObjectStoreError::NotFound { .. } => StorageError::NotFound(storage_key.to_string()),
            other => {
                tracing::error!(
                    error = %other,
                    bucket = %self.bucket,
                    key = %storage_key,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 get failed"
                );
                StorageError::DownloadFailed(other.to_string())
            }
        })?;

        let bytes = result
            .bytes()
            .await
            .map_err(|e| StorageError::DownloadFailed(e.to_string()))?;

        tracing::debug!(
            bucket = %self.bucket,
            key = %storage_key,
            size_bytes = bytes.len() as u64,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 get successful"
        );

        Ok(bytes)
    }

    async fn exists(&self, storage_key: &str) -> StorageResult<bool> {
        let location = Path::from(storage_key.to_string());
        match self.store.head(&location).await {
            Ok(_) => Ok(true),
            Err(ObjectStoreError::NotFound { .. }) => Ok(false),
            Err(e) => Err(StorageError::BackendError(e.to_string())),
        }
    }

    async fn signed_get_url(
        &self,
        storage_key: &str,
        expires_in: Duration,
    ) -> StorageResult<String> {
        let location = Path::from(storage_key.to_string());
        let url_result: ObjectResult<_> = self
            .store
            .signed_url(Method::GET, &location, expires_in)
            .await;

        let url = url_result
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    key = %storage_key,
                    "S3 URL signing failed"
                );
                StorageError::SigningFailed(e.to_string())
            })?
            .to_string();

        Ok(url)
    }

    fn bucket(&self) -> &str {
        &self.bucket
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    fn source(msg: &str) -> Box<dyn std::error::Error + Send + Sync> {
        Box::new(io::Error::other(msg.to_string()))
    }

    #[test]
    fn test_classify_not_found_as_missing_bucket() {
        let err = ObjectStoreError::NotFound {
            path: "req1.jpg".to_string(),
            source: source("404"),
        };
        assert!(matches!(
            S3Storage::classify_write_error("thumbs", "req1.jpg", err),
            StorageError::BucketNotFound(bucket) if bucket == "thumbs"
        ));

        let err = ObjectStoreError::Generic {
            store: "S3",
            source: source("NoSuchBucket: The specified bucket does not exist"),
        };
        assert!(matches!(
            S3Storage::classify_write_error("thumbs", "req1.jpg", err),
            StorageError::BucketNotFound(_)
        ));
    }

    #[test]
    fn test_classify_access_denied() {
        let err = ObjectStoreError::PermissionDenied {
            path: "req1.jpg".to_string(),
            source: source("forbidden"),
        };
        assert!(matches!(
            S3Storage::classify_write_error("thumbs", "req1.jpg", err),
            StorageError::AccessDenied(target) if target == "thumbs/req1.jpg"
        ));

        let err = ObjectStoreError::Unauthenticated {
            path: "req1.jpg".to_string(),
            source: source("expired token"),
        };
        assert!(matches!(
            S3Storage::classify_write_error("thumbs", "req1.jpg", err),
            StorageError::AccessDenied(_)
        ));
    }

    #[test]
    fn test_classify_generic_failure() {
        let err = ObjectStoreError::Generic {
            store: "S3",
            source: source("connection reset"),
        };
        assert!(matches!(
            S3Storage::classify_write_error("thumbs", "req1.jpg", err),
            StorageError::UploadFailed(_)
        ));
    }
}
