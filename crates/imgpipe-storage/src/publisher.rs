//! Artifact publishing
//!
//! Writes the transformed image, signs a short-lived GET link for it, and records that link
//! as a sidecar text object. The two writes are independent: if the second one fails the image
//! stays in place without a link object.

use crate::keys::{artifact_key, link_key};
use crate::{Storage, StorageError};
use bytes::Bytes;
use chrono::Utc;
use imgpipe_core::constants::{ARTIFACT_CONTENT_TYPE, LINK_CONTENT_TYPE, SIGNED_URL_TTL};
use imgpipe_core::{AccessLink, PublishError};
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
pub struct Publisher {
    storage: Arc<dyn Storage>,
    link_ttl: Duration,
}

impl Publisher {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage,
            link_ttl: SIGNED_URL_TTL,
        }
    }

    /// Store `image` as `<id>.jpg` and its signed link as `<id>_url.txt`.
    #[tracing::instrument(
        skip(self, image),
        fields(bucket = %self.storage.bucket(), size_bytes = image.len())
    )]
    pub async fn publish(&self, id: &str, image: Bytes) -> Result<AccessLink, PublishError> {
        let object_key = artifact_key(id);
        let link_key = link_key(id);

        self.storage
            .put(&object_key, image, ARTIFACT_CONTENT_TYPE)
            .await
            .map_err(|e| self.publish_error(&object_key, e))?;

        let issued_at = Utc::now();
        let url = self
            .storage
            .signed_get_url(&object_key, self.link_ttl)
            .await
            .map_err(|e| self.publish_error(&object_key, e))?;

        self.storage
            .put(&link_key, Bytes::from(url.clone()), LINK_CONTENT_TYPE)
            .await
            .map_err(|e| self.publish_error(&link_key, e))?;

        let ttl = chrono::Duration::from_std(self.link_ttl).unwrap_or_else(|_| chrono::Duration::zero());
        let expires_at = issued_at + ttl;

        tracing::info!(
            object_key = %object_key,
            link_key = %link_key,
            expires_at = %expires_at,
            "Published image and signed link"
        );

        Ok(AccessLink {
            object_key,
            link_key,
            url,
            expires_at,
        })
    }

    /// Log a storage failure with its diagnostic and convert it to a `PublishError`.
    fn publish_error(&self, key: &str, err: StorageError) -> PublishError {
        let bucket = self.storage.bucket().to_string();

        match err {
            StorageError::BucketNotFound(_) => {
                tracing::error!(
                    bucket = %bucket,
                    key = %key,
                    "Destination bucket does not exist"
                );
                PublishError::BucketNotFound { bucket }
            }
            StorageError::AccessDenied(_) => {
                tracing::error!(
                    bucket = %bucket,
                    key = %key,
                    "Access denied writing to destination bucket"
                );
                PublishError::AccessDenied {
                    bucket,
                    key: key.to_string(),
                }
            }
            other => {
                tracing::error!(
                    error = %other,
                    bucket = %bucket,
                    key = %key,
                    "Storage error while publishing"
                );
                PublishError::Store {
                    bucket,
                    key: key.to_string(),
                    message: other.to_string(),
                }
            }
        }
    }
}
