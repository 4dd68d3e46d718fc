use crate::traits::{Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use tokio::io::AsyncWriteExt;

type HmacSha256 = Hmac<Sha256>;

/// Local filesystem storage implementation
///
/// The base directory plays the role of the bucket. Signed URLs carry an expiry timestamp and
/// an HMAC-SHA256 signature over the key and expiry, so whatever serves `base_url` can verify
/// them with [`LocalStorage::verify_signature`].
#[derive(Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
    base_url: String,
    bucket: String,
    signing_secret: String,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory for object storage (e.g., "/var/lib/imgpipe/out")
    /// * `base_url` - Base URL the directory is served from (e.g., "http://localhost:9000/media")
    /// * `signing_secret` - Secret used to sign generated URLs
    pub async fn new(
        base_path: impl Into<PathBuf>,
        base_url: String,
        signing_secret: String,
    ) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        let bucket = base_path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| base_path.display().to_string());

        Ok(LocalStorage {
            base_path,
            base_url,
            bucket,
            signing_secret,
        })
    }

    /// Convert storage key to filesystem path with security validation
    ///
    /// Every path component must be a plain name: no `..`, `.` or root, so a key can never
    /// escape the base directory. Dots inside a name (`v2..final.jpg`) are fine.
    fn key_to_path(&self, storage_key: &str) -> StorageResult<PathBuf> {
        if storage_key.is_empty() {
            return Err(StorageError::InvalidKey("Storage key is empty".to_string()));
        }

        if storage_key.contains('\\') {
            return Err(StorageError::InvalidKey(
                "Storage key contains invalid characters".to_string(),
            ));
        }

        if !Path::new(storage_key)
            .components()
            .all(|component| matches!(component, Component::Normal(_)))
        {
            return Err(StorageError::InvalidKey(format!(
                "Storage key {:?} escapes the storage directory",
                storage_key
            )));
        }

        Ok(self.base_path.join(storage_key))
    }

    fn signature(&self, storage_key: &str, expires: i64) -> StorageResult<String> {
        let mut mac = HmacSha256::new_from_slice(self.signing_secret.as_bytes())
            .map_err(|e| StorageError::SigningFailed(e.to_string()))?;
        mac.update(format!("GET\n{}\n{}", storage_key, expires).as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }

    /// Check a signature produced by [`Storage::signed_get_url`] and that it has not expired.
    pub fn verify_signature(&self, storage_key: &str, expires: i64, signature: &str) -> bool {
        if expires < Utc::now().timestamp() {
            return false;
        }

        let Ok(expected) = hex::decode(signature) else {
            return false;
        };
        let Ok(mut mac) = HmacSha256::new_from_slice(self.signing_secret.as_bytes()) else {
            return false;
        };
        mac.update(format!("GET\n{}\n{}", storage_key, expires).as_bytes());
        mac.verify_slice(&expected).is_ok()
    }

    /// Ensure parent directory exists
    async fn ensure_parent_dir(&self, path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    fn write_error(&self, storage_key: &str, path: &Path, e: std::io::Error) -> StorageError {
        match e.kind() {
            ErrorKind::PermissionDenied => {
                StorageError::AccessDenied(format!("{}/{}", self.bucket, storage_key))
            }
            _ => StorageError::UploadFailed(format!(
                "Failed to write file {}: {}",
                path.display(),
                e
            )),
        }
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn put(&self, storage_key: &str, data: Bytes, content_type: &str) -> StorageResult<()> {
        let path = self.key_to_path(storage_key)?;
        let size = data.len();

        match fs::try_exists(&self.base_path).await {
            Ok(true) => {}
            Ok(false) => return Err(StorageError::BucketNotFound(self.bucket.clone())),
            Err(e) => return Err(self.write_error(storage_key, &self.base_path, e)),
        }

        self.ensure_parent_dir(&path)
            .await
            .map_err(|e| match e {
                StorageError::IoError(io) => self.write_error(storage_key, &path, io),
                other => other,
            })?;

        let start = std::time::Instant::now();

        let mut file = fs::File::create(&path)
            .await
            .map_err(|e| self.write_error(storage_key, &path, e))?;

        file.write_all(&data)
            .await
            .map_err(|e| self.write_error(storage_key, &path, e))?;

        file.sync_all()
            .await
            .map_err(|e| self.write_error(storage_key, &path, e))?;

        tracing::info!(
            path = %path.display(),
            key = %storage_key,
            content_type = %content_type,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage put successful"
        );

        Ok(())
    }

    async fn get(&self, storage_key: &str) -> StorageResult<Bytes> {
        let path = self.key_to_path(storage_key)?;

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Err(StorageError::NotFound(storage_key.to_string()));
        }

        let data = fs::read(&path).await.map_err(|e| {
            StorageError::DownloadFailed(format!("Failed to read file {}: {}", path.display(), e))
        })?;

        Ok(Bytes::from(data))
    }

    async fn exists(&self, storage_key: &str) -> StorageResult<bool> {
        let path = self.key_to_path(storage_key)?;
        Ok(fs::try_exists(&path).await.unwrap_or(false))
    }

    async fn signed_get_url(
        &self,
        storage_key: &str,
        expires_in: Duration,
    ) -> StorageResult<String> {
        self.key_to_path(storage_key)?;

        let expires = Utc::now().timestamp() + expires_in.as_secs() as i64;
        let signature = self.signature(storage_key, expires)?;

        Ok(format!(
            "{}/{}?expires={}&signature={}",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(storage_key),
            expires,
            signature
        ))
    }

    fn bucket(&self) -> &str {
        &self.bucket
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn storage(dir: &TempDir) -> LocalStorage {
        LocalStorage::new(
            dir.path().join("thumbs"),
            "http://localhost:9000/media/".to_string(),
            "test-secret".to_string(),
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_put_and_get() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(&dir).await;

        storage
            .put("req1.jpg", Bytes::from_static(b"jpeg bytes"), "image/jpeg")
            .await
            .unwrap();

        assert!(storage.exists("req1.jpg").await.unwrap());
        assert!(!storage.exists("req2.jpg").await.unwrap());
        assert_eq!(storage.get("req1.jpg").await.unwrap(), "jpeg bytes");
        assert_eq!(storage.bucket(), "thumbs");
        assert_eq!(storage.backend_type(), StorageBackend::Local);
    }

    #[tokio::test]
    async fn test_get_missing_object() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(&dir).await;

        assert!(matches!(
            storage.get("nope.jpg").await,
            Err(StorageError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_rejects_traversal_keys() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(&dir).await;

        for key in ["../escape.jpg", "/etc/passwd", "a/../../b", "./a.jpg", "a\\b.jpg", ""] {
            assert!(matches!(
                storage.put(key, Bytes::new(), "image/jpeg").await,
                Err(StorageError::InvalidKey(_))
            ));
        }
    }

    #[tokio::test]
    async fn test_dots_inside_key_are_allowed() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(&dir).await;

        for key in ["v2..final.jpg", "a..b_url.txt", "...jpg"] {
            storage
                .put(key, Bytes::from_static(b"x"), "image/jpeg")
                .await
                .unwrap();
            assert_eq!(storage.get(key).await.unwrap(), "x");
        }
    }

    #[tokio::test]
    async fn test_unreadable_base_dir_is_not_missing_bucket() {
        let dir = tempfile::tempdir().unwrap();
        let parent = dir.path().join("parent");
        let storage = LocalStorage::new(
            parent.join("thumbs"),
            "http://localhost:9000/media/".to_string(),
            "test-secret".to_string(),
        )
        .await
        .unwrap();

        // A file where a directory is expected makes the stat fail with ENOTDIR
        std::fs::remove_dir_all(&parent).unwrap();
        std::fs::write(&parent, b"not a directory").unwrap();

        assert!(matches!(
            storage
                .put("req1.jpg", Bytes::from_static(b"x"), "image/jpeg")
                .await,
            Err(StorageError::UploadFailed(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_base_dir_is_missing_bucket() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(&dir).await;
        std::fs::remove_dir_all(dir.path().join("thumbs")).unwrap();

        assert!(matches!(
            storage
                .put("req1.jpg", Bytes::from_static(b"x"), "image/jpeg")
                .await,
            Err(StorageError::BucketNotFound(bucket)) if bucket == "thumbs"
        ));
    }

    #[tokio::test]
    async fn test_signed_url_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(&dir).await;

        let url = storage
            .signed_get_url("req1.jpg", Duration::from_secs(60))
            .await
            .unwrap();
        assert!(url.starts_with("http://localhost:9000/media/req1.jpg?expires="));

        let query = url.split_once('?').unwrap().1;
        let mut expires = 0i64;
        let mut signature = String::new();
        for pair in query.split('&') {
            match pair.split_once('=').unwrap() {
                ("expires", v) => expires = v.parse().unwrap(),
                ("signature", v) => signature = v.to_string(),
                _ => {}
            }
        }

        let now = Utc::now().timestamp();
        assert!(expires > now && expires <= now + 60);
        assert!(storage.verify_signature("req1.jpg", expires, &signature));
        assert!(!storage.verify_signature("req2.jpg", expires, &signature));
        assert!(!storage.verify_signature("req1.jpg", expires + 1, &signature));
        assert!(!storage.verify_signature("req1.jpg", now - 1, &signature));
    }

    #[tokio::test]
    async fn test_signed_url_encodes_key() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(&dir).await;

        let url = storage
            .signed_get_url("red shoes.jpg", Duration::from_secs(60))
            .await
            .unwrap();
        assert!(url.contains("/red%20shoes.jpg?"));
    }
}
