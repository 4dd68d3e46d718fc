use imgpipe_storage::{LocalStorage, Storage};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

pub const TEST_BASE_URL: &str = "http://localhost:9000/media";
pub const TEST_SECRET: &str = "integration-secret";

/// Local storage rooted in a temporary directory that lives as long as this value
pub struct TestStorage {
    _dir: TempDir,
    root: PathBuf,
    storage: Arc<LocalStorage>,
}

impl TestStorage {
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().expect("temp dir");
        let root = dir.path().join("thumbnails");
        let storage = LocalStorage::new(&root, TEST_BASE_URL.to_string(), TEST_SECRET.to_string())
            .await
            .expect("local storage");

        Self {
            _dir: dir,
            root,
            storage: Arc::new(storage),
        }
    }

    pub fn storage(&self) -> Arc<dyn Storage> {
        self.storage.clone()
    }

    pub fn local(&self) -> &LocalStorage {
        &self.storage
    }

    pub fn root(&self) -> &PathBuf {
        &self.root
    }

    /// Sorted names of every stored object
    pub fn keys(&self) -> Vec<String> {
        let Ok(entries) = std::fs::read_dir(&self.root) else {
            return Vec::new();
        };
        let mut keys: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name().to_string_lossy().to_string())
            .collect();
        keys.sort();
        keys
    }

    pub fn read(&self, key: &str) -> Vec<u8> {
        std::fs::read(self.root.join(key)).expect("stored object")
    }
}
