#![allow(dead_code)]

pub mod fixtures;
pub mod storage;

use imgpipe_processing::{HttpFetcher, ImageTransformer};
use imgpipe_storage::Publisher;
use imgpipe_worker::Dispatcher;
use std::sync::Arc;
use storage::TestStorage;

pub const MAX_DOWNLOAD_BYTES: u64 = 25 * 1024 * 1024;

/// Dispatcher wired to a real HTTP fetcher and a temp-dir storage backend
pub fn test_dispatcher(storage: &TestStorage) -> Dispatcher {
    let client = HttpFetcher::build_client(None).expect("http client");
    Dispatcher::new(
        Arc::new(HttpFetcher::new(client, MAX_DOWNLOAD_BYTES)),
        ImageTransformer::default(),
        Publisher::new(storage.storage()),
    )
}
