//! imgpipe storage library
//!
//! The [`Storage`] trait with S3 and local filesystem backends, and the [`Publisher`] that
//! writes a transformed image plus its signed link.
//!
//! # Key layout
//!
//! Every output identifier produces two flat keys: `<id>.jpg` for the image and
//! `<id>_url.txt` for the link. See the `keys` module.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
pub mod publisher;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use imgpipe_core::StorageBackend;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
pub use publisher::Publisher;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{Storage, StorageError, StorageResult};
