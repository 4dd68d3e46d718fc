//! imgpipe core library
//!
//! Configuration, the error taxonomy, and the message/dimension models shared by the
//! storage, processing and worker crates.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use config::Config;
pub use error::{
    FetchError, FormatError, LogLevel, ParseError, PipelineError, ProcessingError, PublishError,
    TransformError,
};
pub use models::{AccessLink, Dimensions, ImageReference, InboundMessage, PreparedJob};
pub use storage_types::StorageBackend;
