//! Error types module
//!
//! Each pipeline component has its own error enum. `PipelineError` unifies them for a single
//! message, and `ProcessingError` is what a batch reports when one of its messages fails.

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Expected input problems (bad payloads, unsupported formats)
    Warn,
    /// Unexpected failures (network, codec, storage)
    Error,
}

/// Failures retrieving the source image
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Invalid image URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Image URL {url} returned status code {status}")]
    Status { url: String, status: u16 },

    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Image too large: {size} bytes (max: {max} bytes)")]
    TooLarge { size: u64, max: u64 },
}

impl FetchError {
    /// HTTP status code, when the failure was a non-success response
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Failures classifying the fetched bytes
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error("Could not detect an image format from the file signature")]
    Undetected,

    #[error("Unsupported image format: {extension} ({mime_type}); expected jpeg or png")]
    Unsupported {
        extension: String,
        mime_type: String,
    },
}

/// Failures decoding, resizing or encoding
#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    #[error("Decode failed: {0}")]
    Decode(String),

    #[error("Invalid target dimensions {width}x{height} (max: {max} per side)")]
    InvalidDimensions { width: u32, height: u32, max: u32 },

    #[error("Source image {width}x{height} exceeds the maximum pixel count")]
    SourceTooLarge { width: u32, height: u32 },

    #[error("Encode failed: {0}")]
    Encode(String),

    #[error("Metadata preservation failed: {0}")]
    Metadata(String),
}

/// Failures writing the artifact or its link
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("Bucket {bucket} does not exist")]
    BucketNotFound { bucket: String },

    #[error("Access denied writing {key} to bucket {bucket}")]
    AccessDenied { bucket: String, key: String },

    #[error("Storage error writing {key} to bucket {bucket}: {message}")]
    Store {
        bucket: String,
        key: String,
        message: String,
    },
}

/// Failures decoding an inbound message
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Invalid message payload: {0}")]
    Payload(String),

    #[error("Invalid imageUrl list: {0}")]
    ImageList(String),

    #[error("imageUrl list is empty")]
    EmptyImageList,

    #[error("Invalid imageSize {value:?}: {reason}")]
    Size { value: String, reason: String },

    #[error("Queue record has no body")]
    MissingBody,
}

/// Any failure while processing a single message
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    Transform(#[from] TransformError),

    #[error(transparent)]
    Publish(#[from] PublishError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl PipelineError {
    /// Machine-readable error code (e.g., "FETCH_ERROR")
    pub fn error_code(&self) -> &'static str {
        match self {
            PipelineError::Parse(_) => "PARSE_ERROR",
            PipelineError::Fetch(_) => "FETCH_ERROR",
            PipelineError::Format(_) => "FORMAT_ERROR",
            PipelineError::Transform(_) => "TRANSFORM_ERROR",
            PipelineError::Publish(_) => "PUBLISH_ERROR",
            PipelineError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Log level for this error
    pub fn log_level(&self) -> LogLevel {
        match self {
            PipelineError::Parse(_) | PipelineError::Format(_) => LogLevel::Warn,
            _ => LogLevel::Error,
        }
    }
}

/// A batch failed: the message at `index` could not be processed and the rest were skipped.
#[derive(Debug, thiserror::Error)]
#[error("Failed to process message {index} (id: {message_id:?}): {source}")]
pub struct ProcessingError {
    pub index: usize,
    pub message_id: Option<String>,
    #[source]
    pub source: PipelineError,
}
