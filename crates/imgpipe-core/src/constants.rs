use std::time::Duration;

/// JPEG quality used for every transformed image (0-100)
pub const JPEG_QUALITY: u8 = 90;

/// Lifetime of the signed link written next to each artifact
pub const SIGNED_URL_TTL: Duration = Duration::from_secs(60);

/// Unsharp mask strength applied after resizing
pub const SHARPEN_SIGMA: f32 = 0.5;
pub const SHARPEN_THRESHOLD: i32 = 0;

/// Content type of the stored artifact, regardless of source format
pub const ARTIFACT_CONTENT_TYPE: &str = "image/jpeg";

/// Content type of the sidecar link object
pub const LINK_CONTENT_TYPE: &str = "text/plain";

/// Suffix appended to the output identifier for the artifact key
pub const ARTIFACT_KEY_SUFFIX: &str = ".jpg";

/// Suffix appended to the output identifier for the link key
pub const LINK_KEY_SUFFIX: &str = "_url.txt";

/// Separator between width and height in the size string
pub const SIZE_SEPARATOR: char = 'x';

/// Upper bound on decoded source area (100 megapixels)
pub const MAX_SOURCE_PIXELS: u64 = 100_000_000;

pub const DEFAULT_MAX_DOWNLOAD_MB: u64 = 25;
pub const DEFAULT_MAX_OUTPUT_DIMENSION: u32 = 10_000;
