//! Image processing module
//!
//! - EXIF orientation normalization (orientation)
//! - Brightness and saturation adjustment (modulate)
//! - ICC and EXIF carry-over into the re-encoded JPEG (metadata)
//! - The fixed transform pipeline (transformer)

pub mod metadata;
pub mod modulate;
pub mod orientation;
pub mod transformer;

pub use metadata::SourceMetadata;
pub use modulate::Modulation;
pub use orientation::Orientation;
pub use transformer::{ImageTransformer, TransformOptions};
