//! Format detection from file signatures
//!
//! The fetched bytes are classified by their magic bytes only. Whatever content type the
//! origin server reported is ignored.

use image::ImageFormat;
use imgpipe_core::FormatError;

/// Format detected from a buffer's leading bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectedFormat {
    pub extension: &'static str,
    pub mime_type: &'static str,
}

impl DetectedFormat {
    pub const JPEG: DetectedFormat = DetectedFormat {
        extension: "jpg",
        mime_type: "image/jpeg",
    };

    pub const PNG: DetectedFormat = DetectedFormat {
        extension: "png",
        mime_type: "image/png",
    };
}

/// Detect the image format of `data` and accept only JPEG and PNG.
pub fn detect_format(data: &[u8]) -> Result<DetectedFormat, FormatError> {
    let format = image::guess_format(data).map_err(|_| FormatError::Undetected)?;

    match format {
        ImageFormat::Jpeg => Ok(DetectedFormat::JPEG),
        ImageFormat::Png => Ok(DetectedFormat::PNG),
        other => {
            let extension = other
                .extensions_str()
                .first()
                .copied()
                .unwrap_or("unknown")
                .to_string();
            let mime_type = other.to_mime_type().to_string();

            tracing::warn!(
                extension = %extension,
                mime_type = %mime_type,
                "Rejecting unsupported image format"
            );

            Err(FormatError::Unsupported {
                extension,
                mime_type,
            })
        }
    }
}
