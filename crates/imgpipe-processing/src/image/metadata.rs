//! Colour profile and EXIF carry-over
//!
//! Decoding discards everything but pixels, so the source's ICC profile and EXIF block are
//! read up front and spliced into the encoded JPEG afterwards. The EXIF orientation tag is
//! rewritten to 1 because the pixels have already been rotated upright.

use bytes::Bytes;
use img_parts::jpeg::Jpeg;
use img_parts::{DynImage, ImageEXIF, ImageICC};
use imgpipe_core::TransformError;

const EXIF_PREFIX: &[u8] = b"Exif\0\0";
const ORIENTATION_TAG: u16 = 0x0112;
const TIFF_SHORT: u16 = 3;

/// Metadata segments taken from a source image
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceMetadata {
    pub icc_profile: Option<Bytes>,
    pub exif: Option<Bytes>,
}

impl SourceMetadata {
    /// Read the ICC profile and EXIF block from a JPEG or PNG. Anything unreadable is skipped.
    pub fn extract(data: &[u8]) -> Self {
        match DynImage::from_bytes(Bytes::copy_from_slice(data)) {
            Ok(Some(image)) => Self {
                icc_profile: image.icc_profile(),
                exif: image.exif(),
            },
            Ok(None) => Self::default(),
            Err(e) => {
                tracing::debug!(error = %e, "Could not read source metadata");
                Self::default()
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.icc_profile.is_none() && self.exif.is_none()
    }

    /// Attach the stored segments to an encoded JPEG.
    pub fn attach(&self, jpeg: Vec<u8>) -> Result<Vec<u8>, TransformError> {
        if self.is_empty() {
            return Ok(jpeg);
        }

        let mut output = Jpeg::from_bytes(Bytes::from(jpeg))
            .map_err(|e| TransformError::Metadata(e.to_string()))?;

        if let Some(icc) = &self.icc_profile {
            output.set_icc_profile(Some(icc.clone()));
        }
        if let Some(exif) = &self.exif {
            output.set_exif(Some(Bytes::from(reset_orientation(exif))));
        }

        Ok(output.encoder().bytes().to_vec())
    }
}

/// Copy a TIFF-structured EXIF block with the IFD0 orientation tag set to 1.
///
/// A block that cannot be walked is returned unchanged.
pub fn reset_orientation(exif: &[u8]) -> Vec<u8> {
    let mut tiff = exif.strip_prefix(EXIF_PREFIX).unwrap_or(exif).to_vec();
    if let Some(offset) = orientation_value_offset(&tiff) {
        let value = if tiff.starts_with(b"II") {
            1u16.to_le_bytes()
        } else {
            1u16.to_be_bytes()
        };
        tiff[offset..offset + 2].copy_from_slice(&value);
    }
    tiff
}

/// Byte offset of the orientation value inside IFD0, if present as a single SHORT.
fn orientation_value_offset(tiff: &[u8]) -> Option<usize> {
    let little_endian = match tiff.get(0..2)? {
        b"II" => true,
        b"MM" => false,
        _ => return None,
    };
    let u16_at = |pos: usize| -> Option<u16> {
        let raw: [u8; 2] = tiff.get(pos..pos + 2)?.try_into().ok()?;
        Some(if little_endian {
            u16::from_le_bytes(raw)
        } else {
            u16::from_be_bytes(raw)
        })
    };
    let u32_at = |pos: usize| -> Option<u32> {
        let raw: [u8; 4] = tiff.get(pos..pos + 4)?.try_into().ok()?;
        Some(if little_endian {
            u32::from_le_bytes(raw)
        } else {
            u32::from_be_bytes(raw)
        })
    };

    if u16_at(2)? != 42 {
        return None;
    }

    let ifd = u32_at(4)? as usize;
    let entries = u16_at(ifd)? as usize;
    (0..entries)
        .map(|i| ifd + 2 + i * 12)
        .find(|&entry| u16_at(entry) == Some(ORIENTATION_TAG))
        .filter(|&entry| u16_at(entry + 2) == Some(TIFF_SHORT) && u32_at(entry + 4) == Some(1))
        .map(|entry| entry + 8)
        .filter(|&value| value + 2 <= tiff.len())
}
