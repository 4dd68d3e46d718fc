//! Image transformer
//!
//! Every image goes through the same fixed sequence:
//! 1. rotate/flip upright according to the EXIF orientation tag
//! 2. resize to exactly the requested dimensions (stretching, Lanczos3)
//! 3. unsharp mask
//! 4. brightness/saturation modulation
//! 5. JPEG encode, then re-attach the source ICC profile and EXIF block

use super::metadata::SourceMetadata;
use super::modulate::Modulation;
use super::orientation::Orientation;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::ImageReader;
use imgpipe_core::constants::{JPEG_QUALITY, MAX_SOURCE_PIXELS, SHARPEN_SIGMA, SHARPEN_THRESHOLD};
use imgpipe_core::{Config, Dimensions, TransformError};
use std::io::Cursor;

/// Tunables for [`ImageTransformer`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformOptions {
    pub max_output_dimension: u32,
    pub modulation: Modulation,
    pub jpeg_quality: u8,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            max_output_dimension: imgpipe_core::constants::DEFAULT_MAX_OUTPUT_DIMENSION,
            modulation: Modulation::default(),
            jpeg_quality: JPEG_QUALITY,
        }
    }
}

impl TransformOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_output_dimension: config.max_output_dimension,
            modulation: Modulation::new(config.modulate_brightness, config.modulate_saturation),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ImageTransformer {
    options: TransformOptions,
}

impl ImageTransformer {
    pub fn new(options: TransformOptions) -> Self {
        Self { options }
    }

    /// Transform an encoded JPEG or PNG into a JPEG of exactly `dims`.
    ///
    /// CPU-bound; async callers should run it on a blocking thread.
    pub fn transform(&self, data: &[u8], dims: Dimensions) -> Result<Vec<u8>, TransformError> {
        let max = self.options.max_output_dimension;
        if dims.width == 0 || dims.height == 0 || dims.width > max || dims.height > max {
            return Err(TransformError::InvalidDimensions {
                width: dims.width,
                height: dims.height,
                max,
            });
        }

        let start = std::time::Instant::now();

        let (src_width, src_height) = Self::reader(data)?
            .into_dimensions()
            .map_err(|e| TransformError::Decode(e.to_string()))?;
        if src_width as u64 * src_height as u64 > MAX_SOURCE_PIXELS {
            return Err(TransformError::SourceTooLarge {
                width: src_width,
                height: src_height,
            });
        }

        let img = Self::reader(data)?
            .decode()
            .map_err(|e| TransformError::Decode(e.to_string()))?;

        let orientation = Orientation::read(data);
        let metadata = SourceMetadata::extract(data);

        let img = orientation.apply(img);
        let img = img.resize_exact(dims.width, dims.height, FilterType::Lanczos3);
        let img = img.unsharpen(SHARPEN_SIGMA, SHARPEN_THRESHOLD);
        let img = self.options.modulation.apply(img);

        let rgb = img.to_rgb8();
        let mut encoded = Vec::new();
        JpegEncoder::new_with_quality(&mut encoded, self.options.jpeg_quality)
            .encode_image(&rgb)
            .map_err(|e| TransformError::Encode(e.to_string()))?;

        let output = metadata.attach(encoded)?;

        tracing::debug!(
            source_width = src_width,
            source_height = src_height,
            target = %dims,
            orientation = orientation as u8,
            has_icc = metadata.icc_profile.is_some(),
            has_exif = metadata.exif.is_some(),
            input_bytes = data.len() as u64,
            output_bytes = output.len() as u64,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Image transformed"
        );

        Ok(output)
    }

    fn reader(data: &[u8]) -> Result<ImageReader<Cursor<&[u8]>>, TransformError> {
        ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .map_err(|e| TransformError::Decode(e.to_string()))
    }
}
