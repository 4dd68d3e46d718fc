use image::{DynamicImage, RgbImage};

/// Brightness and saturation multipliers. `1.0` leaves a channel unchanged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Modulation {
    pub brightness: f32,
    pub saturation: f32,
}

impl Default for Modulation {
    fn default() -> Self {
        Self {
            brightness: 1.0,
            saturation: 1.0,
        }
    }
}

impl Modulation {
    pub fn new(brightness: f32, saturation: f32) -> Self {
        Self {
            brightness,
            saturation,
        }
    }

    pub fn is_identity(&self) -> bool {
        self.brightness == 1.0 && self.saturation == 1.0
    }

    /// Scale brightness, then push each channel away from (or towards) the pixel's luma.
    ///
    /// The result is RGB; alpha is dropped since the output is JPEG.
    pub fn apply(&self, img: DynamicImage) -> DynamicImage {
        if self.is_identity() {
            return img;
        }

        let mut rgb: RgbImage = img.to_rgb8();
        for pixel in rgb.pixels_mut() {
            let [r, g, b] = pixel.0.map(|c| c as f32 * self.brightness);
            let luma = 0.299 * r + 0.587 * g + 0.114 * b;
            pixel.0 = [r, g, b].map(|c| {
                (luma + (c - luma) * self.saturation)
                    .round()
                    .clamp(0.0, 255.0) as u8
            });
        }

        DynamicImage::ImageRgb8(rgb)
    }
}
