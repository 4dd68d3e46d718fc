use image::codecs::jpeg::JpegEncoder;
use image::{ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use std::io::Cursor;

/// RGBA PNG with a horizontal gradient
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbaImage::from_fn(width, height, |x, _| {
        Rgba([(x * 255 / width.max(1)) as u8, 80, 160, 255])
    });
    let mut buffer = Vec::new();
    img.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
        .expect("encode png");
    buffer
}

pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_pixel(width, height, Rgb([200, 40, 40]));
    let mut buffer = Vec::new();
    JpegEncoder::new_with_quality(&mut buffer, 90)
        .encode_image(&img)
        .expect("encode jpeg");
    buffer
}

/// Minimal lossy WEBP container header
pub fn webp_bytes() -> Vec<u8> {
    let mut data = b"RIFF\x24\x00\x00\x00WEBPVP8 \x18\x00\x00\x00".to_vec();
    data.extend_from_slice(&[0u8; 24]);
    data
}

pub fn gif_bytes() -> Vec<u8> {
    b"GIF89a\x01\x00\x01\x00\x80\x00\x00\xff\xff\xff\x00\x00\x00!\xf9\x04\x01\x00\x00\x00\x00,\x00\x00\x00\x00\x01\x00\x01\x00\x00\x02\x02D\x01\x00;".to_vec()
}

/// Queue message body in the upstream format, with `imageUrl` JSON-encoded inside a string
pub fn message_body(image_urls: &[&str], user_search: &str, image_size: &str) -> String {
    let images: Vec<_> = image_urls
        .iter()
        .map(|url| serde_json::json!({ "image": url }))
        .collect();

    serde_json::json!({
        "imageUrl": serde_json::Value::Array(images).to_string(),
        "userSearch": user_search,
        "imageSize": image_size,
    })
    .to_string()
}
