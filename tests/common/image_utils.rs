//! Image fixtures for testing.
//!
//! Builds encoded thumbnails the way the imagery service would return them.

#![allow(dead_code)]

use image::{DynamicImage, GrayAlphaImage, ImageFormat, LumaA, Rgba, RgbaImage};
use std::io::Cursor;

/// Encode an image as PNG bytes
pub fn encode_png(image: &DynamicImage) -> Vec<u8> {
    let mut buffer = Cursor::new(Vec::new());
    image
        .write_to(&mut buffer, ImageFormat::Png)
        .expect("PNG encoding failed");
    buffer.into_inner()
}

/// Single-color RGBA thumbnail
pub fn solid_rgba_png(width: u32, height: u32, color: [u8; 4]) -> Vec<u8> {
    encode_png(&DynamicImage::ImageRgba8(RgbaImage::from_pixel(
        width,
        height,
        Rgba(color),
    )))
}

/// Gray + alpha thumbnail where pixel `(x, y)` has gray `x * 10` and alpha `y * 100`
pub fn gray_alpha_png(width: u32, height: u32) -> Vec<u8> {
    let image = GrayAlphaImage::from_fn(width, height, |x, y| {
        LumaA([(x * 10) as u8, (y * 100) as u8])
    });
    encode_png(&DynamicImage::ImageLumaA8(image))
}

/// Detect image format from bytes
pub fn detect_image_format(bytes: &[u8]) -> Option<ImageFormat> {
    image::guess_format(bytes).ok()
}

/// Check if an image has the expected dimensions
pub fn assert_image_dimensions(
    image: &RgbaImage,
    expected_width: u32,
    expected_height: u32,
) -> Result<(), String> {
    let (actual_width, actual_height) = image.dimensions();

    if actual_width != expected_width || actual_height != expected_height {
        return Err(format!(
            "Image dimensions differ: actual = {}x{}, expected = {}x{}",
            actual_width, actual_height, expected_width, expected_height
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixtures_are_png() {
        assert_eq!(
            detect_image_format(&solid_rgba_png(2, 2, [0, 0, 0, 255])),
            Some(ImageFormat::Png)
        );
        assert_eq!(
            detect_image_format(&gray_alpha_png(2, 2)),
            Some(ImageFormat::Png)
        );
    }
}
