//! Label rasterization for tick and colorbar text.

use image::{imageops, Rgba, RgbaImage};
use imageproc::drawing::draw_text_mut;
use imageproc::geometric_transformations::{rotate_about_center, Interpolation};
use once_cell::sync::Lazy;
use rusttype::{point, Font, Scale};
use tracing::warn;

/// Embedded font data - DejaVu Sans
const FONT_DATA: &[u8] = include_bytes!("../../assets/DejaVuSans.ttf");

/// Label height in pixels
const FONT_SIZE: f32 = 11.0;

static FONT: Lazy<Option<Font<'static>>> = Lazy::new(|| {
    let font = Font::try_from_bytes(FONT_DATA);
    if font.is_none() {
        warn!("Failed to load font for label rendering");
    }
    font
});

/// Rasterize `text` onto a transparent image trimmed to the inked pixels,
/// rotated counterclockwise by `degrees`.
///
/// Returns `None` for blank text or when the font cannot be loaded.
pub(crate) fn render_label(text: &str, color: [u8; 4], degrees: f64) -> Option<RgbaImage> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    let font = FONT.as_ref()?;
    let scale = Scale::uniform(FONT_SIZE);
    let (width, height) = text_extent(font, scale, text);
    if width <= 0 || height <= 0 {
        return None;
    }

    // Square with room for any rotation of the text box
    let side = ((width * width + height * height) as f64).sqrt().ceil() as u32 + 2;
    let clear = Rgba([color[0], color[1], color[2], 0]);
    let mut buffer = RgbaImage::from_pixel(side, side, clear);
    let x = (side as i32 - width) / 2;
    let y = (side as i32 - height) / 2;
    draw_text_mut(&mut buffer, Rgba(color), x, y, scale, font, text);

    let rotated = if degrees.rem_euclid(360.0) == 0.0 {
        buffer
    } else {
        // Image rows grow downwards, so a positive angle here turns clockwise
        let theta = -(degrees.to_radians() as f32);
        rotate_about_center(&buffer, theta, Interpolation::Bilinear, clear)
    };
    trim(&rotated)
}

/// Width and height in pixels of `text` laid out on one line.
fn text_extent(font: &Font<'_>, scale: Scale, text: &str) -> (i32, i32) {
    let metrics = font.v_metrics(scale);
    let width = font
        .layout(text, scale, point(0.0, metrics.ascent))
        .filter_map(|glyph| glyph.pixel_bounding_box())
        .map(|bb| bb.max.x)
        .max()
        .unwrap_or(0);
    let height = (metrics.ascent - metrics.descent).ceil() as i32;
    (width, height)
}

/// Crop to the bounding box of pixels with any coverage.
fn trim(image: &RgbaImage) -> Option<RgbaImage> {
    let mut bounds: Option<(u32, u32, u32, u32)> = None;
    for (x, y, pixel) in image.enumerate_pixels() {
        if pixel.0[3] == 0 {
            continue;
        }
        bounds = Some(match bounds {
            None => (x, y, x, y),
            Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
        });
    }
    let (x0, y0, x1, y1) = bounds?;
    Some(imageops::crop_imm(image, x0, y0, x1 - x0 + 1, y1 - y0 + 1).to_image())
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLACK: [u8; 4] = [0, 0, 0, 255];

    #[test]
    fn test_blank_label_renders_nothing() {
        assert!(render_label("", BLACK, 0.0).is_none());
        assert!(render_label("   ", BLACK, 0.0).is_none());
    }

    #[test]
    fn test_horizontal_label_is_wide() {
        let label = render_label("10°E", BLACK, 0.0).unwrap();
        assert!(label.width() > label.height(), "{:?}", label.dimensions());
        assert!(label.pixels().any(|p| p.0[3] > 128));
    }

    #[test]
    fn test_rotation_turns_label_upright() {
        let flat = render_label("120°W", BLACK, 0.0).unwrap();
        let upright = render_label("120°W", BLACK, 90.0).unwrap();
        assert!(upright.height() > upright.width(), "{:?}", upright.dimensions());
        assert!(upright.height() + 2 >= flat.width());
    }

    #[test]
    fn test_label_keeps_color() {
        let label = render_label("N", [200, 10, 10, 255], 0.0).unwrap();
        for pixel in label.pixels().filter(|p| p.0[3] > 128) {
            assert!((pixel.0[0] as i32 - 200).abs() <= 2, "{:?}", pixel);
            assert!((pixel.0[1] as i32 - 10).abs() <= 2, "{:?}", pixel);
        }
    }
}
