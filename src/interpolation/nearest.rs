//! Nearest neighbor interpolation.
//!
//! Picks the source pixel containing the sample point. Fastest, and keeps
//! hard class boundaries intact.

use image::RgbaImage;

use super::common::clamp_index;
use super::Interpolator;

/// Nearest neighbor interpolator
pub struct NearestInterpolator;

impl Interpolator for NearestInterpolator {
    fn sample(&self, image: &RgbaImage, x: f64, y: f64) -> [u8; 4] {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return [0, 0, 0, 0];
        }
        let col = clamp_index(x.floor(), width as usize) as u32;
        let row = clamp_index(y.floor(), height as usize) as u32;
        image.get_pixel(col, row).0
    }

    fn name(&self) -> &str {
        "nearest"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_nearest_picks_containing_pixel() {
        let mut image = RgbaImage::new(2, 1);
        image.put_pixel(0, 0, Rgba([10, 0, 0, 255]));
        image.put_pixel(1, 0, Rgba([200, 0, 0, 255]));

        let interpolator = NearestInterpolator;
        assert_eq!(interpolator.sample(&image, 0.2, 0.5)[0], 10);
        assert_eq!(interpolator.sample(&image, 0.99, 0.5)[0], 10);
        assert_eq!(interpolator.sample(&image, 1.0, 0.5)[0], 200);
        // Out of range positions clamp to the edge
        assert_eq!(interpolator.sample(&image, 5.0, 3.0)[0], 200);
        assert_eq!(interpolator.sample(&image, -1.0, -1.0)[0], 10);
    }
}
