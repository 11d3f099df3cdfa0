//! Bilinear interpolation.
//!
//! This method performs linear interpolation in two dimensions using
//! the four nearest pixel centers.

use image::RgbaImage;

use super::common::{clamp_index, linear_weight};
use super::Interpolator;

/// Bilinear interpolator
pub struct BilinearInterpolator;

impl Interpolator for BilinearInterpolator {
    fn sample(&self, image: &RgbaImage, x: f64, y: f64) -> [u8; 4] {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return [0, 0, 0, 0];
        }

        // Shift so pixel centers sit on integer positions
        let fx = clamp_index(x - 0.5, width as usize);
        let fy = clamp_index(y - 0.5, height as usize);
        let x0 = fx.floor() as u32;
        let y0 = fy.floor() as u32;
        let x1 = (x0 + 1).min(width - 1);
        let y1 = (y0 + 1).min(height - 1);
        let (wx0, wx1) = linear_weight(fx - x0 as f64);
        let (wy0, wy1) = linear_weight(fy - y0 as f64);

        let p00 = image.get_pixel(x0, y0).0;
        let p10 = image.get_pixel(x1, y0).0;
        let p01 = image.get_pixel(x0, y1).0;
        let p11 = image.get_pixel(x1, y1).0;

        let mut out = [0u8; 4];
        for c in 0..4 {
            let top = p00[c] as f64 * wx0 + p10[c] as f64 * wx1;
            let bottom = p01[c] as f64 * wx0 + p11[c] as f64 * wx1;
            out[c] = (top * wy0 + bottom * wy1).round().clamp(0.0, 255.0) as u8;
        }
        out
    }

    fn name(&self) -> &str {
        "bilinear"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_bilinear_midpoint() {
        let mut image = RgbaImage::new(2, 1);
        image.put_pixel(0, 0, Rgba([0, 0, 0, 255]));
        image.put_pixel(1, 0, Rgba([200, 100, 50, 255]));

        let interpolator = BilinearInterpolator;
        // Halfway between the two pixel centers
        assert_eq!(interpolator.sample(&image, 1.0, 0.5), [100, 50, 25, 255]);
        // At a pixel center the value is exact
        assert_eq!(interpolator.sample(&image, 0.5, 0.5), [0, 0, 0, 255]);
        assert_eq!(interpolator.sample(&image, 1.5, 0.5), [200, 100, 50, 255]);
    }
}
