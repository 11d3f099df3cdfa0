//! Resampling of overlay rasters.
//!
//! When an overlay is drawn, every output pixel is mapped back to a
//! fractional position in the source image and sampled with one of these
//! methods.

pub mod bilinear;
pub mod common;
pub mod nearest;

use image::RgbaImage;

use crate::error::Result;

/// Trait for interpolation methods
pub trait Interpolator: Send + Sync {
    /// Sample `image` at continuous pixel coordinates; pixel `(i, j)` covers
    /// `[i, i + 1) x [j, j + 1)`.
    fn sample(&self, image: &RgbaImage, x: f64, y: f64) -> [u8; 4];

    /// Get the name of this interpolation method
    fn name(&self) -> &str;
}

/// Get an interpolator by name
pub fn get_interpolator(name: &str) -> Result<Box<dyn Interpolator>> {
    match name.to_lowercase().as_str() {
        "nearest" => Ok(Box::new(nearest::NearestInterpolator)),
        "bilinear" => Ok(Box::new(bilinear::BilinearInterpolator)),
        _ => Err(crate::error::CartoeeError::InvalidParameter {
            param: "interpolation".to_string(),
            message: format!("Unknown interpolation method: {}", name),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_interpolator() {
        assert_eq!(get_interpolator("nearest").unwrap().name(), "nearest");
        assert_eq!(get_interpolator("Bilinear").unwrap().name(), "bilinear");
        assert!(get_interpolator("bicubic").is_err());
    }
}
