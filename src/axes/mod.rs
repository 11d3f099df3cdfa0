//! Map axes abstraction.
//!
//! [`MapAxes`] is everything the plotting operations need from a drawing
//! surface: the current view extent, view limits, and a way to append image
//! overlays, gridlines, ticks and colorbars. The surface is owned by the
//! caller and is only ever appended to. [`raster::GeoAxes`] is the in-memory
//! implementation.

pub mod raster;
mod text;

use image::RgbaImage;
use serde::{Deserialize, Serialize};

use crate::colormaps::Colormap;
use crate::error::Result;
use crate::geo::Extent;

pub use raster::GeoAxes;

/// Which image row is drawn at the top of its extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Row 0 at `ymax`
    Upper,
    /// Row 0 at `ymin`
    Lower,
}

/// Coordinate reference of overlay data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Crs {
    /// Plain longitude/latitude (equirectangular)
    PlateCarree,
}

/// Rectangle in normalized figure coordinates (0..1, origin bottom-left).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub bottom: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, bottom: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            bottom,
            width,
            height,
        }
    }

    pub fn is_wide(&self) -> bool {
        self.width > self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// Rotation of tick labels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Rotation {
    #[default]
    Horizontal,
    Vertical,
    Degrees(f64),
}

impl Rotation {
    pub fn degrees(&self) -> f64 {
        match *self {
            Rotation::Horizontal => 0.0,
            Rotation::Vertical => 90.0,
            Rotation::Degrees(d) => d,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// A labelled tick position in data coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    pub value: f64,
    pub label: String,
}

/// Appearance of gridlines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridlineStyle {
    pub color: [u8; 4],
    /// Line width in pixels
    pub width: u32,
    pub dashed: bool,
}

impl Default for GridlineStyle {
    fn default() -> Self {
        Self {
            color: [128, 128, 128, 160],
            width: 1,
            dashed: false,
        }
    }
}

/// How data values map onto `[0, 1]` before color lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum Normalization {
    /// Linear between `vmin` and `vmax`
    Linear { vmin: f64, vmax: f64 },
    /// One bin per color between consecutive boundaries
    Boundary { boundaries: Vec<f64> },
}

impl Normalization {
    /// Position of `value` on the colormap.
    pub fn normalize(&self, value: f64) -> f32 {
        match self {
            Normalization::Linear { vmin, vmax } => {
                if vmax > vmin {
                    ((value - vmin) / (vmax - vmin)).clamp(0.0, 1.0) as f32
                } else {
                    0.0
                }
            }
            Normalization::Boundary { boundaries } => {
                let bins = boundaries.len().saturating_sub(1);
                if bins == 0 {
                    return 0.0;
                }
                let bin = boundaries[1..]
                    .iter()
                    .position(|&edge| value < edge)
                    .unwrap_or(bins - 1);
                ((bin as f64 + 0.5) / bins as f64) as f32
            }
        }
    }

    pub fn range(&self) -> (f64, f64) {
        match self {
            Normalization::Linear { vmin, vmax } => (*vmin, *vmax),
            Normalization::Boundary { boundaries } => (
                boundaries.first().copied().unwrap_or(0.0),
                boundaries.last().copied().unwrap_or(1.0),
            ),
        }
    }
}

/// Everything needed to draw a colorbar.
pub struct ColorbarSpec {
    pub colormap: Box<dyn Colormap>,
    pub norm: Normalization,
    pub alpha: f64,
    pub orientation: Orientation,
    pub label: Option<String>,
}

impl std::fmt::Debug for ColorbarSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ColorbarSpec")
            .field("colormap", &self.colormap.name())
            .field("norm", &self.norm)
            .field("alpha", &self.alpha)
            .field("orientation", &self.orientation)
            .field("label", &self.label)
            .finish()
    }
}

/// Drawing surface for map layers.
pub trait MapAxes {
    /// Current view extent.
    fn extent(&self) -> Extent;

    fn set_xlim(&mut self, xmin: f64, xmax: f64);

    fn set_ylim(&mut self, ymin: f64, ymax: f64);

    /// Draw an RGBA raster covering `extent`.
    fn imshow(
        &mut self,
        image: RgbaImage,
        extent: Extent,
        origin: Origin,
        transform: Crs,
    ) -> Result<()>;

    /// Draw meridians at `xs` and parallels at `ys`.
    fn gridlines(&mut self, xs: &[f64], ys: &[f64], style: &GridlineStyle) -> Result<()>;

    /// Replace the ticks of one axis.
    fn set_ticks(&mut self, axis: Axis, ticks: Vec<Tick>, rotation: Rotation) -> Result<()>;

    /// Draw a colorbar into `rect`.
    fn colorbar(&mut self, rect: Rect, spec: ColorbarSpec) -> Result<()>;

    /// Move the left and/or right edge of the map area (normalized figure coordinates).
    fn adjust_map_area(&mut self, left: Option<f64>, right: Option<f64>);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_normalization() {
        let norm = Normalization::Linear {
            vmin: 0.0,
            vmax: 10.0,
        };
        assert_eq!(norm.normalize(5.0), 0.5);
        assert_eq!(norm.normalize(-5.0), 0.0);
        assert_eq!(norm.normalize(20.0), 1.0);
    }

    #[test]
    fn test_boundary_normalization() {
        let norm = Normalization::Boundary {
            boundaries: vec![0.0, 1.0, 2.0, 3.0, 4.0],
        };
        assert_eq!(norm.normalize(0.5), 0.125);
        assert_eq!(norm.normalize(1.0), 0.375);
        assert_eq!(norm.normalize(3.9), 0.875);
        assert_eq!(norm.normalize(4.0), 0.875);
        assert_eq!(norm.normalize(-1.0), 0.125);
        assert_eq!(norm.range(), (0.0, 4.0));
    }

    #[test]
    fn test_rotation_degrees() {
        assert_eq!(Rotation::Horizontal.degrees(), 0.0);
        assert_eq!(Rotation::Vertical.degrees(), 90.0);
        assert_eq!(Rotation::Degrees(45.0).degrees(), 45.0);
        assert_eq!(Rotation::default(), Rotation::Horizontal);
    }
}
