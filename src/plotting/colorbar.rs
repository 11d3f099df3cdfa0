//! Colorbars for imagery layers.
//!
//! A colorbar is derived from the same visualization parameters used for the
//! layer, so the legend matches what the imagery service rendered.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info, warn};

use crate::axes::{ColorbarSpec, MapAxes, Normalization, Orientation, Rect};
use crate::colormaps::{get_colormap, Colormap, LookupColormap, DEFAULT_LUT_SIZE};
use crate::error::{CartoeeError, Result};
use crate::geo::linspace;
use crate::vis_params::VisParams;

/// Colormap used when neither a palette nor a name is supplied
const DEFAULT_CMAP: &str = "gray";

/// Preset colorbar positions around the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Location {
    Left,
    Right,
    Bottom,
    Top,
}

impl Location {
    /// Colorbar rectangle in normalized figure coordinates.
    pub fn rect(&self) -> Rect {
        match self {
            Location::Left => Rect::new(0.01, 0.25, 0.02, 0.5),
            Location::Right => Rect::new(0.88, 0.25, 0.02, 0.5),
            Location::Bottom => Rect::new(0.25, 0.15, 0.5, 0.02),
            Location::Top => Rect::new(0.25, 0.88, 0.5, 0.02),
        }
    }

    /// New `(left, right)` map area edges that make room for the colorbar.
    pub fn map_adjustment(&self) -> (Option<f64>, Option<f64>) {
        match self {
            Location::Left => (Some(0.18), None),
            Location::Right => (None, Some(0.85)),
            Location::Bottom | Location::Top => (None, None),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Location::Left => "left",
            Location::Right => "right",
            Location::Bottom => "bottom",
            Location::Top => "top",
        };
        f.write_str(name)
    }
}

impl FromStr for Location {
    type Err = CartoeeError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "left" => Ok(Location::Left),
            "right" => Ok(Location::Right),
            "bottom" => Ok(Location::Bottom),
            "top" => Ok(Location::Top),
            _ => Err(CartoeeError::invalid(
                "loc",
                format!(
                    "unknown colorbar location '{}', expected left, right, bottom or top",
                    s
                ),
            )),
        }
    }
}

/// Where and how to draw a colorbar.
#[derive(Debug, Clone)]
pub struct ColorbarOptions {
    /// Preset position; takes priority over `cax`
    pub loc: Option<Location>,
    /// Explicit position in normalized figure coordinates
    pub cax: Option<Rect>,
    /// Named colormap used when the parameters carry no palette
    pub cmap: Option<String>,
    /// One flat block per palette color instead of a smooth ramp
    pub discrete: bool,
    /// Label used when the parameters name no bands
    pub label: Option<String>,
    /// Opacity used when the parameters carry none
    pub alpha: Option<f64>,
    /// Defaults to the long side of the rectangle
    pub orientation: Option<Orientation>,
}

impl Default for ColorbarOptions {
    fn default() -> Self {
        Self {
            loc: None,
            cax: None,
            cmap: Some(DEFAULT_CMAP.to_string()),
            discrete: false,
            label: None,
            alpha: None,
            orientation: None,
        }
    }
}

/// Summary of a drawn colorbar.
#[derive(Debug, Clone, PartialEq)]
pub struct Colorbar {
    pub rect: Rect,
    pub orientation: Orientation,
    pub norm: Normalization,
    pub alpha: f64,
    pub label: Option<String>,
    /// Name of the colormap, `palette` when built from the parameters
    pub colormap: String,
    pub ncolors: usize,
    pub discrete: bool,
    /// Non-fatal problems found while building the colorbar
    pub warnings: Vec<String>,
}

/// Draw a colorbar for `vis_params` on `ax`.
///
/// A `palette` in the parameters wins over `options.cmap`. Nothing is drawn
/// and the map area is left alone if any argument is rejected.
pub fn add_colorbar<A>(
    ax: &mut A,
    vis_params: &VisParams,
    options: &ColorbarOptions,
) -> Result<Colorbar>
where
    A: MapAxes + ?Sized,
{
    let rect = match (options.loc, options.cax) {
        (Some(loc), cax) => {
            if cax.is_some() {
                debug!(loc = %loc, "Both loc and cax given, using loc");
            }
            loc.rect()
        }
        (None, Some(cax)) => cax,
        (None, None) => {
            return Err(CartoeeError::conflict(
                "either loc or cax must be provided to place the colorbar",
            ))
        }
    };

    let vmin = vis_params.min()?.unwrap_or(0.0);
    let vmax = vis_params.max()?.unwrap_or(1.0);
    let alpha = match vis_params.opacity()? {
        Some(opacity) => opacity,
        None => options.alpha.unwrap_or(1.0),
    };

    let mut warnings = Vec::new();
    let (colormap, norm, discrete): (Box<dyn Colormap>, Normalization, bool) =
        match vis_params.palette()? {
            Some(palette) if options.discrete => {
                let colormap = LookupColormap::listed("palette", &palette)?;
                let boundaries = linspace(vmin, vmax, colormap.len() + 1);
                (
                    Box::new(colormap) as Box<dyn Colormap>,
                    Normalization::Boundary { boundaries },
                    true,
                )
            }
            Some(palette) => (
                Box::new(LookupColormap::from_list(
                    "palette",
                    &palette,
                    DEFAULT_LUT_SIZE,
                )?) as Box<dyn Colormap>,
                Normalization::Linear { vmin, vmax },
                false,
            ),
            None => {
                let name = options.cmap.as_deref().ok_or_else(|| {
                    CartoeeError::conflict(
                        "a colorbar needs a palette in vis_params or a cmap",
                    )
                })?;
                if options.discrete {
                    let message = format!(
                        "discrete colorbars need a palette in vis_params; drawing '{}' as a continuous colorbar",
                        name
                    );
                    warn!(cmap = name, "{}", message);
                    warnings.push(message);
                }
                (
                    get_colormap(name)?,
                    Normalization::Linear { vmin, vmax },
                    false,
                )
            }
        };

    let label = vis_params.bands().or_else(|| options.label.clone());
    let orientation = options.orientation.unwrap_or(if rect.is_wide() {
        Orientation::Horizontal
    } else {
        Orientation::Vertical
    });

    let summary = Colorbar {
        rect,
        orientation,
        norm: norm.clone(),
        alpha,
        label: label.clone(),
        colormap: colormap.name().to_string(),
        ncolors: colormap.len(),
        discrete,
        warnings,
    };

    if let Some(loc) = options.loc {
        let (left, right) = loc.map_adjustment();
        ax.adjust_map_area(left, right);
    }
    ax.colorbar(
        rect,
        ColorbarSpec {
            colormap,
            norm,
            alpha,
            orientation,
            label,
        },
    )?;

    info!(
        colormap = %summary.colormap,
        ncolors = summary.ncolors,
        discrete = summary.discrete,
        vmin = vmin,
        vmax = vmax,
        "Colorbar added"
    );
    Ok(summary)
}
