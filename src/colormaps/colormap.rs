//! Colormap trait and utilities.
//!
//! Every colormap is a lookup table of RGBA entries. Named colormaps are
//! sampled from a continuous gradient into 256 entries; palettes from
//! visualization parameters become either a listed (one entry per color) or an
//! interpolated table.

use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::palette::normalize_hex;
use super::{diverging, sequential};
use crate::error::{CartoeeError, Result};

/// Number of entries in a sampled colormap
pub const DEFAULT_LUT_SIZE: usize = 256;

/// Trait for color mapping implementations
pub trait Colormap: Send + Sync {
    /// Map a normalized value (0.0 to 1.0) to an RGBA color
    fn map_normalized(&self, value: f32) -> [u8; 4];

    /// Number of distinct colors
    fn len(&self) -> usize;

    /// Get the name of this colormap
    fn name(&self) -> &str;
}

/// Continuous source for a named colormap.
pub struct NamedGradient {
    gradient: colorgrad::Gradient,
    reversed: bool,
}

impl NamedGradient {
    /// Color at `t` in `[0, 1]`.
    pub fn at(&self, t: f64) -> [u8; 4] {
        let t = t.clamp(0.0, 1.0);
        let t = if self.reversed { 1.0 - t } else { t };
        self.gradient.at(t).to_rgba8()
    }
}

/// Resolve a colormap name to its gradient. A `_r` suffix reverses it.
pub fn named_gradient(name: &str) -> Result<NamedGradient> {
    let lower = name.to_lowercase();
    let (base, reversed) = match lower.strip_suffix("_r") {
        Some(base) => (base, true),
        None => (lower.as_str(), false),
    };

    let gradient = match sequential::gradient(base) {
        Some(g) => g?,
        None => match diverging::gradient(base) {
            Some(g) => g?,
            None => {
                let known: Vec<&str> = sequential::NAMES
                    .iter()
                    .chain(diverging::NAMES)
                    .copied()
                    .collect();
                return Err(CartoeeError::invalid(
                    "cmap",
                    format!(
                        "Unknown colormap: {}, expected one of {} (append _r to reverse)",
                        name,
                        known.join(", ")
                    ),
                ));
            }
        },
    };

    Ok(NamedGradient { gradient, reversed })
}

/// Build a gradient through the given colors, evenly spaced.
pub(crate) fn gradient_from_rgb(colors: &[[u8; 3]]) -> Result<colorgrad::Gradient> {
    let colors: Vec<colorgrad::Color> = colors
        .iter()
        .map(|c| colorgrad::Color::from_rgba8(c[0], c[1], c[2], 255))
        .collect();
    colorgrad::CustomGradient::new()
        .colors(&colors)
        .build()
        .map_err(|e| CartoeeError::invalid("cmap", format!("Invalid gradient: {}", e)))
}

static LUT_CACHE: Lazy<RwLock<HashMap<String, Arc<Vec<[u8; 4]>>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// Colormap backed by a lookup table.
#[derive(Debug, Clone)]
pub struct LookupColormap {
    name: String,
    lut: Arc<Vec<[u8; 4]>>,
}

impl LookupColormap {
    /// Sample a named colormap into `n` entries.
    pub fn sampled(name: &str, n: usize) -> Result<Self> {
        let gradient = named_gradient(name)?;
        let lut = (0..n)
            .map(|i| {
                let t = if n > 1 {
                    i as f64 / (n - 1) as f64
                } else {
                    0.0
                };
                gradient.at(t)
            })
            .collect();
        Ok(Self {
            name: name.to_string(),
            lut: Arc::new(lut),
        })
    }

    /// One entry per color, no interpolation.
    pub fn listed(name: &str, colors: &[String]) -> Result<Self> {
        if colors.is_empty() {
            return Err(CartoeeError::invalid("palette", "palette has no colors"));
        }
        let lut = colors
            .iter()
            .map(|c| parse_color(c))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            name: name.to_string(),
            lut: Arc::new(lut),
        })
    }

    /// `n` entries linearly interpolated through `colors`.
    pub fn from_list(name: &str, colors: &[String], n: usize) -> Result<Self> {
        if colors.is_empty() {
            return Err(CartoeeError::invalid("palette", "palette has no colors"));
        }
        let normalized: Vec<String> = colors.iter().map(|c| normalize_hex(c)).collect();
        let mut stops: Vec<&str> = normalized.iter().map(String::as_str).collect();
        if stops.len() == 1 {
            stops.push(stops[0]);
        }
        let gradient = colorgrad::CustomGradient::new()
            .html_colors(&stops)
            .build()
            .map_err(|e| CartoeeError::invalid("palette", format!("Invalid palette: {}", e)))?;

        let lut = (0..n)
            .map(|i| {
                let t = if n > 1 {
                    i as f64 / (n - 1) as f64
                } else {
                    0.0
                };
                gradient.at(t).to_rgba8()
            })
            .collect();
        Ok(Self {
            name: name.to_string(),
            lut: Arc::new(lut),
        })
    }
}

impl Colormap for LookupColormap {
    fn map_normalized(&self, value: f32) -> [u8; 4] {
        let n = self.lut.len();
        if n == 0 {
            return [0, 0, 0, 0];
        }
        if !value.is_finite() {
            return [0, 0, 0, 0];
        }
        let index = ((value.clamp(0.0, 1.0) * n as f32) as usize).min(n - 1);
        self.lut[index]
    }

    fn len(&self) -> usize {
        self.lut.len()
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Get a colormap by name, sampled to [`DEFAULT_LUT_SIZE`] entries
pub fn get_colormap(name: &str) -> Result<Box<dyn Colormap>> {
    let key = name.to_lowercase();

    if let Ok(cache) = LUT_CACHE.read() {
        if let Some(lut) = cache.get(&key) {
            return Ok(Box::new(LookupColormap {
                name: name.to_string(),
                lut: Arc::clone(lut),
            }));
        }
    }

    let colormap = LookupColormap::sampled(name, DEFAULT_LUT_SIZE)?;
    if let Ok(mut cache) = LUT_CACHE.write() {
        cache.insert(key, Arc::clone(&colormap.lut));
    }
    Ok(Box::new(colormap))
}

/// Parse a CSS hex color into RGBA
pub fn parse_color(code: &str) -> Result<[u8; 4]> {
    let code = normalize_hex(code);
    colorgrad::Color::from_html(&code)
        .map(|c| c.to_rgba8())
        .map_err(|e| CartoeeError::invalid("palette", format!("Invalid color {}: {}", code, e)))
}
