//! Hex palettes.
//!
//! Conversion between named colormaps and the comma-separated hex palettes
//! understood by the imagery service.

use super::colormap::{named_gradient, parse_color};
use crate::error::Result;

/// Default number of colors sampled from a colormap
pub const DEFAULT_PALETTE_SIZE: usize = 256;

/// Sample `n` evenly spaced colors from a named colormap as `#rrggbb` strings.
///
/// The first entry is the colormap's low end and the last its high end.
pub fn build_palette(cmap: &str, n: usize) -> Result<Vec<String>> {
    let gradient = named_gradient(cmap)?;
    Ok(crate::geo::linspace(0.0, 1.0, n)
        .into_iter()
        .map(|t| to_hex(gradient.at(t)))
        .collect())
}

/// Format the RGB part of a color as `#rrggbb`.
pub fn to_hex(color: [u8; 4]) -> String {
    format!("#{:02x}{:02x}{:02x}", color[0], color[1], color[2])
}

/// Prefix a `#` unless one is already there.
pub fn normalize_hex(code: &str) -> String {
    let code = code.trim();
    if code.starts_with('#') {
        code.to_string()
    } else {
        format!("#{}", code)
    }
}

/// Normalize and validate individual palette entries. Blank entries are skipped.
pub fn parse_palette_entries<'a, I>(entries: I) -> Result<Vec<String>>
where
    I: IntoIterator<Item = &'a str>,
{
    entries
        .into_iter()
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .map(|e| {
            let code = normalize_hex(e);
            parse_color(&code)?;
            Ok(code)
        })
        .collect()
}
