//! Sequential colormaps (single-hue or perceptual progression).
//!
//! These colormaps are suitable for data that progresses from low to high.

use colorgrad::Gradient;

use super::colormap::gradient_from_rgb;
use crate::error::Result;

/// Names resolved by [`gradient`]
pub const NAMES: &[&str] = &[
    "gray", "grey", "greys", "binary", "viridis", "plasma", "inferno", "magma", "cividis",
    "turbo", "rainbow", "cubehelix", "blues", "greens", "reds", "oranges", "purples", "ylgn",
    "ylgnbu", "ylorbr", "ylorrd",
];

/// Gradient for a lowercase sequential colormap name, if known.
pub fn gradient(name: &str) -> Option<Result<Gradient>> {
    let g = match name {
        "gray" | "grey" => return Some(gradient_from_rgb(&[[0, 0, 0], [255, 255, 255]])),
        "binary" => return Some(gradient_from_rgb(&[[255, 255, 255], [0, 0, 0]])),
        "greys" => colorgrad::greys(),
        "viridis" => colorgrad::viridis(),
        "plasma" => colorgrad::plasma(),
        "inferno" => colorgrad::inferno(),
        "magma" => colorgrad::magma(),
        "cividis" => colorgrad::cividis(),
        "turbo" => colorgrad::turbo(),
        "rainbow" => colorgrad::rainbow(),
        "cubehelix" => colorgrad::cubehelix_default(),
        "blues" => colorgrad::blues(),
        "greens" => colorgrad::greens(),
        "reds" => colorgrad::reds(),
        "oranges" => colorgrad::oranges(),
        "purples" => colorgrad::purples(),
        "ylgn" => colorgrad::yl_gn(),
        "ylgnbu" => colorgrad::yl_gn_bu(),
        "ylorbr" => colorgrad::yl_or_br(),
        "ylorrd" => colorgrad::yl_or_rd(),
        _ => return None,
    };
    Some(Ok(g))
}
