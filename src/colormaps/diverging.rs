//! Diverging colormaps (two-hue progression with center).
//!
//! These colormaps are suitable for data that diverges from a central value.

use colorgrad::Gradient;

use super::colormap::gradient_from_rgb;
use crate::error::Result;

/// Names resolved by [`gradient`]
pub const NAMES: &[&str] = &[
    "coolwarm", "seismic", "bwr", "spectral", "rdbu", "rdylbu", "rdylgn", "brbg", "piyg",
    "prgn", "puor", "rdgy",
];

/// Blue to white to red - good for temperature data
const COOLWARM: [[u8; 3]; 32] = [
    [59, 76, 192], // Dark blue
    [68, 90, 204],
    [77, 104, 215],
    [87, 117, 225],
    [98, 130, 234],
    [108, 142, 241],
    [119, 154, 247],
    [130, 165, 251],
    [141, 176, 254],
    [152, 185, 255],
    [163, 194, 255],
    [174, 201, 253],
    [184, 208, 249],
    [194, 213, 244],
    [204, 217, 238],
    [213, 219, 230],
    [221, 221, 221], // Gray in the middle
    [229, 216, 209],
    [236, 211, 197],
    [241, 204, 185],
    [245, 196, 173],
    [247, 187, 160],
    [247, 177, 148],
    [247, 166, 135],
    [244, 154, 123],
    [241, 141, 111],
    [236, 127, 99],
    [229, 112, 88],
    [222, 96, 77],
    [213, 80, 66],
    [203, 62, 56],
    [192, 40, 47], // Dark red
];

/// Blue to white to red, saturated at both ends
const SEISMIC: [[u8; 3]; 15] = [
    [0, 0, 127], // Dark blue
    [0, 0, 191],
    [0, 63, 255],
    [0, 127, 255],
    [0, 191, 255],
    [127, 223, 255],
    [191, 239, 255],
    [255, 255, 255], // White in the middle
    [255, 239, 191],
    [255, 223, 127],
    [255, 191, 0],
    [255, 127, 0],
    [255, 63, 0],
    [191, 0, 0],
    [127, 0, 0], // Dark red
];

const BWR: [[u8; 3]; 3] = [[0, 0, 255], [255, 255, 255], [255, 0, 0]];

/// Gradient for a lowercase diverging colormap name, if known.
pub fn gradient(name: &str) -> Option<Result<Gradient>> {
    let g = match name {
        "coolwarm" => return Some(gradient_from_rgb(&COOLWARM)),
        "seismic" => return Some(gradient_from_rgb(&SEISMIC)),
        "bwr" => return Some(gradient_from_rgb(&BWR)),
        "spectral" => colorgrad::spectral(),
        "rdbu" => colorgrad::rd_bu(),
        "rdylbu" => colorgrad::rd_yl_bu(),
        "rdylgn" => colorgrad::rd_yl_gn(),
        "brbg" => colorgrad::br_bg(),
        "piyg" => colorgrad::pi_yg(),
        "prgn" => colorgrad::pr_gn(),
        "puor" => colorgrad::pu_or(),
        "rdgy" => colorgrad::rd_gy(),
        _ => return None,
    };
    Some(Ok(g))
}
