//! Colormap implementations and hex palettes.
//!
//! This module provides matplotlib-style named colormaps backed by `colorgrad`
//! and the palette helpers used to talk to the imagery service.

pub mod colormap;
pub mod diverging;
pub mod palette;
pub mod sequential;

pub use colormap::{
    get_colormap, named_gradient, parse_color, Colormap, LookupColormap, DEFAULT_LUT_SIZE,
};
pub use palette::{build_palette, normalize_hex, to_hex, DEFAULT_PALETTE_SIZE};
