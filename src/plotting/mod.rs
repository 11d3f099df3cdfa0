//! Map plotting operations.
//!
//! Each operation takes the caller's axes explicitly and appends to them:
//! imagery layers, colorbars, gridlines with ticks, and view padding.

pub mod colorbar;
pub mod gridlines;
pub mod layer;
pub mod view;

pub use colorbar::{add_colorbar, Colorbar, ColorbarOptions, Location};
pub use gridlines::{add_gridlines, GridlineOptions, Gridlines};
pub use layer::{add_layer, get_map, LayerOptions, MapOptions};
pub use view::{pad_view, DEFAULT_PAD_FACTOR};
