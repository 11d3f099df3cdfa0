//! # cartoee
//!
//! Render remote raster imagery onto cartographic map axes.
//!
//! The imagery service renders a thumbnail of an image for a region; this
//! crate fetches it, places it on equirectangular map axes and decorates the
//! map with colorbars, gridlines and view padding.
//!
//! ## Architecture
//!
//! - **Imagery**: the [`imagery::ImageryService`] trait and a blocking HTTP client
//! - **Axes**: the [`axes::MapAxes`] trait and an in-memory PNG renderer
//! - **Plotting**: layer, colorbar, gridline and padding operations working
//!   against any `MapAxes`
//! - **Colormaps**: named colormaps and hex palettes shared by the layer
//!   requests and the colorbars

pub mod axes;
pub mod colormaps;
pub mod config;
pub mod error;
pub mod geo;
pub mod imagery;
pub mod interpolation;
pub mod logging;
pub mod plotting;
pub mod vis_params;

pub use axes::{GeoAxes, MapAxes};
pub use colormaps::build_palette;
pub use config::Config;
pub use error::{CartoeeError, Result};
pub use geo::{bbox_to_extent, buffer_box, Extent, Pair, Region};
pub use imagery::{rest::RestImageryService, Dims, ImageHandle, ImageryService};
pub use logging::{
    generate_request_id, init_tracing, log_error, log_request_error, log_timed_operation,
    Operation,
};
pub use plotting::{
    add_colorbar, add_gridlines, add_layer, get_map, pad_view, Colorbar, ColorbarOptions,
    GridlineOptions, Gridlines, LayerOptions, Location, MapOptions,
};
pub use vis_params::VisParams;
