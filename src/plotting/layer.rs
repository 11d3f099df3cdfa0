//! Imagery layers.
//!
//! Fetches a rendered thumbnail from the imagery service and draws it onto
//! map axes at the extent of its region.

use bytes::Bytes;
use image::RgbaImage;
use ndarray::Array3;
use std::time::Instant;
use tracing::{debug, info};

use crate::axes::{Crs, GeoAxes, MapAxes, Origin};
use crate::colormaps::{build_palette, DEFAULT_PALETTE_SIZE};
use crate::config::RenderConfig;
use crate::error::{CartoeeError, Result};
use crate::geo::{Extent, Region};
use crate::imagery::{Dims, ImageHandle, ImageryService, ThumbnailRequest, ThumbnailResponse};
use crate::logging::{generate_request_id, log_request_error};
use crate::vis_params::VisParams;

/// Thumbnail encoding requested for overlays
const THUMBNAIL_FORMAT: &str = "png";

/// What to request for one layer.
#[derive(Debug, Clone)]
pub struct LayerOptions {
    pub dims: Option<Dims>,
    /// Area to render; defaults to the image footprint
    pub region: Option<Region>,
    /// Named colormap turned into a palette. Cannot be combined with a
    /// `palette` in `vis_params`.
    pub cmap: Option<String>,
    pub vis_params: Option<VisParams>,
    /// Number of colors sampled from `cmap`
    pub palette_size: usize,
}

impl Default for LayerOptions {
    fn default() -> Self {
        Self {
            dims: None,
            region: None,
            cmap: None,
            vis_params: None,
            palette_size: DEFAULT_PALETTE_SIZE,
        }
    }
}

/// Figure settings for [`get_map`].
#[derive(Debug, Clone)]
pub struct MapOptions {
    pub width: u32,
    pub height: u32,
    pub interpolation: String,
}

impl Default for MapOptions {
    fn default() -> Self {
        RenderConfig::default().into()
    }
}

impl From<RenderConfig> for MapOptions {
    fn from(config: RenderConfig) -> Self {
        Self {
            width: config.width,
            height: config.height,
            interpolation: config.interpolation,
        }
    }
}

/// Create new map axes showing `image`.
pub fn get_map<S>(
    service: &S,
    image: &ImageHandle,
    map: &MapOptions,
    layer: &LayerOptions,
) -> Result<GeoAxes>
where
    S: ImageryService + ?Sized,
{
    if map.width == 0 || map.height == 0 {
        return Err(CartoeeError::invalid(
            "size",
            format!("figure size must be positive, got {}x{}", map.width, map.height),
        ));
    }

    let mut axes = GeoAxes::new(map.width, map.height).with_interpolation(&map.interpolation)?;
    add_layer(&mut axes, service, image, layer)?;
    Ok(axes)
}

/// Fetch `image` as a thumbnail and draw it on `ax`.
///
/// All arguments are checked before the service is contacted; a `cmap`
/// together with a `palette` is rejected without any request. Palette
/// entries are sent `#`-prefixed whether synthesized or supplied.
pub fn add_layer<A, S>(
    ax: &mut A,
    service: &S,
    image: &ImageHandle,
    options: &LayerOptions,
) -> Result<()>
where
    A: MapAxes + ?Sized,
    S: ImageryService + ?Sized,
{
    let request_id = generate_request_id();
    let start = Instant::now();

    debug!(
        image = %image,
        request_id = %request_id,
        dims = ?options.dims,
        region = ?options.region,
        cmap = ?options.cmap,
        "Adding imagery layer"
    );

    if let Some(dims) = &options.dims {
        dims.validate()?;
    }

    let mut vis_params = options.vis_params.clone().unwrap_or_default();
    if let Some(cmap) = &options.cmap {
        if vis_params.has_palette() {
            return Err(CartoeeError::conflict(
                "cmap and a palette in vis_params cannot be used together",
            ));
        }
        let palette = build_palette(cmap, options.palette_size)?;
        vis_params.insert("palette", palette.join(","));
    } else if let Some(palette) = vis_params.palette()? {
        // Caller palettes go out in the same `#rrggbb` form
        vis_params.insert("palette", palette.join(","));
    }

    let (region, extent) = match options.region {
        Some(region) => (Some(region.polygon()), region.to_extent()),
        None => {
            let ring = service.image_bounds(image).map_err(|e| {
                log_request_error(&e, image.id(), &request_id);
                e
            })?;
            (None, Extent::from_ring(&ring)?)
        }
    };

    let request = ThumbnailRequest {
        format: THUMBNAIL_FORMAT.to_string(),
        region,
        dimensions: options.dims,
        vis_params,
        request_id: request_id.clone(),
    };

    let bytes = service
        .thumbnail(image, &request)
        .and_then(ThumbnailResponse::into_image_bytes)
        .map_err(|e| {
            log_request_error(&e, image.id(), &request_id);
            e
        })?;

    let pixels = decode_pixels(&bytes)?;
    let (height, width, channels) = pixels.dim();
    debug!(
        request_id = %request_id,
        width = width,
        height = height,
        channels = channels,
        "Decoded thumbnail"
    );

    ax.imshow(to_rgba_image(&pixels)?, extent, Origin::Upper, Crs::PlateCarree)?;

    info!(
        image = %image,
        request_id = %request_id,
        extent = ?extent,
        duration_ms = start.elapsed().as_secs_f64() * 1000.0,
        "Imagery layer added"
    );
    Ok(())
}

/// Decode image bytes into an 8-bit `(height, width, channels)` array.
///
/// The channel count of the source is kept; deeper samples are scaled down
/// to 8 bits.
pub fn decode_pixels(bytes: &Bytes) -> Result<Array3<u8>> {
    let decoded = image::load_from_memory(bytes)?;
    let (width, height) = (decoded.width() as usize, decoded.height() as usize);

    let (channels, raw) = match decoded.color().channel_count() {
        1 => (1, decoded.into_luma8().into_raw()),
        2 => (2, decoded.into_luma_alpha8().into_raw()),
        3 => (3, decoded.into_rgb8().into_raw()),
        _ => (4, decoded.into_rgba8().into_raw()),
    };

    Array3::from_shape_vec((height, width, channels), raw).map_err(|e| CartoeeError::Render {
        message: format!("decoded pixel buffer has an unexpected size: {}", e),
    })
}

/// Expand gray + alpha into RGBA: gray fills the three color channels and
/// alpha is kept per pixel.
pub fn expand_gray_alpha(pixels: &Array3<u8>) -> Array3<u8> {
    let (height, width, _) = pixels.dim();
    Array3::from_shape_fn((height, width, 4), |(y, x, c)| {
        if c == 3 {
            pixels[[y, x, 1]]
        } else {
            pixels[[y, x, 0]]
        }
    })
}

/// Convert a decoded pixel array of 1 to 4 channels into an RGBA image.
pub fn to_rgba_image(pixels: &Array3<u8>) -> Result<RgbaImage> {
    let (height, width, channels) = pixels.dim();
    let rgba = match channels {
        1 => Array3::from_shape_fn((height, width, 4), |(y, x, c)| {
            if c == 3 {
                u8::MAX
            } else {
                pixels[[y, x, 0]]
            }
        }),
        2 => expand_gray_alpha(pixels),
        3 => Array3::from_shape_fn((height, width, 4), |(y, x, c)| {
            if c == 3 {
                u8::MAX
            } else {
                pixels[[y, x, c]]
            }
        }),
        4 => pixels.clone(),
        n => {
            return Err(CartoeeError::invalid(
                "image",
                format!("unsupported channel count: {}", n),
            ))
        }
    };

    let raw: Vec<u8> = rgba.iter().copied().collect();
    RgbaImage::from_raw(width as u32, height as u32, raw).ok_or_else(|| CartoeeError::Render {
        message: "pixel buffer does not match image size".to_string(),
    })
}
