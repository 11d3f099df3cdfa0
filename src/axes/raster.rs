//! In-memory equirectangular map axes.
//!
//! `GeoAxes` keeps a list of drawn artifacts and rasterizes them on demand,
//! so later view changes (padding, new limits) apply to everything already
//! added.

use image::{ImageBuffer, Rgba, RgbaImage};
use std::io::Cursor;
use std::path::Path;
use tracing::debug;

use super::text::render_label;
use super::{
    Axis, ColorbarSpec, Crs, GridlineStyle, MapAxes, Orientation, Origin, Rect, Rotation, Tick,
};
use crate::config::RenderConfig;
use crate::error::{CartoeeError, Result};
use crate::geo::Extent;
use crate::interpolation::{get_interpolator, Interpolator};

const BACKGROUND: [u8; 4] = [255, 255, 255, 255];
const FRAME: [u8; 4] = [0, 0, 0, 255];
/// Length of tick marks outside the frame, in pixels
const TICK_LENGTH: i64 = 4;
/// Dash and gap length for dashed gridlines, in pixels
const DASH: i64 = 4;
/// Space between a tick mark or colorbar and its label, in pixels
const LABEL_GAP: i64 = 2;

/// Map area edges in normalized figure coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapArea {
    pub left: f64,
    pub right: f64,
    pub bottom: f64,
    pub top: f64,
}

impl Default for MapArea {
    fn default() -> Self {
        Self {
            left: 0.125,
            right: 0.9,
            bottom: 0.11,
            top: 0.88,
        }
    }
}

/// An image drawn on the map.
#[derive(Debug, Clone)]
pub struct Overlay {
    pub image: RgbaImage,
    pub extent: Extent,
    pub origin: Origin,
}

#[derive(Debug, Clone)]
struct GridSet {
    xs: Vec<f64>,
    ys: Vec<f64>,
    style: GridlineStyle,
}

/// Pixel box `[x0, x1) x [y0, y1)` on the canvas.
#[derive(Debug, Clone, Copy)]
struct PixelBox {
    x0: i64,
    y0: i64,
    x1: i64,
    y1: i64,
}

impl PixelBox {
    fn width(&self) -> i64 {
        self.x1 - self.x0
    }

    fn height(&self) -> i64 {
        self.y1 - self.y0
    }
}

/// Retained-mode map axes rendering to an RGBA image.
pub struct GeoAxes {
    width: u32,
    height: u32,
    map_area: MapArea,
    extent: Extent,
    limits_set: bool,
    interpolator: Box<dyn Interpolator>,
    overlays: Vec<Overlay>,
    gridlines: Vec<GridSet>,
    x_ticks: (Vec<Tick>, Rotation),
    y_ticks: (Vec<Tick>, Rotation),
    colorbars: Vec<(Rect, ColorbarSpec)>,
}

impl GeoAxes {
    /// A global map on a `width` x `height` pixel figure.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            map_area: MapArea::default(),
            extent: Extent::new(-180.0, 180.0, -90.0, 90.0),
            limits_set: false,
            interpolator: Box::new(crate::interpolation::nearest::NearestInterpolator),
            overlays: Vec::new(),
            gridlines: Vec::new(),
            x_ticks: (Vec::new(), Rotation::Horizontal),
            y_ticks: (Vec::new(), Rotation::Horizontal),
            colorbars: Vec::new(),
        }
    }

    pub fn from_config(config: &RenderConfig) -> Result<Self> {
        if config.width == 0 || config.height == 0 {
            return Err(CartoeeError::Config {
                message: format!(
                    "Figure size must be positive, got {}x{}",
                    config.width, config.height
                ),
            });
        }
        Self::new(config.width, config.height).with_interpolation(&config.interpolation)
    }

    /// Choose how overlays are resampled.
    pub fn with_interpolation(mut self, name: &str) -> Result<Self> {
        self.interpolator = get_interpolator(name)?;
        Ok(self)
    }

    /// Fix the view before anything is drawn; overlays no longer rescale it.
    pub fn set_extent(&mut self, extent: Extent) {
        self.extent = extent;
        self.limits_set = true;
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn map_area(&self) -> MapArea {
        self.map_area
    }

    pub fn overlays(&self) -> &[Overlay] {
        &self.overlays
    }

    pub fn colorbars(&self) -> impl Iterator<Item = (&Rect, &ColorbarSpec)> {
        self.colorbars.iter().map(|(r, s)| (r, s))
    }

    /// Gridline coordinates drawn so far, as `(xs, ys)` per call.
    pub fn gridline_sets(&self) -> Vec<(&[f64], &[f64])> {
        self.gridlines
            .iter()
            .map(|g| (g.xs.as_slice(), g.ys.as_slice()))
            .collect()
    }

    pub fn ticks(&self, axis: Axis) -> (&[Tick], Rotation) {
        match axis {
            Axis::X => (self.x_ticks.0.as_slice(), self.x_ticks.1),
            Axis::Y => (self.y_ticks.0.as_slice(), self.y_ticks.1),
        }
    }

    /// Rasterize everything drawn so far.
    pub fn render(&self) -> RgbaImage {
        let mut canvas: RgbaImage =
            ImageBuffer::from_pixel(self.width, self.height, Rgba(BACKGROUND));
        let map = self.map_pixels();

        if self.extent.width() > 0.0 && self.extent.height() > 0.0 {
            for overlay in &self.overlays {
                self.draw_overlay(&mut canvas, map, overlay);
            }
            for grid in &self.gridlines {
                self.draw_gridlines(&mut canvas, map, grid);
            }
            self.draw_ticks(&mut canvas, map);
        }
        draw_frame(&mut canvas, map);

        for (rect, spec) in &self.colorbars {
            self.draw_colorbar(&mut canvas, rect, spec);
        }

        debug!(
            width = self.width,
            height = self.height,
            overlays = self.overlays.len(),
            colorbars = self.colorbars.len(),
            "Rendered map"
        );
        canvas
    }

    /// Render and encode as PNG.
    pub fn encode_png(&self) -> Result<Vec<u8>> {
        let mut buffer = Cursor::new(Vec::new());
        self.render()
            .write_to(&mut buffer, image::ImageFormat::Png)?;
        Ok(buffer.into_inner())
    }

    /// Render and write a PNG file.
    pub fn save_png(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.encode_png()?)?;
        Ok(())
    }

    fn figure_box(&self, left: f64, right: f64, bottom: f64, top: f64) -> PixelBox {
        let w = self.width as f64;
        let h = self.height as f64;
        PixelBox {
            x0: (left * w).round() as i64,
            x1: (right * w).round() as i64,
            y0: ((1.0 - top) * h).round() as i64,
            y1: ((1.0 - bottom) * h).round() as i64,
        }
    }

    fn map_pixels(&self) -> PixelBox {
        let a = self.map_area;
        self.figure_box(a.left, a.right, a.bottom, a.top)
    }

    /// Canvas column of longitude `x`.
    fn column_of(&self, map: PixelBox, x: f64) -> i64 {
        let frac = (x - self.extent.xmin) / self.extent.width();
        map.x0 + (frac * map.width() as f64).floor() as i64
    }

    /// Canvas row of latitude `y`.
    fn row_of(&self, map: PixelBox, y: f64) -> i64 {
        let frac = (self.extent.ymax - y) / self.extent.height();
        map.y0 + (frac * map.height() as f64).floor() as i64
    }

    fn draw_overlay(&self, canvas: &mut RgbaImage, map: PixelBox, overlay: &Overlay) {
        let (img_w, img_h) = overlay.image.dimensions();
        let oe = overlay.extent;
        if img_w == 0 || img_h == 0 || oe.width() <= 0.0 || oe.height() <= 0.0 {
            return;
        }

        for py in map.y0.max(0)..map.y1.min(self.height as i64) {
            let frac = ((py - map.y0) as f64 + 0.5) / map.height() as f64;
            let lat = self.extent.ymax - frac * self.extent.height();
            if !oe.contains_y(lat) {
                continue;
            }
            let v = match overlay.origin {
                Origin::Upper => (oe.ymax - lat) / oe.height() * img_h as f64,
                Origin::Lower => (lat - oe.ymin) / oe.height() * img_h as f64,
            };

            for px in map.x0.max(0)..map.x1.min(self.width as i64) {
                let frac = ((px - map.x0) as f64 + 0.5) / map.width() as f64;
                let lon = self.extent.xmin + frac * self.extent.width();
                if !oe.contains_x(lon) {
                    continue;
                }
                let u = (lon - oe.xmin) / oe.width() * img_w as f64;
                let color = self.interpolator.sample(&overlay.image, u, v);
                blend(canvas, px, py, color, 1.0);
            }
        }
    }

    fn draw_gridlines(&self, canvas: &mut RgbaImage, map: PixelBox, grid: &GridSet) {
        let style = grid.style;
        let thickness = style.width.max(1) as i64;

        for &x in grid.xs.iter().filter(|&&x| self.extent.contains_x(x)) {
            let col = self.column_of(map, x).min(map.x1 - 1);
            for row in map.y0..map.y1 {
                if style.dashed && ((row - map.y0) / DASH) % 2 == 1 {
                    continue;
                }
                for t in 0..thickness {
                    blend(canvas, col + t - thickness / 2, row, style.color, 1.0);
                }
            }
        }

        for &y in grid.ys.iter().filter(|&&y| self.extent.contains_y(y)) {
            let row = self.row_of(map, y).min(map.y1 - 1);
            for col in map.x0..map.x1 {
                if style.dashed && ((col - map.x0) / DASH) % 2 == 1 {
                    continue;
                }
                for t in 0..thickness {
                    blend(canvas, col, row + t - thickness / 2, style.color, 1.0);
                }
            }
        }
    }

    fn draw_ticks(&self, canvas: &mut RgbaImage, map: PixelBox) {
        let (x_ticks, x_rotation) = &self.x_ticks;
        for tick in x_ticks {
            let col = self.column_of(map, tick.value).min(map.x1 - 1);
            for d in 0..TICK_LENGTH {
                blend(canvas, col, map.y1 + d, FRAME, 1.0);
            }
            if let Some(label) = render_label(&tick.label, FRAME, x_rotation.degrees()) {
                let left = col - label.width() as i64 / 2;
                paste(canvas, &label, left, map.y1 + TICK_LENGTH + LABEL_GAP);
            }
        }

        let (y_ticks, y_rotation) = &self.y_ticks;
        for tick in y_ticks {
            let row = self.row_of(map, tick.value).min(map.y1 - 1);
            for d in 1..=TICK_LENGTH {
                blend(canvas, map.x0 - d, row, FRAME, 1.0);
            }
            if let Some(label) = render_label(&tick.label, FRAME, y_rotation.degrees()) {
                let left = map.x0 - TICK_LENGTH - LABEL_GAP - label.width() as i64;
                paste(canvas, &label, left, row - label.height() as i64 / 2);
            }
        }
    }

    fn draw_colorbar(&self, canvas: &mut RgbaImage, rect: &Rect, spec: &ColorbarSpec) {
        let area = self.figure_box(
            rect.left,
            rect.left + rect.width,
            rect.bottom,
            rect.bottom + rect.height,
        );
        let (vmin, vmax) = spec.norm.range();
        let alpha = spec.alpha.clamp(0.0, 1.0) as f32;

        for py in area.y0..area.y1 {
            for px in area.x0..area.x1 {
                let frac = match spec.orientation {
                    Orientation::Horizontal => {
                        ((px - area.x0) as f64 + 0.5) / area.width().max(1) as f64
                    }
                    Orientation::Vertical => {
                        ((area.y1 - py) as f64 - 0.5) / area.height().max(1) as f64
                    }
                };
                let value = vmin + frac * (vmax - vmin);
                let color = spec.colormap.map_normalized(spec.norm.normalize(value));
                blend(canvas, px, py, color, alpha);
            }
        }
        draw_frame(canvas, area);

        let label = spec.label.as_deref().unwrap_or_default();
        match spec.orientation {
            Orientation::Horizontal => {
                if let Some(text) = render_label(label, FRAME, 0.0) {
                    let left = (area.x0 + area.x1) / 2 - text.width() as i64 / 2;
                    paste(canvas, &text, left, area.y1 + LABEL_GAP);
                }
            }
            Orientation::Vertical => {
                if let Some(text) = render_label(label, FRAME, 90.0) {
                    let top = (area.y0 + area.y1) / 2 - text.height() as i64 / 2;
                    paste(canvas, &text, area.x1 + LABEL_GAP, top);
                }
            }
        }
    }
}

impl MapAxes for GeoAxes {
    fn extent(&self) -> Extent {
        self.extent
    }

    fn set_xlim(&mut self, xmin: f64, xmax: f64) {
        self.extent.xmin = xmin;
        self.extent.xmax = xmax;
        self.limits_set = true;
    }

    fn set_ylim(&mut self, ymin: f64, ymax: f64) {
        self.extent.ymin = ymin;
        self.extent.ymax = ymax;
        self.limits_set = true;
    }

    fn imshow(
        &mut self,
        image: RgbaImage,
        extent: Extent,
        origin: Origin,
        transform: Crs,
    ) -> Result<()> {
        match transform {
            Crs::PlateCarree => {}
        }

        if !self.limits_set {
            // Autoscale to the union of everything shown so far
            self.extent = if self.overlays.is_empty() {
                extent
            } else {
                Extent::new(
                    self.extent.xmin.min(extent.xmin),
                    self.extent.xmax.max(extent.xmax),
                    self.extent.ymin.min(extent.ymin),
                    self.extent.ymax.max(extent.ymax),
                )
            };
        }

        debug!(
            width = image.width(),
            height = image.height(),
            extent = ?extent,
            "Adding image overlay"
        );
        self.overlays.push(Overlay {
            image,
            extent,
            origin,
        });
        Ok(())
    }

    fn gridlines(&mut self, xs: &[f64], ys: &[f64], style: &GridlineStyle) -> Result<()> {
        self.gridlines.push(GridSet {
            xs: xs.to_vec(),
            ys: ys.to_vec(),
            style: *style,
        });
        Ok(())
    }

    fn set_ticks(&mut self, axis: Axis, ticks: Vec<Tick>, rotation: Rotation) -> Result<()> {
        match axis {
            Axis::X => self.x_ticks = (ticks, rotation),
            Axis::Y => self.y_ticks = (ticks, rotation),
        }
        Ok(())
    }

    fn colorbar(&mut self, rect: Rect, spec: ColorbarSpec) -> Result<()> {
        if rect.width <= 0.0 || rect.height <= 0.0 {
            return Err(CartoeeError::Render {
                message: format!("colorbar area has no size: {:?}", rect),
            });
        }
        self.colorbars.push((rect, spec));
        Ok(())
    }

    fn adjust_map_area(&mut self, left: Option<f64>, right: Option<f64>) {
        if let Some(left) = left {
            self.map_area.left = left;
        }
        if let Some(right) = right {
            self.map_area.right = right;
        }
    }
}

/// Alpha-composite `color` (scaled by `alpha`) onto the canvas, ignoring
/// positions outside it.
fn blend(canvas: &mut RgbaImage, x: i64, y: i64, color: [u8; 4], alpha: f32) {
    if x < 0 || y < 0 || x >= canvas.width() as i64 || y >= canvas.height() as i64 {
        return;
    }
    let a = color[3] as f32 / 255.0 * alpha;
    if a <= 0.0 {
        return;
    }
    let dst = canvas.get_pixel_mut(x as u32, y as u32);
    for c in 0..3 {
        let blended = color[c] as f32 * a + dst.0[c] as f32 * (1.0 - a);
        dst.0[c] = blended.round().clamp(0.0, 255.0) as u8;
    }
    let out_alpha = a + dst.0[3] as f32 / 255.0 * (1.0 - a);
    dst.0[3] = (out_alpha * 255.0).round().clamp(0.0, 255.0) as u8;
}

/// Composite a rendered label with its top-left corner at `(left, top)`.
fn paste(canvas: &mut RgbaImage, label: &RgbaImage, left: i64, top: i64) {
    for (x, y, pixel) in label.enumerate_pixels() {
        blend(canvas, left + x as i64, top + y as i64, pixel.0, 1.0);
    }
}

fn draw_frame(canvas: &mut RgbaImage, area: PixelBox) {
    for x in area.x0..area.x1 {
        blend(canvas, x, area.y0, FRAME, 1.0);
        blend(canvas, x, area.y1 - 1, FRAME, 1.0);
    }
    for y in area.y0..area.y1 {
        blend(canvas, area.x0, y, FRAME, 1.0);
        blend(canvas, area.x1 - 1, y, FRAME, 1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colormaps::get_colormap;
    use crate::axes::Normalization;

    fn solid(width: u32, height: u32, color: [u8; 4]) -> RgbaImage {
        ImageBuffer::from_pixel(width, height, Rgba(color))
    }

    #[test]
    fn test_imshow_autoscales_extent() {
        let mut axes = GeoAxes::new(200, 100);
        let extent = Extent::new(-10.0, 10.0, 0.0, 5.0);
        axes.imshow(solid(4, 2, [255, 0, 0, 255]), extent, Origin::Upper, Crs::PlateCarree)
            .unwrap();
        assert_eq!(axes.extent(), extent);

        axes.imshow(
            solid(4, 2, [0, 255, 0, 255]),
            Extent::new(0.0, 20.0, -5.0, 2.0),
            Origin::Upper,
            Crs::PlateCarree,
        )
        .unwrap();
        assert_eq!(axes.extent(), Extent::new(-10.0, 20.0, -5.0, 5.0));
    }

    #[test]
    fn test_explicit_limits_are_kept() {
        let mut axes = GeoAxes::new(200, 100);
        axes.set_extent(Extent::new(0.0, 1.0, 0.0, 1.0));
        axes.imshow(
            solid(1, 1, [0, 0, 0, 255]),
            Extent::new(-50.0, 50.0, -50.0, 50.0),
            Origin::Upper,
            Crs::PlateCarree,
        )
        .unwrap();
        assert_eq!(axes.extent(), Extent::new(0.0, 1.0, 0.0, 1.0));
    }

    #[test]
    fn test_upper_origin_orientation() {
        let mut axes = GeoAxes::new(100, 100);
        axes.adjust_map_area(Some(0.0), Some(1.0));
        axes.map_area.bottom = 0.0;
        axes.map_area.top = 1.0;

        // Row 0 red (north), row 1 blue (south)
        let mut image = solid(1, 2, [0, 0, 255, 255]);
        image.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        axes.imshow(image, Extent::new(0.0, 10.0, 0.0, 10.0), Origin::Upper, Crs::PlateCarree)
            .unwrap();

        let canvas = axes.render();
        assert_eq!(canvas.get_pixel(50, 20).0, [255, 0, 0, 255]);
        assert_eq!(canvas.get_pixel(50, 80).0, [0, 0, 255, 255]);
    }

    #[test]
    fn test_colorbar_gradient_direction() {
        let mut axes = GeoAxes::new(200, 100);
        let spec = ColorbarSpec {
            colormap: get_colormap("gray").unwrap(),
            norm: Normalization::Linear {
                vmin: 0.0,
                vmax: 1.0,
            },
            alpha: 1.0,
            orientation: Orientation::Horizontal,
            label: None,
        };
        axes.colorbar(Rect::new(0.1, 0.1, 0.8, 0.2), spec).unwrap();

        let canvas = axes.render();
        // Inside the bar, away from the frame: dark on the left, light on the right
        let left = canvas.get_pixel(25, 80).0;
        let right = canvas.get_pixel(174, 80).0;
        assert!(left[0] < 40, "left {:?}", left);
        assert!(right[0] > 215, "right {:?}", right);
    }

    #[test]
    fn test_zero_sized_colorbar_rejected() {
        let mut axes = GeoAxes::new(50, 50);
        let spec = ColorbarSpec {
            colormap: get_colormap("gray").unwrap(),
            norm: Normalization::Linear {
                vmin: 0.0,
                vmax: 1.0,
            },
            alpha: 1.0,
            orientation: Orientation::Vertical,
            label: None,
        };
        assert!(axes.colorbar(Rect::new(0.1, 0.1, 0.0, 0.5), spec).is_err());
    }

    fn inked(canvas: &RgbaImage, cols: std::ops::Range<u32>, rows: std::ops::Range<u32>) -> usize {
        let mut count = 0;
        for y in rows {
            for x in cols.clone() {
                if canvas.get_pixel(x, y).0 != BACKGROUND {
                    count += 1;
                }
            }
        }
        count
    }

    fn labelled_axes(rotation: Rotation) -> GeoAxes {
        let mut axes = GeoAxes::new(200, 200);
        axes.set_extent(Extent::new(0.0, 10.0, 0.0, 10.0));
        let x = vec![Tick {
            value: 5.0,
            label: "5°E".to_string(),
        }];
        let y = vec![Tick {
            value: 5.0,
            label: "5°N".to_string(),
        }];
        axes.set_ticks(Axis::X, x, rotation).unwrap();
        axes.set_ticks(Axis::Y, y, rotation).unwrap();
        axes
    }

    #[test]
    fn test_tick_labels_are_drawn_outside_the_frame() {
        let canvas = labelled_axes(Rotation::Horizontal).render();
        let map = MapArea::default();
        let y1 = ((1.0 - map.bottom) * 200.0).round() as u32;
        let x0 = (map.left * 200.0).round() as u32;

        // Below the x tick marks and left of the y tick marks
        let below = inked(&canvas, 0..200, y1 + TICK_LENGTH as u32..200);
        let left = inked(&canvas, 0..x0 - TICK_LENGTH as u32, 0..200);
        assert!(below > 0, "no x tick label pixels");
        assert!(left > 0, "no y tick label pixels");
    }

    #[test]
    fn test_tick_label_rotation_changes_footprint() {
        let x0 = (MapArea::default().left * 200.0).round() as u32;
        let strip = x0 - TICK_LENGTH as u32;
        let flat = labelled_axes(Rotation::Horizontal).render();
        let upright = labelled_axes(Rotation::Vertical).render();

        // Count the columns the y label occupies left of the frame
        let columns = |canvas: &RgbaImage| {
            (0..strip)
                .filter(|&x| inked(canvas, x..x + 1, 0..200) > 0)
                .count()
        };
        assert!(columns(&upright) < columns(&flat));
    }

    #[test]
    fn test_colorbar_label_is_drawn() {
        let mut axes = GeoAxes::new(200, 200);
        let spec = ColorbarSpec {
            colormap: get_colormap("gray").unwrap(),
            norm: Normalization::Linear {
                vmin: 0.0,
                vmax: 1.0,
            },
            alpha: 1.0,
            orientation: Orientation::Horizontal,
            label: Some("elevation".to_string()),
        };
        // Bar spans rows 150..160; the label goes underneath, inside the
        // map frame which spans rows 24..178 and columns 25..180
        axes.colorbar(Rect::new(0.25, 0.2, 0.5, 0.05), spec).unwrap();
        let canvas = axes.render();
        assert!(inked(&canvas, 30..170, 161..176) > 0);

        let mut unlabelled = GeoAxes::new(200, 200);
        let spec = ColorbarSpec {
            colormap: get_colormap("gray").unwrap(),
            norm: Normalization::Linear {
                vmin: 0.0,
                vmax: 1.0,
            },
            alpha: 1.0,
            orientation: Orientation::Horizontal,
            label: None,
        };
        unlabelled.colorbar(Rect::new(0.25, 0.2, 0.5, 0.05), spec).unwrap();
        let canvas = unlabelled.render();
        assert_eq!(inked(&canvas, 30..170, 161..176), 0);
    }

    #[test]
    fn test_encode_png_roundtrip_size() {
        let axes = GeoAxes::new(64, 32);
        let bytes = axes.encode_png().unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (64, 32));
    }
}
