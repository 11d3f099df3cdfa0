//! Geographic coordinate helpers.
//!
//! Bounding boxes come in two orderings and must not be confused:
//! a [`Region`] is `(west, south, east, north)` as the imagery service wants
//! it, an [`Extent`] is `(xmin, xmax, ymin, ymax)` as the map axes want it.
//! Everything here is pure arithmetic in decimal degrees.

use serde::{Deserialize, Serialize};

use crate::error::{CartoeeError, Result};

/// Value given either once for both axes or separately per axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Pair<T> {
    /// Same value for x and y
    Uniform(T),
    /// `(x, y)`
    Each(T, T),
}

impl<T: Copy> Pair<T> {
    pub fn x(&self) -> T {
        match *self {
            Pair::Uniform(v) => v,
            Pair::Each(x, _) => x,
        }
    }

    pub fn y(&self) -> T {
        match *self {
            Pair::Uniform(v) => v,
            Pair::Each(_, y) => y,
        }
    }
}

impl<T> From<T> for Pair<T> {
    fn from(value: T) -> Self {
        Pair::Uniform(value)
    }
}

/// Bounding box in `(west, south, east, north)` order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl Region {
    pub fn new(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self {
            west,
            south,
            east,
            north,
        }
    }

    /// Display extent covered by this region.
    pub fn to_extent(&self) -> Extent {
        Extent::from(bbox_to_extent((self.west, self.south, self.east, self.north)))
    }

    /// Polygon coordinates of the rectangle, as a list with a single closed ring.
    pub fn polygon(&self) -> Vec<Vec<[f64; 2]>> {
        vec![vec![
            [self.west, self.south],
            [self.east, self.south],
            [self.east, self.north],
            [self.west, self.north],
            [self.west, self.south],
        ]]
    }
}

/// Bounding box in `(xmin, xmax, ymin, ymax)` order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
}

impl Extent {
    pub fn new(xmin: f64, xmax: f64, ymin: f64, ymax: f64) -> Self {
        Self {
            xmin,
            xmax,
            ymin,
            ymax,
        }
    }

    pub fn width(&self) -> f64 {
        self.xmax - self.xmin
    }

    pub fn height(&self) -> f64 {
        self.ymax - self.ymin
    }

    pub fn contains_x(&self, x: f64) -> bool {
        x >= self.xmin && x <= self.xmax
    }

    pub fn contains_y(&self, y: f64) -> bool {
        y >= self.ymin && y <= self.ymax
    }

    /// Tightest extent around a ring of `[x, y]` coordinates.
    pub fn from_ring(ring: &[[f64; 2]]) -> Result<Self> {
        if ring.is_empty() {
            return Err(CartoeeError::invalid(
                "region",
                "cannot derive an extent from an empty coordinate ring",
            ));
        }

        let mut extent = Extent::new(
            f64::INFINITY,
            f64::NEG_INFINITY,
            f64::INFINITY,
            f64::NEG_INFINITY,
        );
        for &[x, y] in ring {
            extent.xmin = extent.xmin.min(x);
            extent.xmax = extent.xmax.max(x);
            extent.ymin = extent.ymin.min(y);
            extent.ymax = extent.ymax.max(y);
        }
        Ok(extent)
    }
}

impl From<(f64, f64, f64, f64)> for Extent {
    fn from((xmin, xmax, ymin, ymax): (f64, f64, f64, f64)) -> Self {
        Extent::new(xmin, xmax, ymin, ymax)
    }
}

impl From<Extent> for (f64, f64, f64, f64) {
    fn from(e: Extent) -> Self {
        (e.xmin, e.xmax, e.ymin, e.ymax)
    }
}

/// Reorder `(west, south, east, north)` into `(west, east, south, north)`.
pub fn bbox_to_extent(bbox: (f64, f64, f64, f64)) -> (f64, f64, f64, f64) {
    (bbox.0, bbox.2, bbox.1, bbox.3)
}

/// Remainder with the sign of the divisor.
pub fn floor_mod(value: f64, divisor: f64) -> f64 {
    value - divisor * (value / divisor).floor()
}

/// Multiples closer than this (in units of the interval) count as exact
const SNAP_TOLERANCE: f64 = 1e-9;

/// Round the bounds of an extent outward to the nearest multiple of `interval`.
///
/// Minimums are rounded down and maximums up. Bounds within rounding error
/// of a multiple snap to it, so buffering an already buffered extent
/// returns it unchanged.
pub fn buffer_box(extent: Extent, interval: f64) -> Extent {
    let snap = |v: f64, outward: fn(f64) -> f64| {
        let k = v / interval;
        let nearest = k.round();
        if (k - nearest).abs() <= SNAP_TOLERANCE {
            nearest * interval
        } else {
            outward(k) * interval
        }
    };

    Extent::new(
        snap(extent.xmin, f64::floor),
        snap(extent.xmax, f64::ceil),
        snap(extent.ymin, f64::floor),
        snap(extent.ymax, f64::ceil),
    )
}

/// Grow (or, for negative factors, shrink) each axis by `span * factor` on both sides.
pub fn pad_extent(extent: Extent, xfactor: f64, yfactor: f64) -> Extent {
    let dx = extent.width() * xfactor;
    let dy = extent.height() * yfactor;
    Extent::new(
        extent.xmin - dx,
        extent.xmax + dx,
        extent.ymin - dy,
        extent.ymax + dy,
    )
}

/// Reject bounds that cannot be stepped over, such as a view padded to infinity.
pub(crate) fn ensure_finite_bounds(start: f64, stop: f64) -> Result<()> {
    if start.is_finite() && stop.is_finite() {
        Ok(())
    } else {
        Err(CartoeeError::invalid(
            "extent",
            format!("bounds must be finite, got {} to {}", start, stop),
        ))
    }
}

/// Values from `start` to `stop` inclusive, stepped by `step`.
pub fn stepped_range(start: f64, stop: f64, step: f64) -> Result<Vec<f64>> {
    ensure_finite_bounds(start, stop)?;
    if !step.is_finite() || step <= 0.0 {
        return Err(CartoeeError::invalid(
            "interval",
            format!("interval must be a positive number, got {}", step),
        ));
    }

    // Tolerate accumulated rounding on the last step
    let tolerance = step * 1e-9;
    let mut values = Vec::new();
    let mut i = 0usize;
    loop {
        let v = start + step * i as f64;
        if v > stop + tolerance {
            break;
        }
        values.push(v);
        i += 1;
    }
    Ok(values)
}

/// `n` evenly spaced values over `[start, stop]`, endpoints included.
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            (0..n)
                .map(|i| {
                    if i == n - 1 {
                        stop
                    } else {
                        start + step * i as f64
                    }
                })
                .collect()
        }
    }
}

fn format_degrees(value: f64) -> String {
    let rounded = (value * 1e6).round() / 1e6;
    format!("{}", rounded)
}

/// Longitude label such as `30°E`, `45.5°W` or `0°`.
pub fn format_longitude(lon: f64) -> String {
    let mut wrapped = floor_mod(lon + 180.0, 360.0) - 180.0;
    if wrapped == -180.0 && lon > 0.0 {
        wrapped = 180.0;
    }

    if wrapped == 0.0 || wrapped.abs() == 180.0 {
        format!("{}°", format_degrees(wrapped.abs()))
    } else if wrapped > 0.0 {
        format!("{}°E", format_degrees(wrapped))
    } else {
        format!("{}°W", format_degrees(-wrapped))
    }
}

/// Latitude label such as `60°N`, `12.5°S` or `0°`.
pub fn format_latitude(lat: f64) -> String {
    if lat == 0.0 {
        "0°".to_string()
    } else if lat > 0.0 {
        format!("{}°N", format_degrees(lat))
    } else {
        format!("{}°S", format_degrees(-lat))
    }
}

/// Parse a region string "west,south,east,north"
pub fn parse_bbox(bbox: &str) -> Result<Region> {
    let parts: Vec<&str> = bbox.split(',').map(str::trim).collect();
    if parts.len() != 4 {
        return Err(CartoeeError::invalid(
            "region",
            "Region must be in format 'west,south,east,north'",
        ));
    }

    let mut values = [0.0f64; 4];
    let names = ["west", "south", "east", "north"];
    for (i, part) in parts.iter().enumerate() {
        values[i] = part.parse::<f64>().map_err(|_| {
            CartoeeError::invalid("region", format!("Invalid {}: {}", names[i], part))
        })?;
    }

    let [west, south, east, north] = values;
    if south > north {
        return Err(CartoeeError::invalid(
            "region",
            format!("south ({}) must be <= north ({})", south, north),
        ));
    }
    if !(-90.0..=90.0).contains(&south) || !(-90.0..=90.0).contains(&north) {
        return Err(CartoeeError::invalid(
            "region",
            "Latitude must be in the range -90 to 90",
        ));
    }

    Ok(Region::new(west, south, east, north))
}
