//! Gridlines and tick labels.

use tracing::{debug, info};

use crate::axes::{Axis, GridlineStyle, MapAxes, Rotation, Tick};
use crate::error::{CartoeeError, Result};
use crate::geo::{
    buffer_box, ensure_finite_bounds, format_latitude, format_longitude, linspace, stepped_range,
    Pair,
};

/// How gridline positions are chosen. Per axis, explicit coordinates win
/// over `interval`, which wins over `n_ticks`.
#[derive(Debug, Clone)]
pub struct GridlineOptions {
    /// Spacing in degrees
    pub interval: Option<Pair<f64>>,
    /// Number of evenly spaced lines over the current view
    pub n_ticks: Option<Pair<usize>>,
    pub xs: Option<Vec<f64>>,
    pub ys: Option<Vec<f64>>,
    /// Round the view bounds outward to the interval before stepping
    pub buffer_out: bool,
    pub xtick_rotation: Rotation,
    pub ytick_rotation: Rotation,
    pub style: GridlineStyle,
}

impl Default for GridlineOptions {
    fn default() -> Self {
        Self {
            interval: None,
            n_ticks: None,
            xs: None,
            ys: None,
            buffer_out: true,
            xtick_rotation: Rotation::Horizontal,
            ytick_rotation: Rotation::Horizontal,
            style: GridlineStyle::default(),
        }
    }
}

/// Positions that were drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct Gridlines {
    /// Meridians
    pub xs: Vec<f64>,
    /// Parallels
    pub ys: Vec<f64>,
    pub x_ticks: Vec<Tick>,
    pub y_ticks: Vec<Tick>,
}

/// Draw gridlines on `ax` and label those inside the current view.
pub fn add_gridlines<A>(ax: &mut A, options: &GridlineOptions) -> Result<Gridlines>
where
    A: MapAxes + ?Sized,
{
    let view = ax.extent();
    debug!(
        extent = ?view,
        interval = ?options.interval,
        n_ticks = ?options.n_ticks,
        buffer_out = options.buffer_out,
        "Laying out gridlines"
    );

    let xs = axis_positions(
        Axis::X,
        options.xs.as_deref(),
        options.interval.map(|p| p.x()),
        options.n_ticks.map(|p| p.x()),
        (view.xmin, view.xmax),
        |interval| {
            let b = buffer_box(view, interval);
            (b.xmin, b.xmax)
        },
        options.buffer_out,
    )?;
    let ys = axis_positions(
        Axis::Y,
        options.ys.as_deref(),
        options.interval.map(|p| p.y()),
        options.n_ticks.map(|p| p.y()),
        (view.ymin, view.ymax),
        |interval| {
            let b = buffer_box(view, interval);
            (b.ymin, b.ymax)
        },
        options.buffer_out,
    )?;

    let x_ticks: Vec<Tick> = xs
        .iter()
        .filter(|&&x| view.contains_x(x))
        .map(|&x| Tick {
            value: x,
            label: format_longitude(x),
        })
        .collect();
    let y_ticks: Vec<Tick> = ys
        .iter()
        .filter(|&&y| view.contains_y(y))
        .map(|&y| Tick {
            value: y,
            label: format_latitude(y),
        })
        .collect();

    ax.gridlines(&xs, &ys, &options.style)?;
    ax.set_ticks(Axis::X, x_ticks.clone(), options.xtick_rotation)?;
    ax.set_ticks(Axis::Y, y_ticks.clone(), options.ytick_rotation)?;

    info!(
        meridians = xs.len(),
        parallels = ys.len(),
        x_ticks = x_ticks.len(),
        y_ticks = y_ticks.len(),
        "Gridlines added"
    );
    Ok(Gridlines {
        xs,
        ys,
        x_ticks,
        y_ticks,
    })
}

fn axis_positions<F>(
    axis: Axis,
    explicit: Option<&[f64]>,
    interval: Option<f64>,
    n_ticks: Option<usize>,
    bounds: (f64, f64),
    buffered: F,
    buffer_out: bool,
) -> Result<Vec<f64>>
where
    F: Fn(f64) -> (f64, f64),
{
    if let Some(values) = explicit {
        return Ok(values.to_vec());
    }

    if let Some(interval) = interval {
        if !interval.is_finite() || interval <= 0.0 {
            return Err(CartoeeError::invalid(
                "interval",
                format!("interval must be a positive number, got {}", interval),
            ));
        }
        let (lo, hi) = if buffer_out {
            buffered(interval)
        } else {
            bounds
        };
        return stepped_range(lo, hi, interval);
    }

    if let Some(n) = n_ticks {
        ensure_finite_bounds(bounds.0, bounds.1)?;
        return Ok(linspace(bounds.0, bounds.1, n));
    }

    let name = match axis {
        Axis::X => "xs",
        Axis::Y => "ys",
    };
    Err(CartoeeError::conflict(format!(
        "one of {}, interval or n_ticks must be provided",
        name
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unbuffered(bounds: (f64, f64)) -> impl Fn(f64) -> (f64, f64) {
        move |_| bounds
    }

    #[test]
    fn test_explicit_positions_win() {
        let xs = axis_positions(
            Axis::X,
            Some(&[1.0, 3.0, 50.0]),
            Some(2.0),
            Some(4),
            (0.0, 10.0),
            unbuffered((0.0, 10.0)),
            true,
        )
        .unwrap();
        assert_eq!(xs, vec![1.0, 3.0, 50.0]);
    }

    #[test]
    fn test_interval_uses_buffered_bounds() {
        let ys = axis_positions(
            Axis::Y,
            None,
            Some(5.0),
            None,
            (1.0, 9.0),
            |_| (0.0, 10.0),
            true,
        )
        .unwrap();
        assert_eq!(ys, vec![0.0, 5.0, 10.0]);
    }

    #[test]
    fn test_zero_interval_rejected() {
        let result = axis_positions(
            Axis::X,
            None,
            Some(0.0),
            None,
            (0.0, 10.0),
            unbuffered((0.0, 10.0)),
            false,
        );
        assert!(matches!(
            result,
            Err(CartoeeError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_unbounded_view_rejected_for_n_ticks() {
        let result = axis_positions(
            Axis::X,
            None,
            None,
            Some(5),
            (f64::NEG_INFINITY, f64::INFINITY),
            unbuffered((f64::NEG_INFINITY, f64::INFINITY)),
            true,
        );
        match result {
            Err(CartoeeError::InvalidParameter { param, .. }) => assert_eq!(param, "extent"),
            other => panic!("expected invalid extent, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_spacing_is_conflict() {
        let result = axis_positions(
            Axis::Y,
            None,
            None,
            None,
            (0.0, 10.0),
            unbuffered((0.0, 10.0)),
            true,
        );
        assert!(matches!(result, Err(CartoeeError::ConfigConflict { .. })));
    }
}
