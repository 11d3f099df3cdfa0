//! View padding.

use tracing::debug;

use crate::axes::MapAxes;
use crate::geo::{pad_extent, Extent, Pair};

/// Fraction of each span added on both sides when no factor is given
pub const DEFAULT_PAD_FACTOR: f64 = 0.05;

/// Grow the view of `ax` by `span * factor` on each side of each axis and
/// return the new extent. Negative factors shrink the view.
pub fn pad_view<A>(ax: &mut A, factor: Pair<f64>) -> Extent
where
    A: MapAxes + ?Sized,
{
    let before = ax.extent();
    let padded = pad_extent(before, factor.x(), factor.y());

    ax.set_xlim(padded.xmin, padded.xmax);
    ax.set_ylim(padded.ymin, padded.ymax);

    debug!(before = ?before, after = ?padded, "Padded view");
    padded
}
