use tracing::trace;

use crate::core::accessor::Accessor;
use crate::core::array;
use crate::core::scale::{ContinuousScale, DomainValue};

/// Index of the datum whose x value is closest to the value under
/// `pointer_x`. Ties go to the earlier datum; unreadable data is skipped.
pub fn nearest_by_x<D, A, S>(data: &[D], x: &A, scale: &S, pointer_x: f64) -> Option<usize>
where
    A: Accessor<D, Output = S::Value>,
    S: ContinuousScale,
{
    if !pointer_x.is_finite() {
        return None;
    }
    let hovered = scale.invert(pointer_x).to_f64();
    let index = array::least_index(data.iter().map(|datum| {
        x.get(datum)
            .map_or(f64::NAN, |value| (value.to_f64() - hovered).abs())
    }));
    trace!(pointer_x, hovered, ?index, field = x.name(), "nearest by x");
    index
}

/// Index of the point closest to `pointer`, i.e. the Voronoi cell it falls
/// in. Non-finite points are skipped.
#[must_use]
pub fn nearest_2d(points: &[(f64, f64)], pointer: (f64, f64)) -> Option<usize> {
    array::least_index(points.iter().map(|&(x, y)| {
        if x.is_finite() && y.is_finite() {
            (x - pointer.0).powi(2) + (y - pointer.1).powi(2)
        } else {
            f64::NAN
        }
    }))
}

/// Like `nearest_2d`, ignoring points farther than `radius`.
#[must_use]
pub fn nearest_2d_within(points: &[(f64, f64)], pointer: (f64, f64), radius: f64) -> Option<usize> {
    nearest_2d(points, pointer).filter(|&index| {
        let (x, y) = points[index];
        (x - pointer.0).hypot(y - pointer.1) <= radius
    })
}
