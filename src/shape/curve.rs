use serde::{Deserialize, Serialize};

use crate::shape::PathBuilder;

/// Interpolation between consecutive points of a line or area edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Curve {
    #[default]
    Linear,
    /// Linear, with the last point joined back to the first.
    LinearClosed,
    /// Vertical step halfway between points.
    Step,
    /// Vertical step at the start of each segment.
    StepBefore,
    /// Vertical step at the end of each segment.
    StepAfter,
    /// Uniform cubic B-spline through the first and last points.
    Basis,
    /// Cubic Hermite spline that preserves monotonicity in y, for points
    /// ordered by x.
    MonotoneX,
}

/// Role of a point run inside the shape being drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Segment {
    /// Standalone line: starts with a move.
    Line,
    /// Upper edge of an area: starts with a move, left open.
    AreaTop,
    /// Baseline of an area walked backwards: joins the top edge and closes.
    AreaBottom,
}

impl Curve {
    /// Path data for one unbroken run of points.
    #[must_use]
    pub fn path(self, points: &[(f64, f64)]) -> String {
        let mut path = PathBuilder::new();
        self.trace(&mut path, points, Segment::Line);
        path.finish()
    }

    pub(crate) fn trace(self, path: &mut PathBuilder, points: &[(f64, f64)], segment: Segment) {
        let Some(&(x, y)) = points.first() else {
            return;
        };
        if segment == Segment::AreaBottom {
            path.line_to(x, y);
        } else {
            path.move_to(x, y);
        }

        match self {
            Self::Linear | Self::LinearClosed => {
                for &(x, y) in &points[1..] {
                    path.line_to(x, y);
                }
            }
            Self::Step => step(path, points, 0.5),
            Self::StepBefore => step(path, points, 0.0),
            Self::StepAfter => step(path, points, 1.0),
            Self::Basis => basis(path, points),
            Self::MonotoneX => monotone_x(path, points),
        }

        let closes = match segment {
            Segment::AreaBottom => true,
            Segment::AreaTop => false,
            Segment::Line => self == Self::LinearClosed || points.len() == 1,
        };
        if closes {
            path.close_path();
        }
    }
}

fn step(path: &mut PathBuilder, points: &[(f64, f64)], t: f64) {
    for pair in points.windows(2) {
        let ((x0, y0), (x1, y1)) = (pair[0], pair[1]);
        if t <= 0.0 {
            path.line_to(x0, y1);
            path.line_to(x1, y1);
        } else {
            let mid = x0 * (1.0 - t) + x1 * t;
            path.line_to(mid, y0);
            path.line_to(mid, y1);
        }
    }
    if 0.0 < t && t < 1.0 && points.len() >= 2 {
        let (x, y) = points[points.len() - 1];
        path.line_to(x, y);
    }
}

fn basis_segment(path: &mut PathBuilder, a: (f64, f64), b: (f64, f64), c: (f64, f64)) {
    path.bezier_curve_to(
        (2.0 * a.0 + b.0) / 3.0,
        (2.0 * a.1 + b.1) / 3.0,
        (a.0 + 2.0 * b.0) / 3.0,
        (a.1 + 2.0 * b.1) / 3.0,
        (a.0 + 4.0 * b.0 + c.0) / 6.0,
        (a.1 + 4.0 * b.1 + c.1) / 6.0,
    );
}

fn basis(path: &mut PathBuilder, points: &[(f64, f64)]) {
    let n = points.len();
    if n == 2 {
        path.line_to(points[1].0, points[1].1);
        return;
    }
    if n < 3 {
        return;
    }
    let (p0, p1) = (points[0], points[1]);
    path.line_to((5.0 * p0.0 + p1.0) / 6.0, (5.0 * p0.1 + p1.1) / 6.0);
    for window in points.windows(3) {
        basis_segment(path, window[0], window[1], window[2]);
    }
    let (last, before) = (points[n - 1], points[n - 2]);
    basis_segment(path, before, last, last);
    path.line_to(last.0, last.1);
}

fn sign(value: f64) -> f64 {
    if value < 0.0 { -1.0 } else { 1.0 }
}

/// Tangent at `b` from its neighbours, limited so the spline cannot overshoot.
fn interior_slope(a: (f64, f64), b: (f64, f64), c: (f64, f64)) -> f64 {
    let h0 = b.0 - a.0;
    let h1 = c.0 - b.0;
    let zero_toward = |other: f64| if other < 0.0 { -0.0 } else { 0.0 };
    let s0 = (b.1 - a.1) / if h0 != 0.0 { h0 } else { zero_toward(h1) };
    let s1 = (c.1 - b.1) / if h1 != 0.0 { h1 } else { zero_toward(h0) };
    let p = (s0 * h1 + s1 * h0) / (h0 + h1);
    let slope = (sign(s0) + sign(s1)) * s0.abs().min(s1.abs()).min(0.5 * p.abs());
    if slope.is_nan() { 0.0 } else { slope }
}

/// One-sided tangent at an end point given the tangent at the other end.
fn end_slope(a: (f64, f64), b: (f64, f64), t: f64) -> f64 {
    let h = b.0 - a.0;
    if h != 0.0 {
        (3.0 * (b.1 - a.1) / h - t) / 2.0
    } else {
        t
    }
}

fn hermite(path: &mut PathBuilder, a: (f64, f64), b: (f64, f64), t0: f64, t1: f64) {
    let dx = (b.0 - a.0) / 3.0;
    path.bezier_curve_to(a.0 + dx, a.1 + dx * t0, b.0 - dx, b.1 - dx * t1, b.0, b.1);
}

fn monotone_x(path: &mut PathBuilder, points: &[(f64, f64)]) {
    let mut distinct: Vec<(f64, f64)> = Vec::with_capacity(points.len());
    for &point in points {
        if distinct.last() != Some(&point) {
            distinct.push(point);
        }
    }
    let n = distinct.len();
    if n == 2 {
        path.line_to(distinct[1].0, distinct[1].1);
        return;
    }
    if n < 3 {
        return;
    }

    let mut previous_slope = 0.0;
    for i in 2..n {
        let (a, b, c) = (distinct[i - 2], distinct[i - 1], distinct[i]);
        let slope = interior_slope(a, b, c);
        let start_slope = if i == 2 {
            end_slope(a, b, slope)
        } else {
            previous_slope
        };
        hermite(path, a, b, start_slope, slope);
        previous_slope = slope;
    }
    let (a, b) = (distinct[n - 2], distinct[n - 1]);
    hermite(path, a, b, previous_slope, end_slope(a, b, previous_slope));
}

#[cfg(test)]
mod tests {
    use super::interior_slope;

    #[test]
    fn interior_slope_is_zero_at_local_extrema() {
        assert_eq!(interior_slope((0.0, 0.0), (1.0, 5.0), (2.0, 0.0)), 0.0);
    }
}
