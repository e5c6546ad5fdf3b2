use crate::shape::curve::Segment;
use crate::shape::line::split_runs;
use crate::shape::{Curve, PathBuilder};

type Coordinate<'a, D> = Box<dyn Fn(&D) -> Option<f64> + 'a>;

/// Closed region between a baseline `y0` and a topline `y1`.
///
/// Each run of drawable data becomes one closed sub-path: the topline left to
/// right, then the baseline right to left.
pub struct AreaGenerator<'a, D> {
    x: Coordinate<'a, D>,
    y0: Coordinate<'a, D>,
    y1: Coordinate<'a, D>,
    curve: Curve,
}

impl<'a, D> AreaGenerator<'a, D> {
    pub fn new<X, Y0, Y1>(x: X, y0: Y0, y1: Y1) -> Self
    where
        X: Fn(&D) -> Option<f64> + 'a,
        Y0: Fn(&D) -> Option<f64> + 'a,
        Y1: Fn(&D) -> Option<f64> + 'a,
    {
        Self {
            x: Box::new(x),
            y0: Box::new(y0),
            y1: Box::new(y1),
            curve: Curve::Linear,
        }
    }

    /// Area down to a constant pixel baseline, the usual chart floor.
    pub fn with_baseline<X, Y>(x: X, baseline: f64, y: Y) -> Self
    where
        X: Fn(&D) -> Option<f64> + 'a,
        Y: Fn(&D) -> Option<f64> + 'a,
    {
        Self::new(x, move |_| Some(baseline), y)
    }

    #[must_use]
    pub fn with_curve(mut self, curve: Curve) -> Self {
        self.curve = curve;
        self
    }

    fn edges(&self, datum: &D) -> Option<(f64, f64, f64)> {
        let finite = |value: Option<f64>| value.filter(|v| v.is_finite());
        Some((
            finite((self.x)(datum))?,
            finite((self.y0)(datum))?,
            finite((self.y1)(datum))?,
        ))
    }

    pub fn generate(&self, data: &[D]) -> String {
        let mut path = PathBuilder::new();
        for run in split_runs(data.iter().map(|datum| self.edges(datum))) {
            let top: Vec<(f64, f64)> = run.iter().map(|&(x, _, y1)| (x, y1)).collect();
            let bottom: Vec<(f64, f64)> = run.iter().rev().map(|&(x, y0, _)| (x, y0)).collect();
            self.curve.trace(&mut path, &top, Segment::AreaTop);
            self.curve.trace(&mut path, &bottom, Segment::AreaBottom);
        }
        path.finish()
    }
}

impl<D> std::fmt::Debug for AreaGenerator<'_, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AreaGenerator")
            .field("curve", &self.curve)
            .finish_non_exhaustive()
    }
}
