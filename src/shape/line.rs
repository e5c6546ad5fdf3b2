use crate::shape::curve::Segment;
use crate::shape::{Curve, PathBuilder};

type Coordinate<'a, D> = Box<dyn Fn(&D) -> Option<f64> + 'a>;
type Defined<'a, D> = Box<dyn Fn(&D) -> bool + 'a>;

/// Turns a data series into line path data.
///
/// A datum is drawn only when the `defined` predicate accepts it and both
/// coordinates are finite; anything else breaks the line into separate runs.
pub struct LineGenerator<'a, D> {
    x: Coordinate<'a, D>,
    y: Coordinate<'a, D>,
    defined: Defined<'a, D>,
    curve: Curve,
}

impl<'a, D> LineGenerator<'a, D> {
    pub fn new<X, Y>(x: X, y: Y) -> Self
    where
        X: Fn(&D) -> Option<f64> + 'a,
        Y: Fn(&D) -> Option<f64> + 'a,
    {
        Self {
            x: Box::new(x),
            y: Box::new(y),
            defined: Box::new(|_| true),
            curve: Curve::Linear,
        }
    }

    #[must_use]
    pub fn with_curve(mut self, curve: Curve) -> Self {
        self.curve = curve;
        self
    }

    #[must_use]
    pub fn with_defined<P>(mut self, defined: P) -> Self
    where
        P: Fn(&D) -> bool + 'a,
    {
        self.defined = Box::new(defined);
        self
    }

    #[must_use]
    pub fn curve(&self) -> Curve {
        self.curve
    }

    /// Pixel position of `datum`, or `None` when it is not drawable.
    pub fn point(&self, datum: &D) -> Option<(f64, f64)> {
        if !(self.defined)(datum) {
            return None;
        }
        let x = (self.x)(datum).filter(|v| v.is_finite())?;
        let y = (self.y)(datum).filter(|v| v.is_finite())?;
        Some((x, y))
    }

    /// Maximal runs of drawable points, in data order.
    pub fn segments(&self, data: &[D]) -> Vec<Vec<(f64, f64)>> {
        split_runs(data.iter().map(|datum| self.point(datum)))
    }

    pub fn generate(&self, data: &[D]) -> String {
        let mut path = PathBuilder::new();
        for run in self.segments(data) {
            self.curve.trace(&mut path, &run, Segment::Line);
        }
        path.finish()
    }
}

impl<D> std::fmt::Debug for LineGenerator<'_, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LineGenerator")
            .field("curve", &self.curve)
            .finish_non_exhaustive()
    }
}

pub(crate) fn split_runs<T, I>(points: I) -> Vec<Vec<T>>
where
    I: IntoIterator<Item = Option<T>>,
{
    let mut runs = Vec::new();
    let mut current = Vec::new();
    for point in points {
        match point {
            Some(point) => current.push(point),
            None if !current.is_empty() => runs.push(std::mem::take(&mut current)),
            None => {}
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs
}
