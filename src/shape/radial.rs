use crate::shape::curve::Segment;
use crate::shape::line::split_runs;
use crate::shape::{Curve, PathBuilder};

type Coordinate<'a, D> = Box<dyn Fn(&D) -> Option<f64> + 'a>;

/// Cartesian offset for a polar position. Angle 0 points to 12 o'clock and
/// angles grow clockwise, matching screen coordinates where y grows down.
#[must_use]
pub fn polar_to_cartesian(angle: f64, radius: f64) -> (f64, f64) {
    (radius * angle.sin(), -radius * angle.cos())
}

/// Line through points given as (angle, radius) around the origin.
pub struct RadialLineGenerator<'a, D> {
    angle: Coordinate<'a, D>,
    radius: Coordinate<'a, D>,
    curve: Curve,
}

impl<'a, D> RadialLineGenerator<'a, D> {
    pub fn new<A, R>(angle: A, radius: R) -> Self
    where
        A: Fn(&D) -> Option<f64> + 'a,
        R: Fn(&D) -> Option<f64> + 'a,
    {
        Self {
            angle: Box::new(angle),
            radius: Box::new(radius),
            curve: Curve::Linear,
        }
    }

    #[must_use]
    pub fn with_curve(mut self, curve: Curve) -> Self {
        self.curve = curve;
        self
    }

    pub fn point(&self, datum: &D) -> Option<(f64, f64)> {
        let angle = (self.angle)(datum).filter(|v| v.is_finite())?;
        let radius = (self.radius)(datum).filter(|v| v.is_finite())?;
        Some(polar_to_cartesian(angle, radius))
    }

    pub fn generate(&self, data: &[D]) -> String {
        let mut path = PathBuilder::new();
        for run in split_runs(data.iter().map(|datum| self.point(datum))) {
            self.curve.trace(&mut path, &run, Segment::Line);
        }
        path.finish()
    }
}

impl<D> std::fmt::Debug for RadialLineGenerator<'_, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RadialLineGenerator")
            .field("curve", &self.curve)
            .finish_non_exhaustive()
    }
}
