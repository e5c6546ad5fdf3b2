use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI, TAU};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ChartResult, DomainError};
use crate::shape::geo::{GeoObject, GeoPath, Position};

/// Reference scale used while fitting, before the final scale is derived.
const FIT_SCALE: f64 = 150.0;
/// Latitude where the Mercator square ends.
const MERCATOR_MAX_LAT: f64 = 85.051_128_779_806_59;
/// Angular spacing of the sampled sphere outline.
const OUTLINE_STEP_DEGREES: f64 = 2.5;

const EQUAL_EARTH_A1: f64 = 1.340_264;
const EQUAL_EARTH_A2: f64 = -0.081_106;
const EQUAL_EARTH_A3: f64 = 0.000_893;
const EQUAL_EARTH_A4: f64 = 0.003_796;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectionKind {
    Equirectangular,
    Mercator,
    #[default]
    EqualEarth,
    /// Globe seen from space; the far hemisphere is not drawn.
    Orthographic,
}

impl ProjectionKind {
    fn default_scale(self) -> f64 {
        match self {
            Self::Equirectangular => 152.63,
            Self::Mercator => 961.0 / TAU,
            Self::EqualEarth => 177.158,
            Self::Orthographic => 249.5,
        }
    }

    /// Unit-sphere projection of radians, y pointing up.
    fn forward(self, lambda: f64, phi: f64) -> Option<(f64, f64)> {
        match self {
            Self::Equirectangular => Some((lambda, phi)),
            Self::Mercator => {
                let limit = MERCATOR_MAX_LAT.to_radians();
                let phi = phi.clamp(-limit, limit);
                Some((lambda, (FRAC_PI_4 + phi / 2.0).tan().ln()))
            }
            Self::EqualEarth => {
                let m = 3f64.sqrt() / 2.0;
                let l = (m * phi.sin()).asin();
                let l2 = l * l;
                let l6 = l2 * l2 * l2;
                let x = lambda * l.cos()
                    / (m * (EQUAL_EARTH_A1
                        + 3.0 * EQUAL_EARTH_A2 * l2
                        + l6 * (7.0 * EQUAL_EARTH_A3 + 9.0 * EQUAL_EARTH_A4 * l2)));
                let y = l
                    * (EQUAL_EARTH_A1
                        + EQUAL_EARTH_A2 * l2
                        + l6 * (EQUAL_EARTH_A3 + EQUAL_EARTH_A4 * l2));
                Some((x, y))
            }
            Self::Orthographic => {
                if phi.cos() * lambda.cos() < -1e-9 {
                    return None;
                }
                Some((phi.cos() * lambda.sin(), phi.sin()))
            }
        }
    }
}

/// A map projection with scale, translation and rotation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    kind: ProjectionKind,
    scale: f64,
    translate: (f64, f64),
    /// Degrees of longitude and latitude rotation applied before projecting.
    rotate: (f64, f64),
}

impl Projection {
    #[must_use]
    pub fn new(kind: ProjectionKind) -> Self {
        Self {
            kind,
            scale: kind.default_scale(),
            translate: (480.0, 250.0),
            rotate: (0.0, 0.0),
        }
    }

    #[must_use]
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    #[must_use]
    pub fn with_translate(mut self, x: f64, y: f64) -> Self {
        self.translate = (x, y);
        self
    }

    #[must_use]
    pub fn with_rotate(mut self, lambda: f64, phi: f64) -> Self {
        self.rotate = (lambda, phi);
        self
    }

    #[must_use]
    pub fn kind(&self) -> ProjectionKind {
        self.kind
    }

    #[must_use]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    #[must_use]
    pub fn translate(&self) -> (f64, f64) {
        self.translate
    }

    /// Pixel position of a lon/lat pair, `None` when it is not visible.
    #[must_use]
    pub fn project(&self, position: Position) -> Option<(f64, f64)> {
        if !position.lon.is_finite() || !position.lat.is_finite() {
            return None;
        }
        let (lambda, phi) = self.rotated(position.lon.to_radians(), position.lat.to_radians());
        let (x, y) = self.kind.forward(lambda, phi)?;
        Some(self.to_pixels(x, y))
    }

    fn to_pixels(&self, x: f64, y: f64) -> (f64, f64) {
        (self.translate.0 + self.scale * x, self.translate.1 - self.scale * y)
    }

    fn rotated(&self, lambda: f64, phi: f64) -> (f64, f64) {
        let mut lambda = lambda + self.rotate.0.to_radians();
        if lambda.abs() > PI {
            lambda -= (lambda / TAU).round() * TAU;
        }
        let delta_phi = self.rotate.1.to_radians();
        if delta_phi == 0.0 {
            return (lambda, phi);
        }
        let cos_phi = phi.cos();
        let x = lambda.cos() * cos_phi;
        let y = lambda.sin() * cos_phi;
        let z = phi.sin();
        let k = z * delta_phi.cos() + x * delta_phi.sin();
        (
            y.atan2(x * delta_phi.cos() - z * delta_phi.sin()),
            k.clamp(-1.0, 1.0).asin(),
        )
    }

    /// Closed ring tracing the edge of the globe, in pixels.
    #[must_use]
    pub fn outline(&self) -> Vec<(f64, f64)> {
        let step = OUTLINE_STEP_DEGREES.to_radians();
        let count = (TAU / step).round() as usize;
        match self.kind {
            ProjectionKind::Orthographic => (0..=count)
                .map(|i| {
                    let theta = i as f64 * step;
                    self.to_pixels(theta.cos(), theta.sin())
                })
                .collect(),
            kind => {
                let half = count / 2;
                let edge = |lambda: f64, i: usize| {
                    let phi = -FRAC_PI_2 + i as f64 * PI / half as f64;
                    kind.forward(lambda, phi).map(|(x, y)| self.to_pixels(x, y))
                };
                let east = (0..=half).filter_map(|i| edge(PI, i));
                let west = (0..=half).rev().filter_map(|i| edge(-PI, i));
                let mut ring: Vec<(f64, f64)> = east.chain(west).collect();
                if let Some(first) = ring.first().copied() {
                    ring.push(first);
                }
                ring
            }
        }
    }

    /// Rescales and translates so `object` spans exactly `width` pixels,
    /// with its top edge at y = 0.
    pub fn fit_width(self, width: f64, object: GeoObject<'_>) -> ChartResult<Self> {
        let reference = self.with_scale(FIT_SCALE).with_translate(0.0, 0.0);
        let bounds = GeoPath::new(&reference)
            .bounds(object)
            .ok_or_else(|| DomainError::empty("projection fit"))?;
        let span = bounds.x1 - bounds.x0;
        if !(span > 0.0) {
            return Err(DomainError::Degenerate {
                name: "projection fit".to_owned(),
                value: bounds.x0,
            }
            .into());
        }

        let k = width / span;
        let x = (width - k * (bounds.x1 + bounds.x0)) / 2.0;
        let y = -k * bounds.y0;
        debug!(width, scale = FIT_SCALE * k, x, y, "projection fitted to width");
        Ok(self.with_scale(FIT_SCALE * k).with_translate(x, y))
    }
}
