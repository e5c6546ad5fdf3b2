//! Geographic shapes: GeoJSON input, map projections and path output.

mod path;
mod projection;

pub use path::{GeoPath, PixelBounds};
pub use projection::{Projection, ProjectionKind};

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::core::accessor::Record;

/// Finest spacing, in degrees, [`graticule`] draws lines at.
pub const MIN_GRATICULE_STEP: f64 = 0.1;

/// Longitude and latitude in degrees. Extra GeoJSON ordinates are dropped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub lon: f64,
    pub lat: f64,
}

impl Position {
    #[must_use]
    pub const fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }
}

impl Serialize for Position {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        [self.lon, self.lat].serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Position {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let ordinates = Vec::<f64>::deserialize(deserializer)?;
        match ordinates.as_slice() {
            [lon, lat, ..] => Ok(Self::new(*lon, *lat)),
            _ => Err(D::Error::custom(
                "a position needs at least longitude and latitude",
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Point {
        coordinates: Position,
    },
    MultiPoint {
        coordinates: Vec<Position>,
    },
    LineString {
        coordinates: Vec<Position>,
    },
    MultiLineString {
        coordinates: Vec<Vec<Position>>,
    },
    Polygon {
        coordinates: Vec<Vec<Position>>,
    },
    MultiPolygon {
        coordinates: Vec<Vec<Vec<Position>>>,
    },
    GeometryCollection {
        geometries: Vec<Geometry>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<serde_json::Value>,
    #[serde(default)]
    pub properties: Option<Record>,
    pub geometry: Option<Geometry>,
}

impl Feature {
    /// String property, or a number rendered as text.
    #[must_use]
    pub fn property_text(&self, key: &str) -> Option<String> {
        match self.properties.as_ref()?.get(key)? {
            serde_json::Value::String(text) => Some(text.clone()),
            serde_json::Value::Number(number) => Some(number.to_string()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
}

/// Anything a `GeoPath` can draw or measure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GeoObject<'a> {
    /// Outline of the whole globe in the current projection.
    Sphere,
    Geometry(&'a Geometry),
    Feature(&'a Feature),
    Collection(&'a FeatureCollection),
}

/// Meridians and parallels every `step` degrees, sampled every 2.5 degrees
/// so they bend with the projection.
///
/// Parallels stop at ±80° and only meridians on multiples of 90° reach the
/// poles, which keeps the polar regions readable. Steps below
/// [`MIN_GRATICULE_STEP`] are raised to it; non-positive steps fall back to 10°.
#[must_use]
pub fn graticule(step: f64) -> Geometry {
    const PRECISION: f64 = 2.5;
    const MINOR_LAT: f64 = 80.0;
    const EPSILON: f64 = 1e-9;

    let step = if step.is_finite() && step > 0.0 {
        step.max(MIN_GRATICULE_STEP)
    } else {
        10.0
    };
    let samples = |from: f64, to: f64| -> Vec<f64> {
        let count = ((to - from) / PRECISION).ceil().max(1.0) as usize;
        (0..=count)
            .map(|i| (from + i as f64 * PRECISION).min(to))
            .collect()
    };

    let meridians = (360.0 / step).ceil() as usize;
    let parallels = (2.0 * MINOR_LAT / step + EPSILON).floor() as usize;
    let mut lines = Vec::with_capacity(meridians + parallels + 1);
    for lon in (0..=meridians)
        .map(|i| -180.0 + i as f64 * step)
        .filter(|lon| *lon < 180.0 - EPSILON)
    {
        let reach = if lon % 90.0 == 0.0 { 90.0 } else { MINOR_LAT };
        lines.push(
            samples(-reach, reach)
                .into_iter()
                .map(|lat| Position::new(lon, lat))
                .collect(),
        );
    }
    for lat in (0..=parallels).map(|i| -MINOR_LAT + i as f64 * step) {
        lines.push(
            samples(-180.0, 180.0)
                .into_iter()
                .map(|lon| Position::new(lon, lat))
                .collect(),
        );
    }
    Geometry::MultiLineString { coordinates: lines }
}
