use std::f64::consts::TAU;

use crate::shape::PathBuilder;
use crate::shape::geo::{GeoObject, Geometry, Position, Projection};
use crate::shape::line::split_runs;

/// Axis-aligned pixel box, `(x0, y0)` top-left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelBounds {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl PixelBounds {
    #[must_use]
    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    fn include(bounds: Option<Self>, (x, y): (f64, f64)) -> Option<Self> {
        Some(match bounds {
            None => Self {
                x0: x,
                y0: y,
                x1: x,
                y1: y,
            },
            Some(b) => Self {
                x0: b.x0.min(x),
                y0: b.y0.min(y),
                x1: b.x1.max(x),
                y1: b.y1.max(y),
            },
        })
    }
}

/// Projected pieces of a geographic object.
#[derive(Debug, Default)]
struct Projected {
    points: Vec<(f64, f64)>,
    /// Visible runs and whether each closes back on itself.
    runs: Vec<(Vec<(f64, f64)>, bool)>,
}

/// Draws and measures geographic objects through a projection.
#[derive(Debug, Clone, Copy)]
pub struct GeoPath<'p> {
    projection: &'p Projection,
    point_radius: f64,
}

impl<'p> GeoPath<'p> {
    #[must_use]
    pub fn new(projection: &'p Projection) -> Self {
        Self {
            projection,
            point_radius: 4.5,
        }
    }

    #[must_use]
    pub fn with_point_radius(mut self, point_radius: f64) -> Self {
        self.point_radius = point_radius.max(0.0);
        self
    }

    /// Path data; points become small circles. Empty when nothing is visible.
    #[must_use]
    pub fn path(&self, object: GeoObject<'_>) -> String {
        let projected = self.project(object);
        let mut path = PathBuilder::new();
        for (run, closed) in &projected.runs {
            let Some(&(x, y)) = run.first() else {
                continue;
            };
            path.move_to(x, y);
            for &(x, y) in &run[1..] {
                path.line_to(x, y);
            }
            if *closed {
                path.close_path();
            }
        }
        for &(x, y) in &projected.points {
            path.move_to(x + self.point_radius, y);
            path.arc(x, y, self.point_radius, 0.0, TAU, false);
        }
        path.finish()
    }

    #[must_use]
    pub fn bounds(&self, object: GeoObject<'_>) -> Option<PixelBounds> {
        let projected = self.project(object);
        projected
            .runs
            .iter()
            .flat_map(|(run, _)| run.iter().copied())
            .chain(projected.points.iter().copied())
            .fold(None, PixelBounds::include)
    }

    fn project(&self, object: GeoObject<'_>) -> Projected {
        let mut projected = Projected::default();
        match object {
            GeoObject::Sphere => {
                let outline = self.projection.outline();
                if !outline.is_empty() {
                    projected.runs.push((outline, true));
                }
            }
            GeoObject::Geometry(geometry) => self.project_geometry(geometry, &mut projected),
            GeoObject::Feature(feature) => {
                if let Some(geometry) = &feature.geometry {
                    self.project_geometry(geometry, &mut projected);
                }
            }
            GeoObject::Collection(collection) => {
                for feature in &collection.features {
                    if let Some(geometry) = &feature.geometry {
                        self.project_geometry(geometry, &mut projected);
                    }
                }
            }
        }
        projected
    }

    fn project_geometry(&self, geometry: &Geometry, out: &mut Projected) {
        match geometry {
            Geometry::Point { coordinates } => out.points.extend(self.projection.project(*coordinates)),
            Geometry::MultiPoint { coordinates } => out
                .points
                .extend(coordinates.iter().filter_map(|p| self.projection.project(*p))),
            Geometry::LineString { coordinates } => self.project_line(coordinates, out),
            Geometry::MultiLineString { coordinates } => {
                for line in coordinates {
                    self.project_line(line, out);
                }
            }
            Geometry::Polygon { coordinates } => self.project_polygon(coordinates, out),
            Geometry::MultiPolygon { coordinates } => {
                for polygon in coordinates {
                    self.project_polygon(polygon, out);
                }
            }
            Geometry::GeometryCollection { geometries } => {
                for geometry in geometries {
                    self.project_geometry(geometry, out);
                }
            }
        }
    }

    fn project_line(&self, line: &[Position], out: &mut Projected) {
        let runs = split_runs(line.iter().map(|p| self.projection.project(*p)));
        out.runs.extend(runs.into_iter().map(|run| (run, false)));
    }

    fn project_polygon(&self, rings: &[Vec<Position>], out: &mut Projected) {
        for ring in rings {
            // GeoJSON rings repeat the first position at the end.
            let open = match ring.as_slice() {
                [first, .., last] if first == last => &ring[..ring.len() - 1],
                _ => ring.as_slice(),
            };
            let projected: Vec<Option<(f64, f64)>> =
                open.iter().map(|p| self.projection.project(*p)).collect();
            let fully_visible = projected.iter().all(Option::is_some);
            let runs = split_runs(projected);
            out.runs
                .extend(runs.into_iter().map(|run| (run, fully_visible)));
        }
    }
}
