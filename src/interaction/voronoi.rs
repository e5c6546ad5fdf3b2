use crate::error::{ChartError, ChartResult};
use crate::interaction::nearest_2d;
use crate::shape::PathBuilder;

/// Voronoi partition of a point set, clipped to a bounding box.
///
/// Each cell is the region closer to its site than to any other, which makes
/// cells the natural hover targets for scatter plots. Cells are computed by
/// clipping the box against every perpendicular bisector; coincident sites
/// leave the later duplicates with empty cells.
#[derive(Debug, Clone, PartialEq)]
pub struct VoronoiDiagram {
    sites: Vec<(f64, f64)>,
    bounds: (f64, f64, f64, f64),
    cells: Vec<Vec<(f64, f64)>>,
}

impl VoronoiDiagram {
    /// `bounds` is `(x0, y0, x1, y1)`.
    pub fn new(sites: Vec<(f64, f64)>, bounds: (f64, f64, f64, f64)) -> ChartResult<Self> {
        let (x0, y0, x1, y1) = bounds;
        if ![x0, y0, x1, y1].iter().all(|v| v.is_finite()) || x1 < x0 || y1 < y0 {
            return Err(ChartError::InvalidData(
                "voronoi bounds must be finite with x0 <= x1 and y0 <= y1".to_owned(),
            ));
        }
        let frame = vec![(x0, y0), (x1, y0), (x1, y1), (x0, y1)];
        let cells = sites
            .iter()
            .enumerate()
            .map(|(i, &site)| cell_for(i, site, &sites, frame.clone()))
            .collect();
        Ok(Self {
            sites,
            bounds,
            cells,
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sites.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    #[must_use]
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        self.bounds
    }

    /// Polygon of site `index`, empty when the site has no area.
    #[must_use]
    pub fn cell(&self, index: usize) -> Option<&[(f64, f64)]> {
        self.cells.get(index).map(Vec::as_slice)
    }

    /// Closed path data for the cell, `None` for missing or empty cells.
    #[must_use]
    pub fn cell_path(&self, index: usize) -> Option<String> {
        let cell = self.cell(index)?;
        let (&(x, y), rest) = cell.split_first()?;
        let mut path = PathBuilder::new();
        path.move_to(x, y);
        for &(x, y) in rest {
            path.line_to(x, y);
        }
        path.close_path();
        Some(path.finish())
    }

    /// Site whose cell contains `(x, y)`.
    #[must_use]
    pub fn find(&self, x: f64, y: f64) -> Option<usize> {
        nearest_2d(&self.sites, (x, y))
    }
}

fn cell_for(
    index: usize,
    site: (f64, f64),
    sites: &[(f64, f64)],
    mut polygon: Vec<(f64, f64)>,
) -> Vec<(f64, f64)> {
    if !site.0.is_finite() || !site.1.is_finite() {
        return Vec::new();
    }
    for (other_index, &other) in sites.iter().enumerate() {
        if other_index == index || !other.0.is_finite() || !other.1.is_finite() {
            continue;
        }
        if other == site {
            if other_index < index {
                return Vec::new();
            }
            continue;
        }
        polygon = clip_half_plane(&polygon, site, other);
        if polygon.is_empty() {
            break;
        }
    }
    polygon
}

/// Keeps the part of `polygon` at least as close to `site` as to `other`.
fn clip_half_plane(polygon: &[(f64, f64)], site: (f64, f64), other: (f64, f64)) -> Vec<(f64, f64)> {
    let normal = (other.0 - site.0, other.1 - site.1);
    let mid = ((site.0 + other.0) / 2.0, (site.1 + other.1) / 2.0);
    let side = |p: (f64, f64)| (p.0 - mid.0) * normal.0 + (p.1 - mid.1) * normal.1;

    let mut out = Vec::with_capacity(polygon.len() + 1);
    for (i, &current) in polygon.iter().enumerate() {
        let next = polygon[(i + 1) % polygon.len()];
        let (sc, sn) = (side(current), side(next));
        if sc <= 0.0 {
            out.push(current);
        }
        if (sc < 0.0 && sn > 0.0) || (sc > 0.0 && sn < 0.0) {
            let t = sc / (sc - sn);
            out.push((
                current.0 + (next.0 - current.0) * t,
                current.1 + (next.1 - current.1) * t,
            ));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::clip_half_plane;

    #[test]
    fn clipping_square_by_vertical_bisector_halves_it() {
        let square = [(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)];
        let clipped = clip_half_plane(&square, (2.0, 5.0), (8.0, 5.0));
        assert_eq!(clipped, vec![(0.0, 0.0), (5.0, 0.0), (5.0, 10.0), (0.0, 10.0)]);
    }
}
