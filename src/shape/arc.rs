use std::f64::consts::{FRAC_PI_2, TAU};

use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};
use crate::shape::PathBuilder;

const EPSILON: f64 = 1e-12;

/// Annular sector generator. Angles are radians, 0 at 12 o'clock, clockwise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcGenerator {
    inner_radius: f64,
    outer_radius: f64,
    pad_angle: f64,
    pad_radius: Option<f64>,
}

impl ArcGenerator {
    pub fn new(inner_radius: f64, outer_radius: f64) -> ChartResult<Self> {
        if !inner_radius.is_finite()
            || !outer_radius.is_finite()
            || inner_radius < 0.0
            || outer_radius < 0.0
        {
            return Err(ChartError::InvalidData(
                "arc radii must be finite and >= 0".to_owned(),
            ));
        }
        Ok(Self {
            inner_radius,
            outer_radius,
            pad_angle: 0.0,
            pad_radius: None,
        })
    }

    /// Gap between adjacent arcs, kept at constant width along the radius
    /// `pad_radius` (defaults to `sqrt(inner² + outer²)`).
    #[must_use]
    pub fn with_pad_angle(mut self, pad_angle: f64) -> Self {
        self.pad_angle = if pad_angle.is_finite() { pad_angle.max(0.0) } else { 0.0 };
        self
    }

    #[must_use]
    pub fn with_pad_radius(mut self, pad_radius: f64) -> Self {
        self.pad_radius = Some(pad_radius);
        self
    }

    #[must_use]
    pub fn inner_radius(&self) -> f64 {
        self.inner_radius
    }

    #[must_use]
    pub fn outer_radius(&self) -> f64 {
        self.outer_radius
    }

    /// Path data for the sector between `start_angle` and `end_angle`.
    #[must_use]
    pub fn path(&self, start_angle: f64, end_angle: f64) -> String {
        let mut path = PathBuilder::new();
        let (mut r0, mut r1) = (self.inner_radius, self.outer_radius);
        if r1 < r0 {
            std::mem::swap(&mut r0, &mut r1);
        }
        let a0 = start_angle - FRAC_PI_2;
        let a1 = end_angle - FRAC_PI_2;
        let da = (a1 - a0).abs();
        let clockwise = a1 > a0;

        if r1 <= EPSILON {
            path.move_to(0.0, 0.0);
        } else if da > TAU - EPSILON {
            path.move_to(r1 * a0.cos(), r1 * a0.sin());
            path.arc(0.0, 0.0, r1, a0, a1, !clockwise);
            if r0 > EPSILON {
                path.move_to(r0 * a1.cos(), r0 * a1.sin());
                path.arc(0.0, 0.0, r0, a1, a0, clockwise);
            }
        } else {
            let (mut a01, mut a11, mut a00, mut a10) = (a0, a1, a0, a1);
            let (mut da0, mut da1) = (da, da);
            let half_pad = self.pad_angle / 2.0;
            let pad_radius = self
                .pad_radius
                .unwrap_or_else(|| (r0 * r0 + r1 * r1).sqrt());

            if half_pad > EPSILON && pad_radius > EPSILON {
                let direction = if clockwise { 1.0 } else { -1.0 };
                let p0 = (pad_radius / r0 * half_pad.sin()).asin();
                let p1 = (pad_radius / r1 * half_pad.sin()).asin();
                da0 -= p0 * 2.0;
                if da0 > EPSILON {
                    a00 += p0 * direction;
                    a10 -= p0 * direction;
                } else {
                    da0 = 0.0;
                    a00 = (a0 + a1) / 2.0;
                    a10 = a00;
                }
                da1 -= p1 * 2.0;
                if da1 > EPSILON {
                    a01 += p1 * direction;
                    a11 -= p1 * direction;
                } else {
                    da1 = 0.0;
                    a01 = (a0 + a1) / 2.0;
                    a11 = a01;
                }
            }

            path.move_to(r1 * a01.cos(), r1 * a01.sin());
            if da1 > EPSILON {
                path.arc(0.0, 0.0, r1, a01, a11, !clockwise);
            }
            if r0 > EPSILON && da0 > EPSILON {
                path.arc(0.0, 0.0, r0, a10, a00, clockwise);
            } else {
                path.line_to(r0 * a10.cos(), r0 * a10.sin());
            }
        }
        path.close_path();
        path.finish()
    }

    /// Midpoint of the sector, where a label sits.
    #[must_use]
    pub fn centroid(&self, start_angle: f64, end_angle: f64) -> (f64, f64) {
        let r = (self.inner_radius + self.outer_radius) / 2.0;
        let a = (start_angle + end_angle) / 2.0 - FRAC_PI_2;
        (a.cos() * r, a.sin() * r)
    }
}

/// Order in which slices are laid out around the circle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PieSort {
    #[default]
    Descending,
    Ascending,
    /// Keep data order.
    None,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PieSlice {
    /// Position of the datum in the input.
    pub index: usize,
    /// Position of the slice around the circle.
    pub rank: usize,
    pub value: f64,
    pub start_angle: f64,
    pub end_angle: f64,
    pub pad_angle: f64,
}

/// Turns values into consecutive slices sharing a sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PieLayout {
    start_angle: f64,
    end_angle: f64,
    pad_angle: f64,
    sort: PieSort,
}

impl Default for PieLayout {
    fn default() -> Self {
        Self {
            start_angle: 0.0,
            end_angle: TAU,
            pad_angle: 0.0,
            sort: PieSort::Descending,
        }
    }
}

impl PieLayout {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_angles(mut self, start_angle: f64, end_angle: f64) -> Self {
        self.start_angle = start_angle;
        self.end_angle = end_angle;
        self
    }

    #[must_use]
    pub fn with_pad_angle(mut self, pad_angle: f64) -> Self {
        self.pad_angle = pad_angle.max(0.0);
        self
    }

    #[must_use]
    pub fn with_sort(mut self, sort: PieSort) -> Self {
        self.sort = sort;
        self
    }

    /// One slice per value, returned in input order. Non-positive and NaN
    /// values get empty slices.
    #[must_use]
    pub fn layout(&self, values: &[f64]) -> Vec<PieSlice> {
        let n = values.len();
        if n == 0 {
            return Vec::new();
        }
        let sweep = (self.end_angle - self.start_angle).clamp(-TAU, TAU);
        let pad = (sweep.abs() / n as f64).min(self.pad_angle);
        let signed_pad = if sweep < 0.0 { -pad } else { pad };
        let sum: f64 = values.iter().filter(|v| **v > 0.0).sum();
        let k = if sum > 0.0 {
            (sweep - n as f64 * signed_pad) / sum
        } else {
            0.0
        };

        let mut order: Vec<usize> = (0..n).collect();
        match self.sort {
            PieSort::Descending => order.sort_by(|a, b| values[*b].total_cmp(&values[*a])),
            PieSort::Ascending => order.sort_by(|a, b| values[*a].total_cmp(&values[*b])),
            PieSort::None => {}
        }

        let mut slices = vec![
            PieSlice {
                index: 0,
                rank: 0,
                value: 0.0,
                start_angle: 0.0,
                end_angle: 0.0,
                pad_angle: pad,
            };
            n
        ];
        let mut angle = self.start_angle;
        for (rank, &index) in order.iter().enumerate() {
            let value = values[index];
            let end = angle + if value > 0.0 { value * k } else { 0.0 } + signed_pad;
            slices[index] = PieSlice {
                index,
                rank,
                value,
                start_angle: angle,
                end_angle: end,
                pad_angle: pad,
            };
            angle = end;
        }
        slices
    }

    pub fn layout_by<D, F>(&self, data: &[D], value: F) -> Vec<PieSlice>
    where
        F: Fn(&D) -> f64,
    {
        let values: Vec<f64> = data.iter().map(value).collect();
        self.layout(&values)
    }
}
