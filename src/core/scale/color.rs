//! Value to color scales and the color-space interpolators behind them.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::scale::linear::validate_stops;
use crate::core::array;
use crate::error::{ChartError, ChartResult, DomainError};
use crate::render::Color;

/// Color space used when blending between two colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ColorSpace {
    #[default]
    Rgb,
    Hsl,
    Lab,
    Hcl,
}

impl ColorSpace {
    /// Blends `from` toward `to` by `t` in this space. Hue-based spaces take
    /// the shorter way around the color wheel.
    #[must_use]
    pub fn interpolate(self, from: Color, to: Color, t: f64) -> Color {
        let blended = match self {
            Self::Rgb => Color::rgba(
                lerp(from.red, to.red, t),
                lerp(from.green, to.green, t),
                lerp(from.blue, to.blue, t),
                lerp(from.alpha, to.alpha, t),
            ),
            Self::Hsl => {
                let (h0, s0, l0) = rgb_to_hsl(from);
                let (h1, s1, l1) = rgb_to_hsl(to);
                let (h0, h1) = missing_hue(h0, h1, s0, s1);
                hsl_to_rgb(
                    lerp_hue(h0, h1, t),
                    lerp(s0, s1, t),
                    lerp(l0, l1, t),
                    lerp(from.alpha, to.alpha, t),
                )
            }
            Self::Lab => {
                let (l0, a0, b0) = rgb_to_lab(from);
                let (l1, a1, b1) = rgb_to_lab(to);
                lab_to_rgb(
                    lerp(l0, l1, t),
                    lerp(a0, a1, t),
                    lerp(b0, b1, t),
                    lerp(from.alpha, to.alpha, t),
                )
            }
            Self::Hcl => {
                let (h0, c0, l0) = lab_to_hcl(rgb_to_lab(from));
                let (h1, c1, l1) = lab_to_hcl(rgb_to_lab(to));
                let (h0, h1) = missing_hue(h0, h1, c0, c1);
                let h = lerp_hue(h0, h1, t).to_radians();
                let c = lerp(c0, c1, t);
                lab_to_rgb(
                    lerp(l0, l1, t),
                    h.cos() * c,
                    h.sin() * c,
                    lerp(from.alpha, to.alpha, t),
                )
            }
        };
        blended.clamped()
    }
}

/// Maps `t` in `[0, 1]` to a color.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ColorInterpolator {
    /// Evenly spaced color stops blended in the given space.
    Ramp { stops: Vec<Color>, space: ColorSpace },
    /// Cyclical cubehelix rainbow.
    Rainbow,
}

impl ColorInterpolator {
    pub fn ramp(stops: Vec<Color>, space: ColorSpace) -> ChartResult<Self> {
        if stops.len() < 2 {
            return Err(ChartError::InvalidData(
                "color ramp needs at least two stops".to_owned(),
            ));
        }
        Ok(Self::Ramp { stops, space })
    }

    #[must_use]
    pub fn sample(&self, t: f64) -> Color {
        match self {
            Self::Ramp { stops, space } => {
                let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
                let segments = (stops.len() - 1) as f64;
                let position = t * segments;
                let index = (position.floor() as usize).min(stops.len() - 2);
                space.interpolate(stops[index], stops[index + 1], position - index as f64)
            }
            Self::Rainbow => rainbow(t),
        }
    }

    /// `count` evenly spaced samples from 0 to 1 inclusive.
    #[must_use]
    pub fn samples(&self, count: usize) -> Vec<Color> {
        match count {
            0 => Vec::new(),
            1 => vec![self.sample(0.0)],
            _ => (0..count)
                .map(|i| self.sample(i as f64 / (count - 1) as f64))
                .collect(),
        }
    }
}

/// `[d0, d1]` onto an interpolator, clamped to the ends.
#[derive(Debug, Clone, PartialEq)]
pub struct SequentialScale {
    domain: (f64, f64),
    interpolator: ColorInterpolator,
}

impl SequentialScale {
    pub fn new(domain: (f64, f64), interpolator: ColorInterpolator) -> ChartResult<Self> {
        if !domain.0.is_finite() || !domain.1.is_finite() {
            return Err(DomainError::non_finite("sequential scale").into());
        }
        Ok(Self {
            domain,
            interpolator,
        })
    }

    #[must_use]
    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    #[must_use]
    pub fn apply(&self, value: f64) -> Color {
        let span = self.domain.1 - self.domain.0;
        let t = if span == 0.0 {
            0.5
        } else {
            (value - self.domain.0) / span
        };
        self.interpolator.sample(t.clamp(0.0, 1.0))
    }
}

/// `[low, mid, high]` onto an interpolator, each half stretched separately so
/// `mid` always lands on the interpolator's center.
#[derive(Debug, Clone, PartialEq)]
pub struct DivergingScale {
    domain: (f64, f64, f64),
    interpolator: ColorInterpolator,
}

impl DivergingScale {
    pub fn new(domain: (f64, f64, f64), interpolator: ColorInterpolator) -> ChartResult<Self> {
        let (low, mid, high) = domain;
        if !low.is_finite() || !mid.is_finite() || !high.is_finite() {
            return Err(DomainError::non_finite("diverging scale").into());
        }
        if !(low <= mid && mid <= high) && !(low >= mid && mid >= high) {
            return Err(DomainError::not_monotonic("diverging scale").into());
        }
        Ok(Self {
            domain,
            interpolator,
        })
    }

    /// Symmetric domain `[-m, 0, m]` where `m` is the largest magnitude seen.
    pub fn symmetric<I>(values: I, interpolator: ColorInterpolator) -> ChartResult<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let (min, max) =
            array::extent(values).ok_or_else(|| DomainError::empty("diverging scale"))?;
        let magnitude = (-min).max(max).abs();
        Self::new((-magnitude, 0.0, magnitude), interpolator)
    }

    #[must_use]
    pub fn domain(&self) -> (f64, f64, f64) {
        self.domain
    }

    #[must_use]
    pub fn apply(&self, value: f64) -> Color {
        let (low, mid, high) = self.domain;
        let t = if value < mid {
            let span = mid - low;
            if span == 0.0 { 0.5 } else { 0.5 * (value - low) / span }
        } else {
            let span = high - mid;
            if span == 0.0 { 0.5 } else { 0.5 + 0.5 * (value - mid) / span }
        };
        self.interpolator.sample(t.clamp(0.0, 1.0))
    }
}

/// Piecewise color scale: numeric domain stops paired with color stops.
///
/// Inputs outside the domain are clamped to the first or last color.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorScale {
    domain: SmallVec<[f64; 6]>,
    colors: SmallVec<[Color; 6]>,
    space: ColorSpace,
}

impl ColorScale {
    pub fn new(domain: &[f64], colors: &[Color], space: ColorSpace) -> ChartResult<Self> {
        let placeholder: SmallVec<[f64; 6]> = colors.iter().map(|_| 0.0).collect();
        validate_stops("color scale", domain, &placeholder)?;
        if domain.len() > 1 && domain.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(DomainError::not_monotonic("color scale").into());
        }
        Ok(Self {
            domain: SmallVec::from_slice(domain),
            colors: SmallVec::from_slice(colors),
            space,
        })
    }

    #[must_use]
    pub fn domain(&self) -> &[f64] {
        &self.domain
    }

    #[must_use]
    pub fn apply(&self, value: f64) -> Color {
        let last = self.domain.len() - 1;
        if !(value > self.domain[0]) {
            return self.colors[0];
        }
        if value >= self.domain[last] {
            return self.colors[last];
        }
        let segment = array::bisect_right(&self.domain[1..last], value);
        let (lo, hi) = (self.domain[segment], self.domain[segment + 1]);
        let t = (value - lo) / (hi - lo);
        self.space
            .interpolate(self.colors[segment], self.colors[segment + 1], t)
    }
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

fn lerp_hue(h0: f64, h1: f64, t: f64) -> f64 {
    let mut delta = h1 - h0;
    if delta > 180.0 {
        delta -= 360.0;
    } else if delta < -180.0 {
        delta += 360.0;
    }
    (h0 + delta * t).rem_euclid(360.0)
}

/// Achromatic colors have no hue; borrow the other endpoint's.
fn missing_hue(h0: f64, h1: f64, chroma0: f64, chroma1: f64) -> (f64, f64) {
    const EPSILON: f64 = 1e-6;
    match (chroma0 < EPSILON, chroma1 < EPSILON) {
        (true, false) => (h1, h1),
        (false, true) => (h0, h0),
        _ => (h0, h1),
    }
}

fn rgb_to_hsl(color: Color) -> (f64, f64, f64) {
    let (r, g, b) = (color.red, color.green, color.blue);
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;
    let delta = max - min;
    if delta == 0.0 {
        return (0.0, 0.0, l);
    }
    let s = if l < 0.5 {
        delta / (max + min)
    } else {
        delta / (2.0 - max - min)
    };
    let h = if r == max {
        (g - b) / delta + if g < b { 6.0 } else { 0.0 }
    } else if g == max {
        (b - r) / delta + 2.0
    } else {
        (r - g) / delta + 4.0
    };
    (h * 60.0, s, l)
}

fn hsl_to_rgb(h: f64, s: f64, l: f64, alpha: f64) -> Color {
    let h = h.rem_euclid(360.0);
    let m2 = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let m1 = 2.0 * l - m2;
    let channel = |hue: f64| {
        let hue = hue.rem_euclid(360.0);
        if hue < 60.0 {
            m1 + (m2 - m1) * hue / 60.0
        } else if hue < 180.0 {
            m2
        } else if hue < 240.0 {
            m1 + (m2 - m1) * (240.0 - hue) / 60.0
        } else {
            m1
        }
    };
    Color::rgba(channel(h + 120.0), channel(h), channel(h - 120.0), alpha)
}

const LAB_XN: f64 = 0.964_22;
const LAB_YN: f64 = 1.0;
const LAB_ZN: f64 = 0.825_21;
const LAB_T0: f64 = 4.0 / 29.0;
const LAB_T1: f64 = 6.0 / 29.0;
const LAB_T2: f64 = 3.0 * LAB_T1 * LAB_T1;
const LAB_T3: f64 = LAB_T1 * LAB_T1 * LAB_T1;

fn srgb_to_linear(value: f64) -> f64 {
    if value <= 0.040_45 {
        value / 12.92
    } else {
        ((value + 0.055) / 1.055).powf(2.4)
    }
}

fn linear_to_srgb(value: f64) -> f64 {
    if value <= 0.003_130_8 {
        12.92 * value
    } else {
        1.055 * value.powf(1.0 / 2.4) - 0.055
    }
}

fn xyz_to_lab(t: f64) -> f64 {
    if t > LAB_T3 {
        t.cbrt()
    } else {
        t / LAB_T2 + LAB_T0
    }
}

fn lab_to_xyz(t: f64) -> f64 {
    if t > LAB_T1 {
        t * t * t
    } else {
        LAB_T2 * (t - LAB_T0)
    }
}

/// sRGB to CIELAB (D50), returned as `(l, a, b)`.
fn rgb_to_lab(color: Color) -> (f64, f64, f64) {
    let r = srgb_to_linear(color.red);
    let g = srgb_to_linear(color.green);
    let b = srgb_to_linear(color.blue);
    let y = xyz_to_lab((0.222_504_5 * r + 0.716_878_6 * g + 0.060_616_9 * b) / LAB_YN);
    let (x, z) = if r == g && g == b {
        (y, y)
    } else {
        (
            xyz_to_lab((0.436_074_7 * r + 0.385_064_9 * g + 0.143_080_4 * b) / LAB_XN),
            xyz_to_lab((0.013_932_2 * r + 0.097_104_5 * g + 0.714_173_3 * b) / LAB_ZN),
        )
    };
    (116.0 * y - 16.0, 500.0 * (x - y), 200.0 * (y - z))
}

fn lab_to_rgb(l: f64, a: f64, b: f64, alpha: f64) -> Color {
    let y = (l + 16.0) / 116.0;
    let x = LAB_XN * lab_to_xyz(y + a / 500.0);
    let z = LAB_ZN * lab_to_xyz(y - b / 200.0);
    let y = LAB_YN * lab_to_xyz(y);
    Color::rgba(
        linear_to_srgb(3.133_856_1 * x - 1.616_866_7 * y - 0.490_614_6 * z),
        linear_to_srgb(-0.978_768_4 * x + 1.916_141_5 * y + 0.033_454 * z),
        linear_to_srgb(0.071_945_3 * x - 0.228_991_4 * y + 1.405_242_7 * z),
        alpha,
    )
}

/// Lab to `(hue degrees, chroma, lightness)`.
fn lab_to_hcl((l, a, b): (f64, f64, f64)) -> (f64, f64, f64) {
    let chroma = (a * a + b * b).sqrt();
    let hue = b.atan2(a).to_degrees().rem_euclid(360.0);
    (hue, chroma, l)
}

fn cubehelix(h: f64, s: f64, l: f64) -> Color {
    const A: f64 = -0.148_61;
    const B: f64 = 1.782_77;
    const C: f64 = -0.292_27;
    const D: f64 = -0.906_49;
    const E: f64 = 1.972_94;

    let h = (h + 120.0) * PI / 180.0;
    let amplitude = s * l * (1.0 - l);
    let (sin_h, cos_h) = h.sin_cos();
    Color::rgb(
        l + amplitude * (A * cos_h + B * sin_h),
        l + amplitude * (C * cos_h + D * sin_h),
        l + amplitude * (E * cos_h),
    )
    .clamped()
}

fn rainbow(t: f64) -> Color {
    let t = if (0.0..=1.0).contains(&t) { t } else { t - t.floor() };
    let distance = (t - 0.5).abs();
    cubehelix(360.0 * t - 100.0, 1.5 - 1.5 * distance, 0.8 - 0.9 * distance)
}
