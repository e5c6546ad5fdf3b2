use serde::{Deserialize, Serialize};

use crate::core::scale::{BandScale, LinearScale, TimeScale};
use crate::render::{Color, Group, LinePrimitive, TextHAlign, TextPrimitive};

/// Side of the plot the axis is drawn on; ticks point away from the plot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisOrient {
    Top,
    Right,
    Bottom,
    Left,
}

impl AxisOrient {
    fn is_horizontal(self) -> bool {
        matches!(self, Self::Top | Self::Bottom)
    }

    /// +1 when ticks grow toward positive pixel coordinates.
    fn direction(self) -> f64 {
        match self {
            Self::Top | Self::Left => -1.0,
            Self::Right | Self::Bottom => 1.0,
        }
    }

    fn class(self) -> &'static str {
        match self {
            Self::Top => "axis axis--top",
            Self::Right => "axis axis--right",
            Self::Bottom => "axis axis--bottom",
            Self::Left => "axis axis--left",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AxisTick {
    pub label: String,
    /// Pixel position along the axis.
    pub offset: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisStyle {
    pub tick_size: f64,
    pub tick_padding: f64,
    pub font_size_px: f64,
    pub stroke_width: f64,
    pub color: Color,
}

impl Default for AxisStyle {
    fn default() -> Self {
        Self {
            tick_size: 6.0,
            tick_padding: 3.0,
            font_size_px: 10.0,
            stroke_width: 1.0,
            color: Color::BLACK,
        }
    }
}

/// Tick count that keeps roughly `spacing_px` between ticks, clamped to
/// `[min_ticks, max_ticks]`.
#[must_use]
pub fn tick_count_for_span(span_px: f64, spacing_px: f64, min_ticks: usize, max_ticks: usize) -> usize {
    if !span_px.is_finite() || span_px <= 0.0 || !spacing_px.is_finite() || spacing_px <= 0.0 {
        return min_ticks;
    }
    let raw = (span_px / spacing_px).floor() as usize + 1;
    raw.clamp(min_ticks, max_ticks.max(min_ticks))
}

/// Reference marks for one scale: a domain line, tick marks and labels.
#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    orient: AxisOrient,
    range: (f64, f64),
    ticks: Vec<AxisTick>,
    title: Option<String>,
    style: AxisStyle,
}

impl Axis {
    #[must_use]
    pub fn new(orient: AxisOrient, range: (f64, f64), ticks: Vec<AxisTick>) -> Self {
        Self {
            orient,
            range,
            ticks,
            title: None,
            style: AxisStyle::default(),
        }
    }

    /// About `count` ticks with labels formatted to the tick precision.
    #[must_use]
    pub fn linear(orient: AxisOrient, scale: &LinearScale, count: usize) -> Self {
        let format = scale.tick_format(count);
        Self::linear_with(orient, scale, &scale.ticks(count), format)
    }

    /// Ticks at explicit `values`, labelled by `format`.
    pub fn linear_with<F>(orient: AxisOrient, scale: &LinearScale, values: &[f64], format: F) -> Self
    where
        F: Fn(f64) -> String,
    {
        let ticks = values
            .iter()
            .map(|value| AxisTick {
                label: format(*value),
                offset: scale.apply(*value),
            })
            .collect();
        Self::new(orient, range_extent(scale.range()), ticks)
    }

    #[must_use]
    pub fn time(orient: AxisOrient, scale: &TimeScale, count: usize) -> Self {
        let format = scale.tick_format();
        let ticks = scale
            .ticks(count)
            .into_iter()
            .map(|time| AxisTick {
                label: format(time),
                offset: scale.apply(time),
            })
            .collect();
        Self::new(orient, scale.range(), ticks)
    }

    /// One tick centred on each band, labelled with its category.
    pub fn band<I, S>(orient: AxisOrient, scale: &BandScale, keys: I, range: (f64, f64)) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let ticks = keys
            .into_iter()
            .filter_map(|key| {
                let key = key.as_ref();
                scale.center(key).map(|offset| AxisTick {
                    label: key.to_owned(),
                    offset,
                })
            })
            .collect();
        Self::new(orient, range, ticks)
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_style(mut self, style: AxisStyle) -> Self {
        self.style = style;
        self
    }

    #[must_use]
    pub fn ticks(&self) -> &[AxisTick] {
        &self.ticks
    }

    #[must_use]
    pub fn orient(&self) -> AxisOrient {
        self.orient
    }

    /// Axis primitives in a group positioned on the axis line.
    #[must_use]
    pub fn render(&self) -> Group {
        let style = self.style;
        let k = self.orient.direction();
        let horizontal = self.orient.is_horizontal();
        let line = |a: (f64, f64), b: (f64, f64)| {
            let (a, b) = if horizontal { (a, b) } else { ((a.1, a.0), (b.1, b.0)) };
            LinePrimitive::new(a.0, a.1, b.0, b.1, style.stroke_width, style.color)
        };

        let mut group = Group::new().with_class(self.orient.class());
        group.push(line((self.range.0, 0.0), (self.range.1, 0.0)));

        let label_gap = style.tick_size.max(0.0) + style.tick_padding;
        for tick in &self.ticks {
            if !tick.offset.is_finite() {
                continue;
            }
            group.push(line((tick.offset, 0.0), (tick.offset, k * style.tick_size)));
            if tick.label.is_empty() {
                continue;
            }
            let text = match self.orient {
                AxisOrient::Bottom => TextPrimitive::new(
                    tick.label.clone(),
                    tick.offset,
                    label_gap + 0.71 * style.font_size_px,
                    style.font_size_px,
                    style.color,
                    TextHAlign::Center,
                ),
                AxisOrient::Top => TextPrimitive::new(
                    tick.label.clone(),
                    tick.offset,
                    -label_gap,
                    style.font_size_px,
                    style.color,
                    TextHAlign::Center,
                ),
                AxisOrient::Left => TextPrimitive::new(
                    tick.label.clone(),
                    -label_gap,
                    tick.offset + 0.32 * style.font_size_px,
                    style.font_size_px,
                    style.color,
                    TextHAlign::Right,
                ),
                AxisOrient::Right => TextPrimitive::new(
                    tick.label.clone(),
                    label_gap,
                    tick.offset + 0.32 * style.font_size_px,
                    style.font_size_px,
                    style.color,
                    TextHAlign::Left,
                ),
            };
            group.push(text);
        }

        if let Some(title) = self.title.as_ref().filter(|title| !title.is_empty()) {
            let middle = (self.range.0 + self.range.1) / 2.0;
            let distance = k * (label_gap + style.font_size_px * 3.0);
            let size = style.font_size_px * 1.4;
            let text = if horizontal {
                TextPrimitive::new(title.clone(), middle, distance, size, style.color, TextHAlign::Center)
            } else {
                TextPrimitive::new(title.clone(), distance, middle, size, style.color, TextHAlign::Center)
                    .with_rotation(-90.0)
            };
            group.push(text);
        }
        group
    }
}

fn range_extent(range: &[f64]) -> (f64, f64) {
    match range {
        [first, .., last] => (*first, *last),
        [only] => (*only, *only),
        [] => (0.0, 0.0),
    }
}
