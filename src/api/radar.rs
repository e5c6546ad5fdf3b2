use std::f64::consts::TAU;

use tracing::debug;

use crate::api::{Chart, ChartConfig, wrapper};
use crate::core::accessor::{Accessor, FieldAccessor, Record, collect_defined};
use crate::core::LinearScale;
use crate::error::{ChartError, ChartResult};
use crate::render::{
    CirclePrimitive, Color, Group, LinePrimitive, Paint, PathPrimitive, RenderFrame, TextHAlign,
    TextPrimitive,
};
use crate::shape::{Curve, RadialLineGenerator, polar_to_cartesian};

const GRID_TICKS: usize = 5;
const NICE_COUNT: usize = 10;
const LABEL_DISTANCE: f64 = 1.1;
const GRID_COLOR: Color = Color::rgb(0.863, 0.863, 0.863);

/// One spoke of the radar for the selected record.
#[derive(Debug, Clone, PartialEq)]
pub struct RadarMetric {
    pub metric: String,
    /// Raw value; missing fields read as 0.
    pub value: f64,
    /// Offset from the radar centre.
    pub x: f64,
    pub y: f64,
}

/// Several metrics of one record on radial axes, each axis scaled to the
/// metric's own extent across the dataset.
#[derive(Debug, Clone)]
pub struct RadarChart {
    config: ChartConfig,
    data: Vec<Record>,
    metrics: Vec<FieldAccessor>,
    selected: usize,
}

impl RadarChart {
    pub fn new<I, S>(data: Vec<Record>, metrics: I) -> ChartResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let metrics: Vec<FieldAccessor> = metrics.into_iter().map(FieldAccessor::new).collect();
        if metrics.len() < 3 {
            return Err(ChartError::InvalidData(
                "radar chart needs at least three metrics".to_owned(),
            ));
        }
        Ok(Self {
            config: ChartConfig::default(),
            data,
            metrics,
            selected: 0,
        })
    }

    #[must_use]
    pub fn with_config(mut self, config: ChartConfig) -> Self {
        self.config = config;
        self
    }

    /// Selects the record drawn as the radar line.
    pub fn select(&mut self, index: usize) -> ChartResult<()> {
        if index >= self.data.len() {
            return Err(ChartError::InvalidData(format!(
                "record {index} out of range for {} records",
                self.data.len()
            )));
        }
        self.selected = index;
        Ok(())
    }

    #[must_use]
    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Spoke angle of metric `index`, clockwise from 12 o'clock.
    #[must_use]
    pub fn angle(&self, index: usize) -> f64 {
        index as f64 * TAU / self.metrics.len() as f64
    }

    /// Per-metric scales from 0 to `radius`, niced.
    pub fn scales(&self, radius: f64) -> ChartResult<Vec<LinearScale>> {
        self.metrics
            .iter()
            .map(|metric| {
                let values = collect_defined(&self.data, metric);
                Ok(LinearScale::from_extent(values, (0.0, radius))?.nice(NICE_COUNT))
            })
            .collect()
    }

    /// Spokes for the selected record.
    pub fn points(&self) -> ChartResult<Vec<RadarMetric>> {
        let radius = self.config.dimensions()?.bounded_radius();
        let scales = self.scales(radius)?;
        Ok(self.points_with(&scales))
    }

    fn points_with(&self, scales: &[LinearScale]) -> Vec<RadarMetric> {
        let record = self.data.get(self.selected);
        self.metrics
            .iter()
            .zip(scales)
            .enumerate()
            .map(|(i, (metric, scale))| {
                let value = record.and_then(|r| metric.get(r)).unwrap_or(0.0);
                let (x, y) = polar_to_cartesian(self.angle(i), scale.apply(value));
                RadarMetric {
                    metric: metric.name().to_owned(),
                    value,
                    x,
                    y,
                }
            })
            .collect()
    }

    fn label_align(&self, index: usize) -> TextHAlign {
        let n = self.metrics.len();
        if index == 0 || index * 2 == n {
            TextHAlign::Center
        } else if index * 2 < n {
            TextHAlign::Left
        } else {
            TextHAlign::Right
        }
    }
}

impl Chart for RadarChart {
    fn config(&self) -> &ChartConfig {
        &self.config
    }

    fn build_frame(&self) -> ChartResult<RenderFrame> {
        let dims = self.config.dimensions()?;
        let radius = dims.bounded_radius();
        let (cx, cy) = dims.bounded_center();
        let scales = self.scales(radius)?;
        let (mut frame, mut bounds) = wrapper(&dims);

        let mut web = Group::new().with_class("web").with_translate(cx, cy);
        for i in 0..=GRID_TICKS {
            web.push(CirclePrimitive::new(
                0.0,
                0.0,
                radius * i as f64 / GRID_TICKS as f64,
                Paint::stroke(GRID_COLOR, 1.0),
            ));
        }
        for (i, metric) in self.metrics.iter().enumerate() {
            let (x, y) = polar_to_cartesian(self.angle(i), radius);
            web.push(LinePrimitive::new(0.0, 0.0, x, y, 1.0, GRID_COLOR));
            let (lx, ly) = polar_to_cartesian(self.angle(i), radius * LABEL_DISTANCE);
            web.push(TextPrimitive::new(
                metric.name(),
                lx,
                ly,
                12.0,
                self.config.text_color,
                self.label_align(i),
            ));
        }
        bounds.push(web);

        let record = self.data.get(self.selected);
        let spokes: Vec<usize> = (0..self.metrics.len()).collect();
        let line = RadialLineGenerator::new(
            |i: &usize| Some(self.angle(*i)),
            |i: &usize| {
                let value = record.and_then(|r| self.metrics[*i].get(r)).unwrap_or(0.0);
                Some(scales[*i].apply(value))
            },
        )
        .with_curve(Curve::LinearClosed);
        let mut shape = Group::new().with_class("line").with_translate(cx, cy).with(PathPrimitive::new(
            line.generate(&spokes),
            Paint::fill(self.config.primary_color.with_alpha(0.3))
                .with_stroke(self.config.primary_color, 2.0),
        ));
        shape.extend(self.points_with(&scales).into_iter().map(|point| {
            CirclePrimitive::new(point.x, point.y, 4.0, Paint::fill(self.config.primary_color))
        }));
        bounds.push(shape);

        frame.push(bounds);
        debug!(
            metrics = self.metrics.len(),
            selected = self.selected,
            "radar chart built"
        );
        Ok(frame)
    }
}
