use tracing::debug;

use crate::api::{Chart, ChartConfig, wrapper};
use crate::core::accessor::{Accessor, FieldAccessor, Record, collect_defined};
use crate::core::{Axis, AxisOrient, Bin, Binner, Dimensions, LinearScale, array};
use crate::error::{ChartResult, DomainError};
use crate::render::{
    Color, Group, LinePrimitive, LineStrokeStyle, Paint, RectPrimitive, RenderFrame, TextHAlign,
    TextPrimitive,
};
use crate::selection::{JoinSummary, KeyedScene};

/// Tick count `nice` rounds the domains to.
const NICE_COUNT: usize = 10;
const LABEL_OFFSET: f64 = 5.0;
const CONSTANT_HALF_SPAN: f64 = 0.5;
const LABEL_FONT_SIZE: f64 = 12.0;
const MEAN_OVERHANG: f64 = 15.0;
const LABEL_COLOR: Color = Color::rgb(0.663, 0.663, 0.663);
const MEAN_COLOR: Color = Color::rgb(0.502, 0.0, 0.0);

/// Distribution of one metric as vertical bars.
#[derive(Debug, Clone)]
pub struct Histogram {
    config: ChartConfig,
    data: Vec<Record>,
    metric: FieldAccessor,
    show_mean: bool,
}

#[derive(Debug, Clone)]
pub struct HistogramLayout {
    pub dimensions: Dimensions,
    pub x_scale: LinearScale,
    pub y_scale: LinearScale,
    pub bins: Vec<Bin<f64>>,
    pub mean: Option<f64>,
}

impl Histogram {
    #[must_use]
    pub fn new(data: Vec<Record>, metric: FieldAccessor) -> Self {
        Self {
            config: ChartConfig::default(),
            data,
            metric,
            show_mean: true,
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: ChartConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn with_mean(mut self, show_mean: bool) -> Self {
        self.show_mean = show_mean;
        self
    }

    /// Replaces the dataset, keeping metric and config.
    pub fn set_data(&mut self, data: Vec<Record>) {
        self.data = data;
    }

    pub fn layout(&self) -> ChartResult<HistogramLayout> {
        let dimensions = self.config.dimensions()?;
        let values = collect_defined(&self.data, &self.metric);
        let (lo, hi) = array::extent(values.iter().copied())
            .ok_or_else(|| DomainError::empty("histogram"))?;
        // A constant metric is widened to a unit span so its bar keeps a width.
        let (lo, hi) = if lo == hi {
            (lo - CONSTANT_HALF_SPAN, hi + CONSTANT_HALF_SPAN)
        } else {
            (lo, hi)
        };
        let x_scale = LinearScale::linear(lo, hi, 0.0, dimensions.bounded_width)?.nice(NICE_COUNT);
        let (start, end) = x_scale.domain_extent();
        let bins = Binner::new()
            .with_domain(start, end)?
            .with_thresholds(self.config.thresholds.clone())?
            .bin_values(&values)?;

        let max_count = bins.iter().map(Bin::len).max().unwrap_or(0);
        let y_scale = LinearScale::linear(0.0, max_count as f64, dimensions.bounded_height, 0.0)?
            .nice(NICE_COUNT);

        Ok(HistogramLayout {
            dimensions,
            x_scale,
            y_scale,
            bins,
            mean: array::mean(values.iter().copied()),
        })
    }

    /// Bar, and its count label when the bin is not empty.
    fn bar(&self, layout: &HistogramLayout, bin: &Bin<f64>) -> Group {
        let x_scale = &layout.x_scale;
        let y = layout.y_scale.apply(bin.len() as f64);
        let (left, right) = (x_scale.apply(bin.x0), x_scale.apply(bin.x1));
        let padding = self.config.bar_padding;

        let mut group = Group::new().with_class("bin").with(RectPrimitive::new(
            left + padding / 2.0,
            y,
            (right - left - padding).max(0.0),
            layout.dimensions.bounded_height - y,
            Paint::fill(self.config.primary_color),
        ));
        if !bin.is_empty() {
            group.push(TextPrimitive::new(
                bin.len().to_string(),
                left + (right - left) / 2.0,
                y - LABEL_OFFSET,
                LABEL_FONT_SIZE,
                LABEL_COLOR,
                TextHAlign::Center,
            ));
        }
        group
    }

    fn decorate(&self, layout: &HistogramLayout, bounds: &mut Group) {
        let dims = layout.dimensions;
        if let Some(mean) = layout.mean.filter(|_| self.show_mean) {
            let x = layout.x_scale.apply(mean);
            bounds.push(
                Group::new()
                    .with_class("mean")
                    .with(
                        LinePrimitive::new(x, -MEAN_OVERHANG, x, dims.bounded_height, 1.0, MEAN_COLOR)
                            .with_stroke_style(LineStrokeStyle::Dashed),
                    )
                    .with(TextPrimitive::new(
                        "mean",
                        x,
                        -MEAN_OVERHANG - LABEL_OFFSET,
                        LABEL_FONT_SIZE,
                        MEAN_COLOR,
                        TextHAlign::Center,
                    )),
            );
        }

        let mut x_axis = Axis::linear(AxisOrient::Bottom, &layout.x_scale, self.config.x_ticks);
        let title = self
            .config
            .x_label
            .clone()
            .unwrap_or_else(|| self.metric.name().to_owned());
        x_axis = x_axis.with_title(title);
        bounds.push(x_axis.render().with_translate(0.0, dims.bounded_height));
    }

    /// Builds the frame while reconciling bars against `scene`, keyed by bin
    /// range, so bars that survive a data change are updated in place.
    pub fn build_frame_keyed(
        &self,
        scene: &mut KeyedScene<String, Group>,
    ) -> ChartResult<(RenderFrame, JoinSummary)> {
        let layout = self.layout()?;
        let summary = scene.join(
            &layout.bins,
            |bin| format!("{}-{}", bin.x0, bin.x1),
            |_, bin| self.bar(&layout, bin),
            |_, bin, bar| *bar = self.bar(&layout, bin),
        );

        let (mut frame, mut bounds) = wrapper(&layout.dimensions);
        let mut bins = Group::new().with_class("bins");
        bins.extend(scene.elements().cloned());
        bounds.push(bins);
        self.decorate(&layout, &mut bounds);
        frame.push(bounds);
        debug!(
            bins = layout.bins.len(),
            entered = summary.entered,
            updated = summary.updated,
            exited = summary.exited,
            "histogram bars reconciled"
        );
        Ok((frame, summary))
    }
}

impl Chart for Histogram {
    fn config(&self) -> &ChartConfig {
        &self.config
    }

    fn build_frame(&self) -> ChartResult<RenderFrame> {
        let layout = self.layout()?;
        let (mut frame, mut bounds) = wrapper(&layout.dimensions);
        let mut bins = Group::new().with_class("bins");
        bins.extend(layout.bins.iter().map(|bin| self.bar(&layout, bin)));
        bounds.push(bins);
        self.decorate(&layout, &mut bounds);
        frame.push(bounds);
        debug!(
            metric = self.metric.name(),
            bins = layout.bins.len(),
            "histogram built"
        );
        Ok(frame)
    }
}
