use tracing::{debug, trace};

use crate::animation::SlidingWindow;
use crate::api::{Chart, ChartConfig, wrapper};
use crate::core::accessor::{Accessor, DateAccessor, FieldAccessor, Record, require};
use crate::core::{Axis, AxisOrient, Dimensions, LinearScale, TimeScale};
use crate::error::ChartResult;
use crate::interaction::{HoverSnap, PointerTracker, TooltipState, nearest_by_x};
use crate::render::{CirclePrimitive, Color, Group, Paint, PathPrimitive, RectPrimitive, RenderFrame};
use crate::shape::LineGenerator;

const THRESHOLD_BAND_COLOR: Color = Color::rgb(0.878, 0.953, 0.953);
const HOVER_DOT_RADIUS: f64 = 4.0;

/// Time series drawn as a single line, with an optional shaded band below a
/// threshold value (freezing temperatures in the classic weather example).
#[derive(Debug, Clone)]
pub struct LineChart {
    config: ChartConfig,
    data: Vec<Record>,
    x: DateAccessor,
    y: FieldAccessor,
    threshold: Option<f64>,
}

/// Dimensions and scales resolved for one build.
#[derive(Debug, Clone)]
pub struct LineLayout {
    pub dimensions: Dimensions,
    pub x_scale: TimeScale,
    pub y_scale: LinearScale,
}

impl LineChart {
    #[must_use]
    pub fn new(data: Vec<Record>, x: DateAccessor, y: FieldAccessor) -> Self {
        Self {
            config: ChartConfig::default(),
            data,
            x,
            y,
            threshold: None,
        }
    }

    /// Chart over the current contents of a sliding window.
    pub fn from_window(window: &SlidingWindow<Record>, x: DateAccessor, y: FieldAccessor) -> Self {
        Self::new(window.iter().cloned().collect(), x, y)
    }

    #[must_use]
    pub fn with_config(mut self, config: ChartConfig) -> Self {
        self.config = config;
        self
    }

    /// Shades the area below `value`.
    #[must_use]
    pub fn with_threshold(mut self, value: f64) -> Self {
        self.threshold = Some(value);
        self
    }

    #[must_use]
    pub fn data(&self) -> &[Record] {
        &self.data
    }

    pub fn layout(&self) -> ChartResult<LineLayout> {
        let dimensions = self.config.dimensions()?;
        let dates = require(&self.data, &self.x)?;
        let values = require(&self.data, &self.y)?;
        let x_scale = TimeScale::from_extent(dates, (0.0, dimensions.bounded_width))?;
        let y_scale = LinearScale::from_extent(values, (dimensions.bounded_height, 0.0))?;
        Ok(LineLayout {
            dimensions,
            x_scale,
            y_scale,
        })
    }

    /// Datum closest in time to a pointer at `pointer_x` (bounds coordinates).
    pub fn hover(&self, pointer_x: f64) -> ChartResult<Option<HoverSnap>> {
        let layout = self.layout()?;
        let snap = nearest_by_x(&self.data, &self.x, &layout.x_scale, pointer_x).and_then(|index| {
            let datum = &self.data[index];
            Some(HoverSnap {
                index,
                x: layout.x_scale.apply(self.x.get(datum)?),
                y: layout.y_scale.apply(self.y.get(datum)?),
            })
        });
        Ok(snap)
    }

    /// Tooltip text for the datum at `index`: its date and value.
    #[must_use]
    pub fn tooltip_lines(&self, index: usize) -> Vec<String> {
        let Some(datum) = self.data.get(index) else {
            return Vec::new();
        };
        let mut lines = Vec::with_capacity(2);
        if let Some(date) = self.x.get(datum) {
            lines.push(date.format("%A, %B %-d, %Y").to_string());
        }
        if let Some(value) = self.y.get(datum) {
            lines.push(format!("{}: {value:.1}", self.y.name()));
        }
        lines
    }

    /// Pointer move over the bounds: snaps to the nearest datum and updates
    /// both the tracker and the tooltip.
    pub fn on_pointer_move(
        &self,
        tracker: PointerTracker,
        tooltip: TooltipState,
        x: f64,
        y: f64,
    ) -> ChartResult<(PointerTracker, TooltipState)> {
        let snap = self.hover(x)?;
        let tracker = tracker.on_pointer_move(x, y, snap);
        let tooltip = match snap {
            Some(snap) if self.config.show_tooltip => {
                tooltip.on_pointer_move(snap, self.config.margin, self.tooltip_lines(snap.index))
            }
            _ => tooltip.on_pointer_leave(),
        };
        trace!(x, y, index = ?snap.map(|s| s.index), "line chart pointer move");
        Ok((tracker, tooltip))
    }

    /// Pixels the line must slide left after the newest point was pushed.
    pub fn slide_offset(&self, window: &SlidingWindow<Record>) -> ChartResult<Option<f64>> {
        let layout = self.layout()?;
        Ok(window.shift_offset(&layout.x_scale, &self.x))
    }

    /// Frame with a marker on the hovered datum, when there is one.
    pub fn build_frame_with_hover(&self, hover: Option<HoverSnap>) -> ChartResult<RenderFrame> {
        let layout = self.layout()?;
        let dims = layout.dimensions;
        let (mut frame, mut bounds) = wrapper(&dims);

        if let Some(threshold) = self.threshold {
            let top = layout.y_scale.apply(threshold).clamp(0.0, dims.bounded_height);
            bounds.push(
                Group::new().with_class("threshold").with(RectPrimitive::new(
                    0.0,
                    top,
                    dims.bounded_width,
                    dims.bounded_height - top,
                    Paint::fill(THRESHOLD_BAND_COLOR),
                )),
            );
        }

        let (x_scale, y_scale) = (&layout.x_scale, &layout.y_scale);
        let line = LineGenerator::new(
            |d: &Record| self.x.get(d).map(|t| x_scale.apply(t)),
            |d: &Record| self.y.get(d).map(|v| y_scale.apply(v)),
        )
        .with_curve(self.config.curve);
        bounds.push(
            Group::new().with_class("line").with(PathPrimitive::new(
                line.generate(&self.data),
                Paint::stroke(self.config.primary_color, 2.0),
            )),
        );

        let mut y_axis = Axis::linear(AxisOrient::Left, y_scale, self.config.y_ticks);
        if let Some(label) = &self.config.y_label {
            y_axis = y_axis.with_title(label.clone());
        }
        let mut x_axis = Axis::time(AxisOrient::Bottom, x_scale, self.config.x_ticks);
        if let Some(label) = &self.config.x_label {
            x_axis = x_axis.with_title(label.clone());
        }
        bounds.push(y_axis.render());
        bounds.push(x_axis.render().with_translate(0.0, dims.bounded_height));

        if let Some(snap) = hover {
            bounds.push(
                Group::new().with_class("hover").with(CirclePrimitive::new(
                    snap.x,
                    snap.y,
                    HOVER_DOT_RADIUS,
                    Paint::fill(self.config.accent_color).with_stroke(Color::WHITE, 2.0),
                )),
            );
        }

        frame.push(bounds);
        debug!(points = self.data.len(), threshold = ?self.threshold, "line chart built");
        Ok(frame)
    }
}

impl Chart for LineChart {
    fn config(&self) -> &ChartConfig {
        &self.config
    }

    fn build_frame(&self) -> ChartResult<RenderFrame> {
        self.build_frame_with_hover(None)
    }
}
