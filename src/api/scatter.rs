use chrono::{Datelike, NaiveDate};
use tracing::{debug, trace};

use crate::api::{Chart, ChartConfig, wrapper};
use crate::core::accessor::{Accessor, DateAccessor, FieldAccessor, Record, require};
use crate::core::{
    Axis, AxisOrient, Bin, Binner, ColorScale, ColorSpace, Dimensions, LinearScale, Thresholds,
    array,
};
use crate::error::ChartResult;
use crate::interaction::{HoverSnap, VoronoiDiagram};
use crate::render::{
    CirclePrimitive, Color, Group, LinePrimitive, Paint, PathPrimitive, RectPrimitive,
    RenderFrame, TextHAlign, TextPrimitive,
};
use crate::shape::{AreaGenerator, Curve};

const DOT_RADIUS: f64 = 4.0;
const NICE_COUNT: usize = 10;
const MARGINAL_BINS: usize = 20;
const MARGINAL_HEIGHT: f64 = 70.0;
const MARGINAL_GAP: f64 = 10.0;
const LEGEND_WIDTH: f64 = 250.0;
const LEGEND_HEIGHT: f64 = 26.0;
const LEGEND_STEPS: usize = 10;

/// Leap year every date is moved into before coloring, so Feb 29 exists.
const SEASON_YEAR: i32 = 2000;
/// Season peaks as (month, day), wrapping from New Year back to New Year.
const SEASON_STOPS: [((u32, u32), &str); 6] = [
    ((1, 1), "#9b1f62"),
    ((2, 3), "#483d8b"),
    ((5, 6), "#00ff7f"),
    ((8, 7), "#f2ba4a"),
    ((10, 31), "#aa381e"),
    ((12, 31), "#9b1f62"),
];

/// Two metrics against each other on a shared domain, with marginal
/// distributions along the top and right edges.
#[derive(Debug, Clone)]
pub struct ScatterPlot {
    config: ChartConfig,
    data: Vec<Record>,
    x: FieldAccessor,
    y: FieldAccessor,
    season: Option<DateAccessor>,
    marginals: bool,
}

#[derive(Debug, Clone)]
pub struct ScatterLayout {
    pub dimensions: Dimensions,
    pub x_scale: LinearScale,
    pub y_scale: LinearScale,
    /// Dot centres, in data order.
    pub points: Vec<(f64, f64)>,
    pub voronoi: VoronoiDiagram,
}

impl ScatterPlot {
    #[must_use]
    pub fn new(data: Vec<Record>, x: FieldAccessor, y: FieldAccessor) -> Self {
        Self {
            config: ChartConfig::default(),
            data,
            x,
            y,
            season: None,
            marginals: true,
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: ChartConfig) -> Self {
        self.config = config;
        self
    }

    /// Colors dots by the time of year read from `date`.
    #[must_use]
    pub fn with_season_colors(mut self, date: DateAccessor) -> Self {
        self.season = Some(date);
        self
    }

    #[must_use]
    pub fn with_marginals(mut self, marginals: bool) -> Self {
        self.marginals = marginals;
        self
    }

    pub fn layout(&self) -> ChartResult<ScatterLayout> {
        let dimensions = self.config.dimensions()?;
        let xs = require(&self.data, &self.x)?;
        let ys = require(&self.data, &self.y)?;

        // One extent over both metrics keeps the aspect 1:1.
        let shared = xs.iter().chain(ys.iter()).copied();
        let x_scale = LinearScale::from_extent(shared, (0.0, dimensions.bounded_width))?.nice(NICE_COUNT);
        let y_scale = x_scale.with_range(&[dimensions.bounded_height, 0.0])?;

        let points: Vec<(f64, f64)> = xs
            .iter()
            .zip(&ys)
            .map(|(x, y)| (x_scale.apply(*x), y_scale.apply(*y)))
            .collect();
        let voronoi = VoronoiDiagram::new(
            points.clone(),
            (0.0, 0.0, dimensions.bounded_width, dimensions.bounded_height),
        )?;
        Ok(ScatterLayout {
            dimensions,
            x_scale,
            y_scale,
            points,
            voronoi,
        })
    }

    /// Datum whose Voronoi cell contains the pointer (bounds coordinates).
    pub fn hover(&self, x: f64, y: f64) -> ChartResult<Option<HoverSnap>> {
        let layout = self.layout()?;
        let snap = layout.voronoi.find(x, y).map(|index| {
            let (px, py) = layout.points[index];
            HoverSnap { index, x: px, y: py }
        });
        trace!(x, y, index = ?snap.map(|s| s.index), "scatter hover");
        Ok(snap)
    }

    fn season_scale() -> ChartResult<ColorScale> {
        let mut domain = Vec::with_capacity(SEASON_STOPS.len());
        let mut colors = Vec::with_capacity(SEASON_STOPS.len());
        for ((month, day), hex) in SEASON_STOPS {
            let ordinal = NaiveDate::from_ymd_opt(SEASON_YEAR, month, day)
                .map_or(f64::NAN, |date| f64::from(date.ordinal()));
            domain.push(ordinal);
            colors.push(Color::from_hex(hex)?);
        }
        ColorScale::new(&domain, &colors, ColorSpace::Rgb)
    }

    fn dot_colors(&self) -> ChartResult<Vec<Color>> {
        let Some(season) = &self.season else {
            return Ok(vec![self.config.primary_color; self.data.len()]);
        };
        let scale = Self::season_scale()?;
        Ok(self
            .data
            .iter()
            .map(|datum| {
                season.get(datum).map_or(self.config.primary_color, |date| {
                    let day = date
                        .date()
                        .with_year(SEASON_YEAR)
                        .map_or(date.ordinal(), |d| d.ordinal());
                    scale.apply(f64::from(day))
                })
            })
            .collect())
    }

    /// Basis-curved area of the counts of `values`, bins laid out along
    /// `scale`. Drawn as if on the top edge; callers rotate it for the right.
    fn marginal(&self, values: &[f64], scale: &LinearScale) -> ChartResult<PathPrimitive> {
        let (start, end) = scale.domain_extent();
        let bins = Binner::new()
            .with_domain(start, end)?
            .with_thresholds(Thresholds::Count(MARGINAL_BINS))?
            .bin_values(values)?;
        let (low, high) = array::extent(bins.iter().map(|bin| bin.len() as f64)).unwrap_or((0.0, 1.0));
        let counts = LinearScale::linear(low, high, MARGINAL_HEIGHT, 0.0)?;
        let area = AreaGenerator::with_baseline(
            |bin: &Bin<f64>| Some(scale.apply(bin.midpoint())),
            MARGINAL_HEIGHT,
            |bin: &Bin<f64>| Some(counts.apply(bin.len() as f64)),
        )
        .with_curve(Curve::Basis);
        Ok(PathPrimitive::new(
            area.generate(&bins),
            Paint::fill(self.config.primary_color.with_alpha(0.5)),
        ))
    }

    fn legend(&self, dims: &Dimensions) -> ChartResult<Group> {
        let scale = Self::season_scale()?;
        let (first, last) = (scale.domain()[0], scale.domain()[scale.domain().len() - 1]);
        let position = LinearScale::linear(first, last, 0.0, LEGEND_WIDTH)?;
        let step_width = LEGEND_WIDTH / LEGEND_STEPS as f64;

        let mut legend = Group::new()
            .with_class("legend")
            .with_translate(dims.bounded_width - LEGEND_WIDTH - 9.0, dims.bounded_height - 37.0);
        for i in 0..LEGEND_STEPS {
            let t = i as f64 / (LEGEND_STEPS - 1) as f64;
            legend.push(RectPrimitive::new(
                i as f64 * step_width,
                0.0,
                step_width,
                LEGEND_HEIGHT,
                Paint::fill(scale.apply(first + t * (last - first))),
            ));
        }
        for ((month, day), _) in &SEASON_STOPS[1..SEASON_STOPS.len() - 1] {
            let Some(date) = NaiveDate::from_ymd_opt(SEASON_YEAR, *month, *day) else {
                continue;
            };
            let x = position.apply(f64::from(date.ordinal()));
            legend.push(LinePrimitive::new(x, 6.0, x, -2.0, 1.0, self.config.text_color));
            legend.push(TextPrimitive::new(
                date.format("%b %-d").to_string(),
                x,
                -6.0,
                10.0,
                self.config.text_color,
                TextHAlign::Center,
            ));
        }
        Ok(legend)
    }

    /// Frame with hover guides on `hover`, when given.
    pub fn build_frame_with_hover(&self, hover: Option<HoverSnap>) -> ChartResult<RenderFrame> {
        let layout = self.layout()?;
        let dims = layout.dimensions;
        let (mut frame, mut bounds) = wrapper(&dims);

        let mut dots = Group::new().with_class("dots");
        for ((cx, cy), color) in layout.points.iter().zip(self.dot_colors()?) {
            dots.push(CirclePrimitive::new(*cx, *cy, DOT_RADIUS, Paint::fill(color)));
        }
        bounds.push(dots);

        let mut cells = Group::new().with_class("voronoi");
        cells.extend(
            (0..layout.voronoi.len())
                .filter_map(|i| layout.voronoi.cell_path(i))
                .map(|data| PathPrimitive::new(data, Paint::fill(Color::TRANSPARENT))),
        );
        bounds.push(cells);

        if self.marginals {
            let xs = require(&self.data, &self.x)?;
            let ys = require(&self.data, &self.y)?;
            bounds.push(
                Group::new()
                    .with_class("histogram histogram--top")
                    .with_translate(0.0, -MARGINAL_HEIGHT - MARGINAL_GAP)
                    .with(self.marginal(&xs, &layout.x_scale)?),
            );
            let right = Group::new()
                .with_translate(0.0, -MARGINAL_HEIGHT)
                .with(self.marginal(&ys, &layout.y_scale)?);
            bounds.push(
                Group::new()
                    .with_class("histogram histogram--right")
                    .with_translate(dims.bounded_width + MARGINAL_GAP, 0.0)
                    .with_rotation(90.0)
                    .with(right),
            );
        }

        let mut x_axis = Axis::linear(AxisOrient::Bottom, &layout.x_scale, self.config.x_ticks);
        let mut y_axis = Axis::linear(AxisOrient::Left, &layout.y_scale, self.config.y_ticks);
        if let Some(label) = &self.config.x_label {
            x_axis = x_axis.with_title(label.clone());
        }
        if let Some(label) = &self.config.y_label {
            y_axis = y_axis.with_title(label.clone());
        }
        bounds.push(x_axis.render().with_translate(0.0, dims.bounded_height));
        bounds.push(y_axis.render());

        if self.season.is_some() {
            bounds.push(self.legend(&dims)?);
        }

        if let Some(snap) = hover {
            let guide = Paint::fill(self.config.accent_color.with_alpha(0.5));
            bounds.push(
                Group::new()
                    .with_class("hover")
                    .with(RectPrimitive::new(0.0, snap.y, snap.x, 1.0, guide))
                    .with(RectPrimitive::new(snap.x, snap.y, 1.0, dims.bounded_height - snap.y, guide))
                    .with(CirclePrimitive::new(
                        snap.x,
                        snap.y,
                        DOT_RADIUS + 3.0,
                        Paint::fill(self.config.accent_color),
                    )),
            );
        }

        frame.push(bounds);
        debug!(
            points = layout.points.len(),
            marginals = self.marginals,
            "scatter plot built"
        );
        Ok(frame)
    }
}

impl Chart for ScatterPlot {
    fn config(&self) -> &ChartConfig {
        &self.config
    }

    fn build_frame(&self) -> ChartResult<RenderFrame> {
        self.build_frame_with_hover(None)
    }
}
