use tracing::debug;

use crate::api::{Chart, ChartConfig, wrapper};
use crate::core::accessor::{Accessor, Record, TextAccessor};
use crate::core::{ColorInterpolator, ColorSpace, OrdinalScale, array};
use crate::error::{ChartError, ChartResult};
use crate::render::{Color, Group, Paint, PathPrimitive, RenderFrame, TextHAlign, TextPrimitive};
use crate::shape::{ArcGenerator, PieLayout, PieSlice};

pub const OTHER_KEY: &str = "other";
const OTHER_COLOR: Color = Color::rgb(0.855, 0.855, 0.867);
const DEFAULT_TOP: usize = 4;
const PAD_ANGLE: f64 = 0.005;
const INNER_RATIO: f64 = 0.7;

/// One category of the donut with its share of the sweep.
#[derive(Debug, Clone, PartialEq)]
pub struct DonutSegment {
    pub key: String,
    pub count: usize,
    pub slice: PieSlice,
    pub color: Color,
}

/// Record counts per category as a ring. The largest categories get their
/// own segment and the rest, including any category literally named
/// `other`, are merged into a single `other` segment.
#[derive(Debug, Clone)]
pub struct DonutChart {
    config: ChartConfig,
    data: Vec<Record>,
    category: TextAccessor,
    top: usize,
    title: Option<(String, String)>,
}

impl DonutChart {
    #[must_use]
    pub fn new(data: Vec<Record>, category: TextAccessor) -> Self {
        Self {
            config: ChartConfig::default(),
            data,
            category,
            top: DEFAULT_TOP,
            title: None,
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: ChartConfig) -> Self {
        self.config = config;
        self
    }

    /// Number of categories kept before the rest fold into `other`.
    #[must_use]
    pub fn with_top(mut self, top: usize) -> Self {
        self.top = top;
        self
    }

    /// Centred title and subtitle inside the ring.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>, subtitle: impl Into<String>) -> Self {
        self.title = Some((title.into(), subtitle.into()));
        self
    }

    /// Categories by descending count (stable for ties); missing categories
    /// are skipped.
    fn grouped(&self) -> Vec<(String, usize)> {
        let groups = array::group(
            self.data.iter().filter_map(|datum| self.category.get(datum)),
            Clone::clone,
        );
        let mut counted: Vec<(String, usize)> = groups
            .into_iter()
            .map(|(key, members)| (key, members.len()))
            .collect();
        counted.sort_by(|a, b| b.1.cmp(&a.1));
        counted
    }

    pub fn segments(&self) -> ChartResult<Vec<DonutSegment>> {
        let grouped = self.grouped();
        if grouped.is_empty() {
            return Err(ChartError::InvalidData(format!(
                "no records carry the `{}` category",
                self.category.name()
            )));
        }

        // Shades are spread over every category, smallest first.
        let shades = ColorInterpolator::ramp(
            vec![Color::from_rgb8(0xf3, 0xa6, 0x83), Color::from_rgb8(0x3d, 0xc1, 0xd3)],
            ColorSpace::Lab,
        )?
        .samples(grouped.len());
        let colors = OrdinalScale::new(shades)?
            .with_domain(grouped.iter().rev().map(|(key, _)| key.clone()))
            .with_unknown(OTHER_COLOR);

        // A category already named `other` joins the merged remainder.
        let (named_other, named): (Vec<_>, Vec<_>) =
            grouped.iter().partition(|(key, _)| key == OTHER_KEY);
        let mut combined: Vec<(String, usize)> =
            named.iter().take(self.top).map(|&entry| entry.clone()).collect();
        let rest: usize = named
            .iter()
            .skip(self.top)
            .chain(&named_other)
            .map(|(_, count)| count)
            .sum();
        combined.push((OTHER_KEY.to_owned(), rest));

        let values: Vec<f64> = combined.iter().map(|(_, count)| *count as f64).collect();
        let slices = PieLayout::new().with_pad_angle(PAD_ANGLE).layout(&values);
        Ok(combined
            .into_iter()
            .zip(slices)
            .map(|((key, count), slice)| {
                let color = if key == OTHER_KEY {
                    OTHER_COLOR
                } else {
                    colors.apply(&key).unwrap_or(OTHER_COLOR)
                };
                DonutSegment {
                    key,
                    count,
                    slice,
                    color,
                }
            })
            .collect())
    }
}

impl Chart for DonutChart {
    fn config(&self) -> &ChartConfig {
        &self.config
    }

    fn build_frame(&self) -> ChartResult<RenderFrame> {
        let dims = self.config.dimensions()?;
        let radius = dims.bounded_radius();
        let (cx, cy) = dims.bounded_center();
        let arc = ArcGenerator::new(radius * INNER_RATIO, radius)?;
        let segments = self.segments()?;
        let (mut frame, mut bounds) = wrapper(&dims);

        let mut ring = Group::new().with_class("centered-group").with_translate(cx, cy);
        for segment in &segments {
            let slice = segment.slice;
            ring.push(PathPrimitive::new(
                arc.with_pad_angle(slice.pad_angle)
                    .path(slice.start_angle, slice.end_angle),
                Paint::fill(segment.color),
            ));
        }
        for segment in segments.iter().filter(|segment| segment.count > 0) {
            let (x, y) = arc.centroid(segment.slice.start_angle, segment.slice.end_angle);
            ring.push(
                Group::new()
                    .with_class("label")
                    .with_translate(x, y)
                    .with(TextPrimitive::new(
                        segment.key.clone(),
                        0.0,
                        0.0,
                        12.0,
                        self.config.text_color,
                        TextHAlign::Center,
                    ))
                    .with(TextPrimitive::new(
                        segment.count.to_string(),
                        0.0,
                        20.0,
                        12.0,
                        self.config.text_color,
                        TextHAlign::Center,
                    )),
            );
        }
        bounds.push(ring);

        if let Some((title, subtitle)) = &self.title {
            bounds.push(
                Group::new()
                    .with_class("title")
                    .with_translate(cx, cy)
                    .with(TextPrimitive::new(
                        title.clone(),
                        0.0,
                        0.0,
                        24.0,
                        self.config.text_color,
                        TextHAlign::Center,
                    ))
                    .with(TextPrimitive::new(
                        subtitle.clone(),
                        0.0,
                        30.0,
                        14.0,
                        self.config.text_color,
                        TextHAlign::Center,
                    )),
            );
        }

        frame.push(bounds);
        debug!(
            category = self.category.name(),
            segments = segments.len(),
            "donut chart built"
        );
        Ok(frame)
    }
}
