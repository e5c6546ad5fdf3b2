//! Ready-made chart builders on top of the core pipeline.
//!
//! Each builder owns its data, accessors and `ChartConfig`, derives the
//! dimensions and scales on every build, and returns a `RenderFrame`.

mod choropleth;
mod config;
mod donut;
mod histogram;
mod line_chart;
mod radar;
mod scatter;

pub use choropleth::{ChoroplethMap, MISSING_VALUE_COLOR, metric_by_region};
pub use config::ChartConfig;
pub use donut::{DonutChart, DonutSegment, OTHER_KEY};
pub use histogram::{Histogram, HistogramLayout};
pub use line_chart::{LineChart, LineLayout};
pub use radar::{RadarChart, RadarMetric};
pub use scatter::{ScatterLayout, ScatterPlot};

use crate::core::Dimensions;
use crate::error::ChartResult;
use crate::render::{Group, RenderFrame, Renderer, SvgRenderer};

/// Common surface of every chart builder.
pub trait Chart {
    fn config(&self) -> &ChartConfig;

    /// Materializes the chart into primitives.
    fn build_frame(&self) -> ChartResult<RenderFrame>;

    fn render<R: Renderer>(&self, renderer: &mut R) -> ChartResult<()> {
        renderer.render(&self.build_frame()?)
    }

    fn render_svg(&self) -> ChartResult<String> {
        SvgRenderer::to_svg(&self.build_frame()?)
    }
}

/// Wrapper frame plus the bounds group every chart draws into.
pub(crate) fn wrapper(dimensions: &Dimensions) -> (RenderFrame, Group) {
    let (left, top) = dimensions.bounds_translate();
    (
        RenderFrame::new(dimensions.width, dimensions.height),
        Group::new().with_class("bounds").with_translate(left, top),
    )
}
