use indexmap::IndexMap;
use tracing::debug;

use crate::api::{Chart, ChartConfig, wrapper};
use crate::core::accessor::{Accessor, FieldAccessor, Record, TextAccessor};
use crate::core::{ColorInterpolator, ColorSpace, Dimensions, DivergingScale};
use crate::error::{ChartError, ChartResult};
use crate::render::{
    Color, Group, Paint, PathPrimitive, RectPrimitive, RenderFrame, TextHAlign, TextPrimitive,
};
use crate::shape::geo::{
    FeatureCollection, GeoObject, GeoPath, Projection, ProjectionKind, graticule,
};

/// Fill for regions the metric has no value for.
pub const MISSING_VALUE_COLOR: Color = Color::rgb(0.886, 0.902, 0.914);
const EARTH_COLOR: Color = Color::rgb(0.953, 0.961, 0.973);
const GRATICULE_COLOR: Color = Color::rgb(0.788, 0.816, 0.839);
const GRATICULE_STEP: f64 = 10.0;
const LEGEND_WIDTH: f64 = 120.0;
const LEGEND_HEIGHT: f64 = 16.0;
const LEGEND_STEPS: usize = 12;

/// World map with regions colored by a metric diverging around 0.
///
/// The width comes from the config; the height follows from fitting the
/// projected globe to that width.
#[derive(Debug, Clone)]
pub struct ChoroplethMap {
    config: ChartConfig,
    shapes: FeatureCollection,
    values: IndexMap<String, f64>,
    id_property: String,
    projection: ProjectionKind,
    legend: Option<(String, String)>,
}

impl ChoroplethMap {
    /// `values` maps region ids, read from the `id_property` of each feature,
    /// to the metric.
    #[must_use]
    pub fn new(
        shapes: FeatureCollection,
        values: IndexMap<String, f64>,
        id_property: impl Into<String>,
    ) -> Self {
        Self {
            config: ChartConfig::default(),
            shapes,
            values,
            id_property: id_property.into(),
            projection: ProjectionKind::EqualEarth,
            legend: None,
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: ChartConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn with_projection(mut self, projection: ProjectionKind) -> Self {
        self.projection = projection;
        self
    }

    #[must_use]
    pub fn with_legend(mut self, title: impl Into<String>, byline: impl Into<String>) -> Self {
        self.legend = Some((title.into(), byline.into()));
        self
    }

    #[must_use]
    pub fn values(&self) -> &IndexMap<String, f64> {
        &self.values
    }

    /// Projection fitted to the bounded width, plus the dimensions whose
    /// height wraps the projected globe.
    pub fn fit(&self) -> ChartResult<(Projection, Dimensions)> {
        let requested = self.config.dimensions()?;
        let projection =
            Projection::new(self.projection).fit_width(requested.bounded_width, GeoObject::Sphere)?;
        let sphere = GeoPath::new(&projection)
            .bounds(GeoObject::Sphere)
            .ok_or_else(|| ChartError::InvalidData("projected globe has no extent".to_owned()))?;
        let margin = requested.margin;
        let dimensions = Dimensions::new(requested.width, sphere.y1 + margin.vertical(), margin)?;
        Ok((projection, dimensions))
    }

    pub fn color_scale(&self) -> ChartResult<DivergingScale> {
        let interpolator = ColorInterpolator::ramp(
            vec![
                Color::from_rgb8(0x4b, 0x00, 0x82),
                Color::WHITE,
                Color::from_rgb8(0x00, 0x64, 0x00),
            ],
            ColorSpace::Rgb,
        )?;
        DivergingScale::symmetric(self.values.values().copied(), interpolator)
    }

    /// Fill for one region id.
    #[must_use]
    pub fn fill_for(&self, scale: &DivergingScale, id: Option<&str>) -> Color {
        id.and_then(|id| self.values.get(id))
            .map_or(MISSING_VALUE_COLOR, |value| scale.apply(*value))
    }

    fn legend_group(&self, scale: &DivergingScale, dims: &Dimensions) -> Group {
        let (low, _, high) = scale.domain();
        let y = if dims.width < 800.0 {
            dims.bounded_height - 30.0
        } else {
            dims.bounded_height * 0.5
        };
        let mut legend = Group::new().with_class("legend").with_translate(120.0, y);
        if let Some((title, byline)) = &self.legend {
            legend.push(TextPrimitive::new(
                title.clone(),
                0.0,
                -23.0,
                14.0,
                self.config.text_color,
                TextHAlign::Center,
            ));
            legend.push(TextPrimitive::new(
                byline.clone(),
                0.0,
                -9.0,
                10.0,
                self.config.text_color,
                TextHAlign::Center,
            ));
        }
        let step = LEGEND_WIDTH / LEGEND_STEPS as f64;
        for i in 0..LEGEND_STEPS {
            let t = (i as f64 + 0.5) / LEGEND_STEPS as f64;
            legend.push(RectPrimitive::new(
                -LEGEND_WIDTH / 2.0 + i as f64 * step,
                0.0,
                step,
                LEGEND_HEIGHT,
                Paint::fill(scale.apply(low + t * (high - low))),
            ));
        }
        legend.push(TextPrimitive::new(
            format!("{high:.1}%"),
            LEGEND_WIDTH / 2.0 + 10.0,
            LEGEND_HEIGHT / 2.0,
            10.0,
            self.config.text_color,
            TextHAlign::Left,
        ));
        legend.push(TextPrimitive::new(
            format!("{low:.1}%"),
            -LEGEND_WIDTH / 2.0 - 10.0,
            LEGEND_HEIGHT / 2.0,
            10.0,
            self.config.text_color,
            TextHAlign::Right,
        ));
        legend
    }
}

impl Chart for ChoroplethMap {
    fn config(&self) -> &ChartConfig {
        &self.config
    }

    fn build_frame(&self) -> ChartResult<RenderFrame> {
        let (projection, dims) = self.fit()?;
        let scale = self.color_scale()?;
        let path = GeoPath::new(&projection);
        let (mut frame, mut bounds) = wrapper(&dims);

        bounds.push(PathPrimitive::new(
            path.path(GeoObject::Sphere),
            Paint::fill(EARTH_COLOR),
        ));
        let grid = graticule(GRATICULE_STEP);
        bounds.push(PathPrimitive::new(
            path.path(GeoObject::Geometry(&grid)),
            Paint::stroke(GRATICULE_COLOR, 1.0),
        ));

        let mut countries = Group::new().with_class("countries");
        let mut missing = 0_usize;
        for feature in &self.shapes.features {
            let id = feature.property_text(&self.id_property);
            if id.as_deref().is_none_or(|id| !self.values.contains_key(id)) {
                missing += 1;
            }
            countries.push(PathPrimitive::new(
                path.path(GeoObject::Feature(feature)),
                Paint::fill(self.fill_for(&scale, id.as_deref()))
                    .with_stroke(Color::WHITE, 0.5),
            ));
        }
        bounds.push(countries);
        frame.push(bounds);
        frame.push(self.legend_group(&scale, &dims));

        debug!(
            missing,
            features = self.shapes.features.len(),
            width = dims.width,
            height = dims.height,
            scale = projection.scale(),
            "choropleth built"
        );
        Ok(frame)
    }
}

/// Metric per region from tabular rows, World Bank style: only rows whose
/// `series` column equals `series_name` count, and unparsable values read as 0.
pub fn metric_by_region(
    rows: &[Record],
    series: &TextAccessor,
    series_name: &str,
    region: &TextAccessor,
    value: &FieldAccessor,
) -> IndexMap<String, f64> {
    rows.iter()
        .filter(|row| series.get(row).as_deref() == Some(series_name))
        .filter_map(|row| Some((region.get(row)?, value.get(row).unwrap_or(0.0))))
        .collect()
}
