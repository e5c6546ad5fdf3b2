use std::f64::consts::TAU;

use approx::assert_relative_eq;
use serde_json::json;
use viz_rs::animation::SlidingWindow;
use viz_rs::api::{
    ChoroplethMap, DonutChart, Histogram, LineChart, MISSING_VALUE_COLOR, OTHER_KEY, RadarChart,
    ScatterPlot, metric_by_region,
};
use viz_rs::core::{DateAccessor, FieldAccessor, Margin, Record, TextAccessor, Thresholds};
use viz_rs::error::DomainError;
use viz_rs::interaction::{PointerTracker, TooltipState};
use viz_rs::render::{Color, Group, NullRenderer};
use viz_rs::selection::KeyedScene;
use viz_rs::shape::geo::FeatureCollection;
use viz_rs::{Chart, ChartConfig, ChartError};

fn record(value: serde_json::Value) -> Record {
    value.as_object().cloned().expect("object literal")
}

fn weather() -> Vec<Record> {
    [
        ("2018-01-01", 30.0, 21.0),
        ("2018-01-02", 34.5, 25.0),
        ("2018-01-03", 41.0, 30.5),
        ("2018-01-04", 38.0, 29.0),
        ("2018-01-05", 45.5, 33.0),
    ]
    .into_iter()
    .map(|(date, max, min)| {
        record(json!({ "date": date, "temperatureMax": max, "temperatureMin": min }))
    })
    .collect()
}

fn line_chart() -> LineChart {
    LineChart::new(
        weather(),
        DateAccessor::new("date"),
        FieldAccessor::new("temperatureMax"),
    )
}

#[test]
fn line_chart_renders_line_axes_and_threshold() {
    let chart = line_chart().with_threshold(32.0);
    let frame = chart.build_frame().expect("frame");

    assert_eq!(frame.width, 600.0);
    assert_eq!(frame.height, 400.0);
    assert!(frame.group("bounds").is_some());
    assert!(frame.group("threshold").is_some());
    assert_eq!(frame.group("line").map(|g| g.counts().paths), Some(1));
    assert!(frame.group("hover").is_none());

    let svg = chart.render_svg().expect("svg");
    assert!(svg.contains(r#"class="line""#));
}

#[test]
fn line_chart_snaps_hover_and_fills_the_tooltip() {
    let chart = line_chart();
    let layout = chart.layout().expect("layout");
    assert_eq!(layout.dimensions.bounded_width, 495.0);

    let first = chart.hover(0.0).expect("hover").expect("snap");
    assert_eq!(first.index, 0);
    let last = chart.hover(480.0).expect("hover").expect("snap");
    assert_eq!(last.index, 4);
    assert_relative_eq!(last.x, 495.0, epsilon = 1e-9);

    assert_eq!(
        chart.tooltip_lines(0),
        vec![
            "Monday, January 1, 2018".to_owned(),
            "temperatureMax: 30.0".to_owned()
        ]
    );
    assert!(chart.tooltip_lines(99).is_empty());

    let (tracker, tooltip) = chart
        .on_pointer_move(PointerTracker::new(), TooltipState::hidden(), 130.0, 20.0)
        .expect("pointer move");
    assert_eq!(tracker.hover().map(|snap| snap.index), Some(1));
    assert!(tooltip.is_visible());
    assert_eq!(tooltip.index(), Some(1));

    let frame = chart.build_frame_with_hover(Some(first)).expect("frame");
    assert_eq!(frame.group("hover").map(|g| g.counts().circles), Some(1));
}

#[test]
fn line_chart_follows_a_sliding_window() {
    let window = SlidingWindow::from_items(5, weather()).expect("window");
    let chart = LineChart::from_window(
        &window,
        DateAccessor::new("date"),
        FieldAccessor::new("temperatureMax"),
    );

    assert_eq!(chart.data().len(), 5);
    let offset = chart.slide_offset(&window).expect("layout").expect("two points");
    assert_relative_eq!(offset, 495.0 / 4.0, epsilon = 1e-9);
}

#[test]
fn line_chart_without_dates_fails() {
    let rows = vec![record(json!({ "temperatureMax": 1.0 }))];
    let chart = LineChart::new(rows, DateAccessor::new("date"), FieldAccessor::new("temperatureMax"));
    assert!(matches!(
        chart.build_frame(),
        Err(ChartError::MissingField { index: 0, .. })
    ));
}

fn humidity(values: &[f64]) -> Vec<Record> {
    values
        .iter()
        .map(|value| record(json!({ "humidity": value })))
        .collect()
}

#[test]
fn histogram_bins_every_value() {
    let values = [1.0, 2.0, 2.0, 3.0, 3.0, 3.0, 4.0, 5.0, 9.0, 10.0];
    let histogram = Histogram::new(humidity(&values), FieldAccessor::new("humidity"))
        .with_config(ChartConfig::new(600.0, 400.0).with_thresholds(Thresholds::Count(5)));
    let layout = histogram.layout().expect("layout");

    let total: usize = layout.bins.iter().map(|bin| bin.len()).sum();
    assert_eq!(total, values.len());
    assert_relative_eq!(layout.mean.expect("mean"), 4.2, epsilon = 1e-9);
    assert_eq!(layout.y_scale.domain_extent().0, 0.0);

    let mut renderer = NullRenderer::default();
    histogram.render(&mut renderer).expect("render");
    assert_eq!(renderer.last_counts.rects, layout.bins.len());
    let frame = histogram.build_frame().expect("frame");
    assert!(frame.group("mean").is_some());
    assert!(histogram.clone().with_mean(false).build_frame().expect("frame").group("mean").is_none());
}

#[test]
fn constant_histogram_keeps_a_visible_bar() {
    let histogram = Histogram::new(humidity(&[4.0; 5]), FieldAccessor::new("humidity"));
    let layout = histogram.layout().expect("layout");

    let (start, end) = layout.x_scale.domain_extent();
    assert!(start < 4.0 && end > 4.0, "domain widened around the value");
    let filled = layout
        .bins
        .iter()
        .find(|bin| bin.len() == 5)
        .expect("one bin holds every value");
    let width = layout.x_scale.apply(filled.x1) - layout.x_scale.apply(filled.x0);
    assert!(width > 0.0);

    let empty = Histogram::new(Vec::new(), FieldAccessor::new("humidity"));
    assert!(matches!(
        empty.layout(),
        Err(ChartError::Domain(DomainError::Empty { .. }))
    ));
}

#[test]
fn keyed_histogram_updates_surviving_bars() {
    let mut histogram = Histogram::new(
        humidity(&[0.1, 0.2, 0.35, 0.5, 0.8, 0.95]),
        FieldAccessor::new("humidity"),
    );
    let mut scene: KeyedScene<String, Group> = KeyedScene::new();

    let (_, first) = histogram.build_frame_keyed(&mut scene).expect("first pass");
    assert_eq!(first.updated, 0);
    assert_eq!(first.entered, scene.len());

    let (_, second) = histogram.build_frame_keyed(&mut scene).expect("second pass");
    assert_eq!(second.entered, 0);
    assert_eq!(second.exited, 0);
    assert_eq!(second.updated, scene.len());

    histogram.set_data(humidity(&[10.0, 20.0, 40.0, 70.0]));
    let layout = histogram.layout().expect("layout");
    let (frame, third) = histogram.build_frame_keyed(&mut scene).expect("third pass");
    assert_eq!(third.entered + third.updated, layout.bins.len());
    assert_eq!(scene.len(), layout.bins.len());
    assert_eq!(frame.group("bins").map(|g| g.children.len()), Some(layout.bins.len()));
}

fn scatter_rows() -> Vec<Record> {
    [
        ("2018-01-15", 20.0, 30.0),
        ("2018-04-01", 45.0, 60.0),
        ("2018-06-20", 62.0, 80.0),
        ("2018-08-10", 65.0, 85.0),
        ("2018-10-05", 50.0, 66.0),
        ("2018-12-24", 25.0, 38.0),
    ]
    .into_iter()
    .map(|(date, dew, max)| record(json!({ "date": date, "dewPoint": dew, "temperatureMax": max })))
    .collect()
}

#[test]
fn scatter_plot_shares_one_domain_and_finds_dots() {
    let plot = ScatterPlot::new(
        scatter_rows(),
        FieldAccessor::new("dewPoint"),
        FieldAccessor::new("temperatureMax"),
    )
    .with_config(ChartConfig::new(500.0, 500.0).with_margin(Margin::uniform(50.0)));
    let layout = plot.layout().expect("layout");

    assert_eq!(layout.points.len(), 6);
    assert_eq!(layout.voronoi.len(), 6);
    assert_eq!(layout.x_scale.domain_extent(), layout.y_scale.domain_extent());

    let (x, y) = layout.points[2];
    let snap = plot.hover(x + 1.0, y - 1.0).expect("hover").expect("inside");
    assert_eq!(snap.index, 2);

    let frame = plot.build_frame_with_hover(Some(snap)).expect("frame");
    assert_eq!(frame.group("dots").map(|g| g.counts().circles), Some(6));
    assert!(frame.group("histogram histogram--top").is_some());
    let right = frame.group("histogram histogram--right").expect("right marginal");
    assert_eq!(right.rotation, 90.0);
    assert!(frame.group("hover").is_some());
    assert!(frame.group("legend").is_none());
}

#[test]
fn season_colors_add_a_legend() {
    let plot = ScatterPlot::new(
        scatter_rows(),
        FieldAccessor::new("dewPoint"),
        FieldAccessor::new("temperatureMax"),
    )
    .with_season_colors(DateAccessor::new("date"))
    .with_marginals(false);
    let frame = plot.build_frame().expect("frame");

    assert!(frame.group("legend").is_some());
    assert!(frame.group("histogram histogram--top").is_none());
    assert!(plot.render_svg().expect("svg").contains("Feb 3"));
}

fn players() -> Vec<Record> {
    vec![
        record(json!({ "name": "A", "speed": 80, "power": 60, "stamina": 90 })),
        record(json!({ "name": "B", "speed": 40, "power": 95, "stamina": 70 })),
        record(json!({ "name": "C", "speed": 65, "power": 75 })),
    ]
}

#[test]
fn radar_needs_three_metrics_and_valid_selection() {
    assert!(RadarChart::new(players(), ["speed", "power"]).is_err());

    let mut radar = RadarChart::new(players(), ["speed", "power", "stamina"]).expect("radar");
    assert!(radar.select(3).is_err());
    radar.select(2).expect("in range");
    assert_eq!(radar.selected(), 2);

    let points = radar.points().expect("points");
    assert_eq!(points.len(), 3);
    assert_eq!(points[2].value, 0.0, "missing metric reads as zero");
    assert_relative_eq!(points[0].x, 0.0, epsilon = 1e-9);
    assert!(points[0].y < 0.0, "first spoke points up");
    assert_relative_eq!(radar.angle(1), TAU / 3.0);
}

#[test]
fn radar_renders_web_and_shape() {
    let radar = RadarChart::new(players(), ["speed", "power", "stamina"])
        .expect("radar")
        .with_config(ChartConfig::new(400.0, 400.0).with_margin(Margin::uniform(60.0)));
    let frame = radar.build_frame().expect("frame");

    let web = frame.group("web").expect("web");
    assert_eq!(web.counts().lines, 3);
    assert_eq!(web.counts().texts, 3);
    let shape = frame.group("line").expect("shape");
    assert_eq!(shape.counts().paths, 1);
    assert_eq!(shape.counts().circles, 3);
}

fn trips() -> Vec<Record> {
    ["walk", "walk", "walk", "bike", "bike", "bus", "car"]
        .into_iter()
        .map(|mode| record(json!({ "mode": mode })))
        .chain(std::iter::once(record(json!({ "other_field": 1 }))))
        .collect()
}

#[test]
fn donut_keeps_the_top_categories_and_folds_the_rest() {
    let donut = DonutChart::new(trips(), TextAccessor::new("mode")).with_top(2);
    let segments = donut.segments().expect("segments");

    let keys: Vec<&str> = segments.iter().map(|s| s.key.as_str()).collect();
    assert_eq!(keys, vec!["walk", "bike", OTHER_KEY]);
    assert_eq!(segments[2].count, 2);
    let sweep_end = segments
        .iter()
        .map(|s| s.slice.end_angle)
        .fold(f64::NEG_INFINITY, f64::max);
    assert_relative_eq!(sweep_end, TAU, epsilon = 1e-9);
    assert_ne!(segments[0].color, segments[1].color);
}

#[test]
fn category_named_other_joins_the_remainder() {
    let mut rows = trips();
    rows.extend(["other", "other"].map(|mode| record(json!({ "mode": mode }))));
    let segments = DonutChart::new(rows, TextAccessor::new("mode"))
        .with_top(2)
        .segments()
        .expect("segments");

    let keys: Vec<&str> = segments.iter().map(|s| s.key.as_str()).collect();
    assert_eq!(keys, vec!["walk", "bike", OTHER_KEY]);
    assert_eq!(segments[2].count, 4, "bus, car and two literal others");
}

#[test]
fn donut_always_has_an_other_segment() {
    let donut = DonutChart::new(trips(), TextAccessor::new("mode"))
        .with_title("Trips", "by mode")
        .with_config(ChartConfig::new(300.0, 300.0).with_margin(Margin::uniform(20.0)));
    let segments = donut.segments().expect("segments");
    assert_eq!(segments.last().map(|s| (s.key.as_str(), s.count)), Some((OTHER_KEY, 0)));

    let frame = donut.build_frame().expect("frame");
    let ring = frame.group("centered-group").expect("ring");
    assert_eq!(ring.counts().paths, segments.len());
    assert!(frame.group("title").is_some());

    let empty = DonutChart::new(Vec::new(), TextAccessor::new("mode"));
    assert!(empty.segments().is_err());
}

const SHAPES: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    {
      "type": "Feature",
      "properties": { "ADM0_A3_IS": "FRA" },
      "geometry": {
        "type": "Polygon",
        "coordinates": [[[-4.0, 43.0], [7.5, 43.0], [7.5, 51.0], [-4.0, 51.0], [-4.0, 43.0]]]
      }
    },
    {
      "type": "Feature",
      "properties": { "ADM0_A3_IS": "BRA" },
      "geometry": {
        "type": "Polygon",
        "coordinates": [[[-70.0, -30.0], [-40.0, -30.0], [-40.0, 0.0], [-70.0, 0.0], [-70.0, -30.0]]]
      }
    },
    {
      "type": "Feature",
      "properties": { "ADM0_A3_IS": "ATA" },
      "geometry": {
        "type": "Polygon",
        "coordinates": [[[-60.0, -80.0], [60.0, -80.0], [60.0, -70.0], [-60.0, -70.0], [-60.0, -80.0]]]
      }
    }
  ]
}"#;

fn indicators() -> Vec<Record> {
    vec![
        record(json!({ "Series Name": "Population growth (annual %)", "Country Code": "FRA", "2017 [YR2017]": "0.4" })),
        record(json!({ "Series Name": "Population growth (annual %)", "Country Code": "BRA", "2017 [YR2017]": "-1.2" })),
        record(json!({ "Series Name": "Net migration", "Country Code": "FRA", "2017 [YR2017]": "182000" })),
        record(json!({ "Series Name": "Population growth (annual %)", "Country Code": "NOR", "2017 [YR2017]": ".." })),
    ]
}

#[test]
fn metric_by_region_filters_one_series() {
    let values = metric_by_region(
        &indicators(),
        &TextAccessor::new("Series Name"),
        "Population growth (annual %)",
        &TextAccessor::new("Country Code"),
        &FieldAccessor::new("2017 [YR2017]"),
    );

    assert_eq!(values.len(), 3);
    assert_eq!(values.get("FRA"), Some(&0.4));
    assert_eq!(values.get("NOR"), Some(&0.0), "unparsable reads as zero");
}

#[test]
fn choropleth_fits_height_to_the_globe() {
    let shapes: FeatureCollection = serde_json::from_str(SHAPES).expect("geojson");
    let values = metric_by_region(
        &indicators(),
        &TextAccessor::new("Series Name"),
        "Population growth (annual %)",
        &TextAccessor::new("Country Code"),
        &FieldAccessor::new("2017 [YR2017]"),
    );
    let map = ChoroplethMap::new(shapes, values, "ADM0_A3_IS")
        .with_legend("Population growth", "Percent change in 2017")
        .with_config(ChartConfig::new(800.0, 2_000.0).with_margin(Margin::uniform(10.0)));

    let (projection, dims) = map.fit().expect("fit");
    assert_eq!(dims.width, 800.0);
    assert!(dims.height > 300.0 && dims.height < 500.0);
    assert!(projection.scale() > 0.0);

    let scale = map.color_scale().expect("scale");
    assert_eq!(scale.domain(), (-1.2, 0.0, 1.2));
    assert_eq!(map.fill_for(&scale, Some("ATA")), MISSING_VALUE_COLOR);
    assert_eq!(map.fill_for(&scale, None), MISSING_VALUE_COLOR);
    assert_eq!(map.fill_for(&scale, Some("BRA")), Color::from_rgb8(0x4b, 0x00, 0x82));

    let frame = map.build_frame().expect("frame");
    assert_eq!(frame.group("countries").map(|g| g.counts().paths), Some(3));
    assert!(frame.group("legend").is_some());
    assert!(map.render_svg().expect("svg").contains("Population growth"));
}

#[test]
fn config_round_trips_through_json() {
    let config = ChartConfig::new(640.0, 360.0)
        .with_ticks(6, 3)
        .with_axis_labels("Dew point (°F)", "Max temperature (°F)")
        .with_thresholds(Thresholds::Values(vec![0.25, 0.5, 0.75]));
    let text = config.to_json_pretty().expect("serialize");
    let parsed = ChartConfig::from_json_str(&text).expect("parse");
    assert_eq!(parsed, config);

    let partial = ChartConfig::from_json_str(r#"{ "width": 300, "primary_color": "steelblue" }"#)
        .expect("defaults fill the rest");
    assert_eq!(partial.width, Some(300.0));
    assert_eq!(partial.height, None);
    assert_eq!(partial.primary_color.to_hex(), "#4682b4");
    assert_eq!(partial.x_ticks, 5);

    let dims = partial.dimensions().expect("dimensions");
    assert_eq!((dims.width, dims.height), (300.0, 400.0));
}

#[test]
fn config_validation_rejects_bad_values() {
    assert!(ChartConfig::from_json_str(r#"{ "x_ticks": 0 }"#).is_err());
    assert!(ChartConfig::from_json_str(r#"{ "bar_padding": -1 }"#).is_err());
    assert!(ChartConfig::from_json_str(r#"{ "primary_color": "not-a-color" }"#).is_err());
    assert!(ChartConfig::from_json_str("{").is_err());

    let config = ChartConfig::default().with_margin(Margin::new(-1.0, 0.0, 0.0, 0.0));
    assert!(config.validate().is_err());
}
