use approx::assert_relative_eq;
use chrono::{NaiveDate, NaiveDateTime};
use viz_rs::ChartError;
use viz_rs::core::{
    BandScale, ColorInterpolator, ColorScale, ColorSpace, ContinuousScale, DivergingScale,
    LinearScale, OrdinalScale, SequentialScale, TimeScale,
};
use viz_rs::error::DomainError;
use viz_rs::render::Color;

fn day(year: i32, month: u32, day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .expect("valid date")
}

#[test]
fn linear_scale_maps_and_inverts() {
    let scale = LinearScale::linear(0.0, 100.0, 0.0, 500.0).expect("valid scale");

    assert_eq!(scale.apply(50.0), 250.0);
    assert_eq!(scale.invert(250.0), 50.0);
    assert_eq!(scale.apply(120.0), 600.0, "unclamped scales extrapolate");
    assert_eq!(scale.clone().with_clamp(true).apply(120.0), 500.0);
}

#[test]
fn inverted_range_maps_high_values_up() {
    let scale = LinearScale::linear(0.0, 10.0, 300.0, 0.0).expect("valid scale");

    assert_eq!(scale.apply(0.0), 300.0);
    assert_eq!(scale.apply(10.0), 0.0);
    assert_relative_eq!(scale.invert(150.0), 5.0);
}

#[test]
fn nice_extends_to_round_values() {
    let scale = LinearScale::from_extent([3.0, 42.0, 97.0], (0.0, 100.0))
        .expect("valid extent")
        .nice(10);

    assert_eq!(scale.domain_extent(), (0.0, 100.0));
    assert_eq!(scale.ticks(5), vec![0.0, 20.0, 40.0, 60.0, 80.0, 100.0]);
    let format = scale.tick_format(5);
    assert_eq!(format(40.0), "40");
}

#[test]
fn tick_format_uses_tick_precision_and_grouping() {
    let fine = LinearScale::linear(0.0, 1.0, 0.0, 100.0).expect("valid scale");
    assert_eq!(fine.tick_format(10)(0.5), "0.5");

    let wide = LinearScale::linear(0.0, 10_000.0, 0.0, 100.0).expect("valid scale");
    assert_eq!(wide.tick_format(5)(4_000.0), "4,000");
}

#[test]
fn degenerate_or_empty_extent_is_a_domain_error() {
    let err = LinearScale::from_extent([5.0, 5.0, 5.0], (0.0, 100.0)).expect_err("degenerate");
    assert!(matches!(
        err,
        ChartError::Domain(DomainError::Degenerate { value, .. }) if value == 5.0
    ));

    let err = LinearScale::from_extent(Vec::<f64>::new(), (0.0, 1.0)).expect_err("empty");
    assert!(matches!(err, ChartError::Domain(DomainError::Empty { .. })));
}

#[test]
fn explicit_equal_stops_map_to_range_midpoint() {
    let scale = LinearScale::linear(4.0, 4.0, 0.0, 100.0).expect("equal stops allowed");
    assert_eq!(scale.apply(4.0), 50.0);
}

#[test]
fn piecewise_domain_interpolates_per_segment() {
    let scale = LinearScale::new(&[0.0, 10.0, 100.0], &[0.0, 50.0, 100.0]).expect("valid");

    assert_eq!(scale.apply(5.0), 25.0);
    assert_eq!(scale.apply(55.0), 75.0);
    assert_relative_eq!(scale.invert(75.0), 55.0);

    let err = LinearScale::new(&[0.0, 10.0, 5.0], &[0.0, 1.0, 2.0]).expect_err("not monotonic");
    assert!(matches!(
        err,
        ChartError::Domain(DomainError::NotMonotonic { .. })
    ));
    let err = LinearScale::new(&[0.0, 1.0], &[0.0]).expect_err("stop mismatch");
    assert!(matches!(
        err,
        ChartError::Domain(DomainError::StopCountMismatch { .. })
    ));
}

#[test]
fn time_scale_round_trips_dates() {
    let dates = [day(2018, 1, 1), day(2018, 6, 15), day(2018, 12, 31)];
    let scale = TimeScale::from_extent(dates, (0.0, 1_000.0)).expect("valid extent");

    assert_eq!(scale.apply(day(2018, 1, 1)), 0.0);
    assert_eq!(scale.apply(day(2018, 12, 31)), 1_000.0);
    for date in dates {
        assert_eq!(scale.invert(scale.apply(date)), date);
    }
    assert_eq!(scale.range_extent(), (0.0, 1_000.0));
    assert_eq!(scale.domain(), (day(2018, 1, 1), day(2018, 12, 31)));
}

#[test]
fn single_date_extent_is_degenerate() {
    let err = TimeScale::from_extent([day(2018, 3, 1), day(2018, 3, 1)], (0.0, 1_000.0))
        .expect_err("degenerate");
    assert!(matches!(
        err,
        ChartError::Domain(DomainError::Degenerate { .. })
    ));
}

#[test]
fn time_ticks_align_to_months_for_a_year() {
    let scale = TimeScale::new(day(2018, 1, 1), day(2018, 12, 31), (0.0, 600.0)).expect("valid");
    let ticks = scale.ticks(12);

    assert_eq!(ticks.len(), 12);
    assert_eq!(ticks[0], day(2018, 1, 1));
    assert_eq!(ticks[11], day(2018, 12, 1));

    let format = scale.tick_format();
    assert_eq!(format(ticks[0]), "2018");
    assert_eq!(format(ticks[1]), "February");
}

#[test]
fn band_scale_splits_range_with_padding() {
    let scale = BandScale::new(["a", "b", "c", "d"], (0.0, 400.0)).expect("valid band");
    assert_eq!(scale.step(), 100.0);
    assert_eq!(scale.bandwidth(), 100.0);
    assert_eq!(scale.apply("c"), Some(200.0));
    assert_eq!(scale.apply("z"), None);

    let padded = scale.with_padding(0.2, 0.0).expect("valid padding");
    assert_relative_eq!(padded.step(), 400.0 / 3.8);
    assert_relative_eq!(padded.bandwidth(), padded.step() * 0.8);
    assert_relative_eq!(padded.apply("a").expect("known key"), 0.0, epsilon = 1e-9);
}

#[test]
fn ordinal_scale_cycles_and_grows_on_demand() {
    let mut scale = OrdinalScale::new(vec!["red", "green"]).expect("non-empty range");

    assert_eq!(scale.apply_or_insert("x"), "red");
    assert_eq!(scale.apply_or_insert("y"), "green");
    assert_eq!(scale.apply_or_insert("z"), "red");
    assert_eq!(scale.apply_or_insert("x"), "red");
    assert_eq!(scale.apply("unseen"), None);

    let with_unknown = scale.with_unknown("grey");
    assert_eq!(with_unknown.apply("unseen"), Some("grey"));
}

#[test]
fn sequential_scale_clamps_to_ramp_ends() {
    let ramp = ColorInterpolator::ramp(vec![Color::BLACK, Color::WHITE], ColorSpace::Rgb)
        .expect("two stops");
    let scale = SequentialScale::new((0.0, 10.0), ramp).expect("valid");

    assert_eq!(scale.apply(-5.0), Color::BLACK);
    assert_eq!(scale.apply(50.0), Color::WHITE);
    assert_relative_eq!(scale.apply(5.0).red, 0.5);
}

#[test]
fn diverging_scale_centers_zero() {
    let ramp = ColorInterpolator::ramp(
        vec![Color::from_rgb8(75, 0, 130), Color::WHITE, Color::from_rgb8(0, 100, 0)],
        ColorSpace::Rgb,
    )
    .expect("three stops");
    let scale = DivergingScale::symmetric([-1.7, 0.4, 4.1], ramp).expect("valid");

    assert_eq!(scale.domain(), (-4.1, 0.0, 4.1));
    assert_eq!(scale.apply(0.0), Color::WHITE);
    assert_eq!(scale.apply(4.1).to_hex(), "#006400");
    assert_eq!(scale.apply(-4.1).to_hex(), "#4b0082");
}

#[test]
fn color_scale_interpolates_between_stops() {
    let scale = ColorScale::new(
        &[0.0, 10.0, 20.0],
        &[Color::BLACK, Color::WHITE, Color::BLACK],
        ColorSpace::Rgb,
    )
    .expect("valid");

    assert_eq!(scale.apply(10.0), Color::WHITE);
    assert_relative_eq!(scale.apply(15.0).green, 0.5);
    assert_eq!(scale.apply(-1.0), Color::BLACK);
}

#[test]
fn lab_interpolation_keeps_endpoints() {
    let from = Color::from_rgb8(0xf3, 0xa6, 0x83);
    let to = Color::from_rgb8(0x3d, 0xc1, 0xd3);

    assert_eq!(ColorSpace::Lab.interpolate(from, to, 0.0).to_hex(), "#f3a683");
    assert_eq!(ColorSpace::Lab.interpolate(from, to, 1.0).to_hex(), "#3dc1d3");
    assert_eq!(ColorSpace::Hcl.interpolate(from, to, 1.0).to_hex(), "#3dc1d3");
}
