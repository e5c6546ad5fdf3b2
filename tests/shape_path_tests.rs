use std::f64::consts::{FRAC_PI_2, PI, TAU};

use approx::assert_relative_eq;
use viz_rs::shape::{
    AreaGenerator, ArcGenerator, Curve, LineGenerator, PathBuilder, PieLayout, PieSort,
    RadialLineGenerator, polar_to_cartesian,
};

type Point = (f64, Option<f64>);

fn line(curve: Curve) -> LineGenerator<'static, Point> {
    LineGenerator::new(|point: &Point| Some(point.0), |point: &Point| point.1).with_curve(curve)
}

#[test]
fn path_builder_writes_rect_and_close() {
    let mut path = PathBuilder::new();
    assert!(path.is_empty());
    path.rect(1.0, 2.0, 30.0, 40.0);
    assert_eq!(path.current_point(), Some((1.0, 2.0)));
    assert_eq!(path.finish(), "M1,2h30v40h-30Z");
}

#[test]
fn linear_line_joins_points_in_order() {
    let data = [(0.0, Some(0.0)), (10.0, Some(20.0)), (20.0, Some(10.0))];
    assert_eq!(line(Curve::Linear).generate(&data), "M0,0L10,20L20,10");
}

#[test]
fn undefined_points_break_the_line() {
    let data = [
        (0.0, Some(0.0)),
        (10.0, None),
        (20.0, Some(10.0)),
        (30.0, Some(f64::NAN)),
        (40.0, Some(5.0)),
        (50.0, Some(0.0)),
    ];
    let generator = line(Curve::Linear);

    assert_eq!(generator.segments(&data).len(), 3);
    assert_eq!(generator.generate(&data), "M0,0ZM20,10ZM40,5L50,0");
}

#[test]
fn defined_predicate_filters_points() {
    let data = [(0.0, Some(0.0)), (10.0, Some(-5.0)), (20.0, Some(10.0))];
    let generator = line(Curve::Linear).with_defined(|point: &Point| point.1 >= Some(0.0));
    assert_eq!(generator.point(&data[1]), None);
    assert_eq!(generator.segments(&data).len(), 2);
}

#[test]
fn step_curve_switches_halfway() {
    let data = [(0.0, Some(0.0)), (10.0, Some(10.0))];
    assert_eq!(line(Curve::Step).generate(&data), "M0,0L5,0L5,10L10,10");
    assert_eq!(line(Curve::StepBefore).generate(&data), "M0,0L0,10L10,10");
    assert_eq!(line(Curve::StepAfter).generate(&data), "M0,0L10,0L10,10");
}

#[test]
fn smooth_curves_emit_cubic_segments() {
    let data = [
        (0.0, Some(0.0)),
        (10.0, Some(10.0)),
        (20.0, Some(5.0)),
        (30.0, Some(20.0)),
    ];

    let basis = line(Curve::Basis).generate(&data);
    assert!(basis.starts_with("M0,0L"));
    assert!(basis.ends_with("L30,20"));
    assert_eq!(basis.matches('C').count(), 3);

    let monotone = line(Curve::MonotoneX).generate(&data);
    assert!(monotone.starts_with("M0,0C"));
    assert_eq!(monotone.matches('C').count(), 3);
    assert!(monotone.ends_with(",30,20"));
}

#[test]
fn area_closes_back_along_the_baseline() {
    let data = [(0.0, Some(10.0)), (10.0, Some(20.0))];
    let area = AreaGenerator::with_baseline(|point: &Point| Some(point.0), 100.0, |point: &Point| {
        point.1
    });
    assert_eq!(area.generate(&data), "M0,10L10,20L10,100L0,100Z");
}

#[test]
fn area_splits_on_missing_values() {
    let data = [
        (0.0, Some(10.0)),
        (10.0, Some(20.0)),
        (20.0, None),
        (30.0, Some(5.0)),
        (40.0, Some(5.0)),
    ];
    let area = AreaGenerator::with_baseline(|point: &Point| Some(point.0), 50.0, |point: &Point| {
        point.1
    });
    assert_eq!(area.generate(&data).matches('Z').count(), 2);
}

#[test]
fn radial_line_starts_at_twelve_o_clock() {
    let (x, y) = polar_to_cartesian(0.0, 10.0);
    assert_relative_eq!(x, 0.0);
    assert_relative_eq!(y, -10.0);
    let (x, y) = polar_to_cartesian(FRAC_PI_2, 10.0);
    assert_relative_eq!(x, 10.0);
    assert_relative_eq!(y, 0.0, epsilon = 1e-9);

    let angles = [0.0, FRAC_PI_2, PI, 3.0 * FRAC_PI_2];
    let radial = RadialLineGenerator::new(|angle: &f64| Some(*angle), |_: &f64| Some(10.0))
        .with_curve(Curve::LinearClosed);
    assert_eq!(radial.generate(&angles), "M0,-10L10,0L0,10L-10,0Z");
}

#[test]
fn full_ring_is_two_half_arcs() {
    let arc = ArcGenerator::new(0.0, 10.0).expect("valid radii");
    assert_eq!(
        arc.path(0.0, TAU),
        "M0,-10A10,10,0,1,1,0,10A10,10,0,1,1,0,-10Z"
    );
}

#[test]
fn quarter_pie_slice_returns_to_center() {
    let arc = ArcGenerator::new(0.0, 10.0).expect("valid radii");
    assert_eq!(arc.path(0.0, FRAC_PI_2), "M0,-10A10,10,0,0,1,10,0L0,0Z");

    let (x, y) = arc.centroid(0.0, PI);
    assert_relative_eq!(x, 5.0);
    assert_relative_eq!(y, 0.0, epsilon = 1e-9);
}

#[test]
fn donut_sector_traces_inner_arc_backwards() {
    let arc = ArcGenerator::new(5.0, 10.0).expect("valid radii");
    let path = arc.path(0.0, FRAC_PI_2);
    assert_eq!(path.matches('A').count(), 2);
    assert!(path.contains("A5,5,0,0,0,"), "inner arc runs counter-clockwise");

    let padded = arc.with_pad_angle(0.1).path(0.0, FRAC_PI_2);
    assert_ne!(padded, path);
    assert!(padded.ends_with('Z'));
}

#[test]
fn negative_radii_are_rejected() {
    assert!(ArcGenerator::new(-1.0, 10.0).is_err());
    assert!(ArcGenerator::new(0.0, f64::NAN).is_err());
}

#[test]
fn pie_sorts_descending_and_keeps_input_order() {
    let slices = PieLayout::new().layout(&[1.0, 3.0]);

    assert_eq!(slices.len(), 2);
    assert_eq!(slices[1].rank, 0);
    assert_eq!(slices[0].rank, 1);
    assert_relative_eq!(slices[1].start_angle, 0.0);
    assert_relative_eq!(slices[1].end_angle, 0.75 * TAU);
    assert_relative_eq!(slices[0].end_angle, TAU);
}

#[test]
fn pie_padding_is_shared_across_slices() {
    let slices = PieLayout::new()
        .with_pad_angle(0.1)
        .with_sort(PieSort::None)
        .layout(&[1.0, 1.0, 2.0]);

    assert_relative_eq!(slices[0].start_angle, 0.0);
    assert_relative_eq!(slices[2].end_angle, TAU, epsilon = 1e-9);
    let first = slices[0].end_angle - slices[0].start_angle;
    let last = slices[2].end_angle - slices[2].start_angle;
    assert_relative_eq!(last - 0.1, 2.0 * (first - 0.1), epsilon = 1e-9);
    assert!(slices.iter().all(|slice| slice.pad_angle == 0.1));
}

#[test]
fn empty_and_zero_pies_do_not_sweep() {
    assert!(PieLayout::new().layout(&[]).is_empty());
    let slices = PieLayout::new().layout(&[0.0, 0.0]);
    assert!(
        slices
            .iter()
            .all(|slice| slice.start_angle == 0.0 && slice.end_angle == 0.0)
    );
}
