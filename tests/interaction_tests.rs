use chrono::NaiveDate;
use serde_json::json;
use viz_rs::core::{DateAccessor, FnAccessor, LinearScale, Margin, Record, TimeScale};
use viz_rs::interaction::{
    HoverSnap, PointerTracker, TooltipState, VoronoiDiagram, nearest_2d, nearest_2d_within,
    nearest_by_x,
};

fn record(value: serde_json::Value) -> Record {
    value.as_object().cloned().expect("object literal")
}

#[test]
fn nearest_by_x_inverts_the_pointer() {
    let data = [0.0, 10.0, 20.0];
    let accessor = FnAccessor::new("value", |value: &f64| Some(*value));
    let scale = LinearScale::linear(0.0, 20.0, 0.0, 200.0).expect("scale");

    assert_eq!(nearest_by_x(&data, &accessor, &scale, 140.0), Some(1));
    assert_eq!(nearest_by_x(&data, &accessor, &scale, 190.0), Some(2));
    assert_eq!(nearest_by_x(&data, &accessor, &scale, 150.0), Some(1), "ties go first");
    assert_eq!(nearest_by_x(&data, &accessor, &scale, f64::NAN), None);
    assert_eq!(nearest_by_x(&[], &accessor, &scale, 10.0), None);
}

#[test]
fn nearest_by_x_works_on_dates_and_skips_missing() {
    let rows = vec![
        record(json!({ "date": "2018-01-01" })),
        record(json!({ "date": "not a date" })),
        record(json!({ "date": "2018-01-05" })),
    ];
    let start = NaiveDate::from_ymd_opt(2018, 1, 1)
        .and_then(|day| day.and_hms_opt(0, 0, 0))
        .expect("date");
    let end = NaiveDate::from_ymd_opt(2018, 1, 5)
        .and_then(|day| day.and_hms_opt(0, 0, 0))
        .expect("date");
    let scale = TimeScale::new(start, end, (0.0, 400.0)).expect("scale");
    let accessor = DateAccessor::new("date");

    assert_eq!(nearest_by_x(&rows, &accessor, &scale, 120.0), Some(0));
    assert_eq!(nearest_by_x(&rows, &accessor, &scale, 310.0), Some(2));
}

#[test]
fn nearest_2d_picks_the_closest_finite_point() {
    let points = [(0.0, 0.0), (f64::NAN, 1.0), (10.0, 10.0), (3.0, 4.0)];

    assert_eq!(nearest_2d(&points, (2.0, 2.0)), Some(3));
    assert_eq!(nearest_2d(&points, (9.0, 9.0)), Some(2));
    assert_eq!(nearest_2d(&[], (0.0, 0.0)), None);
    assert_eq!(nearest_2d_within(&points, (20.0, 20.0), 5.0), None);
    assert_eq!(nearest_2d_within(&points, (12.0, 10.0), 5.0), Some(2));
}

#[test]
fn voronoi_cells_split_the_box_between_sites() {
    let diagram =
        VoronoiDiagram::new(vec![(25.0, 50.0), (75.0, 50.0)], (0.0, 0.0, 100.0, 100.0))
            .expect("valid bounds");

    assert_eq!(diagram.len(), 2);
    let left = diagram.cell(0).expect("cell 0");
    assert!(left.iter().all(|&(x, _)| x <= 50.0 + 1e-9));
    let right = diagram.cell(1).expect("cell 1");
    assert!(right.iter().all(|&(x, _)| x >= 50.0 - 1e-9));

    assert_eq!(diagram.find(60.0, 10.0), Some(1));
    assert_eq!(diagram.find(10.0, 90.0), Some(0));
    let path = diagram.cell_path(0).expect("path");
    assert!(path.starts_with('M') && path.ends_with('Z'));
}

#[test]
fn voronoi_duplicate_sites_leave_empty_cells() {
    let diagram = VoronoiDiagram::new(vec![(10.0, 10.0), (10.0, 10.0)], (0.0, 0.0, 50.0, 50.0))
        .expect("valid bounds");

    assert_eq!(diagram.cell(0).map(<[(f64, f64)]>::len), Some(4));
    assert_eq!(diagram.cell(1).map(<[(f64, f64)]>::len), Some(0));
    assert_eq!(diagram.cell_path(1), None);
    assert_eq!(diagram.cell_path(7), None);
    assert_eq!(diagram.find(10.0, 10.0), Some(0));
}

#[test]
fn voronoi_rejects_inverted_bounds() {
    assert!(VoronoiDiagram::new(vec![(1.0, 1.0)], (10.0, 0.0, 0.0, 10.0)).is_err());
    assert!(VoronoiDiagram::new(vec![], (0.0, 0.0, f64::INFINITY, 10.0)).is_err());
}

#[test]
fn pointer_tracker_reports_hover_changes() {
    let tracker = PointerTracker::new();
    assert!(!tracker.is_inside());

    let snap = HoverSnap {
        index: 3,
        x: 10.0,
        y: 20.0,
    };
    let moved = tracker.on_pointer_move(12.0, 18.0, Some(snap));
    assert!(moved.is_inside());
    assert!(tracker.hover_changed(&moved));

    let ignored = moved.on_pointer_move(f64::NAN, 0.0, None);
    assert_eq!(ignored, moved);

    let left = moved.on_pointer_leave();
    assert_eq!(left.hover(), None);
    assert_eq!(left.position(), None);
}

#[test]
fn tooltip_anchors_above_the_hovered_point() {
    let snap = HoverSnap {
        index: 1,
        x: 100.0,
        y: 50.0,
    };
    let tooltip = TooltipState::hidden().on_pointer_move(
        snap,
        Margin::new(30.0, 40.0, 40.0, 75.0),
        vec!["Monday".to_owned(), "max: 71.2".to_owned()],
    );

    assert!(tooltip.is_visible());
    assert_eq!(tooltip.anchor(), (175.0, 80.0));
    assert_eq!(tooltip.index(), Some(1));
    assert_eq!(tooltip.lines().len(), 2);
    assert_eq!(
        tooltip.css_transform(),
        "translate(calc(-50% + 175px), calc(-100% + 80px))"
    );

    let hidden = tooltip.on_pointer_leave();
    assert!(!hidden.is_visible());
    assert_eq!(hidden.anchor(), (175.0, 80.0));
}
